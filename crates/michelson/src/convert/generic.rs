//! Typed to generic conversion. Total: every typed node has exactly one
//! generic form.
//!
//! Lowering walks the typed tree with an explicit work stack, so nesting is
//! bounded by memory rather than by the call stack.

use super::Michelson;
use crate::annotation::Annotations;
use crate::data::{Data, Elt, Nat};
use crate::instruction::Instruction;
use crate::prim::Prim;
use crate::script::{Script, ViewDefinition};
use crate::types::{ComparableNode, ComparableType, Type, TypeNode};
use tzenc_micheline::{Int, Micheline};

/// Conversion of typed nodes back to generic Micheline.
pub trait ToMicheline {
    fn to_micheline(&self) -> Micheline;
}

enum Task<'a> {
    Data(&'a Data),
    Elt(&'a Elt),
    Comparable(&'a ComparableNode, &'a Annotations),
    Type(&'a Type),
    Instruction(&'a Instruction),
    Code(&'a [Instruction]),
    View(&'a ViewDefinition),
    Script(&'a Script),
    Parameter(&'a Script),
    Storage(&'a Type),
    CodeSection(&'a [Instruction]),
    Assemble(Shell, usize),
}

/// A generic node minus the arguments still being lowered.
enum Shell {
    Leaf(Micheline),
    Sequence,
    Prim {
        prim: Prim,
        annots: Vec<String>,
        leading: Vec<Micheline>,
    },
}

impl Shell {
    fn prim(prim: Prim, annots: &Annotations) -> Self {
        Shell::Prim {
            prim,
            annots: annots.to_strings(),
            leading: Vec::new(),
        }
    }

    fn bare(prim: Prim) -> Self {
        Self::prim(prim, &Annotations::new())
    }

    /// Prepend a literal argument, e.g. the count of `DIP n`.
    fn leading(mut self, literal: Micheline) -> Self {
        if let Shell::Prim { leading, .. } = &mut self {
            leading.push(literal);
        }
        self
    }

    fn finish(self, args: Vec<Micheline>) -> Micheline {
        match self {
            Shell::Leaf(node) => node,
            Shell::Sequence => Micheline::sequence(args),
            Shell::Prim {
                prim,
                annots,
                mut leading,
            } => {
                leading.extend(args);
                Micheline::prim_annotated(prim.name(), leading, annots)
            }
        }
    }
}

fn nat(n: &Nat) -> Micheline {
    Micheline::int(Int::from(n.clone()))
}

fn comparable(ty: &ComparableType) -> Task<'_> {
    Task::Comparable(&ty.node, &ty.annots)
}

fn lower(root: Task<'_>) -> Micheline {
    let mut work = vec![root];
    let mut done: Vec<Micheline> = Vec::new();

    while let Some(task) = work.pop() {
        let (shell, args) = match task {
            Task::Assemble(shell, count) => {
                let args = done.split_off(done.len().saturating_sub(count));
                done.push(shell.finish(args));
                continue;
            }
            Task::Data(data) => enter_data(data),
            Task::Elt(elt) => (
                Shell::bare(Prim::DElt),
                vec![Task::Data(&elt.key), Task::Data(&elt.value)],
            ),
            Task::Comparable(node, annots) => enter_comparable(node, annots),
            Task::Type(ty) => enter_type(ty),
            Task::Instruction(instruction) => enter_instruction(instruction),
            Task::Code(body) => (Shell::Sequence, body.iter().map(Task::Instruction).collect()),
            Task::View(view) => (
                Shell::bare(Prim::KView).leading(Micheline::string(view.name.clone())),
                vec![
                    Task::Type(&view.input),
                    Task::Type(&view.output),
                    Task::Code(&view.code),
                ],
            ),
            Task::Script(script) => {
                let mut sections = vec![
                    Task::Parameter(script),
                    Task::Storage(&script.storage),
                    Task::CodeSection(&script.code),
                ];
                sections.extend(script.views.iter().map(Task::View));
                (Shell::Sequence, sections)
            }
            Task::Parameter(script) => (
                Shell::prim(Prim::KParameter, &script.parameter_annots),
                vec![Task::Type(&script.parameter)],
            ),
            Task::Storage(ty) => (Shell::bare(Prim::KStorage), vec![Task::Type(ty)]),
            Task::CodeSection(code) => (Shell::bare(Prim::KCode), vec![Task::Code(code)]),
        };

        if args.is_empty() {
            done.push(shell.finish(Vec::new()));
        } else {
            work.push(Task::Assemble(shell, args.len()));
            work.extend(args.into_iter().rev());
        }
    }

    // Every task leaves exactly one node behind.
    done.pop().unwrap_or_else(|| Micheline::sequence(Vec::new()))
}

fn enter_data(data: &Data) -> (Shell, Vec<Task<'_>>) {
    let leaf = |prim| (Shell::bare(prim), Vec::new());
    match data {
        Data::Int(value) => (Shell::Leaf(Micheline::int(value.clone())), Vec::new()),
        Data::String(value) => (Shell::Leaf(Micheline::string(value.clone())), Vec::new()),
        Data::Bytes(value) => (Shell::Leaf(Micheline::bytes(value.clone())), Vec::new()),
        Data::Unit => leaf(Prim::DUnit),
        Data::True => leaf(Prim::DTrue),
        Data::False => leaf(Prim::DFalse),
        Data::None => leaf(Prim::DNone),
        Data::Pair(items) => (Shell::bare(Prim::DPair), items.iter().map(Task::Data).collect()),
        Data::Left(value) => (Shell::bare(Prim::DLeft), vec![Task::Data(&**value)]),
        Data::Right(value) => (Shell::bare(Prim::DRight), vec![Task::Data(&**value)]),
        Data::Some(value) => (Shell::bare(Prim::DSome), vec![Task::Data(&**value)]),
        Data::Sequence(items) => (Shell::Sequence, items.iter().map(Task::Data).collect()),
        Data::EltSequence(elts) => (Shell::Sequence, elts.iter().map(Task::Elt).collect()),
        Data::Instruction(instruction) => enter_instruction(instruction),
        Data::LambdaRec(body) => (Shell::bare(Prim::DLambdaRec), vec![Task::Code(body)]),
        Data::Constant(hash) => (
            Shell::bare(Prim::DConstant).leading(Micheline::string(hash.text())),
            Vec::new(),
        ),
    }
}

fn enter_comparable<'a>(
    node: &'a ComparableNode,
    annots: &Annotations,
) -> (Shell, Vec<Task<'a>>) {
    let (prim, args) = match node {
        ComparableNode::Unit => (Prim::TUnit, vec![]),
        ComparableNode::Never => (Prim::TNever, vec![]),
        ComparableNode::Bool => (Prim::TBool, vec![]),
        ComparableNode::Int => (Prim::TInt, vec![]),
        ComparableNode::Nat => (Prim::TNat, vec![]),
        ComparableNode::String => (Prim::TString, vec![]),
        ComparableNode::ChainId => (Prim::TChainId, vec![]),
        ComparableNode::Bytes => (Prim::TBytes, vec![]),
        ComparableNode::Mutez => (Prim::TMutez, vec![]),
        ComparableNode::KeyHash => (Prim::TKeyHash, vec![]),
        ComparableNode::Key => (Prim::TKey, vec![]),
        ComparableNode::Signature => (Prim::TSignature, vec![]),
        ComparableNode::Timestamp => (Prim::TTimestamp, vec![]),
        ComparableNode::Address => (Prim::TAddress, vec![]),
        ComparableNode::TxRollupL2Address => (Prim::TTxRollupL2Address, vec![]),
        ComparableNode::Option(inner) => (Prim::TOption, vec![comparable(inner)]),
        ComparableNode::Or(left, right) => (Prim::TOr, vec![comparable(left), comparable(right)]),
        ComparableNode::Pair(items) => (Prim::TPair, items.iter().map(comparable).collect()),
    };
    (Shell::prim(prim, annots), args)
}

fn enter_type(ty: &Type) -> (Shell, Vec<Task<'_>>) {
    let (prim, args) = match &ty.node {
        TypeNode::Comparable(node) => return enter_comparable(node, &ty.annots),
        TypeNode::Option(inner) => (Prim::TOption, vec![Task::Type(&**inner)]),
        TypeNode::List(inner) => (Prim::TList, vec![Task::Type(&**inner)]),
        TypeNode::Set(key) => (Prim::TSet, vec![comparable(key)]),
        TypeNode::Operation => (Prim::TOperation, vec![]),
        TypeNode::Contract(inner) => (Prim::TContract, vec![Task::Type(&**inner)]),
        TypeNode::Ticket(inner) => (Prim::TTicket, vec![comparable(inner)]),
        TypeNode::Pair(items) => (Prim::TPair, items.iter().map(Task::Type).collect()),
        TypeNode::Or(left, right) => (Prim::TOr, vec![Task::Type(&**left), Task::Type(&**right)]),
        TypeNode::Lambda(parameter, ret) => (
            Prim::TLambda,
            vec![Task::Type(&**parameter), Task::Type(&**ret)],
        ),
        TypeNode::Map(key, value) => (Prim::TMap, vec![comparable(key), Task::Type(&**value)]),
        TypeNode::BigMap(key, value) => {
            (Prim::TBigMap, vec![comparable(key), Task::Type(&**value)])
        }
        TypeNode::Bls12381G1 => (Prim::TBls12381G1, vec![]),
        TypeNode::Bls12381G2 => (Prim::TBls12381G2, vec![]),
        TypeNode::Bls12381Fr => (Prim::TBls12381Fr, vec![]),
        TypeNode::SaplingState(memo) => {
            return (Shell::prim(Prim::TSaplingState, &ty.annots).leading(nat(memo)), vec![])
        }
        TypeNode::SaplingTransaction(memo) => {
            return (
                Shell::prim(Prim::TSaplingTransaction, &ty.annots).leading(nat(memo)),
                vec![],
            )
        }
        TypeNode::SaplingTransactionDeprecated(memo) => {
            return (
                Shell::prim(Prim::TSaplingTransactionDeprecated, &ty.annots).leading(nat(memo)),
                vec![],
            )
        }
        TypeNode::Chest => (Prim::TChest, vec![]),
        TypeNode::ChestKey => (Prim::TChestKey, vec![]),
    };
    (Shell::prim(prim, &ty.annots), args)
}

fn enter_instruction(instruction: &Instruction) -> (Shell, Vec<Task<'_>>) {
    let (shell, args) = match instruction {
        Instruction::Sequence(items) => {
            return (Shell::Sequence, items.iter().map(Task::Instruction).collect())
        }
        Instruction::Simple { op, annots } => (Shell::prim(op.prim(), annots), vec![]),
        Instruction::Counted { op, n, annots } => {
            let shell = Shell::prim(op.prim(), annots);
            match n {
                Some(n) => (shell.leading(nat(n)), vec![]),
                None => (shell, vec![]),
            }
        }
        Instruction::Typed { op, ty, annots } => {
            (Shell::prim(op.prim(), annots), vec![Task::Type(ty)])
        }
        Instruction::EmptySet { key, annots } => {
            (Shell::prim(Prim::IEmptySet, annots), vec![comparable(key)])
        }
        Instruction::EmptyMap {
            op,
            key,
            value,
            annots,
        } => (
            Shell::prim(op.prim(), annots),
            vec![comparable(key), Task::Type(value)],
        ),
        Instruction::Push { ty, value, annots } => (
            Shell::prim(Prim::IPush, annots),
            vec![Task::Type(ty), Task::Data(&**value)],
        ),
        Instruction::Block { op, body, annots } => {
            (Shell::prim(op.prim(), annots), vec![Task::Code(body)])
        }
        Instruction::Dip { n, body, annots } => {
            let shell = Shell::prim(Prim::IDip, annots);
            let shell = match n {
                Some(n) => shell.leading(nat(n)),
                None => shell,
            };
            (shell, vec![Task::Code(body)])
        }
        Instruction::Branch {
            op,
            then,
            otherwise,
            annots,
        } => (
            Shell::prim(op.prim(), annots),
            vec![Task::Code(then), Task::Code(otherwise)],
        ),
        Instruction::Lambda {
            op,
            parameter,
            ret,
            body,
            annots,
        } => (
            Shell::prim(op.prim(), annots),
            vec![Task::Type(parameter), Task::Type(ret), Task::Code(body)],
        ),
        Instruction::CreateContract { script, annots } => (
            Shell::prim(Prim::ICreateContract, annots),
            vec![Task::Script(&**script)],
        ),
        Instruction::View { name, ret, annots } => (
            Shell::prim(Prim::IView, annots).leading(Micheline::string(name.clone())),
            vec![Task::Type(ret)],
        ),
        Instruction::Emit { ty, annots } => (
            Shell::prim(Prim::IEmit, annots),
            ty.iter().map(Task::Type).collect(),
        ),
        Instruction::SaplingEmptyState { memo_size, annots } => (
            Shell::prim(Prim::ISaplingEmptyState, annots).leading(nat(memo_size)),
            vec![],
        ),
    };
    (shell, args)
}

impl ToMicheline for Data {
    fn to_micheline(&self) -> Micheline {
        lower(Task::Data(self))
    }
}

impl ToMicheline for ComparableType {
    fn to_micheline(&self) -> Micheline {
        lower(comparable(self))
    }
}

impl ToMicheline for Type {
    fn to_micheline(&self) -> Micheline {
        lower(Task::Type(self))
    }
}

impl ToMicheline for Instruction {
    fn to_micheline(&self) -> Micheline {
        lower(Task::Instruction(self))
    }
}

impl ToMicheline for ViewDefinition {
    fn to_micheline(&self) -> Micheline {
        lower(Task::View(self))
    }
}

impl ToMicheline for Script {
    fn to_micheline(&self) -> Micheline {
        lower(Task::Script(self))
    }
}

impl ToMicheline for Michelson {
    fn to_micheline(&self) -> Micheline {
        match self {
            Michelson::Data(data) => data.to_micheline(),
            Michelson::Type(ty) => ty.to_micheline(),
            Michelson::Instruction(instruction) => instruction.to_micheline(),
            Michelson::Script(script) => script.to_micheline(),
        }
    }
}
