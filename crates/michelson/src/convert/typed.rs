//! Generic to typed conversion rules.
//!
//! The input is walked with an explicit work stack. Entering a node resolves
//! its primitive, checks it belongs to the family the parent expects,
//! validates arity and annotations through [`Args`] and queues the arguments.
//! Once the arguments are converted the node is assembled from their values.

use super::args::Args;
use crate::annotation::Annotations;
use crate::data::{Data, Elt, Nat};
use crate::error::{Context, ConversionError, Result};
use crate::instruction::{
    BlockOp, BranchOp, CountedOp, Instruction, LambdaOp, MapOp, SimpleOp, TypedOp,
};
use crate::prim::{Family, Prim, Shape};
use crate::script::{Script, ViewDefinition};
use crate::types::{ComparableNode, ComparableType, Type, TypeNode};
use tzenc_core::Kind;
use tzenc_micheline::{Literal, Micheline, PrimitiveApplication};

/// A converted node waiting for its parent.
enum Value {
    Data(Data),
    Elt(Elt),
    Type(Type),
    Comparable(ComparableType),
    Instruction(Instruction),
    Code(Vec<Instruction>),
    Script(Script),
}

impl Value {
    fn into_data(self) -> Option<Data> {
        match self {
            Value::Data(data) => Some(data),
            _ => None,
        }
    }

    fn into_elt(self) -> Option<Elt> {
        match self {
            Value::Elt(elt) => Some(elt),
            _ => None,
        }
    }

    fn into_type(self) -> Option<Type> {
        match self {
            Value::Type(ty) => Some(ty),
            _ => None,
        }
    }

    fn into_comparable(self) -> Option<ComparableType> {
        match self {
            Value::Comparable(ty) => Some(ty),
            _ => None,
        }
    }

    fn into_instruction(self) -> Option<Instruction> {
        match self {
            Value::Instruction(instruction) => Some(instruction),
            _ => None,
        }
    }

    fn into_code(self) -> Option<Vec<Instruction>> {
        match self {
            Value::Code(code) => Some(code),
            _ => None,
        }
    }

    fn into_script(self) -> Option<Script> {
        match self {
            Value::Script(script) => Some(script),
            _ => None,
        }
    }
}

enum Task<'a> {
    Data(&'a Micheline),
    Elt(&'a Micheline),
    Type(&'a Micheline),
    Comparable(&'a Micheline),
    Instruction(&'a Micheline),
    /// A sequence already checked to be a code block.
    Code(&'a Micheline),
    Script(&'a Micheline),
    Assemble(Pending<'a>),
}

/// Result of entering a node.
enum Step<'a> {
    Done(Value),
    Descend(Build, Vec<Task<'a>>),
}

/// A node whose arguments are queued.
struct Pending<'a> {
    node: &'a Micheline,
    count: usize,
    build: Build,
}

/// How to assemble a node once its arguments are converted.
enum Build {
    Pair,
    Left,
    Right,
    Some,
    LambdaRec,
    DataSequence,
    EltSequence,
    Elt,
    DataInstruction,
    Type(Prim, Annotations),
    Comparable,
    Code,
    InstructionSequence,
    Typed(TypedOp, Annotations),
    EmptySet(Annotations),
    EmptyMap(MapOp, Annotations),
    Push(Annotations),
    Block(BlockOp, Annotations),
    Dip(Option<Nat>, Annotations),
    Branch(BranchOp, Annotations),
    Lambda(LambdaOp, Annotations),
    CreateContract(Annotations),
    View(String, Annotations),
    Emit(Annotations),
    Script(Vec<Section>),
}

/// Script sections in source order.
enum Section {
    Parameter(Annotations),
    Storage,
    Code,
    View(String),
}

impl Section {
    fn prim(&self) -> Prim {
        match self {
            Section::Parameter(_) => Prim::KParameter,
            Section::Storage => Prim::KStorage,
            Section::Code => Prim::KCode,
            Section::View(_) => Prim::KView,
        }
    }
}

/// Arguments that do not fit what was queued for them.
fn malformed(node: &Micheline) -> ConversionError {
    let prim = node
        .as_primitive_application()
        .map_or("{}", |app| app.prim.as_str());
    ConversionError::invalid(prim, "malformed arguments", node)
}

fn walk<'a>(root: Task<'a>, node: &'a Micheline) -> Result<Value> {
    let mut work = vec![root];
    let mut done: Vec<Value> = Vec::new();

    while let Some(task) = work.pop() {
        let (node, step) = match task {
            Task::Data(node) => (node, enter_data(node)?),
            Task::Elt(node) => (node, enter_elt(node)?),
            Task::Type(node) => (node, enter_type(node)?),
            Task::Comparable(node) => (node, enter_comparable(node)?),
            Task::Instruction(node) => (node, enter_instruction(node)?),
            Task::Code(node) => (node, enter_code(node)?),
            Task::Script(node) => (node, enter_script(node)?),
            Task::Assemble(pending) => {
                let value = pending.assemble(&mut done)?;
                done.push(value);
                continue;
            }
        };

        match step {
            Step::Done(value) => done.push(value),
            Step::Descend(build, args) => {
                work.push(Task::Assemble(Pending {
                    node,
                    count: args.len(),
                    build,
                }));
                work.extend(args.into_iter().rev());
            }
        }
    }

    match (done.pop(), done.is_empty()) {
        (Some(value), true) => Ok(value),
        _ => Err(malformed(node)),
    }
}

pub(crate) fn data(node: &Micheline) -> Result<Data> {
    walk(Task::Data(node), node)?
        .into_data()
        .ok_or_else(|| malformed(node))
}

pub(crate) fn ty(node: &Micheline) -> Result<Type> {
    walk(Task::Type(node), node)?
        .into_type()
        .ok_or_else(|| malformed(node))
}

pub(crate) fn comparable(node: &Micheline) -> Result<ComparableType> {
    walk(Task::Comparable(node), node)?
        .into_comparable()
        .ok_or_else(|| malformed(node))
}

pub(crate) fn instruction(node: &Micheline) -> Result<Instruction> {
    walk(Task::Instruction(node), node)?
        .into_instruction()
        .ok_or_else(|| malformed(node))
}

pub(crate) fn script(node: &Micheline) -> Result<Script> {
    walk(Task::Script(node), node)?
        .into_script()
        .ok_or_else(|| malformed(node))
}

/// Resolve the primitive of `app`, reporting unknown names in `context`.
fn resolve(app: &PrimitiveApplication, context: Context, node: &Micheline) -> Result<Prim> {
    Prim::from_name(&app.prim).map_err(|_| ConversionError::unknown(&app.prim, context, node))
}

fn enter_data(node: &Micheline) -> Result<Step<'_>> {
    let app = match node {
        Micheline::Literal(Literal::Int(value)) => return leaf(Data::Int(value.clone())),
        Micheline::Literal(Literal::String(value)) => return leaf(Data::String(value.clone())),
        Micheline::Literal(Literal::Bytes(value)) => return leaf(Data::Bytes(value.clone())),
        Micheline::Sequence(items) => return enter_data_sequence(items, node),
        Micheline::PrimitiveApplication(app) => app,
    };

    let prim = resolve(app, Context::Data, node)?;
    match prim.family() {
        Family::Data => {}
        Family::Instruction(_) => {
            return Ok(Step::Descend(
                Build::DataInstruction,
                vec![Task::Instruction(node)],
            ))
        }
        Family::Type | Family::Keyword => {
            return Err(ConversionError::unknown(&app.prim, Context::Data, node))
        }
    }

    let args = Args::check(prim, app, node)?;
    let (build, tasks) = match prim {
        Prim::DUnit => return leaf(Data::Unit),
        Prim::DTrue => return leaf(Data::True),
        Prim::DFalse => return leaf(Data::False),
        Prim::DNone => return leaf(Data::None),
        Prim::DPair => (Build::Pair, args.all().iter().map(Task::Data).collect()),
        Prim::DLeft => (Build::Left, vec![Task::Data(args.first()?)]),
        Prim::DRight => (Build::Right, vec![Task::Data(args.first()?)]),
        Prim::DSome => (Build::Some, vec![Task::Data(args.first()?)]),
        Prim::DElt => return Err(args.invalid("Elt outside of a map literal")),
        Prim::DLambdaRec => (Build::LambdaRec, vec![block(&args, args.first()?)?]),
        Prim::DConstant => {
            let hash = args.string(args.first()?)?;
            let hash = Kind::ScriptExprHash
                .parse(&hash)
                .map_err(|err| args.invalid(err.to_string()))?;
            return leaf(Data::Constant(hash));
        }
        _ => return Err(ConversionError::unknown(&app.prim, Context::Data, node)),
    };
    Ok(Step::Descend(build, tasks))
}

fn leaf<'a>(data: Data) -> Result<Step<'a>> {
    Ok(Step::Done(Value::Data(data)))
}

/// Sequences are maps when they hold `Elt`s, code when they hold
/// instructions, and plain lists otherwise.
fn enter_data_sequence<'a>(items: &'a [Micheline], node: &Micheline) -> Result<Step<'a>> {
    if items.is_empty() {
        return leaf(Data::Sequence(Vec::new()));
    }

    let is_elt = |item: &Micheline| item.is_primitive_application(Prim::DElt.name());
    if items.iter().any(is_elt) {
        if !items.iter().all(is_elt) {
            return Err(ConversionError::InvalidSequence {
                node: node.compact().to_string(),
            });
        }
        return Ok(Step::Descend(
            Build::EltSequence,
            items.iter().map(Task::Elt).collect(),
        ));
    }

    Ok(Step::Descend(
        Build::DataSequence,
        items.iter().map(Task::Data).collect(),
    ))
}

fn data_sequence(items: Vec<Data>) -> Data {
    let is_code = |item: &Data| match item {
        Data::Instruction(_) => true,
        Data::Sequence(items) => items.is_empty(),
        _ => false,
    };
    let has_instruction = items.iter().any(|item| matches!(item, Data::Instruction(_)));

    if has_instruction && items.iter().all(is_code) {
        let code = items
            .into_iter()
            .map(|item| match item {
                Data::Instruction(instruction) => instruction,
                _ => Instruction::Sequence(Vec::new()),
            })
            .collect();
        Data::Instruction(Instruction::Sequence(code))
    } else {
        Data::Sequence(items)
    }
}

fn enter_elt(node: &Micheline) -> Result<Step<'_>> {
    let app = match node {
        Micheline::PrimitiveApplication(app) => app,
        _ => return Err(ConversionError::unexpected(Context::Data, node)),
    };
    let args = Args::check(Prim::DElt, app, node)?;
    Ok(Step::Descend(
        Build::Elt,
        vec![Task::Data(args.first()?), Task::Data(args.second()?)],
    ))
}

fn enter_type(node: &Micheline) -> Result<Step<'_>> {
    let app = match node {
        Micheline::PrimitiveApplication(app) => app,
        _ => return Err(ConversionError::unexpected(Context::Type, node)),
    };

    let prim = resolve(app, Context::Type, node)?;
    if prim.family() != Family::Type {
        return Err(ConversionError::unknown(&app.prim, Context::Type, node));
    }

    let args = Args::check(prim, app, node)?;
    let converted = match prim {
        Prim::TUnit => ComparableNode::Unit.into(),
        Prim::TNever => ComparableNode::Never.into(),
        Prim::TBool => ComparableNode::Bool.into(),
        Prim::TInt => ComparableNode::Int.into(),
        Prim::TNat => ComparableNode::Nat.into(),
        Prim::TString => ComparableNode::String.into(),
        Prim::TChainId => ComparableNode::ChainId.into(),
        Prim::TBytes => ComparableNode::Bytes.into(),
        Prim::TMutez => ComparableNode::Mutez.into(),
        Prim::TKeyHash => ComparableNode::KeyHash.into(),
        Prim::TKey => ComparableNode::Key.into(),
        Prim::TSignature => ComparableNode::Signature.into(),
        Prim::TTimestamp => ComparableNode::Timestamp.into(),
        Prim::TAddress => ComparableNode::Address.into(),
        Prim::TTxRollupL2Address => ComparableNode::TxRollupL2Address.into(),

        Prim::TOperation => Type::new(TypeNode::Operation),
        Prim::TBls12381G1 => Type::new(TypeNode::Bls12381G1),
        Prim::TBls12381G2 => Type::new(TypeNode::Bls12381G2),
        Prim::TBls12381Fr => Type::new(TypeNode::Bls12381Fr),
        Prim::TSaplingState => Type::new(TypeNode::SaplingState(args.nat(args.first()?)?)),
        Prim::TSaplingTransaction => {
            Type::new(TypeNode::SaplingTransaction(args.nat(args.first()?)?))
        }
        Prim::TSaplingTransactionDeprecated => Type::new(TypeNode::SaplingTransactionDeprecated(
            args.nat(args.first()?)?,
        )),
        Prim::TChest => Type::new(TypeNode::Chest),
        Prim::TChestKey => Type::new(TypeNode::ChestKey),
        _ => return enter_composite_type(args),
    };

    Ok(Step::Done(Value::Type(
        converted.with_annots(args.into_annots()),
    )))
}

/// Types with type arguments.
fn enter_composite_type(args: Args<'_>) -> Result<Step<'_>> {
    let tasks = match args.prim {
        Prim::TOption | Prim::TList | Prim::TContract => vec![Task::Type(args.first()?)],
        Prim::TOr | Prim::TLambda => vec![Task::Type(args.first()?), Task::Type(args.second()?)],
        Prim::TPair => args.all().iter().map(Task::Type).collect(),
        Prim::TSet | Prim::TTicket => vec![Task::Comparable(args.first()?)],
        Prim::TMap | Prim::TBigMap => vec![
            Task::Comparable(args.first()?),
            Task::Type(args.second()?),
        ],
        _ => {
            return Err(ConversionError::unknown(
                args.prim.name(),
                Context::Type,
                args.node,
            ))
        }
    };
    Ok(Step::Descend(Build::Type(args.prim, args.into_annots()), tasks))
}

fn enter_comparable(node: &Micheline) -> Result<Step<'_>> {
    if node.as_primitive_application().is_none() {
        return Err(ConversionError::unexpected(Context::ComparableType, node));
    }
    Ok(Step::Descend(Build::Comparable, vec![Task::Type(node)]))
}

fn enter_instruction(node: &Micheline) -> Result<Step<'_>> {
    let app = match node {
        Micheline::Sequence(items) => {
            return Ok(Step::Descend(
                Build::InstructionSequence,
                items.iter().map(Task::Instruction).collect(),
            ))
        }
        Micheline::PrimitiveApplication(app) => app,
        Micheline::Literal(_) => {
            return Err(ConversionError::unexpected(Context::Instruction, node))
        }
    };

    let prim = resolve(app, Context::Instruction, node)?;
    let shape = match prim.family() {
        Family::Instruction(shape) => shape,
        _ => return Err(ConversionError::unknown(&app.prim, Context::Instruction, node)),
    };

    let args = Args::check(prim, app, node)?;
    let annots = args.annots();
    let (build, tasks) = match shape {
        Shape::Simple => {
            return finished(Instruction::Simple {
                op: op::<SimpleOp>(&args)?,
                annots,
            })
        }
        Shape::Counted => {
            return finished(Instruction::Counted {
                op: op::<CountedOp>(&args)?,
                n: args.first_or_none().map(|arg| args.nat(arg)).transpose()?,
                annots,
            })
        }
        Shape::Typed => (
            Build::Typed(op(&args)?, annots),
            vec![Task::Type(args.first()?)],
        ),
        Shape::EmptySet => (
            Build::EmptySet(annots),
            vec![Task::Comparable(args.first()?)],
        ),
        Shape::EmptyMap => (
            Build::EmptyMap(op(&args)?, annots),
            vec![
                Task::Comparable(args.first()?),
                Task::Type(args.second()?),
            ],
        ),
        Shape::Push => (
            Build::Push(annots),
            vec![Task::Type(args.first()?), Task::Data(args.second()?)],
        ),
        Shape::Block => (
            Build::Block(op(&args)?, annots),
            vec![block(&args, args.first()?)?],
        ),
        Shape::Dip => {
            let (n, body) = if args.len() == 2 {
                (Some(args.nat(args.first()?)?), args.second()?)
            } else {
                (None, args.first()?)
            };
            (Build::Dip(n, annots), vec![block(&args, body)?])
        }
        Shape::Branch => (
            Build::Branch(op(&args)?, annots),
            vec![
                block(&args, args.first()?)?,
                block(&args, args.second()?)?,
            ],
        ),
        Shape::Lambda => (
            Build::Lambda(op(&args)?, annots),
            vec![
                Task::Type(args.first()?),
                Task::Type(args.second()?),
                block(&args, args.third()?)?,
            ],
        ),
        Shape::CreateContract => (
            Build::CreateContract(annots),
            vec![Task::Script(args.first()?)],
        ),
        Shape::View => (
            Build::View(args.string(args.first()?)?, annots),
            vec![Task::Type(args.second()?)],
        ),
        Shape::Emit => match args.first_or_none() {
            Some(ty) => (Build::Emit(annots), vec![Task::Type(ty)]),
            None => return finished(Instruction::Emit { ty: None, annots }),
        },
        Shape::SaplingEmptyState => {
            return finished(Instruction::SaplingEmptyState {
                memo_size: args.nat(args.first()?)?,
                annots,
            })
        }
    };
    Ok(Step::Descend(build, tasks))
}

fn finished<'a>(instruction: Instruction) -> Result<Step<'a>> {
    Ok(Step::Done(Value::Instruction(instruction)))
}

fn op<T: TryFrom<Prim, Error = Prim>>(args: &Args<'_>) -> Result<T> {
    T::try_from(args.prim).map_err(|prim| args.invalid(format!("'{prim}' has no operation")))
}

/// A code block argument: must be written as a sequence.
fn block<'a>(args: &Args<'a>, arg: &'a Micheline) -> Result<Task<'a>> {
    match arg {
        Micheline::Sequence(_) => Ok(Task::Code(arg)),
        _ => Err(args.invalid("expected a code block")),
    }
}

fn enter_code(node: &Micheline) -> Result<Step<'_>> {
    let items = node.as_sequence().ok_or_else(|| malformed(node))?;
    Ok(Step::Descend(
        Build::Code,
        items.iter().map(Task::Instruction).collect(),
    ))
}

/// Checks the section layout up front; section contents are queued.
fn enter_script(node: &Micheline) -> Result<Step<'_>> {
    let sections = node
        .as_sequence()
        .ok_or_else(|| ConversionError::script("expected a sequence of sections", node))?;

    let mut layout: Vec<Section> = Vec::new();
    let mut tasks = Vec::new();

    for section in sections {
        let app = section
            .as_primitive_application()
            .ok_or_else(|| ConversionError::script("expected a section", section))?;
        let prim = resolve(app, Context::Script, section)?;
        if prim.family() != Family::Keyword {
            return Err(ConversionError::unknown(&app.prim, Context::Script, section));
        }

        let args = Args::check(prim, app, section)?;
        if prim != Prim::KView && layout.iter().any(|seen| seen.prim() == prim) {
            return Err(ConversionError::script(
                format!("duplicate {prim} section"),
                section,
            ));
        }

        match prim {
            Prim::KParameter => {
                tasks.push(Task::Type(args.first()?));
                layout.push(Section::Parameter(args.into_annots()));
            }
            Prim::KStorage => {
                tasks.push(Task::Type(args.first()?));
                layout.push(Section::Storage);
            }
            Prim::KCode => {
                tasks.push(block(&args, args.first()?)?);
                layout.push(Section::Code);
            }
            Prim::KView => {
                let name = args.string(args.first()?)?;
                let duplicate = layout
                    .iter()
                    .any(|seen| matches!(seen, Section::View(other) if *other == name));
                if duplicate {
                    return Err(ConversionError::script(
                        format!("duplicate view '{name}'"),
                        section,
                    ));
                }
                tasks.push(Task::Type(args.second()?));
                tasks.push(Task::Type(args.third()?));
                tasks.push(block(&args, args.fourth()?)?);
                layout.push(Section::View(name));
            }
            _ => return Err(ConversionError::unknown(&app.prim, Context::Script, section)),
        }
    }

    for required in [Prim::KParameter, Prim::KStorage, Prim::KCode] {
        if !layout.iter().any(|seen| seen.prim() == required) {
            return Err(ConversionError::script(
                format!("missing {required} section"),
                node,
            ));
        }
    }

    Ok(Step::Descend(Build::Script(layout), tasks))
}

/// Converted arguments of one node, in source order.
struct Values<'a> {
    items: std::vec::IntoIter<Value>,
    node: &'a Micheline,
}

impl Values<'_> {
    fn next<T>(&mut self, take: fn(Value) -> Option<T>) -> Result<T> {
        self.items
            .next()
            .and_then(take)
            .ok_or_else(|| malformed(self.node))
    }

    fn rest<T>(&mut self, take: fn(Value) -> Option<T>) -> Result<Vec<T>> {
        let node = self.node;
        self.items
            .by_ref()
            .map(|value| take(value).ok_or_else(|| malformed(node)))
            .collect()
    }
}

impl Pending<'_> {
    fn assemble(self, done: &mut Vec<Value>) -> Result<Value> {
        let node = self.node;
        let start = done
            .len()
            .checked_sub(self.count)
            .ok_or_else(|| malformed(node))?;
        let mut args = Values {
            items: done.split_off(start).into_iter(),
            node,
        };

        let data = |data: Data| -> Result<Value> { Ok(Value::Data(data)) };
        let instruction =
            |instruction: Instruction| -> Result<Value> { Ok(Value::Instruction(instruction)) };

        match self.build {
            Build::Pair => data(Data::Pair(args.rest(Value::into_data)?)),
            Build::Left => data(Data::Left(Box::new(args.next(Value::into_data)?))),
            Build::Right => data(Data::Right(Box::new(args.next(Value::into_data)?))),
            Build::Some => data(Data::Some(Box::new(args.next(Value::into_data)?))),
            Build::LambdaRec => data(Data::LambdaRec(args.next(Value::into_code)?)),
            Build::DataSequence => data(data_sequence(args.rest(Value::into_data)?)),
            Build::EltSequence => data(Data::EltSequence(args.rest(Value::into_elt)?)),
            Build::Elt => Ok(Value::Elt(Elt {
                key: args.next(Value::into_data)?,
                value: args.next(Value::into_data)?,
            })),
            Build::DataInstruction => data(Data::Instruction(args.next(Value::into_instruction)?)),

            Build::Type(prim, annots) => {
                let ty = match prim {
                    Prim::TOption => Type::option(args.next(Value::into_type)?),
                    Prim::TOr => {
                        let left = args.next(Value::into_type)?;
                        Type::or(left, args.next(Value::into_type)?)
                    }
                    Prim::TPair => Type::pair(args.rest(Value::into_type)?),
                    Prim::TList => {
                        Type::new(TypeNode::List(Box::new(args.next(Value::into_type)?)))
                    }
                    Prim::TContract => {
                        Type::new(TypeNode::Contract(Box::new(args.next(Value::into_type)?)))
                    }
                    Prim::TSet => {
                        Type::new(TypeNode::Set(Box::new(args.next(Value::into_comparable)?)))
                    }
                    Prim::TTicket => {
                        Type::new(TypeNode::Ticket(Box::new(args.next(Value::into_comparable)?)))
                    }
                    Prim::TLambda => Type::new(TypeNode::Lambda(
                        Box::new(args.next(Value::into_type)?),
                        Box::new(args.next(Value::into_type)?),
                    )),
                    Prim::TMap => Type::new(TypeNode::Map(
                        Box::new(args.next(Value::into_comparable)?),
                        Box::new(args.next(Value::into_type)?),
                    )),
                    Prim::TBigMap => Type::new(TypeNode::BigMap(
                        Box::new(args.next(Value::into_comparable)?),
                        Box::new(args.next(Value::into_type)?),
                    )),
                    _ => return Err(malformed(node)),
                };
                Ok(Value::Type(ty.with_annots(annots)))
            }
            Build::Comparable => {
                let prim = node
                    .as_primitive_application()
                    .map_or("", |app| app.prim.as_str());
                args.next(Value::into_type)?
                    .into_comparable()
                    .map(Value::Comparable)
                    .map_err(|_| ConversionError::invalid(prim, "not a comparable type", node))
            }

            Build::Code => Ok(Value::Code(args.rest(Value::into_instruction)?)),
            Build::InstructionSequence => instruction(Instruction::Sequence(
                args.rest(Value::into_instruction)?,
            )),
            Build::Typed(op, annots) => instruction(Instruction::Typed {
                op,
                ty: args.next(Value::into_type)?,
                annots,
            }),
            Build::EmptySet(annots) => instruction(Instruction::EmptySet {
                key: args.next(Value::into_comparable)?,
                annots,
            }),
            Build::EmptyMap(op, annots) => instruction(Instruction::EmptyMap {
                op,
                key: args.next(Value::into_comparable)?,
                value: args.next(Value::into_type)?,
                annots,
            }),
            Build::Push(annots) => instruction(Instruction::Push {
                ty: args.next(Value::into_type)?,
                value: Box::new(args.next(Value::into_data)?),
                annots,
            }),
            Build::Block(op, annots) => instruction(Instruction::Block {
                op,
                body: args.next(Value::into_code)?,
                annots,
            }),
            Build::Dip(n, annots) => instruction(Instruction::Dip {
                n,
                body: args.next(Value::into_code)?,
                annots,
            }),
            Build::Branch(op, annots) => instruction(Instruction::Branch {
                op,
                then: args.next(Value::into_code)?,
                otherwise: args.next(Value::into_code)?,
                annots,
            }),
            Build::Lambda(op, annots) => instruction(Instruction::Lambda {
                op,
                parameter: args.next(Value::into_type)?,
                ret: args.next(Value::into_type)?,
                body: args.next(Value::into_code)?,
                annots,
            }),
            Build::CreateContract(annots) => instruction(Instruction::CreateContract {
                script: Box::new(args.next(Value::into_script)?),
                annots,
            }),
            Build::View(name, annots) => instruction(Instruction::View {
                name,
                ret: args.next(Value::into_type)?,
                annots,
            }),
            Build::Emit(annots) => instruction(Instruction::Emit {
                ty: Some(args.next(Value::into_type)?),
                annots,
            }),

            Build::Script(layout) => {
                let mut parameter = None;
                let mut storage = None;
                let mut code = None;
                let mut views = Vec::new();
                for section in layout {
                    match section {
                        Section::Parameter(annots) => {
                            parameter = Some((args.next(Value::into_type)?, annots))
                        }
                        Section::Storage => storage = Some(args.next(Value::into_type)?),
                        Section::Code => code = Some(args.next(Value::into_code)?),
                        Section::View(name) => views.push(ViewDefinition {
                            name,
                            input: args.next(Value::into_type)?,
                            output: args.next(Value::into_type)?,
                            code: args.next(Value::into_code)?,
                        }),
                    }
                }
                match (parameter, storage, code) {
                    (Some((parameter, parameter_annots)), Some(storage), Some(code)) => {
                        Ok(Value::Script(Script {
                            parameter,
                            parameter_annots,
                            storage,
                            code,
                            views,
                        }))
                    }
                    _ => Err(malformed(node)),
                }
            }
        }
    }
}
