//! Michelson instructions.
//!
//! Instructions are grouped by argument shape. Each group has its own closed
//! op enum, so an instruction can only be built with the arguments its
//! primitive takes.

use crate::annotation::Annotations;
use crate::data::{Data, Nat};
use crate::prim::Prim;
use crate::script::Script;
use crate::types::{ComparableType, Type};

macro_rules! op_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $prim:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn prim(self) -> Prim {
                match self {
                    $($name::$variant => Prim::$prim,)+
                }
            }
        }

        impl TryFrom<Prim> for $name {
            type Error = Prim;

            fn try_from(prim: Prim) -> Result<Self, Prim> {
                match prim {
                    $(Prim::$prim => Ok($name::$variant),)+
                    other => Err(other),
                }
            }
        }
    };
}

op_enum! {
    /// Instructions without arguments.
    SimpleOp {
        Pack => IPack,
        Blake2b => IBlake2b,
        Sha256 => ISha256,
        Sha512 => ISha512,
        Abs => IAbs,
        Add => IAdd,
        Amount => IAmount,
        And => IAnd,
        Balance => IBalance,
        Car => ICar,
        Cdr => ICdr,
        CheckSignature => ICheckSignature,
        Compare => ICompare,
        Concat => IConcat,
        Cons => ICons,
        CreateAccount => ICreateAccount,
        ImplicitAccount => IImplicitAccount,
        Ediv => IEdiv,
        Eq => IEq,
        Exec => IExec,
        Failwith => IFailwith,
        Ge => IGe,
        Gt => IGt,
        HashKey => IHashKey,
        Int => IInt,
        Le => ILe,
        Lsl => ILsl,
        Lsr => ILsr,
        Lt => ILt,
        Mem => IMem,
        Mul => IMul,
        Neg => INeg,
        Neq => INeq,
        Not => INot,
        Now => INow,
        Or => IOr,
        Size => ISize,
        Some => ISome,
        Source => ISource,
        Sender => ISender,
        SelfContract => ISelf,
        StepsToQuota => IStepsToQuota,
        Sub => ISub,
        Swap => ISwap,
        TransferTokens => ITransferTokens,
        SetDelegate => ISetDelegate,
        Unit => IUnit,
        Xor => IXor,
        Address => IAddress,
        IsNat => IIsNat,
        Rename => IRename,
        Slice => ISlice,
        Apply => IApply,
        ChainId => IChainId,
        Level => ILevel,
        SelfAddress => ISelfAddress,
        Never => INever,
        VotingPower => IVotingPower,
        TotalVotingPower => ITotalVotingPower,
        Keccak => IKeccak,
        Sha3 => ISha3,
        PairingCheck => IPairingCheck,
        SaplingVerifyUpdate => ISaplingVerifyUpdate,
        TicketDeprecated => ITicketDeprecated,
        ReadTicket => IReadTicket,
        SplitTicket => ISplitTicket,
        JoinTickets => IJoinTickets,
        GetAndUpdate => IGetAndUpdate,
        OpenChest => IOpenChest,
        SubMutez => ISubMutez,
        MinBlockTime => IMinBlockTime,
        Ticket => ITicket,
        Bytes => IBytes,
        Nat => INat,
    }
}

op_enum! {
    /// Instructions taking an optional count.
    CountedOp {
        Drop => IDrop,
        Dup => IDup,
        Dig => IDig,
        Dug => IDug,
        Pair => IPair,
        Unpair => IUnpair,
        Get => IGet,
        Update => IUpdate,
    }
}

op_enum! {
    /// Instructions taking one type.
    TypedOp {
        Unpack => IUnpack,
        Nil => INil,
        None => INone,
        Left => ILeft,
        Right => IRight,
        Contract => IContract,
        Cast => ICast,
    }
}

op_enum! {
    /// Empty map constructors.
    MapOp {
        EmptyMap => IEmptyMap,
        EmptyBigMap => IEmptyBigMap,
    }
}

op_enum! {
    /// Instructions taking one code block.
    BlockOp {
        Iter => IIter,
        Map => IMap,
        Loop => ILoop,
        LoopLeft => ILoopLeft,
    }
}

op_enum! {
    /// Conditionals with two code blocks.
    BranchOp {
        If => IIf,
        IfCons => IIfCons,
        IfLeft => IIfLeft,
        IfNone => IIfNone,
    }
}

op_enum! {
    LambdaOp {
        Lambda => ILambda,
        LambdaRec => ILambdaRec,
    }
}

/// A Michelson instruction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Instruction {
    Sequence(Vec<Instruction>),
    Simple {
        op: SimpleOp,
        annots: Annotations,
    },
    Counted {
        op: CountedOp,
        n: Option<Nat>,
        annots: Annotations,
    },
    Typed {
        op: TypedOp,
        ty: Type,
        annots: Annotations,
    },
    EmptySet {
        key: ComparableType,
        annots: Annotations,
    },
    EmptyMap {
        op: MapOp,
        key: ComparableType,
        value: Type,
        annots: Annotations,
    },
    Push {
        ty: Type,
        value: Box<Data>,
        annots: Annotations,
    },
    Block {
        op: BlockOp,
        body: Vec<Instruction>,
        annots: Annotations,
    },
    Dip {
        n: Option<Nat>,
        body: Vec<Instruction>,
        annots: Annotations,
    },
    Branch {
        op: BranchOp,
        then: Vec<Instruction>,
        otherwise: Vec<Instruction>,
        annots: Annotations,
    },
    Lambda {
        op: LambdaOp,
        parameter: Type,
        ret: Type,
        body: Vec<Instruction>,
        annots: Annotations,
    },
    CreateContract {
        script: Box<Script>,
        annots: Annotations,
    },
    View {
        name: String,
        ret: Type,
        annots: Annotations,
    },
    Emit {
        ty: Option<Type>,
        annots: Annotations,
    },
    SaplingEmptyState {
        memo_size: Nat,
        annots: Annotations,
    },
}

impl Instruction {
    pub fn simple(op: SimpleOp) -> Self {
        Instruction::Simple {
            op,
            annots: Annotations::new(),
        }
    }

    pub fn counted(op: CountedOp, n: Option<u64>) -> Self {
        Instruction::Counted {
            op,
            n: n.map(Nat::from),
            annots: Annotations::new(),
        }
    }

    /// The primitive this instruction is written with; `None` for sequences.
    pub fn prim(&self) -> Option<Prim> {
        Some(match self {
            Instruction::Sequence(_) => return None,
            Instruction::Simple { op, .. } => op.prim(),
            Instruction::Counted { op, .. } => op.prim(),
            Instruction::Typed { op, .. } => op.prim(),
            Instruction::EmptySet { .. } => Prim::IEmptySet,
            Instruction::EmptyMap { op, .. } => op.prim(),
            Instruction::Push { .. } => Prim::IPush,
            Instruction::Block { op, .. } => op.prim(),
            Instruction::Dip { .. } => Prim::IDip,
            Instruction::Branch { op, .. } => op.prim(),
            Instruction::Lambda { op, .. } => op.prim(),
            Instruction::CreateContract { .. } => Prim::ICreateContract,
            Instruction::View { .. } => Prim::IView,
            Instruction::Emit { .. } => Prim::IEmit,
            Instruction::SaplingEmptyState { .. } => Prim::ISaplingEmptyState,
        })
    }

    pub fn annots(&self) -> Option<&Annotations> {
        match self {
            Instruction::Sequence(_) => None,
            Instruction::Simple { annots, .. }
            | Instruction::Counted { annots, .. }
            | Instruction::Typed { annots, .. }
            | Instruction::EmptySet { annots, .. }
            | Instruction::EmptyMap { annots, .. }
            | Instruction::Push { annots, .. }
            | Instruction::Block { annots, .. }
            | Instruction::Dip { annots, .. }
            | Instruction::Branch { annots, .. }
            | Instruction::Lambda { annots, .. }
            | Instruction::CreateContract { annots, .. }
            | Instruction::View { annots, .. }
            | Instruction::Emit { annots, .. }
            | Instruction::SaplingEmptyState { annots, .. } => Some(annots),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prim::{Shape, PRIMITIVES};

    fn covered_by(shape: Shape, prim: Prim) -> bool {
        match shape {
            Shape::Simple => SimpleOp::try_from(prim).is_ok(),
            Shape::Counted => CountedOp::try_from(prim).is_ok(),
            Shape::Typed => TypedOp::try_from(prim).is_ok(),
            Shape::EmptyMap => MapOp::try_from(prim).is_ok(),
            Shape::Block => BlockOp::try_from(prim).is_ok(),
            Shape::Branch => BranchOp::try_from(prim).is_ok(),
            Shape::Lambda => LambdaOp::try_from(prim).is_ok(),
            Shape::EmptySet => prim == Prim::IEmptySet,
            Shape::Push => prim == Prim::IPush,
            Shape::Dip => prim == Prim::IDip,
            Shape::CreateContract => prim == Prim::ICreateContract,
            Shape::View => prim == Prim::IView,
            Shape::Emit => prim == Prim::IEmit,
            Shape::SaplingEmptyState => prim == Prim::ISaplingEmptyState,
        }
    }

    #[test]
    fn test_every_instruction_has_an_op() {
        for info in PRIMITIVES {
            if let Some(shape) = info.prim.shape() {
                assert!(covered_by(shape, info.prim), "{}", info.name);
            }
        }
    }

    #[test]
    fn test_ops_agree_with_table() {
        for op in SimpleOp::ALL {
            assert_eq!(op.prim().shape(), Some(Shape::Simple), "{}", op.prim());
        }
        for op in CountedOp::ALL {
            assert_eq!(op.prim().shape(), Some(Shape::Counted), "{}", op.prim());
        }
        for op in TypedOp::ALL {
            assert_eq!(op.prim().shape(), Some(Shape::Typed), "{}", op.prim());
        }
        for op in BlockOp::ALL {
            assert_eq!(op.prim().shape(), Some(Shape::Block), "{}", op.prim());
        }
        for op in BranchOp::ALL {
            assert_eq!(op.prim().shape(), Some(Shape::Branch), "{}", op.prim());
        }
    }

    #[test]
    fn test_prim_of_instruction() {
        let drop = Instruction::counted(CountedOp::Drop, Some(2));
        assert_eq!(drop.prim(), Some(Prim::IDrop));
        assert!(drop.annots().unwrap().is_empty());
        assert_eq!(Instruction::Sequence(vec![]).prim(), None);
    }
}
