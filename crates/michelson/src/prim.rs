//! Primitive definitions for Michelson.
//!
//! One table drives everything: for each primitive its binary tag, its name,
//! the family it belongs to, how many arguments it takes and which
//! annotations it accepts. Variant names carry a family prefix (`K` keyword,
//! `D` data, `T` type, `I` instruction) because `Pair`, `pair` and `PAIR`
//! are three different primitives.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a name or tag has no primitive.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UnknownPrimitive {
    #[error("unknown primitive '{0}'")]
    Name(String),

    #[error("unknown primitive tag {0}")]
    Tag(u8),
}

/// How an instruction's arguments are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// No arguments.
    Simple,
    /// An optional natural number.
    Counted,
    /// One type.
    Typed,
    /// One comparable type.
    EmptySet,
    /// A comparable key type and a value type.
    EmptyMap,
    /// A type and a value.
    Push,
    /// One code block.
    Block,
    /// An optional depth and a code block.
    Dip,
    /// Two code blocks.
    Branch,
    /// Parameter type, return type and body.
    Lambda,
    /// A whole script.
    CreateContract,
    /// A view name and a return type.
    View,
    /// An optional event type.
    Emit,
    /// A memo size.
    SaplingEmptyState,
}

/// What kind of node a primitive builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// Script sections: `parameter`, `storage`, `code`, `view`.
    Keyword,
    Data,
    Type,
    Instruction(Shape),
}

/// Accepted number of arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub min: usize,
    /// `None` means unbounded.
    pub max: Option<usize>,
}

impl Arity {
    pub const fn exactly(n: usize) -> Self {
        Self { min: n, max: Some(n) }
    }

    pub const fn between(min: usize, max: usize) -> Self {
        Self { min, max: Some(max) }
    }

    pub const fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "{max}"),
            Some(max) if max == self.min + 1 => write!(f, "{} or {max}", self.min),
            Some(max) => write!(f, "{} to {max}", self.min),
            None => write!(f, "at least {}", self.min),
        }
    }
}

/// Maximum number of annotations of each kind a primitive accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnnotationSlots {
    pub type_names: usize,
    pub variable_names: usize,
    pub field_names: usize,
}

impl AnnotationSlots {
    pub const fn new(type_names: usize, variable_names: usize, field_names: usize) -> Self {
        Self {
            type_names,
            variable_names,
            field_names,
        }
    }
}

/// Static description of a primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimInfo {
    pub prim: Prim,
    pub name: &'static str,
    pub family: Family,
    pub arity: Arity,
    pub annots: AnnotationSlots,
}

const ZERO: Arity = Arity::exactly(0);
const ONE: Arity = Arity::exactly(1);
const TWO: Arity = Arity::exactly(2);
const THREE: Arity = Arity::exactly(3);
const FOUR: Arity = Arity::exactly(4);
const ZERO_OR_ONE: Arity = Arity::between(0, 1);
const ONE_OR_TWO: Arity = Arity::between(1, 2);
const TWO_OR_MORE: Arity = Arity::at_least(2);

const NO_ANNOTS: AnnotationSlots = AnnotationSlots::new(0, 0, 0);
const FIELD: AnnotationSlots = AnnotationSlots::new(0, 0, 1);
const VAR: AnnotationSlots = AnnotationSlots::new(0, 1, 0);
const VARS: AnnotationSlots = AnnotationSlots::new(0, 2, 0);
const VAR_FIELD: AnnotationSlots = AnnotationSlots::new(0, 1, 1);
const VARS_FIELDS: AnnotationSlots = AnnotationSlots::new(0, 2, 2);
const TYPE_FIELD: AnnotationSlots = AnnotationSlots::new(1, 0, 1);
const TYPE_VAR_FIELD: AnnotationSlots = AnnotationSlots::new(1, 1, 1);
const TYPE_VAR_FIELDS: AnnotationSlots = AnnotationSlots::new(1, 1, 2);

macro_rules! primitives {
    (@family $family:ident) => { Family::$family };
    (@family $family:ident $shape:ident) => { Family::$family(Shape::$shape) };

    ($(
        $variant:ident = $tag:literal => $name:literal, $family:ident $(($shape:ident))?, $arity:expr, $annots:expr;
    )+) => {
        /// A Michelson primitive. The discriminant is the binary tag.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum Prim {
            $($variant = $tag,)+
        }

        /// Every primitive, indexed by tag.
        pub static PRIMITIVES: &[PrimInfo] = &[
            $(PrimInfo {
                prim: Prim::$variant,
                name: $name,
                family: primitives!(@family $family $($shape)?),
                arity: $arity,
                annots: $annots,
            },)+
        ];

        impl Prim {
            /// Look a primitive up by its exact, case-sensitive name.
            pub fn from_name(name: &str) -> Result<Prim, UnknownPrimitive> {
                match name {
                    $($name => Ok(Prim::$variant),)+
                    _ => Err(UnknownPrimitive::Name(name.to_string())),
                }
            }
        }
    };
}

primitives! {
    KParameter = 0 => "parameter", Keyword, ONE, FIELD;
    KStorage = 1 => "storage", Keyword, ONE, NO_ANNOTS;
    KCode = 2 => "code", Keyword, ONE, NO_ANNOTS;
    DFalse = 3 => "False", Data, ZERO, NO_ANNOTS;
    DElt = 4 => "Elt", Data, TWO, NO_ANNOTS;
    DLeft = 5 => "Left", Data, ONE, NO_ANNOTS;
    DNone = 6 => "None", Data, ZERO, NO_ANNOTS;
    DPair = 7 => "Pair", Data, TWO_OR_MORE, NO_ANNOTS;
    DRight = 8 => "Right", Data, ONE, NO_ANNOTS;
    DSome = 9 => "Some", Data, ONE, NO_ANNOTS;
    DTrue = 10 => "True", Data, ZERO, NO_ANNOTS;
    DUnit = 11 => "Unit", Data, ZERO, NO_ANNOTS;
    IPack = 12 => "PACK", Instruction(Simple), ZERO, VAR;
    IUnpack = 13 => "UNPACK", Instruction(Typed), ONE, VAR;
    IBlake2b = 14 => "BLAKE2B", Instruction(Simple), ZERO, VAR;
    ISha256 = 15 => "SHA256", Instruction(Simple), ZERO, VAR;
    ISha512 = 16 => "SHA512", Instruction(Simple), ZERO, VAR;
    IAbs = 17 => "ABS", Instruction(Simple), ZERO, VAR;
    IAdd = 18 => "ADD", Instruction(Simple), ZERO, VAR;
    IAmount = 19 => "AMOUNT", Instruction(Simple), ZERO, VAR;
    IAnd = 20 => "AND", Instruction(Simple), ZERO, VAR;
    IBalance = 21 => "BALANCE", Instruction(Simple), ZERO, VAR;
    ICar = 22 => "CAR", Instruction(Simple), ZERO, VAR_FIELD;
    ICdr = 23 => "CDR", Instruction(Simple), ZERO, VAR_FIELD;
    ICheckSignature = 24 => "CHECK_SIGNATURE", Instruction(Simple), ZERO, VAR;
    ICompare = 25 => "COMPARE", Instruction(Simple), ZERO, VAR;
    IConcat = 26 => "CONCAT", Instruction(Simple), ZERO, VAR;
    ICons = 27 => "CONS", Instruction(Simple), ZERO, VAR;
    ICreateAccount = 28 => "CREATE_ACCOUNT", Instruction(Simple), ZERO, VARS;
    ICreateContract = 29 => "CREATE_CONTRACT", Instruction(CreateContract), ONE, VARS;
    IImplicitAccount = 30 => "IMPLICIT_ACCOUNT", Instruction(Simple), ZERO, VAR;
    IDip = 31 => "DIP", Instruction(Dip), ONE_OR_TWO, NO_ANNOTS;
    IDrop = 32 => "DROP", Instruction(Counted), ZERO_OR_ONE, NO_ANNOTS;
    IDup = 33 => "DUP", Instruction(Counted), ZERO_OR_ONE, VAR;
    IEdiv = 34 => "EDIV", Instruction(Simple), ZERO, VAR;
    IEmptyMap = 35 => "EMPTY_MAP", Instruction(EmptyMap), TWO, TYPE_VAR_FIELD;
    IEmptySet = 36 => "EMPTY_SET", Instruction(EmptySet), ONE, TYPE_VAR_FIELD;
    IEq = 37 => "EQ", Instruction(Simple), ZERO, VAR;
    IExec = 38 => "EXEC", Instruction(Simple), ZERO, VAR;
    IFailwith = 39 => "FAILWITH", Instruction(Simple), ZERO, NO_ANNOTS;
    IGe = 40 => "GE", Instruction(Simple), ZERO, VAR;
    IGet = 41 => "GET", Instruction(Counted), ZERO_OR_ONE, VAR;
    IGt = 42 => "GT", Instruction(Simple), ZERO, VAR;
    IHashKey = 43 => "HASH_KEY", Instruction(Simple), ZERO, VAR;
    IIf = 44 => "IF", Instruction(Branch), TWO, NO_ANNOTS;
    IIfCons = 45 => "IF_CONS", Instruction(Branch), TWO, NO_ANNOTS;
    IIfLeft = 46 => "IF_LEFT", Instruction(Branch), TWO, NO_ANNOTS;
    IIfNone = 47 => "IF_NONE", Instruction(Branch), TWO, NO_ANNOTS;
    IInt = 48 => "INT", Instruction(Simple), ZERO, VAR;
    ILambda = 49 => "LAMBDA", Instruction(Lambda), THREE, VAR;
    ILe = 50 => "LE", Instruction(Simple), ZERO, VAR;
    ILeft = 51 => "LEFT", Instruction(Typed), ONE, TYPE_VAR_FIELDS;
    ILoop = 52 => "LOOP", Instruction(Block), ONE, NO_ANNOTS;
    ILsl = 53 => "LSL", Instruction(Simple), ZERO, VAR;
    ILsr = 54 => "LSR", Instruction(Simple), ZERO, VAR;
    ILt = 55 => "LT", Instruction(Simple), ZERO, VAR;
    IMap = 56 => "MAP", Instruction(Block), ONE, VAR;
    IMem = 57 => "MEM", Instruction(Simple), ZERO, VAR;
    IMul = 58 => "MUL", Instruction(Simple), ZERO, VAR;
    INeg = 59 => "NEG", Instruction(Simple), ZERO, VAR;
    INeq = 60 => "NEQ", Instruction(Simple), ZERO, VAR;
    INil = 61 => "NIL", Instruction(Typed), ONE, TYPE_VAR_FIELD;
    INone = 62 => "NONE", Instruction(Typed), ONE, TYPE_VAR_FIELD;
    INot = 63 => "NOT", Instruction(Simple), ZERO, VAR;
    INow = 64 => "NOW", Instruction(Simple), ZERO, VAR;
    IOr = 65 => "OR", Instruction(Simple), ZERO, VAR;
    IPair = 66 => "PAIR", Instruction(Counted), ZERO_OR_ONE, TYPE_VAR_FIELDS;
    IPush = 67 => "PUSH", Instruction(Push), TWO, VAR;
    IRight = 68 => "RIGHT", Instruction(Typed), ONE, TYPE_VAR_FIELDS;
    ISize = 69 => "SIZE", Instruction(Simple), ZERO, VAR;
    ISome = 70 => "SOME", Instruction(Simple), ZERO, TYPE_VAR_FIELD;
    ISource = 71 => "SOURCE", Instruction(Simple), ZERO, VAR;
    ISender = 72 => "SENDER", Instruction(Simple), ZERO, VAR;
    ISelf = 73 => "SELF", Instruction(Simple), ZERO, VAR_FIELD;
    IStepsToQuota = 74 => "STEPS_TO_QUOTA", Instruction(Simple), ZERO, VAR;
    ISub = 75 => "SUB", Instruction(Simple), ZERO, VAR;
    ISwap = 76 => "SWAP", Instruction(Simple), ZERO, NO_ANNOTS;
    ITransferTokens = 77 => "TRANSFER_TOKENS", Instruction(Simple), ZERO, VAR;
    ISetDelegate = 78 => "SET_DELEGATE", Instruction(Simple), ZERO, VAR;
    IUnit = 79 => "UNIT", Instruction(Simple), ZERO, TYPE_VAR_FIELD;
    IUpdate = 80 => "UPDATE", Instruction(Counted), ZERO_OR_ONE, VAR;
    IXor = 81 => "XOR", Instruction(Simple), ZERO, VAR;
    IIter = 82 => "ITER", Instruction(Block), ONE, NO_ANNOTS;
    ILoopLeft = 83 => "LOOP_LEFT", Instruction(Block), ONE, NO_ANNOTS;
    IAddress = 84 => "ADDRESS", Instruction(Simple), ZERO, VAR;
    IContract = 85 => "CONTRACT", Instruction(Typed), ONE, VAR_FIELD;
    IIsNat = 86 => "ISNAT", Instruction(Simple), ZERO, VAR;
    ICast = 87 => "CAST", Instruction(Typed), ONE, VAR;
    IRename = 88 => "RENAME", Instruction(Simple), ZERO, VAR;
    TBool = 89 => "bool", Type, ZERO, TYPE_FIELD;
    TContract = 90 => "contract", Type, ONE, TYPE_FIELD;
    TInt = 91 => "int", Type, ZERO, TYPE_FIELD;
    TKey = 92 => "key", Type, ZERO, TYPE_FIELD;
    TKeyHash = 93 => "key_hash", Type, ZERO, TYPE_FIELD;
    TLambda = 94 => "lambda", Type, TWO, TYPE_FIELD;
    TList = 95 => "list", Type, ONE, TYPE_FIELD;
    TMap = 96 => "map", Type, TWO, TYPE_FIELD;
    TBigMap = 97 => "big_map", Type, TWO, TYPE_FIELD;
    TNat = 98 => "nat", Type, ZERO, TYPE_FIELD;
    TOption = 99 => "option", Type, ONE, TYPE_FIELD;
    TOr = 100 => "or", Type, TWO, TYPE_FIELD;
    TPair = 101 => "pair", Type, TWO_OR_MORE, TYPE_FIELD;
    TSet = 102 => "set", Type, ONE, TYPE_FIELD;
    TSignature = 103 => "signature", Type, ZERO, TYPE_FIELD;
    TString = 104 => "string", Type, ZERO, TYPE_FIELD;
    TBytes = 105 => "bytes", Type, ZERO, TYPE_FIELD;
    TMutez = 106 => "mutez", Type, ZERO, TYPE_FIELD;
    TTimestamp = 107 => "timestamp", Type, ZERO, TYPE_FIELD;
    TUnit = 108 => "unit", Type, ZERO, TYPE_FIELD;
    TOperation = 109 => "operation", Type, ZERO, TYPE_FIELD;
    TAddress = 110 => "address", Type, ZERO, TYPE_FIELD;
    ISlice = 111 => "SLICE", Instruction(Simple), ZERO, VAR;
    IDig = 112 => "DIG", Instruction(Counted), ZERO_OR_ONE, NO_ANNOTS;
    IDug = 113 => "DUG", Instruction(Counted), ZERO_OR_ONE, NO_ANNOTS;
    IEmptyBigMap = 114 => "EMPTY_BIG_MAP", Instruction(EmptyMap), TWO, TYPE_VAR_FIELD;
    IApply = 115 => "APPLY", Instruction(Simple), ZERO, VAR;
    TChainId = 116 => "chain_id", Type, ZERO, TYPE_FIELD;
    IChainId = 117 => "CHAIN_ID", Instruction(Simple), ZERO, VAR;
    ILevel = 118 => "LEVEL", Instruction(Simple), ZERO, VAR;
    ISelfAddress = 119 => "SELF_ADDRESS", Instruction(Simple), ZERO, VAR;
    TNever = 120 => "never", Type, ZERO, TYPE_FIELD;
    INever = 121 => "NEVER", Instruction(Simple), ZERO, NO_ANNOTS;
    IUnpair = 122 => "UNPAIR", Instruction(Counted), ZERO_OR_ONE, VARS_FIELDS;
    IVotingPower = 123 => "VOTING_POWER", Instruction(Simple), ZERO, VAR;
    ITotalVotingPower = 124 => "TOTAL_VOTING_POWER", Instruction(Simple), ZERO, VAR;
    IKeccak = 125 => "KECCAK", Instruction(Simple), ZERO, VAR;
    ISha3 = 126 => "SHA3", Instruction(Simple), ZERO, VAR;
    IPairingCheck = 127 => "PAIRING_CHECK", Instruction(Simple), ZERO, VAR;
    TBls12381G1 = 128 => "bls12_381_g1", Type, ZERO, TYPE_FIELD;
    TBls12381G2 = 129 => "bls12_381_g2", Type, ZERO, TYPE_FIELD;
    TBls12381Fr = 130 => "bls12_381_fr", Type, ZERO, TYPE_FIELD;
    TSaplingState = 131 => "sapling_state", Type, ONE, TYPE_FIELD;
    TSaplingTransactionDeprecated = 132 => "sapling_transaction_deprecated", Type, ONE, TYPE_FIELD;
    ISaplingEmptyState = 133 => "SAPLING_EMPTY_STATE", Instruction(SaplingEmptyState), ONE, VAR;
    ISaplingVerifyUpdate = 134 => "SAPLING_VERIFY_UPDATE", Instruction(Simple), ZERO, VAR;
    TTicket = 135 => "ticket", Type, ONE, TYPE_FIELD;
    ITicketDeprecated = 136 => "TICKET_DEPRECATED", Instruction(Simple), ZERO, VAR;
    IReadTicket = 137 => "READ_TICKET", Instruction(Simple), ZERO, VAR;
    ISplitTicket = 138 => "SPLIT_TICKET", Instruction(Simple), ZERO, VAR;
    IJoinTickets = 139 => "JOIN_TICKETS", Instruction(Simple), ZERO, VAR;
    IGetAndUpdate = 140 => "GET_AND_UPDATE", Instruction(Simple), ZERO, VAR;
    TChest = 141 => "chest", Type, ZERO, TYPE_FIELD;
    TChestKey = 142 => "chest_key", Type, ZERO, TYPE_FIELD;
    IOpenChest = 143 => "OPEN_CHEST", Instruction(Simple), ZERO, VAR;
    IView = 144 => "VIEW", Instruction(View), TWO, VAR;
    KView = 145 => "view", Keyword, FOUR, NO_ANNOTS;
    DConstant = 146 => "constant", Data, ONE, NO_ANNOTS;
    ISubMutez = 147 => "SUB_MUTEZ", Instruction(Simple), ZERO, VAR;
    TTxRollupL2Address = 148 => "tx_rollup_l2_address", Type, ZERO, TYPE_FIELD;
    IMinBlockTime = 149 => "MIN_BLOCK_TIME", Instruction(Simple), ZERO, VAR;
    TSaplingTransaction = 150 => "sapling_transaction", Type, ONE, TYPE_FIELD;
    IEmit = 151 => "EMIT", Instruction(Emit), ZERO_OR_ONE, VAR_FIELD;
    DLambdaRec = 152 => "Lambda_rec", Data, ONE, NO_ANNOTS;
    ILambdaRec = 153 => "LAMBDA_REC", Instruction(Lambda), THREE, VAR;
    ITicket = 154 => "TICKET", Instruction(Simple), ZERO, VAR;
    IBytes = 155 => "BYTES", Instruction(Simple), ZERO, VAR;
    INat = 156 => "NAT", Instruction(Simple), ZERO, VAR;
}

impl Prim {
    /// Look a primitive up by its binary tag.
    pub fn from_tag(tag: u8) -> Result<Prim, UnknownPrimitive> {
        PRIMITIVES
            .get(tag as usize)
            .map(|info| info.prim)
            .ok_or(UnknownPrimitive::Tag(tag))
    }

    pub fn info(self) -> &'static PrimInfo {
        &PRIMITIVES[self as usize]
    }

    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn family(self) -> Family {
        self.info().family
    }

    pub fn arity(self) -> Arity {
        self.info().arity
    }

    pub fn annotation_slots(self) -> AnnotationSlots {
        self.info().annots
    }

    /// The argument shape, for instructions.
    pub fn shape(self) -> Option<Shape> {
        match self.family() {
            Family::Instruction(shape) => Some(shape),
            _ => None,
        }
    }
}

impl fmt::Display for Prim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Prim {
    type Err = UnknownPrimitive;

    fn from_str(s: &str) -> Result<Self, UnknownPrimitive> {
        Prim::from_name(s)
    }
}

impl TryFrom<u8> for Prim {
    type Error = UnknownPrimitive;

    fn try_from(tag: u8) -> Result<Self, UnknownPrimitive> {
        Prim::from_tag(tag)
    }
}
