//! Michelson values.

use crate::instruction::Instruction;
use std::fmt;
use tzenc_core::EncodedValue;
use tzenc_micheline::Int;

/// A non-negative integer, used for instruction counts and memo sizes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Nat(Int);

impl Nat {
    pub fn as_int(&self) -> &Int {
        &self.0
    }

    pub fn to_u64(&self) -> Option<u64> {
        self.0.to_u64()
    }
}

impl TryFrom<Int> for Nat {
    type Error = Int;

    fn try_from(value: Int) -> Result<Self, Int> {
        if value.is_negative() {
            Err(value)
        } else {
            Ok(Nat(value))
        }
    }
}

impl From<u64> for Nat {
    fn from(value: u64) -> Self {
        Nat(Int::from(value))
    }
}

impl From<Nat> for Int {
    fn from(value: Nat) -> Self {
        value.0
    }
}

impl fmt::Display for Nat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// One binding of a map or big map literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Elt {
    pub key: Data,
    pub value: Data,
}

/// A Michelson value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Data {
    Int(Int),
    String(String),
    Bytes(Vec<u8>),
    Unit,
    True,
    False,
    /// Two or more components.
    Pair(Vec<Data>),
    Left(Box<Data>),
    Right(Box<Data>),
    Some(Box<Data>),
    None,
    /// A list or set literal, or the empty sequence.
    Sequence(Vec<Data>),
    /// A non-empty map or big map literal.
    EltSequence(Vec<Elt>),
    /// Code used as a value, such as a lambda body.
    Instruction(Instruction),
    /// A recursive lambda.
    LambdaRec(Vec<Instruction>),
    /// A reference to a registered global constant.
    Constant(EncodedValue),
}

impl Data {
    pub fn int(value: impl Into<Int>) -> Self {
        Data::Int(value.into())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Data::String(value.into())
    }

    pub fn pair(left: Data, right: Data) -> Self {
        Data::Pair(vec![left, right])
    }

    pub fn some(value: Data) -> Self {
        Data::Some(Box::new(value))
    }
}

impl From<bool> for Data {
    fn from(value: bool) -> Self {
        if value {
            Data::True
        } else {
            Data::False
        }
    }
}
