//! Conversion errors.

use std::fmt;
use thiserror::Error;
use tzenc_micheline::Micheline;

/// What the converter was trying to build when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    Data,
    Type,
    ComparableType,
    Instruction,
    Script,
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Context::Data => "data",
            Context::Type => "type",
            Context::ComparableType => "comparable type",
            Context::Instruction => "instruction",
            Context::Script => "script",
        })
    }
}

/// Generic to typed conversion errors.
///
/// `node` is always the compact rendering of the offending subtree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("unknown primitive '{prim}' in {context}: {node}")]
    UnknownPrimitiveApplication {
        prim: String,
        context: Context,
        node: String,
    },

    #[error("invalid application of '{prim}': {reason}: {node}")]
    InvalidPrimitiveApplication {
        prim: String,
        reason: String,
        node: String,
    },

    #[error("invalid sequence, Elt mixed with other values: {node}")]
    InvalidSequence { node: String },

    #[error("expected {expected}: {node}")]
    UnexpectedNode { expected: Context, node: String },

    #[error("invalid script: {reason}: {node}")]
    InvalidScript { reason: String, node: String },

    #[error("expression too deep: {depth} levels, limit is {max}")]
    TooDeep { depth: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, ConversionError>;

impl ConversionError {
    pub(crate) fn unknown(prim: &str, context: Context, node: &Micheline) -> Self {
        ConversionError::UnknownPrimitiveApplication {
            prim: prim.to_string(),
            context,
            node: node.compact().to_string(),
        }
    }

    pub(crate) fn invalid(prim: &str, reason: impl Into<String>, node: &Micheline) -> Self {
        ConversionError::InvalidPrimitiveApplication {
            prim: prim.to_string(),
            reason: reason.into(),
            node: node.compact().to_string(),
        }
    }

    pub(crate) fn unexpected(expected: Context, node: &Micheline) -> Self {
        ConversionError::UnexpectedNode {
            expected,
            node: node.compact().to_string(),
        }
    }

    pub(crate) fn script(reason: impl Into<String>, node: &Micheline) -> Self {
        ConversionError::InvalidScript {
            reason: reason.into(),
            node: node.compact().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_compact_node() {
        let node = Micheline::prim_with(
            "DROP",
            (0..5).map(Micheline::int).collect(),
        );
        let err = ConversionError::invalid("DROP", "expected 0 or 1 arguments, found 5", &node);
        assert_eq!(
            err.to_string(),
            "invalid application of 'DROP': expected 0 or 1 arguments, found 5: DROP 0 ... 4"
        );
    }

    #[test]
    fn test_unknown_message() {
        let node = Micheline::prim("nat");
        let err = ConversionError::unknown("nat", Context::Data, &node);
        assert_eq!(err.to_string(), "unknown primitive 'nat' in data: nat");
    }
}
