//! Conversion between generic Micheline and typed Michelson.
//!
//! Generic to typed goes through a [`Converter`], which checks the input
//! depth against its [`ConverterConfig`] before converting anything. Typed to
//! generic is the [`ToMicheline`] trait and cannot fail.

mod args;
mod generic;
mod typed;

pub use generic::ToMicheline;

use crate::data::Data;
use crate::error::{ConversionError, Result};
use crate::instruction::Instruction;
use crate::prim::{Family, Prim};
use crate::script::Script;
use crate::types::{ComparableType, Type};
use tzenc_micheline::Micheline;

/// Default limit on input nesting.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Converter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConverterConfig {
    /// Deepest generic tree accepted, counting the root as 1.
    pub max_depth: usize,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Any typed node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Michelson {
    Data(Data),
    Type(Type),
    Instruction(Instruction),
    Script(Script),
}

/// Generic to typed converter.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: ConverterConfig,
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ConverterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Convert without knowing the family in advance.
    ///
    /// Type primitives give a type, instruction primitives and code sequences
    /// give an instruction, sequences of script sections give a script, and
    /// everything else is read as data.
    pub fn to_michelson(&self, node: &Micheline) -> Result<Michelson> {
        self.run(node, |node| {
            let family = match node {
                Micheline::PrimitiveApplication(app) => {
                    Prim::from_name(&app.prim).ok().map(Prim::family)
                }
                Micheline::Sequence(items) => items
                    .first()
                    .and_then(Micheline::as_primitive_application)
                    .and_then(|app| Prim::from_name(&app.prim).ok())
                    .map(Prim::family)
                    .filter(|family| *family == Family::Keyword),
                Micheline::Literal(_) => None,
            };

            match family {
                Some(Family::Type) => typed::ty(node).map(Michelson::Type),
                Some(Family::Keyword) => typed::script(node).map(Michelson::Script),
                _ => typed::data(node).map(|data| match data {
                    Data::Instruction(instruction) => Michelson::Instruction(instruction),
                    data => Michelson::Data(data),
                }),
            }
        })
    }

    pub fn to_data(&self, node: &Micheline) -> Result<Data> {
        self.run(node, typed::data)
    }

    pub fn to_type(&self, node: &Micheline) -> Result<Type> {
        self.run(node, typed::ty)
    }

    pub fn to_comparable_type(&self, node: &Micheline) -> Result<ComparableType> {
        self.run(node, typed::comparable)
    }

    pub fn to_instruction(&self, node: &Micheline) -> Result<Instruction> {
        self.run(node, typed::instruction)
    }

    pub fn to_script(&self, node: &Micheline) -> Result<Script> {
        self.run(node, typed::script)
    }

    fn run<T>(&self, node: &Micheline, convert: impl FnOnce(&Micheline) -> Result<T>) -> Result<T> {
        let depth = node.depth();
        if depth > self.config.max_depth {
            tracing::debug!(depth, max = self.config.max_depth, "rejecting deep expression");
            return Err(ConversionError::TooDeep {
                depth,
                max: self.config.max_depth,
            });
        }

        convert(node).map_err(|err| {
            tracing::debug!(error = %err, "conversion failed");
            err
        })
    }
}
