//! Typed Michelson for tzenc.
//!
//! This crate knows the Michelson primitives and converts between generic
//! Micheline trees and typed trees of data, types, instructions and scripts.
//!
//! # Example
//!
//! ```
//! use tzenc_micheline::parse_expression;
//! use tzenc_michelson::{normalize, Converter, Data, ToMicheline};
//!
//! let node = normalize(&parse_expression("Pair 1 \"a\" Unit").unwrap());
//! let data = Converter::new().to_data(&node).unwrap();
//! assert_eq!(
//!     data,
//!     Data::pair(Data::int(1), Data::pair(Data::string("a"), Data::Unit))
//! );
//! assert_eq!(data.to_micheline().to_string(), "Pair 1 (Pair \"a\" Unit)");
//! ```
//!
//! # Modules
//!
//! - [`prim`] - the primitive table: names, tags, arity, annotation slots
//! - [`annotation`], [`types`], [`data`], [`instruction`], [`script`] - the typed tree
//! - [`convert`] - generic to typed and back
//! - [`normalizer`] - right-comb normalization of pairs
//! - [`literal`] - readable and optimized forms of identifier literals

pub mod annotation;
pub mod convert;
pub mod data;
pub mod error;
pub mod instruction;
pub mod literal;
pub mod normalizer;
pub mod prim;
pub mod script;
pub mod types;

// Typed tree, conversion and literal helpers at the crate root.
pub use annotation::{Annotation, AnnotationKind, Annotations};
pub use convert::{Converter, ConverterConfig, Michelson, ToMicheline, DEFAULT_MAX_DEPTH};
pub use data::{Data, Elt, Nat};
pub use error::{Context, ConversionError};
pub use instruction::{
    BlockOp, BranchOp, CountedOp, Instruction, LambdaOp, MapOp, SimpleOp, TypedOp,
};
pub use literal::{AddressLiteral, Form, LiteralError};
pub use normalizer::normalize;
pub use prim::{Arity, Family, Prim, PrimInfo, Shape, UnknownPrimitive, PRIMITIVES};
pub use script::{Script, ViewDefinition};
pub use types::{ComparableNode, ComparableType, Type, TypeNode};
