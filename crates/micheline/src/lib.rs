//! Generic Micheline trees for tzenc.
//!
//! Micheline is the untyped tree form of contract code and data: literals,
//! primitive applications and sequences. This crate knows nothing about
//! which primitives exist; see `tzenc-michelson` for that.
//!
//! # Example
//!
//! ```
//! use tzenc_micheline::{parse_expression, Micheline};
//!
//! let node = parse_expression("Pair 1 \"a\"").unwrap();
//! assert!(node.is_primitive_application("Pair"));
//!
//! let json = serde_json::to_string(&node).unwrap();
//! assert_eq!(json, r#"{"prim":"Pair","args":[{"int":"1"},{"string":"a"}]}"#);
//!
//! let back: Micheline = serde_json::from_str(&json).unwrap();
//! assert_eq!(back.to_string(), "Pair 1 \"a\"");
//! ```
//!
//! # Forms
//!
//! - **JSON** - the wire form exchanged with nodes, via serde
//! - **Text** - the concrete syntax, parsed by [`parse_expression`] and
//!   produced by `Display`
//! - **Compact text** - [`Micheline::compact`], for diagnostics on large trees

pub mod int;
pub mod lexer;
pub mod node;
pub mod parser;
pub mod print;

// Tree types and the text parser.
pub use int::{Int, IntError};
pub use lexer::{Lexer, Token};
pub use node::{Literal, Micheline, PrimitiveApplication};
pub use parser::{parse_expression, ParseError, Parser};
pub use print::Compact;
