//! Checksum-encoded identifiers for tzenc.
//!
//! This crate provides:
//! - Base58Check encoding and decoding
//! - The registry of identifier kinds (hashes, keys, signatures, addresses)
//! - Validated encoded values and recognition of unknown text or bytes
//! - Checked wrappers for addresses, public keys and signatures

pub mod base58;
pub mod encoded;
pub mod family;
pub mod kind;

// Kind registry and validated values.
pub use base58::Base58Error;
pub use encoded::{EncodedValue, EncodingError, FormatIssue, Result};
pub use family::{Address, ImplicitAddress, PublicKey, Signature};
pub use kind::{recognize, recognize_bytes, Family, Kind, KindInfo};
