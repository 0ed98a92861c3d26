//! Typed literals for identifier and timestamp values.
//!
//! Michelson writes `address`, `key`, `key_hash`, `signature`, `chain_id`
//! and `timestamp` values either in a readable form (a string) or in an
//! optimized form (bytes, or an integer for timestamps). These helpers decode
//! both into checked values and encode them back in the requested form.

use crate::data::Data;
use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;
use tzenc_core::{Address, EncodedValue, EncodingError, ImplicitAddress, Kind, PublicKey, Signature};
use tzenc_micheline::Int;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LiteralError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error("invalid optimized {expected}: {reason}")]
    InvalidBytes {
        expected: &'static str,
        reason: String,
    },

    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error("expected a {expected} literal")]
    UnexpectedData { expected: &'static str },

    #[error("{kind} has no optimized {expected} form")]
    UntaggedKind { expected: &'static str, kind: Kind },
}

pub type Result<T> = std::result::Result<T, LiteralError>;

/// Which of the two literal forms to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Form {
    #[default]
    Readable,
    Optimized,
}

/// Key hash kinds, indexed by their optimized tag.
const KEY_HASH_KINDS: [Kind; 4] = [
    Kind::Ed25519PublicKeyHash,
    Kind::Secp256K1PublicKeyHash,
    Kind::P256PublicKeyHash,
    Kind::Bls12381PublicKeyHash,
];

/// Public key kinds, indexed by their optimized tag.
const KEY_KINDS: [Kind; 4] = [
    Kind::Ed25519PublicKey,
    Kind::Secp256K1PublicKey,
    Kind::P256PublicKey,
    Kind::Bls12381PublicKey,
];

/// Originated address kinds, indexed by their optimized tag minus one.
const ORIGINATED_KINDS: [Kind; 3] = [Kind::ContractHash, Kind::TxRollupId, Kind::SmartRollupHash];

const HASH_LENGTH: usize = 20;
const ADDRESS_LENGTH: usize = 22;

/// An `address` literal: a destination and an optional entrypoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AddressLiteral {
    pub address: Address,
    pub entrypoint: Option<String>,
}

fn invalid(expected: &'static str, reason: impl Into<String>) -> LiteralError {
    LiteralError::InvalidBytes {
        expected,
        reason: reason.into(),
    }
}

fn tagged(kinds: &[Kind], tag: u8, expected: &'static str) -> Result<Kind> {
    kinds
        .get(tag as usize)
        .copied()
        .ok_or_else(|| invalid(expected, format!("unknown tag {tag}")))
}

fn tag_of(kinds: &[Kind], kind: Kind, expected: &'static str) -> Result<u8> {
    kinds
        .iter()
        .position(|k| *k == kind)
        .and_then(|tag| u8::try_from(tag).ok())
        .ok_or(LiteralError::UntaggedKind { expected, kind })
}

/// Decode a tag byte followed by exactly one payload of the tagged kind.
fn decode_tagged(bytes: &[u8], kinds: &[Kind], expected: &'static str) -> Result<EncodedValue> {
    let (&tag, payload) = bytes
        .split_first()
        .ok_or_else(|| invalid(expected, "empty"))?;
    let kind = tagged(kinds, tag, expected)?;
    if payload.len() != kind.payload_length() {
        return Err(invalid(
            expected,
            format!("expected {} bytes after the tag, found {}", kind.payload_length(), payload.len()),
        ));
    }
    Ok(kind.encode(payload)?)
}

fn encode_tagged(value: &EncodedValue, kinds: &[Kind], expected: &'static str) -> Result<Vec<u8>> {
    let mut bytes = vec![tag_of(kinds, value.kind(), expected)?];
    bytes.extend_from_slice(value.payload());
    Ok(bytes)
}

pub fn decode_key_hash(data: &Data) -> Result<ImplicitAddress> {
    match data {
        Data::String(text) => Ok(ImplicitAddress::parse(text)?),
        Data::Bytes(bytes) => Ok(decode_tagged(bytes, &KEY_HASH_KINDS, "key_hash")?.try_into()?),
        _ => Err(LiteralError::UnexpectedData {
            expected: "key_hash",
        }),
    }
}

pub fn encode_key_hash(key_hash: &ImplicitAddress, form: Form) -> Result<Data> {
    Ok(match form {
        Form::Readable => Data::String(key_hash.text().to_string()),
        Form::Optimized => Data::Bytes(encode_tagged(
            key_hash.as_encoded(),
            &KEY_HASH_KINDS,
            "key_hash",
        )?),
    })
}

pub fn decode_key(data: &Data) -> Result<PublicKey> {
    match data {
        Data::String(text) => Ok(PublicKey::parse(text)?),
        Data::Bytes(bytes) => Ok(decode_tagged(bytes, &KEY_KINDS, "key")?.try_into()?),
        _ => Err(LiteralError::UnexpectedData { expected: "key" }),
    }
}

pub fn encode_key(key: &PublicKey, form: Form) -> Result<Data> {
    Ok(match form {
        Form::Readable => Data::String(key.text().to_string()),
        Form::Optimized => Data::Bytes(encode_tagged(key.as_encoded(), &KEY_KINDS, "key")?),
    })
}

/// Optimized signatures are untagged: 64 bytes give a generic signature and
/// 96 bytes a BLS12-381 signature.
pub fn decode_signature(data: &Data) -> Result<Signature> {
    match data {
        Data::String(text) => Ok(Signature::parse(text)?),
        Data::Bytes(bytes) => {
            let kind = [Kind::GenericSignature, Kind::Bls12381Signature]
                .into_iter()
                .find(|kind| kind.payload_length() == bytes.len())
                .ok_or_else(|| invalid("signature", format!("unexpected length {}", bytes.len())))?;
            Ok(kind.encode(bytes)?.try_into()?)
        }
        _ => Err(LiteralError::UnexpectedData {
            expected: "signature",
        }),
    }
}

pub fn encode_signature(signature: &Signature, form: Form) -> Data {
    match form {
        Form::Readable => Data::String(signature.text().to_string()),
        Form::Optimized => Data::Bytes(signature.payload().to_vec()),
    }
}

pub fn decode_chain_id(data: &Data) -> Result<EncodedValue> {
    match data {
        Data::String(text) => Ok(Kind::ChainId.parse(text)?),
        Data::Bytes(bytes) => Ok(Kind::ChainId.encode(bytes)?),
        _ => Err(LiteralError::UnexpectedData {
            expected: "chain_id",
        }),
    }
}

pub fn encode_chain_id(chain_id: &EncodedValue, form: Form) -> Data {
    match form {
        Form::Readable => Data::String(chain_id.text().to_string()),
        Form::Optimized => Data::Bytes(chain_id.payload().to_vec()),
    }
}

/// Decode an `address` literal. The readable form may carry an entrypoint
/// after `%`; the optimized form carries it as trailing bytes.
pub fn decode_address(data: &Data) -> Result<AddressLiteral> {
    match data {
        Data::String(text) => {
            let (address, entrypoint) = match text.split_once('%') {
                Some((address, entrypoint)) => (address, Some(entrypoint.to_string())),
                None => (text.as_str(), None),
            };
            Ok(AddressLiteral {
                address: Address::parse(address)?,
                entrypoint,
            })
        }
        Data::Bytes(bytes) => decode_address_bytes(bytes),
        _ => Err(LiteralError::UnexpectedData { expected: "address" }),
    }
}

fn decode_address_bytes(bytes: &[u8]) -> Result<AddressLiteral> {
    if bytes.len() < ADDRESS_LENGTH {
        return Err(invalid(
            "address",
            format!("expected at least {ADDRESS_LENGTH} bytes, found {}", bytes.len()),
        ));
    }
    let (head, tail) = bytes.split_at(ADDRESS_LENGTH);

    let address: Address = match head[0] {
        0 => decode_tagged(&head[1..], &KEY_HASH_KINDS, "address")?.try_into()?,
        tag => {
            let kind = tagged(&ORIGINATED_KINDS, tag - 1, "address")?;
            if head[ADDRESS_LENGTH - 1] != 0 {
                return Err(invalid("address", "missing padding byte"));
            }
            kind.encode(&head[1..=HASH_LENGTH])?.try_into()?
        }
    };

    let entrypoint = match tail {
        [] => None,
        tail => Some(
            String::from_utf8(tail.to_vec())
                .map_err(|_| invalid("address", "entrypoint is not UTF-8"))?,
        ),
    };

    Ok(AddressLiteral {
        address,
        entrypoint,
    })
}

pub fn encode_address(literal: &AddressLiteral, form: Form) -> Result<Data> {
    Ok(match form {
        Form::Readable => Data::String(match &literal.entrypoint {
            Some(entrypoint) => format!("{}%{entrypoint}", literal.address),
            None => literal.address.text().to_string(),
        }),
        Form::Optimized => {
            let address = literal.address.as_encoded();
            let mut bytes = Vec::with_capacity(ADDRESS_LENGTH);
            if literal.address.is_implicit() {
                bytes.push(0);
                bytes.extend(encode_tagged(address, &KEY_HASH_KINDS, "address")?);
            } else {
                bytes.push(tag_of(&ORIGINATED_KINDS, address.kind(), "address")? + 1);
                bytes.extend_from_slice(address.payload());
                bytes.push(0);
            }
            if let Some(entrypoint) = &literal.entrypoint {
                bytes.extend_from_slice(entrypoint.as_bytes());
            }
            Data::Bytes(bytes)
        }
    })
}

/// Decode a `timestamp` literal: an RFC 3339 string or seconds since the
/// Unix epoch.
pub fn decode_timestamp(data: &Data) -> Result<DateTime<Utc>> {
    match data {
        Data::String(text) => DateTime::parse_from_rfc3339(text)
            .map(|time| time.with_timezone(&Utc))
            .map_err(|_| LiteralError::InvalidTimestamp(text.clone())),
        Data::Int(seconds) => seconds
            .to_i64()
            .and_then(|seconds| DateTime::from_timestamp(seconds, 0))
            .ok_or_else(|| LiteralError::InvalidTimestamp(seconds.to_string())),
        _ => Err(LiteralError::UnexpectedData {
            expected: "timestamp",
        }),
    }
}

pub fn encode_timestamp(time: &DateTime<Utc>, form: Form) -> Data {
    match form {
        Form::Readable => Data::String(time.to_rfc3339_opts(SecondsFormat::Secs, true)),
        Form::Optimized => Data::Int(Int::from(time.timestamp())),
    }
}
