//! Validated identifiers.

use crate::base58::Base58Error;
use crate::kind::{recognize, Family, Kind};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

/// Why a text failed a kind's format check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatIssue {
    Length { expected: usize, actual: usize },
    Prefix,
    Base58(Base58Error),
    VersionBytes,
}

impl fmt::Display for FormatIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatIssue::Length { expected, actual } => {
                write!(f, "expected {expected} characters, found {actual}")
            }
            FormatIssue::Prefix => f.write_str("wrong prefix"),
            FormatIssue::Base58(e) => write!(f, "{e}"),
            FormatIssue::VersionBytes => f.write_str("wrong version bytes"),
        }
    }
}

/// Errors produced by the kind registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("invalid {kind} format: {reason}")]
    InvalidFormat {
        kind: &'static str,
        reason: FormatIssue,
    },

    #[error("invalid {kind} payload: expected {expected} bytes, found {actual}")]
    InvalidPayloadLength {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("'{text}' is not a valid {expected}")]
    Unrecognized { expected: &'static str, text: String },

    #[error("unknown kind: {0}")]
    UnknownKind(String),
}

pub type Result<T> = std::result::Result<T, EncodingError>;

/// A checksum-verified identifier paired with its kind.
///
/// Equality and hashing only look at the text form.
#[derive(Clone)]
pub struct EncodedValue {
    text: String,
    kind: Kind,
    payload: Vec<u8>,
}

impl EncodedValue {
    /// Only called by [`Kind`] once the text has been checked.
    pub(crate) fn from_parts(text: String, kind: Kind, payload: Vec<u8>) -> Self {
        Self {
            text,
            kind,
            payload,
        }
    }

    /// Recognize the kind of `text`, then validate it as that kind.
    pub fn recognize(text: &str) -> Result<Self> {
        match recognize(text) {
            Some(kind) => kind.parse(text),
            None => Err(EncodingError::Unrecognized {
                expected: "identifier",
                text: text.to_string(),
            }),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn family(&self) -> Family {
        self.kind.family()
    }

    /// The decoded payload, without version bytes or checksum.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Version bytes followed by the payload.
    pub fn to_versioned_bytes(&self) -> Vec<u8> {
        let mut bytes = self.kind.version_bytes().to_vec();
        bytes.extend_from_slice(&self.payload);
        bytes
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl PartialEq for EncodedValue {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for EncodedValue {}

impl Hash for EncodedValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl fmt::Debug for EncodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncodedValue({}: {})", self.kind, self.text)
    }
}

impl fmt::Display for EncodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for EncodedValue {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl FromStr for EncodedValue {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self> {
        EncodedValue::recognize(s)
    }
}

impl Serialize for EncodedValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for EncodedValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TZ1: &str = "tz1ZSs43ujit1oRsVn67Asz3pTMF8R6CXWPi";

    #[test]
    fn test_parse_valid() {
        let value = Kind::Ed25519PublicKeyHash.parse(TZ1).unwrap();
        assert_eq!(value.kind(), Kind::Ed25519PublicKeyHash);
        assert_eq!(value.text(), TZ1);
        assert_eq!(
            hex::encode(value.payload()),
            "9775239a348e75a09db251af997a9472d9b62c1b"
        );
    }

    #[test]
    fn test_parse_corrupted_checksum() {
        let err = Kind::Ed25519PublicKeyHash
            .parse("tz1ZSs43ujit1oRsVn67Asz3pTMF8R6CXWP0")
            .unwrap_err();
        assert!(matches!(
            err,
            EncodingError::InvalidFormat {
                kind: "ed25519_public_key_hash",
                ..
            }
        ));
    }

    #[test]
    fn test_parse_wrong_kind() {
        let err = Kind::ContractHash.parse(TZ1).unwrap_err();
        assert_eq!(
            err,
            EncodingError::InvalidFormat {
                kind: "contract_hash",
                reason: FormatIssue::Prefix
            }
        );
        assert!(Kind::Secp256K1PublicKeyHash.try_parse(TZ1).is_none());
    }

    #[test]
    fn test_parse_wrong_length() {
        let err = Kind::Ed25519PublicKeyHash.parse(&TZ1[..35]).unwrap_err();
        assert!(matches!(
            err,
            EncodingError::InvalidFormat {
                reason: FormatIssue::Length {
                    expected: 36,
                    actual: 35
                },
                ..
            }
        ));
    }

    #[test]
    fn test_recognize() {
        let value: EncodedValue = TZ1.parse().unwrap();
        assert_eq!(value.kind(), Kind::Ed25519PublicKeyHash);
        assert_eq!(value.family(), Family::PublicKeyHash);

        assert!(matches!(
            EncodedValue::recognize("hello"),
            Err(EncodingError::Unrecognized { .. })
        ));
    }

    #[test]
    fn test_equality_on_text() {
        let a = Kind::Ed25519PublicKeyHash.parse(TZ1).unwrap();
        let b = EncodedValue::recognize(TZ1).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_versioned_bytes() {
        let value = Kind::Ed25519PublicKeyHash.parse(TZ1).unwrap();
        let bytes = value.to_versioned_bytes();
        assert_eq!(&bytes[..3], &[6, 161, 159]);
        assert_eq!(bytes.len(), 23);
    }

    #[test]
    fn test_serde_as_string() {
        let value = EncodedValue::recognize(TZ1).unwrap();
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, format!("\"{TZ1}\""));
        let back: EncodedValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);

        assert!(serde_json::from_str::<EncodedValue>("\"tz1nope\"").is_err());
    }
}
