//! Arbitrary precision integer literals.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned for text that is not a decimal integer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid integer literal '{0}'")]
pub struct IntError(pub String);

/// A decimal integer of any size, kept in canonical text form.
///
/// Leading zeros are stripped and `-0` becomes `0`, so two `Int`s are equal
/// exactly when they denote the same number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Int(String);

impl Int {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0.starts_with('-')
    }

    pub fn is_zero(&self) -> bool {
        self.0 == "0"
    }

    /// The value as an `i64`, if it fits.
    pub fn to_i64(&self) -> Option<i64> {
        self.0.parse().ok()
    }

    /// The value as a `u64`, if it is non-negative and fits.
    pub fn to_u64(&self) -> Option<u64> {
        self.0.parse().ok()
    }

    fn canonical(text: &str) -> Option<String> {
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let trimmed = digits.trim_start_matches('0');
        Some(match (negative, trimmed.is_empty()) {
            (_, true) => "0".to_string(),
            (true, false) => format!("-{trimmed}"),
            (false, false) => trimmed.to_string(),
        })
    }
}

impl FromStr for Int {
    type Err = IntError;

    fn from_str(s: &str) -> Result<Self, IntError> {
        Int::canonical(s)
            .map(Int)
            .ok_or_else(|| IntError(s.to_string()))
    }
}

impl TryFrom<String> for Int {
    type Error = IntError;

    fn try_from(value: String) -> Result<Self, IntError> {
        value.parse()
    }
}

impl From<Int> for String {
    fn from(value: Int) -> Self {
        value.0
    }
}

impl fmt::Display for Int {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

macro_rules! int_from_primitive {
    ($($ty:ty),+) => {
        $(impl From<$ty> for Int {
            fn from(value: $ty) -> Self {
                Int(value.to_string())
            }
        })+
    };
}

int_from_primitive!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128, usize);
