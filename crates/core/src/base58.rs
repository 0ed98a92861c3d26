//! Base58 and Base58Check encoding.
//!
//! Uses the Bitcoin alphabet. The checksum is the first 4 bytes of a double
//! SHA-256 over the versioned payload.

use sha2::{Digest, Sha256};
use thiserror::Error;

/// The Base58 alphabet (Bitcoin ordering).
pub const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Number of checksum bytes appended before encoding.
pub const CHECKSUM_LENGTH: usize = 4;

/// Reverse lookup for ASCII characters; 0xFF marks characters outside the alphabet.
const DECODE_MAP: [u8; 128] = {
    let mut map = [0xFF; 128];
    let mut i = 0;
    while i < ALPHABET.len() {
        map[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    map
};

/// Errors that can occur while decoding Base58 text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Base58Error {
    #[error("invalid base58 character '{character}' at position {position}")]
    InvalidCharacter { character: char, position: usize },

    #[error("decoded data too short for a checksum ({0} bytes)")]
    TooShort(usize),

    #[error("checksum mismatch")]
    ChecksumMismatch,
}

pub type Result<T> = std::result::Result<T, Base58Error>;

/// Encode bytes as Base58.
pub fn encode(bytes: &[u8]) -> String {
    let zeros = bytes.iter().take_while(|&&b| b == 0).count();

    // Base-58 digits, least significant first
    let mut digits: Vec<u8> = Vec::with_capacity(bytes.len() * 138 / 100 + 1);
    for &byte in &bytes[zeros..] {
        let mut carry = byte as u32;
        for digit in digits.iter_mut() {
            carry += (*digit as u32) << 8;
            *digit = (carry % 58) as u8;
            carry /= 58;
        }
        while carry > 0 {
            digits.push((carry % 58) as u8);
            carry /= 58;
        }
    }

    let mut out = String::with_capacity(zeros + digits.len());
    out.extend(std::iter::repeat('1').take(zeros));
    out.extend(digits.iter().rev().map(|&d| ALPHABET[d as usize] as char));
    out
}

/// Decode Base58 text into bytes.
pub fn decode(text: &str) -> Result<Vec<u8>> {
    let zeros = text.chars().take_while(|&c| c == '1').count();

    // Base-256 digits, least significant first
    let mut bytes: Vec<u8> = Vec::with_capacity(text.len());
    for (position, character) in text.chars().enumerate().skip(zeros) {
        let value = match character {
            c if c.is_ascii() => DECODE_MAP[c as usize],
            _ => 0xFF,
        };
        if value == 0xFF {
            return Err(Base58Error::InvalidCharacter {
                character,
                position,
            });
        }

        let mut carry = value as u32;
        for byte in bytes.iter_mut() {
            carry += (*byte as u32) * 58;
            *byte = (carry & 0xFF) as u8;
            carry >>= 8;
        }
        while carry > 0 {
            bytes.push((carry & 0xFF) as u8);
            carry >>= 8;
        }
    }

    let mut out = vec![0u8; zeros];
    out.extend(bytes.iter().rev());
    Ok(out)
}

/// Compute the 4-byte double SHA-256 checksum of `bytes`.
pub fn checksum(bytes: &[u8]) -> [u8; CHECKSUM_LENGTH] {
    let first = Sha256::digest(bytes);
    let second = Sha256::digest(first.as_slice());
    let mut out = [0u8; CHECKSUM_LENGTH];
    out.copy_from_slice(&second[..CHECKSUM_LENGTH]);
    out
}

/// Append a checksum to `bytes` and encode the result as Base58.
pub fn encode_check(bytes: &[u8]) -> String {
    let mut buf = Vec::with_capacity(bytes.len() + CHECKSUM_LENGTH);
    buf.extend_from_slice(bytes);
    buf.extend_from_slice(&checksum(bytes));
    encode(&buf)
}

/// Decode Base58Check text, verify and strip its checksum.
pub fn decode_check(text: &str) -> Result<Vec<u8>> {
    let mut bytes = decode(text)?;
    if bytes.len() < CHECKSUM_LENGTH {
        return Err(Base58Error::TooShort(bytes.len()));
    }

    let split = bytes.len() - CHECKSUM_LENGTH;
    if checksum(&bytes[..split]) != bytes[split..] {
        return Err(Base58Error::ChecksumMismatch);
    }

    bytes.truncate(split);
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode(&[]), "");
        assert_eq!(decode("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_leading_zeros_preserved() {
        let bytes = [0u8, 0, 1, 2, 3];
        let text = encode(&bytes);
        assert!(text.starts_with("11"));
        assert_eq!(decode(&text).unwrap(), bytes);
    }

    #[test]
    fn test_known_vector() {
        // "Hello World!" from the Base58 draft specification
        assert_eq!(encode(b"Hello World!"), "2NEpo7TZRRrLZSi2U");
        assert_eq!(decode("2NEpo7TZRRrLZSi2U").unwrap(), b"Hello World!");
    }

    #[test]
    fn test_invalid_character() {
        let err = decode("abc0def").unwrap_err();
        assert_eq!(
            err,
            Base58Error::InvalidCharacter {
                character: '0',
                position: 3
            }
        );

        assert!(matches!(
            decode("abcé"),
            Err(Base58Error::InvalidCharacter { character: 'é', .. })
        ));
    }

    #[test]
    fn test_check_roundtrip() {
        let payload = b"tezos payload";
        let text = encode_check(payload);
        assert_eq!(decode_check(&text).unwrap(), payload);
    }

    #[test]
    fn test_check_detects_corruption() {
        let text = encode_check(&[6, 161, 159, 1, 2, 3, 4]);
        let mut corrupted: Vec<char> = text.chars().collect();
        let last = corrupted.len() - 1;
        corrupted[last] = if corrupted[last] == '2' { '3' } else { '2' };
        let corrupted: String = corrupted.into_iter().collect();

        assert_eq!(decode_check(&corrupted), Err(Base58Error::ChecksumMismatch));
    }

    #[test]
    fn test_check_too_short() {
        assert_eq!(decode_check("2"), Err(Base58Error::TooShort(1)));
    }
}
