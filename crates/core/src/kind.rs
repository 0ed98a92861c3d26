//! The registry of Base58Check identifier kinds.
//!
//! Every kind owns its version bytes, its textual prefix and two fixed lengths.
//! The table is static data: adding a kind means adding one row to [`kinds!`].
//!
//! No two kinds share a text length while one text prefix is a prefix of the
//! other, so [`recognize`] gives the same answer whatever the table order.

use crate::base58;
use crate::encoded::{EncodedValue, EncodingError, FormatIssue, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Coarse grouping of kinds, used by the checked family wrappers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Hash,
    ChainId,
    PublicKeyHash,
    ContractHash,
    RollupAddress,
    PublicKey,
    SecretKey,
    EncryptedSecretKey,
    Signature,
    Sapling,
    Other,
}

/// Static description of a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindInfo {
    /// Stable snake_case name.
    pub name: &'static str,
    /// Characters every valid text form starts with.
    pub text_prefix: &'static str,
    /// Bytes prepended to the payload before encoding.
    pub version_bytes: &'static [u8],
    /// Length of every valid text form.
    pub text_length: usize,
    /// Length of the payload without version bytes or checksum.
    pub payload_length: usize,
    pub family: Family,
}

macro_rules! kinds {
    ($(
        $(#[$meta:meta])*
        $variant:ident => $name:literal, $prefix:literal, [$($byte:literal),+], $text_len:literal, $payload_len:literal, $family:ident;
    )+) => {
        /// An identifier kind.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Kind {
            $($(#[$meta])* $variant,)+
        }

        static KINDS: &[KindInfo] = &[
            $(KindInfo {
                name: $name,
                text_prefix: $prefix,
                version_bytes: &[$($byte),+],
                text_length: $text_len,
                payload_length: $payload_len,
                family: Family::$family,
            },)+
        ];

        impl Kind {
            /// Every kind, in registry order.
            pub const ALL: &'static [Kind] = &[$(Kind::$variant,)+];
        }
    };
}

kinds! {
    BlockHash => "block_hash", "B", [1, 52], 51, 32, Hash;
    OperationHash => "operation_hash", "o", [5, 116], 51, 32, Hash;
    OperationListHash => "operation_list_hash", "Lo", [133, 233], 52, 32, Hash;
    OperationListListHash => "operation_list_list_hash", "LLo", [29, 159, 109], 53, 32, Hash;
    ProtocolHash => "protocol_hash", "P", [2, 170], 51, 32, Hash;
    ContextHash => "context_hash", "Co", [79, 199], 52, 32, Hash;
    BlockMetadataHash => "block_metadata_hash", "bm", [234, 249], 52, 32, Hash;
    OperationMetadataHash => "operation_metadata_hash", "r", [5, 183], 51, 32, Hash;
    OperationMetadataListHash => "operation_metadata_list_hash", "Lr", [134, 39], 52, 32, Hash;
    OperationMetadataListListHash => "operation_metadata_list_list_hash", "LLr", [29, 159, 182], 53, 32, Hash;
    BlockPayloadHash => "block_payload_hash", "vh", [1, 106, 242], 52, 32, Hash;
    NonceHash => "nonce_hash", "nce", [69, 220, 169], 53, 32, Hash;
    ScriptExprHash => "script_expr_hash", "expr", [13, 44, 64, 27], 54, 32, Hash;
    ChainId => "chain_id", "Net", [87, 82, 0], 15, 4, ChainId;

    Ed25519PublicKeyHash => "ed25519_public_key_hash", "tz1", [6, 161, 159], 36, 20, PublicKeyHash;
    Secp256K1PublicKeyHash => "secp256k1_public_key_hash", "tz2", [6, 161, 161], 36, 20, PublicKeyHash;
    P256PublicKeyHash => "p256_public_key_hash", "tz3", [6, 161, 164], 36, 20, PublicKeyHash;
    Bls12381PublicKeyHash => "bls12_381_public_key_hash", "tz4", [6, 161, 166], 36, 20, PublicKeyHash;
    ContractHash => "contract_hash", "KT1", [2, 90, 121], 36, 20, ContractHash;
    TxRollupId => "tx_rollup_id", "txr1", [1, 128, 120, 31], 37, 20, RollupAddress;
    SmartRollupHash => "smart_rollup_hash", "sr1", [6, 124, 117], 36, 20, RollupAddress;
    Ed25519BlindedPublicKeyHash => "ed25519_blinded_public_key_hash", "btz1", [1, 2, 49, 223], 37, 20, Other;
    CryptoboxPublicKeyHash => "cryptobox_public_key_hash", "id", [153, 103], 30, 16, Other;

    Ed25519PublicKey => "ed25519_public_key", "edpk", [13, 15, 37, 217], 54, 32, PublicKey;
    Secp256K1PublicKey => "secp256k1_public_key", "sppk", [3, 254, 226, 86], 55, 33, PublicKey;
    P256PublicKey => "p256_public_key", "p2pk", [3, 178, 139, 127], 55, 33, PublicKey;
    Bls12381PublicKey => "bls12_381_public_key", "BLpk", [6, 149, 135, 204], 76, 48, PublicKey;

    Ed25519Seed => "ed25519_seed", "edsk", [13, 15, 58, 7], 54, 32, SecretKey;
    Ed25519SecretKey => "ed25519_secret_key", "edsk", [43, 246, 78, 7], 98, 64, SecretKey;
    Secp256K1SecretKey => "secp256k1_secret_key", "spsk", [17, 162, 224, 201], 54, 32, SecretKey;
    P256SecretKey => "p256_secret_key", "p2sk", [16, 81, 238, 189], 54, 32, SecretKey;
    Bls12381SecretKey => "bls12_381_secret_key", "BLsk", [3, 150, 192, 40], 54, 32, SecretKey;

    Ed25519EncryptedSeed => "ed25519_encrypted_seed", "edesk", [7, 90, 60, 179, 41], 88, 56, EncryptedSecretKey;
    Secp256K1EncryptedSecretKey => "secp256k1_encrypted_secret_key", "spesk", [9, 237, 241, 174, 150], 88, 56, EncryptedSecretKey;
    P256EncryptedSecretKey => "p256_encrypted_secret_key", "p2esk", [9, 48, 57, 115, 171], 88, 56, EncryptedSecretKey;
    Bls12381EncryptedSecretKey => "bls12_381_encrypted_secret_key", "BLesk", [2, 5, 30, 53, 25], 88, 56, EncryptedSecretKey;
    Secp256K1EncryptedScalar => "secp256k1_encrypted_scalar", "seesk", [1, 131, 36, 86, 248], 93, 60, EncryptedSecretKey;

    Ed25519Signature => "ed25519_signature", "edsig", [9, 245, 205, 134, 18], 99, 64, Signature;
    Secp256K1Signature => "secp256k1_signature", "spsig1", [13, 115, 101, 19, 63], 99, 64, Signature;
    P256Signature => "p256_signature", "p2sig", [54, 240, 44, 52], 98, 64, Signature;
    Bls12381Signature => "bls12_381_signature", "BLsig", [40, 171, 64, 207], 142, 96, Signature;
    GenericSignature => "generic_signature", "sig", [4, 130, 43], 96, 64, Signature;

    Secp256K1Scalar => "secp256k1_scalar", "SSp", [38, 248, 136], 53, 32, Other;
    Secp256K1Element => "secp256k1_element", "GSp", [5, 92, 0], 54, 33, Other;
    SaplingSpendingKey => "sapling_spending_key", "sask", [11, 237, 20, 92], 241, 169, Sapling;
    SaplingAddress => "sapling_address", "zet1", [18, 71, 40, 223], 69, 43, Sapling;
}

impl Kind {
    /// Static description of this kind.
    pub fn info(self) -> &'static KindInfo {
        &KINDS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn text_prefix(self) -> &'static str {
        self.info().text_prefix
    }

    pub fn version_bytes(self) -> &'static [u8] {
        self.info().version_bytes
    }

    pub fn text_length(self) -> usize {
        self.info().text_length
    }

    pub fn payload_length(self) -> usize {
        self.info().payload_length
    }

    pub fn family(self) -> Family {
        self.info().family
    }

    /// Look a kind up by its snake_case name.
    pub fn from_name(name: &str) -> Option<Kind> {
        Kind::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// Check the textual prefix and length of `text`.
    ///
    /// This is a shape check only; [`Kind::parse`] also verifies the checksum.
    pub fn is_valid(self, text: &str) -> bool {
        text.len() == self.text_length() && text.starts_with(self.text_prefix())
    }

    /// Check whether `bytes` is a payload of this kind, with or without the
    /// version bytes in front.
    pub fn is_valid_bytes(self, bytes: &[u8]) -> bool {
        bytes.len() == self.payload_length() || self.has_version_prefix(bytes)
    }

    fn has_version_prefix(self, bytes: &[u8]) -> bool {
        let version = self.version_bytes();
        bytes.len() == version.len() + self.payload_length() && bytes.starts_with(version)
    }

    /// Validate `text` as this kind.
    pub fn parse(self, text: &str) -> Result<EncodedValue> {
        let payload = self.decode(text)?;
        Ok(EncodedValue::from_parts(text.to_string(), self, payload))
    }

    /// Like [`Kind::parse`], discarding the error.
    pub fn try_parse(self, text: &str) -> Option<EncodedValue> {
        self.parse(text).ok()
    }

    /// Validate `text` as this kind and return its payload.
    pub fn decode(self, text: &str) -> Result<Vec<u8>> {
        if text.len() != self.text_length() {
            return Err(self.invalid(FormatIssue::Length {
                expected: self.text_length(),
                actual: text.len(),
            }));
        }
        if !text.starts_with(self.text_prefix()) {
            return Err(self.invalid(FormatIssue::Prefix));
        }

        let mut bytes =
            base58::decode_check(text).map_err(|e| self.invalid(FormatIssue::Base58(e)))?;
        if !self.has_version_prefix(&bytes) {
            return Err(self.invalid(FormatIssue::VersionBytes));
        }

        Ok(bytes.split_off(self.version_bytes().len()))
    }

    /// Render a payload as this kind. The version bytes may already be present.
    pub fn encode(self, payload: &[u8]) -> Result<EncodedValue> {
        let payload = if self.has_version_prefix(payload) {
            &payload[self.version_bytes().len()..]
        } else {
            payload
        };
        if payload.len() != self.payload_length() {
            return Err(EncodingError::InvalidPayloadLength {
                kind: self.name(),
                expected: self.payload_length(),
                actual: payload.len(),
            });
        }

        let mut bytes = Vec::with_capacity(self.version_bytes().len() + payload.len());
        bytes.extend_from_slice(self.version_bytes());
        bytes.extend_from_slice(payload);
        let text = base58::encode_check(&bytes);

        Ok(EncodedValue::from_parts(text, self, payload.to_vec()))
    }

    fn invalid(self, reason: FormatIssue) -> EncodingError {
        EncodingError::InvalidFormat {
            kind: self.name(),
            reason,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Kind {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self> {
        Kind::from_name(s).ok_or_else(|| EncodingError::UnknownKind(s.to_string()))
    }
}

impl Serialize for Kind {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Kind {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Classify `text` against the whole registry by prefix and length.
pub fn recognize(text: &str) -> Option<Kind> {
    let kind = Kind::ALL.iter().copied().find(|kind| kind.is_valid(text));
    if kind.is_none() {
        tracing::debug!(length = text.len(), "no kind matches text");
    }
    kind
}

/// Classify raw bytes against the registry.
///
/// A kind whose version bytes are present wins over a bare payload-length
/// match; among bare matches the first kind in registry order wins.
pub fn recognize_bytes(bytes: &[u8]) -> Option<Kind> {
    Kind::ALL
        .iter()
        .copied()
        .find(|kind| kind.has_version_prefix(bytes))
        .or_else(|| {
            Kind::ALL
                .iter()
                .copied()
                .find(|kind| bytes.len() == kind.payload_length())
        })
}
