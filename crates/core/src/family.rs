//! Checked wrappers over groups of kinds.
//!
//! Each wrapper is an [`EncodedValue`] whose kind is known to belong to the
//! wrapper's set, so an `Address` can never hold a block hash.

use crate::encoded::{EncodedValue, EncodingError, Result};
use crate::kind::{recognize, Family, Kind};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

macro_rules! identifier_family {
    ($(#[$meta:meta])* $name:ident, $label:literal, |$kind:ident| $accepts:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(EncodedValue);

        impl $name {
            /// Whether values of `kind` belong to this set.
            pub fn accepts($kind: Kind) -> bool {
                $accepts
            }

            /// Recognize and validate `text`, rejecting kinds outside this set.
            pub fn parse(text: &str) -> Result<Self> {
                match recognize(text) {
                    Some(kind) if Self::accepts(kind) => Ok(Self(kind.parse(text)?)),
                    _ => Err(EncodingError::Unrecognized {
                        expected: $label,
                        text: text.to_string(),
                    }),
                }
            }

            pub fn kind(&self) -> Kind {
                self.0.kind()
            }

            pub fn text(&self) -> &str {
                self.0.text()
            }

            pub fn payload(&self) -> &[u8] {
                self.0.payload()
            }

            pub fn as_encoded(&self) -> &EncodedValue {
                &self.0
            }

            pub fn into_encoded(self) -> EncodedValue {
                self.0
            }
        }

        impl TryFrom<EncodedValue> for $name {
            type Error = EncodingError;

            fn try_from(value: EncodedValue) -> Result<Self> {
                if Self::accepts(value.kind()) {
                    Ok(Self(value))
                } else {
                    Err(EncodingError::Unrecognized {
                        expected: $label,
                        text: value.into_string(),
                    })
                }
            }
        }

        impl From<$name> for EncodedValue {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl FromStr for $name {
            type Err = EncodingError;

            fn from_str(s: &str) -> Result<Self> {
                Self::parse(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                self.0.serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let text = String::deserialize(deserializer)?;
                Self::parse(&text).map_err(serde::de::Error::custom)
            }
        }
    };
}

identifier_family!(
    /// An implicit account: tz1, tz2, tz3 or tz4.
    ImplicitAddress,
    "implicit address",
    |kind| kind.family() == Family::PublicKeyHash
);

identifier_family!(
    /// Any account or rollup that can be the target of a transfer.
    Address,
    "address",
    |kind| matches!(
        kind.family(),
        Family::PublicKeyHash | Family::ContractHash | Family::RollupAddress
    )
);

identifier_family!(
    /// An Ed25519, Secp256K1, P256 or BLS12-381 public key.
    PublicKey,
    "public key",
    |kind| kind.family() == Family::PublicKey
);

identifier_family!(
    /// A curve-specific or generic signature.
    Signature,
    "signature",
    |kind| kind.family() == Family::Signature
);

impl Address {
    /// Whether this is an implicit (tz) account.
    pub fn is_implicit(&self) -> bool {
        ImplicitAddress::accepts(self.kind())
    }
}

impl From<ImplicitAddress> for Address {
    fn from(value: ImplicitAddress) -> Self {
        Address(value.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TZ1: &str = "tz1ZSs43ujit1oRsVn67Asz3pTMF8R6CXWPi";
    const KT1: &str = "KT18anmnvhqTsgqTwasxpLKYWcLJnGRX3m2D";
    const BLOCK: &str = "BKiHSFY5yPf2ne3BSAWXhFKVfA7GUk484ACE9Rk2PNhS9BEYg2w";

    #[test]
    fn test_address_accepts_implicit_and_contract() {
        let implicit = Address::parse(TZ1).unwrap();
        assert!(implicit.is_implicit());

        let contract = Address::parse(KT1).unwrap();
        assert!(!contract.is_implicit());
        assert_eq!(contract.kind(), Kind::ContractHash);
    }

    #[test]
    fn test_address_rejects_other_kinds() {
        let err = Address::parse(BLOCK).unwrap_err();
        assert!(matches!(
            err,
            EncodingError::Unrecognized {
                expected: "address",
                ..
            }
        ));
        assert!(ImplicitAddress::parse(KT1).is_err());
    }

    #[test]
    fn test_try_from_encoded() {
        let value = EncodedValue::recognize(BLOCK).unwrap();
        assert!(Signature::try_from(value).is_err());

        let value = EncodedValue::recognize(TZ1).unwrap();
        let implicit = ImplicitAddress::try_from(value).unwrap();
        let address: Address = implicit.into();
        assert_eq!(address.text(), TZ1);
    }

    #[test]
    fn test_public_key_family() {
        let key = PublicKey::parse("edpkteE38F3sjXHPrNR1sfRMgdjXsSLDeJnBPAewkBtN5nmV3KcA7Q").unwrap();
        assert_eq!(key.kind(), Kind::Ed25519PublicKey);
        assert_eq!(key.payload(), (0u8..32).collect::<Vec<_>>().as_slice());
    }
}
