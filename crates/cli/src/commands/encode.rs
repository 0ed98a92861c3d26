//! Render a payload as an identifier.

use anyhow::{Context, Result};
use clap::Args;
use tzenc_core::{EncodedValue, Kind};

#[derive(Args)]
pub struct EncodeArgs {
    /// Kind name, as listed by `tzenc kinds`
    #[arg(short, long)]
    kind: Kind,

    /// Payload as hex, without version bytes
    payload: String,
}

pub fn run(args: EncodeArgs) -> Result<()> {
    let value = encode(args.kind, &args.payload)?;
    println!("{}", value);
    Ok(())
}

fn encode(kind: Kind, payload: &str) -> Result<EncodedValue> {
    let bytes = hex::decode(payload.trim().trim_start_matches("0x"))
        .with_context(|| format!("Invalid hex payload: {}", payload))?;
    Ok(kind.encode(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_contract_hash() {
        let payload = hex::encode((0..20).collect::<Vec<u8>>());
        let value = encode(Kind::ContractHash, &payload).unwrap();
        assert_eq!(value.text(), "KT18anmnvhqTsgqTwasxpLKYWcLJnGRX3m2D");
    }

    #[test]
    fn test_wrong_length() {
        let err = encode(Kind::ChainId, "00010203ff").unwrap_err();
        assert!(err.to_string().contains("expected 4 bytes"));
    }

    #[test]
    fn test_kind_argument_parses() {
        assert_eq!("chain_id".parse::<Kind>().unwrap(), Kind::ChainId);
        assert!("nope".parse::<Kind>().is_err());
    }
}
