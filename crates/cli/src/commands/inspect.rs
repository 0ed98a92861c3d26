//! Recognize an identifier and show what it holds.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use tzenc_core::{recognize_bytes, EncodedValue};

#[derive(Args)]
pub struct InspectArgs {
    /// Base58Check identifier, or hex bytes with --bytes
    input: String,

    /// Treat the input as hex bytes and classify them
    #[arg(long)]
    bytes: bool,
}

pub fn run(args: InspectArgs) -> Result<()> {
    let value = if args.bytes {
        from_bytes(&args.input)?
    } else {
        EncodedValue::recognize(args.input.trim())?
    };

    let kind = value.kind();
    println!();
    println!("  Identifier: {}", value.text().bright_yellow());
    println!("  Kind:       {}", kind.name().cyan());
    println!("  Family:     {:?}", kind.family());
    println!(
        "  Version:    {}",
        hex::encode(kind.version_bytes()).bright_black()
    );
    println!("  Payload:    {}", hex::encode(value.payload()));
    println!();

    Ok(())
}

/// Classify raw bytes, with or without version bytes, and render them.
fn from_bytes(input: &str) -> Result<EncodedValue> {
    let bytes = hex::decode(input.trim().trim_start_matches("0x"))
        .with_context(|| format!("Invalid hex: {}", input))?;
    let Some(kind) = recognize_bytes(&bytes) else {
        bail!("No kind matches {} bytes", bytes.len());
    };
    Ok(kind.encode(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tzenc_core::Kind;

    const TZ1: &str = "tz1Ke3u9SqxvnkdNkgaCmydXg3zh3iaKNDxw";

    #[test]
    fn test_bare_payload() {
        let payload: Vec<u8> = (0..20).collect();
        let value = from_bytes(&hex::encode(&payload)).unwrap();
        assert_eq!(value.kind(), Kind::Ed25519PublicKeyHash);
        assert_eq!(value.text(), TZ1);
    }

    #[test]
    fn test_versioned_bytes() {
        let value = EncodedValue::recognize(TZ1).unwrap();
        let hex = format!("0x{}", hex::encode(value.to_versioned_bytes()));
        assert_eq!(from_bytes(&hex).unwrap(), value);
    }

    #[test]
    fn test_unmatched_length() {
        assert!(from_bytes("0102").is_err());
        assert!(from_bytes("zz").is_err());
    }
}
