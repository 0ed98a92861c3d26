//! List the identifier registry.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use tzenc_core::Kind;

#[derive(Args)]
pub struct KindsArgs {
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: KindsArgs) -> Result<()> {
    if args.json {
        let rows: Vec<_> = Kind::ALL.iter().map(|kind| row(*kind)).collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!(
        "  {:<30} {:<8} {:>6} {:>8}  {}",
        "Kind".bold(),
        "Prefix".bold(),
        "Length".bold(),
        "Payload".bold(),
        "Family".bold()
    );
    for kind in Kind::ALL {
        println!(
            "  {:<30} {:<8} {:>6} {:>8}  {}",
            kind.name().cyan(),
            kind.text_prefix().bright_yellow(),
            kind.text_length(),
            kind.payload_length(),
            format!("{:?}", kind.family()).bright_black()
        );
    }
    println!();
    println!("  {} kinds", Kind::ALL.len());

    Ok(())
}

fn row(kind: Kind) -> serde_json::Value {
    serde_json::json!({
        "kind": kind,
        "prefix": kind.text_prefix(),
        "version_bytes": hex::encode(kind.version_bytes()),
        "text_length": kind.text_length(),
        "payload_length": kind.payload_length(),
        "family": format!("{:?}", kind.family()),
    })
}
