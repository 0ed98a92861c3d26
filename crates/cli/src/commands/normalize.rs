//! Comb-normalize a Micheline expression.

use super::{render, InputArgs, Syntax};
use anyhow::Result;
use clap::Args;
use tzenc_michelson::normalize;

#[derive(Args)]
pub struct NormalizeArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output syntax; defaults to the input syntax
    #[arg(long, value_enum)]
    to: Option<Syntax>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

pub fn run(args: NormalizeArgs) -> Result<()> {
    let node = args.input.load()?;
    let syntax = args.to.unwrap_or(args.input.from);
    println!("{}", render(&normalize(&node), syntax, args.pretty)?);
    Ok(())
}
