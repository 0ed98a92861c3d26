//! Subcommands of the `tzenc` binary.

use anyhow::{Context, Result};
use clap::{Subcommand, ValueEnum};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tzenc_micheline::{parse_expression, Micheline};

mod convert;
mod encode;
mod inspect;
mod kinds;
mod normalize;

#[derive(Subcommand)]
pub enum Commands {
    /// List every identifier kind
    Kinds(kinds::KindsArgs),
    /// Recognize and validate an identifier
    Inspect(inspect::InspectArgs),
    /// Render a hex payload as an identifier of the given kind
    Encode(encode::EncodeArgs),
    /// Convert a Micheline expression to typed Michelson
    Convert(convert::ConvertArgs),
    /// Rewrite pair applications into right combs
    Normalize(normalize::NormalizeArgs),
}

pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Kinds(args) => kinds::run(args),
        Commands::Inspect(args) => inspect::run(args),
        Commands::Encode(args) => encode::run(args),
        Commands::Convert(args) => convert::run(args),
        Commands::Normalize(args) => normalize::run(args),
    }
}

/// Syntax of a Micheline document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Syntax {
    /// JSON wire form
    Json,
    /// Concrete text syntax
    Text,
}

/// Read a whole file, or stdin when no path is given.
pub(crate) fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read stdin")?;
            Ok(input)
        }
    }
}

pub(crate) fn parse_input(input: &str, syntax: Syntax) -> Result<Micheline> {
    match syntax {
        Syntax::Json => serde_json::from_str(input).context("Invalid Micheline JSON"),
        Syntax::Text => parse_expression(input).context("Invalid Micheline text"),
    }
}

pub(crate) fn render(node: &Micheline, syntax: Syntax, pretty: bool) -> Result<String> {
    match syntax {
        Syntax::Json if pretty => Ok(serde_json::to_string_pretty(node)?),
        Syntax::Json => Ok(serde_json::to_string(node)?),
        Syntax::Text => Ok(node.to_string()),
    }
}

/// Input shared by the tree commands.
#[derive(clap::Args)]
pub struct InputArgs {
    /// File to read; stdin when omitted
    pub file: Option<PathBuf>,

    /// Syntax of the input
    #[arg(long, value_enum, default_value = "json")]
    pub from: Syntax,
}

impl InputArgs {
    pub(crate) fn load(&self) -> Result<Micheline> {
        let input = read_input(self.file.as_deref())?;
        parse_input(&input, self.from)
    }
}
