//! Convert generic Micheline into typed Michelson.

use super::{render, InputArgs, Syntax};
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use tzenc_micheline::Micheline;
use tzenc_michelson::{
    normalize, Converter, ConverterConfig, Michelson, ToMicheline, DEFAULT_MAX_DEPTH,
};

#[derive(Args)]
pub struct ConvertArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output form
    #[arg(long, value_enum, default_value = "typed")]
    to: Output,

    /// Family to read the expression as
    #[arg(long = "as", value_enum, default_value = "any")]
    family: Target,

    /// Comb-normalize pairs before converting
    #[arg(long)]
    normalize: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Deepest expression accepted
    #[arg(long, env = "TZENC_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Output {
    /// Micheline JSON, rebuilt from the typed tree
    Json,
    /// Micheline text, rebuilt from the typed tree
    Text,
    /// Debug form of the typed tree
    Typed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Target {
    Any,
    Data,
    Type,
    Script,
    Instruction,
}

impl Target {
    fn name(self) -> &'static str {
        match self {
            Target::Any => "any",
            Target::Data => "data",
            Target::Type => "type",
            Target::Script => "script",
            Target::Instruction => "instruction",
        }
    }
}

pub fn run(args: ConvertArgs) -> Result<()> {
    let node = args.input.load()?;
    let output = convert(&node, &args)?;
    println!("{}", output);
    Ok(())
}

fn convert(node: &Micheline, args: &ConvertArgs) -> Result<String> {
    let normalized;
    let node = if args.normalize {
        normalized = normalize(node);
        &normalized
    } else {
        node
    };

    let converter = Converter::with_config(ConverterConfig {
        max_depth: args.max_depth,
    });
    let typed = to_typed(&converter, node, args.family)
        .with_context(|| format!("Failed to convert as {}", args.family.name()))?;
    tracing::debug!(family = args.family.name(), "converted expression");

    match args.to {
        Output::Typed => Ok(format!("{:#?}", typed)),
        Output::Json => render(&typed.to_micheline(), Syntax::Json, args.pretty),
        Output::Text => render(&typed.to_micheline(), Syntax::Text, false),
    }
}

fn to_typed(converter: &Converter, node: &Micheline, family: Target) -> Result<Michelson> {
    let typed = match family {
        Target::Any => converter.to_michelson(node)?,
        Target::Data => Michelson::Data(converter.to_data(node)?),
        Target::Type => Michelson::Type(converter.to_type(node)?),
        Target::Script => Michelson::Script(converter.to_script(node)?),
        Target::Instruction => Michelson::Instruction(converter.to_instruction(node)?),
    };
    Ok(typed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tzenc_micheline::parse_expression;

    fn args(to: Output, family: Target, normalize: bool) -> ConvertArgs {
        ConvertArgs {
            input: InputArgs {
                file: None,
                from: Syntax::Text,
            },
            to,
            family,
            normalize,
            pretty: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    #[test]
    fn test_normalize_then_convert() {
        let node = parse_expression("Pair 1 \"a\" Unit").unwrap();
        let output = convert(&node, &args(Output::Text, Target::Data, true)).unwrap();
        assert_eq!(output, "Pair 1 (Pair \"a\" Unit)");
    }

    #[test]
    fn test_json_output() {
        let node = parse_expression("option (pair nat string)").unwrap();
        let output = convert(&node, &args(Output::Json, Target::Any, false)).unwrap();
        assert_eq!(
            output,
            r#"{"prim":"option","args":[{"prim":"pair","args":[{"prim":"nat"},{"prim":"string"}]}]}"#
        );
    }

    #[test]
    fn test_typed_output() {
        let node = parse_expression("{ DROP ; UNIT }").unwrap();
        let output = convert(&node, &args(Output::Typed, Target::Instruction, false)).unwrap();
        assert!(output.starts_with("Instruction("));
    }

    #[test]
    fn test_family_mismatch() {
        let node = parse_expression("nat").unwrap();
        let err = convert(&node, &args(Output::Text, Target::Data, false)).unwrap_err();
        assert!(err.to_string().starts_with("Failed to convert as data"));
    }

    #[test]
    fn test_depth_limit() {
        let mut node = Micheline::int(0);
        for _ in 0..8 {
            node = Micheline::prim_with("Some", vec![node]);
        }
        let mut args = args(Output::Text, Target::Data, false);
        args.max_depth = 4;
        assert!(convert(&node, &args).is_err());
    }
}
