//! tzenc CLI entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "tzenc")]
#[command(about = "Checksum-encoded identifiers and Michelson trees", long_about = None)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<commands::Commands>,
}

/// Log level used when `RUST_LOG` is unset.
fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

fn init_tracing(verbose: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose))),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(cmd) => {
            if let Err(e) = commands::run(cmd) {
                eprintln!("Error: {:#}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("tzenc - Checksum-encoded identifiers and Michelson trees");
            println!("Run 'tzenc --help' for usage information.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(0), "warn");
        assert_eq!(default_filter(1), "debug");
        assert_eq!(default_filter(2), "trace");
        assert_eq!(default_filter(u8::MAX), "trace");
    }

    #[test]
    fn test_verbose_flag_counts() {
        let cli = Cli::try_parse_from(["tzenc", "-vv", "kinds"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(default_filter(cli.verbose), "trace");

        let cli = Cli::try_parse_from(["tzenc"]).unwrap();
        assert_eq!(cli.verbose, 0);
        assert!(cli.command.is_none());
    }
}
