//! CLI argument definitions for sentix.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `tokens` | Merged token table with per-dimension sentiment |
//! | `detail` | On-chain indicators for one protocol |
//! | `history` | Recent indicator readings for one protocol |
//! | `classify` | Run a sentiment classifier on literal input |
//! | `config` | Print the effective configuration |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--config` | none | YAML configuration file |
//! | `--format` | `table` | Output format (table, json, ndjson) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--mock` | `false` | Use the built-in data set |
//! | `--strict` | `false` | Treat warnings as errors |
//! | `--log-level` | `warn` | Log filter when `RUST_LOG` is unset |
//! | `--log-json` | `false` | Emit logs as JSON lines |
//!
//! # Examples
//!
//! ```bash
//! sentix tokens
//! sentix --format json --pretty detail parent#aave
//! sentix classify fundamental "Top 5% by revenue"
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Crypto Sentinel - token sentiment dashboard
#[derive(Debug, Parser)]
#[command(
    name = "sentix",
    author,
    version,
    about = "Token sentiment dashboard combining fundamental and on-chain signals"
)]
pub struct Cli {
    /// YAML configuration file; `SENTIX_*` environment variables override it.
    #[arg(long, global = true, env = "SENTIX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Serve the built-in data set instead of calling the upstream services.
    #[arg(long, global = true, default_value_t = false)]
    pub mock: bool,

    /// Treat warnings and errors as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true, default_value_t = false)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain-text table for terminal display.
    Table,
    /// Single JSON object output.
    Json,
    /// Newline-delimited JSON: the envelope meta, then one line per item.
    Ndjson,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load both feeds and print the merged token table.
    Tokens(TokensArgs),
    /// Show on-chain indicators for one protocol.
    Detail(ProtocolArgs),
    /// Show the most recent indicator readings for one protocol.
    History(ProtocolArgs),
    /// Run a sentiment classifier on literal input.
    Classify(ClassifyArgs),
    /// Print the effective configuration.
    Config,
}

#[derive(Debug, Args)]
pub struct TokensArgs {
    /// Fundamental feed page to request.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    pub page: u64,
}

#[derive(Debug, Args)]
pub struct ProtocolArgs {
    /// Protocol id, e.g. `parent#aave` (case-insensitive).
    pub protocol: String,
}

#[derive(Debug, Args)]
pub struct ClassifyArgs {
    #[command(subcommand)]
    pub command: ClassifyCommand,
}

#[derive(Debug, Subcommand)]
pub enum ClassifyCommand {
    /// Classify a fundamental rank description.
    Fundamental {
        /// Free-text rank description, e.g. "Top 10% of protocols".
        text: String,
    },
    /// Combine three sentiments into the overall sentiment.
    Overall {
        fundamental: String,
        onchain: String,
        technical: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["sentix", "detail", "parent#aave", "--format", "json", "--mock"])
            .expect("parses");

        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.mock);
        assert!(matches!(cli.command, Command::Detail(ref args) if args.protocol == "parent#aave"));
    }

    #[test]
    fn rejects_page_zero() {
        assert!(Cli::try_parse_from(["sentix", "tokens", "--page", "0"]).is_err());
    }
}
