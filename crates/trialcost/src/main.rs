// SPDX-FileCopyrightText: 2026 Trialcost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! trialcost - estimate what it costs to feed query results to a language model.
//!
//! This is the binary entry point.

mod estimate;
mod pricing;
mod tokens;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use trialcost_config::TrialCostConfig;
use trialcost_core::TrialCostError;

/// trialcost - token and cost estimation for query result sets.
#[derive(Parser, Debug)]
#[command(name = "trialcost", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Estimate the cost of rows read from a JSON array.
    Estimate {
        /// File holding a JSON array of rows, or `-` for stdin.
        #[arg(long, value_name = "FILE")]
        rows: String,
        /// Seconds the query took to execute.
        #[arg(long, value_name = "SECS", allow_negative_numbers = true)]
        execution_time: f64,
        /// Name shown in the report title.
        #[arg(long, default_value = "Query")]
        name: String,
        /// Print the estimate as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Run a query against SQLite and estimate its result set.
    Query {
        /// SQL to execute.
        #[arg(long)]
        sql: String,
        /// Database file (defaults to `database.path`).
        #[arg(long, value_name = "PATH")]
        db: Option<String>,
        /// Name shown in the report title.
        #[arg(long, default_value = "Query")]
        name: String,
        /// Print the estimate as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Count the tokens in a text and price its embedding.
    Tokens {
        /// Text to measure; read from stdin when omitted.
        text: Option<String>,
    },
    /// Print the effective price table.
    Pricing,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("trialcost: {e}");
            std::process::exit(1);
        }
    };

    init_tracing(&config.report.log_level);

    if let Err(e) = run(cli.command, &config).await {
        eprintln!("trialcost: {e}");
        std::process::exit(1);
    }
}

/// Load and validate the configuration, rendering any diagnostics to stderr.
fn load_config(path: Option<&Path>) -> Result<TrialCostConfig, TrialCostError> {
    let loaded = match path {
        Some(path) => trialcost_config::load_and_validate_path(path),
        None => trialcost_config::load_and_validate(),
    };
    loaded.map_err(|errors| {
        trialcost_config::render_errors(&errors);
        let noun = if errors.len() == 1 { "problem" } else { "problems" };
        TrialCostError::Config(format!("{} {noun} found", errors.len()))
    })
}

async fn run(command: Commands, config: &TrialCostConfig) -> Result<(), TrialCostError> {
    match command {
        Commands::Estimate {
            rows,
            execution_time,
            name,
            json,
        } => estimate::run_estimate(config, &rows, execution_time, &name, json),
        Commands::Query {
            sql,
            db,
            name,
            json,
        } => estimate::run_query(config, &sql, db.as_deref(), &name, json).await,
        Commands::Tokens { text } => tokens::run_tokens(&config.pricing, text),
        Commands::Pricing => pricing::run_pricing(&config.pricing),
    }
}

/// Initialize the tracing subscriber on stderr.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let level = log_level.to_ascii_lowercase();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("trialcost={level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_estimate_arguments() {
        let cli = Cli::try_parse_from([
            "trialcost",
            "estimate",
            "--rows",
            "rows.json",
            "--execution-time",
            "2.5",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Estimate {
                rows,
                execution_time,
                name,
                json,
            } => {
                assert_eq!(rows, "rows.json");
                assert_eq!(execution_time, 2.5);
                assert_eq!(name, "Query");
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn negative_execution_time_reaches_validation() {
        let cli = Cli::try_parse_from([
            "trialcost",
            "estimate",
            "--rows",
            "-",
            "--execution-time",
            "-1",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Estimate { execution_time, .. } if execution_time == -1.0
        ));
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["trialcost", "pricing", "--config", "custom.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(matches!(cli.command, Commands::Pricing));
    }

    #[test]
    fn query_requires_sql() {
        assert!(Cli::try_parse_from(["trialcost", "query"]).is_err());
    }

    #[test]
    fn missing_config_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(dir.path().join("absent.toml").as_path())).unwrap_err();
        assert!(matches!(err, TrialCostError::Config(_)));
        assert_eq!(err.to_string(), "configuration error: 1 problem found");
    }

    #[test]
    fn explicit_config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trialcost.toml");
        std::fs::write(&path, "[pricing]\nstorage_per_gb = 0.2\n").unwrap();
        let config = load_config(Some(path.as_path())).unwrap();
        assert_eq!(config.pricing.storage_per_gb, 0.2);
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = trialcost_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.report.log_level, "info");
    }
}
