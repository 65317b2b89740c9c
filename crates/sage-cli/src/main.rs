//! Sage CLI: run the vault tools from a terminal.
//!
//! Gated tools (rename, delete, move, folder changes) register a pending
//! operation; the CLI then asks for a decision, or takes it from
//! `--approve`/`--reject`, and prints the operation's result.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config_bridge;
mod theme;

use commands::{call, config, tools};

/// Sage - approval-gated tools for a markdown vault
#[derive(Parser)]
#[command(name = "sage")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Extra configuration file layered over ~/.sage/config.toml
    #[arg(short, long, global = true, env = "SAGE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every tool definition as JSON
    Tools,

    /// Run one tool against a vault
    Call {
        /// Tool name (see `sage tools`)
        tool: String,

        /// Tool arguments as a JSON object
        #[arg(default_value = "{}")]
        args: String,

        /// Vault root (defaults to `vault.root`, then the current directory)
        #[arg(long)]
        vault: Option<PathBuf>,

        /// Approve a pending operation without prompting
        #[arg(long, conflicts_with = "reject")]
        approve: bool,

        /// Reject a pending operation without prompting
        #[arg(long)]
        reject: bool,
    },

    /// View and check configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show resolved configuration with source annotations
    Show {
        /// Output format (toml or json)
        #[arg(short, long, default_value = "toml")]
        format: String,
        /// Show only a specific section (e.g. approval, tools)
        #[arg(short, long)]
        section: Option<String>,
    },
    /// Validate the current configuration
    Validate,
    /// Show config file paths being checked
    Paths,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = sage_config::Config::load(cli.config.as_deref());

    let log_config = match &loaded {
        Ok(resolved) => {
            let mut lc = config_bridge::to_log_config(&resolved.config);
            if cli.verbose {
                "debug".clone_into(&mut lc.level);
            }
            lc
        },
        Err(_) => {
            let level = if cli.verbose { "debug" } else { "warn" };
            sage_telemetry::LogConfig::new(level)
        },
    };
    if let Err(e) = sage_telemetry::setup_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }

    match cli.command {
        Commands::Tools => tools::print_definitions()?,
        Commands::Call {
            tool,
            args,
            vault,
            approve,
            reject,
        } => {
            let decision = if approve {
                call::Decision::Approve
            } else if reject {
                call::Decision::Reject
            } else {
                call::Decision::Prompt
            };
            call::run_call(&loaded?.config, &tool, &args, vault, decision).await?;
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show { format, section } => {
                config::show_config(loaded?, &format, section.as_deref())?;
            },
            ConfigCommands::Validate => config::validate_config(loaded),
            ConfigCommands::Paths => config::show_paths(cli.config.as_deref()),
        },
    }

    Ok(())
}
