//! CLI for the qbal queue rebalancer.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use qbal_core::config;
use std::path::PathBuf;

use commands::{run_rebalancer, run_status};

/// Top-level CLI for the qbal queue rebalancer.
#[derive(Debug, Parser)]
#[command(name = "qbal")]
#[command(about = "qbal: throughput-driven priority rebalancing for a qBittorrent queue", long_about = None)]
pub struct Cli {
    /// Path to the config file (default: ~/.config/qbal/config.toml).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run the rebalance loop until interrupted.
    Run {
        /// Perform exactly one tick (including the full-window stall check)
        /// and exit.
        #[arg(long)]
        once: bool,
    },

    /// Show the active queue with current speeds and exit.
    Status,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = match &cli.config {
            Some(path) => config::load_or_init_at(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);
        cfg.validate().context("invalid configuration")?;

        match cli.command {
            CliCommand::Run { once } => run_rebalancer(&cfg, once).await?,
            CliCommand::Status => run_status(&cfg).await?,
        }

        Ok(())
    }
}
