//! Command-line interface.

pub mod commands;
pub mod display;

use clap::{Parser, Subcommand};

/// Top-level CLI definition.
#[derive(Parser)]
#[command(
    name = "changeling",
    version,
    about = "Autonomous list extraction and cross-list member reconciliation"
)]
pub struct Cli {
    /// Emit machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Drive a full extraction run against a scripted UI fixture
    Run(commands::run::RunArgs),
    /// Compute the common-members aggregate over a stored lists file
    Reconcile(commands::reconcile::ReconcileArgs),
}

/// Prints an error in the selected output mode and exits non-zero.
pub fn handle_error(err: anyhow::Error, json: bool) {
    if json {
        let payload = serde_json::json!({ "success": false, "error": format!("{err:#}") });
        eprintln!("{payload}");
    } else {
        eprintln!("{} {err:#}", console::style("error:").red().bold());
    }
    std::process::exit(1);
}
