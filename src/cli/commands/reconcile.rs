//! `changeling reconcile` - offline common-members computation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::display;
use crate::domain::models::MemberList;
use crate::services::reconciler;

#[derive(Args)]
pub struct ReconcileArgs {
    /// Lists snapshot to reconcile (JSON array of lists)
    #[arg(long)]
    pub input: PathBuf,
}

pub async fn execute(args: ReconcileArgs, json: bool) -> Result<()> {
    let raw = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let lists: Vec<MemberList> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", args.input.display()))?;

    match reconciler::common_members(&lists) {
        Some(aggregate) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&aggregate)?);
            } else {
                println!("{}", console::style(&aggregate.name).bold());
                println!("{}", display::members_table(&aggregate));
            }
        }
        None => {
            if json {
                println!("null");
            } else {
                println!("No members appear in two or more lists.");
            }
        }
    }
    Ok(())
}
