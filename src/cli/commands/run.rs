//! `changeling run` - drive a full extraction against a scripted UI.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::display;
use crate::domain::models::{MemberList, ProgressUpdate, RunState};
use crate::domain::ports::{DirectoryProvider, NullDirectory, RunObserver, SyncClient};
use crate::infrastructure::{ConfigLoader, HttpSyncClient, JsonDirectory, ScriptedUiDriver, UiScript};
use crate::services::ExtractionEngine;

#[derive(Args)]
pub struct RunArgs {
    /// Scripted UI fixture (JSON screen graph)
    #[arg(long)]
    pub script: PathBuf,

    /// Contact directory snapshot (JSON array)
    #[arg(long)]
    pub contacts: Option<PathBuf>,

    /// Config file to use instead of the .changeling/ search path
    #[arg(long)]
    pub config: Option<PathBuf>,
}

struct SpinnerObserver {
    bar: ProgressBar,
}

impl RunObserver for SpinnerObserver {
    fn on_state_change(&self, update: &ProgressUpdate) {
        self.bar
            .set_message(format!("[{}] {}", update.step, update.progress));
    }

    fn on_lists_changed(&self, lists: &[MemberList]) {
        self.bar.set_prefix(format!("{} lists", lists.len()));
    }
}

pub async fn execute(args: RunArgs, json: bool) -> Result<()> {
    let config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    let raw = std::fs::read_to_string(&args.script)
        .with_context(|| format!("failed to read {}", args.script.display()))?;
    let script: UiScript = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", args.script.display()))?;
    let driver = Arc::new(ScriptedUiDriver::new(script));

    let directory: Arc<dyn DirectoryProvider> = match &args.contacts {
        Some(path) => Arc::new(JsonDirectory::new(path.clone())),
        None => Arc::new(NullDirectory),
    };
    let sync: Arc<dyn SyncClient> = Arc::new(HttpSyncClient::new(&config.sync)?);

    let engine = Arc::new(ExtractionEngine::new(driver, directory, sync, config));

    let bar = if json {
        None
    } else {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{prefix} {spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(80));
        engine.subscribe(Arc::new(SpinnerObserver { bar: bar.clone() }));
        Some(bar)
    };

    engine.start()?;
    engine.join().await;

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    let session = engine.session();
    match session.state {
        RunState::Complete => {
            let lists = engine.lists();
            if json {
                println!("{}", serde_json::to_string_pretty(&lists)?);
            } else {
                println!("{}", display::lists_table(&lists));
                for list in lists.iter().filter(|l| l.is_aggregate) {
                    println!("\n{}", console::style(&list.name).bold());
                    println!("{}", display::members_table(list));
                }
                println!(
                    "\n{} {}",
                    console::style("done:").green().bold(),
                    session.progress
                );
            }
            Ok(())
        }
        state => bail!("run ended in state '{}': {}", state, session.progress),
    }
}
