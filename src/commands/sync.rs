//! Sync command implementation

use std::path::PathBuf;

use console::style;

use crate::cli::SyncArgs;
use crate::config::UpkeepConfig;
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::progress::ProgressDisplay;
use crate::sync::{SyncOutcome, run_sync};

/// Run sync command
pub fn run(root: Option<PathBuf>, _args: SyncArgs) -> Result<()> {
    let root = super::resolve_root(root)?;
    let config = UpkeepConfig::load(&root)?;
    let fetcher = Fetcher::new()?;

    println!(
        "{} {} upstream files into {}",
        style("Syncing").green().bold(),
        config.sync.files.len(),
        config.sync.target_dir
    );

    let progress = ProgressDisplay::new(config.sync.files.len() as u64);
    let report = match run_sync(&root, &config.sync, &fetcher, &progress) {
        Ok(report) => {
            progress.finish();
            report
        }
        Err(e) => {
            progress.abandon();
            return Err(e);
        }
    };

    println!(
        "{} {} new, {} updated, {} unchanged",
        style("Done:").green().bold(),
        report.count(SyncOutcome::Adopted),
        report.count(SyncOutcome::Updated),
        report.count(SyncOutcome::Unchanged)
    );

    Ok(())
}
