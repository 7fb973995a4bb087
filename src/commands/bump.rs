//! Bump command implementation

use std::path::PathBuf;

use console::style;

use crate::bump::{BumpAction, run_bump};
use crate::cli::BumpArgs;
use crate::config::UpkeepConfig;
use crate::error::Result;
use crate::fetch::Fetcher;

/// Run bump command
pub fn run(root: Option<PathBuf>, _args: BumpArgs) -> Result<()> {
    let root = super::resolve_root(root)?;
    let config = UpkeepConfig::load(&root)?;
    let fetcher = Fetcher::new()?;

    println!(
        "{} {}",
        style("Checking").green().bold(),
        config.bump.tags_url
    );

    let outcomes = run_bump(&root, &config.bump, &fetcher)?;
    for outcome in &outcomes {
        match &outcome.action {
            BumpAction::Updated { from, to } => {
                println!(
                    "  {}: {} -> {}",
                    outcome.target,
                    from,
                    style(to).green().bold()
                );
            }
            BumpAction::UpToDate { current } => {
                println!("  {}: up to date ({})", outcome.target, current);
            }
            BumpAction::SkippedUnknownCurrent { reason } => {
                println!(
                    "  {}: {} current version unknown, skipping ({})",
                    outcome.target,
                    style("warning:").yellow().bold(),
                    reason
                );
            }
        }
    }

    Ok(())
}
