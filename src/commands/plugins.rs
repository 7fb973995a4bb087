//! Plugins command implementation

use std::path::PathBuf;

use console::style;

use crate::cli::PluginsArgs;
use crate::config::UpkeepConfig;
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::plugins::run_plugins;
use crate::progress::ProgressDisplay;

/// Run plugins command
pub fn run(root: Option<PathBuf>, _args: PluginsArgs) -> Result<()> {
    let root = super::resolve_root(root)?;
    let config = UpkeepConfig::load(&root)?;
    let fetcher = Fetcher::new()?;

    println!(
        "{} localized search plugins into {}",
        style("Rebuilding").green().bold(),
        config.plugins.output_dir
    );

    // Locale count isn't known until the master list is fetched; let the
    // bar grow as status lines stream past it.
    let progress = ProgressDisplay::new(0);
    let report = match run_plugins(&root, &config.plugins, &fetcher, &progress) {
        Ok(report) => {
            progress.finish();
            report
        }
        Err(e) => {
            progress.abandon();
            return Err(e);
        }
    };

    let files: usize = report.written.iter().map(|(_, count)| count).sum();
    println!(
        "{} {} locales written ({} plugin files), {} skipped",
        style("Done:").green().bold(),
        report.written.len(),
        files,
        report.skipped.len()
    );

    Ok(())
}
