//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Upkeep - browser-project maintenance utilities
///
/// One-shot batch tools that keep vendored upstream files, localized search
/// plugins and dependency pins up to date, plus wiring for end-to-end sync
/// test sessions.
#[derive(Parser, Debug)]
#[command(
    name = "upkeep",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Maintenance utilities for browser-project assets",
    long_about = "Upkeep bundles the recurring maintenance chores of a browser project: \
                  pulling upstream source files that are vendored into the tree, scraping \
                  and locale-adapting search-engine plugins, assembling end-to-end sync \
                  test sessions, and bumping pinned dependency versions.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  upkeep sync\n    \
                  upkeep plugins\n    \
                  upkeep bump\n    \
                  upkeep session --browser /opt/firefox/firefox\n\n\
                  \x1b[1m\x1b[32mConfiguration:\x1b[0m\n    \
                  Reads <root>/upkeep.yaml when present, otherwise built-in defaults."
)]
pub struct Cli {
    /// Project root directory (defaults to current directory)
    #[arg(long, short = 'r', global = true)]
    pub root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pull upstream source files and update local copies that changed
    Sync(SyncArgs),

    /// Rebuild the localized search-plugin tree from the l10n host
    Plugins(PluginsArgs),

    /// Assemble a sync test session (browser, add-on, profile, driver)
    Session(SessionArgs),

    /// Bump pinned dependency versions to the newest repository tag
    Bump(BumpArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the sync command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Sync the configured upstream file list:\n    upkeep sync\n\n\
                  Sync against a checkout elsewhere:\n    upkeep sync --root ~/src/browser")]
pub struct SyncArgs {}

/// Arguments for the plugins command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Rebuild SearchPlugins/ for all supported locales:\n    upkeep plugins")]
pub struct PluginsArgs {}

/// Arguments for the session command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Download browser and add-on, then print the wiring:\n    upkeep session\n\n\
                  Use a local browser build:\n    upkeep session --browser /opt/firefox/firefox\n\n\
                  Use a local add-on package:\n    upkeep session --addon ./tps.xpi")]
pub struct SessionArgs {
    /// Path to a browser binary (defaults to downloading the latest build)
    #[arg(long)]
    pub browser: Option<PathBuf>,

    /// Path to the sync-test add-on package (defaults to downloading it)
    #[arg(long)]
    pub addon: Option<PathBuf>,
}

/// Arguments for the bump command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Check the dependency repository and patch stale pins:\n    upkeep bump")]
pub struct BumpArgs {}

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    upkeep completions --shell bash > ~/.bash_completion.d/upkeep\n\n\
                  Generate zsh completions:\n    upkeep completions --shell zsh > ~/.zfunc/_upkeep\n\n\
                  Generate fish completions:\n    upkeep completions --shell fish > ~/.config/fish/completions/upkeep.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long)]
    pub shell: String,
}
