//! Upkeep - browser-project maintenance utilities
//!
//! A command line tool bundling the recurring maintenance chores of a
//! browser project: syncing vendored upstream files, scraping and
//! locale-adapting search plugins, wiring end-to-end sync test sessions,
//! and bumping pinned dependency versions.

use clap::Parser;

mod bump;
mod cli;
mod commands;
mod common;
mod config;
mod error;
mod fetch;
mod hash;
mod plugins;
mod progress;
mod session;
mod sync;
#[cfg(test)]
mod test_fixtures;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Sync(args) => commands::sync::run(cli.root, args),
        Commands::Plugins(args) => commands::plugins::run(cli.root, args),
        Commands::Session(args) => commands::session::run(cli.root, args),
        Commands::Bump(args) => commands::bump::run(cli.root, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
