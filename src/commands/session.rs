//! Session command implementation
//!
//! Builds the test-session context and prints the resolved handles, which
//! is also the debugging aid when a fixture resolves unexpectedly.

use std::path::PathBuf;

use console::style;

use crate::cli::SessionArgs;
use crate::config::UpkeepConfig;
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::session::driver::{ENV_ACCOUNT_EMAIL, ENV_ACCOUNT_PASSWORD};
use crate::session::report::collect_report;
use crate::session::{AccountCredentials, SessionContext, SessionOptions};

/// Run session command
pub fn run(root: Option<PathBuf>, args: SessionArgs) -> Result<()> {
    let root = super::resolve_root(root)?;
    let config = UpkeepConfig::load(&root)?;
    let fetcher = Fetcher::new()?;

    let work_dir = tempfile::Builder::new()
        .prefix("upkeep-session-")
        .tempdir()?
        // The session outlives this process; the directory must too.
        .keep();

    let options = SessionOptions {
        browser: args.browser,
        addon: args.addon,
        credentials: credentials_from_env(),
        work_dir,
    };

    println!("{} test session", style("Assembling").green().bold());
    let context = SessionContext::build(&config.session, &options, &fetcher)?;

    println!("  browser: {}", context.browser.display());
    println!("  add-on:  {}", context.addon.display());
    println!("  profile: {}", context.profile_dir.display());
    println!(
        "  driver:  {} (log: {})",
        context.driver.program(),
        context.driver.log_path().display()
    );
    println!("  logs:");
    for (title, path) in context.logs.categories() {
        println!("    {}: {}", title.to_lowercase(), path.display());
    }
    println!();
    for (key, value) in &context.metadata {
        println!("  {} = {}", key, value);
    }

    // A rebuilt session may sit on top of earlier runs; surface any logs
    // that would be attached to the next report.
    let sections = collect_report(&context)?;
    if !sections.is_empty() {
        println!();
        println!("  existing logs:");
        for section in &sections {
            println!("    [{}] {}", section.title, section.source.display());
        }
    }

    Ok(())
}

/// Credentials come from the caller's environment when set; otherwise a
/// throwaway test account address is derived from the session start time.
fn credentials_from_env() -> AccountCredentials {
    let fallback_tag = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    AccountCredentials {
        email: std::env::var(ENV_ACCOUNT_EMAIL)
            .unwrap_or_else(|_| format!("upkeep-{}@restmail.net", fallback_tag)),
        password: std::env::var(ENV_ACCOUNT_PASSWORD)
            .unwrap_or_else(|_| format!("upkeep-{}", fallback_tag)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_credentials_prefer_environment() {
        // SAFETY: serialized test; no other thread reads the environment.
        unsafe {
            std::env::set_var(ENV_ACCOUNT_EMAIL, "configured@restmail.net");
            std::env::set_var(ENV_ACCOUNT_PASSWORD, "configured-password");
        }
        let credentials = credentials_from_env();
        unsafe {
            std::env::remove_var(ENV_ACCOUNT_EMAIL);
            std::env::remove_var(ENV_ACCOUNT_PASSWORD);
        }
        assert_eq!(credentials.email, "configured@restmail.net");
        assert_eq!(credentials.password, "configured-password");
    }

    #[test]
    #[serial]
    fn test_credentials_fallback_is_test_account() {
        // SAFETY: serialized test; no other thread reads the environment.
        unsafe {
            std::env::remove_var(ENV_ACCOUNT_EMAIL);
            std::env::remove_var(ENV_ACCOUNT_PASSWORD);
        }
        let credentials = credentials_from_env();
        assert!(credentials.email.ends_with("@restmail.net"));
        assert!(!credentials.password.is_empty());
    }
}
