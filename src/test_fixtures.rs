//! Test fixtures and utilities for reducing test setup duplication.
//!
//! Unit tests across the utilities need the same few things: a config
//! pointed at a mock server and a throwaway set of account credentials.
//! These helpers build them in one call.

use crate::config::{BumpConfig, BumpTarget, SessionConfig, SyncConfig};
use crate::session::AccountCredentials;

/// Sync config pointed at a mock server's `/raw/` prefix, writing into a
/// `vendor/` directory under the test root.
pub fn sync_config_for(base_url: &str, files: &[&str]) -> SyncConfig {
    SyncConfig {
        remote_base: format!("{}/raw/", base_url),
        target_dir: "vendor".to_string(),
        files: files.iter().map(|f| f.to_string()).collect(),
    }
}

/// Session config with explicit artifact URLs and a driver that exists on
/// any test machine.
pub fn test_session_config(browser_url: &str, addon_url: &str) -> SessionConfig {
    SessionConfig {
        browser_url: browser_url.to_string(),
        addon_url: addon_url.to_string(),
        driver_program: "true".to_string(),
    }
}

/// Throwaway sync account credentials
pub fn test_credentials() -> AccountCredentials {
    AccountCredentials {
        email: "upkeep-test@restmail.net".to_string(),
        password: "hunter2hunter2".to_string(),
    }
}

/// Bump config with one target rooted in the test directory
pub fn bump_config_for(tags_url: &str, marker_file: Option<&str>) -> BumpConfig {
    BumpConfig {
        tags_url: tags_url.to_string(),
        targets: vec![BumpTarget {
            name: "app".to_string(),
            pin_file: "Package.resolved".to_string(),
            pin_identity: "rust-components-swift".to_string(),
            project_file: "project.pbxproj".to_string(),
            project_marker: "https://github.com/mozilla/rust-components-swift".to_string(),
            marker_file: marker_file.map(|m| m.to_string()),
        }],
    }
}
