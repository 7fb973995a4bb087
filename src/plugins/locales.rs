//! Locale lists
//!
//! The master list is a newline-separated remote text resource. The
//! supported set comes from a local tool that prints a JSON array of locale
//! codes; its output uses underscores where the rest of the pipeline uses
//! hyphens, so the substitution happens before parsing.

use std::collections::HashSet;
use std::path::Path;
use std::process::Command;

use crate::error::{Result, UpkeepError};

/// Split the remote master locale list into codes
pub fn parse_locale_list(contents: &str) -> Vec<String> {
    contents
        .trim()
        .lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Run the supported-locales tool and parse its JSON array output
pub fn supported_locales(root: &Path, command: &str) -> Result<HashSet<String>> {
    let output = Command::new(command)
        .current_dir(root)
        .output()
        .map_err(|e| UpkeepError::LocaleToolFailed {
            command: command.to_string(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(UpkeepError::LocaleToolFailed {
            command: command.to_string(),
            reason: format!(
                "exit status {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout).replace('_', "-");
    let codes: Vec<String> = serde_json::from_str(stdout.trim()).map_err(|e| {
        UpkeepError::LocaleToolOutputInvalid {
            reason: e.to_string(),
        }
    })?;

    Ok(codes.into_iter().collect())
}
