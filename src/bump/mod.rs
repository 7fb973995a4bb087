//! Dependency version bumper
//!
//! Checks the dependency repository for its newest tag and patches the
//! pinned versions recorded in each target's pin file and build-project
//! file. Patching is literal find-and-replace of the old tag/commit
//! strings; nothing is structurally rewritten.

pub mod pinfile;
pub mod project;
pub mod tags;

use std::fs;
use std::path::Path;

use crate::common::fs::{read_text, write_text};
use crate::config::{BumpConfig, BumpTarget};
use crate::error::{Result, UpkeepError};
use crate::fetch::Fetcher;

use pinfile::VersionRecord;
use tags::LatestTag;

/// What happened for one bump target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BumpAction {
    /// Both files patched, marker written when configured
    Updated { from: String, to: String },
    /// Current version is not older than the newest tag
    UpToDate { current: String },
    /// Current version could not be determined; nothing patched
    SkippedUnknownCurrent { reason: String },
}

/// Per-target outcome of a bump run
#[derive(Debug, Clone)]
pub struct BumpOutcome {
    pub target: String,
    pub action: BumpAction,
}

/// Compare version strings the way the pin files always have been
/// compared: plain string ordering. This is lexicographic, not numeric —
/// `"9.0"` sorts after `"10.0"` — and is kept as-is deliberately; the
/// calendar-style tags this tool sees never hit the divergence.
pub fn is_outdated(current: &str, latest: &str) -> bool {
    current < latest
}

/// Check every configured target against the newest repository tag
pub fn run_bump(root: &Path, config: &BumpConfig, fetcher: &Fetcher) -> Result<Vec<BumpOutcome>> {
    let latest = tags::fetch_latest(fetcher, &config.tags_url)?;

    let mut outcomes = Vec::new();
    for target in &config.targets {
        let action = bump_target(root, target, &latest)?;
        outcomes.push(BumpOutcome {
            target: target.name.clone(),
            action,
        });
    }
    Ok(outcomes)
}

/// Check one target and patch its files when stale.
///
/// An unreadable pin or project file does not fail the run: the target is
/// reported as skipped with the reason, and the next target still runs.
fn bump_target(root: &Path, target: &BumpTarget, latest: &LatestTag) -> Result<BumpAction> {
    let pin_path = root.join(&target.pin_file);
    let current = match pinfile::read_pin(&pin_path, &target.pin_identity) {
        Ok(Some(record)) => record,
        Ok(None) => {
            return Ok(BumpAction::SkippedUnknownCurrent {
                reason: format!("pin file has no entry for '{}'", target.pin_identity),
            });
        }
        Err(e) => {
            return Ok(BumpAction::SkippedUnknownCurrent {
                reason: e.to_string(),
            });
        }
    };

    let project_path = root.join(&target.project_file);
    let min_version = match project::read_min_version(&project_path, &target.project_marker) {
        Ok(version) => version,
        Err(e) => {
            return Ok(BumpAction::SkippedUnknownCurrent {
                reason: e.to_string(),
            });
        }
    };

    if !is_outdated(&current.version, &latest.tag) {
        return Ok(BumpAction::UpToDate {
            current: current.version,
        });
    }

    patch_files(root, target, &current, &min_version, latest)?;

    Ok(BumpAction::Updated {
        from: current.version,
        to: latest.tag.clone(),
    })
}

fn patch_files(
    root: &Path,
    target: &BumpTarget,
    current: &VersionRecord,
    min_version: &str,
    latest: &LatestTag,
) -> Result<()> {
    patch_literal(
        &root.join(&target.pin_file),
        &[
            (current.version.as_str(), latest.tag.as_str()),
            (current.revision.as_str(), latest.commit.as_str()),
        ],
    )?;
    patch_literal(
        &root.join(&target.project_file),
        &[(min_version, latest.tag.as_str())],
    )?;

    if let Some(ref marker_file) = target.marker_file {
        let marker_path = root.join(marker_file);
        if let Some(parent) = marker_path.parent() {
            fs::create_dir_all(parent)?;
        }
        write_text(&marker_path, &format!("{}\n", latest.tag))?;
    }

    Ok(())
}

/// Replace every occurrence of each old string with its new counterpart
fn patch_literal(path: &Path, replacements: &[(&str, &str)]) -> Result<()> {
    let mut contents = read_text(path)?;
    for (old, new) in replacements {
        if old.is_empty() {
            continue;
        }
        contents = contents.replace(old, new);
    }
    write_text(path, &contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_outdated_plain_cases() {
        assert!(is_outdated("119.0", "120.0"));
        assert!(!is_outdated("120.0", "119.0"));
        assert!(!is_outdated("120.0", "120.0"));
    }

    #[test]
    fn test_is_outdated_lexicographic_divergence() {
        // String ordering puts "9.0" after "10.0"; numerically 9.0 is the
        // older version. This documents the known limitation.
        assert!(!is_outdated("9.0", "10.0"));
        assert!(is_outdated("10.0", "9.0"));
    }

    #[test]
    fn test_patch_literal_replaces_all_occurrences() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("file.txt");
        std::fs::write(&path, "v1 and again v1, rev aaa").unwrap();

        patch_literal(&path, &[("v1", "v2"), ("aaa", "bbb")]).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "v2 and again v2, rev bbb"
        );
    }

    #[test]
    fn test_patch_literal_skips_empty_old_string() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("file.txt");
        std::fs::write(&path, "unchanged").unwrap();

        patch_literal(&path, &[("", "zzz")]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "unchanged");
    }

    #[test]
    fn test_run_bump_updates_stale_target() {
        use httpmock::prelude::*;

        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/tags");
            then.status(200).json_body(serde_json::json!([
                {"name": "101.0", "commit": {"sha": "def"}},
            ]));
        });

        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("Package.resolved"),
            r#"{"pins": [{"identity": "rust-components-swift", "state": {"version": "100.0", "revision": "abc"}}], "version": 2}"#,
        )
        .unwrap();
        std::fs::write(
            temp.path().join("project.pbxproj"),
            "repositoryURL = \"https://github.com/mozilla/rust-components-swift\";\nrequirement = {\nminimumVersion = 100.0;\n};\n",
        )
        .unwrap();

        let config = crate::test_fixtures::bump_config_for(
            &server.url("/tags"),
            Some("newest_tag.txt"),
        );
        let fetcher = Fetcher::new().unwrap();
        let outcomes = run_bump(temp.path(), &config, &fetcher).unwrap();

        assert_eq!(outcomes.len(), 1);
        assert_eq!(
            outcomes[0].action,
            BumpAction::Updated {
                from: "100.0".to_string(),
                to: "101.0".to_string(),
            }
        );
        let pin = std::fs::read_to_string(temp.path().join("Package.resolved")).unwrap();
        assert!(pin.contains("101.0"));
        assert!(pin.contains("def"));
        assert_eq!(
            std::fs::read_to_string(temp.path().join("newest_tag.txt")).unwrap(),
            "101.0\n"
        );
    }
}
