//! Upstream file sync
//!
//! Pulls a fixed list of upstream source files from the remote raw-file
//! endpoint and refreshes the locally tracked copies. Each remote file is
//! fetched into a scratch directory first; the tracked copy is only written
//! when the downloaded content differs. Any HTTP failure aborts the whole
//! batch.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::SyncConfig;
use crate::error::{Result, UpkeepError};
use crate::fetch::Fetcher;
use crate::hash;
use crate::progress::ProgressDisplay;

/// Per-file paths derived from one remote relative path
#[derive(Debug, Clone)]
pub struct FileSpec {
    /// Basename of the remote path
    pub filename: String,
    /// Full remote URL
    pub url: String,
    /// Tracked local copy
    pub local_path: PathBuf,
    /// Scratch download location
    pub temp_path: PathBuf,
}

impl FileSpec {
    pub fn new(config: &SyncConfig, root: &Path, temp_dir: &Path, remote: &str) -> Self {
        let filename = remote
            .rsplit('/')
            .next()
            .unwrap_or(remote)
            .to_string();
        Self {
            url: format!("{}{}", config.remote_base, remote),
            local_path: root.join(&config.target_dir).join(&filename),
            temp_path: temp_dir.join(&filename),
            filename,
        }
    }
}

/// What happened to one tracked file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No tracked copy existed; the download was adopted verbatim
    Adopted,
    /// The tracked copy differed and was overwritten
    Updated,
    /// Byte-identical content; nothing written
    Unchanged,
}

/// Summary of a sync run
#[derive(Debug, Default)]
pub struct SyncReport {
    pub outcomes: Vec<(String, SyncOutcome)>,
}

impl SyncReport {
    pub fn count(&self, outcome: SyncOutcome) -> usize {
        self.outcomes.iter().filter(|(_, o)| *o == outcome).count()
    }
}

/// Run the sync batch over the configured file list.
///
/// Fatal on any fetch error: the batch stops at the first failure and the
/// error propagates to the caller. The scratch directory is removed when
/// this function returns, success or failure.
pub fn run_sync(
    root: &Path,
    config: &SyncConfig,
    fetcher: &Fetcher,
    progress: &ProgressDisplay,
) -> Result<SyncReport> {
    let target_dir = root.join(&config.target_dir);
    fs::create_dir_all(&target_dir).map_err(|e| UpkeepError::FileWriteFailed {
        path: target_dir.display().to_string(),
        reason: e.to_string(),
    })?;

    // Scratch directory lives for the whole batch; dropped (and deleted)
    // on any exit path.
    let temp_dir = tempfile::tempdir()?;

    let mut report = SyncReport::default();
    for remote in &config.files {
        let spec = FileSpec::new(config, root, temp_dir.path(), remote);
        progress.update(&spec.filename);

        let outcome = sync_one(&spec, fetcher)?;
        match outcome {
            SyncOutcome::Adopted => {
                progress.status(format!("  new file: {}", spec.filename));
            }
            SyncOutcome::Updated => {
                progress.status(format!("  updated: {}", spec.filename));
            }
            SyncOutcome::Unchanged => {
                progress.status(format!("  no change: {}", spec.filename));
            }
        }
        report.outcomes.push((spec.filename.clone(), outcome));
        progress.inc();
    }

    Ok(report)
}

/// Fetch one file and reconcile it with the tracked copy
fn sync_one(spec: &FileSpec, fetcher: &Fetcher) -> Result<SyncOutcome> {
    fetcher.download_to(&spec.url, &spec.temp_path)?;

    let outcome = if !spec.local_path.exists() {
        copy_over(&spec.temp_path, &spec.local_path)?;
        SyncOutcome::Adopted
    } else if hash::files_identical(&spec.temp_path, &spec.local_path)? {
        SyncOutcome::Unchanged
    } else {
        copy_over(&spec.temp_path, &spec.local_path)?;
        SyncOutcome::Updated
    };

    // The per-file scratch copy is gone after each iteration, whatever the
    // outcome was.
    if spec.temp_path.exists() {
        fs::remove_file(&spec.temp_path)?;
    }

    Ok(outcome)
}

fn copy_over(from: &Path, to: &Path) -> Result<()> {
    fs::copy(from, to).map_err(|e| UpkeepError::FileWriteFailed {
        path: to.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::sync_config_for;
    use httpmock::prelude::*;
    use tempfile::TempDir;

    fn run(root: &Path, config: &SyncConfig) -> Result<SyncReport> {
        let fetcher = Fetcher::new().unwrap();
        let progress = ProgressDisplay::new(config.files.len() as u64);
        run_sync(root, config, &fetcher, &progress)
    }

    #[test]
    fn test_adopts_missing_file() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/raw/toolkit/Helpers.ios.mjs");
            then.status(200).body("helper source");
        });

        let temp = TempDir::new().unwrap();
        let config = sync_config_for(&server.base_url(), &["toolkit/Helpers.ios.mjs"]);
        let report = run(temp.path(), &config).unwrap();

        assert_eq!(report.outcomes[0].1, SyncOutcome::Adopted);
        let local = temp.path().join("vendor/Helpers.ios.mjs");
        assert_eq!(fs::read_to_string(local).unwrap(), "helper source");
    }

    #[test]
    fn test_overwrites_changed_file() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/raw/toolkit/Helpers.ios.mjs");
            then.status(200).body("new content");
        });

        let temp = TempDir::new().unwrap();
        let config = sync_config_for(&server.base_url(), &["toolkit/Helpers.ios.mjs"]);
        fs::create_dir_all(temp.path().join("vendor")).unwrap();
        fs::write(temp.path().join("vendor/Helpers.ios.mjs"), "old content").unwrap();

        let report = run(temp.path(), &config).unwrap();

        assert_eq!(report.outcomes[0].1, SyncOutcome::Updated);
        assert_eq!(
            fs::read_to_string(temp.path().join("vendor/Helpers.ios.mjs")).unwrap(),
            "new content"
        );
    }

    #[test]
    fn test_identical_file_is_untouched() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/raw/toolkit/Helpers.ios.mjs");
            then.status(200).body("same content");
        });

        let temp = TempDir::new().unwrap();
        let config = sync_config_for(&server.base_url(), &["toolkit/Helpers.ios.mjs"]);
        fs::create_dir_all(temp.path().join("vendor")).unwrap();
        let local = temp.path().join("vendor/Helpers.ios.mjs");
        fs::write(&local, "same content").unwrap();
        let mtime_before = fs::metadata(&local).unwrap().modified().unwrap();

        let report = run(temp.path(), &config).unwrap();

        assert_eq!(report.outcomes[0].1, SyncOutcome::Unchanged);
        let mtime_after = fs::metadata(&local).unwrap().modified().unwrap();
        assert_eq!(mtime_before, mtime_after);
    }

    #[test]
    fn test_second_run_is_idempotent() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/raw/toolkit/Helpers.ios.mjs");
            then.status(200).body("stable content");
        });

        let temp = TempDir::new().unwrap();
        let config = sync_config_for(&server.base_url(), &["toolkit/Helpers.ios.mjs"]);

        let first = run(temp.path(), &config).unwrap();
        assert_eq!(first.count(SyncOutcome::Adopted), 1);

        let second = run(temp.path(), &config).unwrap();
        assert_eq!(second.count(SyncOutcome::Unchanged), 1);
        assert_eq!(second.count(SyncOutcome::Updated), 0);
    }

    #[test]
    fn test_http_error_aborts_batch() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/raw/toolkit/First.mjs");
            then.status(200).body("first");
        });
        server.mock(|when, then| {
            when.method(GET).path("/raw/toolkit/Broken.mjs");
            then.status(500);
        });

        let temp = TempDir::new().unwrap();
        let config = sync_config_for(
            &server.base_url(),
            &["toolkit/First.mjs", "toolkit/Broken.mjs", "toolkit/Never.mjs"],
        );
        let result = run(temp.path(), &config);

        assert!(matches!(
            result,
            Err(UpkeepError::HttpStatus { status: 500, .. })
        ));
        // First file landed before the abort; the third was never attempted.
        assert!(temp.path().join("vendor/First.mjs").exists());
        assert!(!temp.path().join("vendor/Never.mjs").exists());
    }

    #[test]
    fn test_no_temp_artifacts_survive() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/raw/toolkit/Helpers.ios.mjs");
            then.status(200).body("content");
        });

        let temp = TempDir::new().unwrap();
        let config = sync_config_for(&server.base_url(), &["toolkit/Helpers.ios.mjs"]);
        run(temp.path(), &config).unwrap();

        let entries: Vec<_> = fs::read_dir(temp.path().join("vendor"))
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(entries, vec!["Helpers.ios.mjs"]);
    }
}
