//! Test-session fixture wiring
//!
//! Assembles everything an end-to-end sync test run needs — browser binary,
//! sync-test add-on, profile, native UI test driver — into one context
//! built up front and handed to consumers read-only. Artifacts without an
//! explicit path are downloaded into the user cache directory and reused on
//! later runs; a missing artifact triggers a download, never an error.

pub mod driver;
pub mod profile;
pub mod report;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::SessionConfig;
use crate::error::{Result, UpkeepError};
use crate::fetch::Fetcher;

use driver::Driver;

/// Sync account credentials handed to the profile and the driver
#[derive(Debug, Clone)]
pub struct AccountCredentials {
    pub email: String,
    pub password: String,
}

/// Inputs to a session build
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Explicit browser binary; skips the download when set
    pub browser: Option<PathBuf>,
    /// Explicit add-on package; skips the download when set
    pub addon: Option<PathBuf>,
    pub credentials: AccountCredentials,
    /// Session-scoped scratch directory (logs, profile)
    pub work_dir: PathBuf,
}

/// One log file path per category
#[derive(Debug, Clone)]
pub struct LogPaths {
    pub browser: PathBuf,
    pub driver: PathBuf,
    pub session: PathBuf,
}

impl LogPaths {
    fn new(work_dir: &Path) -> Self {
        let logs = work_dir.join("logs");
        Self {
            browser: logs.join("browser.log"),
            driver: logs.join("driver.log"),
            session: logs.join("session.log"),
        }
    }

    /// Category name / path pairs, in report order
    pub fn categories(&self) -> [(&'static str, &Path); 3] {
        [
            ("Browser", self.browser.as_path()),
            ("Driver", self.driver.as_path()),
            ("Session", self.session.as_path()),
        ]
    }
}

/// Resolved handles for one test session, read-only after construction
#[derive(Debug)]
pub struct SessionContext {
    pub browser: PathBuf,
    pub addon: PathBuf,
    pub logs: LogPaths,
    pub profile_dir: PathBuf,
    pub driver: Driver,
    /// Build metadata recorded while resolving the handles
    pub metadata: BTreeMap<String, String>,
}

impl SessionContext {
    /// Resolve every provider in dependency order and return the context
    pub fn build(
        config: &SessionConfig,
        options: &SessionOptions,
        fetcher: &Fetcher,
    ) -> Result<Self> {
        fs::create_dir_all(&options.work_dir)?;
        let logs = LogPaths::new(&options.work_dir);
        fs::create_dir_all(options.work_dir.join("logs"))?;

        let mut metadata = BTreeMap::new();

        let (browser, provenance) =
            resolve_artifact(options.browser.as_deref(), &config.browser_url, "browser", fetcher)?;
        metadata.insert("browser.path".to_string(), browser.display().to_string());
        metadata.insert("browser.source".to_string(), provenance.to_string());

        let (addon, provenance) =
            resolve_artifact(options.addon.as_deref(), &config.addon_url, "addon", fetcher)?;
        metadata.insert("addon.path".to_string(), addon.display().to_string());
        metadata.insert("addon.source".to_string(), provenance.to_string());

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| UpkeepError::IoError {
                message: e.to_string(),
            })?
            .as_secs();
        metadata.insert("session.timestamp".to_string(), timestamp.to_string());

        let profile_dir = profile::build_profile(
            &options.work_dir,
            &addon,
            &options.credentials,
            &logs.driver,
            timestamp,
        )?;
        metadata.insert("profile.path".to_string(), profile_dir.display().to_string());

        let driver = Driver::new(&config.driver_program, &options.credentials, &logs.driver);

        Ok(Self {
            browser,
            addon,
            logs,
            profile_dir,
            driver,
            metadata,
        })
    }
}

/// Use the explicit path when given; otherwise download into the user
/// cache directory, reusing an already-cached copy.
fn resolve_artifact(
    explicit: Option<&Path>,
    url: &str,
    kind: &str,
    fetcher: &Fetcher,
) -> Result<(PathBuf, &'static str)> {
    if let Some(path) = explicit {
        return Ok((path.to_path_buf(), "provided"));
    }

    let cache = cache_dir()?.join(kind);
    fs::create_dir_all(&cache)?;

    let filename = url.rsplit('/').next().filter(|n| !n.is_empty()).unwrap_or(kind);
    let destination = cache.join(filename);
    if !destination.exists() {
        fetcher.download_to(url, &destination)?;
    }
    Ok((destination, "downloaded"))
}

fn cache_dir() -> Result<PathBuf> {
    dirs::cache_dir()
        .map(|dir| dir.join("upkeep"))
        .ok_or(UpkeepError::CacheDirUnavailable)
}
