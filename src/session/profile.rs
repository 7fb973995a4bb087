//! Profile construction
//!
//! Merges the fixed baseline preference set for sync testing with the
//! per-session values (account credentials, timestamp, driver log path)
//! and writes a profile directory: a `user.js` of `user_pref` lines plus
//! an `extensions/` copy of the add-on.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value, json};

use crate::common::fs::write_text;
use crate::error::{Result, UpkeepError};
use crate::session::AccountCredentials;

/// Baseline preferences every sync test profile starts from
fn baseline_preferences() -> Map<String, Value> {
    let mut prefs = Map::new();
    prefs.insert("browser.onboarding.enabled".into(), json!(false));
    prefs.insert(
        "browser.startup.homepage_override.mstone".into(),
        json!("ignore"),
    );
    prefs.insert("browser.startup.page".into(), json!(0));
    prefs.insert(
        "datareporting.policy.dataSubmissionEnabled".into(),
        json!(false),
    );
    prefs.insert("extensions.autoDisableScopes".into(), json!(10));
    prefs.insert("extensions.legacy.enabled".into(), json!(true));
    prefs.insert("testing.tps.skipPingValidation".into(), json!(true));
    prefs.insert(
        "services.sync.log.appender.console".into(),
        json!("Trace"),
    );
    prefs.insert("services.sync.log.appender.dump".into(), json!("Trace"));
    prefs.insert(
        "services.sync.log.appender.file.level".into(),
        json!("Trace"),
    );
    prefs.insert(
        "services.sync.log.appender.file.logOnSuccess".into(),
        json!(true),
    );
    prefs.insert("services.sync.log.logger".into(), json!("Trace"));
    prefs.insert("services.sync.log.logger.engine".into(), json!("Trace"));
    prefs.insert("xpinstall.signatures.required".into(), json!(false));
    prefs
}

/// Write the profile directory and return its path
pub fn build_profile(
    work_dir: &Path,
    addon: &Path,
    credentials: &AccountCredentials,
    driver_log: &Path,
    timestamp: u64,
) -> Result<PathBuf> {
    let profile_dir = work_dir.join("profile");
    let extensions_dir = profile_dir.join("extensions");
    fs::create_dir_all(&extensions_dir)?;

    // Install the add-on into the profile
    let addon_name = addon
        .file_name()
        .ok_or_else(|| UpkeepError::FileNotFound {
            path: addon.display().to_string(),
        })?;
    fs::copy(addon, extensions_dir.join(addon_name)).map_err(|e| {
        UpkeepError::FileWriteFailed {
            path: extensions_dir.join(addon_name).display().to_string(),
            reason: e.to_string(),
        }
    })?;

    let mut prefs = baseline_preferences();
    let account_config = json!({
        "fx_account": {
            "username": credentials.email,
            "password": credentials.password,
        }
    });
    prefs.insert("tps.config".into(), json!(account_config.to_string()));
    prefs.insert(
        "tps.logfile".into(),
        json!(driver_log.display().to_string()),
    );
    prefs.insert("tps.seconds_since_epoch".into(), json!(timestamp));

    write_text(&profile_dir.join("user.js"), &render_user_js(&prefs))?;
    Ok(profile_dir)
}

/// Render preferences as `user_pref("key", value);` lines
fn render_user_js(prefs: &Map<String, Value>) -> String {
    let mut out = String::new();
    for (key, value) in prefs {
        out.push_str(&format!("user_pref(\"{}\", {});\n", key, value));
    }
    out
}
