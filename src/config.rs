//! Tool configuration (upkeep.yaml)
//!
//! Every remote URL template, fixed file list and output path the
//! maintenance scripts rely on lives here and is handed to the utilities as
//! an explicit value. A project can override any of it by dropping an
//! `upkeep.yaml` next to its checkout; absent that, the built-in defaults
//! apply.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, UpkeepError};

/// Configuration file name looked up under the project root
pub const CONFIG_FILE: &str = "upkeep.yaml";

/// Top-level configuration for all utilities
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpkeepConfig {
    #[serde(default)]
    pub sync: SyncConfig,

    #[serde(default)]
    pub plugins: PluginsConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub bump: BumpConfig,
}

/// Upstream file sync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Raw-file endpoint prefix the relative paths are appended to
    pub remote_base: String,

    /// Directory (relative to the project root) holding the tracked copies
    pub target_dir: String,

    /// Ordered list of remote relative paths to keep in sync
    pub files: Vec<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            remote_base: "https://hg.mozilla.org/mozilla-central/raw-file/tip/".to_string(),
            target_dir: "Client/Assets/CC_Script".to_string(),
            files: vec![
                "toolkit/components/formautofill/Constants.ios.mjs".to_string(),
                "toolkit/modules/CreditCard.sys.mjs".to_string(),
                "toolkit/components/formautofill/shared/CreditCardRuleset.sys.mjs".to_string(),
                "toolkit/components/formautofill/shared/FieldScanner.sys.mjs".to_string(),
                "toolkit/components/formautofill/FormAutofill.ios.sys.mjs".to_string(),
                "toolkit/components/formautofill/FormAutofill.sys.mjs".to_string(),
                "toolkit/components/formautofill/FormAutofillChild.ios.sys.mjs".to_string(),
                "toolkit/components/formautofill/shared/FormAutofillHandler.sys.mjs".to_string(),
                "toolkit/components/formautofill/shared/FormAutofillHeuristics.sys.mjs".to_string(),
                "toolkit/components/formautofill/shared/FormAutofillNameUtils.sys.mjs".to_string(),
                "toolkit/components/formautofill/FormAutofillSection.ios.sys.mjs".to_string(),
                "toolkit/components/formautofill/FormAutofillSection.sys.mjs".to_string(),
                "toolkit/components/formautofill/shared/FormAutofillUtils.sys.mjs".to_string(),
                "toolkit/modules/FormLikeFactory.sys.mjs".to_string(),
                "toolkit/components/formautofill/shared/FormStateManager.sys.mjs".to_string(),
                "toolkit/components/formautofill/Helpers.ios.mjs".to_string(),
                "toolkit/components/formautofill/shared/HeuristicsRegExp.sys.mjs".to_string(),
                "toolkit/components/formautofill/shared/LabelUtils.sys.mjs".to_string(),
                "toolkit/components/passwordmgr/LoginManager.shared.mjs".to_string(),
                "toolkit/components/formautofill/Overrides.ios.js".to_string(),
                "toolkit/modules/third_party/fathom/fathom.mjs".to_string(),
            ],
        }
    }
}

/// Search plugin localizer configuration
///
/// URL templates use `{locale}` and `{file}` placeholders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginsConfig {
    /// Master locale list (newline-separated text resource)
    pub locale_list_url: String,

    /// Per-locale plugin directory listing page (HTML)
    pub listing_url: String,

    /// Per-locale raw plugin file endpoint
    pub raw_url: String,

    /// Per-locale region properties resource
    pub region_url: String,

    /// Local overlay/override source tree (relative to the project root)
    pub overlays_dir: String,

    /// Output tree rebuilt on every run (relative to the project root)
    pub output_dir: String,

    /// Executable printing the supported locale codes as a JSON array
    pub supported_locales_cmd: String,
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self {
            locale_list_url: "https://hg.mozilla.org/releases/mozilla-aurora/raw-file/default/mobile/android/locales/all-locales".to_string(),
            listing_url: "https://hg.mozilla.org/releases/l10n/mozilla-aurora/{locale}/file/default/mobile/searchplugins".to_string(),
            raw_url: "https://hg.mozilla.org/releases/l10n/mozilla-aurora/{locale}/raw-file/default/mobile/searchplugins/{file}".to_string(),
            region_url: "https://hg.mozilla.org/releases/l10n/mozilla-aurora/{locale}/raw-file/default/mobile/chrome/region.properties".to_string(),
            overlays_dir: "SearchOverlays".to_string(),
            output_dir: "SearchPlugins".to_string(),
            supported_locales_cmd: "./get_supported_locales.swift".to_string(),
        }
    }
}

/// Test-session fixture configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Browser build archive downloaded when no --browser path is given
    pub browser_url: String,

    /// Sync-test add-on package downloaded when no --addon path is given
    pub addon_url: String,

    /// Native UI test driver executable
    pub driver_program: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            browser_url: "https://archive.mozilla.org/pub/firefox/nightly/latest-mozilla-central/firefox-nightly.en-US.linux-x86_64.tar.bz2".to_string(),
            addon_url: "https://index.taskcluster.net/v1/task/gecko.v2.mozilla-central.latest.firefox.addons.tps/artifacts/public/tps.xpi".to_string(),
            driver_program: "xcodebuild".to_string(),
        }
    }
}

/// Dependency version bumper configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BumpConfig {
    /// Tag-list endpoint of the dependency repository (JSON, newest first)
    pub tags_url: String,

    /// Target file pairs patched independently
    pub targets: Vec<BumpTarget>,
}

/// One pin-file / project-file pair to check and patch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BumpTarget {
    /// Display name used in status output
    pub name: String,

    /// JSON pin file (relative to the project root)
    pub pin_file: String,

    /// Package identity looked up inside the pin file
    pub pin_identity: String,

    /// Build-project text file (relative to the project root)
    pub project_file: String,

    /// Literal URL marker locating the dependency entry in the project file
    pub project_marker: String,

    /// Optional plain-text file recording the newest tag after a patch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker_file: Option<String>,
}

impl Default for BumpConfig {
    fn default() -> Self {
        let marker = "https://github.com/mozilla/rust-components-swift".to_string();
        Self {
            tags_url: "https://api.github.com/repos/mozilla/rust-components-swift/tags"
                .to_string(),
            targets: vec![
                BumpTarget {
                    name: "firefox".to_string(),
                    pin_file: "firefox-ios/Client.xcodeproj/project.xcworkspace/xcshareddata/swiftpm/Package.resolved".to_string(),
                    pin_identity: "rust-components-swift".to_string(),
                    project_file: "firefox-ios/Client.xcodeproj/project.pbxproj".to_string(),
                    project_marker: marker.clone(),
                    marker_file: Some("test-fixtures/newest_tag.txt".to_string()),
                },
                BumpTarget {
                    name: "focus".to_string(),
                    pin_file: "focus-ios/Blockzilla.xcodeproj/project.xcworkspace/xcshareddata/swiftpm/Package.resolved".to_string(),
                    pin_identity: "MozillaRustComponentsSwift".to_string(),
                    project_file: "focus-ios/Blockzilla.xcodeproj/project.pbxproj".to_string(),
                    project_marker: marker,
                    marker_file: None,
                },
            ],
        }
    }
}

impl UpkeepConfig {
    /// Parse configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `<root>/upkeep.yaml`, falling back to defaults
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path).map_err(|e| UpkeepError::FileReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_yaml(&raw).map_err(|e| match e {
            UpkeepError::ConfigParseFailed { reason, .. } => UpkeepError::ConfigParseFailed {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.sync.remote_base.is_empty() {
            return Err(UpkeepError::ConfigInvalid {
                message: "sync.remote_base cannot be empty".to_string(),
            });
        }
        for target in &self.bump.targets {
            if target.project_marker.is_empty() {
                return Err(UpkeepError::ConfigInvalid {
                    message: format!("bump target '{}' has an empty project_marker", target.name),
                });
            }
        }
        Ok(())
    }
}

/// Expand a URL template's `{locale}` placeholder
pub fn expand_locale(template: &str, locale: &str) -> String {
    template.replace("{locale}", locale)
}

/// Expand a URL template's `{locale}` and `{file}` placeholders
pub fn expand_locale_file(template: &str, locale: &str, file: &str) -> String {
    template.replace("{locale}", locale).replace("{file}", file)
}
