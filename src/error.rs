//! Error types and handling for Upkeep
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for Upkeep operations
#[derive(Error, Diagnostic, Debug)]
pub enum UpkeepError {
    // Network errors
    #[error("Request failed: {url}: {reason}")]
    #[diagnostic(
        code(upkeep::http::request_failed),
        help("Check network connectivity and that the remote host is reachable")
    )]
    HttpRequestFailed { url: String, reason: String },

    #[error("Unexpected HTTP status {status} for: {url}")]
    #[diagnostic(code(upkeep::http::bad_status))]
    HttpStatus { url: String, status: u16 },

    // Configuration errors
    #[error("Failed to parse configuration file: {path}")]
    #[diagnostic(code(upkeep::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(upkeep::config::invalid))]
    ConfigInvalid { message: String },

    // Supported-locale tool errors
    #[error("Locale tool failed: {command}")]
    #[diagnostic(
        code(upkeep::locales::tool_failed),
        help("The supported-locales executable must be runnable from the project root")
    )]
    LocaleToolFailed { command: String, reason: String },

    #[error("Locale tool produced invalid output: {reason}")]
    #[diagnostic(code(upkeep::locales::bad_output))]
    LocaleToolOutputInvalid { reason: String },

    // Plugin document errors
    #[error("Failed to parse XML document: {path}")]
    #[diagnostic(code(upkeep::xml::parse_failed))]
    XmlParseFailed { path: String, reason: String },

    #[error("Failed to serialize XML document: {path}")]
    #[diagnostic(code(upkeep::xml::write_failed))]
    XmlWriteFailed { path: String, reason: String },

    #[error("Invalid overlay document {path}: {message}")]
    #[diagnostic(
        code(upkeep::overlay::invalid),
        help("Overlay actions must be <replace target=\"…\"> or <append parent=\"…\"> with one element child")
    )]
    OverlayInvalid { path: String, message: String },

    #[error("Invalid path selector: {selector}")]
    #[diagnostic(code(upkeep::overlay::bad_selector))]
    SelectorInvalid { selector: String, message: String },

    // Version bump errors
    #[error("Tag list for {url} is empty")]
    #[diagnostic(code(upkeep::bump::no_tags))]
    TagListEmpty { url: String },

    #[error("Marker '{marker}' not found in: {path}")]
    #[diagnostic(
        code(upkeep::bump::marker_not_found),
        help("The project file must reference the dependency repository URL")
    )]
    MarkerNotFound { path: String, marker: String },

    #[error("No version field after marker in: {path}")]
    #[diagnostic(code(upkeep::bump::version_field_missing))]
    VersionFieldMissing { path: String },

    // Session errors
    #[error("No cache directory available on this system")]
    #[diagnostic(code(upkeep::session::no_cache_dir))]
    CacheDirUnavailable,

    // File system errors
    #[error("File not found: {path}")]
    #[diagnostic(code(upkeep::fs::not_found))]
    FileNotFound { path: String },

    #[error("Failed to read file: {path}")]
    #[diagnostic(code(upkeep::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}")]
    #[diagnostic(code(upkeep::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(upkeep::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for UpkeepError {
    fn from(err: std::io::Error) -> Self {
        UpkeepError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for UpkeepError {
    fn from(err: serde_yaml::Error) -> Self {
        UpkeepError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for UpkeepError {
    fn from(err: serde_json::Error) -> Self {
        UpkeepError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for UpkeepError {
    fn from(err: reqwest::Error) -> Self {
        UpkeepError::HttpRequestFailed {
            url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, UpkeepError>;
