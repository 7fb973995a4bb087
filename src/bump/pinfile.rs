//! JSON pin file reading
//!
//! Pin files record the exact resolved version and commit of each
//! dependency. Two formats are in circulation: the current one keeps the
//! pins at the top level under `pins[]` keyed by `identity`, the older one
//! nests them under `object.pins[]` keyed by `package`. Both are read.

use std::path::Path;

use serde_json::Value;

use crate::common::fs::read_text;
use crate::error::{Result, UpkeepError};

/// Resolved version and commit of a pinned dependency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRecord {
    pub version: String,
    pub revision: String,
}

/// Look up a dependency's pinned version by package identity.
///
/// Unreadable or unparseable files are errors; a pin file that simply does
/// not mention the identity yields `Ok(None)`. The caller decides what an
/// unknown current version means.
pub fn read_pin(path: &Path, identity: &str) -> Result<Option<VersionRecord>> {
    let contents = read_text(path)?;
    let document: Value =
        serde_json::from_str(&contents).map_err(|e| UpkeepError::ConfigParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    let (pins, key) = match document.get("pins") {
        Some(pins) => (pins, "identity"),
        None => (
            document
                .get("object")
                .and_then(|object| object.get("pins"))
                .unwrap_or(&Value::Null),
            "package",
        ),
    };

    let Some(pins) = pins.as_array() else {
        return Ok(None);
    };

    for pin in pins {
        if pin.get(key).and_then(Value::as_str) != Some(identity) {
            continue;
        }
        let state = pin.get("state").unwrap_or(&Value::Null);
        let version = state.get("version").and_then(Value::as_str);
        let revision = state.get("revision").and_then(Value::as_str);
        if let (Some(version), Some(revision)) = (version, revision) {
            return Ok(Some(VersionRecord {
                version: version.to_string(),
                revision: revision.to_string(),
            }));
        }
    }

    Ok(None)
}
