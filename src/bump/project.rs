//! Build-project file scanning
//!
//! The build-project file references the dependency by repository URL; the
//! pinned minimum version sits on one of the lines that follow, as
//! `minimumVersion = X.Y.Z;`. The scanner looks for the field within a
//! bounded window after the marker line instead of indexing blindly, and
//! reports exactly which part was missing.

use std::path::Path;

use crate::common::fs::read_text;
use crate::error::{Result, UpkeepError};

const VERSION_FIELD: &str = "minimumVersion";

/// Lines after the marker searched for the version field
const SCAN_WINDOW: usize = 4;

/// Read the minimum version recorded for the dependency named by `marker`
pub fn read_min_version(path: &Path, marker: &str) -> Result<String> {
    let contents = read_text(path)?;
    let lines: Vec<&str> = contents.lines().collect();

    let marker_line = lines
        .iter()
        .position(|line| line.contains(marker))
        .ok_or_else(|| UpkeepError::MarkerNotFound {
            path: path.display().to_string(),
            marker: marker.to_string(),
        })?;

    for line in lines.iter().skip(marker_line + 1).take(SCAN_WINDOW) {
        if !line.contains(VERSION_FIELD) {
            continue;
        }
        if let Some(version) = extract_field_value(line) {
            return Ok(version);
        }
    }

    Err(UpkeepError::VersionFieldMissing {
        path: path.display().to_string(),
    })
}

/// Extract the value between `=` and `;` on a field line
fn extract_field_value(line: &str) -> Option<String> {
    let after_equals = line.split_once('=')?.1;
    let value = after_equals.split_once(';')?.0.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MARKER: &str = "https://github.com/mozilla/rust-components-swift";

    fn write_project(temp: &TempDir, contents: &str) -> std::path::PathBuf {
        let path = temp.path().join("project.pbxproj");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_reads_version_after_marker() {
        let temp = TempDir::new().unwrap();
        let path = write_project(
            &temp,
            r#"    1234ABCD /* XCRemoteSwiftPackageReference "rust-components-swift" */ = {
      isa = XCRemoteSwiftPackageReference;
      repositoryURL = "https://github.com/mozilla/rust-components-swift";
      requirement = {
        kind = upToNextMajorVersion;
        minimumVersion = 133.0;
      };
    };
"#,
        );

        assert_eq!(read_min_version(&path, MARKER).unwrap(), "133.0");
    }

    #[test]
    fn test_tolerates_field_position_within_window() {
        let temp = TempDir::new().unwrap();
        let path = write_project(
            &temp,
            "repositoryURL = \"https://github.com/mozilla/rust-components-swift\";\nrequirement = {\nminimumVersion = 120.1.2;\n",
        );

        assert_eq!(read_min_version(&path, MARKER).unwrap(), "120.1.2");
    }

    #[test]
    fn test_missing_marker_is_explicit_error() {
        let temp = TempDir::new().unwrap();
        let path = write_project(&temp, "no dependency reference in here\n");
        let result = read_min_version(&path, MARKER);
        assert!(matches!(result, Err(UpkeepError::MarkerNotFound { .. })));
    }

    #[test]
    fn test_missing_version_field_is_explicit_error() {
        let temp = TempDir::new().unwrap();
        let path = write_project(
            &temp,
            "repositoryURL = \"https://github.com/mozilla/rust-components-swift\";\nkind = branch;\nbranch = main;\n",
        );
        let result = read_min_version(&path, MARKER);
        assert!(matches!(
            result,
            Err(UpkeepError::VersionFieldMissing { .. })
        ));
    }

    #[test]
    fn test_field_outside_window_is_not_found() {
        let temp = TempDir::new().unwrap();
        let mut contents = String::from(
            "repositoryURL = \"https://github.com/mozilla/rust-components-swift\";\n",
        );
        for _ in 0..SCAN_WINDOW {
            contents.push_str("padding = line;\n");
        }
        contents.push_str("minimumVersion = 99.0;\n");
        let path = write_project(&temp, &contents);

        let result = read_min_version(&path, MARKER);
        assert!(matches!(
            result,
            Err(UpkeepError::VersionFieldMissing { .. })
        ));
    }
}
