//! Post-test log collection
//!
//! After a test case, every category log that exists plus any structured
//! sync logs the browser wrote under the profile's log directory are
//! gathered into named report sections.

use std::path::PathBuf;

use walkdir::WalkDir;

use crate::common::fs::read_text;
use crate::error::Result;
use crate::session::SessionContext;

/// Relative location of structured sync logs inside a profile
const SYNC_LOG_DIR: &str = "weave/logs";

/// One attached log in the test report
#[derive(Debug, Clone)]
pub struct ReportSection {
    pub title: String,
    pub source: PathBuf,
    pub contents: String,
}

/// Collect category logs and profile sync logs for the report
pub fn collect_report(context: &SessionContext) -> Result<Vec<ReportSection>> {
    let mut sections = Vec::new();

    // Structured sync logs first, as the browser wrote them
    let sync_logs = context.profile_dir.join(SYNC_LOG_DIR);
    if sync_logs.is_dir() {
        let mut files: Vec<PathBuf> = WalkDir::new(&sync_logs)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .collect();
        files.sort();
        for path in files {
            sections.push(ReportSection {
                title: "Sync".to_string(),
                contents: read_text(&path)?,
                source: path,
            });
        }
    }

    for (title, path) in context.logs.categories() {
        if path.exists() {
            sections.push(ReportSection {
                title: title.to_string(),
                source: path.to_path_buf(),
                contents: read_text(path)?,
            });
        }
    }

    Ok(sections)
}
