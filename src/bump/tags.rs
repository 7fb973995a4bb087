//! Dependency repository tag lookup

use serde::Deserialize;

use crate::error::{Result, UpkeepError};
use crate::fetch::Fetcher;

/// One entry of the repository's tag-list endpoint
#[derive(Debug, Clone, Deserialize)]
struct TagRecord {
    name: String,
    #[serde(default)]
    commit: CommitRecord,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CommitRecord {
    #[serde(default)]
    sha: String,
}

/// Newest tag and its commit reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestTag {
    pub tag: String,
    pub commit: String,
}

/// Fetch the newest tag from the tag-list endpoint.
///
/// The endpoint returns tags newest-first; the first entry is taken as-is,
/// with no semantic-version sorting.
pub fn fetch_latest(fetcher: &Fetcher, url: &str) -> Result<LatestTag> {
    let records: Vec<TagRecord> = fetcher.get_json(url)?;
    let first = records
        .into_iter()
        .next()
        .ok_or_else(|| UpkeepError::TagListEmpty {
            url: url.to_string(),
        })?;
    Ok(LatestTag {
        tag: first.name,
        commit: first.commit.sha,
    })
}
