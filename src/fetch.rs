//! Blocking HTTP fetch shared by the network-facing utilities
//!
//! All remote access in this tool is plain GET against raw-file and JSON
//! endpoints, so one thin wrapper over `reqwest::blocking` covers it.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::{Result, UpkeepError};

pub const FETCH_USER_AGENT: &str = concat!("upkeep/", env!("CARGO_PKG_VERSION"));
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

/// Blocking HTTP client with no-cache request headers
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(FETCH_USER_AGENT)
            .timeout(Duration::from_millis(FETCH_TIMEOUT_MS))
            .build()?;
        Ok(Self { client })
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response> {
        let response = self
            .client
            .get(url)
            .header("Cache-Control", "no-cache")
            .header("Pragma", "no-cache")
            .send()
            .map_err(|e| UpkeepError::HttpRequestFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        Ok(response)
    }

    /// GET a text resource; any non-success status is an error
    pub fn get_text(&self, url: &str) -> Result<String> {
        let response = self.get(url)?;
        if !response.status().is_success() {
            return Err(UpkeepError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(response.text()?)
    }

    /// GET a text resource; non-success statuses map to `None`
    ///
    /// Used where the caller treats an absent resource as "skip", not as a
    /// failure (per-locale listings and region properties).
    pub fn get_text_optional(&self, url: &str) -> Result<Option<String>> {
        let response = self.get(url)?;
        if !response.status().is_success() {
            return Ok(None);
        }
        Ok(Some(response.text()?))
    }

    /// GET a binary resource; any non-success status is an error
    pub fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.get(url)?;
        if !response.status().is_success() {
            return Err(UpkeepError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(response.bytes()?.to_vec())
    }

    /// GET a JSON resource and deserialize it
    pub fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.get(url)?;
        if !response.status().is_success() {
            return Err(UpkeepError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(response.json()?)
    }

    /// GET a resource and stream it into a local file
    pub fn download_to(&self, url: &str, dest: &Path) -> Result<()> {
        let mut response = self.get(url)?;
        if !response.status().is_success() {
            return Err(UpkeepError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let mut file = File::create(dest).map_err(|e| UpkeepError::FileWriteFailed {
            path: dest.display().to_string(),
            reason: e.to_string(),
        })?;
        response
            .copy_to(&mut file)
            .map_err(|e| UpkeepError::FileWriteFailed {
                path: dest.display().to_string(),
                reason: e.to_string(),
            })?;
        file.flush().map_err(|e| UpkeepError::FileWriteFailed {
            path: dest.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_get_text_success() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/resource");
            then.status(200).body("hello");
        });

        let fetcher = Fetcher::new().unwrap();
        let text = fetcher.get_text(&server.url("/resource")).unwrap();
        mock.assert();
        assert_eq!(text, "hello");
    }

    #[test]
    fn test_get_text_sends_no_cache_headers() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/resource")
                .header("Cache-Control", "no-cache")
                .header("Pragma", "no-cache");
            then.status(200).body("ok");
        });

        let fetcher = Fetcher::new().unwrap();
        fetcher.get_text(&server.url("/resource")).unwrap();
        mock.assert();
    }

    #[test]
    fn test_get_text_bad_status_is_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404);
        });

        let fetcher = Fetcher::new().unwrap();
        let result = fetcher.get_text(&server.url("/missing"));
        assert!(matches!(
            result,
            Err(UpkeepError::HttpStatus { status: 404, .. })
        ));
    }

    #[test]
    fn test_get_text_optional_maps_missing_to_none() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404);
        });

        let fetcher = Fetcher::new().unwrap();
        let result = fetcher.get_text_optional(&server.url("/missing")).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_download_to_writes_file() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/blob");
            then.status(200).body("file contents");
        });

        let temp = tempfile::TempDir::new().unwrap();
        let dest = temp.path().join("blob.bin");
        let fetcher = Fetcher::new().unwrap();
        fetcher.download_to(&server.url("/blob"), &dest).unwrap();
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "file contents");
    }
}
