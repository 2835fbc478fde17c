//! List retrieval.
//!
//! A [`ListFetcher`] turns a source location into raw bytes. Any failure is
//! fatal for the run; there is no partial-output mode.

use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

use log::info;
use url::Url;

use crate::error::{FetchErrorKind, ListError, Result};

/// Default network timeout for list downloads
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Trait for retrieving raw list bytes
pub trait ListFetcher {
    /// Fetch the raw bytes at `location` (local path or URL)
    fn fetch(&self, location: &str) -> Result<Vec<u8>>;
}

/// Build an HTTP agent whose whole request is bounded by `timeout`
fn http_agent(timeout: Duration) -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build();
    ureq::Agent::new_with_config(config)
}

/// Reads local files and downloads `http`/`https`/`file` URLs
pub struct DefaultFetcher {
    timeout: Duration,
}

impl DefaultFetcher {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Set the download timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn read_file(&self, location: &str, path: &Path) -> Result<Vec<u8>> {
        info!("Getting list from: {} ...", path.display());
        fs::read(path)
            .map_err(|e| ListError::fetch(FetchErrorKind::FileError, location, e.to_string()))
    }

    fn download(&self, location: &str) -> Result<Vec<u8>> {
        info!("Downloading list from: {} ...", location);

        let response = http_agent(self.timeout)
            .get(location)
            .call()
            .map_err(|e| {
                ListError::fetch(FetchErrorKind::DownloadFailed, location, e.to_string())
            })?;

        let (_, body) = response.into_parts();
        let mut reader = body.into_reader();
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).map_err(|e| {
            ListError::fetch(FetchErrorKind::DownloadFailed, location, e.to_string())
        })?;
        Ok(bytes)
    }
}

impl Default for DefaultFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ListFetcher for DefaultFetcher {
    fn fetch(&self, location: &str) -> Result<Vec<u8>> {
        let path = Path::new(location);
        if path.is_file() {
            return self.read_file(location, path);
        }

        match Url::parse(location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => self.download(location),
            Ok(url) if url.scheme() == "file" => {
                let path = url.to_file_path().map_err(|_| {
                    ListError::fetch(FetchErrorKind::InvalidLocation, location, "Invalid file URL")
                })?;
                self.read_file(location, &path)
            }
            _ => Err(ListError::fetch(
                FetchErrorKind::InvalidLocation,
                location,
                "Invalid file",
            )),
        }
    }
}

/// In-memory fetcher keyed by location
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    lists: HashMap<String, Vec<u8>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the bytes served for `location`
    pub fn add(&mut self, location: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.lists.insert(location.into(), bytes.into());
    }

    /// Builder-style [`MemoryFetcher::add`]
    pub fn with(mut self, location: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.add(location, bytes);
        self
    }
}

impl ListFetcher for MemoryFetcher {
    fn fetch(&self, location: &str) -> Result<Vec<u8>> {
        self.lists.get(location).cloned().ok_or_else(|| {
            ListError::fetch(FetchErrorKind::NotFound, location, "No list registered")
        })
    }
}
