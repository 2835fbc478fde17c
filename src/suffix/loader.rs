use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use log::{info, warn};

use crate::error::{ListError, Result};
use crate::fetch::{DefaultFetcher, ListFetcher, DEFAULT_FETCH_TIMEOUT};

use super::SuffixTable;

/// Default maximum age of the suffix list file before a refresh: 30 days
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Canonical public suffix list location
pub const PUBLIC_SUFFIX_LIST_URL: &str = "https://publicsuffix.org/list/public_suffix_list.dat";

/// Resolves the suffix list file, refreshing it from a URL when stale
pub struct SuffixListLoader {
    pub path: PathBuf,
    pub url: Option<String>,
    pub max_age: Duration,
    pub timeout: Duration,
}

impl SuffixListLoader {
    /// Create a loader for a local suffix list file (no refresh)
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            url: None,
            max_age: DEFAULT_MAX_AGE,
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Refresh from this URL when the file is missing or older than `max_age`
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load the table, refreshing first if configured and needed.
    pub fn load(&self) -> Result<SuffixTable> {
        let fetcher = DefaultFetcher::new().with_timeout(self.timeout);
        self.load_with(&fetcher)
    }

    /// [`SuffixListLoader::load`] with refresh downloads going through `fetcher`
    pub fn load_with(&self, fetcher: &dyn ListFetcher) -> Result<SuffixTable> {
        if let Some(ref url) = self.url {
            if self.should_download() {
                info!("Refreshing suffix list from: {}", url);
                if let Err(e) = self.download(url, fetcher) {
                    if !self.path.exists() {
                        return Err(e);
                    }
                    warn!("Suffix list refresh failed, using existing file: {}", e);
                }
            }
        }

        let table = SuffixTable::from_file(&self.path)?;
        info!(
            "Loaded {} public suffixes from: {}",
            table.len(),
            self.path.display()
        );
        Ok(table)
    }

    /// Missing, empty, or older than `max_age`
    fn should_download(&self) -> bool {
        match fs::metadata(&self.path) {
            Ok(meta) => {
                if meta.len() == 0 {
                    return true;
                }
                match meta.modified() {
                    Ok(mtime) => SystemTime::now()
                        .duration_since(mtime)
                        .map(|d| d > self.max_age)
                        .unwrap_or(true),
                    Err(_) => true,
                }
            }
            Err(_) => true,
        }
    }

    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("tmp")
    }

    fn download(&self, url: &str, fetcher: &dyn ListFetcher) -> Result<()> {
        let bytes = fetcher
            .fetch(url)
            .map_err(|e| ListError::SuffixList(format!("Download failed: {}", e)))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.tmp_path();
        if let Err(e) = replace_verified(&tmp_path, &self.path, &bytes) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        info!("Downloaded suffix list to {}", self.path.display());
        Ok(())
    }
}

/// Write `bytes` to `tmp_path`, check it is a usable table, then move it over `path`
fn replace_verified(tmp_path: &Path, path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(tmp_path, bytes)?;
    SuffixTable::from_file(tmp_path)
        .map_err(|e| ListError::SuffixList(format!("Verification failed: {}", e)))?;
    fs::rename(tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MemoryFetcher;

    const URL: &str = "https://psl.example/public_suffix_list.dat";

    /// Loader whose existing file (if any) is a year old
    fn stale_loader(path: &Path) -> SuffixListLoader {
        if let Ok(file) = fs::File::options().write(true).open(path) {
            let year_ago = SystemTime::now() - Duration::from_secs(365 * 24 * 60 * 60);
            file.set_modified(year_ago).unwrap();
        }
        SuffixListLoader::new(path).with_url(URL)
    }

    #[test]
    fn test_builder_pattern() {
        let loader = SuffixListLoader::new("/tmp/psl.dat")
            .with_url(PUBLIC_SUFFIX_LIST_URL)
            .with_max_age(Duration::from_secs(3600))
            .with_timeout(Duration::from_secs(5));

        assert_eq!(loader.path, PathBuf::from("/tmp/psl.dat"));
        assert_eq!(loader.url.as_deref(), Some(PUBLIC_SUFFIX_LIST_URL));
        assert_eq!(loader.max_age, Duration::from_secs(3600));
        assert_eq!(loader.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_load_local_without_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("public_suffix_list.dat");
        fs::write(&path, "com\norg\nco.uk\n").unwrap();

        let table = SuffixListLoader::new(&path).load().unwrap();
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_fresh_file_is_not_refreshed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("public_suffix_list.dat");
        fs::write(&path, "com\n").unwrap();

        let fetcher = MemoryFetcher::new().with(URL, "net\n");
        let loader = SuffixListLoader::new(&path).with_url(URL);
        assert!(!loader.should_download());

        let table = loader.load_with(&fetcher).unwrap();
        assert!(table.is_public_suffix("com"));
        assert!(!table.is_public_suffix("net"));
    }

    #[test]
    fn test_missing_or_empty_file_needs_download() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("public_suffix_list.dat");
        let loader = SuffixListLoader::new(&path);
        assert!(loader.should_download());

        fs::write(&path, "").unwrap();
        assert!(loader.should_download());
    }

    #[test]
    fn test_stale_file_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("public_suffix_list.dat");
        fs::write(&path, "com\n").unwrap();

        let fetcher = MemoryFetcher::new().with(URL, "// ICANN\nnet\nco.uk\n");
        let loader = stale_loader(&path);
        let table = loader.load_with(&fetcher).unwrap();

        assert!(table.is_public_suffix("net"));
        assert!(table.is_public_suffix("co.uk"));
        assert!(!table.is_public_suffix("com"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "// ICANN\nnet\nco.uk\n");
        assert!(!loader.tmp_path().exists());
    }

    #[test]
    fn test_missing_file_is_downloaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("public_suffix_list.dat");

        let fetcher = MemoryFetcher::new().with(URL, "ly\ngl\n");
        let loader = SuffixListLoader::new(&path).with_url(URL);
        let table = loader.load_with(&fetcher).unwrap();

        assert!(table.is_public_suffix("ly"));
        assert!(path.is_file());
    }

    #[test]
    fn test_comment_only_download_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("public_suffix_list.dat");
        fs::write(&path, "com\n").unwrap();

        let fetcher = MemoryFetcher::new().with(URL, "// nothing here\n\n// at all\n");
        let loader = stale_loader(&path);
        let table = loader.load_with(&fetcher).unwrap();

        assert!(table.is_public_suffix("com"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "com\n");
        assert!(!loader.tmp_path().exists());
    }

    #[test]
    fn test_failed_rename_removes_tmp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory in place of the list: the download verifies
        // but cannot be moved over it
        let path = dir.path().join("public_suffix_list.dat");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        let fetcher = MemoryFetcher::new().with(URL, "com\n");
        let loader = stale_loader(&path);
        assert!(loader.download(URL, &fetcher).is_err());
        assert!(!loader.tmp_path().exists());
    }

    #[test]
    fn test_failed_refresh_falls_back_to_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("public_suffix_list.dat");
        fs::write(&path, "com\n").unwrap();

        let table = stale_loader(&path).load_with(&MemoryFetcher::new()).unwrap();
        assert!(table.is_public_suffix("com"));
    }

    #[test]
    fn test_failed_refresh_without_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("public_suffix_list.dat");

        let result = stale_loader(&path).load_with(&MemoryFetcher::new());
        assert!(matches!(result, Err(ListError::SuffixList(_))));
    }
}
