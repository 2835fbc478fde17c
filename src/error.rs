use thiserror::Error;

/// Classifies list fetch errors for programmatic matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// Location is neither an existing file nor a URL with a scheme
    InvalidLocation,
    /// Local file could not be read
    FileError,
    /// Network request failed or returned a non-success status
    DownloadFailed,
    /// No data registered for the location (memory fetcher)
    NotFound,
}

/// gfwlist2dnsmasq error types
#[derive(Error, Debug)]
pub enum ListError {
    #[error("Fetch error for {location}: {message}")]
    Fetch {
        kind: FetchErrorKind,
        location: String,
        message: String,
    },

    #[error("Decode error for {source_name}: {message}")]
    Decode {
        source_name: String,
        message: String,
    },

    #[error("The list from {0} is empty")]
    EmptyList(String),

    #[error("Suffix list error: {0}")]
    SuffixList(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ListError {
    pub(crate) fn fetch(
        kind: FetchErrorKind,
        location: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ListError::Fetch {
            kind,
            location: location.into(),
            message: message.into(),
        }
    }

    /// Whether the error aborts the run because a source could not be read.
    pub fn is_source_error(&self) -> bool {
        matches!(self, ListError::Fetch { .. } | ListError::Decode { .. })
    }
}

pub type Result<T> = std::result::Result<T, ListError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_kind_is_matchable() {
        let err = ListError::fetch(
            FetchErrorKind::DownloadFailed,
            "https://example.com/list.txt",
            "timed out",
        );
        match &err {
            ListError::Fetch { kind, location, .. } => {
                assert!(matches!(kind, FetchErrorKind::DownloadFailed));
                assert_eq!(location, "https://example.com/list.txt");
            }
            _ => panic!("expected Fetch"),
        }
        assert!(err.is_source_error());
    }

    #[test]
    fn test_fetch_error_display_includes_location_and_message() {
        let err = ListError::fetch(FetchErrorKind::FileError, "/tmp/list.txt", "denied");
        let display = format!("{}", err);
        assert!(display.contains("/tmp/list.txt"), "got: {}", display);
        assert!(display.contains("denied"), "got: {}", display);
    }

    #[test]
    fn test_empty_list_is_not_source_error() {
        let err = ListError::EmptyList("gfwlist.txt".into());
        assert!(!err.is_source_error());
        assert_eq!(format!("{}", err), "The list from gfwlist.txt is empty");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ListError = io.into();
        assert!(matches!(err, ListError::IoError(_)));
    }
}
