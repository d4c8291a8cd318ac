use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShelfError>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn fmt_len(len: &Option<u64>) -> String {
    len.map_or_else(|| "?".to_string(), |n| n.to_string())
}

#[derive(Error, Debug)]
pub enum ShelfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("Cannot write {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Download of {path} incomplete: received {received} of {} bytes", fmt_len(.expected))]
    IncompleteTransfer {
        path: PathBuf,
        received: u64,
        expected: Option<u64>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Cannot open archive {archive}: {source}")]
    ArchiveOpen {
        archive: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Archive {archive} entry '{entry}' escapes the extraction directory")]
    PathTraversal {
        archive: PathBuf,
        entry: String,
        extracted: Vec<PathBuf>,
    },

    #[error("Failed to extract '{entry}' from {archive}: {source}")]
    ExtractionIo {
        archive: PathBuf,
        entry: String,
        extracted: Vec<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Home directory not found")]
    HomeDirectoryNotFound,

    #[error("Login failed for user '{username}'")]
    LoginFailed { username: String },

    #[error("Unexpected page layout at {url}: {message}")]
    ScrapeError { url: String, message: String },

    #[error("The shelf is empty")]
    NoItems,

    #[error("Item '{item}' not found on the shelf")]
    ItemNotFound { item: String },
}

impl ShelfError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        ShelfError::ConfigError {
            message: message.into(),
        }
    }

    pub fn transport<E>(url: &str, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        ShelfError::Transport {
            url: url.to_string(),
            source: source.into(),
        }
    }

    pub fn storage(path: &Path, source: std::io::Error) -> Self {
        ShelfError::Storage {
            path: path.to_path_buf(),
            source,
        }
    }

    /// The archive left on disk by a failed download or extraction.
    pub fn retained_archive(&self) -> Option<&Path> {
        match self {
            ShelfError::IncompleteTransfer { path, .. } => Some(path),
            ShelfError::ArchiveOpen { archive, .. }
            | ShelfError::PathTraversal { archive, .. }
            | ShelfError::ExtractionIo { archive, .. } => Some(archive),
            _ => None,
        }
    }

    /// Entries written before an extraction was aborted.
    pub fn partial_entries(&self) -> &[PathBuf] {
        match self {
            ShelfError::PathTraversal { extracted, .. }
            | ShelfError::ExtractionIo { extracted, .. } => extracted,
            _ => &[],
        }
    }
}
