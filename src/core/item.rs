use crate::error::{Result, ShelfError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// An item listed on the user's shelf.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ShelfItem {
    pub name: String,
    pub href: String,
}

/// What to download for one invocation.
///
/// `id` is the last path segment of the item's reference URL and names both the
/// archive file and the extraction directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub id: String,
    pub reference_url: String,
    pub download_url: String,
}

impl DownloadTarget {
    /// Builds the target for an item reference, resolving relative references
    /// against `base_url`.
    pub fn from_reference(base_url: &str, locale: &str, reference: &str) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| ShelfError::config_error(format!("invalid base URL '{base_url}': {e}")))?;
        let reference_url = base.join(reference).map_err(|e| {
            ShelfError::config_error(format!("invalid item reference '{reference}': {e}"))
        })?;

        let id = reference_url
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .map(str::to_string)
            .ok_or_else(|| ShelfError::ItemNotFound {
                item: reference.to_string(),
            })?;

        let download_url = format!(
            "{}/{locale}/audiobook/{id}/download",
            base_url.trim_end_matches('/')
        );

        Ok(DownloadTarget {
            id,
            reference_url: reference_url.to_string(),
            download_url,
        })
    }

    pub fn archive_name(&self) -> String {
        format!("{}.{}", self.id, super::ARCHIVE_EXTENSION)
    }
}

/// One file or directory written by an extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedEntry {
    pub path: PathBuf,
    pub is_dir: bool,
    pub size: u64,
}

/// Outcome of a successful pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub archive: PathBuf,
    pub extract_dir: PathBuf,
    pub entries: usize,
    pub files: usize,
    pub directories: usize,
    pub bytes: u64,
}

impl Summary {
    pub fn new(archive: PathBuf, extract_dir: PathBuf, extracted: &[ExtractedEntry]) -> Self {
        let directories = extracted.iter().filter(|e| e.is_dir).count();
        Summary {
            archive,
            extract_dir,
            entries: extracted.len(),
            files: extracted.len() - directories,
            directories,
            bytes: extracted.iter().map(|e| e.size).sum(),
        }
    }
}
