use crate::core::item::ExtractedEntry;
use crate::error::{Result, ShelfError};
use crate::utils::fs;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use zip::result::ZipError;
use zip::ZipArchive;

#[cfg(unix)]
const DEFAULT_FILE_MODE: u32 = 0o644;

/// Unpacks zip archives below a destination root.
///
/// Entry names are untrusted. Every entry is resolved lexically against the root and
/// the whole extraction stops at the first entry that would land outside it.
pub struct Extractor;

impl Default for Extractor {
    fn default() -> Self {
        Self
    }
}

impl Extractor {
    pub fn new() -> Self {
        Self
    }

    /// Extracts every entry of `archive_path` below `root`, in archive order.
    ///
    /// On failure the error carries the paths already written; they are left on disk.
    pub fn extract(&self, archive_path: &Path, root: &Path) -> Result<Vec<ExtractedEntry>> {
        let open_error = |source| ShelfError::ArchiveOpen {
            archive: archive_path.to_path_buf(),
            source,
        };
        let file = File::open(archive_path).map_err(|e| open_error(ZipError::Io(e)))?;
        let mut archive = ZipArchive::new(file).map_err(open_error)?;

        let root = fs::normalize_path(root);
        std::fs::create_dir_all(&root).map_err(|e| ShelfError::storage(&root, e))?;
        info!(?archive_path, ?root, entries = archive.len(), "extracting archive");

        let mut extracted: Vec<ExtractedEntry> = Vec::with_capacity(archive.len());

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index).map_err(|e| {
                entry_error(
                    archive_path,
                    format!("#{index}"),
                    &extracted,
                    std::io::Error::other(e),
                )
            })?;
            let name = entry.name().to_string();

            let outpath = fs::normalize_path(&root.join(&name));
            if !fs::is_within(&root, &outpath) {
                warn!(?archive_path, entry = %name, "entry escapes extraction root");
                return Err(ShelfError::PathTraversal {
                    archive: archive_path.to_path_buf(),
                    entry: name,
                    extracted: paths(&extracted),
                });
            }

            let written = if entry.is_dir() {
                std::fs::create_dir_all(&outpath).map(|()| ExtractedEntry {
                    path: outpath,
                    is_dir: true,
                    size: 0,
                })
            } else {
                let mode = entry.unix_mode();
                write_entry(&mut entry, mode, &outpath).map(|size| ExtractedEntry {
                    path: outpath,
                    is_dir: false,
                    size,
                })
            };

            match written {
                Ok(record) => {
                    debug!(path = ?record.path, size = record.size, "extracted");
                    extracted.push(record);
                }
                Err(e) => return Err(entry_error(archive_path, name, &extracted, e)),
            }
        }

        info!(count = extracted.len(), "extraction complete");
        Ok(extracted)
    }
}

/// Writes one file entry. The output handle lives only for this call.
fn write_entry<R: Read>(entry: &mut R, mode: Option<u32>, path: &Path) -> std::io::Result<u64> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut outfile = create_output(path, mode)?;
    let size = std::io::copy(entry, &mut outfile)?;
    outfile.flush()?;
    Ok(size)
}

fn create_output(path: &Path, mode: Option<u32>) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        let mode = mode
            .map(|m| m & 0o777)
            .filter(|m| *m != 0)
            .unwrap_or(DEFAULT_FILE_MODE);
        options.mode(mode);
    }

    #[cfg(not(unix))]
    {
        let _ = mode;
    }

    options.open(path)
}

fn entry_error(
    archive_path: &Path,
    entry: String,
    extracted: &[ExtractedEntry],
    source: std::io::Error,
) -> ShelfError {
    ShelfError::ExtractionIo {
        archive: archive_path.to_path_buf(),
        entry,
        extracted: paths(extracted),
        source,
    }
}

fn paths(entries: &[ExtractedEntry]) -> Vec<PathBuf> {
    entries.iter().map(|e| e.path.clone()).collect()
}
