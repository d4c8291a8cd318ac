use crate::core::item::DownloadTarget;
use crate::core::session::Session;
use crate::error::{Result, ShelfError};
use crate::utils::fs;
use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const BUFFER_SIZE: usize = 64 * 1024;

/// Streams a resource from the session into an archive file on disk.
pub struct Fetcher<S> {
    session: S,
}

impl<S: Session> Fetcher<S> {
    pub fn new(session: S) -> Self {
        Self { session }
    }

    /// Downloads `target` into `destination/{id}.zip` and returns the file path.
    ///
    /// A transfer that breaks off or falls short of the advertised length leaves the
    /// truncated file in place and fails with `IncompleteTransfer`.
    pub fn fetch(&self, target: &DownloadTarget, destination: &Path) -> Result<PathBuf> {
        fs::ensure_dir_exists(destination)?;
        let path = destination.join(target.archive_name());

        let resource = self.session.get(&target.download_url)?;
        let expected = resource.content_length;
        let mut body = resource.body;

        let mut file = File::create(&path).map_err(|e| ShelfError::storage(&path, e))?;
        info!(url = %target.download_url, ?path, ?expected, "downloading");

        let received = copy_body(&mut body, &mut file, &path, expected)?;
        file.flush().map_err(|e| ShelfError::storage(&path, e))?;

        if let Some(expected) = expected {
            if received < expected {
                return Err(ShelfError::IncompleteTransfer {
                    path,
                    received,
                    expected: Some(expected),
                    source: None,
                });
            }
        }

        debug!(?path, bytes = received, "download complete");
        Ok(path)
    }
}

/// Copies the body into the file, telling read failures apart from write failures.
fn copy_body(
    body: &mut dyn Read,
    file: &mut File,
    path: &Path,
    expected: Option<u64>,
) -> Result<u64> {
    let mut buffer = vec![0u8; BUFFER_SIZE];
    let mut received = 0u64;

    loop {
        let n = match body.read(&mut buffer) {
            Ok(0) => return Ok(received),
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(ShelfError::IncompleteTransfer {
                    path: path.to_path_buf(),
                    received,
                    expected,
                    source: Some(e),
                })
            }
        };

        file.write_all(&buffer[..n])
            .map_err(|e| ShelfError::storage(path, e))?;
        received += n as u64;
    }
}
