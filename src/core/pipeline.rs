use crate::core::extract::Extractor;
use crate::core::fetch::Fetcher;
use crate::core::item::{DownloadTarget, Summary};
use crate::core::session::Session;
use crate::error::Result;
use crate::utils::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Download, unpack, then remove the archive.
///
/// Each stage runs once; the first failure ends the run and is returned as is.
pub struct Pipeline<S> {
    fetcher: Fetcher<S>,
    extractor: Extractor,
}

impl<S: Session> Pipeline<S> {
    pub fn new(session: S) -> Self {
        Self {
            fetcher: Fetcher::new(session),
            extractor: Extractor::new(),
        }
    }

    pub fn run(&self, target: &DownloadTarget, destination: &Path) -> Result<Summary> {
        let archive = self.fetcher.fetch(target, destination)?;
        info!(?archive, "downloaded");

        unpack(&self.extractor, &archive)
    }
}

/// Extracts an archive already on disk next to itself and deletes it on success.
pub fn unpack(extractor: &Extractor, archive: &Path) -> Result<Summary> {
    unpack_into(extractor, archive, &extraction_dir(archive))
}

/// Extracts an archive into `extract_dir` and deletes it on success.
///
/// A failed extraction keeps the archive so it can be inspected or unpacked again.
pub fn unpack_into(extractor: &Extractor, archive: &Path, extract_dir: &Path) -> Result<Summary> {
    let entries = match extractor.extract(archive, extract_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(?archive, error = %e, "extraction failed, keeping archive");
            return Err(e);
        }
    };

    fs::remove_file_if_exists(archive)?;
    info!(?archive, count = entries.len(), "archive extracted and removed");

    Ok(Summary::new(
        archive.to_path_buf(),
        extract_dir.to_path_buf(),
        &entries,
    ))
}

/// The archive path without its `.zip` extension.
pub fn extraction_dir(archive: &Path) -> PathBuf {
    let is_zip = archive
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(super::ARCHIVE_EXTENSION));

    if is_zip {
        archive.with_extension("")
    } else {
        let mut name = archive.as_os_str().to_owned();
        name.push(".d");
        PathBuf::from(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extract::tests::build_archive_bytes;
    use crate::core::fetch::tests::{target, FakeSession};
    use crate::error::ShelfError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extraction_dir() {
        assert_eq!(
            extraction_dir(Path::new("./out/dune.zip")),
            PathBuf::from("./out/dune")
        );
        assert_eq!(
            extraction_dir(Path::new("out/the.hobbit.ZIP")),
            PathBuf::from("out/the.hobbit")
        );
        assert_eq!(
            extraction_dir(Path::new("out/dune")),
            PathBuf::from("out/dune.d")
        );
    }

    #[test]
    fn test_run_extracts_and_removes_archive() {
        let temp = tempfile::tempdir().unwrap();
        let body = build_archive_bytes(&[
            ("dir/", None),
            ("dir/b.txt", Some("")),
            ("a.txt", Some("0123456789")),
        ]);
        let session = FakeSession::serving(body);

        let summary = Pipeline::new(&session)
            .run(&target("dune"), temp.path())
            .unwrap();

        let root = temp.path().join("dune");
        assert_eq!(
            summary,
            Summary {
                archive: temp.path().join("dune.zip"),
                extract_dir: root.clone(),
                entries: 3,
                files: 2,
                directories: 1,
                bytes: 10,
            }
        );
        assert!(!temp.path().join("dune.zip").exists());
        assert_eq!(std::fs::read(root.join("a.txt")).unwrap(), b"0123456789");
        assert_eq!(std::fs::metadata(root.join("dir/b.txt")).unwrap().len(), 0);
    }

    #[test]
    fn test_traversal_keeps_archive() {
        let temp = tempfile::tempdir().unwrap();
        let body = build_archive_bytes(&[("../../evil.txt", Some("evil"))]);
        let session = FakeSession::serving(body);

        let err = Pipeline::new(&session)
            .run(&target("dune"), temp.path())
            .unwrap_err();

        assert!(matches!(err, ShelfError::PathTraversal { .. }));
        assert_eq!(err.retained_archive(), Some(temp.path().join("dune.zip").as_path()));
        assert!(temp.path().join("dune.zip").exists());
        assert!(!temp.path().join("evil.txt").exists());
        assert!(!temp.path().join("dune").join("evil.txt").exists());
    }

    #[test]
    fn test_incomplete_download_skips_extraction() {
        let temp = tempfile::tempdir().unwrap();
        let body = build_archive_bytes(&[("a.txt", Some("0123456789"))]);
        let half = body.len() / 2;
        let mut session = FakeSession::serving(body);
        session.fail_after = Some(half);

        let err = Pipeline::new(&session)
            .run(&target("dune"), temp.path())
            .unwrap_err();

        assert!(matches!(err, ShelfError::IncompleteTransfer { .. }));
        let archive = temp.path().join("dune.zip");
        assert_eq!(std::fs::metadata(&archive).unwrap().len(), half as u64);
        assert!(!temp.path().join("dune").exists());
    }

    #[test]
    fn test_corrupt_archive_is_kept() {
        let temp = tempfile::tempdir().unwrap();
        let session = FakeSession::serving(b"<html>login required</html>".to_vec());

        let err = Pipeline::new(&session)
            .run(&target("dune"), temp.path())
            .unwrap_err();

        assert!(matches!(err, ShelfError::ArchiveOpen { .. }));
        assert!(temp.path().join("dune.zip").exists());
        assert!(!temp.path().join("dune").exists());
    }

    #[test]
    fn test_transport_failure_writes_nothing() {
        let temp = tempfile::tempdir().unwrap();
        let mut session = FakeSession::serving(Vec::new());
        session.refuse = true;

        let err = Pipeline::new(&session)
            .run(&target("dune"), temp.path())
            .unwrap_err();

        assert!(matches!(err, ShelfError::Transport { .. }));
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_unpack_retained_archive() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("dune.zip");
        std::fs::write(&archive, build_archive_bytes(&[("a.txt", Some("a"))])).unwrap();

        let summary = unpack(&Extractor::new(), &archive).unwrap();

        assert_eq!(summary.entries, 1);
        assert_eq!(summary.extract_dir, temp.path().join("dune"));
        assert!(!archive.exists());
    }

    #[test]
    fn test_unpack_into_chosen_folder() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("dune.zip");
        std::fs::write(&archive, build_archive_bytes(&[("a.txt", Some("a"))])).unwrap();
        let out = temp.path().join("library").join("Dune");

        let summary = unpack_into(&Extractor::new(), &archive, &out).unwrap();

        assert_eq!(summary.extract_dir, out);
        assert_eq!(std::fs::read(out.join("a.txt")).unwrap(), b"a");
        assert!(!temp.path().join("dune").exists());
        assert!(!archive.exists());
    }

    #[test]
    fn test_unpack_into_keeps_archive_on_failure() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("dune.zip");
        std::fs::write(&archive, build_archive_bytes(&[("../escape.txt", Some("x"))])).unwrap();
        let out = temp.path().join("library");

        let err = unpack_into(&Extractor::new(), &archive, &out).unwrap_err();

        assert!(matches!(err, ShelfError::PathTraversal { .. }));
        assert!(archive.exists());
        assert!(!temp.path().join("escape.txt").exists());
    }
}
