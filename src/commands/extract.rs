use crate::commands::download::report;
use crate::core::extract::Extractor;
use crate::core::pipeline;
use crate::error::{Result, ShelfError};
use std::path::Path;

/// Unpacks an archive kept by an earlier failed run, next to it unless `output` is given.
pub fn extract_archive(archive: &Path, output: Option<&Path>) -> Result<()> {
    if !archive.is_file() {
        return Err(ShelfError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("archive not found: {}", archive.display()),
        )));
    }

    println!("Extracting {}...", archive.display());
    let extractor = Extractor::new();
    let result = match output {
        Some(dir) => pipeline::unpack_into(&extractor, archive, dir),
        None => pipeline::unpack(&extractor, archive),
    };
    report(&result);
    result.map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extract::tests::build_archive;

    #[test]
    fn test_extract_archive_to_output_folder() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("dune.zip");
        build_archive(&archive, &[("part1.mp3", Some("id3"))]);
        let out = temp.path().join("books");

        extract_archive(&archive, Some(&out)).unwrap();

        assert_eq!(std::fs::read(out.join("part1.mp3")).unwrap(), b"id3");
        assert!(!temp.path().join("dune").exists());
        assert!(!archive.exists());
    }

    #[test]
    fn test_extract_missing_archive() {
        let temp = tempfile::tempdir().unwrap();
        let err = extract_archive(&temp.path().join("gone.zip"), None).unwrap_err();
        assert!(matches!(err, ShelfError::Io(_)));
    }
}
