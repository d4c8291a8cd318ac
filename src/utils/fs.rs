use crate::error::{Result, ShelfError};
use std::path::{Component, Path, PathBuf};

pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|e| ShelfError::storage(path, e))?;
    }
    Ok(())
}

pub fn remove_file_if_exists(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ShelfError::storage(path, e)),
    }
}

/// Lexically cleans a path: drops `.` components and resolves `..` against the
/// preceding component without touching the filesystem.
///
/// A `..` directly under the root or a prefix is dropped, and a leading `..` on a
/// relative path is kept.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            _ => parts.push(component),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

/// True when `path` lies strictly below `root`, comparing whole components.
///
/// Both sides are expected to be normalized. `root` itself is not inside `root`,
/// and `/out2` is not inside `/out`.
pub fn is_within(root: &Path, path: &Path) -> bool {
    if root == Path::new(".") {
        return path.is_relative()
            && path != root
            && !matches!(path.components().next(), Some(Component::ParentDir));
    }
    path != root && path.starts_with(root)
}
