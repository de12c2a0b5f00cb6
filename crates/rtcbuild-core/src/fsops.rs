//! Filesystem helpers shared by setup and packaging.

use std::fs;
use std::path::Path;

use crate::types::BuildError;

/// Creates a directory and all of its parents. Existing directories are fine.
pub fn ensure_dir(path: &Path) -> Result<(), BuildError> {
    fs::create_dir_all(path)?;
    Ok(())
}

/// Removes a directory tree. A missing tree is not an error.
pub fn remove_tree(path: &Path) -> Result<(), BuildError> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Clean-slate reset: deletes the tree if present, then recreates it empty.
pub fn recreate_dir(path: &Path) -> Result<(), BuildError> {
    remove_tree(path)?;
    ensure_dir(path)
}

/// Recursively copies a directory tree.
pub fn copy_tree(src: &Path, dest: &Path) -> Result<(), BuildError> {
    ensure_dir(dest)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let path = entry.path();
        let dest_path = dest.join(entry.file_name());
        if path.is_dir() {
            copy_tree(&path, &dest_path)?;
        } else {
            fs::copy(&path, &dest_path)?;
        }
    }
    Ok(())
}
