use std::path::{Path, PathBuf};

use anyhow::Result;

/// Path of `path` relative to `root`.
pub fn get_relative_path(root: &Path, path: &Path) -> Result<PathBuf> {
    match path.strip_prefix(root) {
        Ok(relative) => Ok(relative.to_path_buf()),
        Err(_) => Err(anyhow::anyhow!(
            "Failed to get relative path of {} from {}",
            path.display(),
            root.display()
        )),
    }
}
