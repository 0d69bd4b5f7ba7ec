use std::path::Path;

use crate::ProjectDeclarations;
use anyhow::Result;
use async_trait::async_trait;

/// Visitor for discovering project documents while walking a directory tree.
///
/// Implementations decide which files they own through `project_files` (file name
/// suffixes such as `.csproj`), read each visited document and record the package
/// declarations found in it.
#[async_trait]
pub trait ProjectFinder: std::fmt::Debug + Send + Sync {
    fn projects(&self) -> &ProjectDeclarations;
    fn project_files(&self) -> &[String];
    /// # Errors
    /// Returns error if the project document cannot be read or parsed.
    async fn visit(&mut self, path: &Path, relative_path: &Path) -> Result<()>;

    fn is_project_file(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| {
                self.project_files()
                    .iter()
                    .any(|suffix| name.len() > suffix.len() && name.ends_with(suffix.as_str()))
            })
    }
}
