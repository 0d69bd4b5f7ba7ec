use anyhow::{Context, Result};
use async_trait::async_trait;
use cpm_core::{ProjectDeclarations, ProjectFinder};
use std::path::Path;
use tokio::fs::read_to_string;
use tracing::{debug, info};

use crate::document::ProjectDocument;
use crate::extractor::extract;

/// Collects the `PackageReference` declarations of every MSBuild project file visited.
#[derive(Debug)]
pub struct MsBuildProjectFinder {
    projects: ProjectDeclarations,
    project_files: Vec<String>,
}

impl Default for MsBuildProjectFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl MsBuildProjectFinder {
    #[must_use]
    pub fn new() -> Self {
        Self::with_project_files(vec![".csproj".to_string()])
    }

    #[must_use]
    pub fn with_project_files(project_files: Vec<String>) -> Self {
        Self {
            projects: ProjectDeclarations::new(),
            project_files,
        }
    }
}

#[async_trait]
impl ProjectFinder for MsBuildProjectFinder {
    fn projects(&self) -> &ProjectDeclarations {
        &self.projects
    }

    fn project_files(&self) -> &[String] {
        &self.project_files
    }

    async fn visit(&mut self, path: &Path, relative_path: &Path) -> Result<()> {
        if !path.is_file() || !self.is_project_file(path) || self.projects.get(path).is_some() {
            return Ok(());
        }

        info!(project = %relative_path.display(), "Reading project for PackageReferences");
        let content = read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let document = ProjectDocument::parse(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        debug!("Project XML loaded");

        let declarations = extract(&document);
        if !self.projects.insert(path, declarations) {
            debug!(project = %relative_path.display(), "No PackageReferences found");
        }
        Ok(())
    }
}
