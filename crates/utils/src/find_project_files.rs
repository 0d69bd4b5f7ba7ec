use crate::get_relative_path;
use anyhow::{Context, Result};
use cpm_core::{Config, ProjectFinder};
use glob::Pattern;
use ignore::WalkBuilder;
use std::path::Path;
use tracing::{debug, info};

/// Walks every file under `root` and offers it to each project finder.
///
/// All files are considered, hidden or git-ignored ones included; files whose path
/// relative to `root` matches one of the configured ignore globs are skipped. Files are
/// visited in file name order so repeated runs discover projects identically.
pub async fn find_project_files(
    root: &Path,
    project_finders: &mut [Box<dyn ProjectFinder>],
    config: &Config,
) -> Result<()> {
    let ignore_patterns = config
        .ignore
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).with_context(|| format!("Invalid ignore pattern: {pattern}"))
        })
        .collect::<Result<Vec<_>>>()?;

    info!(search_path = %root.display(), "Finding all project files");
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut visited = 0usize;
    for entry in walker {
        let entry = entry.context("Failed to walk directory")?;
        if !entry.file_type().is_some_and(|file_type| file_type.is_file()) {
            continue;
        }
        let abs_path = entry.path();
        let relative_path = get_relative_path(root, abs_path)?;
        if ignore_patterns
            .iter()
            .any(|pattern| pattern.matches_path(&relative_path))
        {
            debug!(path = %relative_path.display(), "Ignored by configuration");
            continue;
        }

        futures::future::join_all(
            project_finders
                .iter_mut()
                .map(async |finder| finder.visit(abs_path, &relative_path).await),
        )
        .await
        .into_iter()
        .collect::<Result<Vec<_>>>()?;
        visited += 1;
    }
    debug!(count = visited, "Visited files");

    Ok(())
}
