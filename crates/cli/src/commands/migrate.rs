use std::{collections::HashSet, path::Path};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use cpm_core::{Manifest, ProjectDeclarations};
use cpm_msbuild::{PackagesProps, TARGET_FILE_NAME, generate_xml, update_project};
use cpm_utils::{find_project_files, get_config, get_relative_path};
use tracing::{debug, info, warn};

use crate::{finders::get_finders, logging::setup_logging, options::Verbosity};

#[derive(Args, Debug)]
#[command(about = "Migrate the projects under the current directory to central package management")]
pub struct MigrateArgs {
    /// Verbosity level of the console logging output
    #[arg(short, long, value_enum, default_value_t = Verbosity::Information)]
    pub verbosity: Verbosity,

    /// Show what would change without writing any file
    #[arg(long, default_value = "false")]
    pub dry_run: bool,
}

/// How a migration run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateOutcome {
    /// `Directory.Packages.props` already existed; nothing was touched
    AlreadyMigrated,
    /// No project declared a versioned package reference
    NothingToDo,
    Migrated { projects: usize, packages: usize },
}

impl MigrateOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AlreadyMigrated => 1,
            Self::NothingToDo | Self::Migrated { .. } => 0,
        }
    }
}

/// Migrate the current directory to central package management
pub async fn handle_migrate(args: &MigrateArgs) -> Result<MigrateOutcome> {
    let _logging = setup_logging(args.verbosity)?;
    debug!(verbosity = ?args.verbosity, "Called with log level");

    let current_dir = std::env::current_dir()?;
    let outcome = migrate(&current_dir, args.dry_run).await?;
    info!("Setup of central package management is complete");
    Ok(outcome)
}

async fn migrate(search_path: &Path, dry_run: bool) -> Result<MigrateOutcome> {
    info!(
        search_path = %search_path.display(),
        "Adding central package management under search path"
    );

    let packages_props = PackagesProps::new(search_path);
    if packages_props.exists().await? {
        warn!(
            "{} file already exists, central package management may already be set up",
            TARGET_FILE_NAME
        );
        return Ok(MigrateOutcome::AlreadyMigrated);
    }

    let config = get_config(search_path).await?;
    let mut project_finders = get_finders(&config);
    find_project_files(search_path, &mut project_finders, &config).await?;

    let mut projects = ProjectDeclarations::new();
    for finder in project_finders.iter() {
        projects.extend(finder.projects().clone());
    }
    if projects.is_empty() {
        info!("No packages were found, nothing more to do");
        return Ok(MigrateOutcome::NothingToDo);
    }

    let manifest = Manifest::consolidate(&projects);
    if dry_run {
        println!(
            "{}",
            format!("Dry run, {TARGET_FILE_NAME} would contain:").yellow()
        );
        println!("{}", generate_xml(&manifest)?);
    } else {
        packages_props.write(&manifest).await?;
    }

    info!("Updating project files PackageReference elements");
    let mut changed = Vec::new();
    for (path, declarations) in &projects {
        let relative_path = get_relative_path(search_path, path)?;
        info!(project = %relative_path.display(), "Updating project");

        let mut seen = HashSet::new();
        let ids = declarations
            .iter()
            .map(|declaration| declaration.id())
            .filter(|id| seen.insert(*id))
            .collect::<Vec<_>>();
        let stripped = update_project(path, &ids, dry_run)
            .await
            .with_context(|| format!("Failed to update project {}", relative_path.display()))?;
        for (id, outcome) in stripped.outcomes.iter() {
            debug!(package = %id, outcome = %outcome, "PackageReference processed");
        }
        if stripped.is_modified() {
            changed.push(relative_path);
        }
    }

    print_summary(&manifest, &changed, dry_run);
    Ok(MigrateOutcome::Migrated {
        projects: changed.len(),
        packages: manifest.len(),
    })
}

fn print_summary(manifest: &Manifest, changed: &[impl AsRef<Path>], dry_run: bool) {
    let verb = if dry_run { "Would update" } else { "Updated" };
    println!(
        "{} {} projects, {} centrally managed packages",
        verb.green().bold(),
        changed.len(),
        manifest.len()
    );
    for project in changed {
        println!("  {}", project.as_ref().display().to_string().bright_black());
    }
    for package in manifest {
        println!(
            "  {} {}",
            package.id().bold(),
            package.version().bright_green()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    const PROJECT: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <ItemGroup>
    <PackageReference Include="Serilog" Version="3.1.1" />
  </ItemGroup>
</Project>
"#;

    #[rstest]
    #[case(MigrateOutcome::AlreadyMigrated, 1)]
    #[case(MigrateOutcome::NothingToDo, 0)]
    #[case(MigrateOutcome::Migrated { projects: 2, packages: 3 }, 0)]
    fn test_exit_code(#[case] outcome: MigrateOutcome, #[case] expected: i32) {
        assert_eq!(outcome.exit_code(), expected);
    }

    #[tokio::test]
    async fn test_migrate_already_migrated() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(TARGET_FILE_NAME), "<Project />").unwrap();
        fs::write(temp_dir.path().join("App.csproj"), PROJECT).unwrap();

        let outcome = migrate(temp_dir.path(), false).await.unwrap();

        assert_eq!(outcome, MigrateOutcome::AlreadyMigrated);
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("App.csproj")).unwrap(),
            PROJECT
        );
        temp_dir.close().unwrap();
    }

    #[tokio::test]
    async fn test_migrate_nothing_to_do() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("App.csproj"), "<Project />").unwrap();

        let outcome = migrate(temp_dir.path(), false).await.unwrap();

        assert_eq!(outcome, MigrateOutcome::NothingToDo);
        assert!(!temp_dir.path().join(TARGET_FILE_NAME).exists());
        temp_dir.close().unwrap();
    }

    #[tokio::test]
    async fn test_migrate_single_project() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("App.csproj"), PROJECT).unwrap();

        let outcome = migrate(temp_dir.path(), false).await.unwrap();

        assert_eq!(
            outcome,
            MigrateOutcome::Migrated {
                projects: 1,
                packages: 1
            }
        );
        let props = fs::read_to_string(temp_dir.path().join(TARGET_FILE_NAME)).unwrap();
        assert!(props.contains(r#"<PackageVersion Include="Serilog" Version="3.1.1" />"#));
        let project = fs::read_to_string(temp_dir.path().join("App.csproj")).unwrap();
        assert!(project.contains(r#"<PackageReference Include="Serilog" />"#));
        temp_dir.close().unwrap();
    }

    #[tokio::test]
    async fn test_migrate_malformed_project() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("Broken.csproj"), "<Project><ItemGroup>").unwrap();

        let result = migrate(temp_dir.path(), false).await;

        assert!(result.is_err());
        assert!(!temp_dir.path().join(TARGET_FILE_NAME).exists());
        temp_dir.close().unwrap();
    }
}
