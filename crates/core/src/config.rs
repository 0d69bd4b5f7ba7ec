use serde::{Deserialize, Serialize};

/// Name of the optional configuration file looked up in the migrated directory.
pub const CONFIG_FILE_NAME: &str = ".cpm-migrate.json";

/// Loaded from `.cpm-migrate.json`, controls which files are scanned as project documents.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Glob patterns, relative to the migrated directory, excluded from the scan (e.g. "samples/**")
    #[serde(default)]
    pub ignore: Vec<String>,

    /// File name suffixes treated as project documents (default: ".csproj")
    #[serde(default = "default_project_files")]
    pub project_files: Vec<String>,
}

fn default_project_files() -> Vec<String> {
    vec![".csproj".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignore: Vec::new(),
            project_files: default_project_files(),
        }
    }
}
