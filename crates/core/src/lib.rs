pub mod config;
pub mod manifest;
pub mod package_declaration;
pub mod project_declarations;
pub mod project_finder;

// Re-export core types for convenience
pub use config::{CONFIG_FILE_NAME, Config};
pub use manifest::Manifest;
pub use package_declaration::PackageDeclaration;
pub use project_declarations::ProjectDeclarations;
pub use project_finder::ProjectFinder;
