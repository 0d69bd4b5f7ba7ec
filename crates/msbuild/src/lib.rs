//! # cpm-msbuild
//!
//! MSBuild project support for cpm-migrate.
//!
//! Reads `PackageReference` declarations out of project files, strips their versions once
//! they are managed centrally, and writes the `Directory.Packages.props` manifest. Uses
//! quick-xml with format preservation: untouched parts of a project file are written back
//! byte for byte.

pub mod document;
pub mod extractor;
pub mod finder;
pub mod packages_props;
pub mod rewriter;
mod xml_utils;

pub use document::ProjectDocument;
pub use extractor::extract;
pub use finder::MsBuildProjectFinder;
pub use packages_props::{PackagesProps, TARGET_FILE_NAME, generate_xml};
pub use rewriter::{StripOutcome, Stripped, strip, update_project};

/// Item element declaring a package dependency.
pub const PACKAGE_REFERENCE_ELEMENT: &str = "PackageReference";
/// Attribute carrying the package id.
pub const INCLUDE_ATTRIBUTE: &str = "Include";
/// Name of both the version attribute and the version child element.
pub const VERSION_ELEMENT: &str = "Version";
