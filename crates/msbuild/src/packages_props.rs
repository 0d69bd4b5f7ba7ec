use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cpm_core::{Manifest, PackageDeclaration};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use tokio::fs::{try_exists, write};
use tracing::{debug, info};

use crate::xml_utils::self_closing;
use crate::{INCLUDE_ATTRIBUTE, VERSION_ELEMENT};

/// The central package versions file.
pub const TARGET_FILE_NAME: &str = "Directory.Packages.props";

/// Handles the `Directory.Packages.props` file of a directory.
#[derive(Debug, Clone)]
pub struct PackagesProps {
    path: PathBuf,
}

impl PackagesProps {
    #[must_use]
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(TARGET_FILE_NAME),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// # Errors
    /// Returns error if the existence of the file cannot be checked.
    pub async fn exists(&self) -> Result<bool> {
        try_exists(&self.path)
            .await
            .with_context(|| format!("Failed to check {}", self.path.display()))
    }

    /// # Errors
    /// Returns error if the manifest cannot be serialized or the file cannot be written.
    pub async fn write(&self, manifest: &Manifest) -> Result<()> {
        info!(path = %self.path.display(), "Writing file");
        let xml = generate_xml(manifest)?;
        debug!("Saving file");
        write(&self.path, xml)
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

/// Serializes a manifest as a `Directory.Packages.props` document: central management
/// switched on and one `PackageVersion` item per package, indented by two spaces,
/// without an XML declaration.
///
/// # Errors
/// Returns error if writing an event fails.
pub fn generate_xml(manifest: &Manifest) -> Result<String> {
    debug!("Generating XML document");
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer.write_event(Event::Start(BytesStart::new("Project")))?;
    writer.write_event(Event::Start(BytesStart::new("PropertyGroup")))?;
    writer.write_event(Event::Start(BytesStart::new("ManagePackageVersionsCentrally")))?;
    writer.write_event(Event::Text(BytesText::new("true")))?;
    writer.write_event(Event::End(BytesEnd::new("ManagePackageVersionsCentrally")))?;
    writer.write_event(Event::End(BytesEnd::new("PropertyGroup")))?;

    writer.write_event(Event::Start(BytesStart::new("ItemGroup")))?;
    for package in manifest {
        writer.write_event(Event::Empty(package_version(package)))?;
    }
    writer.write_event(Event::End(BytesEnd::new("ItemGroup")))?;
    writer.write_event(Event::End(BytesEnd::new("Project")))?;

    let result = writer.into_inner().into_inner();
    String::from_utf8(result).context("Failed to convert XML to UTF-8")
}

fn package_version(package: &PackageDeclaration) -> BytesStart<'static> {
    let mut element = BytesStart::new("PackageVersion");
    element.push_attribute((INCLUDE_ATTRIBUTE, package.id()));
    element.push_attribute((VERSION_ELEMENT, package.version()));
    self_closing(&element)
}
