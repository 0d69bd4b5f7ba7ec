use std::fmt::Display;
use std::path::Path;

use anyhow::{Context, Result};
use quick_xml::events::Event;
use tokio::fs::{read_to_string, write};
use tracing::{debug, info};

use crate::document::{ProjectDocument, is_named};
use crate::xml_utils::{attribute_value, remove_attribute, self_closing};
use crate::{INCLUDE_ATTRIBUTE, PACKAGE_REFERENCE_ELEMENT, VERSION_ELEMENT};

/// What stripping one package id did to a project document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripOutcome {
    /// The `Version` attribute of the reference was removed.
    AttributeRemoved,
    /// The `<Version>` child element was removed; `collapsed` when the reference was
    /// left without children and rewritten as a self-closing element.
    ChildRemoved { collapsed: bool },
    /// A reference with this id exists but declares no version.
    NoVersion,
    /// No `PackageReference` has this id.
    NotFound,
}

impl StripOutcome {
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        matches!(self, Self::AttributeRemoved | Self::ChildRemoved { .. })
    }
}

impl Display for StripOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::AttributeRemoved => "removed Version attribute",
                Self::ChildRemoved { collapsed: false } => "removed Version element",
                Self::ChildRemoved { collapsed: true } => "removed Version element (collapsed)",
                Self::NoVersion => "no version declared",
                Self::NotFound => "not found",
            }
        )
    }
}

/// A rewritten project document together with the outcome for each stripped id.
#[derive(Debug, Clone)]
pub struct Stripped {
    pub document: ProjectDocument,
    pub outcomes: Vec<(String, StripOutcome)>,
}

impl Stripped {
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.outcomes.iter().any(|(_, outcome)| outcome.is_modified())
    }
}

/// Removes the version declaration of each package id from a project document.
///
/// For every id the first `PackageReference` whose `Include` equals the id exactly is
/// patched: its `Version` attribute is removed or, failing that, its `<Version>` child
/// element together with the whitespace indenting it. A reference left with nothing but
/// whitespace inside is collapsed to `<PackageReference ... />`. All other content is
/// untouched. The input document is not modified.
///
/// Stripping the same id twice is a no-op the second time.
pub fn strip<'a>(
    document: &ProjectDocument,
    ids: impl IntoIterator<Item = &'a str>,
) -> Stripped {
    let mut document = document.clone();
    let outcomes = ids
        .into_iter()
        .map(|id| {
            let outcome = strip_one(&mut document, id);
            (id.to_string(), outcome)
        })
        .collect();
    Stripped { document, outcomes }
}

fn strip_one(document: &mut ProjectDocument, id: &str) -> StripOutcome {
    debug!(package = %id, "Locating single PackageReference");
    let Some(mut reference) = document
        .elements_named(PACKAGE_REFERENCE_ELEMENT)
        .into_iter()
        .find(|element| attribute_value(&element.tag, INCLUDE_ATTRIBUTE).as_deref() == Some(id))
    else {
        info!(package = %id, "Couldn't find any elements");
        return StripOutcome::NotFound;
    };

    let mut removed_empty_attribute = false;
    if let Some(tag) = remove_attribute(&reference.tag, VERSION_ELEMENT) {
        let declared = attribute_value(&reference.tag, VERSION_ELEMENT)
            .is_some_and(|version| !version.is_empty());
        let event = match reference.end {
            Some(_) => Event::Start(tag.clone()),
            None => Event::Empty(tag.clone()),
        };
        document.replace(reference.start, event);
        if declared {
            info!(package = %id, "Removed Version attribute");
            return StripOutcome::AttributeRemoved;
        }
        // An empty attribute defers to the child element, which has to go as well.
        debug!(package = %id, "Removed empty Version attribute");
        reference.tag = tag;
        removed_empty_attribute = true;
    }

    debug!(package = %id, "No Version attribute found, looking for child element");
    let children = document.children(&reference);
    let Some(position) = children.iter().position(|child| {
        document
            .element_at(child.start)
            .is_some_and(|element| is_named(&element.tag, VERSION_ELEMENT))
    }) else {
        if removed_empty_attribute {
            return StripOutcome::AttributeRemoved;
        }
        info!(package = %id, "No Version attribute and no Version child element");
        return StripOutcome::NoVersion;
    };

    // The whitespace indenting the element goes with it.
    let mut removed = vec![position];
    if position > 0 && document.is_whitespace(&children[position - 1]) {
        removed.push(position - 1);
    } else if position + 1 < children.len() && document.is_whitespace(&children[position + 1]) {
        removed.push(position + 1);
    }

    let collapsed = children
        .iter()
        .enumerate()
        .filter(|(index, _)| !removed.contains(index))
        .all(|(_, child)| document.is_whitespace(child));

    match (collapsed, reference.end) {
        (true, Some(end)) => {
            document.remove(vec![reference.start + 1..end + 1]);
            let tag = self_closing(&reference.tag);
            document.replace(reference.start, Event::Empty(tag));
        }
        _ => {
            let ranges = removed.iter().map(|&index| children[index].clone());
            document.remove(ranges.collect());
        }
    }
    info!(package = %id, "Removed Version child element");
    StripOutcome::ChildRemoved { collapsed }
}

/// Strips `ids` from the project file at `path`, writing the file back when something
/// changed and `dry_run` is off. The file is fully rewritten in memory before anything
/// is written, so a failure leaves it as it was read.
///
/// # Errors
/// Returns error if the file cannot be read, parsed or written.
pub async fn update_project(path: &Path, ids: &[&str], dry_run: bool) -> Result<Stripped> {
    debug!(project = %path.display(), "Loading project");
    let content = read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let document = ProjectDocument::parse(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    debug!("Project XML loaded");

    let stripped = strip(&document, ids.iter().copied());
    if stripped.is_modified() && !dry_run {
        debug!("Saving file");
        let xml = stripped.document.to_xml()?;
        write(path, xml)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(stripped)
}
