use std::fmt::Display;
use std::hash::{Hash, Hasher};

/// A single `(package id, version)` pair as authored in a project document.
///
/// Package ids are case-insensitive: identity is carried by a lower-cased key while
/// the authored casing is kept for display and serialization. Versions are opaque
/// strings and are never parsed.
#[derive(Debug, Clone)]
pub struct PackageDeclaration {
    id: String,
    key: String,
    version: String,
}

impl PackageDeclaration {
    #[must_use]
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        let id = id.into();
        let key = id.to_lowercase();
        Self {
            id,
            key,
            version: version.into(),
        }
    }

    /// Package id with its authored casing.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Lower-cased id used for grouping and ordering.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl PartialEq for PackageDeclaration {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.version == other.version
    }
}

impl Eq for PackageDeclaration {}

impl Hash for PackageDeclaration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
        self.version.hash(state);
    }
}

impl Display for PackageDeclaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.id, self.version)
    }
}
