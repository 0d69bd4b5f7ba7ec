use std::collections::{BTreeMap, HashSet};

use crate::{PackageDeclaration, ProjectDeclarations};

/// The consolidated package versions of a whole tree: one entry per case-insensitive
/// package id, sorted by id.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Manifest {
    packages: Vec<PackageDeclaration>,
}

impl Manifest {
    /// Consolidates every project's declarations into one manifest.
    ///
    /// Declarations are grouped by lower-cased id and each group keeps its lowest version.
    /// "Lowest" is an ordinal string comparison, not a semantic version comparison, so
    /// `"10.0.0"` wins over `"9.0.0"`. Equal versions authored with different id casings
    /// resolve to the ordinally smallest id so the result never depends on input order.
    #[must_use]
    pub fn consolidate(projects: &ProjectDeclarations) -> Self {
        Self::from_declarations(projects.declarations())
    }

    pub fn from_declarations<'a>(
        declarations: impl IntoIterator<Item = &'a PackageDeclaration>,
    ) -> Self {
        let mut lowest = BTreeMap::<&str, &PackageDeclaration>::new();
        for declaration in declarations {
            lowest
                .entry(declaration.key())
                .and_modify(|current| {
                    let candidate = (declaration.version(), declaration.id());
                    if candidate < (current.version(), current.id()) {
                        *current = declaration;
                    }
                })
                .or_insert(declaration);
        }

        Self {
            packages: lowest.into_values().cloned().collect(),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PackageDeclaration> {
        self.packages.iter()
    }

    /// Lower-cased ids of every managed package.
    #[must_use]
    pub fn keys(&self) -> HashSet<&str> {
        self.packages.iter().map(PackageDeclaration::key).collect()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.version_of(id).is_some()
    }

    /// Version pinned for `id`, matched case-insensitively.
    #[must_use]
    pub fn version_of(&self, id: &str) -> Option<&str> {
        let key = id.to_lowercase();
        self.packages
            .binary_search_by(|package| package.key().cmp(key.as_str()))
            .ok()
            .map(|index| self.packages[index].version())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a PackageDeclaration;
    type IntoIter = std::slice::Iter<'a, PackageDeclaration>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
