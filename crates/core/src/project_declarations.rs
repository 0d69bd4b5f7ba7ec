use std::collections::BTreeMap;
use std::collections::btree_map::Iter;
use std::path::{Path, PathBuf};

use crate::PackageDeclaration;

/// Package declarations found in each project document, keyed by project path.
///
/// Declarations keep document order and are not deduplicated. A project without
/// any declaration is never stored.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProjectDeclarations {
    projects: BTreeMap<PathBuf, Vec<PackageDeclaration>>,
}

impl ProjectDeclarations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the declarations of one project. Returns `false` (and stores nothing)
    /// when `declarations` is empty.
    pub fn insert(
        &mut self,
        path: impl Into<PathBuf>,
        declarations: Vec<PackageDeclaration>,
    ) -> bool {
        if declarations.is_empty() {
            return false;
        }
        self.projects.insert(path.into(), declarations);
        true
    }

    #[must_use]
    pub fn get(&self, path: &Path) -> Option<&[PackageDeclaration]> {
        self.projects.get(path).map(Vec::as_slice)
    }

    pub fn iter(&self) -> Iter<'_, PathBuf, Vec<PackageDeclaration>> {
        self.projects.iter()
    }

    /// Every declaration of every project, projects in path order.
    pub fn declarations(&self) -> impl Iterator<Item = &PackageDeclaration> {
        self.projects.values().flatten()
    }

    /// Merges another set of projects into this one; later entries win on equal paths.
    pub fn extend(&mut self, other: Self) {
        self.projects.extend(other.projects);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

impl<'a> IntoIterator for &'a ProjectDeclarations {
    type Item = (&'a PathBuf, &'a Vec<PackageDeclaration>);
    type IntoIter = Iter<'a, PathBuf, Vec<PackageDeclaration>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_skips_empty_projects() {
        let mut projects = ProjectDeclarations::new();
        assert!(!projects.insert("Empty/Empty.csproj", Vec::new()));
        assert!(projects.is_empty());
        assert!(projects.get(Path::new("Empty/Empty.csproj")).is_none());
    }

    #[test]
    fn test_insert_keeps_duplicates_in_order() {
        let mut projects = ProjectDeclarations::new();
        assert!(projects.insert(
            "App/App.csproj",
            vec![
                PackageDeclaration::new("NUnit", "4.5.6"),
                PackageDeclaration::new("NUnit", "1.2.3"),
            ],
        ));

        let declarations = projects.get(Path::new("App/App.csproj")).unwrap();
        assert_eq!(declarations.len(), 2);
        assert_eq!(declarations[0].version(), "4.5.6");
        assert_eq!(declarations[1].version(), "1.2.3");
    }

    #[test]
    fn test_iterates_in_path_order() {
        let mut projects = ProjectDeclarations::new();
        projects.insert("b/B.csproj", vec![PackageDeclaration::new("B", "1.0.0")]);
        projects.insert("a/A.csproj", vec![PackageDeclaration::new("A", "1.0.0")]);

        let paths = projects
            .iter()
            .map(|(path, _)| path.clone())
            .collect::<Vec<_>>();
        assert_eq!(
            paths,
            vec![PathBuf::from("a/A.csproj"), PathBuf::from("b/B.csproj")]
        );
        assert_eq!(projects.declarations().count(), 2);
    }

    #[test]
    fn test_extend() {
        let mut left = ProjectDeclarations::new();
        left.insert("a/A.csproj", vec![PackageDeclaration::new("A", "1.0.0")]);
        let mut right = ProjectDeclarations::new();
        right.insert("b/B.csproj", vec![PackageDeclaration::new("B", "1.0.0")]);

        left.extend(right);
        assert_eq!(left.len(), 2);
    }
}
