use cpm_core::{Config, ProjectFinder};
use cpm_msbuild::MsBuildProjectFinder;

// finder list

pub fn get_finders(config: &Config) -> [Box<dyn ProjectFinder>; 1] {
    [Box::new(MsBuildProjectFinder::with_project_files(
        config.project_files.clone(),
    ))]
}
