mod find_project_files;
mod get_config;
mod get_relative_path;

pub use find_project_files::find_project_files;
pub use get_config::get_config;
pub use get_relative_path::get_relative_path;
