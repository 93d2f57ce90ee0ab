//! Project discovery and the bundled model storage.
//!
//! A project is a workspace folder whose `package.json` declares a model
//! project. Discovery never fails: folders that are not projects are
//! reported with a reason and otherwise ignored.

mod bundled;
mod metadata;
mod workspace_loader;

use std::path::Path;

pub use bundled::{BundledModels, READ_ONLY_MODE, make_read_only};
pub use metadata::{
    CORE_NAMESPACE, EXTENSION_SUFFIX, PROJECT_SETTINGS_FILE_NAME, ProjectJsonFields,
    ProjectMetadata, derive_namespace, project_metadata, read_project_json,
};
pub use workspace_loader::{
    InvalidProject, WorkspaceProjects, all_valid, find_projects, load_project_metadata,
};

/// Human-readable model name for the project at `path`: the final directory
/// name, or `None` if `path` holds no project declaration.
pub fn model_name_for(path: &Path) -> Option<String> {
    read_project_json(path)?;
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}

#[cfg(test)]
pub(crate) use bundled::tests::make_writable;
