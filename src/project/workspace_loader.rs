use std::path::{Path, PathBuf};

use rayon::prelude::*;

use super::metadata::{CORE_NAMESPACE, ProjectMetadata, project_metadata};
use crate::base::ModelVersion;

/// A workspace folder that is not a usable project.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidProject {
    pub path: PathBuf,
    pub reason: String,
}

/// Projects found in the workspace, split by validity, each in workspace
/// order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkspaceProjects {
    pub projects: Vec<ProjectMetadata>,
    pub invalid: Vec<InvalidProject>,
}

impl WorkspaceProjects {
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Model versions declared by core projects, deduplicated, in order.
    pub fn model_versions(&self) -> Vec<ModelVersion> {
        let mut versions: Vec<ModelVersion> = Vec::new();
        for version in self
            .projects
            .iter()
            .filter(|p| p.namespace() == CORE_NAMESPACE)
            .filter_map(ProjectMetadata::model_version)
        {
            if !versions.iter().any(|v| v.same_as(&version)) {
                versions.push(version);
            }
        }
        versions
    }
}

/// Reads project metadata for every folder, in folder order.
pub fn load_project_metadata<P: AsRef<Path> + Sync>(folders: &[P]) -> Vec<ProjectMetadata> {
    folders
        .par_iter()
        .map(|folder| project_metadata(folder.as_ref()))
        .collect()
}

/// Discovers the projects in the given workspace folders.
///
/// Synchronous: reads every `package.json` on the rayon pool and blocks the
/// caller until all reads finish. Async callers run it between awaits; a
/// workspace holds a handful of folders, so it does not stall the runtime.
pub fn find_projects<P: AsRef<Path> + Sync>(folders: &[P]) -> WorkspaceProjects {
    let mut found = WorkspaceProjects::default();
    for metadata in load_project_metadata(folders) {
        match metadata.invalid_reason() {
            Some(reason) => {
                tracing::debug!(path = %metadata.path().display(), reason, "not a project");
                found.invalid.push(InvalidProject {
                    path: metadata.path().to_owned(),
                    reason: reason.to_string(),
                });
            }
            None => found.projects.push(metadata),
        }
    }
    found
}

/// True if every folder holds a valid project.
pub fn all_valid(metadata: &[ProjectMetadata]) -> bool {
    metadata.iter().all(ProjectMetadata::is_valid)
}
