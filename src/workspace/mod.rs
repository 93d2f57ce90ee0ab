//! The editor's workspace folder list and the model-folder synchronizer.
//!
//! The folder list belongs to the editor; [`WorkspaceFolders`] is the seam.
//! Only [`ModelFolderSync`] mutates it, and it does so with a single
//! [`WorkspaceFolders::update_folders`] call per replacement.

mod bootstrap;
mod sync;

use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use smol_str::SmolStr;

pub use bootstrap::InitializeOutcome;
pub use sync::ModelFolderSync;

/// One open workspace folder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkspaceFolder {
    pub name: SmolStr,
    pub path: PathBuf,
    /// Whether this is the designated model folder.
    pub is_model: bool,
}

impl WorkspaceFolder {
    pub fn new(name: impl Into<SmolStr>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            is_model: false,
        }
    }

    pub fn model(name: impl Into<SmolStr>, path: impl Into<PathBuf>) -> Self {
        Self {
            is_model: true,
            ..Self::new(name, path)
        }
    }
}

/// The editor's list of workspace folders.
pub trait WorkspaceFolders: Send + Sync {
    /// Current folders, or `None` when no workspace is open at all.
    fn folders(&self) -> Option<Vec<WorkspaceFolder>>;

    /// Removes `delete_count` folders at `start` and inserts `insert` there,
    /// as one mutation. Returns `false` if the request was rejected.
    fn update_folders(&self, start: usize, delete_count: usize, insert: Vec<WorkspaceFolder>) -> bool;

    fn folder_paths(&self) -> Vec<PathBuf> {
        self.folders()
            .unwrap_or_default()
            .into_iter()
            .map(|f| f.path)
            .collect()
    }
}

/// In-memory folder list.
///
/// Holds at most one model folder: inserting one takes the tag from any
/// folder that had it.
#[derive(Debug, Default)]
pub struct WorkspaceState {
    folders: RwLock<Option<Vec<WorkspaceFolder>>>,
}

impl WorkspaceState {
    /// A state with no workspace open.
    pub fn closed() -> Self {
        Self::default()
    }

    /// An open workspace with the given folders.
    pub fn open(folders: Vec<WorkspaceFolder>) -> Self {
        Self {
            folders: RwLock::new(Some(folders)),
        }
    }

    /// The current model folder, if any.
    pub fn model_folder(&self) -> Option<WorkspaceFolder> {
        self.folders
            .read()
            .as_ref()?
            .iter()
            .find(|f| f.is_model)
            .cloned()
    }

    pub fn contains_path(&self, path: &Path) -> bool {
        self.folders
            .read()
            .as_ref()
            .is_some_and(|folders| folders.iter().any(|f| f.path == path))
    }
}

impl WorkspaceFolders for WorkspaceState {
    fn folders(&self) -> Option<Vec<WorkspaceFolder>> {
        self.folders.read().clone()
    }

    fn update_folders(&self, start: usize, delete_count: usize, insert: Vec<WorkspaceFolder>) -> bool {
        let mut guard = self.folders.write();
        let mut next = guard.clone().unwrap_or_default();

        if start > next.len() || start + delete_count > next.len() {
            tracing::warn!(start, delete_count, len = next.len(), "folder update out of range");
            return false;
        }
        let inserted = start..start + insert.len();
        let takes_tag = insert.iter().any(|f| f.is_model);
        let removed: Vec<_> = next.splice(start..start + delete_count, insert).collect();

        if takes_tag {
            for (index, folder) in next.iter_mut().enumerate() {
                if folder.is_model && !inserted.contains(&index) {
                    tracing::debug!(path = %folder.path.display(), "model tag moved off folder");
                    folder.is_model = false;
                }
            }
        }

        tracing::debug!(folders = next.len(), removed = removed.len(), "workspace folders updated");
        *guard = Some(next);
        true
    }
}
