//! Bundled, read-only model packages shipped with the host.

use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::base::ModelVersion;
use crate::compat;
use crate::error::{Error, Result};

/// Permission bits for bundled model files and directories: r-x for all.
pub const READ_ONLY_MODE: u32 = 0o555;

/// Location of the bundled model storage tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BundledModels {
    root: PathBuf,
}

impl BundledModels {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a bundled model folder by folder name.
    pub fn folder(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Path of the bundled folder shipping a model version.
    pub fn path_for(&self, model: &ModelVersion) -> PathBuf {
        self.folder(compat::model_folder_for(model))
    }

    /// Path of the folder used when resetting to defaults.
    pub fn default_path(&self) -> PathBuf {
        self.folder(compat::BASELINE_MODEL_FOLDER)
    }

    /// True if `path` lies inside the bundled storage tree.
    pub fn contains(&self, path: &Path) -> bool {
        lexical(path).starts_with(lexical(&self.root))
    }

    /// Marks a bundled folder read-only, logging failures.
    ///
    /// Paths outside the bundled tree are left alone.
    pub fn enforce_read_only(&self, path: &Path) {
        if !self.contains(path) {
            return;
        }
        if let Err(err) = make_read_only(path) {
            tracing::warn!(path = %path.display(), %err, "could not make bundled model read-only");
        }
    }
}

/// Resolves `.` and `..` without touching the filesystem.
fn lexical(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// Recursively sets [`READ_ONLY_MODE`] on `path` and everything below it.
///
/// Keeps going after a failure; the first failure is returned.
pub fn make_read_only(path: &Path) -> Result<()> {
    let mut first_error = None;

    for entry in WalkDir::new(path).contents_first(true) {
        let result = entry
            .map_err(|err| {
                let entry_path = err.path().unwrap_or(path).to_owned();
                Error::Permissions {
                    path: entry_path,
                    source: err.into(),
                }
            })
            .and_then(|entry| set_read_only(entry.path()));

        if let Err(err) = result {
            tracing::debug!(%err, "permission update failed");
            first_error.get_or_insert(err);
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(unix)]
fn set_read_only(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(READ_ONLY_MODE)).map_err(|source| {
        Error::Permissions {
            path: path.to_owned(),
            source,
        }
    })
}

#[cfg(not(unix))]
fn set_read_only(path: &Path) -> Result<()> {
    let to_error = |source| Error::Permissions {
        path: path.to_owned(),
        source,
    };
    let mut permissions = std::fs::metadata(path).map_err(to_error)?.permissions();
    permissions.set_readonly(true);
    std::fs::set_permissions(path, permissions).map_err(to_error)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Restores write access so temp dirs can be cleaned up.
    pub(crate) fn make_writable(path: &Path) {
        for entry in WalkDir::new(path).into_iter().flatten() {
            let mut permissions = entry.metadata().unwrap().permissions();
            #[allow(clippy::permissions_set_readonly_false)]
            permissions.set_readonly(false);
            let _ = std::fs::set_permissions(entry.path(), permissions);
        }
    }

    #[test]
    fn test_contains() {
        let bundled = BundledModels::new("/opt/host/models");
        assert!(bundled.contains(Path::new("/opt/host/models/ed-fi-model-4.0")));
        assert!(bundled.contains(Path::new("/opt/host/other/../models/x")));
        assert!(!bundled.contains(Path::new("/home/user/my-model")));
        assert!(!bundled.contains(Path::new("/opt/host/models-extra/x")));
    }

    #[test]
    fn test_path_for() {
        let bundled = BundledModels::new("/m");
        let model = ModelVersion::parse("4.0.0-a").unwrap();
        assert_eq!(bundled.path_for(&model), PathBuf::from("/m/ed-fi-model-4.0a"));
        assert_eq!(bundled.default_path(), PathBuf::from("/m/ed-fi-model-4.0"));
    }

    #[cfg(unix)]
    #[test]
    fn test_make_read_only_recursive() {
        use std::os::unix::fs::PermissionsExt;

        let root = tempfile::tempdir().unwrap();
        let model = root.path().join("model");
        std::fs::create_dir_all(model.join("Domain")).unwrap();
        std::fs::write(model.join("Domain/Student.metaed"), "x").unwrap();
        std::fs::write(model.join("package.json"), "{}").unwrap();

        make_read_only(&model).unwrap();

        for entry in WalkDir::new(&model) {
            let entry = entry.unwrap();
            let mode = entry.metadata().unwrap().permissions().mode() & 0o777;
            assert_eq!(mode, READ_ONLY_MODE, "{}", entry.path().display());
        }

        make_writable(&model);
    }

    #[test]
    fn test_make_read_only_missing_path() {
        assert!(matches!(
            make_read_only(Path::new("/definitely/not/here")),
            Err(Error::Permissions { .. })
        ));
    }
}
