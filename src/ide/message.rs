//! The compiler configuration built from the workspace and settings.

use std::path::PathBuf;

use thiserror::Error;

use crate::base::{ModelVersion, PlatformVersion};
use crate::compat::{self, DEFAULT_PLATFORM_VERSION};
use crate::notify::Notifier;
use crate::project::{BundledModels, ProjectMetadata, find_projects};
use crate::settings::Settings;

/// Folder, under the last project, that receives generated artifacts.
pub const ARTIFACT_FOLDER_NAME: &str = "ModelOutput";

/// Whether configuration problems are shown to the user or only logged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notifications {
    Show,
    Silent,
}

/// Why no compiler configuration could be built.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MessageError {
    #[error("A model project is required in the workspace. Bundled versions are at {}", bundled_root.display())]
    NoProjects { bundled_root: PathBuf },

    #[error("Exactly one core model project is required in the workspace, found {found}. Bundled versions are at {}", bundled_root.display())]
    ModelProjectCount { found: usize, bundled_root: PathBuf },

    #[error("Platform version {platform} in settings requires the model project at {}", folder.display())]
    Incompatible { platform: PlatformVersion, folder: PathBuf },

    #[error("Platform version `{0}` in settings is not a valid version")]
    InvalidPlatformVersion(String),
}

/// Notice shown when some workspace folders are not projects.
pub const NON_PROJECT_NOTICE: &str = "There are non-model projects in the workspace. They will be ignored";

/// Input of one compiler call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerMessage {
    /// Valid projects, in workspace order.
    pub projects: Vec<ProjectMetadata>,
    pub project_paths: Vec<PathBuf>,
    pub platform_version: PlatformVersion,
    /// Version of the single core model project.
    pub model_version: ModelVersion,
    pub extended_access: bool,
    pub artifact_directory: PathBuf,
    pub deploy_directory: PathBuf,
}

impl ServerMessage {
    pub fn extension_count(&self) -> usize {
        self.projects.iter().filter(|p| p.is_extension()).count()
    }
}

/// Input of one deployment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployParams {
    pub message: ServerMessage,
    /// Also deploy the core model artifacts.
    pub deploy_core: bool,
    /// Leave existing files in the target in place.
    pub suppress_delete: bool,
}

/// Builds a [`ServerMessage`] from the workspace folders and settings.
///
/// Fails when the workspace holds no project, does not hold exactly one
/// core model project, or holds one incompatible with the configured
/// platform version. Failures are reported through `notifier` unless
/// `notifications` is [`Notifications::Silent`]; they are always logged.
///
/// Blocks on project discovery; see [`find_projects`].
pub fn create_server_message(
    folders: &[PathBuf],
    settings: &Settings,
    bundled: &BundledModels,
    notifier: &dyn Notifier,
    notifications: Notifications,
) -> Result<ServerMessage, MessageError> {
    let result = build_message(folders, settings, bundled, notifier, notifications);
    if let Err(err) = &result {
        tracing::info!(%err, "no compiler configuration");
        if notifications == Notifications::Show {
            notifier.error(&err.to_string());
        }
    }
    result
}

fn build_message(
    folders: &[PathBuf],
    settings: &Settings,
    bundled: &BundledModels,
    notifier: &dyn Notifier,
    notifications: Notifications,
) -> Result<ServerMessage, MessageError> {
    let found = find_projects(folders);
    if found.is_empty() {
        return Err(MessageError::NoProjects {
            bundled_root: bundled.root().to_owned(),
        });
    }

    if !found.invalid.is_empty() {
        tracing::info!(count = found.invalid.len(), "{NON_PROJECT_NOTICE}");
        if notifications == Notifications::Show {
            notifier.info(NON_PROJECT_NOTICE);
        }
    }

    let model_versions = found.model_versions();
    let [model_version] = model_versions.as_slice() else {
        return Err(MessageError::ModelProjectCount {
            found: model_versions.len(),
            bundled_root: bundled.root().to_owned(),
        });
    };

    let platform_version = configured_platform_version(settings)?;
    if !compat::is_compatible(model_version, &platform_version) {
        let folder = compat::recommended_model_folder(&compat::range_for(&platform_version));
        return Err(MessageError::Incompatible {
            platform: platform_version,
            folder: bundled.folder(folder),
        });
    }

    let artifact_directory = found
        .projects
        .last()
        .map(|p| p.path().join(ARTIFACT_FOLDER_NAME))
        .unwrap_or_default();

    Ok(ServerMessage {
        project_paths: found.projects.iter().map(|p| p.path().to_owned()).collect(),
        projects: found.projects,
        platform_version,
        model_version: model_version.clone(),
        extended_access: settings.extended_access(),
        artifact_directory,
        deploy_directory: PathBuf::from(settings.deployment_directory()),
    })
}

/// The configured platform version, or the default one when unset.
fn configured_platform_version(settings: &Settings) -> Result<PlatformVersion, MessageError> {
    let raw = settings.platform_version();
    let raw = if raw.is_empty() { DEFAULT_PLATFORM_VERSION.to_string() } else { raw };
    PlatformVersion::parse(&raw).map_err(|_| MessageError::InvalidPlatformVersion(raw))
}
