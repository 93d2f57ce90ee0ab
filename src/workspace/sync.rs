//! Settings subscribers that keep the model folder in sync.
//!
//! The cascade is `platform version → model version → model directory →
//! folder mutation`. Each step is its own subscriber and only writes the next
//! setting; only the model-directory step touches the folder list. Every step
//! re-reads the settings after yielding, never before.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::{WorkspaceFolder, WorkspaceFolders};
use crate::compat;
use crate::event::{settle, yield_now};
use crate::notify::Notifier;
use crate::project::{BundledModels, model_name_for};
use crate::settings::{SettingKey, Settings, spawn_subscriber};

type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Yields before the model-version step reads settings, letting a
/// platform-version write land first.
const MODEL_VERSION_SETTLE: usize = 2;

/// Yields before the model-directory step reads settings, letting both
/// upstream steps land first.
const MODEL_DIRECTORY_SETTLE: usize = 4;

/// Keeps the model workspace folder consistent with the version settings.
#[derive(Clone)]
pub struct ModelFolderSync {
    settings: Settings,
    folders: Arc<dyn WorkspaceFolders>,
    notifier: Arc<dyn Notifier>,
    bundled: BundledModels,
}

impl ModelFolderSync {
    pub fn new(
        settings: Settings,
        folders: Arc<dyn WorkspaceFolders>,
        notifier: Arc<dyn Notifier>,
        bundled: BundledModels,
    ) -> Self {
        Self {
            settings,
            folders,
            notifier,
            bundled,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn folders(&self) -> &Arc<dyn WorkspaceFolders> {
        &self.folders
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub fn bundled(&self) -> &BundledModels {
        &self.bundled
    }

    /// Spawns the three cascade subscribers.
    pub fn spawn_handlers(&self, cancel: &CancellationToken) -> Vec<JoinHandle<()>> {
        let subscribe = |key, handler: fn(Self) -> BoxFuture| {
            let this = self.clone();
            spawn_subscriber(&self.settings, key, cancel.clone(), move || handler(this.clone()))
        };
        vec![
            subscribe(SettingKey::PlatformVersion, |this| {
                Box::pin(async move { this.on_platform_version_changed().await })
            }),
            subscribe(SettingKey::ModelVersion, |this| {
                Box::pin(async move { this.on_model_version_changed().await })
            }),
            subscribe(SettingKey::ModelDirectory, |this| {
                Box::pin(async move { this.on_model_directory_changed().await })
            }),
        ]
    }

    /// Forwards the default model version of the new platform version.
    pub async fn on_platform_version_changed(&self) {
        yield_now().await;

        let Some(platform) = self.settings.platform_version_semver() else {
            tracing::debug!(raw = %self.settings.platform_version(), "platform version unreadable");
            return;
        };
        let Some(model) = compat::default_model_version(&platform) else {
            tracing::debug!(%platform, "no default model version for platform");
            return;
        };
        if self
            .settings
            .model_version_semver()
            .is_some_and(|current| current.same_as(&model))
        {
            return;
        }

        tracing::info!(%platform, %model, "platform version changed, switching model version");
        if let Err(err) = self.settings.set_model_version(&model.to_string()) {
            tracing::warn!(%err, "could not write model version");
        }
        yield_now().await;
    }

    /// Forwards the bundled folder of the new model version.
    pub async fn on_model_version_changed(&self) {
        settle(MODEL_VERSION_SETTLE).await;
        self.sync_model_directory_to_model_version().await;
    }

    /// Replaces the model folder with the new model directory.
    pub async fn on_model_directory_changed(&self) {
        settle(MODEL_DIRECTORY_SETTLE).await;
        self.sync_workspace_to_model_directory().await;
    }

    /// Writes the model directory matching the configured model version.
    pub async fn sync_model_directory_to_model_version(&self) {
        yield_now().await;
        let path = self.model_path_for_configured_version();
        tracing::debug!(path = %path.display(), "model directory follows model version");
        if let Err(err) = self.settings.set_model_directory(&path.to_string_lossy()) {
            tracing::warn!(%err, "could not write model directory");
        }
        yield_now().await;
    }

    fn model_path_for_configured_version(&self) -> PathBuf {
        match self.settings.model_version_semver() {
            Some(model) => self.bundled.path_for(&model),
            None => self.bundled.default_path(),
        }
    }

    /// Points the model folder at the configured model directory.
    ///
    /// A directory that is not (yet) a project, or one outside the bundled
    /// storage without extended access, is left alone. Returns whether the
    /// folder list changed.
    pub async fn sync_workspace_to_model_directory(&self) -> bool {
        yield_now().await;

        let raw = self.settings.model_directory();
        if raw.is_empty() {
            return false;
        }
        let path = PathBuf::from(raw);

        if !self.bundled.contains(&path) && !self.settings.extended_access() {
            tracing::debug!(path = %path.display(), "model directory outside bundled storage ignored");
            return false;
        }

        let Some(name) = model_name_for(&path) else {
            tracing::debug!(path = %path.display(), "model directory is not a project yet");
            return false;
        };

        self.notifier
            .info("Updating the workspace model project. Please wait for restart message.");
        yield_now().await;

        let updated = self.replace_model_folder(&name, &path);
        yield_now().await;
        updated
    }

    /// Replaces the folder at index 0 with the model folder, or inserts it
    /// into an empty list.
    ///
    /// Index 0 is the model folder whether or not the host kept its tag.
    /// Bundled folders are made read-only first. A rejected mutation is
    /// reported to the user.
    pub fn replace_model_folder(&self, name: &str, path: &Path) -> bool {
        self.bundled.enforce_read_only(path);

        let delete_count = match self.folders.folders() {
            Some(folders) if !folders.is_empty() => 1,
            _ => 0,
        };

        let updated = self
            .folders
            .update_folders(0, delete_count, vec![WorkspaceFolder::model(name, path)]);
        if updated {
            tracing::info!(name, path = %path.display(), "model folder replaced");
        } else {
            tracing::warn!(name, path = %path.display(), "model folder replacement rejected");
            self.notifier.error(&format!(
                "Could not open the model project at {} in the workspace.",
                path.display()
            ));
        }
        updated
    }
}
