//! Startup checks run before any settings subscriber exists.

use std::path::Path;

use super::ModelFolderSync;
use crate::compat::{DEFAULT_MODEL_FOLDER_NAME, DEFAULT_MODEL_VERSION, DEFAULT_PLATFORM_VERSION};
use crate::event::yield_now;

/// Result of [`ModelFolderSync::initialize_workspace_folders`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InitializeOutcome {
    /// The editor environment is about to restart; the caller must stop its
    /// startup sequence here.
    pub restarting: bool,
}

impl InitializeOutcome {
    const CONTINUE: Self = Self { restarting: false };
    const RESTARTING: Self = Self { restarting: true };
}

impl ModelFolderSync {
    /// Repairs the model settings and folder on startup.
    ///
    /// Unusable settings (no model version, no model directory, or a model
    /// directory missing on disk) reset everything to the default pair. A
    /// workspace whose folders were all closed gets its model folder back
    /// and reports a pending restart; if nothing could be restored, startup
    /// continues.
    pub async fn initialize_workspace_folders(&self) -> InitializeOutcome {
        let settings = self.settings();
        let model_directory = settings.model_directory();
        if settings.model_version().is_empty()
            || model_directory.is_empty()
            || !Path::new(&model_directory).exists()
        {
            tracing::info!("model settings unusable, resetting to defaults");
            return self.reset_to_defaults().await;
        }

        if self.folders().folders().is_some_and(|folders| folders.is_empty()) {
            tracing::info!("model folder was closed, restoring it");
            self.notifier()
                .info("Modifying the workspace. Please wait for restart message.");
            self.sync_model_directory_to_model_version().await;
            if self.sync_workspace_to_model_directory().await {
                return InitializeOutcome::RESTARTING;
            }
            tracing::info!("model folder could not be restored, continuing startup");
        }

        InitializeOutcome::CONTINUE
    }

    /// Points the workspace and settings at the default platform/model pair.
    async fn reset_to_defaults(&self) -> InitializeOutcome {
        let model_path = self.bundled().default_path();

        if self.folders().folders().is_none() {
            self.notifier()
                .info("Modifying the workspace. Please wait for restart message.");
            yield_now().await;
            self.replace_model_folder(DEFAULT_MODEL_FOLDER_NAME, &model_path);
            return InitializeOutcome::RESTARTING;
        }

        self.notifier()
            .info("Switching model projects. Please wait for restart message.");
        yield_now().await;
        self.replace_model_folder(DEFAULT_MODEL_FOLDER_NAME, &model_path);
        yield_now().await;

        let settings = self.settings();
        let writes = [
            settings.set_model_directory(&model_path.to_string_lossy()),
            settings.set_model_version(DEFAULT_MODEL_VERSION),
            settings.set_platform_version(DEFAULT_PLATFORM_VERSION),
        ];
        for err in writes.into_iter().filter_map(Result::err) {
            tracing::warn!(%err, "could not write default model settings");
        }

        yield_now().await;
        InitializeOutcome::CONTINUE
    }
}
