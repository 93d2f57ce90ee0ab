//! The editor-side collaborators, bundled for the session.

use std::sync::Arc;

use async_trait::async_trait;

use super::message::{DeployParams, ServerMessage};
use crate::lint::{DiagnosticsPublisher, LintFailure};
use crate::notify::Notifier;
use crate::project::BundledModels;
use crate::settings::Settings;
use crate::workspace::{ModelFolderSync, WorkspaceFolders};

/// The external compiler pipeline.
#[async_trait]
pub trait Compiler: Send + Sync {
    /// Validates without generating artifacts.
    async fn lint(&self, message: &ServerMessage) -> Vec<LintFailure>;

    /// Validates and generates artifacts. Returns `false` on failure.
    async fn build(&self, message: &ServerMessage) -> bool;
}

/// Outcome of a deployment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeployResult {
    pub success: bool,
    pub failure_message: Option<String>,
}

impl DeployResult {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            failure_message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            failure_message: Some(message.into()),
        }
    }
}

/// The external deployment task runner.
#[async_trait]
pub trait Deployer: Send + Sync {
    async fn deploy(&self, params: &DeployParams) -> DeployResult;
}

/// Everything the session talks to.
#[derive(Clone)]
pub struct Host {
    pub settings: Settings,
    pub folders: Arc<dyn WorkspaceFolders>,
    pub notifier: Arc<dyn Notifier>,
    pub publisher: Arc<dyn DiagnosticsPublisher>,
    pub compiler: Arc<dyn Compiler>,
    pub deployer: Arc<dyn Deployer>,
    pub bundled: BundledModels,
}

impl Host {
    /// A folder synchronizer over this host's settings and folders.
    pub fn folder_sync(&self) -> ModelFolderSync {
        ModelFolderSync::new(
            self.settings.clone(),
            self.folders.clone(),
            self.notifier.clone(),
            self.bundled.clone(),
        )
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("settings", &self.settings)
            .field("bundled", &self.bundled)
            .finish_non_exhaustive()
    }
}
