//! User commands: build, deploy, lint and about.
//!
//! Every command either runs to completion or stops before any downstream
//! call with a message to the user. Nothing here writes settings or folders.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::host::{DeployResult, Host};
use super::message::{
    ARTIFACT_FOLDER_NAME, DeployParams, MessageError, Notifications, ServerMessage, create_server_message,
};
use crate::lint::{LintRequests, LintTrigger};
use crate::notify::Level;

/// Folders a deployment directory must contain side by side.
pub const DEPLOYMENT_FOLDERS: [&str; 2] = ["Ed-Fi-ODS", "Ed-Fi-ODS-Implementation"];

/// Why a command stopped before calling the compiler or deployer.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("You must first accept the license agreement in workspace settings.")]
    LicenseNotAccepted,

    #[error("To deploy, set the deployment directory in workspace settings.")]
    DeploymentDirectoryUnset,

    #[error("Deployment directory {} must contain the {} and {} folders.", path.display(), DEPLOYMENT_FOLDERS[0], DEPLOYMENT_FOLDERS[1])]
    DeploymentDirectoryInvalid { path: PathBuf },

    #[error("No extension to deploy.")]
    NothingToDeploy,

    #[error(transparent)]
    Configuration(#[from] MessageError),
}

impl CommandError {
    /// Level the error is shown at.
    pub fn level(&self) -> Level {
        match self {
            Self::DeploymentDirectoryUnset | Self::NothingToDeploy => Level::Info,
            _ => Level::Error,
        }
    }
}

/// Version information shown by the about command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AboutInfo {
    pub version: &'static str,
    pub platform_version: String,
    pub model_version: String,
}

impl fmt::Display for AboutInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "modelsync {}", self.version)?;
        if !self.platform_version.is_empty() {
            write!(f, ", platform {}", self.platform_version)?;
        }
        if !self.model_version.is_empty() {
            write!(f, ", model {}", self.model_version)?;
        }
        Ok(())
    }
}

/// The four user commands.
#[derive(Clone, Debug)]
pub struct Commands {
    host: Host,
    lint: LintRequests,
}

impl Commands {
    pub fn new(host: Host, lint: LintRequests) -> Self {
        Self { host, lint }
    }

    /// Builds the workspace. Returns the compiler's success flag.
    pub async fn build(&self) -> Result<bool, CommandError> {
        let message = self.refuse_on_error(self.build_message())?;

        self.host.notifier.info("Building...");
        let success = self.host.compiler.build(&message).await;
        tracing::info!(success, "build finished");

        if success {
            self.host.notifier.info(&format!(
                "Build succeeded: find results in the '{ARTIFACT_FOLDER_NAME}' folder."
            ));
        } else {
            self.host.notifier.info("Build failed, see the Problems window.");
        }
        Ok(success)
    }

    /// Deploys the built artifacts into the deployment directory.
    pub async fn deploy(&self) -> Result<DeployResult, CommandError> {
        let params = self.refuse_on_error(self.deploy_params())?;
        let target = params.message.deploy_directory.clone();

        self.host.notifier.info("Deploying...");
        let result = self.host.deployer.deploy(&params).await;
        tracing::info!(success = result.success, target = %target.display(), "deploy finished");

        if result.success {
            self.host.notifier.info(&format!(
                "Deploy succeeded: find results under '{}'.",
                target.display()
            ));
        } else {
            if let Some(reason) = &result.failure_message {
                tracing::warn!(reason, "deploy failed");
            }
            self.host.notifier.info(
                "Deploy failed, see the Problems window and check the deployment directory in settings.",
            );
        }
        Ok(result)
    }

    /// Requests a lint pass through the coalescer.
    pub fn lint(&self) {
        self.lint.trigger(LintTrigger::Command);
    }

    /// Shows and returns the version information.
    pub fn about(&self) -> AboutInfo {
        let about = AboutInfo {
            version: env!("CARGO_PKG_VERSION"),
            platform_version: self.host.settings.platform_version(),
            model_version: self.host.settings.model_version(),
        };
        self.host.notifier.info(&about.to_string());
        about
    }

    fn build_message(&self) -> Result<ServerMessage, CommandError> {
        self.require_license()?;
        Ok(create_server_message(
            &self.host.folders.folder_paths(),
            &self.host.settings,
            &self.host.bundled,
            self.host.notifier.as_ref(),
            Notifications::Show,
        )?)
    }

    fn deploy_params(&self) -> Result<DeployParams, CommandError> {
        self.require_license()?;

        let directory = self.host.settings.deployment_directory();
        if directory.is_empty() {
            return Err(CommandError::DeploymentDirectoryUnset);
        }
        check_deployment_directory(Path::new(&directory))?;

        let message = create_server_message(
            &self.host.folders.folder_paths(),
            &self.host.settings,
            &self.host.bundled,
            self.host.notifier.as_ref(),
            Notifications::Show,
        )?;

        let extended_access = self.host.settings.extended_access();
        if !extended_access && message.projects.len() <= 1 {
            return Err(CommandError::NothingToDeploy);
        }

        Ok(DeployParams {
            message,
            deploy_core: extended_access,
            suppress_delete: self.host.settings.suppress_delete_on_deploy(),
        })
    }

    fn require_license(&self) -> Result<(), CommandError> {
        if self.host.settings.accepted_license() {
            Ok(())
        } else {
            Err(CommandError::LicenseNotAccepted)
        }
    }

    /// Tells the user why a command stopped. Configuration errors were
    /// already shown while building the message.
    fn refuse_on_error<T>(&self, result: Result<T, CommandError>) -> Result<T, CommandError> {
        if let Err(err) = &result {
            tracing::info!(%err, "command refused");
            match err {
                CommandError::Configuration(_) => {}
                _ => self.host.notifier.notify(err.level(), &err.to_string()),
            }
        }
        result
    }
}

/// Checks that `directory` holds both [`DEPLOYMENT_FOLDERS`].
pub fn check_deployment_directory(directory: &Path) -> Result<(), CommandError> {
    if DEPLOYMENT_FOLDERS.iter().all(|folder| directory.join(folder).is_dir()) {
        Ok(())
    } else {
        Err(CommandError::DeploymentDirectoryInvalid {
            path: directory.to_owned(),
        })
    }
}
