//! Editor-facing layer: collaborators, commands and the session.
//!
//! The compiler, the deployer and the problem surface are external; this
//! module only defines their seams ([`Compiler`], [`Deployer`],
//! [`DiagnosticsPublisher`]) and drives them.
//!
//! ## Usage
//!
//! ```ignore
//! use modelsync::ide::{ActivateOptions, Host, Session};
//!
//! let session = Session::activate(host, ActivateOptions { editor_active: true }).await;
//! if session.is_restarting() {
//!     return;
//! }
//! session.commands().build().await?;
//! session.shutdown().await;
//! ```

mod commands;
mod host;
mod license;
mod message;
mod runner;
mod session;

pub use commands::{AboutInfo, CommandError, Commands, DEPLOYMENT_FOLDERS, check_deployment_directory};
pub use host::{Compiler, DeployResult, Deployer, Host};
pub use license::{LICENSE_MESSAGE, LICENSE_URI, LicenseSync};
pub use message::{
    ARTIFACT_FOLDER_NAME, DeployParams, MessageError, NON_PROJECT_NOTICE, Notifications, ServerMessage,
    create_server_message,
};
pub use runner::LintRunner;
pub use session::{ActivateOptions, Session};

pub use crate::lint::DiagnosticsPublisher;
