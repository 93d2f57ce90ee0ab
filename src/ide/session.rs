use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::commands::Commands;
use super::host::Host;
use super::license::LicenseSync;
use super::runner::LintRunner;
use crate::event::yield_now;
use crate::lint::{DiagnosticsReconciler, LintCoalescer, LintRequests, LintTrigger};
use crate::workspace::ModelFolderSync;

/// Options for [`Session::activate`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ActivateOptions {
    /// An editor is already showing a document; lint it right away.
    pub editor_active: bool,
}

/// A running integration: commands, the lint coalescer and the settings
/// subscribers. Dropping the session without [`Session::shutdown`] leaves
/// the background tasks running until the runtime stops.
pub struct Session {
    host: Host,
    commands: Commands,
    lint: LintRequests,
    reconciler: Arc<DiagnosticsReconciler>,
    cancel: CancellationToken,
    debounce: Option<JoinHandle<()>>,
    subscribers: Vec<JoinHandle<()>>,
    restarting: bool,
}

impl Session {
    /// Starts the integration.
    ///
    /// The workspace is bootstrapped before any subscriber exists. When the
    /// bootstrap reports a pending restart the session stops there: commands
    /// and lint requests work, but no settings change is followed.
    pub async fn activate(host: Host, options: ActivateOptions) -> Self {
        tracing::info!("session starting");

        let reconciler = Arc::new(DiagnosticsReconciler::new());
        let runner = LintRunner::new(host.clone(), reconciler.clone());
        let (lint, debounce) = LintCoalescer::new(host.settings.clone(), Arc::new(runner)).start();
        let commands = Commands::new(host.clone(), lint.clone());

        if options.editor_active {
            lint.trigger(LintTrigger::EditorReady);
        }

        let mut session = Self {
            host,
            commands,
            lint,
            reconciler,
            cancel: CancellationToken::new(),
            debounce,
            subscribers: Vec::new(),
            restarting: false,
        };

        let sync = session.folder_sync();
        if sync.initialize_workspace_folders().await.restarting {
            tracing::info!("editor environment will restart");
            session.restarting = true;
            return session;
        }

        session.subscribers = sync.spawn_handlers(&session.cancel);

        let license = LicenseSync::new(
            session.host.settings.clone(),
            session.host.publisher.clone(),
            session.lint.clone(),
        );
        session.subscribers.push(license.spawn(session.cancel.clone()));
        license.sync().await;
        yield_now().await;

        tracing::info!("session started");
        session.host.notifier.info("Model tooling has started");
        session
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn commands(&self) -> &Commands {
        &self.commands
    }

    /// Where editor events feed lint triggers.
    pub fn lint_requests(&self) -> &LintRequests {
        &self.lint
    }

    pub fn reconciler(&self) -> &Arc<DiagnosticsReconciler> {
        &self.reconciler
    }

    /// True if activation stopped for an editor restart.
    pub fn is_restarting(&self) -> bool {
        self.restarting
    }

    pub fn folder_sync(&self) -> ModelFolderSync {
        self.host.folder_sync()
    }

    /// Stops the subscribers and the debounce task. A lint pass already
    /// running is left to finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        for handle in self.subscribers {
            if let Err(err) = handle.await {
                tracing::warn!(%err, "settings subscriber failed");
            }
        }
        if let Some(debounce) = self.debounce {
            debounce.abort();
        }
        tracing::info!("session stopped");
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("host", &self.host)
            .field("subscribers", &self.subscribers.len())
            .field("restarting", &self.restarting)
            .finish_non_exhaustive()
    }
}
