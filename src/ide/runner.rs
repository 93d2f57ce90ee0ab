use std::sync::Arc;

use async_trait::async_trait;

use super::host::Host;
use super::message::{Notifications, create_server_message};
use crate::lint::{DiagnosticsReconciler, LintPass, ReconcilePlan};

/// One lint pass over the current workspace.
///
/// Configuration problems are only logged; a workspace that cannot be
/// linted leaves the problem surface as it was.
pub struct LintRunner {
    host: Host,
    reconciler: Arc<DiagnosticsReconciler>,
}

impl LintRunner {
    pub fn new(host: Host, reconciler: Arc<DiagnosticsReconciler>) -> Self {
        Self { host, reconciler }
    }

    pub fn reconciler(&self) -> &Arc<DiagnosticsReconciler> {
        &self.reconciler
    }

    /// Runs discovery, the compiler and reconciliation. Returns `None` when
    /// the workspace could not be configured for the compiler.
    pub async fn lint(&self) -> Option<ReconcilePlan> {
        let message = create_server_message(
            &self.host.folders.folder_paths(),
            &self.host.settings,
            &self.host.bundled,
            self.host.notifier.as_ref(),
            Notifications::Silent,
        )
        .ok()?;

        let failures = self.host.compiler.lint(&message).await;
        tracing::debug!(failures = failures.len(), "lint pass finished");
        Some(
            self.reconciler
                .reconcile(&failures, self.host.publisher.as_ref())
                .await,
        )
    }
}

#[async_trait]
impl LintPass for LintRunner {
    async fn run(&self) {
        self.lint().await;
    }
}
