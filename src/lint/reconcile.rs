//! Diffs each lint pass against the previous one.
//!
//! Every file with failures gets its whole diagnostic list replaced; every
//! file that failed last pass but not this one gets an explicit empty list.
//! Passes are serialized: the snapshot lock is held from the diff until the
//! last publish of the pass has completed.

use async_trait::async_trait;
use indexmap::{IndexMap, IndexSet};
use lsp_types::{Diagnostic, PublishDiagnosticsParams, Url};
use rustc_hash::FxBuildHasher;
use tokio::sync::Mutex;

use super::failure::LintFailure;

/// Files that carried at least one diagnostic after a pass, in publish order.
pub type FailureSet = IndexSet<Url, FxBuildHasher>;

/// The editor's problem surface.
#[async_trait]
pub trait DiagnosticsPublisher: Send + Sync {
    /// Replaces every diagnostic of `params.uri`.
    async fn publish(&self, params: PublishDiagnosticsParams);
}

/// Operations computed for one pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReconcilePlan {
    /// One replace per failing file, in first-seen order.
    pub publish: Vec<PublishDiagnosticsParams>,
    /// Files to clear, in previous-snapshot order.
    pub clear: Vec<Url>,
    /// The snapshot to keep once the operations are out.
    pub snapshot: FailureSet,
}

impl ReconcilePlan {
    /// All operations in order: replaces first, then clears.
    pub fn operations(&self) -> impl Iterator<Item = PublishDiagnosticsParams> + '_ {
        self.publish.iter().cloned().chain(
            self.clear
                .iter()
                .map(|uri| PublishDiagnosticsParams::new(uri.clone(), Vec::new(), None)),
        )
    }
}

/// Computes the publish and clear operations for `failures` given the
/// files that failed last pass.
pub fn plan(failures: &[LintFailure], previous: &FailureSet) -> ReconcilePlan {
    let mut by_file: IndexMap<Url, Vec<Diagnostic>, FxBuildHasher> = IndexMap::default();

    for failure in failures {
        let Some(path) = failure.file_path.as_deref() else {
            tracing::debug!(message = %failure.message, "failure without a file skipped");
            continue;
        };
        let Ok(uri) = Url::from_file_path(path) else {
            tracing::debug!(path = %path.display(), "failure path is not absolute, skipped");
            continue;
        };
        by_file.entry(uri).or_default().push(failure.to_diagnostic());
    }

    let snapshot: FailureSet = by_file.keys().cloned().collect();
    let clear = previous
        .iter()
        .filter(|uri| !snapshot.contains(*uri))
        .cloned()
        .collect();
    let publish = by_file
        .into_iter()
        .map(|(uri, diagnostics)| PublishDiagnosticsParams::new(uri, diagnostics, None))
        .collect();

    ReconcilePlan {
        publish,
        clear,
        snapshot,
    }
}

/// Owns the failing-file snapshot between passes.
#[derive(Debug, Default)]
pub struct DiagnosticsReconciler {
    snapshot: Mutex<FailureSet>,
}

impl DiagnosticsReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes one pass's diagnostics and stores the new snapshot.
    ///
    /// A pass started while another is publishing waits for it, and then
    /// diffs against the snapshot that pass left behind.
    pub async fn reconcile(&self, failures: &[LintFailure], publisher: &dyn DiagnosticsPublisher) -> ReconcilePlan {
        let mut snapshot = self.snapshot.lock().await;
        let plan = plan(failures, &snapshot);

        tracing::debug!(
            failures = failures.len(),
            files = plan.publish.len(),
            cleared = plan.clear.len(),
            "reconciling diagnostics"
        );
        for params in plan.operations() {
            tracing::trace!(uri = %params.uri, count = params.diagnostics.len(), "publishing diagnostics");
            publisher.publish(params).await;
        }

        *snapshot = plan.snapshot.clone();
        plan
    }

    /// The files that failed in the last completed pass.
    pub async fn snapshot(&self) -> Vec<Url> {
        self.snapshot.lock().await.iter().cloned().collect()
    }
}
