//! Diagnostics reconciliation across successive lint passes

mod common;

use common::Recorder;
use lsp_types::Url;
use modelsync::lint::{DiagnosticsReconciler, LintFailure};

fn uri(path: &str) -> Url {
    Url::from_file_path(path).unwrap()
}

fn failing(paths: &[&str]) -> Vec<LintFailure> {
    paths
        .iter()
        .map(|path| LintFailure::error(format!("problem in {path}")).at(path, 0, 0).with_token_length(4))
        .collect()
}

#[tokio::test]
async fn test_identical_passes_are_idempotent() {
    let reconciler = DiagnosticsReconciler::new();
    let recorder = Recorder::default();
    let failures = failing(&["/p/a.metaed", "/p/b.metaed"]);

    let first = reconciler.reconcile(&failures, &recorder).await;
    let second = reconciler.reconcile(&failures, &recorder).await;

    assert!(second.clear.is_empty());
    assert_eq!(first.publish, second.publish);
    assert_eq!(recorder.published.lock().len(), 4);
}

#[tokio::test]
async fn test_resolved_file_is_cleared_once() {
    let reconciler = DiagnosticsReconciler::new();
    let recorder = Recorder::default();

    reconciler.reconcile(&failing(&["/p/a.metaed", "/p/b.metaed"]), &recorder).await;
    recorder.published.lock().clear();

    reconciler.reconcile(&failing(&["/p/b.metaed"]), &recorder).await;

    let published = recorder.published.lock().clone();
    assert_eq!(published.len(), 2);
    assert_eq!(published[0].uri, uri("/p/b.metaed"));
    assert_eq!(published[0].diagnostics.len(), 1);
    assert_eq!(published[1].uri, uri("/p/a.metaed"));
    assert!(published[1].diagnostics.is_empty());
    assert_eq!(reconciler.snapshot().await, vec![uri("/p/b.metaed")]);

    recorder.published.lock().clear();
    reconciler.reconcile(&failing(&["/p/b.metaed"]), &recorder).await;
    assert!(recorder.published.lock().iter().all(|p| p.uri != uri("/p/a.metaed")));
}

#[tokio::test]
async fn test_replaces_rather_than_merges() {
    let reconciler = DiagnosticsReconciler::new();
    let recorder = Recorder::default();

    let mut failures = failing(&["/p/a.metaed", "/p/a.metaed"]);
    reconciler.reconcile(&failures, &recorder).await;
    failures.pop();
    reconciler.reconcile(&failures, &recorder).await;

    let published = recorder.published.lock();
    assert_eq!(published[0].diagnostics.len(), 2);
    assert_eq!(published[1].diagnostics.len(), 1);
}

#[tokio::test]
async fn test_overlapping_passes_are_serialized() {
    let reconciler = DiagnosticsReconciler::new();
    let recorder = Recorder::default();
    let first = failing(&["/p/a.metaed", "/p/b.metaed"]);
    let second = failing(&["/p/b.metaed"]);

    // The recorder yields inside every publish, so the second pass is ready
    // while the first is still publishing.
    let (_, plan) = tokio::join!(
        reconciler.reconcile(&first, &recorder),
        reconciler.reconcile(&second, &recorder)
    );

    assert_eq!(plan.clear, vec![uri("/p/a.metaed")]);
    let published = recorder.published.lock();
    let order: Vec<_> = published
        .iter()
        .map(|p| (p.uri.path().to_string(), p.diagnostics.len()))
        .collect();
    assert_eq!(
        order,
        [
            ("/p/a.metaed".to_string(), 1),
            ("/p/b.metaed".to_string(), 1),
            ("/p/b.metaed".to_string(), 1),
            ("/p/a.metaed".to_string(), 0),
        ]
    );
    drop(published);
    assert_eq!(reconciler.snapshot().await, vec![uri("/p/b.metaed")]);
}

#[tokio::test]
async fn test_unlocated_failures_do_not_disturb_snapshot() {
    let reconciler = DiagnosticsReconciler::new();
    let recorder = Recorder::default();

    reconciler.reconcile(&failing(&["/p/a.metaed"]), &recorder).await;
    let plan = reconciler
        .reconcile(&[LintFailure::warning("no location")], &recorder)
        .await;

    assert!(plan.publish.is_empty());
    assert_eq!(plan.clear, vec![uri("/p/a.metaed")]);
    assert!(reconciler.snapshot().await.is_empty());
}
