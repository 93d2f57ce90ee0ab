//! Lint triggers, failures and the problem-surface reconciler.
//!
//! ```text
//! LintTrigger ──▶ LintCoalescer ──(500ms quiet)──▶ LintPass::run
//!                                                     │
//!                              Vec<LintFailure> ◀─────┘ compiler
//!                                     │
//!                        DiagnosticsReconciler ──▶ DiagnosticsPublisher
//! ```

mod coalescer;
mod failure;
mod reconcile;

pub use coalescer::{
    Document, LINT_DEBOUNCE, LintCoalescer, LintPass, LintRequests, LintTrigger, MODEL_FILE_EXTENSION,
    MODEL_LANGUAGE_ID,
};
pub use failure::{DIAGNOSTIC_SOURCE, LintFailure, WARNING_CATEGORY};
pub use reconcile::{DiagnosticsPublisher, DiagnosticsReconciler, FailureSet, ReconcilePlan, plan};
