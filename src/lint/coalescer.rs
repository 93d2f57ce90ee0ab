//! Trailing-edge debounce in front of the lint pass.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lsp_types::Url;
use smol_str::SmolStr;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::event::AsyncHook;
use crate::settings::Settings;

/// Quiet period after the last trigger before a lint pass runs.
pub const LINT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Language id of model source documents.
pub const MODEL_LANGUAGE_ID: &str = "metaed";

/// File extension of model source documents.
pub const MODEL_FILE_EXTENSION: &str = ".metaed";

/// One full lint pass: discovery, compiler call and reconciliation.
#[async_trait]
pub trait LintPass: Send + Sync + 'static {
    async fn run(&self);
}

/// An editor document as seen by the lint triggers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    pub uri: Url,
    pub language_id: SmolStr,
}

impl Document {
    pub fn new(uri: Url, language_id: impl Into<SmolStr>) -> Self {
        Self {
            uri,
            language_id: language_id.into(),
        }
    }

    /// True for model source files: right language and extension.
    pub fn is_model_source(&self) -> bool {
        self.language_id == MODEL_LANGUAGE_ID && self.uri.path().ends_with(MODEL_FILE_EXTENSION)
    }
}

/// Something that asks for a lint pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LintTrigger {
    ActiveEditorChanged(Document),
    TextChanged(Document),
    Closed(Document),
    Command,
    EditorReady,
    LicenseAccepted,
}

impl LintTrigger {
    /// Document triggers only count for model source files.
    pub fn is_relevant(&self) -> bool {
        match self {
            Self::ActiveEditorChanged(doc) | Self::TextChanged(doc) | Self::Closed(doc) => doc.is_model_source(),
            Self::Command | Self::EditorReady | Self::LicenseAccepted => true,
        }
    }
}

/// Collapses bursts of [`LintTrigger`]s into one [`LintPass`] run.
///
/// The license is checked when the quiet period ends, not when a trigger
/// arrives; a run that finds the license not accepted is dropped. Runs are
/// spawned and never cancelled once started.
pub struct LintCoalescer {
    settings: Settings,
    pass: Arc<dyn LintPass>,
    pending: usize,
}

impl LintCoalescer {
    pub fn new(settings: Settings, pass: Arc<dyn LintPass>) -> Self {
        Self {
            settings,
            pass,
            pending: 0,
        }
    }

    /// Starts the debounce task on the current runtime.
    pub fn start(self) -> (LintRequests, Option<JoinHandle<()>>) {
        let (tx, handle) = self.spawn();
        (LintRequests::from_sender(tx), handle)
    }
}

impl AsyncHook for LintCoalescer {
    type Event = LintTrigger;

    fn handle_event(&mut self, trigger: LintTrigger, timeout: Option<Instant>) -> Option<Instant> {
        if !trigger.is_relevant() {
            return timeout;
        }
        tracing::trace!(?trigger, "lint requested");
        self.pending += 1;
        Some(Instant::now() + LINT_DEBOUNCE)
    }

    fn finish_debounce(&mut self) {
        let coalesced = std::mem::take(&mut self.pending);
        if !self.settings.accepted_license() {
            tracing::debug!(coalesced, "license not accepted, lint dropped");
            return;
        }
        tracing::debug!(coalesced, "running lint pass");
        let pass = self.pass.clone();
        tokio::spawn(async move { pass.run().await });
    }
}

/// Sending side of a [`LintCoalescer`].
#[derive(Clone, Debug)]
pub struct LintRequests {
    tx: mpsc::UnboundedSender<LintTrigger>,
}

impl LintRequests {
    /// Requests over a caller-owned channel.
    pub fn from_sender(tx: mpsc::UnboundedSender<LintTrigger>) -> Self {
        Self { tx }
    }

    pub fn trigger(&self, trigger: LintTrigger) {
        if self.tx.send(trigger).is_err() {
            tracing::debug!("lint coalescer stopped, trigger dropped");
        }
    }
}
