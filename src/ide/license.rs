//! Keeps a "license not accepted" problem visible until the license is
//! accepted.

use std::sync::Arc;

use lsp_types::{Diagnostic, DiagnosticSeverity, Position, PublishDiagnosticsParams, Range, Url};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::event::yield_now;
use crate::lint::{DIAGNOSTIC_SOURCE, DiagnosticsPublisher, LintRequests, LintTrigger};
use crate::settings::{SettingKey, Settings, spawn_subscriber};

/// Synthetic document the license problem is attached to.
pub const LICENSE_URI: &str = "modelsync:License%20Needs%20Accepting";

pub const LICENSE_MESSAGE: &str = "Please accept the license agreement in workspace settings";

/// Publishes or clears the license diagnostic.
#[derive(Clone)]
pub struct LicenseSync {
    settings: Settings,
    publisher: Arc<dyn DiagnosticsPublisher>,
    lint: LintRequests,
}

impl LicenseSync {
    pub fn new(settings: Settings, publisher: Arc<dyn DiagnosticsPublisher>, lint: LintRequests) -> Self {
        Self {
            settings,
            publisher,
            lint,
        }
    }

    /// Brings the license diagnostic in line with the setting. Accepting the
    /// license also requests a first lint pass.
    pub async fn sync(&self) {
        let Ok(uri) = Url::parse(LICENSE_URI) else {
            tracing::warn!(uri = LICENSE_URI, "license document uri rejected");
            return;
        };

        if self.settings.accepted_license() {
            tracing::debug!("license accepted, clearing license diagnostic");
            self.publisher
                .publish(PublishDiagnosticsParams::new(uri, Vec::new(), None))
                .await;
            self.lint.trigger(LintTrigger::LicenseAccepted);
        } else {
            self.publisher
                .publish(PublishDiagnosticsParams::new(uri, vec![license_diagnostic()], None))
                .await;
        }
    }

    /// Re-syncs on every change of the license setting.
    pub fn spawn(&self, cancel: CancellationToken) -> JoinHandle<()> {
        let this = self.clone();
        spawn_subscriber(&self.settings, SettingKey::AcceptedLicense, cancel, move || {
            let this = this.clone();
            async move {
                this.sync().await;
                yield_now().await;
            }
        })
    }
}

fn license_diagnostic() -> Diagnostic {
    let start = Position::new(0, 0);
    Diagnostic {
        range: Range::new(start, start),
        severity: Some(DiagnosticSeverity::ERROR),
        source: Some(DIAGNOSTIC_SOURCE.to_string()),
        message: LICENSE_MESSAGE.to_string(),
        ..Diagnostic::default()
    }
}
