use std::path::{Path, PathBuf};

use lsp_types::{Diagnostic, DiagnosticSeverity, Position, Range};
use serde::{Deserialize, Serialize};

/// Value of [`Diagnostic::source`] on every lint diagnostic.
pub const DIAGNOSTIC_SOURCE: &str = "modelsync";

/// Category string the compiler uses for warnings. Anything else is an error.
pub const WARNING_CATEGORY: &str = "warning";

/// One validation failure reported by the compiler.
///
/// Location fields are optional; a failure without a file cannot be shown
/// and is skipped by the reconciler.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintFailure {
    pub file_path: Option<PathBuf>,
    /// 0-based line; `None` when the failure has no specific line.
    pub line: Option<u32>,
    /// 0-based column.
    pub column: Option<u32>,
    pub token_length: Option<u32>,
    pub category: String,
    pub message: String,
}

impl LintFailure {
    pub fn new(category: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new("error", message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(WARNING_CATEGORY, message)
    }

    /// Locates the failure at `line`:`column` of `path`.
    pub fn at(mut self, path: impl AsRef<Path>, line: u32, column: u32) -> Self {
        self.file_path = Some(path.as_ref().to_owned());
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    pub fn with_token_length(mut self, length: u32) -> Self {
        self.token_length = Some(length);
        self
    }

    pub fn severity(&self) -> DiagnosticSeverity {
        if self.category == WARNING_CATEGORY {
            DiagnosticSeverity::WARNING
        } else {
            DiagnosticSeverity::ERROR
        }
    }

    /// Half-open range `[column, column + token_length)` on the failure's
    /// line. Missing parts collapse to line 0, column 0, length 0.
    pub fn range(&self) -> Range {
        let line = self.line.unwrap_or(0);
        let start = self.column.unwrap_or(0);
        let end = start.saturating_add(self.token_length.unwrap_or(0));
        Range::new(Position::new(line, start), Position::new(line, end))
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic {
            range: self.range(),
            severity: Some(self.severity()),
            source: Some(DIAGNOSTIC_SOURCE.to_string()),
            message: self.message.clone(),
            ..Diagnostic::default()
        }
    }
}
