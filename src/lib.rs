//! # modelsync
//!
//! Editor integration layer that keeps a model workspace consistent with its
//! version settings and keeps the problem surface in step with the latest
//! lint results.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide        → commands, license sync, session lifecycle, collaborators
//!   ↓
//! lint       → failures, debounce coalescer, diagnostics reconciler
//! workspace  → folder list, settings cascade, startup bootstrap
//!   ↓
//! project    → project discovery, bundled model storage
//! settings   → keys, persisted store, change stream, typed accessors
//! compat     → platform/model version tables
//! event      → debounced async hooks, yield helpers
//!   ↓
//! base       → version normalization, ModelVersion / PlatformVersion
//! ```
//!
//! All asynchronous work expects a current-thread tokio runtime. Handlers
//! interleave at `.await` points only, never in parallel.

// ============================================================================
// FOUNDATION
// ============================================================================

/// Version primitives: normalization, model/platform versions, ranges
pub mod base;

/// Crate error type
pub mod error;

/// Debounced hooks and cooperative yields
pub mod event;

/// User-visible notifications
pub mod notify;

// ============================================================================
// CONFIGURATION AND WORKSPACE
// ============================================================================

/// Platform/model version compatibility tables
pub mod compat;

/// Persisted settings and their change stream
pub mod settings;

/// Project discovery and bundled model storage
pub mod project;

/// Workspace folders and the model-folder synchronizer
pub mod workspace;

// ============================================================================
// EDITOR INTEGRATION
// ============================================================================

/// Lint triggers, failures and diagnostics reconciliation
pub mod lint;

/// Commands, collaborators and the session
pub mod ide;

pub use base::{ModelVersion, ModelVersionRange, PlatformVersion};
pub use error::{Error, Result};
pub use ide::{Host, Session};
pub use settings::{SettingKey, Settings};
