//! Foundation types for the modelsync toolchain.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`ModelVersion`], [`PlatformVersion`] - Normalized semantic versions
//! - [`ModelVersionRange`] - Acceptable model versions for a platform
//!
//! This module has NO dependencies on other modelsync modules apart from the
//! error type.

mod version;

pub use version::{
    ModelVersion, ModelVersionRange, PlatformVersion, normalize, precedence, same_version,
};

// Re-export semver for convenience
pub use semver;
