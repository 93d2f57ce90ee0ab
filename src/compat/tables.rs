//! Static version tables.
//!
//! Two tables that look alike but answer different questions:
//! - [`COMPATIBILITY_RANGES`]: which model versions a platform version accepts.
//! - [`DEFAULT_MODEL_VERSIONS`]: which single model version a platform
//!   version starts out with.
//!
//! A third table maps model versions to the bundled folder that ships them.

/// Platform version → acceptable model version range.
pub const COMPATIBILITY_RANGES: &[(&str, &str)] = &[
    ("3.0.0", "3.0.0"),
    ("3.1.0", "3.1.0"),
    ("3.1.1", "3.1.0"),
    ("3.2.0", "3.1.0"),
    ("3.3.0", "3.2.0"),
    ("3.4.0", "3.2.0-b"),
    ("5.0.0", "3.2.0-c"),
    ("5.1.0", "3.2.0-c"),
    ("5.2.0", "3.3.0-a"),
    ("5.3.0", "3.3.1-b"),
    ("6.0.0", "4.0.0-a"),
    ("6.1.0", "4.0.0"),
    ("7.0.0", ">=4.0.0"),
];

/// Range used for platform versions missing from [`COMPATIBILITY_RANGES`].
pub const FALLBACK_RANGE: &str = "3.0.0";

/// Platform version → model version a fresh model folder is created with.
pub const DEFAULT_MODEL_VERSIONS: &[(&str, &str)] = &[
    ("3.0.0", "3.0.0"),
    ("3.1.0", "3.1.0"),
    ("3.1.1", "3.1.0"),
    ("3.2.0", "3.1.0"),
    ("3.3.0", "3.2.0"),
    ("3.4.0", "3.2.0-b"),
    ("5.0.0", "3.2.0-c"),
    ("5.1.0", "3.2.0-c"),
    ("5.2.0", "3.3.0-a"),
    ("5.3.0", "3.3.1-b"),
    ("6.0.0", "4.0.0-a"),
    ("6.1.0", "4.0.0"),
    ("7.0.0", "5.0.0-pre.1"),
];

/// Model version → bundled model folder name.
pub const MODEL_FOLDERS: &[(&str, &str)] = &[
    ("3.0.0", "ed-fi-model-3.0"),
    ("3.1.0", "ed-fi-model-3.1"),
    ("3.2.0", "ed-fi-model-3.2a"),
    ("3.2.0-b", "ed-fi-model-3.2b"),
    ("3.2.0-c", "ed-fi-model-3.2c"),
    ("3.3.0-a", "ed-fi-model-3.3a"),
    ("3.3.1-b", "ed-fi-model-3.3b"),
    ("4.0.0-a", "ed-fi-model-4.0a"),
    ("4.0.0", "ed-fi-model-4.0"),
    ("5.0.0-pre.1", "ed-fi-model-5.0-pre.1"),
];

/// Folder used when a model version has no bundled folder of its own.
pub const BASELINE_MODEL_FOLDER: &str = "ed-fi-model-4.0";

/// Platform version the workspace is reset to when settings are unusable.
pub const DEFAULT_PLATFORM_VERSION: &str = "6.1.0";

/// Model version paired with [`DEFAULT_PLATFORM_VERSION`].
pub const DEFAULT_MODEL_VERSION: &str = "4.0.0";

/// Folder name shown for the default model folder.
pub const DEFAULT_MODEL_FOLDER_NAME: &str = "Ed-Fi-Model 4.0";
