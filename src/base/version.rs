//! Semantic versions for the two configurable version axes.
//!
//! Settings hold versions as free-form strings. Everything that compares or
//! looks up a version goes through [`normalize`] first, so `"6.1"`,
//! `"v6.1.0"` and `"6.1.0"` are the same version and string equality is
//! never used.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Parses a version string, padding missing minor/patch components with zero.
///
/// Accepts an optional leading `v` or `=`, and keeps pre-release and build
/// suffixes intact (`"4.0-a"` becomes `4.0.0-a`).
pub fn normalize(input: &str) -> Result<Version> {
    let trimmed = input.trim();
    let stripped = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('='))
        .unwrap_or(trimmed)
        .trim_start();

    let split = stripped.find(['-', '+']).unwrap_or(stripped.len());
    let (core, suffix) = stripped.split_at(split);

    let parts: Vec<&str> = core.split('.').collect();
    if parts.is_empty()
        || parts.len() > 3
        || parts
            .iter()
            .any(|p| p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()))
    {
        return Err(Error::InvalidVersion(input.to_string()));
    }

    let mut padded = parts.join(".");
    for _ in parts.len()..3 {
        padded.push_str(".0");
    }
    padded.push_str(suffix);

    Version::parse(&padded).map_err(|_| Error::InvalidVersion(input.to_string()))
}

/// Orders two versions by semver precedence, ignoring build metadata.
pub fn precedence(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch)
        .cmp(&(b.major, b.minor, b.patch))
        .then_with(|| a.pre.cmp(&b.pre))
}

/// True if both versions have the same precedence.
pub fn same_version(a: &Version, b: &Version) -> bool {
    precedence(a, b) == Ordering::Equal
}

macro_rules! version_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(Version);

        impl $name {
            /// Wraps an already parsed version.
            pub fn new(version: Version) -> Self {
                Self(version)
            }

            /// Parses and normalizes a version string.
            pub fn parse(input: &str) -> Result<Self> {
                normalize(input).map(Self)
            }

            pub fn as_semver(&self) -> &Version {
                &self.0
            }

            /// Same precedence, build metadata ignored.
            pub fn same_as(&self, other: &Self) -> bool {
                same_version(&self.0, &other.0)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = Error;

            fn try_from(s: String) -> Result<Self> {
                Self::parse(&s)
            }
        }

        impl From<$name> for String {
            fn from(v: $name) -> String {
                v.0.to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

version_newtype!(
    /// Version of the data-model standard a project targets.
    ModelVersion
);

version_newtype!(
    /// Version of the runtime/API that consumes generated artifacts.
    PlatformVersion
);

/// An acceptable set of model versions.
///
/// Only two forms exist: an operator-free version and a `>=` lower bound.
/// Pre-release versions always take part in the comparison.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModelVersionRange {
    /// `3.1.0` accepts the 3.1 line from patch 0 upwards; `3.2.0-c` accepts
    /// exactly that pre-release.
    Exact(Version),
    /// `>=4.0.0` accepts anything at or above 4.0.0, pre-releases included.
    AtLeast(Version),
}

impl ModelVersionRange {
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if let Some(rest) = trimmed.strip_prefix(">=") {
            return normalize(rest)
                .map(Self::AtLeast)
                .map_err(|_| Error::InvalidRange(input.to_string()));
        }
        if trimmed.starts_with(['<', '>', '^', '~']) || trimmed.contains(' ') {
            return Err(Error::InvalidRange(input.to_string()));
        }
        normalize(trimmed)
            .map(Self::Exact)
            .map_err(|_| Error::InvalidRange(input.to_string()))
    }

    /// The version the range is anchored on.
    pub fn base(&self) -> &Version {
        match self {
            Self::Exact(v) | Self::AtLeast(v) => v,
        }
    }

    pub fn matches(&self, version: &Version) -> bool {
        match self {
            Self::Exact(base) if !base.pre.is_empty() => same_version(version, base),
            Self::Exact(base) => {
                version.major == base.major
                    && version.minor == base.minor
                    && precedence(version, base) != Ordering::Less
            }
            Self::AtLeast(base) => precedence(version, base) != Ordering::Less,
        }
    }
}

impl FromStr for ModelVersionRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ModelVersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(v) => write!(f, "{v}"),
            Self::AtLeast(v) => write!(f, ">={v}"),
        }
    }
}
