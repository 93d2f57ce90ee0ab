//! Persisted settings and their change stream.
//!
//! The store itself is an external collaborator; [`SettingsStore`] is the
//! seam. [`JsonSettingsStore`] is the in-process implementation used by hosts
//! without a native settings system and by the tests. [`Settings`] wraps any
//! store with typed accessors that never fail.

mod accessors;
mod store;
mod subscriber;

use std::fmt;

use serde_json::Value;
use tokio::sync::broadcast;

use crate::error::Result;

pub use accessors::Settings;
pub use store::JsonSettingsStore;
pub use subscriber::spawn_subscriber;

/// Every setting the crate reads or writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SettingKey {
    ModelDirectory,
    PlatformVersion,
    ModelVersion,
    DeploymentDirectory,
    SuppressDeleteOnDeploy,
    AcceptedLicense,
    ExtendedAccess,
    TelemetryConsent,
}

impl SettingKey {
    pub const ALL: [SettingKey; 8] = [
        SettingKey::ModelDirectory,
        SettingKey::PlatformVersion,
        SettingKey::ModelVersion,
        SettingKey::DeploymentDirectory,
        SettingKey::SuppressDeleteOnDeploy,
        SettingKey::AcceptedLicense,
        SettingKey::ExtendedAccess,
        SettingKey::TelemetryConsent,
    ];

    /// Name used in the persisted settings file.
    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::ModelDirectory => "modelDirectory",
            SettingKey::PlatformVersion => "platformVersion",
            SettingKey::ModelVersion => "modelVersion",
            SettingKey::DeploymentDirectory => "deploymentDirectory",
            SettingKey::SuppressDeleteOnDeploy => "suppressDeleteOnDeploy",
            SettingKey::AcceptedLicense => "acceptedLicense",
            SettingKey::ExtendedAccess => "extendedAccess",
            SettingKey::TelemetryConsent => "telemetryConsent",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notification that a setting changed. Carries only the key; handlers read
/// the current value themselves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SettingsChange {
    pub key: SettingKey,
}

impl SettingsChange {
    pub fn affects(&self, key: SettingKey) -> bool {
        self.key == key
    }
}

/// A persisted key-value store with change notifications.
pub trait SettingsStore: Send + Sync {
    /// Current value, or `None` when unset.
    fn get(&self, key: SettingKey) -> Option<Value>;

    /// Stores a value. Raises a [`SettingsChange`] if the value differs from
    /// the stored one.
    fn set(&self, key: SettingKey, value: Value) -> Result<()>;

    /// A fresh receiver for all subsequent changes.
    fn subscribe(&self) -> broadcast::Receiver<SettingsChange>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names_round_trip() {
        for key in SettingKey::ALL {
            assert_eq!(SettingKey::from_name(key.as_str()), Some(key));
        }
        assert_eq!(SettingKey::from_name("nope"), None);
    }
}
