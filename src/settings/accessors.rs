use std::sync::Arc;

use semver::{BuildMetadata, Prerelease};
use serde_json::Value;
use tokio::sync::broadcast;

use super::{JsonSettingsStore, SettingKey, SettingsChange, SettingsStore};
use crate::base::{ModelVersion, PlatformVersion, normalize};
use crate::error::Result;

/// Typed view over a [`SettingsStore`].
///
/// Reads never fail: unset or mistyped values read as `""` or `false`.
#[derive(Clone)]
pub struct Settings {
    store: Arc<dyn SettingsStore>,
}

impl Settings {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// Settings over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(JsonSettingsStore::in_memory()))
    }

    pub fn store(&self) -> &Arc<dyn SettingsStore> {
        &self.store
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SettingsChange> {
        self.store.subscribe()
    }

    fn string(&self, key: SettingKey) -> String {
        match self.store.get(key) {
            Some(Value::String(s)) => s,
            _ => String::new(),
        }
    }

    fn flag(&self, key: SettingKey) -> bool {
        matches!(self.store.get(key), Some(Value::Bool(true)))
    }

    pub fn set(&self, key: SettingKey, value: impl Into<Value>) -> Result<()> {
        self.store.set(key, value.into())
    }

    pub fn model_directory(&self) -> String {
        self.string(SettingKey::ModelDirectory)
    }

    pub fn set_model_directory(&self, path: &str) -> Result<()> {
        self.set(SettingKey::ModelDirectory, path)
    }

    pub fn platform_version(&self) -> String {
        self.string(SettingKey::PlatformVersion)
    }

    /// The platform version coerced to `major.minor.patch`, `None` when unset
    /// or unreadable. Pre-release and build suffixes are dropped.
    pub fn platform_version_semver(&self) -> Option<PlatformVersion> {
        let mut version = normalize(&self.platform_version()).ok()?;
        version.pre = Prerelease::EMPTY;
        version.build = BuildMetadata::EMPTY;
        Some(PlatformVersion::new(version))
    }

    pub fn set_platform_version(&self, version: &str) -> Result<()> {
        self.set(SettingKey::PlatformVersion, version)
    }

    pub fn model_version(&self) -> String {
        self.string(SettingKey::ModelVersion)
    }

    pub fn model_version_semver(&self) -> Option<ModelVersion> {
        ModelVersion::parse(&self.model_version()).ok()
    }

    pub fn set_model_version(&self, version: &str) -> Result<()> {
        self.set(SettingKey::ModelVersion, version)
    }

    pub fn deployment_directory(&self) -> String {
        self.string(SettingKey::DeploymentDirectory)
    }

    pub fn suppress_delete_on_deploy(&self) -> bool {
        self.flag(SettingKey::SuppressDeleteOnDeploy)
    }

    pub fn accepted_license(&self) -> bool {
        self.flag(SettingKey::AcceptedLicense)
    }

    pub fn extended_access(&self) -> bool {
        self.flag(SettingKey::ExtendedAccess)
    }

    pub fn telemetry_consent(&self) -> String {
        self.string(SettingKey::TelemetryConsent)
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("platform_version", &self.platform_version())
            .field("model_version", &self.model_version())
            .field("model_directory", &self.model_directory())
            .finish_non_exhaustive()
    }
}
