//! Project metadata read from a folder's `package.json`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::base::ModelVersion;

/// File holding the project declaration inside a project folder.
pub const PROJECT_SETTINGS_FILE_NAME: &str = "package.json";

/// Namespace of the core data-model project. Every other namespace is an
/// extension.
pub const CORE_NAMESPACE: &str = "EdFi";

/// Extension suffix given to non-core projects.
pub const EXTENSION_SUFFIX: &str = "EXTENSION";

pub(crate) const REASON_MISSING_DECLARATION: &str = "Workspace folder does not have a package.json file with both modelProject.projectName and modelProject.projectVersion definitions.";
pub(crate) const REASON_BAD_NAME: &str = "modelProject.projectName definition must begin with an uppercase character. All other characters must be alphanumeric only.";
pub(crate) const REASON_BAD_VERSION: &str = "modelProject.projectVersion is not a valid version declaration. Version declarations must follow the semver.org standard.";

/// The project declaration fields of `package.json`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectJsonFields {
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub project_version: String,
    #[serde(default)]
    pub project_description: String,
}

#[derive(Deserialize)]
struct PackageJson {
    #[serde(rename = "modelProject", alias = "metaEdProject")]
    model_project: Option<ProjectJsonFields>,
}

/// Metadata for one workspace folder.
///
/// A project is either valid (namespace derived, version is semver) or
/// carries exactly one invalidity reason, never both.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectMetadata {
    path: PathBuf,
    project_name: String,
    project_version: String,
    namespace: String,
    description: String,
    invalid_reason: Option<String>,
}

impl ProjectMetadata {
    fn invalid(path: &Path, reason: &str) -> Self {
        Self {
            path: path.to_owned(),
            project_name: String::new(),
            project_version: String::new(),
            namespace: String::new(),
            description: String::new(),
            invalid_reason: Some(reason.to_string()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn project_version(&self) -> &str {
        &self.project_version
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_valid(&self) -> bool {
        self.invalid_reason.is_none()
    }

    pub fn invalid_reason(&self) -> Option<&str> {
        self.invalid_reason.as_deref()
    }

    pub fn is_extension(&self) -> bool {
        self.is_valid() && self.namespace != CORE_NAMESPACE
    }

    /// `""` for the core project, [`EXTENSION_SUFFIX`] otherwise.
    pub fn project_extension(&self) -> &'static str {
        if self.is_extension() { EXTENSION_SUFFIX } else { "" }
    }

    /// The declared version as a model version, for valid projects.
    pub fn model_version(&self) -> Option<ModelVersion> {
        if !self.is_valid() {
            return None;
        }
        ModelVersion::parse(&self.project_version).ok()
    }
}

/// Reads the project declaration from `<folder>/package.json`.
///
/// Returns `None` if the file is missing, unreadable, not JSON, or lacks a
/// non-empty name and version.
pub fn read_project_json(folder: &Path) -> Option<ProjectJsonFields> {
    let text = std::fs::read_to_string(folder.join(PROJECT_SETTINGS_FILE_NAME)).ok()?;
    let package: PackageJson = serde_json::from_str(&text).ok()?;
    package
        .model_project
        .filter(|fields| !fields.project_name.is_empty() && !fields.project_version.is_empty())
}

/// Derives a namespace from a project name.
///
/// Hyphens and whitespace are dropped; what remains must start with an
/// uppercase ASCII letter and be ASCII alphanumeric.
pub fn derive_namespace(project_name: &str) -> Option<String> {
    let namespace: String = project_name
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect();

    let mut chars = namespace.chars();
    let first = chars.next()?;
    if !first.is_ascii_uppercase() || !chars.all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(namespace)
}

/// Reads and validates the project in `folder`.
pub fn project_metadata(folder: &Path) -> ProjectMetadata {
    let Some(fields) = read_project_json(folder) else {
        return ProjectMetadata::invalid(folder, REASON_MISSING_DECLARATION);
    };

    let Some(namespace) = derive_namespace(&fields.project_name) else {
        return ProjectMetadata::invalid(folder, REASON_BAD_NAME);
    };

    if semver::Version::parse(fields.project_version.trim()).is_err() {
        return ProjectMetadata::invalid(folder, REASON_BAD_VERSION);
    }

    ProjectMetadata {
        path: folder.to_owned(),
        project_name: fields.project_name,
        project_version: fields.project_version.trim().to_string(),
        namespace,
        description: fields.project_description,
        invalid_reason: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn write_package(dir: &Path, json: &str) {
        std::fs::write(dir.join(PROJECT_SETTINGS_FILE_NAME), json).unwrap();
    }

    #[rstest]
    #[case("Ed-Fi", Some("EdFi"))]
    #[case("Sample", Some("Sample"))]
    #[case("My Extension2", Some("MyExtension2"))]
    #[case("sample", None)]
    #[case("Bad_Name", None)]
    #[case("", None)]
    fn test_derive_namespace(#[case] name: &str, #[case] expected: Option<&str>) {
        assert_eq!(derive_namespace(name).as_deref(), expected);
    }

    #[test]
    fn test_valid_core_project() {
        let dir = tempfile::tempdir().unwrap();
        write_package(
            dir.path(),
            r#"{"name": "x", "modelProject": {"projectName": "Ed-Fi", "projectVersion": "4.0.0", "projectDescription": "core"}}"#,
        );

        let metadata = project_metadata(dir.path());
        assert!(metadata.is_valid());
        assert_eq!(metadata.invalid_reason(), None);
        assert_eq!(metadata.namespace(), "EdFi");
        assert!(!metadata.is_extension());
        assert_eq!(metadata.project_extension(), "");
        assert_eq!(metadata.model_version().unwrap().to_string(), "4.0.0");
    }

    #[test]
    fn test_legacy_declaration_key() {
        let dir = tempfile::tempdir().unwrap();
        write_package(
            dir.path(),
            r#"{"metaEdProject": {"projectName": "Sample", "projectVersion": "1.0.0"}}"#,
        );

        let metadata = project_metadata(dir.path());
        assert!(metadata.is_extension());
        assert_eq!(metadata.project_extension(), EXTENSION_SUFFIX);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let metadata = project_metadata(dir.path());
        assert!(!metadata.is_valid());
        assert_eq!(metadata.invalid_reason(), Some(REASON_MISSING_DECLARATION));
        assert_eq!(metadata.namespace(), "");
    }

    #[test]
    fn test_missing_version() {
        let dir = tempfile::tempdir().unwrap();
        write_package(dir.path(), r#"{"modelProject": {"projectName": "Sample"}}"#);
        assert_eq!(
            project_metadata(dir.path()).invalid_reason(),
            Some(REASON_MISSING_DECLARATION)
        );
    }

    #[test]
    fn test_bad_name() {
        let dir = tempfile::tempdir().unwrap();
        write_package(
            dir.path(),
            r#"{"modelProject": {"projectName": "lower", "projectVersion": "1.0.0"}}"#,
        );
        assert_eq!(project_metadata(dir.path()).invalid_reason(), Some(REASON_BAD_NAME));
    }

    #[test]
    fn test_bad_version() {
        let dir = tempfile::tempdir().unwrap();
        write_package(
            dir.path(),
            r#"{"modelProject": {"projectName": "Sample", "projectVersion": "1.0"}}"#,
        );
        let metadata = project_metadata(dir.path());
        assert_eq!(metadata.invalid_reason(), Some(REASON_BAD_VERSION));
        assert!(metadata.model_version().is_none());
    }

    #[test]
    fn test_not_json() {
        let dir = tempfile::tempdir().unwrap();
        write_package(dir.path(), "not json");
        assert!(read_project_json(dir.path()).is_none());
    }
}
