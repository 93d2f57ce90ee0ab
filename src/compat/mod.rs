//! Version compatibility between the platform and model axes.
//!
//! All lookups normalize their input first, so `"6.1"` and `"6.1.0"` hit the
//! same table row. Unknown platform versions are tolerated: the range lookup
//! falls back to the oldest range and the default-version lookup returns
//! `None`.

mod tables;

use once_cell::sync::Lazy;
use semver::Version;

use crate::base::{ModelVersion, ModelVersionRange, PlatformVersion, normalize, precedence, same_version};

pub use tables::{
    BASELINE_MODEL_FOLDER, COMPATIBILITY_RANGES, DEFAULT_MODEL_FOLDER_NAME, DEFAULT_MODEL_VERSION,
    DEFAULT_MODEL_VERSIONS, DEFAULT_PLATFORM_VERSION, FALLBACK_RANGE, MODEL_FOLDERS,
};

static RANGES: Lazy<Vec<(Version, ModelVersionRange)>> = Lazy::new(|| {
    COMPATIBILITY_RANGES
        .iter()
        .filter_map(|(platform, range)| {
            Some((normalize(platform).ok()?, ModelVersionRange::parse(range).ok()?))
        })
        .collect()
});

static FALLBACK: Lazy<ModelVersionRange> = Lazy::new(|| {
    ModelVersionRange::parse(FALLBACK_RANGE).unwrap_or(ModelVersionRange::Exact(Version::new(3, 0, 0)))
});

static DEFAULTS: Lazy<Vec<(Version, Version)>> = Lazy::new(|| parse_pairs(DEFAULT_MODEL_VERSIONS));

static FOLDERS: Lazy<Vec<(Version, &'static str)>> = Lazy::new(|| {
    MODEL_FOLDERS
        .iter()
        .filter_map(|(version, folder)| Some((normalize(version).ok()?, *folder)))
        .collect()
});

fn parse_pairs(pairs: &[(&str, &str)]) -> Vec<(Version, Version)> {
    pairs
        .iter()
        .filter_map(|(k, v)| Some((normalize(k).ok()?, normalize(v).ok()?)))
        .collect()
}

/// Returns the model version range accepted by a platform version.
///
/// Unknown platform versions get the oldest range.
pub fn range_for(platform: &PlatformVersion) -> ModelVersionRange {
    RANGES
        .iter()
        .find(|(key, _)| same_version(key, platform.as_semver()))
        .map(|(_, range)| range.clone())
        .unwrap_or_else(|| FALLBACK.clone())
}

/// True if the model version satisfies the range of the platform version.
pub fn is_compatible(model: &ModelVersion, platform: &PlatformVersion) -> bool {
    range_for(platform).matches(model.as_semver())
}

/// Model version a fresh model folder is created with for a platform version.
pub fn default_model_version(platform: &PlatformVersion) -> Option<ModelVersion> {
    DEFAULTS
        .iter()
        .find(|(key, _)| same_version(key, platform.as_semver()))
        .map(|(_, model)| ModelVersion::new(model.clone()))
}

/// Bundled folder name for a model version, or the baseline folder.
pub fn model_folder_for(model: &ModelVersion) -> &'static str {
    FOLDERS
        .iter()
        .find(|(key, _)| same_version(key, model.as_semver()))
        .map(|(_, folder)| *folder)
        .unwrap_or(BASELINE_MODEL_FOLDER)
}

/// Newest bundled folder whose model version satisfies the range.
pub fn recommended_model_folder(range: &ModelVersionRange) -> &'static str {
    FOLDERS
        .iter()
        .filter(|(version, _)| range.matches(version))
        .max_by(|(a, _), (b, _)| precedence(a, b))
        .map(|(_, folder)| *folder)
        .unwrap_or(BASELINE_MODEL_FOLDER)
}

/// Platform versions listed in the default-version table.
pub fn known_platform_versions() -> impl Iterator<Item = PlatformVersion> {
    DEFAULTS.iter().map(|(platform, _)| PlatformVersion::new(platform.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn platform(s: &str) -> PlatformVersion {
        PlatformVersion::parse(s).unwrap()
    }

    fn model(s: &str) -> ModelVersion {
        ModelVersion::parse(s).unwrap()
    }

    #[test]
    fn test_tables_parse_completely() {
        assert_eq!(RANGES.len(), COMPATIBILITY_RANGES.len());
        assert_eq!(DEFAULTS.len(), DEFAULT_MODEL_VERSIONS.len());
        assert_eq!(FOLDERS.len(), MODEL_FOLDERS.len());
    }

    #[test]
    fn test_default_mapping_is_self_consistent() {
        for platform in known_platform_versions() {
            let model = default_model_version(&platform).unwrap();
            assert!(
                is_compatible(&model, &platform),
                "{model} should be compatible with {platform}"
            );
        }
    }

    #[test]
    fn test_every_default_model_has_a_bundled_folder() {
        for platform in known_platform_versions() {
            let model = default_model_version(&platform).unwrap();
            assert!(FOLDERS.iter().any(|(v, _)| same_version(v, model.as_semver())));
        }
    }

    #[rstest]
    #[case("6.1", ModelVersionRange::Exact(Version::new(4, 0, 0)))]
    #[case("6.1.0", ModelVersionRange::Exact(Version::new(4, 0, 0)))]
    #[case("7.0.0", ModelVersionRange::AtLeast(Version::new(4, 0, 0)))]
    #[case("9.9.9", ModelVersionRange::Exact(Version::new(3, 0, 0)))]
    fn test_range_for(#[case] input: &str, #[case] expected: ModelVersionRange) {
        assert_eq!(range_for(&platform(input)), expected);
    }

    #[rstest]
    #[case("3.2.0-c", "5.0.0", true)]
    #[case("3.2.0-b", "5.0.0", false)]
    #[case("3.2.0", "5.0.0", false)]
    #[case("4.0.0-a", "6.0.0", true)]
    #[case("4.0.0", "6.0.0", false)]
    #[case("5.0.0-pre.1", "7.0.0", true)]
    #[case("3.0.0", "9.0.0", true)]
    fn test_is_compatible(#[case] model_version: &str, #[case] platform_version: &str, #[case] expected: bool) {
        assert_eq!(is_compatible(&model(model_version), &platform(platform_version)), expected);
    }

    #[test]
    fn test_default_model_version_unknown_platform() {
        assert!(default_model_version(&platform("4.0.0")).is_none());
        assert_eq!(default_model_version(&platform("6.0")).unwrap(), model("4.0.0-a"));
    }

    #[rstest]
    #[case("4.0.0-a", "ed-fi-model-4.0a")]
    #[case("3.2.0-c", "ed-fi-model-3.2c")]
    #[case("3.1", "ed-fi-model-3.1")]
    #[case("2.0.0", BASELINE_MODEL_FOLDER)]
    fn test_model_folder_for(#[case] version: &str, #[case] expected: &str) {
        assert_eq!(model_folder_for(&model(version)), expected);
    }

    #[test]
    fn test_recommended_model_folder() {
        assert_eq!(
            recommended_model_folder(&range_for(&platform("7.0.0"))),
            "ed-fi-model-5.0-pre.1"
        );
        assert_eq!(
            recommended_model_folder(&range_for(&platform("5.1.0"))),
            "ed-fi-model-3.2c"
        );
        assert_eq!(recommended_model_folder(&range_for(&platform("3.2.0"))), "ed-fi-model-3.1");
    }

    proptest! {
        #[test]
        fn prop_later_patch_stays_compatible(index in 0..COMPATIBILITY_RANGES.len(), bump in 1u64..50) {
            let (platform_str, _) = COMPATIBILITY_RANGES[index];
            let platform = platform(platform_str);
            let range = range_for(&platform);
            prop_assume!(range.base().pre.is_empty() || matches!(range, ModelVersionRange::AtLeast(_)));

            let base = range.base().clone();
            prop_assume!(range.matches(&base));
            let later = Version::new(base.major, base.minor, base.patch + bump);
            prop_assert!(is_compatible(&ModelVersion::new(later), &platform));
        }

        #[test]
        fn prop_normalization_is_stable(major in 0u64..20, minor in 0u64..20) {
            let short = PlatformVersion::parse(&format!("{major}.{minor}")).unwrap();
            let long = PlatformVersion::parse(&format!("{major}.{minor}.0")).unwrap();
            prop_assert_eq!(range_for(&short), range_for(&long));
            prop_assert_eq!(default_model_version(&short), default_model_version(&long));
        }
    }
}
