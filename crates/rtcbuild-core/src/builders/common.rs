//! Build summary written alongside the packaged artifacts.

use std::fs;
use std::path::{Path, PathBuf};

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::types::{BuildConfig, BuildError};

/// Metadata describing one completed build, serialized to
/// `build-summary.json` in the build directory for artifact traceability.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BuildSummary {
    /// Target platform ("ios" or "android").
    pub platform: String,
    /// Build profile ("debug" or "release").
    pub profile: String,
    /// Architectures merged into the packaged artifacts.
    pub cpus: Vec<String>,
    /// Whether bitcode was enabled (always false for Android).
    pub bitcode: bool,
    /// Packaging timestamp, RFC3339.
    pub generated_at: String,
    /// Version of the tool that produced the artifacts.
    pub rtcbuild_version: String,
}

impl BuildSummary {
    pub fn new(config: &BuildConfig) -> Result<Self, BuildError> {
        let generated_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(|e| BuildError::Config(format!("formatting timestamp: {}", e)))?;
        Ok(Self {
            platform: config.platform.as_str().to_string(),
            profile: config.profile.as_str().to_string(),
            cpus: config.platform.cpus().iter().map(|c| c.to_string()).collect(),
            bitcode: config.bitcode,
            generated_at,
            rtcbuild_version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }
}

/// Writes `build-summary.json` into the build directory.
pub fn write_summary(build_dir: &Path, config: &BuildConfig) -> Result<PathBuf, BuildError> {
    let summary = BuildSummary::new(config)?;
    let path = build_dir.join("build-summary.json");
    let contents = serde_json::to_string_pretty(&summary)?;
    fs::write(&path, contents)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BuildProfile, Platform};

    #[test]
    fn summary_records_the_configuration() {
        let mut config = BuildConfig::new(Platform::Ios, BuildProfile::Debug);
        config.bitcode = true;
        let summary = BuildSummary::new(&config).unwrap();
        assert_eq!(summary.platform, "ios");
        assert_eq!(summary.profile, "debug");
        assert_eq!(summary.cpus, ["arm64", "x64"]);
        assert!(summary.bitcode);
        assert!(!summary.rtcbuild_version.is_empty());
        // RFC3339 shape, roughly.
        assert!(summary.generated_at.contains('T'));
    }

    #[test]
    fn summary_round_trips_through_json() {
        let config = BuildConfig::new(Platform::Android, BuildProfile::Release);
        let summary = BuildSummary::new(&config).unwrap();
        let json = serde_json::to_string(&summary).unwrap();
        let parsed: BuildSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.platform, "android");
        assert_eq!(parsed.cpus.len(), 4);
    }

    #[test]
    fn write_summary_lands_in_the_build_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let config = BuildConfig::new(Platform::Android, BuildProfile::Release);
        let path = write_summary(tmp.path(), &config).unwrap();
        assert_eq!(path, tmp.path().join("build-summary.json"));
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"platform\": \"android\""));
    }
}
