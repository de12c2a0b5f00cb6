//! Optional `rtcbuild.toml` configuration file.
//!
//! Looked up in the target directory. Everything in it is optional; CLI flags
//! are never overridden by the file. Example:
//!
//! ```toml
//! [ios]
//! deployment_target = "13.0"
//! extra_gn_args = ["rtc_include_tests=false"]
//!
//! [android]
//! extra_gn_args = ["symbol_level=1"]
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// The configuration file name, resolved relative to the target directory.
pub const CONFIG_FILE_NAME: &str = "rtcbuild.toml";

/// Root configuration structure for `rtcbuild.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RtcbuildConfig {
    pub ios: IosConfig,
    pub android: AndroidConfig,
}

/// iOS build overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IosConfig {
    /// Overrides the default `ios_deployment_target` GN argument.
    pub deployment_target: Option<String>,
    /// GN arguments appended after the fixed template.
    pub extra_gn_args: Vec<String>,
}

/// Android build overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AndroidConfig {
    /// GN arguments appended after the fixed template.
    pub extra_gn_args: Vec<String>,
}

/// Loads `rtcbuild.toml` from `dir`, falling back to defaults when absent.
pub fn load(dir: &Path) -> Result<RtcbuildConfig> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(RtcbuildConfig::default());
    }
    let contents =
        fs::read_to_string(&path).with_context(|| format!("reading config {:?}", path))?;
    toml::from_str(&contents).with_context(|| format!("parsing config {:?}", path))
}
