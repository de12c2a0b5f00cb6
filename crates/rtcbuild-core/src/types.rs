//! Core types for rtcbuild-core.
//!
//! This module defines the types shared by the environment preparer and the
//! artifact builders:
//!
//! - [`BuildError`] - Error types for setup and build operations
//! - [`Platform`] - Target platform selection (iOS or Android)
//! - [`BuildProfile`] / [`BuildConfig`] - Build configuration options
//! - [`Workspace`] - Filesystem layout under the resolved target directory

use std::path::{Path, PathBuf};

/// Error types for rtcbuild-core operations.
///
/// Two kinds matter at the CLI boundary: precondition errors (reported with a
/// human-readable message and exit status 1) and external-tool failures
/// ([`BuildError::Tool`], whose exit code is propagated verbatim).
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// An I/O error occurred while preparing directories or copying artifacts.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An external tool could not be started at all.
    ///
    /// Usually means the tool is not installed or not on PATH.
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// An external tool ran and exited with a non-zero status.
    ///
    /// The exit code is `None` when the tool was killed by a signal other
    /// than SIGINT (a SIGINT termination is swallowed, not surfaced).
    #[error("`{command}` failed with exit code {code:?}")]
    Tool { command: String, code: Option<i32> },

    /// The platform source tree is absent from the workspace.
    ///
    /// Building requires a prior `--setup` run for the same platform.
    #[error("WebRTC source not found at {0}, did you forget to run --setup?")]
    MissingSource(PathBuf),

    /// A configuration value could not be resolved.
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON serialization failed while writing the build summary.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Target platform for a setup or build run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// iOS (universal `WebRTC.framework` + `WebRTC.dSYM`).
    Ios,
    /// Android (`libwebrtc.jar` + multi-ABI JNI archive).
    Android,
}

impl Platform {
    /// Directory name used for this platform under `webrtc/` and `build/`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::Android => "android",
        }
    }

    /// Bundle name passed to the depot_tools `fetch` command.
    pub fn fetch_target(&self) -> &'static str {
        match self {
            Platform::Ios => "webrtc_ios",
            Platform::Android => "webrtc_android",
        }
    }

    /// Fixed architecture list built for this platform.
    pub fn cpus(&self) -> &'static [&'static str] {
        match self {
            Platform::Ios => crate::platform::IOS_BUILD_ARCHS,
            Platform::Android => crate::platform::ANDROID_BUILD_CPUS,
        }
    }
}

/// Build profile controlling optimization and output-directory naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildProfile {
    /// Debug build (`is_debug=true`, GN output under `out/Debug-<cpu>`).
    Debug,
    /// Release build (`is_debug=false`, GN output under `out/Release-<cpu>`).
    Release,
}

impl BuildProfile {
    /// Capitalized form used in GN output directory names.
    pub fn dir_name(&self) -> &'static str {
        match self {
            BuildProfile::Debug => "Debug",
            BuildProfile::Release => "Release",
        }
    }

    /// Lowercase form used in summaries and log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildProfile::Debug => "debug",
            BuildProfile::Release => "release",
        }
    }

    /// Value interpolated into the GN `is_debug` argument.
    pub fn is_debug(&self) -> bool {
        matches!(self, BuildProfile::Debug)
    }
}

/// Configuration for one artifact build.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Target platform to build for.
    pub platform: Platform,
    /// Build profile (debug or release).
    pub profile: BuildProfile,
    /// Whether to enable bitcode (iOS only; ignored for Android).
    pub bitcode: bool,
    /// iOS deployment target interpolated into the GN arguments.
    pub ios_deployment_target: String,
    /// Extra GN arguments appended after the fixed template.
    pub extra_gn_args: Vec<String>,
}

impl BuildConfig {
    /// Creates a configuration with the default deployment target and no
    /// extra GN arguments.
    pub fn new(platform: Platform, profile: BuildProfile) -> Self {
        Self {
            platform,
            profile,
            bitcode: false,
            ios_deployment_target: crate::platform::IOS_DEPLOYMENT_TARGET.to_string(),
            extra_gn_args: Vec::new(),
        }
    }
}

/// Filesystem layout under the resolved target directory.
///
/// All paths are relative to `<dir>/build_webrtc`:
/// `depot_tools/`, `webrtc/<platform>/src/`, `build/<platform>/`.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Resolves the workspace root as `<dir>/build_webrtc`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            root: dir.as_ref().join("build_webrtc"),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn depot_tools_dir(&self) -> PathBuf {
        self.root.join("depot_tools")
    }

    /// Checkout directory for the platform (`webrtc/<platform>`).
    pub fn platform_dir(&self, platform: Platform) -> PathBuf {
        self.root.join("webrtc").join(platform.as_str())
    }

    /// Source tree for the platform (`webrtc/<platform>/src`).
    pub fn source_dir(&self, platform: Platform) -> PathBuf {
        self.platform_dir(platform).join("src")
    }

    /// Final artifact directory for the platform (`build/<platform>`).
    pub fn build_dir(&self, platform: Platform) -> PathBuf {
        self.root.join("build").join(platform.as_str())
    }
}
