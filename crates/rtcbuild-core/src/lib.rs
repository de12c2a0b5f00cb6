//! Orchestration library for fetching and cross-compiling WebRTC for mobile.
//!
//! `rtcbuild-core` is a thin command-sequencing layer over the WebRTC build
//! toolchain. It implements no fetching, compiling, or linking of its own:
//! everything interesting is delegated to external tools (`git`, `fetch`,
//! `gclient`, `gn`, `ninja`, `lipo`, `jar`) invoked as blocking subprocesses
//! with structured argument lists.
//!
//! # Components
//!
//! - [`setup`] - ensures depot_tools and the platform source tree exist and
//!   are dependency-synced (idempotent)
//! - [`builders`] - per-architecture configure/build loop plus platform
//!   packaging: a universal `WebRTC.framework` and `WebRTC.dSYM` for iOS, a
//!   `libwebrtc.jar` plus multi-ABI JNI archive for Android
//! - [`platform`] - the fixed architecture lists, CPU-to-ABI mapping, and GN
//!   argument templates
//! - [`process`] - subprocess plumbing with PATH augmentation, exit-code
//!   propagation, and interrupt-as-graceful-abort semantics
//!
//! # Example
//!
//! ```no_run
//! use rtcbuild_core::{BuildConfig, BuildProfile, Platform, Workspace, builders, setup};
//!
//! fn main() -> Result<(), rtcbuild_core::BuildError> {
//!     let workspace = Workspace::new("/work");
//!     setup::run(&workspace, Platform::Ios)?;
//!
//!     let config = BuildConfig::new(Platform::Ios, BuildProfile::Release);
//!     builders::build(&workspace, &config)?;
//!     Ok(())
//! }
//! ```

pub mod builders;
pub mod fsops;
pub mod platform;
pub mod process;
pub mod setup;
pub mod types;

pub use builders::{BuildPlan, BuildSummary};
pub use process::{RunOutcome, ToolInvocation};
pub use setup::SetupPlan;
pub use types::{BuildConfig, BuildError, BuildProfile, Platform, Workspace};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
