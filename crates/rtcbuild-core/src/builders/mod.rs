//! Artifact builders for the two target platforms.
//!
//! The build pipeline is the same for both platforms up to packaging:
//!
//! 1. Re-sync dependencies (`gclient sync`)
//! 2. Drop the stale `out/` tree under the source checkout
//! 3. `gn gen` one configuration directory per architecture
//! 4. `ninja` each configuration against the platform's targets
//! 5. Reset the final build directory and package platform artifacts
//!
//! Steps 3 and 4 are captured up front as a [`BuildPlan`] of structured tool
//! invocations, so the generated configuration set can be inspected and
//! tested without spawning anything.

pub mod android;
pub mod common;
pub mod ios;

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::fsops;
use crate::platform::{gn_args, gn_out_dir, ninja_targets};
use crate::process::{RunOutcome, ToolInvocation, search_path_with};
use crate::types::{BuildConfig, BuildError, Platform, Workspace};

pub use common::BuildSummary;

/// The per-architecture `gn gen` and `ninja` invocations for one build.
#[derive(Debug)]
pub struct BuildPlan {
    invocations: Vec<ToolInvocation>,
    out_dirs: Vec<String>,
}

impl BuildPlan {
    /// Computes the full invocation sequence for `config` against the given
    /// source tree. All gn invocations come before all ninja invocations,
    /// mirroring the two sequential loops of the pipeline.
    pub fn new(config: &BuildConfig, source_dir: &Path, search_path: &OsStr) -> Self {
        let cpus = config.platform.cpus();
        let mut invocations = Vec::with_capacity(cpus.len() * 2);
        let mut out_dirs = Vec::with_capacity(cpus.len());

        for cpu in cpus {
            let out_dir = gn_out_dir(config, cpu);
            invocations.push(
                ToolInvocation::new("gn")
                    .arg("gen")
                    .arg(&out_dir)
                    .arg(format!("--args={}", gn_args(config, cpu)))
                    .cwd(source_dir)
                    .search_path(search_path.to_os_string()),
            );
            out_dirs.push(out_dir);
        }

        for out_dir in &out_dirs {
            invocations.push(
                ToolInvocation::new("ninja")
                    .arg("-C")
                    .arg(out_dir)
                    .args(ninja_targets(config.platform).iter().copied())
                    .cwd(source_dir)
                    .search_path(search_path.to_os_string()),
            );
        }

        Self {
            invocations,
            out_dirs,
        }
    }

    pub fn invocations(&self) -> &[ToolInvocation] {
        &self.invocations
    }

    /// GN configuration directories, one per architecture, in build order.
    pub fn out_dirs(&self) -> &[String] {
        &self.out_dirs
    }
}

/// Extra PATH entries required by the platform toolchain, on top of
/// depot_tools. Matches what `build/android/envsetup.sh` would add.
fn path_extras(workspace: &Workspace, platform: Platform) -> Vec<PathBuf> {
    let mut extras = vec![workspace.depot_tools_dir()];
    if platform == Platform::Android {
        let source_dir = workspace.source_dir(platform);
        let sdk_root = source_dir.join("third_party/android_tools/sdk");
        extras.push(sdk_root.join("platform-tools"));
        extras.push(sdk_root.join("tools"));
        extras.push(source_dir.join("build/android"));
    }
    extras
}

/// Builds and packages the final artifacts for `config.platform`.
///
/// Fails with [`BuildError::MissingSource`] before any subprocess runs if the
/// platform source tree is absent. On success the build directory contains
/// exactly the packaged artifacts plus a `build-summary.json`.
pub fn build(workspace: &Workspace, config: &BuildConfig) -> Result<RunOutcome, BuildError> {
    let source_dir = workspace.source_dir(config.platform);
    if !source_dir.is_dir() {
        return Err(BuildError::MissingSource(source_dir));
    }

    let search_path = search_path_with(&path_extras(workspace, config.platform))?;

    // A build must never proceed against an out-of-date dependency set.
    let sync = ToolInvocation::new("gclient")
        .arg("sync")
        .cwd(&source_dir)
        .search_path(search_path.clone());
    if sync.run()?.is_interrupted() {
        return Ok(RunOutcome::Interrupted);
    }

    // GN refuses to reconfigure on top of stale output.
    fsops::remove_tree(&source_dir.join("out"))?;

    let plan = BuildPlan::new(config, &source_dir, &search_path);
    for invocation in plan.invocations() {
        if invocation.run()?.is_interrupted() {
            return Ok(RunOutcome::Interrupted);
        }
    }

    let build_dir = workspace.build_dir(config.platform);
    fsops::recreate_dir(&build_dir)?;

    let outcome = match config.platform {
        Platform::Ios => ios::package(config, &source_dir, &build_dir, &search_path)?,
        Platform::Android => android::package(config, &source_dir, &build_dir, &search_path)?,
    };
    if outcome.is_interrupted() {
        return Ok(RunOutcome::Interrupted);
    }

    common::write_summary(&build_dir, config)?;
    Ok(RunOutcome::Completed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BuildProfile;
    use std::ffi::OsString;

    fn plan_for(platform: Platform, profile: BuildProfile) -> BuildPlan {
        let config = BuildConfig::new(platform, profile);
        let path = OsString::from("/usr/bin");
        BuildPlan::new(&config, Path::new("/src"), &path)
    }

    #[test]
    fn ios_plan_covers_exactly_the_arch_list() {
        let plan = plan_for(Platform::Ios, BuildProfile::Release);
        assert_eq!(plan.out_dirs(), &["out/Release-arm64", "out/Release-x64"]);
        // One gn gen plus one ninja per architecture.
        assert_eq!(plan.invocations().len(), 4);
    }

    #[test]
    fn android_plan_covers_exactly_the_cpu_list() {
        let plan = plan_for(Platform::Android, BuildProfile::Debug);
        assert_eq!(
            plan.out_dirs(),
            &[
                "out/Debug-arm",
                "out/Debug-arm64",
                "out/Debug-x86",
                "out/Debug-x64"
            ]
        );
        assert_eq!(plan.invocations().len(), 8);
    }

    #[test]
    fn gn_invocations_precede_ninja() {
        let plan = plan_for(Platform::Android, BuildProfile::Release);
        let programs: Vec<&str> = plan
            .invocations()
            .iter()
            .map(|inv| inv.get_program())
            .collect();
        assert_eq!(
            programs,
            ["gn", "gn", "gn", "gn", "ninja", "ninja", "ninja", "ninja"]
        );
    }

    #[test]
    fn gn_args_are_a_single_structured_argument() {
        let plan = plan_for(Platform::Ios, BuildProfile::Release);
        let gn = &plan.invocations()[0];
        let args = gn.get_args();
        assert_eq!(args[0], "gen");
        assert_eq!(args[1], "out/Release-arm64");
        assert!(args[2].starts_with("--args="));
        assert!(args[2].contains("target_cpu=\"arm64\""));
        assert_eq!(args.len(), 3);
    }

    #[test]
    fn ninja_targets_per_platform() {
        let ios = plan_for(Platform::Ios, BuildProfile::Release);
        let ninja = ios.invocations().last().unwrap();
        assert!(ninja.get_args().contains(&"framework_objc".to_string()));

        let android = plan_for(Platform::Android, BuildProfile::Release);
        let ninja = android.invocations().last().unwrap();
        assert!(ninja.get_args().contains(&"libwebrtc".to_string()));
        assert!(
            ninja
                .get_args()
                .contains(&"libjingle_peerconnection_so".to_string())
        );
    }

    #[test]
    fn missing_source_fails_before_any_subprocess() {
        let tmp = tempfile::tempdir().unwrap();
        let ws = Workspace::new(tmp.path());
        let config = BuildConfig::new(Platform::Ios, BuildProfile::Release);

        let err = build(&ws, &config).unwrap_err();
        match err {
            BuildError::MissingSource(path) => {
                assert_eq!(path, ws.source_dir(Platform::Ios));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        // Nothing was created either: the build directory only appears after
        // the precondition passes.
        assert!(!ws.build_dir(Platform::Ios).exists());
    }

    #[test]
    fn android_path_extras_include_sdk_subdirs() {
        let ws = Workspace::new("/t");
        let extras = path_extras(&ws, Platform::Android);
        assert_eq!(extras.len(), 4);
        assert_eq!(extras[0], ws.depot_tools_dir());
        assert!(
            extras[1].ends_with("third_party/android_tools/sdk/platform-tools")
        );
        assert!(extras[3].ends_with("build/android"));

        let ios_extras = path_extras(&ws, Platform::Ios);
        assert_eq!(ios_extras, vec![ws.depot_tools_dir()]);
    }
}
