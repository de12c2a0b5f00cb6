//! Environment preparer.
//!
//! Guarantees that after a successful run the depot_tools checkout and the
//! platform source tree exist under the workspace and are dependency-synced.
//! Setup is idempotent: an existing checkout is never re-fetched, but
//! `gclient sync` always runs as a refresh.

use crate::fsops;
use crate::platform::DEPOT_TOOLS_GIT_URL;
use crate::process::{RunOutcome, ToolInvocation, search_path_with};
use crate::types::{BuildError, Platform, Workspace};

/// What a setup run will actually do, derived from filesystem state.
///
/// Dependency sync (and, on Android, the dependency-install script) always
/// runs and is therefore not part of the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupPlan {
    /// Clone depot_tools because its directory is absent.
    pub clone_depot_tools: bool,
    /// Fetch the platform source bundle because its checkout is absent.
    pub fetch_source: bool,
}

impl SetupPlan {
    pub fn for_workspace(workspace: &Workspace, platform: Platform) -> Self {
        Self {
            clone_depot_tools: !workspace.depot_tools_dir().is_dir(),
            fetch_source: !workspace.platform_dir(platform).is_dir(),
        }
    }
}

/// Prepares the workspace for building the given platform.
pub fn run(workspace: &Workspace, platform: Platform) -> Result<RunOutcome, BuildError> {
    fsops::ensure_dir(workspace.root())?;
    let plan = SetupPlan::for_workspace(workspace, platform);

    if plan.clone_depot_tools {
        println!("Fetching Chromium depot_tools...");
        let clone = ToolInvocation::new("git")
            .args(["clone", DEPOT_TOOLS_GIT_URL])
            .cwd(workspace.root());
        if clone.run()?.is_interrupted() {
            return Ok(RunOutcome::Interrupted);
        }
    }

    // Fetched tools must win over nothing: PATH is augmented, never replaced.
    let search_path = search_path_with(&[workspace.depot_tools_dir()])?;

    let platform_dir = workspace.platform_dir(platform);
    if plan.fetch_source {
        fsops::ensure_dir(&platform_dir)?;
        println!("Fetching WebRTC for {}...", platform.as_str());
        let fetch = ToolInvocation::new("fetch")
            .args(["--nohooks", platform.fetch_target()])
            .cwd(&platform_dir)
            .search_path(search_path.clone());
        if fetch.run()?.is_interrupted() {
            return Ok(RunOutcome::Interrupted);
        }
    }

    let sync = ToolInvocation::new("gclient")
        .arg("sync")
        .cwd(&platform_dir)
        .search_path(search_path.clone());
    if sync.run()?.is_interrupted() {
        return Ok(RunOutcome::Interrupted);
    }

    if platform == Platform::Android {
        let source_dir = workspace.source_dir(platform);
        let install = ToolInvocation::new("./build/install-build-deps.sh")
            .cwd(&source_dir)
            .search_path(search_path);
        if install.run()?.is_interrupted() {
            return Ok(RunOutcome::Interrupted);
        }
    }

    Ok(RunOutcome::Completed)
}
