//! Android packaging.
//!
//! Produces two artifacts in the build directory: `libwebrtc.jar` (the Java
//! interface archive, architecture independent, taken from the first CPU's
//! output) and `libjingle_peerconnection.so.jar`, a JNI archive whose
//! internal `lib/<abi>/` layout follows the fixed CPU-to-ABI mapping.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use crate::fsops;
use crate::platform::{android_abi, gn_out_dir};
use crate::process::{RunOutcome, ToolInvocation};
use crate::types::{BuildConfig, BuildError};

const JAVA_JAR_SRC: &str = "lib.java/sdk/android/libwebrtc.jar";
const JAVA_JAR: &str = "libwebrtc.jar";
const JNI_JAR: &str = "libjingle_peerconnection.so.jar";
const NATIVE_LIB: &str = "libjingle_peerconnection_so.so";

/// Packages the Java and JNI archives into `build_dir`.
pub(crate) fn package(
    config: &BuildConfig,
    source_dir: &Path,
    build_dir: &Path,
    search_path: &OsStr,
) -> Result<RunOutcome, BuildError> {
    let first_cpu = config.platform.cpus()[0];

    // The Java archive is identical across CPUs; any one output suffices.
    println!("Packaging {}...", JAVA_JAR);
    let jar_src = source_dir.join(gn_out_dir(config, first_cpu)).join(JAVA_JAR_SRC);
    fs::copy(&jar_src, build_dir.join(JAVA_JAR))?;

    println!("Packaging {}...", JNI_JAR);
    let lib_root = stage_jni_libs(config, source_dir, build_dir)?;

    let archive = ToolInvocation::new("jar")
        .args(["cvfM", JNI_JAR, "lib"])
        .cwd(build_dir)
        .search_path(search_path.to_os_string());
    if archive.run()?.is_interrupted() {
        return Ok(RunOutcome::Interrupted);
    }

    // The staged tree is redundant once archived.
    fsops::remove_tree(&lib_root)?;
    Ok(RunOutcome::Completed)
}

/// Stages `lib/<abi>/libjingle_peerconnection_so.so` for every configured
/// CPU, returning the staged tree root.
fn stage_jni_libs(
    config: &BuildConfig,
    source_dir: &Path,
    build_dir: &Path,
) -> Result<PathBuf, BuildError> {
    let lib_root = build_dir.join("lib");
    for cpu in config.platform.cpus() {
        let abi = android_abi(cpu)
            .ok_or_else(|| BuildError::Config(format!("no ABI mapping for cpu {}", cpu)))?;
        let abi_dir = lib_root.join(abi);
        fsops::ensure_dir(&abi_dir)?;

        let lib_src = source_dir.join(gn_out_dir(config, cpu)).join(NATIVE_LIB);
        fs::copy(&lib_src, abi_dir.join(NATIVE_LIB))?;
    }
    Ok(lib_root)
}
