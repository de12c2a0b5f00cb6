//! iOS packaging.
//!
//! Assembles a universal `WebRTC.framework` and `WebRTC.dSYM` from the
//! per-architecture ninja output. Both bundles are staged from the first
//! architecture's output (everything but the binary is architecture
//! independent), then the per-architecture binaries are merged with `lipo`
//! into a single multi-architecture binary at the same path.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use crate::fsops;
use crate::platform::gn_out_dir;
use crate::process::{RunOutcome, ToolInvocation};
use crate::types::{BuildConfig, BuildError};

const FRAMEWORK_BUNDLE: &str = "WebRTC.framework";
const DSYM_BUNDLE: &str = "WebRTC.dSYM";
const FRAMEWORK_BINARY: &str = "WebRTC";
const DSYM_BINARY: &str = "Contents/Resources/DWARF/WebRTC";

/// Packages the framework and dSYM bundles into `build_dir`.
pub(crate) fn package(
    config: &BuildConfig,
    source_dir: &Path,
    build_dir: &Path,
    search_path: &OsStr,
) -> Result<RunOutcome, BuildError> {
    println!("Packaging {}...", FRAMEWORK_BUNDLE);
    let outcome = package_bundle(
        config,
        source_dir,
        build_dir,
        FRAMEWORK_BUNDLE,
        FRAMEWORK_BINARY,
        search_path,
    )?;
    if outcome.is_interrupted() {
        return Ok(outcome);
    }

    println!("Packaging {}...", DSYM_BUNDLE);
    package_bundle(
        config,
        source_dir,
        build_dir,
        DSYM_BUNDLE,
        DSYM_BINARY,
        search_path,
    )
}

/// Copy-delete-merge for one bundle: stage the first architecture's bundle,
/// drop its single-architecture binary, then lipo all slices into place.
fn package_bundle(
    config: &BuildConfig,
    source_dir: &Path,
    build_dir: &Path,
    bundle: &str,
    binary_rel: &str,
    search_path: &OsStr,
) -> Result<RunOutcome, BuildError> {
    let first_arch = config.platform.cpus()[0];
    let donor = source_dir.join(gn_out_dir(config, first_arch)).join(bundle);
    let staged = build_dir.join(bundle);
    stage_bundle(&donor, &staged, Path::new(binary_rel))?;

    let slices = binary_slices(config, source_dir, bundle, binary_rel);
    let merged = staged.join(binary_rel);
    lipo_merge(&slices, &merged, search_path).run()
}

/// Copies a bundle tree and removes the single-architecture binary inside it,
/// leaving a slot for the merged binary.
fn stage_bundle(src: &Path, dest: &Path, binary_rel: &Path) -> Result<(), BuildError> {
    fsops::copy_tree(src, dest)?;
    fs::remove_file(dest.join(binary_rel))?;
    Ok(())
}

/// Per-architecture binary paths feeding the merge, in arch-list order.
fn binary_slices(
    config: &BuildConfig,
    source_dir: &Path,
    bundle: &str,
    binary_rel: &str,
) -> Vec<PathBuf> {
    config
        .platform
        .cpus()
        .iter()
        .map(|arch| {
            source_dir
                .join(gn_out_dir(config, arch))
                .join(bundle)
                .join(binary_rel)
        })
        .collect()
}

fn lipo_merge(slices: &[PathBuf], output: &Path, search_path: &OsStr) -> ToolInvocation {
    ToolInvocation::new("lipo")
        .args(slices.iter().map(|p| p.display().to_string()))
        .arg("-create")
        .arg("-output")
        .arg(output.display().to_string())
        .search_path(search_path.to_os_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BuildProfile, Platform};

    #[test]
    fn slices_cover_exactly_the_configured_archs() {
        let config = BuildConfig::new(Platform::Ios, BuildProfile::Release);
        let slices = binary_slices(&config, Path::new("/src"), FRAMEWORK_BUNDLE, FRAMEWORK_BINARY);
        assert_eq!(
            slices,
            vec![
                PathBuf::from("/src/out/Release-arm64/WebRTC.framework/WebRTC"),
                PathBuf::from("/src/out/Release-x64/WebRTC.framework/WebRTC"),
            ]
        );
    }

    #[test]
    fn dsym_slices_use_the_nested_dwarf_path() {
        let config = BuildConfig::new(Platform::Ios, BuildProfile::Debug);
        let slices = binary_slices(&config, Path::new("/src"), DSYM_BUNDLE, DSYM_BINARY);
        assert_eq!(
            slices[0],
            PathBuf::from("/src/out/Debug-arm64/WebRTC.dSYM/Contents/Resources/DWARF/WebRTC")
        );
    }

    #[test]
    fn staging_removes_the_single_arch_binary() {
        let tmp = tempfile::tempdir().unwrap();
        let donor = tmp.path().join("WebRTC.framework");
        fs::create_dir_all(donor.join("Headers")).unwrap();
        fs::write(donor.join("WebRTC"), b"arm64-only").unwrap();
        fs::write(donor.join("Info.plist"), b"plist").unwrap();
        fs::write(donor.join("Headers/RTCPeerConnection.h"), b"h").unwrap();

        let staged = tmp.path().join("out").join("WebRTC.framework");
        stage_bundle(&donor, &staged, Path::new("WebRTC")).unwrap();

        // Bundle contents survive; the slice binary does not.
        assert!(!staged.join("WebRTC").exists());
        assert!(staged.join("Info.plist").exists());
        assert!(staged.join("Headers/RTCPeerConnection.h").exists());
    }

    #[test]
    fn lipo_invocation_shape() {
        let slices = vec![PathBuf::from("/a/WebRTC"), PathBuf::from("/b/WebRTC")];
        let path = std::ffi::OsString::from("/opt/depot_tools");
        let inv = lipo_merge(&slices, Path::new("/out/WebRTC"), &path);
        assert_eq!(inv.get_program(), "lipo");
        assert_eq!(
            inv.get_args(),
            ["/a/WebRTC", "/b/WebRTC", "-create", "-output", "/out/WebRTC"]
        );
        assert_eq!(inv.get_search_path(), Some(path.as_os_str()));
    }
}
