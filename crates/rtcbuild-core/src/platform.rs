//! Fixed per-platform build tables.
//!
//! Architecture lists, the Android CPU-to-ABI mapping, and the GN argument
//! templates live here as immutable constants. Nothing in this module touches
//! the filesystem or spawns a process.

use crate::types::{BuildConfig, Platform};

/// Architectures built for iOS, in merge order.
///
/// The first entry is also the donor of the architecture-independent bundle
/// structure during packaging.
pub const IOS_BUILD_ARCHS: &[&str] = &["arm64", "x64"];

/// CPUs built for Android, in staging order.
pub const ANDROID_BUILD_CPUS: &[&str] = &["arm", "arm64", "x86", "x64"];

/// Mapping from GN `target_cpu` values to Android ABI directory names.
pub const ANDROID_CPU_ABI_MAP: &[(&str, &str)] = &[
    ("arm", "armeabi-v7a"),
    ("arm64", "arm64-v8a"),
    ("x86", "x86"),
    ("x64", "x86_64"),
];

/// Default iOS deployment target interpolated into the GN arguments.
pub const IOS_DEPLOYMENT_TARGET: &str = "11.0";

/// Upstream location of the Chromium depot_tools checkout.
pub const DEPOT_TOOLS_GIT_URL: &str =
    "https://chromium.googlesource.com/chromium/tools/depot_tools.git";

/// Ninja targets built per architecture.
pub fn ninja_targets(platform: Platform) -> &'static [&'static str] {
    match platform {
        Platform::Ios => &["framework_objc"],
        Platform::Android => &["libwebrtc", "libjingle_peerconnection_so"],
    }
}

/// ABI directory name for an Android CPU, per the fixed mapping.
pub fn android_abi(cpu: &str) -> Option<&'static str> {
    ANDROID_CPU_ABI_MAP
        .iter()
        .find(|(c, _)| *c == cpu)
        .map(|(_, abi)| *abi)
}

/// GN configuration directory for one (profile, cpu) pair, relative to the
/// source tree: `out/<Profile>-<cpu>`.
pub fn gn_out_dir(config: &BuildConfig, cpu: &str) -> String {
    format!("out/{}-{}", config.profile.dir_name(), cpu)
}

/// Renders the GN argument string for one architecture.
///
/// The result is passed to `gn gen` as the payload of a single `--args=`
/// argument; it is never handed to a shell.
pub fn gn_args(config: &BuildConfig, cpu: &str) -> String {
    let mut args = vec![
        "is_component_build=false".to_string(),
        "rtc_libvpx_build_vp9=true".to_string(),
        format!("is_debug={}", config.profile.is_debug()),
        format!("target_cpu=\"{}\"", cpu),
    ];

    match config.platform {
        Platform::Ios => {
            args.push("enable_dsyms=true".to_string());
            args.push(format!("enable_ios_bitcode={}", config.bitcode));
            args.push(format!(
                "ios_deployment_target=\"{}\"",
                config.ios_deployment_target
            ));
            args.push("ios_enable_code_signing=false".to_string());
            args.push("target_os=\"ios\"".to_string());
            args.push("use_xcode_clang=true".to_string());
        }
        Platform::Android => {
            args.push("target_os=\"android\"".to_string());
        }
    }

    args.extend(config.extra_gn_args.iter().cloned());
    args.join(" ")
}
