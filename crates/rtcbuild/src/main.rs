use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;

use rtcbuild_core::{
    BuildConfig, BuildError, BuildProfile, Platform, RunOutcome, Workspace, builders, setup,
};

mod config;

/// CLI orchestrator for fetching and cross-compiling WebRTC for mobile.
#[derive(Parser, Debug)]
#[command(
    name = "rtcbuild",
    version,
    about = "Fetch and cross-compile WebRTC for iOS and Android",
    long_about = None
)]
struct Cli {
    /// Target directory (must already exist)
    dir: PathBuf,
    /// Prepare the target directory for building
    #[arg(long)]
    setup: bool,
    /// Build WebRTC in the target directory
    #[arg(long)]
    build: bool,
    /// Use iOS as the target platform
    #[arg(long)]
    ios: bool,
    /// Use Android as the target platform
    #[arg(long)]
    android: bool,
    /// Make a Debug build (defaults to false)
    #[arg(long)]
    debug: bool,
    /// Enable bitcode (defaults to false; iOS only)
    #[arg(long)]
    bitcode: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Setup,
    Build,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {:#}", err);
        std::process::exit(exit_code_for(&err));
    }
}

fn run(cli: Cli) -> Result<()> {
    if !cli.dir.is_dir() {
        bail!("the specified directory does not exist: {}", cli.dir.display());
    }
    let (mode, platform) = validate_selection(&cli).map_err(|msg| anyhow!(msg))?;

    let dir = cli
        .dir
        .canonicalize()
        .with_context(|| format!("resolving target directory {}", cli.dir.display()))?;
    let workspace = Workspace::new(&dir);

    let outcome = match mode {
        Mode::Setup => setup::run(&workspace, platform)?,
        Mode::Build => {
            let file_config = config::load(&dir)?;
            let build_config = resolve_build_config(&cli, platform, &file_config);
            builders::build(&workspace, &build_config)?
        }
    };

    let verb = match mode {
        Mode::Setup => "setup",
        Mode::Build => "build",
    };
    match outcome {
        RunOutcome::Completed => println!(
            "WebRTC {} for {} completed in {}",
            verb,
            platform.as_str(),
            workspace.root().display()
        ),
        RunOutcome::Interrupted => println!(
            "WebRTC {} for {} aborted by user",
            verb,
            platform.as_str()
        ),
    }
    Ok(())
}

/// Enforces the mutually-exclusive, one-required flag pairs before anything
/// else runs.
fn validate_selection(cli: &Cli) -> Result<(Mode, Platform), String> {
    let mode = match (cli.setup, cli.build) {
        (false, false) => return Err("--setup or --build must be specified".to_string()),
        (true, true) => {
            return Err("--setup and --build cannot be specified at the same time".to_string());
        }
        (true, false) => Mode::Setup,
        (false, true) => Mode::Build,
    };
    let platform = match (cli.ios, cli.android) {
        (false, false) => return Err("--ios or --android must be specified".to_string()),
        (true, true) => {
            return Err("--ios and --android cannot be specified at the same time".to_string());
        }
        (true, false) => Platform::Ios,
        (false, true) => Platform::Android,
    };
    Ok((mode, platform))
}

/// Merges CLI flags with the optional `rtcbuild.toml` overrides.
fn resolve_build_config(
    cli: &Cli,
    platform: Platform,
    file_config: &config::RtcbuildConfig,
) -> BuildConfig {
    let profile = if cli.debug {
        BuildProfile::Debug
    } else {
        BuildProfile::Release
    };
    let mut build_config = BuildConfig::new(platform, profile);
    build_config.bitcode = cli.bitcode;
    match platform {
        Platform::Ios => {
            if let Some(target) = &file_config.ios.deployment_target {
                build_config.ios_deployment_target = target.clone();
            }
            build_config.extra_gn_args = file_config.ios.extra_gn_args.clone();
        }
        Platform::Android => {
            build_config.extra_gn_args = file_config.android.extra_gn_args.clone();
        }
    }
    build_config
}

/// Argument and precondition failures exit 1; a failing external tool's own
/// exit code is propagated.
fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<BuildError>() {
        Some(BuildError::Tool { code: Some(code), .. }) => *code,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(setup: bool, build: bool, ios: bool, android: bool) -> Cli {
        Cli {
            dir: PathBuf::from("."),
            setup,
            build,
            ios,
            android,
            debug: false,
            bitcode: false,
        }
    }

    #[test]
    fn exactly_one_mode_is_required() {
        let err = validate_selection(&cli(false, false, true, false)).unwrap_err();
        assert!(err.contains("--setup or --build"));

        let err = validate_selection(&cli(true, true, true, false)).unwrap_err();
        assert!(err.contains("cannot be specified at the same time"));
    }

    #[test]
    fn exactly_one_platform_is_required() {
        let err = validate_selection(&cli(true, false, false, false)).unwrap_err();
        assert!(err.contains("--ios or --android"));

        let err = validate_selection(&cli(false, true, true, true)).unwrap_err();
        assert!(err.contains("--ios and --android"));
    }

    #[test]
    fn valid_selections_resolve() {
        let (mode, platform) = validate_selection(&cli(true, false, true, false)).unwrap();
        assert_eq!(mode, Mode::Setup);
        assert_eq!(platform, Platform::Ios);

        let (mode, platform) = validate_selection(&cli(false, true, false, true)).unwrap();
        assert_eq!(mode, Mode::Build);
        assert_eq!(platform, Platform::Android);
    }

    #[test]
    fn cli_parses_flag_surface() {
        let cli = Cli::parse_from(["rtcbuild", "/work", "--build", "--ios", "--debug", "--bitcode"]);
        assert_eq!(cli.dir, PathBuf::from("/work"));
        assert!(cli.build && cli.ios && cli.debug && cli.bitcode);
        assert!(!cli.setup && !cli.android);
    }

    #[test]
    fn build_config_merges_file_overrides() {
        let mut file_config = config::RtcbuildConfig::default();
        file_config.ios.deployment_target = Some("13.0".to_string());
        file_config.ios.extra_gn_args = vec!["rtc_include_tests=false".to_string()];
        file_config.android.extra_gn_args = vec!["symbol_level=1".to_string()];

        let mut flags = cli(false, true, true, false);
        flags.debug = true;
        flags.bitcode = true;

        let ios = resolve_build_config(&flags, Platform::Ios, &file_config);
        assert_eq!(ios.profile, BuildProfile::Debug);
        assert!(ios.bitcode);
        assert_eq!(ios.ios_deployment_target, "13.0");
        assert_eq!(ios.extra_gn_args, ["rtc_include_tests=false"]);

        let android = resolve_build_config(&flags, Platform::Android, &file_config);
        assert_eq!(android.extra_gn_args, ["symbol_level=1"]);
    }

    #[test]
    fn tool_exit_codes_are_propagated() {
        let err = anyhow::Error::new(BuildError::Tool {
            command: "ninja -C out/Release-arm64".to_string(),
            code: Some(5),
        });
        assert_eq!(exit_code_for(&err), 5);

        let err = anyhow::Error::new(BuildError::Config("bad".to_string()));
        assert_eq!(exit_code_for(&err), 1);

        let err = anyhow!("plain validation error");
        assert_eq!(exit_code_for(&err), 1);
    }

    #[test]
    fn missing_dir_fails_before_validation() {
        let flags = Cli {
            dir: PathBuf::from("/definitely/not/a/real/dir"),
            setup: true,
            build: false,
            ios: true,
            android: false,
            debug: false,
            bitcode: false,
        };
        let err = run(flags).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
