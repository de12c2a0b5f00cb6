//! Subprocess plumbing.
//!
//! Every external tool runs through [`ToolInvocation`]: a structured program
//! plus argument vector, an optional working directory, and an optional PATH
//! override. Child stdio is inherited so the wrapped toolchain streams its
//! own output to the terminal.
//!
//! While a child runs, this process ignores SIGINT. A terminal Ctrl-C is
//! delivered to the whole foreground process group, so without the mask the
//! parent would die before it could observe the child's termination status.
//! With it, only the child dies and its SIGINT death is reported as
//! [`RunOutcome::Interrupted`].

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::types::BuildError;

/// How a tool invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The tool exited with status zero.
    Completed,
    /// The tool was terminated by a user interrupt (SIGINT).
    ///
    /// Treated as a graceful abort: the invoking procedure stops without
    /// running further steps and the process exits zero.
    Interrupted,
}

impl RunOutcome {
    pub fn is_interrupted(&self) -> bool {
        matches!(self, RunOutcome::Interrupted)
    }
}

/// One structured external-tool invocation.
#[derive(Debug, Clone)]
pub struct ToolInvocation {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    search_path: Option<OsString>,
}

impl ToolInvocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            search_path: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Overrides the PATH seen by the child process.
    pub fn search_path(mut self, path: impl Into<OsString>) -> Self {
        self.search_path = Some(path.into());
        self
    }

    pub fn get_program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    pub fn get_search_path(&self) -> Option<&OsStr> {
        self.search_path.as_deref()
    }

    /// Command line rendered for log lines and error messages.
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }

    /// Runs the tool and blocks until it exits, streaming its output.
    ///
    /// Non-zero exits map to [`BuildError::Tool`] carrying the tool's own
    /// exit code. A SIGINT termination is reported as
    /// [`RunOutcome::Interrupted`] rather than an error; SIGINT is ignored
    /// in this process for the duration of the wait so a Ctrl-C kills only
    /// the child.
    pub fn run(&self) -> Result<RunOutcome, BuildError> {
        println!("Running: {}", self.display());

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }
        if let Some(path) = &self.search_path {
            cmd.env("PATH", path);
        }

        // Spawn before masking: the child must inherit the default SIGINT
        // disposition, not SIG_IGN.
        let mut child = cmd.spawn().map_err(|source| BuildError::Spawn {
            command: self.program.clone(),
            source,
        })?;
        let _guard = InterruptGuard::engage();
        let status = child.wait()?;

        if status.success() {
            return Ok(RunOutcome::Completed);
        }
        if killed_by_interrupt(&status) {
            println!("Interrupted, aborting.");
            return Ok(RunOutcome::Interrupted);
        }
        Err(BuildError::Tool {
            command: self.display(),
            code: status.code(),
        })
    }
}

/// Ignores SIGINT in this process while it is alive, restoring the previous
/// disposition on drop.
struct InterruptGuard {
    #[cfg(unix)]
    previous: Option<libc::sighandler_t>,
}

impl InterruptGuard {
    #[cfg(unix)]
    fn engage() -> Self {
        let previous = unsafe { libc::signal(libc::SIGINT, libc::SIG_IGN) };
        Self {
            previous: (previous != libc::SIG_ERR).then_some(previous),
        }
    }

    #[cfg(not(unix))]
    fn engage() -> Self {
        Self {}
    }
}

#[cfg(unix)]
impl Drop for InterruptGuard {
    fn drop(&mut self) {
        if let Some(previous) = self.previous {
            unsafe { libc::signal(libc::SIGINT, previous) };
        }
    }
}

#[cfg(unix)]
fn killed_by_interrupt(status: &std::process::ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt;
    status.signal() == Some(libc::SIGINT)
}

#[cfg(not(unix))]
fn killed_by_interrupt(_status: &std::process::ExitStatus) -> bool {
    false
}

/// Appends `extra` directories to `base`, preserving everything already there.
pub fn joined_search_path(
    base: Option<&OsStr>,
    extra: &[PathBuf],
) -> Result<OsString, BuildError> {
    let mut parts: Vec<PathBuf> = match base {
        Some(base) => std::env::split_paths(base).collect(),
        None => Vec::new(),
    };
    parts.extend(extra.iter().cloned());
    std::env::join_paths(parts)
        .map_err(|e| BuildError::Config(format!("building search path: {}", e)))
}

/// The process PATH augmented (never replaced) with `extra` directories.
pub fn search_path_with(extra: &[PathBuf]) -> Result<OsString, BuildError> {
    let base = std::env::var_os("PATH");
    joined_search_path(base.as_deref(), extra)
}
