//! External process execution and the dependency steps built on it.
//!
//! Every process the installer starts goes through [`CommandExecutor`], so
//! tests can replay canned outputs instead of touching the host.

use crate::error::{InstallerError, Result};
use camino::Utf8Path;
use std::process::{Command, Output};

/// Abstraction for running external commands.
pub trait CommandExecutor {
    /// Runs a command with arguments, blocking until it exits, and returns
    /// the captured output.
    ///
    /// # Errors
    ///
    /// Returns any I/O error encountered while spawning the command,
    /// including the command not being found.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use distkit_installer::deps::{CommandExecutor, SystemCommandExecutor};
    ///
    /// let output = SystemCommandExecutor.run("git", &["--version"])?;
    /// assert!(output.status.success());
    /// # Ok::<(), distkit_installer::error::InstallerError>(())
    /// ```
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output>;
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        log::debug!("running {cmd} {}", args.join(" "));
        Command::new(cmd)
            .args(args)
            .output()
            .map_err(InstallerError::from)
    }
}

/// Installs the application's Python dependencies with
/// `<interpreter> -m pip install -r <requirements>`.
///
/// # Errors
///
/// Returns [`InstallerError::DependencyInstall`] when the command cannot be
/// started or exits unsuccessfully.
pub fn install_dependencies(
    executor: &dyn CommandExecutor,
    interpreter: &str,
    requirements: &Utf8Path,
) -> Result<()> {
    let fail = |message: String| InstallerError::DependencyInstall {
        requirements: requirements.to_path_buf(),
        message,
    };

    let output = executor
        .run(
            interpreter,
            &["-m", "pip", "install", "-r", requirements.as_str()],
        )
        .map_err(|e| fail(e.to_string()))?;

    if output.status.success() {
        Ok(())
    } else {
        Err(fail(failure_message(&output)))
    }
}

/// Runs `tool --version` and returns the first line it printed, or `None`
/// when the tool is missing or fails.
pub fn tool_version(executor: &dyn CommandExecutor, tool: &str) -> Option<String> {
    let output = executor
        .run(tool, &["--version"])
        .inspect_err(|e| log::debug!("{tool} --version failed: {e}"))
        .ok()?;
    if !output.status.success() {
        log::debug!("{tool} --version exited with {}", output.status);
        return None;
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    Some(stdout.lines().next().unwrap_or_default().trim().to_owned())
}

/// Returns whether `interpreter` can import `module`.
///
/// A failure to start the interpreter counts as the module being missing.
pub fn module_available(executor: &dyn CommandExecutor, interpreter: &str, module: &str) -> bool {
    let statement = format!("import {module}");
    match executor.run(interpreter, &["-c", &statement]) {
        Ok(output) if output.status.success() => true,
        Ok(output) => {
            log::debug!("{interpreter} cannot import {module}: {}", failure_message(&output));
            false
        }
        Err(e) => {
            log::debug!("{interpreter} -c {statement:?} failed to start: {e}");
            false
        }
    }
}

/// Returns the trimmed stderr of a failed command, falling back to its exit
/// status when stderr is empty.
pub(crate) fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        format!("exited with {}", output.status)
    } else {
        stderr.to_owned()
    }
}
