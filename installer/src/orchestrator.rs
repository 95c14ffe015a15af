//! Sequential install pipeline.
//!
//! The pipeline is a small state machine:
//!
//! ```text
//! CheckInterpreter -> InstallDependencies -> CheckVcsTool -> CheckGuiToolkit
//!     -> BuildBundle | InstallApplication -> CreateShortcut -> Done
//! ```
//!
//! Any failing check moves the pipeline to [`PipelineState::FatalAbort`] and
//! nothing after it runs. The install mode decides which states are visited.
//! Every visited state records one [`PreflightCheckResult`], except the
//! Linux-only toolkit and shortcut steps, which are skipped silently
//! elsewhere (the shortcut step also when no desktop directory exists).

use crate::deps::{
    CommandExecutor, failure_message, install_dependencies, module_available, tool_version,
};
use crate::error::{InstallerError, Result};
use crate::interpreter::{self, Interpreter};
use crate::output::format_check;
use crate::prebuilt::{
    BuiltArtifact, DIST_DIR, default_install_dir, executable_name, install_artifact,
    installable_name, locate_artifact,
};
use crate::shortcut::{create_desktop_entry, render_desktop_entry};
use camino::{Utf8Path, Utf8PathBuf};
use distkit_common::output::write_line;
use distkit_common::{HostEnvironment, OsFamily, ProjectConfig};
use std::fmt;
use std::io::Write;

/// What the installer was asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMode {
    /// Install dependencies, then build the native bundle.
    BuildFromSource,
    /// Install dependencies, then copy the already built application from
    /// `dist/` into its install location.
    InstallPrebuilt,
    /// Install dependencies only.
    DependenciesOnly,
}

impl InstallMode {
    /// Every mode in menu order.
    pub const ALL: [Self; 3] = [
        Self::BuildFromSource,
        Self::InstallPrebuilt,
        Self::DependenciesOnly,
    ];

    /// Menu number selecting this mode.
    #[must_use]
    pub const fn choice(self) -> u8 {
        match self {
            Self::BuildFromSource => 1,
            Self::InstallPrebuilt => 2,
            Self::DependenciesOnly => 3,
        }
    }

    /// Mode selected by menu number `choice`.
    #[must_use]
    pub fn from_choice(choice: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.choice() == choice)
    }

    /// Human readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BuildFromSource => "Build from source",
            Self::InstallPrebuilt => "Install prebuilt application",
            Self::DependenciesOnly => "Install dependencies only",
        }
    }
}

impl fmt::Display for InstallMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a failed dependency install, bundle build or application install is
/// treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyPolicy {
    /// The failure aborts the pipeline. Used by the interactive flow.
    Fatal,
    /// The failure is recorded as a warning and the pipeline continues.
    /// Used by the scripted flow and the generated install script.
    BestEffort,
}

/// Pipeline states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Locate a supported Python interpreter.
    CheckInterpreter,
    /// Install Python dependencies.
    InstallDependencies,
    /// Check the version-control tool.
    CheckVcsTool,
    /// Check that the interpreter can load the GUI toolkit (Linux only).
    CheckGuiToolkit,
    /// Run the native bundler and check its output.
    BuildBundle,
    /// Copy the built application into its install location.
    InstallApplication,
    /// Create the desktop entry.
    CreateShortcut,
    /// Every step finished; warnings may have been recorded.
    Done,
    /// A fatal check failed; later steps did not run.
    FatalAbort,
}

impl PipelineState {
    /// Returns whether the pipeline has stopped.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::FatalAbort)
    }

    /// State following a successful step in `mode`.
    #[must_use]
    pub const fn next(self, mode: InstallMode) -> Self {
        match (self, mode) {
            (Self::CheckInterpreter, _) => Self::InstallDependencies,
            (Self::InstallDependencies, InstallMode::DependenciesOnly) => Self::Done,
            (Self::InstallDependencies, _) => Self::CheckVcsTool,
            (Self::CheckVcsTool, _) => Self::CheckGuiToolkit,
            (Self::CheckGuiToolkit, InstallMode::BuildFromSource) => Self::BuildBundle,
            (Self::CheckGuiToolkit, _) => Self::InstallApplication,
            (Self::BuildBundle | Self::InstallApplication, _) => Self::CreateShortcut,
            (Self::CreateShortcut | Self::Done, _) => Self::Done,
            (Self::FatalAbort, _) => Self::FatalAbort,
        }
    }

    /// Short name used in check records.
    #[must_use]
    pub const fn check_name(self) -> &'static str {
        match self {
            Self::CheckInterpreter => "interpreter",
            Self::InstallDependencies => "dependencies",
            Self::CheckVcsTool => "vcs",
            Self::CheckGuiToolkit => "gui",
            Self::BuildBundle => "build",
            Self::InstallApplication => "install",
            Self::CreateShortcut => "shortcut",
            Self::Done => "done",
            Self::FatalAbort => "abort",
        }
    }
}

/// Result of one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The step succeeded.
    Pass,
    /// The step had a recoverable problem; the pipeline continued.
    Warn,
    /// The step failed fatally.
    Fail,
}

/// A recorded check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreflightCheckResult {
    /// Step that produced the record.
    pub check: PipelineState,
    /// Outcome of the step.
    pub outcome: CheckOutcome,
    /// Message shown to the user.
    pub message: String,
}

impl PreflightCheckResult {
    fn new(check: PipelineState, outcome: CheckOutcome, message: impl Into<String>) -> Self {
        Self {
            check,
            outcome,
            message: message.into(),
        }
    }
}

/// Everything a pipeline run produced.
#[derive(Debug)]
pub struct InstallReport {
    /// Mode the pipeline ran in.
    pub mode: InstallMode,
    /// Terminal state: [`PipelineState::Done`] or [`PipelineState::FatalAbort`].
    pub state: PipelineState,
    /// Checks in the order they ran.
    pub checks: Vec<PreflightCheckResult>,
    /// Interpreter found by the first step.
    pub interpreter: Option<Interpreter>,
    /// Error that aborted the pipeline.
    pub failure: Option<InstallerError>,
}

impl InstallReport {
    fn new(mode: InstallMode) -> Self {
        Self {
            mode,
            state: PipelineState::CheckInterpreter,
            checks: Vec::new(),
            interpreter: None,
            failure: None,
        }
    }

    /// Checks that ended in a warning.
    pub fn warnings(&self) -> impl Iterator<Item = &PreflightCheckResult> {
        self.checks
            .iter()
            .filter(|check| check.outcome == CheckOutcome::Warn)
    }

    /// Returns whether the pipeline reached [`PipelineState::Done`].
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.state == PipelineState::Done
    }
}

/// Runs the install pipeline against injected process and environment
/// seams.
pub struct InstallOrchestrator<'a> {
    executor: &'a dyn CommandExecutor,
    env: &'a dyn HostEnvironment,
    config: &'a ProjectConfig,
    policy: DependencyPolicy,
}

impl<'a> InstallOrchestrator<'a> {
    /// Creates an orchestrator.
    #[must_use]
    pub fn new(
        executor: &'a dyn CommandExecutor,
        env: &'a dyn HostEnvironment,
        config: &'a ProjectConfig,
        policy: DependencyPolicy,
    ) -> Self {
        Self {
            executor,
            env,
            config,
            policy,
        }
    }

    /// Runs every step of `mode` in order, printing one line per recorded
    /// check to `out`.
    pub fn run(&self, mode: InstallMode, out: &mut dyn Write) -> InstallReport {
        let os = OsFamily::detect(self.env);
        let mut report = InstallReport::new(mode);
        log::info!("starting {mode} on {os} with {:?} dependency policy", self.policy);

        let mut state = PipelineState::CheckInterpreter;
        while !state.is_terminal() {
            state = match self.execute(state, os, &mut report) {
                Ok(Some(check)) => {
                    record(&mut report, check, out);
                    state.next(mode)
                }
                Ok(None) => state.next(mode),
                Err(err) => {
                    let check =
                        PreflightCheckResult::new(state, CheckOutcome::Fail, err.to_string());
                    record(&mut report, check, out);
                    report.failure = Some(err);
                    PipelineState::FatalAbort
                }
            };
        }

        report.state = state;
        log::info!(
            "{mode} finished in state {state:?} with {} warning(s)",
            report.warnings().count()
        );
        report
    }

    fn execute(
        &self,
        state: PipelineState,
        os: OsFamily,
        report: &mut InstallReport,
    ) -> Result<Option<PreflightCheckResult>> {
        match state {
            PipelineState::CheckInterpreter => {
                let found = interpreter::detect(self.executor, os)?;
                let check = PreflightCheckResult::new(
                    state,
                    CheckOutcome::Pass,
                    format!("Python {} ({})", found.version, found.command),
                );
                report.interpreter = Some(found);
                Ok(Some(check))
            }
            PipelineState::InstallDependencies => {
                let interpreter = require_interpreter(report)?;
                self.install_dependencies(state, interpreter).map(Some)
            }
            PipelineState::CheckVcsTool => Ok(Some(self.check_vcs_tool(state, os))),
            PipelineState::CheckGuiToolkit => {
                let interpreter = require_interpreter(report)?;
                Ok(self.check_gui_toolkit(state, os, interpreter))
            }
            PipelineState::BuildBundle => {
                let interpreter = require_interpreter(report)?;
                self.build_bundle(state, os, interpreter).map(Some)
            }
            PipelineState::InstallApplication => self.install_application(state, os).map(Some),
            PipelineState::CreateShortcut => {
                let interpreter = require_interpreter(report)?;
                Ok(self.create_shortcut(state, os, interpreter))
            }
            PipelineState::Done | PipelineState::FatalAbort => Ok(None),
        }
    }

    fn install_dependencies(
        &self,
        state: PipelineState,
        interpreter: &Interpreter,
    ) -> Result<PreflightCheckResult> {
        let requirements = self.resolve(&self.config.install.requirements);
        match install_dependencies(self.executor, &interpreter.command, &requirements) {
            Ok(()) => Ok(PreflightCheckResult::new(
                state,
                CheckOutcome::Pass,
                format!("dependencies installed from {requirements}"),
            )),
            Err(err) => self.apply_policy(state, err),
        }
    }

    fn check_vcs_tool(&self, state: PipelineState, os: OsFamily) -> PreflightCheckResult {
        let tool = &self.config.install.vcs_tool;
        match tool_version(self.executor, tool) {
            Some(version) => PreflightCheckResult::new(state, CheckOutcome::Pass, version),
            None => PreflightCheckResult::new(
                state,
                CheckOutcome::Warn,
                format!(
                    "{tool} not found; repository features stay unavailable until it is installed ({})",
                    vcs_install_hint(os)
                ),
            ),
        }
    }

    fn check_gui_toolkit(
        &self,
        state: PipelineState,
        os: OsFamily,
        interpreter: &Interpreter,
    ) -> Option<PreflightCheckResult> {
        if os != OsFamily::Linux {
            return None;
        }
        let check = if module_available(self.executor, &interpreter.command, GUI_TOOLKIT) {
            PreflightCheckResult::new(
                state,
                CheckOutcome::Pass,
                format!("{GUI_TOOLKIT} is available"),
            )
        } else {
            PreflightCheckResult::new(
                state,
                CheckOutcome::Warn,
                format!(
                    "{GUI_TOOLKIT} is not available; the application window cannot open until it is installed (e.g. sudo apt install python3-tk)"
                ),
            )
        };
        Some(check)
    }

    fn build_bundle(
        &self,
        state: PipelineState,
        os: OsFamily,
        interpreter: &Interpreter,
    ) -> Result<PreflightCheckResult> {
        match self.build(os, interpreter) {
            Ok(artifact) => Ok(PreflightCheckResult::new(
                state,
                CheckOutcome::Pass,
                format!("{} built: {artifact}", self.config.app.display_name),
            )),
            Err(err) => self.apply_policy(state, err),
        }
    }

    fn build(&self, os: OsFamily, interpreter: &Interpreter) -> Result<BuiltArtifact> {
        let script = self.resolve(&self.config.app.main_script);
        if !script.is_file() {
            return Err(InstallerError::MainScriptMissing { path: script });
        }

        let args: Vec<&str> = self
            .config
            .install
            .bundler_args
            .iter()
            .map(String::as_str)
            .collect();
        let output = self
            .executor
            .run(&interpreter.command, &args)
            .map_err(|e| InstallerError::BuildFailed {
                message: e.to_string(),
            })?;
        if !output.status.success() {
            return Err(InstallerError::BuildFailed {
                message: failure_message(&output),
            });
        }

        let dist = self.resolve(Utf8Path::new(DIST_DIR));
        locate_artifact(&dist, &executable_name(&self.config.app, os))
    }

    fn install_application(
        &self,
        state: PipelineState,
        os: OsFamily,
    ) -> Result<PreflightCheckResult> {
        match self.install(os) {
            Ok(path) => Ok(PreflightCheckResult::new(
                state,
                CheckOutcome::Pass,
                format!("installed to {path}"),
            )),
            Err(err) => self.apply_policy(state, err),
        }
    }

    fn install(&self, os: OsFamily) -> Result<Utf8PathBuf> {
        let app = &self.config.app;
        let dist = self.resolve(Utf8Path::new(DIST_DIR));
        let artifact = locate_artifact(&dist, &installable_name(app, os))?;
        let target = match &self.config.install.install_dir {
            Some(dir) => self.resolve(dir),
            None => default_install_dir(app, os, self.env).ok_or_else(|| {
                InstallerError::InstallLocationUnknown { os: os.to_string() }
            })?,
        };
        install_artifact(&artifact.path, &target)
    }

    fn create_shortcut(
        &self,
        state: PipelineState,
        os: OsFamily,
        interpreter: &Interpreter,
    ) -> Option<PreflightCheckResult> {
        if os != OsFamily::Linux {
            log::debug!("desktop entries are not created on {os}");
            return None;
        }
        let Some(desktop) = self.env.desktop_dir().filter(|dir| dir.is_dir()) else {
            log::info!("no desktop directory found; desktop entry skipped");
            return None;
        };

        let script = self.resolve(&self.config.app.main_script);
        let content = render_desktop_entry(&self.config.app, &interpreter.command, &script);
        let check = match create_desktop_entry(
            &desktop,
            &self.config.install.desktop_entry,
            &content,
        ) {
            Ok(path) => PreflightCheckResult::new(
                state,
                CheckOutcome::Pass,
                format!("created desktop entry {path}"),
            ),
            Err(err) => PreflightCheckResult::new(state, CheckOutcome::Warn, err.to_string()),
        };
        Some(check)
    }

    fn apply_policy(
        &self,
        state: PipelineState,
        err: InstallerError,
    ) -> Result<PreflightCheckResult> {
        match self.policy {
            DependencyPolicy::Fatal => Err(err),
            DependencyPolicy::BestEffort => Ok(PreflightCheckResult::new(
                state,
                CheckOutcome::Warn,
                err.to_string(),
            )),
        }
    }

    /// Resolves `path` against the working directory.
    fn resolve(&self, path: &Utf8Path) -> Utf8PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        match self.env.current_dir() {
            Ok(dir) => dir.join(path),
            Err(e) => {
                log::debug!("working directory unavailable ({e}); using {path} as given");
                path.to_path_buf()
            }
        }
    }
}

const GUI_TOOLKIT: &str = "tkinter";

fn require_interpreter(report: &InstallReport) -> Result<&Interpreter> {
    report
        .interpreter
        .as_ref()
        .ok_or_else(|| InstallerError::InterpreterNotFound {
            candidates: String::new(),
            minimum: interpreter::MINIMUM_VERSION.to_string(),
        })
}

fn record(report: &mut InstallReport, check: PreflightCheckResult, out: &mut dyn Write) {
    match check.outcome {
        CheckOutcome::Pass => log::info!("{}: {}", check.check.check_name(), check.message),
        CheckOutcome::Warn => log::warn!("{}: {}", check.check.check_name(), check.message),
        CheckOutcome::Fail => log::error!("{}: {}", check.check.check_name(), check.message),
    }
    write_line(out, format_check(&check));
    report.checks.push(check);
}

fn vcs_install_hint(os: OsFamily) -> &'static str {
    match os {
        OsFamily::Windows => "download it from https://git-scm.com/download/win",
        OsFamily::MacOs => "run: xcode-select --install",
        OsFamily::Linux => "install it with your package manager, e.g. sudo apt install git",
        OsFamily::Unknown => "see https://git-scm.com/downloads",
    }
}

#[cfg(test)]
mod tests;
