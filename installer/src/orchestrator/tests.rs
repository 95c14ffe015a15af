//! Tests for the install pipeline.

use super::*;
use crate::test_utils::{
    ExpectedCall, StubExecutor, command_not_found, failure_output, stdout_output, success_output,
};
use distkit_common::StubEnvironment;
use rstest::{fixture, rstest};
use tempfile::TempDir;

const BUNDLER: [&str; 5] = [
    "-m",
    "PyInstaller",
    "--clean",
    "--noconfirm",
    "github_account_manager.spec",
];
const MACOS_BUNDLE: &str = "dist/GitHubAccountManager.app/Contents/Info.plist";
const EXECUTABLE: &str = "dist/GitHubAccountManager";

/// A project directory with an install location inside it.
struct Project {
    _dir: TempDir,
    root: Utf8PathBuf,
    config: ProjectConfig,
}

impl Project {
    fn env(&self, os_type: &str) -> StubEnvironment {
        StubEnvironment::new(os_type).with_current_dir(self.root.clone())
    }

    fn seed(&self, relative: &str, size: usize) {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent directories");
        }
        std::fs::write(&path, vec![b'x'; size]).expect("seed project file");
    }

    fn pip(&self, interpreter: &str, result: Result<std::process::Output>) -> ExpectedCall {
        let requirements = self.root.join("requirements.txt");
        ExpectedCall::new(
            interpreter,
            &["-m", "pip", "install", "-r", requirements.as_str()],
            result,
        )
    }
}

#[fixture]
fn project() -> Project {
    let dir = tempfile::tempdir().expect("create temp dir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp path");
    let mut config = ProjectConfig::default();
    config.install.install_dir = Some(Utf8PathBuf::from("installed"));
    Project {
        _dir: dir,
        root,
        config,
    }
}

fn python_ok() -> ExpectedCall {
    ExpectedCall::new("python3", &["--version"], Ok(stdout_output("Python 3.11.4\n")))
}

fn git_ok() -> ExpectedCall {
    ExpectedCall::new("git", &["--version"], Ok(stdout_output("git version 2.43.0\n")))
}

fn tkinter(result: Result<std::process::Output>) -> ExpectedCall {
    ExpectedCall::new("python3", &["-c", "import tkinter"], result)
}

fn run(
    executor: &StubExecutor,
    env: &StubEnvironment,
    config: &ProjectConfig,
    policy: DependencyPolicy,
    mode: InstallMode,
) -> (InstallReport, String) {
    let mut out = Vec::new();
    let report = InstallOrchestrator::new(executor, env, config, policy).run(mode, &mut out);
    (report, String::from_utf8(out).expect("utf-8 output"))
}

fn outcomes(report: &InstallReport) -> Vec<(PipelineState, CheckOutcome)> {
    report
        .checks
        .iter()
        .map(|check| (check.check, check.outcome))
        .collect()
}

#[rstest]
#[case::build_from_source(InstallMode::BuildFromSource, &[
    PipelineState::CheckInterpreter,
    PipelineState::InstallDependencies,
    PipelineState::CheckVcsTool,
    PipelineState::CheckGuiToolkit,
    PipelineState::BuildBundle,
    PipelineState::CreateShortcut,
])]
#[case::prebuilt(InstallMode::InstallPrebuilt, &[
    PipelineState::CheckInterpreter,
    PipelineState::InstallDependencies,
    PipelineState::CheckVcsTool,
    PipelineState::CheckGuiToolkit,
    PipelineState::InstallApplication,
    PipelineState::CreateShortcut,
])]
#[case::dependencies_only(InstallMode::DependenciesOnly, &[
    PipelineState::CheckInterpreter,
    PipelineState::InstallDependencies,
])]
fn modes_visit_their_steps(#[case] mode: InstallMode, #[case] expected: &[PipelineState]) {
    let mut visited = Vec::new();
    let mut state = PipelineState::CheckInterpreter;
    while !state.is_terminal() {
        visited.push(state);
        state = state.next(mode);
    }
    assert_eq!(visited, expected);
    assert_eq!(state, PipelineState::Done);
}

#[rstest]
#[case(1, Some(InstallMode::BuildFromSource))]
#[case(2, Some(InstallMode::InstallPrebuilt))]
#[case(3, Some(InstallMode::DependenciesOnly))]
#[case(0, None)]
#[case(4, None)]
fn menu_numbers_map_to_modes(#[case] choice: u8, #[case] expected: Option<InstallMode>) {
    assert_eq!(InstallMode::from_choice(choice), expected);
}

#[rstest]
fn missing_interpreter_aborts_before_any_install(project: Project) {
    let executor = StubExecutor::new(vec![
        ExpectedCall::new("python3", &["--version"], Err(command_not_found())),
        ExpectedCall::new("python", &["--version"], Err(command_not_found())),
    ]);

    let (report, printed) = run(
        &executor,
        &project.env("darwin23"),
        &project.config,
        DependencyPolicy::Fatal,
        InstallMode::BuildFromSource,
    );

    executor.assert_finished();
    assert_eq!(report.state, PipelineState::FatalAbort);
    assert_eq!(
        outcomes(&report),
        [(PipelineState::CheckInterpreter, CheckOutcome::Fail)]
    );
    assert!(matches!(
        report.failure,
        Some(InstallerError::InterpreterNotFound { .. })
    ));
    assert!(report.interpreter.is_none());
    assert!(printed.starts_with("❌ [interpreter] Python not found"));
}

#[rstest]
fn old_interpreter_is_fatal_even_when_best_effort(project: Project) {
    let executor = StubExecutor::new(vec![
        ExpectedCall::new("python3", &["--version"], Ok(stdout_output("Python 3.6.9"))),
        ExpectedCall::new("python", &["--version"], Ok(stdout_output("Python 2.7.18"))),
    ]);

    let (report, _) = run(
        &executor,
        &project.env("darwin23"),
        &project.config,
        DependencyPolicy::BestEffort,
        InstallMode::InstallPrebuilt,
    );

    assert_eq!(report.state, PipelineState::FatalAbort);
    assert!(matches!(
        report.failure,
        Some(InstallerError::InterpreterTooOld { ref found, .. }) if found == "3.6.9"
    ));
}

#[rstest]
#[case::macos("darwin23", "python3", MACOS_BUNDLE, "xcode-select --install")]
#[case::linux("linux-gnu", "python3", EXECUTABLE, "sudo apt install git")]
#[case::windows("msys", "py", "dist/GitHubAccountManager.exe", "git-scm.com/download/win")]
fn missing_vcs_tool_is_a_single_warning(
    project: Project,
    #[case] os_type: &str,
    #[case] interpreter: &str,
    #[case] artifact: &str,
    #[case] hint: &str,
) {
    project.seed(artifact, 16);
    let mut calls = vec![
        ExpectedCall::new(interpreter, &["--version"], Ok(stdout_output("Python 3.11.4"))),
        project.pip(interpreter, Ok(success_output())),
        ExpectedCall::new("git", &["--version"], Err(command_not_found())),
    ];
    if os_type == "linux-gnu" {
        calls.push(tkinter(Ok(success_output())));
    }
    let executor = StubExecutor::new(calls);

    let (report, printed) = run(
        &executor,
        &project.env(os_type),
        &project.config,
        DependencyPolicy::Fatal,
        InstallMode::InstallPrebuilt,
    );

    executor.assert_finished();
    assert_eq!(report.state, PipelineState::Done);
    assert!(report.succeeded());
    assert_eq!(report.warnings().count(), 1, "{:?}", report.checks);
    let warning = report.warnings().next().expect("one warning");
    assert_eq!(warning.check, PipelineState::CheckVcsTool);
    assert!(warning.message.contains(hint), "{}", warning.message);
    assert!(printed.contains("⚠ [vcs] git not found"));
}

#[rstest]
#[case::fatal(DependencyPolicy::Fatal)]
#[case::best_effort(DependencyPolicy::BestEffort)]
fn dependency_failure_follows_policy(project: Project, #[case] policy: DependencyPolicy) {
    project.seed(MACOS_BUNDLE, 16);
    let mut calls = vec![
        python_ok(),
        project.pip("python3", Ok(failure_output("No matching distribution"))),
    ];
    if policy == DependencyPolicy::BestEffort {
        calls.push(git_ok());
    }
    let executor = StubExecutor::new(calls);

    let (report, _) = run(
        &executor,
        &project.env("darwin23"),
        &project.config,
        policy,
        InstallMode::InstallPrebuilt,
    );

    executor.assert_finished();
    match policy {
        DependencyPolicy::Fatal => {
            assert_eq!(report.state, PipelineState::FatalAbort);
            assert!(matches!(
                report.failure,
                Some(InstallerError::DependencyInstall { .. })
            ));
            assert_eq!(
                outcomes(&report).last(),
                Some(&(PipelineState::InstallDependencies, CheckOutcome::Fail))
            );
        }
        DependencyPolicy::BestEffort => {
            assert_eq!(report.state, PipelineState::Done);
            assert!(report.failure.is_none());
            assert_eq!(
                outcomes(&report),
                [
                    (PipelineState::CheckInterpreter, CheckOutcome::Pass),
                    (PipelineState::InstallDependencies, CheckOutcome::Warn),
                    (PipelineState::CheckVcsTool, CheckOutcome::Pass),
                    (PipelineState::InstallApplication, CheckOutcome::Pass),
                ]
            );
        }
    }
}

#[rstest]
fn dependencies_only_stops_after_install(project: Project) {
    let executor = StubExecutor::new(vec![
        python_ok(),
        project.pip("python3", Ok(success_output())),
    ]);

    let (report, printed) = run(
        &executor,
        &project.env("darwin23"),
        &project.config,
        DependencyPolicy::Fatal,
        InstallMode::DependenciesOnly,
    );

    executor.assert_finished();
    assert_eq!(report.state, PipelineState::Done);
    assert_eq!(
        printed,
        format!(
            "✓ [interpreter] Python 3.11.4 (python3)\n✓ [dependencies] dependencies installed from {}\n",
            project.root.join("requirements.txt")
        )
    );
}

#[rstest]
fn build_from_source_reports_the_built_executable(project: Project) {
    project.seed("github_account_manager.py", 1);
    project.seed(EXECUTABLE, 1_572_864);
    let executor = StubExecutor::new(vec![
        python_ok(),
        project.pip("python3", Ok(success_output())),
        git_ok(),
        ExpectedCall::new("python3", &BUNDLER, Ok(success_output())),
    ]);

    let (report, _) = run(
        &executor,
        &project.env("darwin23"),
        &project.config,
        DependencyPolicy::Fatal,
        InstallMode::BuildFromSource,
    );

    executor.assert_finished();
    assert_eq!(report.state, PipelineState::Done);
    assert_eq!(report.warnings().count(), 0);
    assert_eq!(
        report.checks.last().map(|check| check.message.clone()),
        Some(format!(
            "GitHub Account Manager built: {} (1.5 MB)",
            project.root.join(EXECUTABLE)
        ))
    );
}

#[rstest]
#[case::fatal(DependencyPolicy::Fatal, PipelineState::FatalAbort, CheckOutcome::Fail)]
#[case::best_effort(DependencyPolicy::BestEffort, PipelineState::Done, CheckOutcome::Warn)]
fn build_failure_follows_policy(
    project: Project,
    #[case] policy: DependencyPolicy,
    #[case] terminal: PipelineState,
    #[case] outcome: CheckOutcome,
) {
    project.seed("github_account_manager.py", 1);
    let executor = StubExecutor::new(vec![
        python_ok(),
        project.pip("python3", Ok(success_output())),
        git_ok(),
        ExpectedCall::new("python3", &BUNDLER, Ok(failure_output("spec file not found"))),
    ]);

    let (report, _) = run(
        &executor,
        &project.env("darwin23"),
        &project.config,
        policy,
        InstallMode::BuildFromSource,
    );

    executor.assert_finished();
    assert_eq!(report.state, terminal);
    let build = report.checks.last().expect("build check recorded");
    assert_eq!((build.check, build.outcome), (PipelineState::BuildBundle, outcome));
    assert!(build.message.contains("spec file not found"));
}

#[rstest]
#[case::fatal(DependencyPolicy::Fatal, PipelineState::FatalAbort)]
#[case::best_effort(DependencyPolicy::BestEffort, PipelineState::Done)]
fn missing_main_script_skips_the_bundler(
    project: Project,
    #[case] policy: DependencyPolicy,
    #[case] terminal: PipelineState,
) {
    let executor = StubExecutor::new(vec![
        python_ok(),
        project.pip("python3", Ok(success_output())),
        git_ok(),
    ]);

    let (report, _) = run(
        &executor,
        &project.env("darwin23"),
        &project.config,
        policy,
        InstallMode::BuildFromSource,
    );

    executor.assert_finished();
    assert_eq!(report.state, terminal);
    let build = report.checks.last().expect("build check recorded");
    assert_eq!(build.check, PipelineState::BuildBundle);
    assert!(
        build.message.contains("github_account_manager.py not found"),
        "{}",
        build.message
    );
}

#[rstest]
fn bundler_success_without_output_is_a_build_failure(project: Project) {
    project.seed("github_account_manager.py", 1);
    project.seed("dist/warn-GitHubAccountManager.txt", 1);
    let executor = StubExecutor::new(vec![
        python_ok(),
        project.pip("python3", Ok(success_output())),
        git_ok(),
        ExpectedCall::new("python3", &BUNDLER, Ok(success_output())),
    ]);

    let (report, _) = run(
        &executor,
        &project.env("darwin23"),
        &project.config,
        DependencyPolicy::Fatal,
        InstallMode::BuildFromSource,
    );

    assert_eq!(report.state, PipelineState::FatalAbort);
    match report.failure {
        Some(InstallerError::ArtifactMissing { path, available, .. }) => {
            assert_eq!(path, project.root.join(EXECUTABLE));
            assert_eq!(available, "warn-GitHubAccountManager.txt");
        }
        other => panic!("unexpected failure: {other:?}"),
    }
}

#[rstest]
fn prebuilt_bundle_is_copied_to_install_location(project: Project) {
    project.seed(MACOS_BUNDLE, 8);
    let executor = StubExecutor::new(vec![
        python_ok(),
        project.pip("python3", Ok(success_output())),
        git_ok(),
    ]);

    let (report, printed) = run(
        &executor,
        &project.env("darwin23"),
        &project.config,
        DependencyPolicy::Fatal,
        InstallMode::InstallPrebuilt,
    );

    assert_eq!(report.state, PipelineState::Done);
    let installed = project.root.join("installed/GitHubAccountManager.app");
    assert!(installed.join("Contents/Info.plist").is_file());
    assert!(printed.contains(&format!("✓ [install] installed to {installed}")));
}

#[rstest]
#[case::fatal(DependencyPolicy::Fatal, PipelineState::FatalAbort, CheckOutcome::Fail)]
#[case::best_effort(DependencyPolicy::BestEffort, PipelineState::Done, CheckOutcome::Warn)]
fn missing_prebuilt_application_follows_policy(
    project: Project,
    #[case] policy: DependencyPolicy,
    #[case] terminal: PipelineState,
    #[case] outcome: CheckOutcome,
) {
    let executor = StubExecutor::new(vec![
        python_ok(),
        project.pip("python3", Ok(success_output())),
        git_ok(),
    ]);

    let (report, _) = run(
        &executor,
        &project.env("darwin23"),
        &project.config,
        policy,
        InstallMode::InstallPrebuilt,
    );

    assert_eq!(report.state, terminal);
    let install = report.checks.last().expect("install check recorded");
    assert_eq!(
        (install.check, install.outcome),
        (PipelineState::InstallApplication, outcome)
    );
    assert!(install.message.contains("menu option 1"), "{}", install.message);
}

#[rstest]
fn unknown_platform_needs_a_configured_install_location(mut project: Project) {
    project.config.install.install_dir = None;
    project.seed(EXECUTABLE, 8);
    let executor = StubExecutor::new(vec![
        python_ok(),
        project.pip("python3", Ok(success_output())),
        git_ok(),
    ]);

    let (report, _) = run(
        &executor,
        &project.env("freebsd13.2"),
        &project.config,
        DependencyPolicy::Fatal,
        InstallMode::InstallPrebuilt,
    );

    assert_eq!(report.state, PipelineState::FatalAbort);
    assert!(matches!(
        report.failure,
        Some(InstallerError::InstallLocationUnknown { ref os }) if os == "unknown"
    ));
}

#[rstest]
fn windows_tries_launcher_first(project: Project) {
    let executor = StubExecutor::new(vec![
        ExpectedCall::new("py", &["--version"], Ok(stdout_output("Python 3.12.0"))),
        project.pip("py", Ok(success_output())),
    ]);

    let (report, _) = run(
        &executor,
        &project.env("windows"),
        &project.config,
        DependencyPolicy::Fatal,
        InstallMode::DependenciesOnly,
    );

    executor.assert_finished();
    assert_eq!(
        report.interpreter.map(|found| found.command).as_deref(),
        Some("py")
    );
}

#[rstest]
fn linux_shortcut_runs_main_script_by_absolute_path(project: Project) {
    project.seed(EXECUTABLE, 8);
    let desktop = project.root.join("Desktop");
    std::fs::create_dir(&desktop).expect("create desktop directory");
    let env = project.env("linux-gnu").with_desktop_dir(desktop.clone());
    let executor = StubExecutor::new(vec![
        python_ok(),
        project.pip("python3", Ok(success_output())),
        git_ok(),
        tkinter(Ok(success_output())),
    ]);

    let (report, _) = run(
        &executor,
        &env,
        &project.config,
        DependencyPolicy::Fatal,
        InstallMode::InstallPrebuilt,
    );

    executor.assert_finished();
    assert_eq!(report.state, PipelineState::Done);
    assert_eq!(report.warnings().count(), 0);
    let entry = std::fs::read_to_string(desktop.join("github-account-manager.desktop"))
        .expect("desktop entry written");
    assert!(entry.contains(&format!(
        "Exec=python3 {}\n",
        project.root.join("github_account_manager.py")
    )));
}

#[rstest]
#[case::unknown(None)]
#[case::absent(Some("Desktop"))]
fn linux_without_desktop_directory_skips_shortcut(
    project: Project,
    #[case] desktop: Option<&str>,
) {
    project.seed(EXECUTABLE, 8);
    let mut env = project.env("linux");
    if let Some(name) = desktop {
        env = env.with_desktop_dir(project.root.join(name));
    }
    let executor = StubExecutor::new(vec![
        python_ok(),
        project.pip("python3", Ok(success_output())),
        git_ok(),
        tkinter(Ok(success_output())),
    ]);

    let (report, printed) = run(
        &executor,
        &env,
        &project.config,
        DependencyPolicy::Fatal,
        InstallMode::InstallPrebuilt,
    );

    assert_eq!(report.state, PipelineState::Done);
    assert_eq!(report.warnings().count(), 0);
    assert!(report
        .checks
        .iter()
        .all(|check| check.check != PipelineState::CreateShortcut));
    assert!(!printed.contains("[shortcut]"));
    assert!(!project.root.join("Desktop").exists());
}

#[rstest]
fn linux_without_tkinter_is_a_warning(project: Project) {
    project.seed(EXECUTABLE, 8);
    let executor = StubExecutor::new(vec![
        python_ok(),
        project.pip("python3", Ok(success_output())),
        git_ok(),
        tkinter(Ok(failure_output("ModuleNotFoundError: No module named 'tkinter'"))),
    ]);

    let (report, _) = run(
        &executor,
        &project.env("linux-gnu"),
        &project.config,
        DependencyPolicy::Fatal,
        InstallMode::InstallPrebuilt,
    );

    executor.assert_finished();
    assert_eq!(report.state, PipelineState::Done);
    let warnings: Vec<_> = report.warnings().collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].check, PipelineState::CheckGuiToolkit);
    assert!(warnings[0].message.contains("sudo apt install python3-tk"));
}

#[rstest]
#[case::macos("darwin23", "python3", MACOS_BUNDLE)]
#[case::windows("msys", "py", "dist/GitHubAccountManager.exe")]
#[case::unknown("freebsd13.2", "python3", EXECUTABLE)]
fn linux_only_steps_are_skipped_silently_elsewhere(
    project: Project,
    #[case] os_type: &str,
    #[case] interpreter: &str,
    #[case] artifact: &str,
) {
    project.seed(artifact, 8);
    let executor = StubExecutor::new(vec![
        ExpectedCall::new(interpreter, &["--version"], Ok(stdout_output("Python 3.11.4"))),
        project.pip(interpreter, Ok(success_output())),
        git_ok(),
    ]);

    let (report, _) = run(
        &executor,
        &project.env(os_type),
        &project.config,
        DependencyPolicy::Fatal,
        InstallMode::InstallPrebuilt,
    );

    executor.assert_finished();
    assert_eq!(report.state, PipelineState::Done);
    assert!(report.checks.iter().all(|check| !matches!(
        check.check,
        PipelineState::CreateShortcut | PipelineState::CheckGuiToolkit
    )));
}
