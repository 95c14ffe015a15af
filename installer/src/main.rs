//! `distkit-installer` entrypoint.
//!
//! Chooses an install mode (menu, `--choice` or `--scripted`), runs the
//! install pipeline and exits non-zero when it aborts.

use clap::Parser;
use distkit_common::output::write_line;
use distkit_common::{HostEnvironment, OsFamily, ProjectConfig, SystemEnvironment};
use distkit_installer::cli::Cli;
use distkit_installer::deps::{CommandExecutor, SystemCommandExecutor};
use distkit_installer::error::Result;
use distkit_installer::menu::{parse_choice, prompt_for_mode};
use distkit_installer::orchestrator::{DependencyPolicy, InstallMode, InstallOrchestrator};
use distkit_installer::output::{banner, summary};
use std::io::{BufRead, Write};

fn main() {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .init();

    let mut stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout().lock();
    let mut stderr = std::io::stderr();
    let run_result = run(
        &cli,
        &SystemCommandExecutor,
        &SystemEnvironment,
        &mut stdin,
        &mut stdout,
    );
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(
    cli: &Cli,
    executor: &dyn CommandExecutor,
    env: &dyn HostEnvironment,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ProjectConfig::load(path)?,
        None => ProjectConfig::load_from_dir(&env.current_dir()?)?,
    };

    write_line(out, banner(&config.app.display_name, OsFamily::detect(env)));
    let (mode, policy) = select_mode(cli, input, out)?;

    let report = InstallOrchestrator::new(executor, env, &config, policy).run(mode, out);
    write_line(out, "");
    write_line(out, summary(&report));

    match report.failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn select_mode(
    cli: &Cli,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<(InstallMode, DependencyPolicy)> {
    if cli.scripted {
        return Ok((InstallMode::InstallPrebuilt, DependencyPolicy::BestEffort));
    }
    let mode = match cli.choice.as_deref() {
        Some(choice) => parse_choice(choice)?,
        None => prompt_for_mode(input, out)?,
    };
    Ok((mode, DependencyPolicy::Fatal))
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_line(stderr, format_args!("error: {err}"));
            1
        }
    }
}
