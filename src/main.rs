//! `distkit` entrypoint.
//!
//! Writes the artifacts of one target below the output directory. A missing
//! or unknown target prints the usage summary and exits successfully without
//! touching the filesystem.

use clap::Parser;
use distkit::cli::{GenerateCli, default_log_filter, usage_text};
use distkit::error::Result;
use distkit::generator::ArtifactGenerator;
use distkit::target::Target;
use distkit_common::output::write_line;
use std::io::Write;

fn main() {
    let cli = GenerateCli::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_log_filter(cli.verbose)),
    )
    .init();

    let mut stdout = std::io::stdout().lock();
    let mut stderr = std::io::stderr();
    let exit_code = exit_code_for_run_result(run(&cli, &mut stdout), &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &GenerateCli, stdout: &mut dyn Write) -> Result<()> {
    let Some(target) = resolve_target(cli.target.as_deref()) else {
        write_line(stdout, usage_text());
        return Ok(());
    };

    ArtifactGenerator::new(cli.output_dir.clone()).generate(target, stdout)?;
    Ok(())
}

fn resolve_target(raw: Option<&str>) -> Option<Target> {
    let raw = raw?;
    match raw.parse() {
        Ok(target) => Some(target),
        Err(err) => {
            log::warn!("{err}");
            None
        }
    }
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
