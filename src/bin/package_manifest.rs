//! `distkit-manifest` entrypoint.
//!
//! Builds the packaging manifest for the detected (or requested) operating
//! system and writes it as JSON. The bundler itself is not invoked.

use clap::Parser;
use distkit::cli::{ManifestCli, default_log_filter};
use distkit::error::Result;
use distkit::manifest::discovery::SitePackagesDiscovery;
use distkit::manifest::{ManifestBuilder, write_manifest};
use distkit_common::output::write_line;
use distkit_common::{HostEnvironment, OsFamily, ProjectConfig, SystemEnvironment};
use std::io::Write;

fn main() {
    let cli = ManifestCli::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_log_filter(cli.verbose)),
    )
    .init();

    let mut stdout = std::io::stdout().lock();
    let mut stderr = std::io::stderr();
    let result = run(&cli, &SystemEnvironment, &mut stdout);
    let exit_code = exit_code_for_run_result(result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &ManifestCli, env: &dyn HostEnvironment, stdout: &mut dyn Write) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ProjectConfig::load(path)?,
        None => ProjectConfig::load_from_dir(&env.current_dir()?)?,
    };

    let os = match cli.os.as_deref() {
        Some(name) => OsFamily::classify(name),
        None => OsFamily::detect(env),
    };
    if os == OsFamily::Unknown {
        log::warn!("unrecognised operating system; OS-specific manifest entries are skipped");
    }

    let discovery = SitePackagesDiscovery::new(cli.site_packages.clone());
    let manifest = ManifestBuilder::new(&config.app, &discovery)
        .with_settings(&config.manifest)
        .build(os, env);

    write_manifest(&manifest, &config.app, &cli.output, stdout)?;
    Ok(())
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
