//! CLI argument definitions for the installer.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use camino::Utf8PathBuf;
use clap::Parser;

/// Install the GitHub Account Manager and its dependencies.
#[derive(Parser, Debug)]
#[command(name = "distkit-installer")]
#[command(version, about)]
#[command(long_about = concat!(
    "Install the GitHub Account Manager and its dependencies.\n\n",
    "The installer checks for a supported Python interpreter, installs the ",
    "Python requirements, checks for git, optionally builds the native bundle ",
    "and, on Linux, creates a desktop entry.\n\n",
    "Without --scripted a numbered menu asks which installation method to use.",
))]
#[command(after_help = concat!(
    "INSTALLATION METHODS:\n",
    "  1  Build from source              interpreter, deps, git, build, shortcut\n",
    "  2  Install prebuilt application   interpreter, deps, git, shortcut\n",
    "  3  Install dependencies only      interpreter, deps\n\n",
    "EXAMPLES:\n",
    "  Choose interactively:\n",
    "    $ distkit-installer\n\n",
    "  Build from source without the menu:\n",
    "    $ distkit-installer --choice 1\n\n",
    "  Unattended install that keeps going past dependency failures:\n",
    "    $ distkit-installer --scripted",
))]
pub struct Cli {
    /// Project configuration file [default: ./distkit.toml].
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Run the prebuilt install non-interactively, downgrading dependency
    /// and build failures to warnings.
    #[arg(long, conflicts_with = "choice")]
    pub scripted: bool,

    /// Menu selection to use instead of prompting.
    #[arg(long, value_name = "N")]
    pub choice: Option<String>,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Default `env_logger` filter for this invocation.
    #[must_use]
    pub const fn log_filter(&self) -> &'static str {
        if self.verbose { "debug" } else { "warn" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_prompt_interactively() {
        let cli = Cli::try_parse_from(["distkit-installer"]).expect("no arguments");
        assert!(!cli.scripted);
        assert!(cli.choice.is_none());
        assert!(cli.config.is_none());
        assert_eq!(cli.log_filter(), "warn");
    }

    #[rstest]
    #[case::choice(&["distkit-installer", "--choice", "2"], Some("2"), false)]
    #[case::scripted(&["distkit-installer", "--scripted"], None, true)]
    fn parses_mode_selection(
        #[case] args: &[&str],
        #[case] choice: Option<&str>,
        #[case] scripted: bool,
    ) {
        let cli = Cli::try_parse_from(args).expect("valid arguments");
        assert_eq!(cli.choice.as_deref(), choice);
        assert_eq!(cli.scripted, scripted);
    }

    #[test]
    fn scripted_conflicts_with_choice() {
        let result = Cli::try_parse_from(["distkit-installer", "--scripted", "--choice", "1"]);
        assert!(result.is_err());
    }

    #[test]
    fn verbose_raises_log_filter() {
        let cli = Cli::try_parse_from(["distkit-installer", "-v"]).expect("valid arguments");
        assert_eq!(cli.log_filter(), "debug");
    }
}
