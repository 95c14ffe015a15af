//! Interactive install-mode menu.

use crate::error::{InstallerError, Result};
use crate::orchestrator::InstallMode;
use distkit_common::output::write_line;
use std::io::{BufRead, Write};

/// Prompt printed after the numbered options.
pub const PROMPT: &str = "Enter choice (1-3): ";

/// Numbered menu listing every install mode.
#[must_use]
pub fn menu_text() -> String {
    let mut text = String::from("Choose installation method:\n");
    for mode in InstallMode::ALL {
        text.push_str(&format!("{}. {}\n", mode.choice(), mode.label()));
    }
    text
}

/// Parses a menu selection. Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns [`InstallerError::InvalidMenuChoice`] for anything other than
/// `1`, `2` or `3`.
///
/// # Examples
///
/// ```
/// use distkit_installer::menu::parse_choice;
/// use distkit_installer::orchestrator::InstallMode;
///
/// assert_eq!(parse_choice(" 2\n").ok(), Some(InstallMode::InstallPrebuilt));
/// assert!(parse_choice("4").is_err());
/// ```
pub fn parse_choice(input: &str) -> Result<InstallMode> {
    let trimmed = input.trim();
    trimmed
        .parse::<u8>()
        .ok()
        .and_then(InstallMode::from_choice)
        .ok_or_else(|| InstallerError::InvalidMenuChoice {
            input: trimmed.to_owned(),
        })
}

/// Prints the menu to `out` and reads one selection from `input`.
///
/// There is no retry: end of input or an invalid line is an error.
///
/// # Errors
///
/// Returns [`InstallerError::InvalidMenuChoice`] for an invalid selection or
/// closed input, and [`InstallerError::Io`] if reading fails.
pub fn prompt_for_mode(input: &mut dyn BufRead, out: &mut dyn Write) -> Result<InstallMode> {
    write_line(out, menu_text());
    if let Err(e) = write!(out, "{PROMPT}").and_then(|()| out.flush()) {
        log::debug!("failed to print prompt: {e}");
    }

    let mut line = String::new();
    input.read_line(&mut line)?;
    parse_choice(&line)
}
