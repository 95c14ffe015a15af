//! Output formatting for the installer CLI.
//!
//! Check records become one line each, prefixed with a status symbol. The
//! banner and summary frame a run.

use crate::orchestrator::{CheckOutcome, InstallReport, PreflightCheckResult};
use distkit_common::OsFamily;

/// Status symbol printed in front of a check line.
#[must_use]
pub const fn symbol(outcome: CheckOutcome) -> &'static str {
    match outcome {
        CheckOutcome::Pass => "✓",
        CheckOutcome::Warn => "⚠",
        CheckOutcome::Fail => "❌",
    }
}

/// Format one check record for display.
///
/// # Example
///
/// ```
/// use distkit_installer::orchestrator::{CheckOutcome, PipelineState, PreflightCheckResult};
/// use distkit_installer::output::format_check;
///
/// let check = PreflightCheckResult {
///     check: PipelineState::CheckVcsTool,
///     outcome: CheckOutcome::Pass,
///     message: "git version 2.43.0".to_owned(),
/// };
/// assert_eq!(format_check(&check), "✓ [vcs] git version 2.43.0");
/// ```
#[must_use]
pub fn format_check(check: &PreflightCheckResult) -> String {
    format!(
        "{} [{}] {}",
        symbol(check.outcome),
        check.check.check_name(),
        check.message
    )
}

/// Heading printed before the pipeline starts.
#[must_use]
pub fn banner(app_name: &str, os: OsFamily) -> String {
    let title = format!("{app_name} Installer");
    format!(
        "{title}\n{}\nDetected platform: {os}\n",
        "=".repeat(title.chars().count())
    )
}

/// Closing message summarising a finished run.
#[must_use]
pub fn summary(report: &InstallReport) -> String {
    if !report.succeeded() {
        return "❌ Installation failed. Please check the requirements and try again.".to_owned();
    }
    match report.warnings().count() {
        0 => format!("✓ {} completed successfully.", report.mode),
        1 => format!("⚠ {} completed with 1 warning.", report.mode),
        n => format!("⚠ {} completed with {n} warnings.", report.mode),
    }
}
