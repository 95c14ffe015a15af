//! Installer library for the GitHub Account Manager.
//!
//! This crate provides the preflight and install pipeline used by the
//! `distkit-installer` CLI binary. Processes and host queries are injected,
//! so the pipeline can be driven against simulated platforms in tests.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`deps`] - Process execution, dependency installation and tool probing
//! - [`error`] - Semantic error types with recovery hints
//! - [`interpreter`] - Python interpreter detection
//! - [`menu`] - Interactive install-mode menu
//! - [`orchestrator`] - The install pipeline state machine
//! - [`output`] - Check line, banner and summary formatting
//! - [`prebuilt`] - Locating built applications and copying them into place
//! - [`shortcut`] - Linux desktop entry creation

pub mod cli;
pub mod deps;
pub mod error;
pub mod interpreter;
pub mod menu;
pub mod orchestrator;
pub mod output;
pub mod prebuilt;
pub mod shortcut;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
