//! Shared building blocks for the distkit workspace: operating system
//! classification, the injectable host environment, project configuration,
//! template placeholder rendering and user-facing output helpers.

pub mod config;
pub mod env;
pub mod output;
pub mod platform;
pub mod template;

pub use config::{
    AppIdentity, BUNDLER_SPEC_FILE, ConfigError, InstallSettings, ManifestSettings, ProjectConfig,
};
pub use env::{HostEnvironment, SystemEnvironment};
pub use platform::OsFamily;
pub use template::render_template;

#[cfg(any(test, feature = "test-support"))]
pub use env::StubEnvironment;
