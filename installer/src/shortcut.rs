//! Linux desktop entry creation.
//!
//! The entry launches the application through the detected interpreter so
//! it keeps working when the project directory is not on `PATH`.

use crate::error::{InstallerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use distkit_common::{AppIdentity, render_template};

const DESKTOP_ENTRY_TEMPLATE: &str = "[Desktop Entry]
Name={name}
Comment={comment}
Exec={exec}
Icon=utilities-terminal
Terminal=false
Type=Application
Categories=Development;VersionControl;
";

/// Renders a desktop entry that runs `script` with `interpreter`.
///
/// Paths containing spaces are quoted as the desktop entry specification
/// requires for `Exec` arguments.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use distkit_common::AppIdentity;
/// use distkit_installer::shortcut::render_desktop_entry;
///
/// let entry = render_desktop_entry(
///     &AppIdentity::default(),
///     "python3",
///     Utf8Path::new("/opt/gam/github_account_manager.py"),
/// );
/// assert!(entry.contains("Exec=python3 /opt/gam/github_account_manager.py\n"));
/// ```
#[must_use]
pub fn render_desktop_entry(app: &AppIdentity, interpreter: &str, script: &Utf8Path) -> String {
    let exec = format!("{} {}", quote_exec_arg(interpreter), quote_exec_arg(script.as_str()));
    render_template(
        DESKTOP_ENTRY_TEMPLATE,
        &[
            ("name", &app.display_name),
            ("comment", &app.description),
            ("exec", &exec),
        ],
    )
}

fn quote_exec_arg(arg: &str) -> String {
    if arg.chars().any(|c| c.is_whitespace() || c == '"') {
        let escaped = arg.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{escaped}\"")
    } else {
        arg.to_owned()
    }
}

/// Writes the desktop entry to `<desktop_dir>/<file_name>` and marks it
/// executable so desktop shells trust it.
///
/// The desktop directory must already exist; it is never created.
///
/// # Errors
///
/// Returns [`InstallerError::ShortcutCreation`] if the file cannot be
/// written or its permissions cannot be set.
pub fn create_desktop_entry(
    desktop_dir: &Utf8Path,
    file_name: &str,
    content: &str,
) -> Result<Utf8PathBuf> {
    let path = desktop_dir.join(file_name);
    let fail = |reason: String| InstallerError::ShortcutCreation {
        path: path.clone(),
        reason,
    };

    std::fs::write(&path, content).map_err(|e| fail(format!("failed to write entry: {e}")))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        // rwxr-xr-x
        let mut perms = std::fs::metadata(&path)
            .map_err(|e| fail(format!("failed to read permissions: {e}")))?
            .permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms)
            .map_err(|e| fail(format!("failed to set permissions: {e}")))?;
    }

    log::debug!("wrote desktop entry {path}");
    Ok(path)
}
