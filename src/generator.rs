//! Artifact generation.
//!
//! Writes every artifact of a target below an output root, creating parent
//! directories as needed and overwriting existing files. Writes are not
//! transactional: a failure leaves earlier artifacts of the same run on disk.

use crate::error::{DistError, Result};
use crate::registry::{Artifact, TemplateRegistry};
use crate::target::Target;
use camino::{Utf8Path, Utf8PathBuf};
use distkit_common::output::write_line;
use std::io::Write;

/// Paths written by a generation run, in write order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Absolute or root-relative paths of every written artifact.
    pub written: Vec<Utf8PathBuf>,
}

/// Writes the registry's artifacts below a fixed output root.
#[derive(Debug, Clone)]
pub struct ArtifactGenerator {
    root: Utf8PathBuf,
    registry: TemplateRegistry,
}

impl ArtifactGenerator {
    /// Creates a generator writing below `root`.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            root: root.into(),
            registry: TemplateRegistry,
        }
    }

    /// Output root artifacts are written under.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Writes every artifact of `target` and prints one confirmation line per
    /// file to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`DistError::ArtifactWrite`] naming the first path that could
    /// not be created, written or marked executable.
    pub fn generate(&self, target: Target, out: &mut dyn Write) -> Result<GenerationReport> {
        let artifacts = self.registry.artifacts_for(target);
        log::info!(
            "generating {} artifact(s) for target {target} under {}",
            artifacts.len(),
            self.root
        );

        let mut report = GenerationReport::default();
        for artifact in artifacts {
            let path = self.write_artifact(&artifact)?;
            write_line(out, format_args!("✓ Created {path}"));
            report.written.push(path);
        }
        Ok(report)
    }

    fn write_artifact(&self, artifact: &Artifact) -> Result<Utf8PathBuf> {
        let path = self.root.join(artifact.relative_path);
        let wrap = |source: std::io::Error| DistError::ArtifactWrite {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(wrap)?;
        }
        std::fs::write(&path, artifact.content).map_err(wrap)?;
        if artifact.executable {
            mark_executable(&path).map_err(wrap)?;
        }

        log::debug!("wrote {path} ({} bytes)", artifact.content.len());
        Ok(path)
    }
}

#[cfg(unix)]
fn mark_executable(path: &Utf8Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    // rwxr-xr-x
    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn mark_executable(_path: &Utf8Path) -> std::io::Result<()> {
    Ok(())
}
