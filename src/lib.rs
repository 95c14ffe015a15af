//! Distribution artifact generation for the GitHub Account Manager.
//!
//! The crate has two halves. [`generator`] writes a fixed set of embedded
//! templates for a chosen [`target::Target`]; [`manifest`] assembles the
//! declarative input of the native bundler. Neither runs a bundler or
//! touches the packaged application itself.

pub mod cli;
pub mod error;
pub mod generator;
pub mod manifest;
pub mod registry;
pub mod target;

pub use error::{DistError, Result};
pub use generator::{ArtifactGenerator, GenerationReport};
pub use manifest::{ManifestBuilder, PackagingManifest};
pub use registry::{Artifact, TemplateRegistry};
pub use target::Target;
