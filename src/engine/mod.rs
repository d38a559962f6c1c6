//! Container engine seam.
//!
//! The pipeline only ever talks to the engine through [`ContainerEngine`],
//! so tests script it and a different engine CLI is one new impl away.
//! Every invocation blocks the caller until completion and captures
//! combined stdout+stderr for diagnostics; there is no cancellation.

pub mod docker;
#[cfg(test)]
pub(crate) mod fake;

pub use docker::DockerCli;

use std::path::Path;

use crate::error::Result;

/// Blocking operations the pipeline needs from a container engine.
pub trait ContainerEngine {
    /// Build the image whose definition lives at `context_dir`, tagging it
    /// `tag`.
    fn build_image(&self, tag: &str, context_dir: &Path) -> Result<()>;

    /// Run `command` through a shell in a fresh container of `image`. The
    /// exited container is left behind for later artifact copies.
    fn run(&self, image: &str, command: &str) -> Result<String>;

    /// Run a read-only discovery `command` in a fresh container of
    /// `image`, bounded by the engine's fixed query timeout.
    fn query(&self, image: &str, command: &str) -> Result<String>;

    /// Raw `ps -a`-style listing of all containers, newest first.
    fn list_containers(&self) -> Result<String>;

    /// Copy `src` (a `container:path` reference) into `dest` on the host.
    fn copy_from(&self, src: &str, dest: &Path) -> Result<()>;
}
