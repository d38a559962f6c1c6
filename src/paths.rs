//! Host cache layout.
//!
//! Every component receives the cache root explicitly; nothing below the
//! binary resolves home directories.

use std::path::{Path, PathBuf};

use crate::distro::DistroTarget;

/// Directory layout under a single injected cache root.
///
/// ```text
/// <root>/<distro>/<release>/Dockerfile   per-target image definition
/// <root>/kernels/                        shared extracted boot artifacts
/// ```
#[derive(Debug, Clone)]
pub struct CacheLayout {
    root: PathBuf,
}

impl CacheLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one target's definition; also the image build
    /// context.
    pub fn definition_dir(&self, target: &DistroTarget) -> PathBuf {
        self.root
            .join(target.distro.as_str())
            .join(&target.release)
    }

    /// The definition file itself.
    pub fn definition_path(&self, target: &DistroTarget) -> PathBuf {
        self.definition_dir(target).join("Dockerfile")
    }

    /// Shared artifact directory for extracted boot files.
    pub fn kernels_dir(&self) -> PathBuf {
        self.root.join("kernels")
    }
}

/// Conventional cache root for interactive use (`~/.kernel-env`).
///
/// Only the binary consults this; library components always take an
/// explicit [`CacheLayout`].
pub fn default_root() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".kernel-env"))
}
