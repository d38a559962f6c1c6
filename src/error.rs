//! Error types for the provisioning pipeline.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::distro::DistroType;

/// Errors produced by the provisioning pipeline.
///
/// Only `Config` aborts a whole run; the orchestrator records every other
/// variant against its target and keeps going.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Malformed or missing required configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// No base-image recipe exists for this distribution family.
    #[error("{distro} is not yet supported")]
    UnsupportedDistro { distro: DistroType },

    /// The caller-supplied version mask is not a valid regex fragment.
    #[error("invalid kernel version mask '{mask}': {source}")]
    Pattern {
        mask: String,
        #[source]
        source: regex::Error,
    },

    /// An external engine invocation failed; carries its combined output.
    #[error("{operation} failed ({status})\n{output}")]
    Process {
        operation: String,
        status: String,
        output: String,
    },

    /// Reading or writing a definition or store path failed.
    #[error("{context} ({}): {source}", .path.display())]
    Filesystem {
        context: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No container could be associated with the image tag.
    #[error("no container found for image '{tag}'")]
    NotFound { tag: String },
}

impl ProvisionError {
    pub(crate) fn fs(
        context: impl Into<String>,
        path: impl Into<PathBuf>,
        source: io::Error,
    ) -> Self {
        ProvisionError::Filesystem {
            context: context.into(),
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = ProvisionError> = std::result::Result<T, E>;
