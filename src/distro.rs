//! Distribution targets and their derived container identities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProvisionError;

/// Distribution families the configuration may name.
///
/// Only families with a base-image recipe can actually be provisioned; see
/// [`crate::recipe::recipe_for`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistroType {
    Ubuntu,
    CentOS,
    Oracle,
}

impl DistroType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistroType::Ubuntu => "ubuntu",
            DistroType::CentOS => "centos",
            DistroType::Oracle => "oracle",
        }
    }
}

impl fmt::Display for DistroType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistroType {
    type Err = ProvisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ubuntu" => Ok(DistroType::Ubuntu),
            "centos" => Ok(DistroType::CentOS),
            "oracle" => Ok(DistroType::Oracle),
            other => Err(ProvisionError::Config(format!(
                "unknown distro type '{other}'"
            ))),
        }
    }
}

/// A `{distro, release}` pair; the identity key for cached definitions and
/// image tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DistroTarget {
    pub distro: DistroType,
    pub release: String,
}

impl DistroTarget {
    pub fn new(distro: DistroType, release: impl Into<String>) -> Self {
        Self {
            distro,
            release: release.into(),
        }
    }

    /// Deterministic image tag for this target, e.g. `kernel-env-ubuntu-18.04`.
    pub fn image_tag(&self) -> String {
        format!("kernel-env-{}-{}", self.distro, self.release)
    }
}

impl fmt::Display for DistroTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.distro, self.release)
    }
}

/// A provisioning request: the target plus which kernel versions to install.
///
/// `release_mask` is a regex fragment matched against kernel package names;
/// `generic_only` keeps only general-purpose hardware variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelMask {
    pub target: DistroTarget,
    pub release_mask: String,
    pub generic_only: bool,
}
