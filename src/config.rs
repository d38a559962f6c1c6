//! TOML configuration: provisioning masks and the kernel inventory.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::distro::{DistroTarget, DistroType, KernelMask};
use crate::error::{ProvisionError, Result};

/// Per-project artifact configuration file name.
pub const ARTIFACT_CONFIG_NAME: &str = ".kernel-env.toml";

/// Kernel inventory file name.
pub const KERNEL_CONFIG_NAME: &str = "kernels.toml";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ArtifactToml {
    #[serde(default)]
    supported_kernels: Vec<SupportedKernelToml>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SupportedKernelToml {
    distro_type: DistroType,
    // An absent release is tolerated at parse time; the orchestrator
    // rejects it before any work happens.
    #[serde(default)]
    distro_release: String,
    release_mask: String,
    #[serde(default = "default_generic_only")]
    generic_only: bool,
}

fn default_generic_only() -> bool {
    true
}

/// Masks a project wants provisioned, from its `.kernel-env.toml`.
#[derive(Debug, Clone)]
pub struct ArtifactConfig {
    pub supported_kernels: Vec<KernelMask>,
}

/// Load the artifact configuration from `work_dir`.
pub fn read_artifact_config(work_dir: &Path) -> Result<ArtifactConfig> {
    let path = work_dir.join(ARTIFACT_CONFIG_NAME);
    let parsed: ArtifactToml = read_toml(&path)?;
    let supported_kernels = parsed
        .supported_kernels
        .into_iter()
        .map(|entry| KernelMask {
            target: DistroTarget::new(entry.distro_type, entry.distro_release),
            release_mask: entry.release_mask,
            generic_only: entry.generic_only,
        })
        .collect();
    Ok(ArtifactConfig { supported_kernels })
}

/// One known kernel in the inventory.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KernelInfo {
    pub distro_type: DistroType,
    pub distro_release: String,
    pub kernel_release: String,
}

/// The kernel inventory (`kernels.toml`), consumed by the `list` command.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KernelConfig {
    #[serde(default)]
    pub kernels: Vec<KernelInfo>,
}

/// Load the kernel inventory from an explicit path.
pub fn read_kernel_config(path: &Path) -> Result<KernelConfig> {
    read_toml(path)
}

fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .map_err(|e| ProvisionError::fs("reading config", path, e))?;
    toml::from_str(&raw)
        .map_err(|e| ProvisionError::Config(format!("parsing {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn artifact_config_parses_masks() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(ARTIFACT_CONFIG_NAME),
            r#"
[[supported_kernels]]
distro_type = "ubuntu"
distro_release = "18.04"
release_mask = "4\\.15.*"

[[supported_kernels]]
distro_type = "ubuntu"
distro_release = "16.04"
release_mask = "4\\.4.*"
generic_only = false
"#,
        )
        .unwrap();

        let config = read_artifact_config(tmp.path()).unwrap();
        assert_eq!(config.supported_kernels.len(), 2);

        let first = &config.supported_kernels[0];
        assert_eq!(first.target.distro, DistroType::Ubuntu);
        assert_eq!(first.target.release, "18.04");
        assert_eq!(first.release_mask, "4\\.15.*");
        assert!(first.generic_only);

        assert!(!config.supported_kernels[1].generic_only);
    }

    #[test]
    fn missing_release_parses_as_empty() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(ARTIFACT_CONFIG_NAME),
            "[[supported_kernels]]\ndistro_type = \"ubuntu\"\nrelease_mask = \".*\"\n",
        )
        .unwrap();

        let config = read_artifact_config(tmp.path()).unwrap();
        assert!(config.supported_kernels[0].target.release.is_empty());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(ARTIFACT_CONFIG_NAME),
            "[[supported_kernels]]\ndistro_type = \"ubuntu\"\nrelease_mask = \".*\"\ntypo = 1\n",
        )
        .unwrap();

        assert!(matches!(
            read_artifact_config(tmp.path()),
            Err(ProvisionError::Config(_))
        ));
    }

    #[test]
    fn kernel_inventory_parses() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(KERNEL_CONFIG_NAME);
        fs::write(
            &path,
            r#"
[[kernels]]
distro_type = "ubuntu"
distro_release = "16.04"
kernel_release = "4.4.0-142-generic"
"#,
        )
        .unwrap();

        let config = read_kernel_config(&path).unwrap();
        assert_eq!(config.kernels.len(), 1);
        assert_eq!(config.kernels[0].kernel_release, "4.4.0-142-generic");
    }
}
