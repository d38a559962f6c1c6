//! The provisioning pipeline.
//!
//! [`provision`] drives, per configured mask: base image, package
//! discovery, one image mutation per discovered package, and a final
//! artifact extraction sweep over every touched tag. Per-target failures
//! are recorded in the returned [`ProvisionReport`] and never abort
//! siblings; only malformed configuration is fatal.

pub mod base;
pub mod extract;
pub mod mutate;
pub mod resolve;

use serde::Serialize;
use tracing::{info, warn};

use crate::distro::KernelMask;
use crate::engine::ContainerEngine;
use crate::error::{ProvisionError, Result};
use crate::paths::CacheLayout;
use crate::store::ArtifactStore;

pub use base::ensure_base;
pub use extract::extract_boot_artifacts;
pub use mutate::add_kernel;
pub use resolve::resolve_kernel_packages;

/// One kernel package that failed to install into an image.
#[derive(Debug, Clone, Serialize)]
pub struct PackageFailure {
    pub package: String,
    pub reason: String,
}

/// Outcome of processing one configured mask.
#[derive(Debug, Clone, Serialize)]
pub struct TargetReport {
    pub distro: String,
    pub release: String,
    pub tag: String,
    /// Packages newly installed into the image.
    pub installed: Vec<String>,
    /// Packages already present in the definition; no rebuild happened.
    pub already_present: Vec<String>,
    pub failed_packages: Vec<PackageFailure>,
    /// Set when the target failed before any package could be processed.
    pub error: Option<String>,
}

/// Outcome of one artifact extraction.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractReport {
    pub tag: String,
    pub error: Option<String>,
}

/// Everything a provisioning run did, per target and per touched tag.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProvisionReport {
    pub targets: Vec<TargetReport>,
    pub extractions: Vec<ExtractReport>,
}

impl ProvisionReport {
    /// True when every target and extraction completed without failures.
    pub fn is_clean(&self) -> bool {
        self.targets
            .iter()
            .all(|t| t.error.is_none() && t.failed_packages.is_empty())
            && self.extractions.iter().all(|e| e.error.is_none())
    }
}

/// Consolidation hook for the final kernel registry artifact.
///
/// Producing the registry is deliberately not automated; the default
/// implementation only reminds the operator.
pub trait RegistryWriter {
    fn consolidate(&self, report: &ProvisionReport) -> Result<()>;
}

/// Default hook: consolidation stays a manual follow-up step.
pub struct ManualRegistry;

impl RegistryWriter for ManualRegistry {
    fn consolidate(&self, _report: &ProvisionReport) -> Result<()> {
        info!("generation of the kernel registry is not automated");
        info!("consolidating kernels.toml is up to you");
        Ok(())
    }
}

/// Provision every configured mask and extract boot artifacts for each
/// touched image tag.
///
/// Masks with an empty release abort the whole run before any image is
/// built, regardless of their position in the list.
pub fn provision(
    layout: &CacheLayout,
    engine: &dyn ContainerEngine,
    store: &ArtifactStore,
    masks: &[KernelMask],
    registry: &dyn RegistryWriter,
) -> Result<ProvisionReport> {
    for mask in masks {
        if mask.target.release.trim().is_empty() {
            return Err(ProvisionError::Config(format!(
                "distro_release must be set for every {} mask",
                mask.target.distro
            )));
        }
    }

    let mut report = ProvisionReport::default();
    let mut touched: Vec<String> = Vec::new();

    for mask in masks {
        let target = &mask.target;
        let tag = target.image_tag();
        let mut entry = TargetReport {
            distro: target.distro.to_string(),
            release: target.release.clone(),
            tag: tag.clone(),
            installed: Vec::new(),
            already_present: Vec::new(),
            failed_packages: Vec::new(),
            error: None,
        };

        match provision_target(layout, engine, mask, &mut entry) {
            Ok(()) => {
                if !touched.contains(&tag) {
                    touched.push(tag);
                }
            }
            Err(err) => {
                warn!("provisioning {target} failed: {err}");
                entry.error = Some(err.to_string());
            }
        }
        report.targets.push(entry);
    }

    for tag in &touched {
        let error = match extract_boot_artifacts(engine, store, tag) {
            Ok(()) => None,
            Err(err) => {
                warn!("extracting boot artifacts of {tag} failed: {err}");
                Some(err.to_string())
            }
        };
        report.extractions.push(ExtractReport {
            tag: tag.clone(),
            error,
        });
    }

    registry.consolidate(&report)?;
    Ok(report)
}

fn provision_target(
    layout: &CacheLayout,
    engine: &dyn ContainerEngine,
    mask: &KernelMask,
    entry: &mut TargetReport,
) -> Result<()> {
    let target = &mask.target;
    ensure_base(layout, engine, target)?;

    let packages =
        resolve_kernel_packages(engine, &entry.tag, &mask.release_mask, mask.generic_only)?;
    info!("found {} kernel packages for {target}", packages.len());

    for package in packages {
        match add_kernel(layout, engine, target, &package) {
            Ok(true) => entry.installed.push(package),
            Ok(false) => entry.already_present.push(package),
            Err(err) => {
                warn!("skipping kernel {package} for {target}: {err}");
                entry.failed_packages.push(PackageFailure {
                    package,
                    reason: err.to_string(),
                });
            }
        }
    }
    Ok(())
}
