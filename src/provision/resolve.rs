//! Kernel package discovery inside a running base image.

use regex::Regex;
use tracing::debug;

use crate::engine::ContainerEngine;
use crate::error::{ProvisionError, Result};

/// Fixed package-name prefix the version mask is appended to.
pub const KERNEL_IMAGE_PREFIX: &str = "linux-image-";

/// Name suffix identifying generic kernel variants.
pub const GENERIC_SUFFIX: &str = "generic";

/// Query listing every discoverable kernel image package, one per line.
///
/// The one-name-per-line shape is an assumption about the guest package
/// tools; if it breaks, swap the query or the engine impl, not the
/// callers.
const DISCOVERY_QUERY: &str = "apt-cache search linux-image | cut -d ' ' -f 1";

/// Discover kernel packages in `image` whose versions match `mask`.
///
/// `mask` is a caller-supplied regex fragment appended to
/// [`KERNEL_IMAGE_PREFIX`]. Matches are returned in discovery order with
/// no dedup and no sorting. Read-only; repeat calls are safe.
pub fn resolve_kernel_packages(
    engine: &dyn ContainerEngine,
    image: &str,
    mask: &str,
    generic_only: bool,
) -> Result<Vec<String>> {
    let matcher =
        Regex::new(&format!("{KERNEL_IMAGE_PREFIX}{mask}")).map_err(|source| {
            ProvisionError::Pattern {
                mask: mask.to_string(),
                source,
            }
        })?;

    let raw = engine.query(image, DISCOVERY_QUERY)?;
    debug!("discovery query returned {} bytes", raw.len());

    let mut packages = Vec::new();
    for found in matcher.find_iter(&raw) {
        let package = found.as_str();
        if generic_only && !package.ends_with(GENERIC_SUFFIX) {
            continue;
        }
        packages.push(package.to_string());
    }
    Ok(packages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fake::{EngineCall, FakeEngine};

    const LISTING: &str = "\
linux-image-4.15.0-45-generic
linux-image-4.15.0-45-lowlatency
linux-image-4.15.0-47-generic
linux-image-4.4.0-142-generic
linux-image-unsigned-4.15.0-45
";

    #[test]
    fn matches_preserve_discovery_order() {
        let engine = FakeEngine::new().with_query_output(LISTING);
        let packages =
            resolve_kernel_packages(&engine, "kernel-env-ubuntu-18.04", "4\\.15.*", false)
                .unwrap();
        assert_eq!(
            packages,
            vec![
                "linux-image-4.15.0-45-generic",
                "linux-image-4.15.0-45-lowlatency",
                "linux-image-4.15.0-47-generic",
            ]
        );
    }

    #[test]
    fn generic_results_are_a_subset() {
        let engine = FakeEngine::new().with_query_output(LISTING);
        let all = resolve_kernel_packages(&engine, "tag", "4\\..*", false).unwrap();
        let generic = resolve_kernel_packages(&engine, "tag", "4\\..*", true).unwrap();

        assert!(!generic.is_empty());
        assert!(generic.iter().all(|pkg| all.contains(pkg)));
        assert!(generic.iter().all(|pkg| pkg.ends_with(GENERIC_SUFFIX)));
    }

    #[test]
    fn invalid_mask_is_a_pattern_error() {
        let engine = FakeEngine::new().with_query_output(LISTING);
        let err = resolve_kernel_packages(&engine, "tag", "4\\.15[", false).unwrap_err();
        assert!(matches!(err, ProvisionError::Pattern { .. }));
    }

    #[test]
    fn no_matches_is_an_empty_list() {
        let engine = FakeEngine::new().with_query_output(LISTING);
        let packages = resolve_kernel_packages(&engine, "tag", "5\\.0.*", true).unwrap();
        assert!(packages.is_empty());
    }

    #[test]
    fn discovery_runs_inside_the_base_image() {
        let engine = FakeEngine::new().with_query_output(LISTING);
        resolve_kernel_packages(&engine, "kernel-env-ubuntu-18.04", ".*", true).unwrap();
        assert_eq!(
            engine.calls(),
            vec![EngineCall::Query {
                image: "kernel-env-ubuntu-18.04".to_string()
            }]
        );
    }
}
