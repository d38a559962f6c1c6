//! Boot artifact extraction from built containers.

use regex::Regex;
use tracing::info;

use crate::engine::ContainerEngine;
use crate::error::{ProvisionError, Result};
use crate::store::ArtifactStore;

/// Container path holding the boot artifacts (kernels, initrds, configs).
const BOOT_DIR: &str = "/boot/.";

/// Find the most recently created container for `tag` in a raw engine
/// listing (newest first), returning its id.
pub fn most_recent_container(listing: &str, tag: &str) -> Result<String> {
    let matcher = Regex::new(&format!(".*{}", regex::escape(tag))).map_err(|source| {
        ProvisionError::Pattern {
            mask: tag.to_string(),
            source,
        }
    })?;

    let result = matcher
        .find_iter(listing)
        .filter_map(|line| line.as_str().split_whitespace().next())
        .map(str::to_string)
        .next();

    result.ok_or_else(|| ProvisionError::NotFound {
        tag: tag.to_string(),
    })
}

/// Copy `/boot` from the newest `tag` container into the artifact store.
///
/// The image is sanity-run first; a broken image short-circuits before any
/// copy is attempted. Extraction only adds or overwrites files in the
/// store, it never removes anything.
pub fn extract_boot_artifacts(
    engine: &dyn ContainerEngine,
    store: &ArtifactStore,
    tag: &str,
) -> Result<()> {
    engine.run(tag, "ls")?;

    let listing = engine.list_containers()?;
    let container = most_recent_container(&listing, tag)?;

    info!(
        "copying boot artifacts of {tag} from container {container} into {}",
        store.dir().display()
    );
    engine.copy_from(&format!("{container}:{BOOT_DIR}"), store.dir())
}
