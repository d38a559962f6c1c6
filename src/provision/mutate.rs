//! Append-only image mutation with rollback.

use tracing::{info, warn};

use crate::definition::ImageDefinition;
use crate::distro::DistroTarget;
use crate::engine::ContainerEngine;
use crate::error::Result;
use crate::paths::CacheLayout;

/// Install instruction covering a kernel image package and its headers.
fn install_instruction(package: &str) -> String {
    let headers = package.replace("image", "headers");
    format!("RUN apt-get install -y {package} {headers}")
}

/// Add `package` (and its derived headers package) to the target's image.
///
/// Returns `Ok(false)` without rebuilding when the definition already
/// references the package. On a failed rebuild the definition is restored
/// byte for byte to its pre-append state, so disk always matches the last
/// image that actually built; a failed restore surfaces as its own
/// `Filesystem` error instead of the build error.
pub fn add_kernel(
    layout: &CacheLayout,
    engine: &dyn ContainerEngine,
    target: &DistroTarget,
    package: &str,
) -> Result<bool> {
    let path = layout.definition_path(target);
    let mut definition = ImageDefinition::load(&path)?;

    if definition.contains_package(package) {
        info!("kernel {package} for {target} already present");
        return Ok(false);
    }

    info!("start adding kernel {package} for {target}");
    let snapshot = definition.content().to_string();
    definition.append(&install_instruction(package))?;

    let tag = target.image_tag();
    if let Err(build_err) = engine.build_image(&tag, &layout.definition_dir(target)) {
        warn!("rebuild with {package} for {target} failed, rolling back");
        ImageDefinition::restore(&path, &snapshot)?;
        return Err(build_err);
    }

    info!("kernel {package} for {target} added");
    Ok(true)
}
