//! Per-distro base-image instruction templates.
//!
//! Each supported distribution family provides a [`BaseRecipe`] expanding a
//! target into the ordered instruction list for its base image: the stock
//! release image plus build tooling, no kernel packages yet. Families
//! without a template are rejected with a typed error before anything
//! touches disk.

pub mod ubuntu;

use crate::distro::{DistroTarget, DistroType};
use crate::error::{ProvisionError, Result};

/// Marker line opening the generated base section of a definition.
pub const BASE_HEADER: &str = "# BASE";

/// Marker line closing the generated base section.
pub const BASE_FOOTER: &str = "# END BASE";

/// A base-image instruction generator for one distribution family.
pub trait BaseRecipe {
    /// Ordered build instructions for the base image of `target`.
    fn instructions(&self, target: &DistroTarget) -> Vec<String>;
}

/// Look up the recipe for a distribution family.
pub fn recipe_for(distro: DistroType) -> Result<&'static dyn BaseRecipe> {
    match distro {
        DistroType::Ubuntu => Ok(&ubuntu::UbuntuRecipe),
        other => Err(ProvisionError::UnsupportedDistro { distro: other }),
    }
}
