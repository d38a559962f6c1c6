//! Preflight checks for host validation.
//!
//! Validates that the container engine is present before provisioning
//! starts. This prevents cryptic mid-pipeline errors.

use anyhow::{bail, Result};

/// Tools the pipeline shells out to, as (command, package) pairs.
pub const REQUIRED_TOOLS: &[(&str, &str)] = &[("docker", "docker.io")];

/// Check if a command exists on the host system.
pub fn command_exists(cmd: &str) -> bool {
    which::which(cmd).is_ok()
}

/// Check that specific tools are available.
///
/// # Returns
///
/// * `Ok(())` if all tools are found
/// * `Err` with the list of missing tools and their packages
pub fn check_required_tools(tools: &[(&str, &str)]) -> Result<()> {
    let missing: Vec<_> = tools
        .iter()
        .filter(|(tool, _)| !command_exists(tool))
        .collect();

    if !missing.is_empty() {
        let msg = missing
            .iter()
            .map(|(t, p)| format!("  {} (install: {})", t, p))
            .collect::<Vec<_>>()
            .join("\n");
        bail!("Missing required host tools:\n{}", msg);
    }

    Ok(())
}

/// Check that everything in [`REQUIRED_TOOLS`] is available.
pub fn check_host_tools() -> Result<()> {
    check_required_tools(REQUIRED_TOOLS)
}
