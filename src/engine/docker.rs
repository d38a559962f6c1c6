//! Docker CLI engine.

use std::path::Path;
use std::process::Command;
use std::time::Duration;

use tracing::debug;

use super::ContainerEngine;
use crate::error::{ProvisionError, Result};

/// Default wall-clock bound for discovery queries.
const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(60);

/// [`ContainerEngine`] backed by the `docker` command line client.
///
/// Build, run, and copy operations inherit whatever timeout policy the
/// daemon provides; only discovery queries carry a bound, enforced with
/// `timeout` inside the container.
#[derive(Debug, Clone)]
pub struct DockerCli {
    query_timeout: Duration,
}

impl DockerCli {
    pub fn new() -> Self {
        Self {
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    /// Override the discovery query timeout.
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    fn capture(operation: &str, cmd: &mut Command) -> Result<String> {
        debug!("invoking {operation}");
        let output = cmd.output().map_err(|e| ProvisionError::Process {
            operation: operation.to_string(),
            status: "spawn failed".to_string(),
            output: e.to_string(),
        })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            return Err(ProvisionError::Process {
                operation: operation.to_string(),
                status: output.status.to_string(),
                output: combined,
            });
        }
        Ok(combined)
    }
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerEngine for DockerCli {
    fn build_image(&self, tag: &str, context_dir: &Path) -> Result<()> {
        let mut cmd = Command::new("docker");
        cmd.args(["build", "-t", tag]).arg(context_dir);
        Self::capture(&format!("docker build -t {tag}"), &mut cmd)?;
        Ok(())
    }

    fn run(&self, image: &str, command: &str) -> Result<String> {
        let mut cmd = Command::new("docker");
        cmd.args(["run", image, "bash", "-c", command]);
        Self::capture(&format!("docker run {image}"), &mut cmd)
    }

    fn query(&self, image: &str, command: &str) -> Result<String> {
        let timeout = self.query_timeout.as_secs().to_string();
        let mut cmd = Command::new("docker");
        cmd.args(["run", image, "timeout", &timeout, "bash", "-c", command]);
        Self::capture(&format!("docker query {image}"), &mut cmd)
    }

    fn list_containers(&self) -> Result<String> {
        let mut cmd = Command::new("docker");
        cmd.args(["ps", "-a"]);
        Self::capture("docker ps -a", &mut cmd)
    }

    fn copy_from(&self, src: &str, dest: &Path) -> Result<()> {
        let mut cmd = Command::new("docker");
        cmd.arg("cp").arg(src).arg(dest);
        Self::capture(&format!("docker cp {src}"), &mut cmd)?;
        Ok(())
    }
}
