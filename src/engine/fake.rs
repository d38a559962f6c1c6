//! Scripted in-memory engine for tests.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use super::ContainerEngine;
use crate::error::{ProvisionError, Result};

/// Calls recorded by [`FakeEngine`], in invocation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Build { tag: String, context_dir: PathBuf },
    Run { image: String },
    Query { image: String },
    ListContainers,
    CopyFrom { src: String, dest: PathBuf },
}

/// In-memory [`ContainerEngine`] with scripted responses and a call log.
#[derive(Default)]
pub struct FakeEngine {
    calls: RefCell<Vec<EngineCall>>,
    query_output: String,
    container_listing: String,
    /// Build invocations with index >= this fail.
    fail_builds_from: Option<usize>,
    fail_runs: bool,
    /// File names materialized into the destination on `copy_from`.
    boot_files: Vec<String>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query_output(mut self, output: &str) -> Self {
        self.query_output = output.to_string();
        self
    }

    pub fn with_container_listing(mut self, listing: &str) -> Self {
        self.container_listing = listing.to_string();
        self
    }

    pub fn fail_builds_from(mut self, index: usize) -> Self {
        self.fail_builds_from = Some(index);
        self
    }

    pub fn fail_runs(mut self) -> Self {
        self.fail_runs = true;
        self
    }

    pub fn with_boot_files(mut self, files: &[&str]) -> Self {
        self.boot_files = files.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.borrow().clone()
    }

    pub fn build_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, EngineCall::Build { .. }))
            .count()
    }

    pub fn copy_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, EngineCall::CopyFrom { .. }))
            .count()
    }

    fn process_failure(operation: &str) -> ProvisionError {
        ProvisionError::Process {
            operation: operation.to_string(),
            status: "exit status: 1".to_string(),
            output: "E: scripted failure".to_string(),
        }
    }
}

impl ContainerEngine for FakeEngine {
    fn build_image(&self, tag: &str, context_dir: &Path) -> Result<()> {
        let index = self.build_count();
        self.calls.borrow_mut().push(EngineCall::Build {
            tag: tag.to_string(),
            context_dir: context_dir.to_path_buf(),
        });
        if self.fail_builds_from.is_some_and(|from| index >= from) {
            return Err(Self::process_failure(&format!("docker build -t {tag}")));
        }
        Ok(())
    }

    fn run(&self, image: &str, _command: &str) -> Result<String> {
        self.calls.borrow_mut().push(EngineCall::Run {
            image: image.to_string(),
        });
        if self.fail_runs {
            return Err(Self::process_failure(&format!("docker run {image}")));
        }
        Ok(String::new())
    }

    fn query(&self, image: &str, _command: &str) -> Result<String> {
        self.calls.borrow_mut().push(EngineCall::Query {
            image: image.to_string(),
        });
        Ok(self.query_output.clone())
    }

    fn list_containers(&self) -> Result<String> {
        self.calls.borrow_mut().push(EngineCall::ListContainers);
        Ok(self.container_listing.clone())
    }

    fn copy_from(&self, src: &str, dest: &Path) -> Result<()> {
        self.calls.borrow_mut().push(EngineCall::CopyFrom {
            src: src.to_string(),
            dest: dest.to_path_buf(),
        });
        fs::create_dir_all(dest).map_err(|e| ProvisionError::fs("creating store", dest, e))?;
        for file in &self.boot_files {
            fs::write(dest.join(file), b"boot artifact")
                .map_err(|e| ProvisionError::fs("writing artifact", dest.join(file), e))?;
        }
        Ok(())
    }
}
