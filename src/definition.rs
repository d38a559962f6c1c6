//! On-disk image definitions: the ordered instruction list behind each tag.
//!
//! A definition is a Dockerfile whose lines fully determine the image
//! contents. It is created once per target by the base builder and only
//! ever grows, one install instruction per kernel package. Rollback after a
//! failed rebuild restores the previous bytes exactly, so the file on disk
//! always describes the last image that actually built.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ProvisionError, Result};

/// The persisted build definition for one target image.
#[derive(Debug, Clone)]
pub struct ImageDefinition {
    path: PathBuf,
    content: String,
}

impl ImageDefinition {
    /// Create a definition from ordered instructions and persist it,
    /// creating parent directories as needed.
    pub fn create(path: &Path, instructions: &[String]) -> Result<Self> {
        let mut content = instructions.join("\n");
        content.push('\n');
        let definition = Self {
            path: path.to_path_buf(),
            content,
        };
        definition.persist()?;
        Ok(definition)
    }

    /// Load an existing definition.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ProvisionError::fs("reading image definition", path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            content,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw content as persisted; rollback restores exactly these bytes.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Ordered instruction lines.
    pub fn instructions(&self) -> impl Iterator<Item = &str> {
        self.content.lines()
    }

    /// Whether any instruction already references `package`.
    pub fn contains_package(&self, package: &str) -> bool {
        self.content.contains(package)
    }

    /// Append one instruction and persist.
    pub fn append(&mut self, instruction: &str) -> Result<()> {
        self.content.push_str(instruction);
        if !instruction.ends_with('\n') {
            self.content.push('\n');
        }
        self.persist()
    }

    /// Overwrite the on-disk definition with `content`, byte for byte.
    pub fn restore(path: &Path, content: &str) -> Result<()> {
        fs::write(path, content)
            .map_err(|e| ProvisionError::fs("restoring image definition", path, e))
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ProvisionError::fs("creating definition directory", parent, e))?;
        }
        fs::write(&self.path, &self.content)
            .map_err(|e| ProvisionError::fs("writing image definition", &self.path, e))
    }
}
