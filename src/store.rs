//! Host-side artifact store for extracted boot files.
//!
//! A flat directory accumulating kernels, initrds, and configs across
//! provisioning runs. Files are only ever added or overwritten here;
//! nothing in this pipeline prunes the store.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{ProvisionError, Result};

/// The shared boot-artifact directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

/// One extracted file, for inventory listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootArtifact {
    pub name: String,
    pub size_bytes: u64,
}

impl ArtifactStore {
    /// Open the store at `dir`, creating it if absent.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| ProvisionError::fs("creating artifact store", &dir, e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Every file currently in the store, sorted by name.
    pub fn inventory(&self) -> Result<Vec<BootArtifact>> {
        let mut artifacts = Vec::new();
        for entry in WalkDir::new(&self.dir).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let metadata = entry.metadata().map_err(|e| {
                ProvisionError::fs("reading artifact metadata", entry.path(), e.into())
            })?;
            artifacts.push(BootArtifact {
                name: entry.file_name().to_string_lossy().into_owned(),
                size_bytes: metadata.len(),
            });
        }
        artifacts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(artifacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_creates_the_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("kernels");

        let store = ArtifactStore::open(&dir).unwrap();
        assert!(dir.is_dir());
        assert!(store.inventory().unwrap().is_empty());
    }

    #[test]
    fn inventory_lists_files_sorted() {
        let tmp = TempDir::new().unwrap();
        let store = ArtifactStore::open(tmp.path().join("kernels")).unwrap();

        fs::write(store.dir().join("vmlinuz-4.15.0-45-generic"), b"kernel").unwrap();
        fs::write(store.dir().join("initrd.img-4.15.0-45-generic"), b"initrd").unwrap();

        let names: Vec<String> = store
            .inventory()
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(
            names,
            vec!["initrd.img-4.15.0-45-generic", "vmlinuz-4.15.0-45-generic"]
        );
    }
}
