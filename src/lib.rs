//! Disposable, versioned Linux-kernel build/test environments in containers.
//!
//! Given a target distribution, release, and kernel-version mask, kernel-env
//! builds a container image holding every matching kernel package and pulls
//! the resulting boot artifacts into a host-side store for later use by
//! module and exploit test runners.
//!
//! # Architecture
//!
//! ```text
//! provision (orchestrator)
//!     │
//!     ├── ensure_base ──── per-distro recipe → cached image definition
//!     ├── resolve ──────── package discovery inside the base image
//!     ├── add_kernel ───── append install instruction and rebuild,
//!     │                    rolling back the definition on failure
//!     └── extract ──────── copy /boot from the newest tagged container
//! ```
//!
//! Image definitions live under an injected cache root, one per
//! `{distro}/{release}`; extracted kernels accumulate in a shared store
//! directory that this pipeline never prunes. All engine invocations are
//! synchronous and sequential; failure recovery relies on idempotent
//! replays instead of retries.

pub mod config;
pub mod definition;
pub mod distro;
pub mod engine;
pub mod error;
pub mod paths;
pub mod preflight;
pub mod provision;
pub mod recipe;
pub mod store;

pub use distro::{DistroTarget, DistroType, KernelMask};
pub use engine::{ContainerEngine, DockerCli};
pub use error::ProvisionError;
pub use paths::CacheLayout;
pub use provision::{provision, ManualRegistry, ProvisionReport, RegistryWriter};
pub use store::ArtifactStore;
