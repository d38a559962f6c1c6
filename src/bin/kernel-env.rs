use std::env;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use kernel_env::config::{self, read_artifact_config, read_kernel_config};
use kernel_env::provision::{provision, ManualRegistry, ProvisionReport};
use kernel_env::{ArtifactStore, CacheLayout, DockerCli};

fn usage() -> &'static str {
    "Usage:\n  kernel-env list [kernels-toml]\n  kernel-env provision [work-dir] [--cache-root <dir>] [--json]\n  kernel-env status [--cache-root <dir>]"
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    match args.as_slice() {
        [cmd] if cmd == "list" => list_kernels(Path::new(config::KERNEL_CONFIG_NAME)),
        [cmd, path] if cmd == "list" => list_kernels(Path::new(path)),
        [cmd, rest @ ..] if cmd == "provision" => run_provision(rest),
        [cmd, rest @ ..] if cmd == "status" => show_status(rest),
        _ => bail!(usage()),
    }
}

fn list_kernels(path: &Path) -> Result<()> {
    let kcfg = read_kernel_config(path)
        .with_context(|| format!("loading kernel inventory from '{}'", path.display()))?;
    if kcfg.kernels.is_empty() {
        bail!("No kernels found");
    }
    for kernel in &kcfg.kernels {
        println!(
            "{} {} {}",
            kernel.distro_type, kernel.distro_release, kernel.kernel_release
        );
    }
    Ok(())
}

fn run_provision(rest: &[String]) -> Result<()> {
    let mut work_dir = PathBuf::from(".");
    let mut cache_root: Option<PathBuf> = None;
    let mut json = false;

    let mut args = rest.iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--cache-root" => {
                let value = args.next().context("missing value for --cache-root")?;
                cache_root = Some(PathBuf::from(value));
            }
            other if !other.starts_with('-') => work_dir = PathBuf::from(other),
            other => bail!("unknown argument '{}'\n{}", other, usage()),
        }
    }

    kernel_env::preflight::check_host_tools()?;

    let layout = CacheLayout::new(resolve_cache_root(cache_root)?);
    let store = ArtifactStore::open(layout.kernels_dir())?;
    let masks = read_artifact_config(&work_dir)
        .with_context(|| {
            format!(
                "loading {} from '{}'",
                config::ARTIFACT_CONFIG_NAME,
                work_dir.display()
            )
        })?
        .supported_kernels;

    let engine = DockerCli::new();
    let report = provision(&layout, &engine, &store, &masks, &ManualRegistry)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }
    Ok(())
}

fn print_summary(report: &ProvisionReport) {
    for target in &report.targets {
        match &target.error {
            Some(err) => println!("[{}] FAILED: {}", target.tag, err),
            None => println!(
                "[{}] installed {}, already present {}, failed {}",
                target.tag,
                target.installed.len(),
                target.already_present.len(),
                target.failed_packages.len()
            ),
        }
    }
    for extraction in &report.extractions {
        match &extraction.error {
            Some(err) => println!("[{}] extraction FAILED: {}", extraction.tag, err),
            None => println!("[{}] boot artifacts extracted", extraction.tag),
        }
    }
    println!("Consolidating kernels.toml is a manual follow-up step.");
}

fn show_status(rest: &[String]) -> Result<()> {
    let mut cache_root: Option<PathBuf> = None;
    let mut args = rest.iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--cache-root" => {
                let value = args.next().context("missing value for --cache-root")?;
                cache_root = Some(PathBuf::from(value));
            }
            other => bail!("unknown argument '{}'\n{}", other, usage()),
        }
    }

    let layout = CacheLayout::new(resolve_cache_root(cache_root)?);
    let store = ArtifactStore::open(layout.kernels_dir())?;
    let inventory = store.inventory()?;

    if inventory.is_empty() {
        println!("Artifact store {} is empty", store.dir().display());
        return Ok(());
    }

    println!("Artifact store: {}", store.dir().display());
    for artifact in inventory {
        println!("  {:>12}  {}", artifact.size_bytes, artifact.name);
    }
    Ok(())
}

/// Resolution order: explicit flag, `KERNEL_ENV_CACHE`, then `~/.kernel-env`.
fn resolve_cache_root(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(root) = explicit {
        return Ok(root);
    }
    if let Ok(env_root) = env::var("KERNEL_ENV_CACHE") {
        if !env_root.is_empty() {
            return Ok(PathBuf::from(env_root));
        }
    }
    kernel_env::paths::default_root()
        .context("could not resolve a home directory; pass --cache-root")
}
