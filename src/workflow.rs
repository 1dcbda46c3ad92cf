//! Command implementations gluing config, checkout, overlay, and the
//! generator together.
//!
//! Builds are sequential and blocking. A failing version is reported and
//! skipped so the remaining versions still build; the command exits
//! non-zero if anything failed.
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::checkout::ensure_checkout;
use crate::cli::{BuildAllArgs, BuildArgs, NginxConfigArgs};
use crate::config::{self, ProjectConfig, RepoSpec, VersionConfig};
use crate::nginx::generate_routing_config;
use crate::overlay::Overlay;
use crate::sphinx::{resolve_sphinx_build, run_sphinx_build, SphinxFormat, SphinxInvocation};

pub fn run_build(args: BuildArgs) -> Result<()> {
    let project = config::load_config(&args.config)?;
    let sphinx_build = resolve_sphinx_build(&args.sphinx_build)?;
    let output_folder = args
        .output
        .unwrap_or_else(|| default_output_folder(&project.id));
    let failed = build_project(&project, &output_folder, &args.checkout_folder, &sphinx_build)?;
    report_failures(&failed)
}

pub fn run_build_all(args: BuildAllArgs) -> Result<()> {
    let config_paths = config::project_configs_in(&args.config_folder)?;
    if config_paths.is_empty() {
        return Err(anyhow!(
            "no *.json configs under {}",
            args.config_folder.display()
        ));
    }
    let sphinx_build = resolve_sphinx_build(&args.sphinx_build)?;

    let mut failed = Vec::new();
    for config_path in config_paths {
        let project = config::load_config(&config_path)?;
        let output_folder = args.build_folder.join(&project.id);
        for slug in build_project(&project, &output_folder, &args.checkout_folder, &sphinx_build)? {
            failed.push(format!("{} {slug}", project.id));
        }
        write_routing_config(&project, &output_folder)?;
    }
    report_failures(&failed)
}

pub fn run_nginx_config(args: NginxConfigArgs) -> Result<()> {
    let project = config::load_config(&args.config)?;
    let output_path = args
        .path
        .unwrap_or_else(|| default_output_folder(&project.id));
    let rules = generate_routing_config(&project, &output_path, args.url_prefix.as_deref());
    print!("{rules}");
    Ok(())
}

fn default_output_folder(id: &str) -> PathBuf {
    Path::new("build").join(id)
}

/// Build every version of one project, continuing past failures. Returns
/// the slugs that failed.
fn build_project(
    project: &ProjectConfig,
    output_folder: &Path,
    checkout_folder: &Path,
    sphinx_build: &Path,
) -> Result<Vec<String>> {
    let mut failed = Vec::new();
    for version in &project.versions {
        println!("building {} {}", project.id, version.slug);
        let version_output = output_folder.join(&version.slug);
        if let Err(err) =
            build_version(project, version, &version_output, checkout_folder, sphinx_build)
        {
            eprintln!("error: {} {}: {err:#}", project.id, version.slug);
            failed.push(version.slug.clone());
        }
    }
    Ok(failed)
}

fn build_version(
    project: &ProjectConfig,
    version: &VersionConfig,
    output_folder: &Path,
    checkout_folder: &Path,
    sphinx_build: &Path,
) -> Result<()> {
    let repo = RepoSpec::parse(&version.repo)?;
    let version_checkout = checkout_folder.join(format!("{}-{}", project.id, version.slug));
    ensure_checkout(&version_checkout, &repo)?;

    // The child runs inside the doc sources, so everything it receives
    // must be anchored first.
    let version_checkout = config::absolutize(version_checkout)?;
    let doc_source = version_checkout.join(&project.doc_path);
    if !doc_source.is_dir() {
        return Err(anyhow!(
            "doc path {} missing in checkout",
            doc_source.display()
        ));
    }
    let output_folder = config::absolutize(output_folder.to_path_buf())?;

    // Removed on every exit path once the handle drops.
    let overlay_dir = TempDir::with_prefix(".versionoverlay")
        .context("create overlay directory")?;
    Overlay::new(project, version, &doc_source).write_into(overlay_dir.path())?;

    let invocation = SphinxInvocation {
        sphinx_build,
        doc_source: &doc_source,
        overlay_dir: overlay_dir.path(),
        output: &output_folder,
        pythonpath: &version_checkout,
    };
    for format in SphinxFormat::ALL {
        run_sphinx_build(&invocation, format)?;
    }
    Ok(())
}

/// build-all leaves a ready-to-include nginx.conf alongside each project's
/// output, generated with the config's default URL prefix.
fn write_routing_config(project: &ProjectConfig, output_folder: &Path) -> Result<()> {
    let output_abs = config::absolutize(output_folder.to_path_buf())?;
    let rules = generate_routing_config(project, &output_abs, None);
    fs::create_dir_all(output_folder)
        .with_context(|| format!("create {}", output_folder.display()))?;
    let rules_path = output_folder.join("nginx.conf");
    fs::write(&rules_path, rules).with_context(|| format!("write {}", rules_path.display()))?;
    println!("wrote {}", rules_path.display());
    Ok(())
}

fn report_failures(failed: &[String]) -> Result<()> {
    if failed.is_empty() {
        return Ok(());
    }
    Err(anyhow!(
        "{} version build(s) failed: {}",
        failed.len(),
        failed.join(", ")
    ))
}
