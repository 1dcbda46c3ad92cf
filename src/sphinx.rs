//! Invocation of the external documentation generator.
//!
//! sphinx-build is treated as an opaque executable: the orchestrator hands
//! it a source directory, an overlay config directory, and an output
//! folder, and inspects nothing but the exit status.
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

/// Output formats produced for every version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SphinxFormat {
    /// Directory-per-page HTML tree.
    Dirhtml,
    /// JSON rendition of the same pages, consumed by search indexing.
    Json,
}

impl SphinxFormat {
    pub const ALL: [SphinxFormat; 2] = [SphinxFormat::Dirhtml, SphinxFormat::Json];

    fn builder_name(self) -> &'static str {
        match self {
            SphinxFormat::Dirhtml => "dirhtml",
            SphinxFormat::Json => "json",
        }
    }
}

/// Resolve the generator executable up front so a missing install fails
/// with a clear message instead of a spawn error halfway through a run.
pub fn resolve_sphinx_build(name: &str) -> Result<PathBuf> {
    which::which(name).with_context(|| format!("locate documentation generator {name:?}"))
}

/// One generator run against a version's doc sources. All paths must be
/// absolute because the child runs with `doc_source` as its working
/// directory.
pub struct SphinxInvocation<'a> {
    pub sphinx_build: &'a Path,
    pub doc_source: &'a Path,
    pub overlay_dir: &'a Path,
    pub output: &'a Path,
    /// Checkout root, exported as PYTHONPATH so project-local extensions
    /// and theme support import cleanly.
    pub pythonpath: &'a Path,
}

pub fn run_sphinx_build(invocation: &SphinxInvocation<'_>, format: SphinxFormat) -> Result<()> {
    let doctrees = invocation.doc_source.join(".doctrees");
    let start = Instant::now();
    let output = Command::new(invocation.sphinx_build)
        .arg("-d")
        .arg(doctrees)
        .arg("-b")
        .arg(format.builder_name())
        .arg("-c")
        .arg(invocation.overlay_dir)
        .arg(".")
        .arg(invocation.output)
        .current_dir(invocation.doc_source)
        .env("PYTHONPATH", invocation.pythonpath)
        .output()
        .with_context(|| format!("run {}", invocation.sphinx_build.display()))?;
    let elapsed_ms = start.elapsed().as_millis();

    tracing::info!(
        builder = format.builder_name(),
        elapsed_ms,
        "sphinx-build complete"
    );

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = stderr
            .trim()
            .lines()
            .next_back()
            .map(str::to_string)
            .filter(|line| !line.is_empty())
            .unwrap_or_else(|| format!("status {}", output.status));
        return Err(anyhow!(
            "sphinx-build -b {} failed: {detail}",
            format.builder_name()
        ));
    }
    Ok(())
}
