//! Project configuration loading.
//!
//! Each project is described by one JSON file: identity, doc source
//! location within a checkout, theme options, and the ordered list of
//! documentation versions. Loading resolves relative paths against the
//! config file so later stages only see absolute ones.
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn default_theme() -> String {
    "pocoo".to_string()
}

fn default_theme_path() -> PathBuf {
    PathBuf::from("themes")
}

fn default_pygments_style() -> String {
    "pocoo_theme_support.PocooStyle".to_string()
}

fn default_url_prefix() -> String {
    "/".to_string()
}

/// Per-project documentation descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// Stable identifier, used as a path segment for checkouts and output.
    pub id: String,
    /// Display name used in generated page titles.
    pub name: String,
    /// Location of the doc sources within a checkout.
    pub doc_path: PathBuf,
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Theme search path, resolved against the config file's directory at
    /// load time.
    #[serde(default = "default_theme_path")]
    pub theme_path: PathBuf,
    #[serde(default = "default_pygments_style")]
    pub pygments_style: String,
    /// Sidebar layout, keyed by page pattern.
    #[serde(default)]
    pub sidebars: BTreeMap<String, SidebarSpec>,
    #[serde(default = "default_url_prefix")]
    pub default_url_prefix: String,
    pub versions: Vec<VersionConfig>,
}

/// Sidebar value: a single template name or a template list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SidebarSpec {
    Template(String),
    Templates(Vec<String>),
}

/// One tracked documentation version.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionConfig {
    /// URL path segment and checkout directory suffix, unique per project.
    pub slug: String,
    pub title: String,
    /// Full version string; the generated overlay truncates this to
    /// major.minor for display.
    pub version: String,
    /// `url@branch` source spec; the rightmost `@` separates the two.
    pub repo: String,
    #[serde(rename = "type", default)]
    pub kind: VersionKind,
    #[serde(default)]
    pub note: Option<String>,
    /// Shown on rendered pages only while this version is the one built.
    #[serde(default)]
    pub warning: Option<String>,
}

impl VersionConfig {
    /// The major.minor part of the version string.
    pub fn major_minor(&self) -> String {
        self.version
            .split('.')
            .take(2)
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Version classification used by the routing fallback order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VersionKind {
    Stable,
    Unstable,
    /// Anything else, including an absent `type` key. Such versions get a
    /// direct routing block but never join the fallback priority list.
    #[default]
    Other,
}

impl<'de> Deserialize<'de> for VersionKind {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "stable" => VersionKind::Stable,
            "unstable" => VersionKind::Unstable,
            _ => VersionKind::Other,
        })
    }
}

/// Parsed `url@branch` source spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSpec {
    pub url: String,
    pub branch: String,
}

impl RepoSpec {
    /// Split on the rightmost `@` so URLs carrying userinfo
    /// (`git@host:path`) keep theirs.
    pub fn parse(repo: &str) -> Result<Self> {
        let (url, branch) = repo
            .rsplit_once('@')
            .ok_or_else(|| anyhow!("repo spec {repo:?} is missing an @branch suffix"))?;
        if url.is_empty() || branch.is_empty() {
            return Err(anyhow!("repo spec {repo:?} has an empty url or branch"));
        }
        Ok(Self {
            url: url.to_string(),
            branch: branch.to_string(),
        })
    }
}

/// Load a project config file.
pub fn load_config(path: &Path) -> Result<ProjectConfig> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let mut config: ProjectConfig = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse config {}", path.display()))?;
    if config.theme_path.is_relative() {
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.theme_path = absolutize(base.join(&config.theme_path))?;
    }
    Ok(config)
}

/// Enumerate the `*.json` config files in a folder, sorted by name.
pub fn project_configs_in(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut configs = Vec::new();
    for entry in fs::read_dir(folder).with_context(|| format!("read {}", folder.display()))? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            configs.push(path);
        }
    }
    configs.sort();
    Ok(configs)
}

/// Anchor a path to the current working directory without touching the
/// filesystem (the target may not exist yet).
pub(crate) fn absolutize(path: PathBuf) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = env::current_dir().context("resolve current directory")?;
    Ok(cwd.join(path))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
