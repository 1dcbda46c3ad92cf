//! Generated Sphinx configuration overlays.
//!
//! A build never edits the project's own conf.py. The generator is pointed
//! at a scratch directory holding a conf.py that sources the project's
//! configuration and then applies a fixed set of overrides. Every
//! interpolated value goes through a Python-literal encoder, so no raw text
//! is ever spliced into the generated code.
use anyhow::{anyhow, Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::config::{ProjectConfig, SidebarSpec, VersionConfig};

/// Overlay configuration for building one version of one project.
pub struct Overlay<'a> {
    project: &'a ProjectConfig,
    version: &'a VersionConfig,
    /// Absolute path of the doc sources inside the checkout.
    doc_source: &'a Path,
}

impl<'a> Overlay<'a> {
    pub fn new(project: &'a ProjectConfig, version: &'a VersionConfig, doc_source: &'a Path) -> Self {
        Self {
            project,
            version,
            doc_source,
        }
    }

    /// Render the overlay conf.py.
    pub fn render(&self) -> Result<String> {
        let theme_path = py_path(&self.project.theme_path)?;
        let real_path = py_path(self.doc_source)?;

        let mut out = String::new();
        push_line(&mut out, "import os");
        push_line(&mut out, "import sys");
        push_line(&mut out, "");
        push_line(&mut out, &format!("sys.path.insert(0, {theme_path})"));
        push_line(
            &mut out,
            "sys.path[:] = [os.path.abspath(x) for x in sys.path]",
        );
        push_line(&mut out, "");
        push_line(
            &mut out,
            "# Source the project's own configuration, then re-anchor the paths",
        );
        push_line(&mut out, "# it resolved relative to its directory.");
        push_line(&mut out, "_old_file = __file__");
        push_line(&mut out, "__file__ = 'conf.py'");
        push_line(&mut out, "_here = os.getcwd()");
        push_line(&mut out, &format!("_real_path = {real_path}"));
        push_line(&mut out, "os.chdir(_real_path)");
        push_line(
            &mut out,
            "exec(compile(open('conf.py', 'rb').read(), 'conf.py', 'exec'))",
        );
        push_line(
            &mut out,
            "sys.path[:] = [os.path.abspath(x) for x in sys.path]",
        );
        push_line(&mut out, "os.chdir(_here)");
        push_line(
            &mut out,
            "html_static_path = [os.path.join(_real_path, _x) for _x in html_static_path]",
        );
        push_line(&mut out, "__file__ = _old_file");
        push_line(&mut out, "");
        push_line(&mut out, "# Overrides");
        push_line(&mut out, "html_favicon = None");
        push_line(&mut out, &format!("project = {}", py_str(&self.project.name)));
        push_line(
            &mut out,
            &format!("version = {}", py_str(&self.version.major_minor())),
        );
        push_line(
            &mut out,
            &format!("release = {}", py_str(&self.version.version)),
        );
        push_line(&mut out, "");
        push_line(&mut out, "templates_path = []");
        push_line(
            &mut out,
            "html_title = '%s Documentation (%s)' % (project, version)",
        );
        push_line(
            &mut out,
            &format!("html_theme = {}", py_str(&self.project.theme)),
        );
        push_line(&mut out, "html_theme_options = {}");
        push_line(&mut out, &format!("html_theme_path = [{theme_path}]"));
        push_line(
            &mut out,
            &format!("html_sidebars = {}", sidebars_literal(&self.project.sidebars)),
        );
        push_line(
            &mut out,
            &format!(
                "html_context = {}",
                context_literal(self.project, &self.version.slug)
            ),
        );
        push_line(&mut out, "");
        push_line(
            &mut out,
            &format!("pygments_style = {}", py_str(&self.project.pygments_style)),
        );
        Ok(out)
    }

    /// Write the rendered conf.py into `dir`.
    pub fn write_into(&self, dir: &Path) -> Result<()> {
        let rendered = self.render()?;
        let conf_path = dir.join("conf.py");
        fs::write(&conf_path, rendered)
            .with_context(|| format!("write {}", conf_path.display()))?;
        Ok(())
    }
}

/// The `html_context` payload: every version annotated with an
/// `is_current` flag, plus the building version's warning text.
fn context_literal(project: &ProjectConfig, current_slug: &str) -> String {
    let mut entries = Vec::new();
    let mut warning = None;
    for version in &project.versions {
        let is_current = version.slug == current_slug;
        if is_current {
            warning = version.warning.as_deref();
        }
        entries.push(format!(
            "{{'slug': {}, 'title': {}, 'note': {}, 'is_current': {}}}",
            py_str(&version.slug),
            py_str(&version.title),
            py_opt_str(version.note.as_deref()),
            py_bool(is_current),
        ));
    }
    format!(
        "{{'documentation_versions': [{}], 'documentation_version_warning': {}}}",
        entries.join(", "),
        py_opt_str(warning),
    )
}

fn sidebars_literal(sidebars: &BTreeMap<String, SidebarSpec>) -> String {
    let entries: Vec<String> = sidebars
        .iter()
        .map(|(pattern, spec)| {
            let value = match spec {
                SidebarSpec::Template(name) => py_str(name),
                SidebarSpec::Templates(names) => py_str_list(names),
            };
            format!("{}: {}", py_str(pattern), value)
        })
        .collect();
    format!("{{{}}}", entries.join(", "))
}

fn py_str(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

fn py_opt_str(value: Option<&str>) -> String {
    match value {
        Some(value) => py_str(value),
        None => "None".to_string(),
    }
}

fn py_str_list(values: &[String]) -> String {
    let rendered: Vec<String> = values.iter().map(|value| py_str(value)).collect();
    format!("[{}]", rendered.join(", "))
}

fn py_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

fn py_path(path: &Path) -> Result<String> {
    let value = path
        .to_str()
        .ok_or_else(|| anyhow!("path {} is not valid UTF-8", path.display()))?;
    Ok(py_str(value))
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

#[cfg(test)]
#[path = "overlay_tests.rs"]
mod tests;
