use super::Overlay;
use crate::config::{ProjectConfig, SidebarSpec, VersionConfig, VersionKind};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

fn version(slug: &str, warning: Option<&str>) -> VersionConfig {
    VersionConfig {
        slug: slug.to_string(),
        title: format!("Version {slug}"),
        version: "1.2.3".to_string(),
        repo: "https://example.invalid/repo.git@main".to_string(),
        kind: VersionKind::Stable,
        note: None,
        warning: warning.map(str::to_string),
    }
}

fn project(versions: Vec<VersionConfig>) -> ProjectConfig {
    ProjectConfig {
        id: "proj".to_string(),
        name: "Proj".to_string(),
        doc_path: PathBuf::from("docs"),
        theme: "pocoo".to_string(),
        theme_path: PathBuf::from("/srv/themes"),
        pygments_style: "tango".to_string(),
        sidebars: BTreeMap::new(),
        default_url_prefix: "/proj".to_string(),
        versions,
    }
}

fn render(config: &ProjectConfig, slug: &str) -> String {
    let version = config
        .versions
        .iter()
        .find(|version| version.slug == slug)
        .expect("version in config");
    Overlay::new(config, version, Path::new("/abs/checkout/docs"))
        .render()
        .expect("render overlay")
}

#[test]
fn marks_only_the_built_version_current() {
    let config = project(vec![version("1.0", None), version("dev", Some("unreleased"))]);
    let rendered = render(&config, "dev");
    assert!(rendered.contains("{'slug': '1.0', 'title': 'Version 1.0', 'note': None, 'is_current': False}"));
    assert!(rendered.contains("{'slug': 'dev', 'title': 'Version dev', 'note': None, 'is_current': True}"));
    assert!(rendered.contains("'documentation_version_warning': 'unreleased'"));
}

#[test]
fn warning_only_applies_to_the_built_version() {
    let config = project(vec![version("1.0", None), version("dev", Some("unreleased"))]);
    let rendered = render(&config, "1.0");
    assert!(rendered.contains("'documentation_version_warning': None"));
}

#[test]
fn truncates_version_and_keeps_full_release() {
    let config = project(vec![version("1.2", None)]);
    let rendered = render(&config, "1.2");
    assert!(rendered.contains("version = '1.2'"));
    assert!(rendered.contains("release = '1.2.3'"));
    assert!(rendered.contains("html_title = '%s Documentation (%s)' % (project, version)"));
}

#[test]
fn escapes_python_string_values() {
    let mut config = project(vec![version("1.0", None)]);
    config.name = "It's a Proj".to_string();
    let rendered = render(&config, "1.0");
    assert!(rendered.contains(r"project = 'It\'s a Proj'"));
}

#[test]
fn renders_theme_and_search_path() {
    let config = project(vec![version("1.0", None)]);
    let rendered = render(&config, "1.0");
    assert!(rendered.contains("sys.path.insert(0, '/srv/themes')"));
    assert!(rendered.contains("html_theme = 'pocoo'"));
    assert!(rendered.contains("html_theme_path = ['/srv/themes']"));
    assert!(rendered.contains("pygments_style = 'tango'"));
    assert!(rendered.contains("_real_path = '/abs/checkout/docs'"));
}

#[test]
fn renders_both_sidebar_forms() {
    let mut config = project(vec![version("1.0", None)]);
    config.sidebars.insert(
        "**".to_string(),
        SidebarSpec::Templates(vec!["sidebar.html".to_string(), "links.html".to_string()]),
    );
    config
        .sidebars
        .insert("index".to_string(), SidebarSpec::Template("front.html".to_string()));
    let rendered = render(&config, "1.0");
    assert!(rendered.contains("'**': ['sidebar.html', 'links.html']"));
    assert!(rendered.contains("'index': 'front.html'"));
}

#[test]
fn writes_conf_py_into_directory() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = project(vec![version("1.0", None)]);
    let overlay_version = &config.versions[0];
    Overlay::new(&config, overlay_version, Path::new("/abs/checkout/docs"))
        .write_into(dir.path())
        .expect("write overlay");
    let written = std::fs::read_to_string(dir.path().join("conf.py")).expect("read conf.py");
    assert!(written.contains("project = 'Proj'"));
}
