//! Shared helpers for CLI integration tests.

use std::path::{Path, PathBuf};
use std::process::Command;

/// Command for the compiled docbuilder binary.
pub fn docbuilder() -> Command {
    Command::new(env!("CARGO_BIN_EXE_docbuilder"))
}

/// Write a representative project config into `dir` and return its path.
///
/// The repo URLs are intentionally unreachable so build tests exercise the
/// failure path without network access.
pub fn write_sample_config(dir: &Path) -> PathBuf {
    let config = serde_json::json!({
        "id": "flask",
        "name": "Flask",
        "doc_path": "docs",
        "default_url_prefix": "/docs/flask",
        "versions": [
            {
                "slug": "2.0",
                "title": "2.0",
                "version": "2.0.1",
                "repo": "https://example.invalid/flask.git@2.0.x",
                "type": "stable"
            },
            {
                "slug": "1.1",
                "title": "1.1",
                "version": "1.1.4",
                "repo": "https://example.invalid/flask.git@1.1.x",
                "type": "stable",
                "note": "maintenance only"
            },
            {
                "slug": "dev",
                "title": "Development",
                "version": "2.1.0",
                "repo": "https://example.invalid/flask.git@main",
                "type": "unstable",
                "warning": "unreleased documentation"
            },
            {
                "slug": "0.12",
                "title": "0.12",
                "version": "0.12.5",
                "repo": "https://example.invalid/flask.git@0.12.x",
                "type": "archived"
            }
        ]
    });
    let path = dir.join("flask.json");
    std::fs::write(
        &path,
        serde_json::to_string_pretty(&config).expect("serialize config"),
    )
    .expect("write config");
    path
}
