//! Shallow git checkout management.
//!
//! Each (project, version) pair owns one working copy: cloned on first
//! build, then fetched, hard-reset, and checked out again on every later
//! build. History depth stays at 1 throughout.
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::Path;
use std::process::Command;

use crate::config::RepoSpec;

/// Ensure `folder` holds a shallow working copy of `repo` at its branch
/// HEAD, discarding any local modifications.
pub fn ensure_checkout(folder: &Path, repo: &RepoSpec) -> Result<()> {
    if let Some(parent) = folder.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
    }

    if folder.join(".git").is_dir() {
        tracing::debug!(folder = %folder.display(), branch = %repo.branch, "updating checkout");
        let refspec = format!("{0}:{0}", repo.branch);
        run_git(
            folder,
            &[
                "fetch",
                "origin",
                &refspec,
                "--update-head-ok",
                "--depth",
                "1",
            ],
        )?;
        run_git(folder, &["reset", "--hard"])?;
        run_git(folder, &["checkout", &repo.branch])?;
    } else {
        tracing::debug!(folder = %folder.display(), url = %repo.url, branch = %repo.branch, "cloning");
        let folder_str = folder
            .to_str()
            .ok_or_else(|| anyhow!("checkout path is not valid UTF-8"))?;
        run_git(
            Path::new("."),
            &[
                "clone",
                "--depth",
                "1",
                "--branch",
                &repo.branch,
                &repo.url,
                folder_str,
            ],
        )?;
    }
    Ok(())
}

fn run_git(cwd: &Path, args: &[&str]) -> Result<()> {
    let verb = args.first().copied().unwrap_or_default();
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .with_context(|| format!("run git {verb}"))?;
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    let detail = stderr
        .trim()
        .lines()
        .next()
        .map(str::to_string)
        .filter(|line| !line.is_empty())
        .unwrap_or_else(|| format!("status {}", output.status));
    Err(anyhow!("git {verb} failed: {detail}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn git_available() -> bool {
        Command::new("git")
            .arg("--version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    fn git_in(dir: &Path, args: &[&str]) {
        let output = Command::new("git")
            .args([
                "-c",
                "user.name=docbuilder",
                "-c",
                "user.email=docbuilder@example.invalid",
            ])
            .args(args)
            .current_dir(dir)
            .output()
            .expect("run git");
        assert!(
            output.status.success(),
            "git {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    fn init_origin(dir: &Path, contents: &str) {
        git_in(dir, &["init"]);
        git_in(dir, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        std::fs::write(dir.join("index.rst"), contents).expect("write file");
        git_in(dir, &["add", "."]);
        git_in(dir, &["commit", "-m", "init"]);
    }

    fn file_url(dir: &Path) -> String {
        let canonical = dir.canonicalize().expect("canonicalize origin");
        format!("file://{}", canonical.display())
    }

    #[test]
    fn clone_then_update_roundtrip() {
        if !git_available() {
            eprintln!("Skipping: git not available");
            return;
        }

        let root = tempfile::tempdir().expect("create temp dir");
        let origin = root.path().join("origin");
        std::fs::create_dir_all(&origin).expect("create origin");
        init_origin(&origin, "v1\n");

        let spec = RepoSpec::parse(&format!("{}@main", file_url(&origin))).expect("parse spec");
        let checkout: PathBuf = root.path().join("checkouts").join("proj-main");

        // First call clones; there is no metadata yet for a fetch to use.
        assert!(!checkout.join(".git").is_dir());
        ensure_checkout(&checkout, &spec).expect("initial checkout");
        assert!(checkout.join(".git").is_dir());
        let contents = std::fs::read_to_string(checkout.join("index.rst")).expect("read file");
        assert_eq!(contents, "v1\n");

        // Local modifications are discarded and the branch is advanced.
        std::fs::write(checkout.join("index.rst"), "scribbled\n").expect("modify checkout");
        std::fs::write(origin.join("index.rst"), "v2\n").expect("update origin");
        git_in(&origin, &["commit", "-am", "update"]);
        ensure_checkout(&checkout, &spec).expect("update checkout");
        let contents = std::fs::read_to_string(checkout.join("index.rst")).expect("read file");
        assert_eq!(contents, "v2\n");
    }

    #[test]
    fn clone_failure_surfaces_stderr() {
        if !git_available() {
            eprintln!("Skipping: git not available");
            return;
        }

        let root = tempfile::tempdir().expect("create temp dir");
        let spec = RepoSpec {
            url: format!("file://{}/does-not-exist", root.path().display()),
            branch: "main".to_string(),
        };
        let err = ensure_checkout(&root.path().join("checkout"), &spec)
            .expect_err("clone of a missing repo must fail");
        assert!(err.to_string().contains("git clone failed"), "{err}");
    }
}
