//! CLI argument parsing for the documentation build workflow.
//!
//! The CLI is intentionally thin: commands map one-to-one onto workflow
//! functions so the same core logic stays reusable and testable.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default executable used to invoke the documentation generator.
pub const DEFAULT_SPHINX_BUILD: &str = "sphinx-build";

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "docbuilder",
    version,
    about = "Multi-version Sphinx documentation builds with nginx routing rules",
    after_help = "Commands:\n  build --config <file>              Build every version of one project\n  build-all --config-folder <dir>    Build every *.json config and write nginx.conf per project\n  nginx-config --config <file>       Print routing rules for one project\n\nExamples:\n  docbuilder build --config configs/flask.json\n  docbuilder build-all --config-folder configs --build-folder /srv/docs\n  docbuilder nginx-config --config configs/flask.json --url-prefix /docs/flask",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    Build(BuildArgs),
    BuildAll(BuildAllArgs),
    NginxConfig(NginxConfigArgs),
}

/// Build command inputs for a single project.
#[derive(Parser, Debug)]
#[command(about = "Build all documentation versions for one project")]
pub struct BuildArgs {
    /// Path to the project's JSON config file
    #[arg(long, value_name = "FILE")]
    pub config: PathBuf,

    /// Directory holding the per-version source checkouts
    #[arg(long, value_name = "DIR", default_value = "checkouts")]
    pub checkout_folder: PathBuf,

    /// Output folder (defaults to build/<project id>)
    #[arg(long, short = 'O', value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Documentation generator executable
    #[arg(long, value_name = "BIN", default_value = DEFAULT_SPHINX_BUILD)]
    pub sphinx_build: String,
}

/// Build-all command inputs for a folder of project configs.
#[derive(Parser, Debug)]
#[command(about = "Build every project config in a folder")]
pub struct BuildAllArgs {
    /// Folder scanned for *.json project configs
    #[arg(long, value_name = "DIR", default_value = "configs")]
    pub config_folder: PathBuf,

    /// Directory holding the per-version source checkouts
    #[arg(long, value_name = "DIR", default_value = "checkouts")]
    pub checkout_folder: PathBuf,

    /// Root folder receiving one output tree per project id
    #[arg(long, value_name = "DIR", default_value = "build")]
    pub build_folder: PathBuf,

    /// Documentation generator executable
    #[arg(long, value_name = "BIN", default_value = DEFAULT_SPHINX_BUILD)]
    pub sphinx_build: String,
}

/// Nginx-config command inputs.
#[derive(Parser, Debug)]
#[command(about = "Print nginx routing rules for one project to stdout")]
pub struct NginxConfigArgs {
    /// Path to the project's JSON config file
    #[arg(long, value_name = "FILE")]
    pub config: PathBuf,

    /// URL prefix the rules are mounted under (defaults to the config's
    /// default_url_prefix)
    #[arg(long, value_name = "PREFIX")]
    pub url_prefix: Option<String>,

    /// On-disk build output path referenced by the rules (defaults to
    /// build/<project id>)
    #[arg(long, value_name = "DIR")]
    pub path: Option<PathBuf>,
}
