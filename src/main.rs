use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod checkout;
mod cli;
mod config;
mod nginx;
mod overlay;
mod sphinx;
mod workflow;

use cli::{Command, RootArgs};

fn main() -> Result<()> {
    // Diagnostics go to stderr; stdout is reserved for generated output
    // such as `nginx-config`.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = RootArgs::parse();
    match args.command {
        Command::Build(args) => workflow::run_build(args),
        Command::BuildAll(args) => workflow::run_build_all(args),
        Command::NginxConfig(args) => workflow::run_nginx_config(args),
    }
}
