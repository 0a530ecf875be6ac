// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Bumpyard CLI - keeps Node.js and Debian version pins fresh

use anyhow::Result;
use bumpyard::config::Config;
use bumpyard::run::{self, Endpoints, RunOptions};
use clap::Parser;

#[derive(Parser)]
#[command(name = "bumpyard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Repository owner or organisation
    #[arg(short, long)]
    owner: String,

    /// Repository name
    #[arg(short, long)]
    repo: String,

    /// Base branch the bump is measured against
    #[arg(short, long, default_value = "main")]
    base: String,

    /// Working branch the bump is pushed to
    #[arg(short, long, default_value = "bump")]
    working: String,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 if cli.quiet => tracing::Level::ERROR,
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    // The token is validated before anything network-facing runs.
    let config = Config::from_env()?;

    let opts = RunOptions {
        owner: cli.owner,
        repo: cli.repo,
        base_branch: cli.base,
        working_branch: cli.working,
    };
    run::execute(&config, &opts, &Endpoints::default()).await
}
