//! ddlrepo - track warehouse DDL in a git repository

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;

use crate::cli::{Cli, Commands};
use crate::context::Context;
use crate::error::Result;

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_target(false)
            .init();
    }

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut ctx = Context::load(cli.config, cli.profile)?;

    match cli.command {
        Some(Commands::Profile { action }) => commands::profile::run(&mut ctx, action),
        Some(Commands::Init) => commands::sync::run_init(&ctx),
        Some(Commands::Status { json }) => commands::status::run(&ctx, json),
        Some(Commands::Diff) => commands::sync::run_diff(&ctx),
        Some(Commands::Sync {
            dry_run,
            no_commit,
            push,
            message,
            json,
        }) => commands::sync::run_sync(&ctx, dry_run, no_commit, push, message, json),
        None => commands::status::run(&ctx, false),
    }
}
