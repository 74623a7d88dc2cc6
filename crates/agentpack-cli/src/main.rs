//! Agentpack CLI: the `agentpack` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let log_level = cli.log_level;

    match cli.command {
        Commands::Check { root, config, json } => {
            commands::check::run(root, config, json, log_level)
        }

        Commands::Overlay {
            root,
            overlay,
            config,
            dry_run,
            json,
        } => commands::overlay::run(commands::overlay::Args {
            root,
            overlay,
            config,
            dry_run,
            json,
            log_level,
        }),

        Commands::Normalize { root, json } => commands::normalize::run(root, json, log_level),
    }
}
