use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "agentpack",
    about = "Agentpack: cross-pack consistency checks and transactional overlays",
    version
)]
pub struct Cli {
    /// Log filter (e.g. `debug`, `agentpack_overlay=trace`); overrides
    /// AGENTPACK_LOG and the config file
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate every cross-pack invariant of a corpus directory
    Check {
        /// Directory holding the pack files
        #[arg(long)]
        root: String,

        /// Engine config (defaults to <root>/agentpack.toml when present)
        #[arg(long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply an overlay transactionally: commit when the result is
    /// consistent, otherwise restore the original packs
    Overlay {
        /// Directory holding the pack files
        #[arg(long)]
        root: String,

        /// Overlay file (JSON, or TOML when it ends in .toml)
        #[arg(long)]
        overlay: String,

        /// Engine config (defaults to <root>/agentpack.toml when present)
        #[arg(long)]
        config: Option<String>,

        /// Apply and check in memory only
        #[arg(long)]
        dry_run: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rewrite every present pack in canonical form
    Normalize {
        /// Directory holding the pack files
        #[arg(long)]
        root: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
