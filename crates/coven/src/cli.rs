//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Coven - Discord bot for leveling, self-roles and temporary bans
#[derive(Parser, Debug)]
#[command(name = "coven")]
#[command(about = "Discord bot for leveling, self-roles and temporary bans", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file layered over the defaults
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Connect to Discord and run the bot
    Run,

    /// Apply pending database migrations
    Migrate,

    /// Temporary ban maintenance
    #[command(subcommand)]
    Bans(BanCommands),
}

/// Temporary ban subcommands
#[derive(Subcommand, Debug)]
pub enum BanCommands {
    /// List active temporary bans in a guild
    List {
        /// Guild id
        guild: u64,

        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Lift every expired ban now
    Sweep,
}

/// Output format for listings
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Human,
    /// JSON array
    Json,
}
