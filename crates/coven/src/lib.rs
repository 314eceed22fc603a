//! The coven Discord bot.
//!
//! Wires configuration, logging, the database, the unban scheduler and the
//! Discord client together. The `coven` binary is a thin CLI over [`app`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod app;
mod config;
mod logging;

pub use config::{
    BlacklistSettings, CovenConfig, DatabaseSettings, DiscordSettings, LevelingSettings,
    LoggingSettings, ModerationSettings,
};
pub use logging::init_logging;
