//! Discord front end for the coven bot.
//!
//! Built on Serenity. The crate is split into:
//! - **conversions**: id mapping between coven and Serenity types
//! - **options**: slash command options flattened into a [`CommandInput`]
//! - **commands**: command definitions and parsing into [`BotCommand`]
//! - **embeds**: [`Notice`], the platform-neutral description of every embed the bot posts
//! - **gateway**: [`SerenityGateway`], the [`coven_core::ModerationGateway`] used by the scheduler
//! - **handler**: [`CovenHandler`], Serenity's `EventHandler`
//! - **client**: [`CovenBot`], client setup and shutdown
//!
//! # Usage
//!
//! ```rust,ignore
//! let handler = CovenHandler::new(levels, self_roles, guilds, moderation, blacklist, settings);
//! let mut bot = CovenBot::new(&token, handler).await?;
//! bot.start().await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod commands;
mod conversions;
mod embeds;
mod gateway;
mod handler;
mod options;

pub use client::{CovenBot, Stopper};
pub use commands::{BotCommand, COMMAND_NAMES, DEFAULT_REASON, definitions, self_role_channel};
pub use conversions::{ToCoven, ToSerenity, reaction_for_key};
pub use embeds::{Notice, NoticeField, colours};
pub use gateway::SerenityGateway;
pub use handler::{CovenHandler, HandlerSettings, HandlerSettingsBuilder};
pub use options::{CommandInput, OptionValue};
