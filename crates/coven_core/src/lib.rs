//! Domain types for the coven Discord bot.
//!
//! Everything here is free of I/O: identifiers, duration parsing, the
//! leveling calculator, ban records, welcome templates, the word blacklist,
//! emoji keys and the small games. The [`BanStore`] and [`ModerationGateway`]
//! traits are the seams the moderation crate is written against; the
//! database and Discord crates provide the production implementations.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod ban;
mod blacklist;
mod channel;
mod clock;
mod duration;
mod emoji;
mod games;
mod gateway;
mod ids;
mod leveling;
mod store;
mod welcome;

pub use ban::BanRecord;
pub use blacklist::Blacklist;
pub use channel::ChannelPurpose;
pub use clock::{Clock, ManualClock, SystemClock};
pub use duration::{BanDuration, parse_duration};
pub use emoji::emoji_key;
pub use games::{Hand, Outcome, roll_dice};
pub use gateway::{ModerationGateway, UnbanOutcome};
pub use ids::{ChannelId, GuildId, MessageId, RoleId, UserId};
pub use leveling::{LEVEL_XP_STEP, LevelProgress, LevelUpdate};
pub use store::BanStore;
pub use welcome::{DEFAULT_WELCOME, FAREWELL_TEXT, MENTION_PLACEHOLDER, render_welcome};
