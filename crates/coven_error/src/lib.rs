//! Error types for the coven bot.
//!
//! Every error follows the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - constructors use `#[track_caller]` for automatic location capture
//!
//! "Not found" conditions that users are expected to hit (no active ban,
//! no level data, user already unbanned) are modelled as outcome values by
//! the calling crates and never reach these types.
//!
//! # Examples
//!
//! ```
//! use coven_error::{ConfigError, CovenResult};
//!
//! fn load() -> CovenResult<()> {
//!     Err(ConfigError::invalid("discord.token", "is empty"))?
//! }
//!
//! assert!(load().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod command;
mod config;
mod database;
mod error;
mod moderation;
mod platform;

pub use command::{CommandError, CommandErrorKind, CommandResult};
pub use config::{ConfigError, ConfigErrorKind};
pub use database::{DatabaseError, DatabaseErrorKind, DatabaseResult};
pub use error::{CovenError, CovenErrorKind, CovenResult};
pub use moderation::{ModerationError, ModerationErrorKind, ModerationResult};
pub use platform::{PlatformError, PlatformErrorKind, PlatformResult};
