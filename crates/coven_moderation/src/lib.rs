//! Temporary bans for the coven bot.
//!
//! [`UnbanScheduler`] is a ractor actor that keeps exactly one timer armed
//! for the earliest `unban_time` in the [`BanStore`](coven_core::BanStore),
//! re-deriving it from the store on every reconcile. [`ModerationService`]
//! is what command handlers call: it bans, records and pardons, and asks
//! the scheduler to reconcile after each change.
//!
//! # Example
//!
//! ```rust,no_run
//! use coven_core::{GuildId, ModerationGateway, SystemClock, UserId};
//! use coven_moderation::{InMemoryBanStore, ModerationService, SchedulerArgs};
//! use std::sync::Arc;
//!
//! # async fn example(gateway: Arc<dyn ModerationGateway>) -> Result<(), Box<dyn std::error::Error>> {
//! let args = SchedulerArgs::new(
//!     Arc::new(InMemoryBanStore::new()),
//!     gateway,
//!     Arc::new(SystemClock),
//! );
//! let service = ModerationService::start(args).await?;
//!
//! service.tempban(GuildId(1), UserId(2), "10m", "spam").await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod memory;
mod scheduler;
mod service;

pub use memory::InMemoryBanStore;
pub use scheduler::{
    ReconcilePolicy, ReconcilePolicyBuilder, SchedulerArgs, SchedulerMessage, SchedulerStatus,
    UnbanScheduler,
};
pub use service::{ModerationService, PardonOutcome, TempbanReceipt};
