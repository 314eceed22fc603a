//! PostgreSQL persistence for the coven bot.
//!
//! Every repository wraps an r2d2 pool and runs its queries on tokio's
//! blocking thread pool. Writes are single `INSERT ... ON CONFLICT`
//! statements or short transactions, so concurrent events for the same
//! member never lose updates.
//!
//! # Example
//!
//! ```rust,no_run
//! use coven_core::{GuildId, UserId};
//! use coven_database::{LevelRepository, create_pool, run_migrations};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("postgres://localhost/coven", 5)?;
//! run_migrations(&pool).await?;
//!
//! let levels = LevelRepository::new(pool);
//! let update = levels.add_xp(UserId(1), GuildId(2), 10).await?;
//! println!("now level {}", update.progress.level);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod ban_repository;
mod connection;
mod guild_config_repository;
mod level_repository;
mod models;
mod self_role_repository;

/// Diesel table definitions.
#[allow(missing_docs)]
pub mod schema;

pub use ban_repository::BanRepository;
pub use connection::{PgPool, create_pool, run_migrations};
pub use guild_config_repository::GuildConfigRepository;
pub use level_repository::LevelRepository;
pub use models::{
    BanRow, ChannelRow, LevelRoleRow, LevelRow, NewBan, NewChannel, NewLevel, NewLevelRole,
    NewRoleBinding, NewSelfRoleMessage, RoleBindingRow, SelfRoleMessageRow,
};
pub use self_role_repository::SelfRoleRepository;
