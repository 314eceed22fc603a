//! Ban persistence seam.

use crate::{BanRecord, GuildId, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use coven_error::DatabaseResult;

/// Storage for temporary bans, shared by every guild.
///
/// Writes must be atomic per row: the scheduler re-reads the store on every
/// reconcile and relies on it as the single source of truth.
#[async_trait]
pub trait BanStore: Send + Sync {
    /// Insert or replace the ban for `(record.user_id, record.guild_id)`.
    async fn upsert_ban(&self, record: &BanRecord) -> DatabaseResult<()>;

    /// Fetch the active ban for a user in a guild.
    async fn get_ban(
        &self,
        user_id: UserId,
        guild_id: GuildId,
    ) -> DatabaseResult<Option<BanRecord>>;

    /// Delete a ban. Returns whether a row existed.
    async fn remove_ban(&self, user_id: UserId, guild_id: GuildId) -> DatabaseResult<bool>;

    /// The ban with the smallest `unban_time` across all guilds.
    async fn next_expiring(&self) -> DatabaseResult<Option<BanRecord>>;

    /// Every ban with `unban_time <= now`, earliest first.
    async fn expired(&self, now: DateTime<Utc>) -> DatabaseResult<Vec<BanRecord>>;

    /// Delete every ban with `unban_time <= now`. Returns the number removed.
    async fn purge_expired(&self, now: DateTime<Utc>) -> DatabaseResult<usize>;

    /// Active bans in one guild, earliest first.
    async fn list_bans(&self, guild_id: GuildId) -> DatabaseResult<Vec<BanRecord>>;
}
