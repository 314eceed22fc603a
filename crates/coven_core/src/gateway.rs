//! Chat platform moderation seam.

use crate::{GuildId, UserId};
use async_trait::async_trait;
use coven_error::PlatformResult;

/// What an unban call found on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum UnbanOutcome {
    /// The ban existed and was lifted
    Unbanned,
    /// There was no ban to lift (already unbanned by hand, or the user is gone)
    AlreadyAbsent,
}

/// Moderation actions the bot performs on the chat platform.
#[async_trait]
pub trait ModerationGateway: Send + Sync {
    /// Ban a user from a guild.
    ///
    /// # Errors
    ///
    /// Returns error if the platform is unreachable or the bot lacks permission.
    async fn ban(&self, guild_id: GuildId, user_id: UserId, reason: &str) -> PlatformResult<()>;

    /// Lift a ban. A missing ban is reported as [`UnbanOutcome::AlreadyAbsent`].
    async fn unban(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        reason: &str,
    ) -> PlatformResult<UnbanOutcome>;

    /// Remove a member from a guild.
    async fn kick(&self, guild_id: GuildId, user_id: UserId, reason: &str) -> PlatformResult<()>;

    /// Resolve a user's display name, `None` if the account does not exist.
    async fn fetch_user(&self, user_id: UserId) -> PlatformResult<Option<String>>;

    /// Whether the bot can still see the guild.
    async fn has_guild(&self, guild_id: GuildId) -> PlatformResult<bool>;
}
