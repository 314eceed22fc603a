//! [`ModerationGateway`] over Serenity's HTTP client.

use crate::conversions::ToSerenity;
use async_trait::async_trait;
use coven_core::{GuildId, ModerationGateway, UnbanOutcome, UserId};
use coven_error::{PlatformError, PlatformErrorKind, PlatformResult};
use serenity::all::{Cache, Http};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Moderation calls made through Discord's REST API.
///
/// The cache, when present, answers guild membership without a request.
#[derive(Clone)]
pub struct SerenityGateway {
    http: Arc<Http>,
    cache: Option<Arc<Cache>>,
}

impl SerenityGateway {
    /// Gateway without a cache.
    pub fn new(http: Arc<Http>) -> Self {
        Self { http, cache: None }
    }

    /// Gateway with its own HTTP client for `token`.
    ///
    /// Used when moderation must run before, or without, a gateway connection.
    pub fn from_token(token: &str) -> Self {
        Self::new(Arc::new(Http::new(token)))
    }

    /// Gateway that consults `cache` before the API.
    pub fn with_cache(http: Arc<Http>, cache: Arc<Cache>) -> Self {
        Self {
            http,
            cache: Some(cache),
        }
    }
}

impl std::fmt::Debug for SerenityGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerenityGateway")
            .field("cached", &self.cache.is_some())
            .finish()
    }
}

#[async_trait]
impl ModerationGateway for SerenityGateway {
    #[instrument(skip(self, reason), fields(guild_id = %guild_id, user_id = %user_id))]
    async fn ban(&self, guild_id: GuildId, user_id: UserId, reason: &str) -> PlatformResult<()> {
        guild_id
            .to_serenity()
            .ban_with_reason(&self.http, user_id.to_serenity(), 0, reason)
            .await?;
        Ok(())
    }

    #[instrument(skip(self, reason), fields(guild_id = %guild_id, user_id = %user_id))]
    async fn unban(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        reason: &str,
    ) -> PlatformResult<UnbanOutcome> {
        match self
            .http
            .remove_ban(guild_id.to_serenity(), user_id.to_serenity(), Some(reason))
            .await
        {
            Ok(()) => Ok(UnbanOutcome::Unbanned),
            Err(e) => {
                let err = PlatformError::from(e);
                if err.is_not_found() {
                    debug!("No ban to remove");
                    Ok(UnbanOutcome::AlreadyAbsent)
                } else {
                    Err(err)
                }
            }
        }
    }

    #[instrument(skip(self, reason), fields(guild_id = %guild_id, user_id = %user_id))]
    async fn kick(&self, guild_id: GuildId, user_id: UserId, reason: &str) -> PlatformResult<()> {
        guild_id
            .to_serenity()
            .kick_with_reason(&self.http, user_id.to_serenity(), reason)
            .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn fetch_user(&self, user_id: UserId) -> PlatformResult<Option<String>> {
        match self.http.get_user(user_id.to_serenity()).await {
            Ok(user) => Ok(Some(user.name)),
            Err(e) => {
                let err = PlatformError::from(e);
                if err.is_not_found() {
                    Ok(None)
                } else {
                    Err(err)
                }
            }
        }
    }

    #[instrument(skip(self), fields(guild_id = %guild_id))]
    async fn has_guild(&self, guild_id: GuildId) -> PlatformResult<bool> {
        let id = guild_id.to_serenity();
        if let Some(cache) = &self.cache {
            if cache.guild(id).is_some() {
                return Ok(true);
            }
        }

        match self.http.get_guild(id).await {
            Ok(_) => Ok(true),
            Err(e) => {
                let err = PlatformError::from(e);
                match err.kind {
                    PlatformErrorKind::NotFound(_) | PlatformErrorKind::Forbidden(_) => Ok(false),
                    PlatformErrorKind::Unavailable(_) => Err(err),
                }
            }
        }
    }
}
