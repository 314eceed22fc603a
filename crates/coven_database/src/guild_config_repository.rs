//! Per-guild settings: channels, welcome text, join role and level roles.

use crate::connection::{PgPool, run_blocking};
use crate::models::{ChannelRow, NewChannel, NewLevelRole};
use crate::schema::{channels, descriptions, level_roles, onjoin};
use coven_core::{ChannelId, ChannelPurpose, DEFAULT_WELCOME, GuildId, RoleId};
use coven_error::{DatabaseError, DatabaseResult};
use diesel::prelude::*;
use tracing::instrument;

/// PostgreSQL repository for guild configuration tables.
#[derive(Debug, Clone)]
pub struct GuildConfigRepository {
    pool: PgPool,
}

impl GuildConfigRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Point `purpose` at `channel_id`, replacing any previous channel.
    #[instrument(skip(self), fields(guild_id = %guild_id, purpose = purpose.key(), channel_id = %channel_id))]
    pub async fn set_channel(
        &self,
        guild_id: GuildId,
        purpose: &ChannelPurpose,
        channel_id: ChannelId,
    ) -> DatabaseResult<()> {
        let row = NewChannel {
            guild_id: guild_id.as_i64(),
            channel_id: channel_id.as_i64(),
            description: purpose.key().to_string(),
        };
        run_blocking(&self.pool, move |conn| {
            diesel::insert_into(channels::table)
                .values(&row)
                .on_conflict((channels::guild_id, channels::description))
                .do_update()
                .set(channels::channel_id.eq(row.channel_id))
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    /// Channel configured for `purpose`.
    #[instrument(skip(self), fields(guild_id = %guild_id, purpose = purpose.key()))]
    pub async fn channel_for(
        &self,
        guild_id: GuildId,
        purpose: &ChannelPurpose,
    ) -> DatabaseResult<Option<ChannelId>> {
        let key = purpose.key().to_string();
        run_blocking(&self.pool, move |conn| {
            channels::table
                .find((guild_id.as_i64(), key))
                .select(channels::channel_id)
                .first::<i64>(conn)
                .optional()
                .map(|channel| channel.map(ChannelId::from_i64))
                .map_err(DatabaseError::from)
        })
        .await
    }

    /// Channels advertised to new members, as `(channel, description)`,
    /// ordered by description. Level and announce channels are excluded.
    #[instrument(skip(self), fields(guild_id = %guild_id))]
    pub async fn listed_channels(
        &self,
        guild_id: GuildId,
    ) -> DatabaseResult<Vec<(ChannelId, String)>> {
        run_blocking(&self.pool, move |conn| {
            let rows = channels::table
                .filter(channels::guild_id.eq(guild_id.as_i64()))
                .filter(channels::description.ne_all(ChannelPurpose::RESERVED))
                .select(ChannelRow::as_select())
                .order(channels::description.asc())
                .load::<ChannelRow>(conn)?;
            Ok(rows
                .into_iter()
                .map(|row| (ChannelId::from_i64(row.channel_id), row.description))
                .collect())
        })
        .await
    }

    /// Set the welcome message template (`%u` is the member mention).
    #[instrument(skip(self, description), fields(guild_id = %guild_id))]
    pub async fn set_description(
        &self,
        guild_id: GuildId,
        description: &str,
    ) -> DatabaseResult<()> {
        let description = description.to_string();
        run_blocking(&self.pool, move |conn| {
            diesel::insert_into(descriptions::table)
                .values((
                    descriptions::guild_id.eq(guild_id.as_i64()),
                    descriptions::description.eq(&description),
                ))
                .on_conflict(descriptions::guild_id)
                .do_update()
                .set(descriptions::description.eq(&description))
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    /// The welcome message template, or the default one if none is set.
    #[instrument(skip(self), fields(guild_id = %guild_id))]
    pub async fn description(&self, guild_id: GuildId) -> DatabaseResult<String> {
        run_blocking(&self.pool, move |conn| {
            let stored = descriptions::table
                .find(guild_id.as_i64())
                .select(descriptions::description)
                .first::<String>(conn)
                .optional()?;
            Ok(stored.unwrap_or_else(|| DEFAULT_WELCOME.to_string()))
        })
        .await
    }

    /// Set the role given to members when they join.
    #[instrument(skip(self), fields(guild_id = %guild_id, role_id = %role_id))]
    pub async fn set_join_role(&self, guild_id: GuildId, role_id: RoleId) -> DatabaseResult<()> {
        run_blocking(&self.pool, move |conn| {
            diesel::insert_into(onjoin::table)
                .values((
                    onjoin::guild_id.eq(guild_id.as_i64()),
                    onjoin::role_id.eq(role_id.as_i64()),
                ))
                .on_conflict(onjoin::guild_id)
                .do_update()
                .set(onjoin::role_id.eq(role_id.as_i64()))
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    /// The role given to members when they join.
    #[instrument(skip(self), fields(guild_id = %guild_id))]
    pub async fn join_role(&self, guild_id: GuildId) -> DatabaseResult<Option<RoleId>> {
        run_blocking(&self.pool, move |conn| {
            onjoin::table
                .find(guild_id.as_i64())
                .select(onjoin::role_id)
                .first::<i64>(conn)
                .optional()
                .map(|role| role.map(RoleId::from_i64))
                .map_err(DatabaseError::from)
        })
        .await
    }

    /// Grant `role_id` to members once they reach `level`.
    #[instrument(skip(self), fields(guild_id = %guild_id, role_id = %role_id, level))]
    pub async fn set_level_role(
        &self,
        guild_id: GuildId,
        role_id: RoleId,
        level: i64,
    ) -> DatabaseResult<()> {
        let row = NewLevelRole {
            guild_id: guild_id.as_i64(),
            role_id: role_id.as_i64(),
            level,
        };
        run_blocking(&self.pool, move |conn| {
            diesel::insert_into(level_roles::table)
                .values(&row)
                .on_conflict((level_roles::guild_id, level_roles::role_id))
                .do_update()
                .set(level_roles::level.eq(row.level))
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    /// Every level role a member at `level` is entitled to, lowest level first.
    #[instrument(skip(self), fields(guild_id = %guild_id, level))]
    pub async fn level_roles_up_to(
        &self,
        guild_id: GuildId,
        level: i64,
    ) -> DatabaseResult<Vec<RoleId>> {
        run_blocking(&self.pool, move |conn| {
            let roles = level_roles::table
                .filter(level_roles::guild_id.eq(guild_id.as_i64()))
                .filter(level_roles::level.le(level))
                .order(level_roles::level.asc())
                .select(level_roles::role_id)
                .load::<i64>(conn)?;
            Ok(roles.into_iter().map(RoleId::from_i64).collect())
        })
        .await
    }
}
