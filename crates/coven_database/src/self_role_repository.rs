//! Reaction-role messages and their emoji bindings.

use crate::connection::{PgPool, run_blocking};
use crate::models::{NewRoleBinding, NewSelfRoleMessage, RoleBindingRow, SelfRoleMessageRow};
use crate::schema::{messages, roles};
use coven_core::{ChannelId, GuildId, MessageId, RoleId};
use coven_error::{DatabaseError, DatabaseResult};
use diesel::prelude::*;
use tracing::{debug, instrument};

/// PostgreSQL repository for the `messages` and `roles` tables.
#[derive(Debug, Clone)]
pub struct SelfRoleRepository {
    pool: PgPool,
}

impl SelfRoleRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a message as a self-role message. Registering twice is a no-op.
    #[instrument(skip(self), fields(message_id = %message_id, channel_id = %channel_id, guild_id = %guild_id))]
    pub async fn create_message(
        &self,
        message_id: MessageId,
        channel_id: ChannelId,
        guild_id: GuildId,
    ) -> DatabaseResult<()> {
        run_blocking(&self.pool, move |conn| {
            diesel::insert_into(messages::table)
                .values(&NewSelfRoleMessage {
                    message_id: message_id.as_i64(),
                    channel_id: channel_id.as_i64(),
                    guild_id: guild_id.as_i64(),
                })
                .on_conflict(messages::message_id)
                .do_nothing()
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    /// Look up a registered self-role message.
    #[instrument(skip(self), fields(message_id = %message_id))]
    pub async fn message(
        &self,
        message_id: MessageId,
    ) -> DatabaseResult<Option<SelfRoleMessageRow>> {
        run_blocking(&self.pool, move |conn| {
            messages::table
                .find(message_id.as_i64())
                .select(SelfRoleMessageRow::as_select())
                .first::<SelfRoleMessageRow>(conn)
                .optional()
                .map_err(DatabaseError::from)
        })
        .await
    }

    /// Bind `emoji` (an emoji key) to `role_id` on a message, replacing the
    /// role's previous emoji. Returns `false` if the message is not registered.
    #[instrument(skip(self), fields(message_id = %message_id, role_id = %role_id, emoji))]
    pub async fn add_role(
        &self,
        message_id: MessageId,
        role_id: RoleId,
        emoji: &str,
    ) -> DatabaseResult<bool> {
        let binding = NewRoleBinding::new(message_id, role_id, emoji);
        run_blocking(&self.pool, move |conn| {
            conn.transaction::<_, DatabaseError, _>(|conn| {
                let registered = messages::table
                    .find(binding.message_id)
                    .select(messages::message_id)
                    .first::<i64>(conn)
                    .optional()?
                    .is_some();
                if !registered {
                    debug!("Message is not a self-role message");
                    return Ok(false);
                }

                diesel::insert_into(roles::table)
                    .values(&binding)
                    .on_conflict((roles::role_id, roles::message_id))
                    .do_update()
                    .set(roles::emoji.eq(&binding.emoji))
                    .execute(conn)?;
                Ok(true)
            })
        })
        .await
    }

    /// Role bound to `emoji` on a message.
    #[instrument(skip(self), fields(message_id = %message_id, emoji))]
    pub async fn role_for(
        &self,
        message_id: MessageId,
        emoji: &str,
    ) -> DatabaseResult<Option<RoleId>> {
        let emoji = emoji.to_string();
        run_blocking(&self.pool, move |conn| {
            roles::table
                .filter(roles::message_id.eq(message_id.as_i64()))
                .filter(roles::emoji.eq(emoji))
                .select(roles::role_id)
                .first::<i64>(conn)
                .optional()
                .map(|role| role.map(RoleId::from_i64))
                .map_err(DatabaseError::from)
        })
        .await
    }

    /// Emoji bound to `role_id` on a message.
    #[instrument(skip(self), fields(message_id = %message_id, role_id = %role_id))]
    pub async fn emoji_for(
        &self,
        message_id: MessageId,
        role_id: RoleId,
    ) -> DatabaseResult<Option<String>> {
        run_blocking(&self.pool, move |conn| {
            roles::table
                .find((role_id.as_i64(), message_id.as_i64()))
                .select(RoleBindingRow::as_select())
                .first::<RoleBindingRow>(conn)
                .optional()
                .map(|row| row.map(|row| row.emoji))
                .map_err(DatabaseError::from)
        })
        .await
    }

    /// Unbind a role from a message. Returns whether a binding existed.
    #[instrument(skip(self), fields(message_id = %message_id, role_id = %role_id))]
    pub async fn remove_role(
        &self,
        message_id: MessageId,
        role_id: RoleId,
    ) -> DatabaseResult<bool> {
        run_blocking(&self.pool, move |conn| {
            let deleted = diesel::delete(roles::table.find((role_id.as_i64(), message_id.as_i64())))
                .execute(conn)?;
            Ok(deleted > 0)
        })
        .await
    }

    /// Drop every binding on the guild's self-role messages. Returns the count removed.
    #[instrument(skip(self), fields(guild_id = %guild_id))]
    pub async fn reset(&self, guild_id: GuildId) -> DatabaseResult<usize> {
        run_blocking(&self.pool, move |conn| {
            let guild_messages = messages::table
                .filter(messages::guild_id.eq(guild_id.as_i64()))
                .select(messages::message_id);
            diesel::delete(roles::table.filter(roles::message_id.eq_any(guild_messages)))
                .execute(conn)
                .map_err(DatabaseError::from)
        })
        .await
    }
}
