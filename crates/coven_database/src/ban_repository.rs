//! Temporary bans.

use crate::connection::{PgPool, run_blocking};
use crate::models::{BanRow, NewBan};
use crate::schema::banned;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use coven_core::{BanRecord, BanStore, GuildId, UserId};
use coven_error::{DatabaseError, DatabaseResult};
use diesel::prelude::*;
use tracing::{debug, instrument};

/// PostgreSQL implementation of [`BanStore`] over the `banned` table.
#[derive(Debug, Clone)]
pub struct BanRepository {
    pool: PgPool,
}

impl BanRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BanStore for BanRepository {
    #[instrument(skip(self, record), fields(user_id = %record.user_id, guild_id = %record.guild_id, unban_time = %record.unban_time))]
    async fn upsert_ban(&self, record: &BanRecord) -> DatabaseResult<()> {
        let row = NewBan::from(record);
        run_blocking(&self.pool, move |conn| {
            diesel::insert_into(banned::table)
                .values(&row)
                .on_conflict((banned::user_id, banned::guild_id))
                .do_update()
                .set((
                    banned::reason.eq(&row.reason),
                    banned::unban_time.eq(row.unban_time),
                ))
                .execute(conn)?;
            debug!("Ban stored");
            Ok(())
        })
        .await
    }

    #[instrument(skip(self), fields(user_id = %user_id, guild_id = %guild_id))]
    async fn get_ban(
        &self,
        user_id: UserId,
        guild_id: GuildId,
    ) -> DatabaseResult<Option<BanRecord>> {
        run_blocking(&self.pool, move |conn| {
            banned::table
                .find((user_id.as_i64(), guild_id.as_i64()))
                .select(BanRow::as_select())
                .first::<BanRow>(conn)
                .optional()
                .map(|row| row.map(BanRecord::from))
                .map_err(DatabaseError::from)
        })
        .await
    }

    #[instrument(skip(self), fields(user_id = %user_id, guild_id = %guild_id))]
    async fn remove_ban(&self, user_id: UserId, guild_id: GuildId) -> DatabaseResult<bool> {
        run_blocking(&self.pool, move |conn| {
            let deleted = diesel::delete(banned::table.find((user_id.as_i64(), guild_id.as_i64())))
                .execute(conn)?;
            Ok(deleted > 0)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn next_expiring(&self) -> DatabaseResult<Option<BanRecord>> {
        run_blocking(&self.pool, move |conn| {
            banned::table
                .select(BanRow::as_select())
                .order(banned::unban_time.asc())
                .first::<BanRow>(conn)
                .optional()
                .map(|row| row.map(BanRecord::from))
                .map_err(DatabaseError::from)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn expired(&self, now: DateTime<Utc>) -> DatabaseResult<Vec<BanRecord>> {
        run_blocking(&self.pool, move |conn| {
            let rows = banned::table
                .filter(banned::unban_time.le(now))
                .select(BanRow::as_select())
                .order(banned::unban_time.asc())
                .load::<BanRow>(conn)?;
            Ok(rows.into_iter().map(BanRecord::from).collect())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn purge_expired(&self, now: DateTime<Utc>) -> DatabaseResult<usize> {
        run_blocking(&self.pool, move |conn| {
            diesel::delete(banned::table.filter(banned::unban_time.le(now)))
                .execute(conn)
                .map_err(DatabaseError::from)
        })
        .await
    }

    #[instrument(skip(self), fields(guild_id = %guild_id))]
    async fn list_bans(&self, guild_id: GuildId) -> DatabaseResult<Vec<BanRecord>> {
        run_blocking(&self.pool, move |conn| {
            let rows = banned::table
                .filter(banned::guild_id.eq(guild_id.as_i64()))
                .select(BanRow::as_select())
                .order(banned::unban_time.asc())
                .load::<BanRow>(conn)?;
            Ok(rows.into_iter().map(BanRecord::from).collect())
        })
        .await
    }
}
