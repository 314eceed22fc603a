//! Member XP and levels.

use crate::connection::{PgPool, run_blocking};
use crate::models::{LevelRow, NewLevel};
use crate::schema::levels;
use coven_core::{GuildId, LevelProgress, LevelUpdate, UserId};
use coven_error::{DatabaseError, DatabaseResult};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use tracing::{debug, instrument};

/// PostgreSQL repository for the `levels` table.
///
/// Read-modify-write updates lock the member's row for the duration of a
/// transaction, so two messages from the same member processed at once
/// both count.
#[derive(Debug, Clone)]
pub struct LevelRepository {
    pool: PgPool,
}

impl LevelRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Stored progress, `None` if the member has never earned XP.
    #[instrument(skip(self), fields(user_id = %user_id, guild_id = %guild_id))]
    pub async fn get(
        &self,
        user_id: UserId,
        guild_id: GuildId,
    ) -> DatabaseResult<Option<LevelProgress>> {
        run_blocking(&self.pool, move |conn| {
            levels::table
                .find((user_id.as_i64(), guild_id.as_i64()))
                .select(LevelRow::as_select())
                .first::<LevelRow>(conn)
                .optional()
                .map(|row| row.map(LevelProgress::from))
                .map_err(DatabaseError::from)
        })
        .await
    }

    /// Add XP, levelling up when the threshold is crossed.
    #[instrument(skip(self), fields(user_id = %user_id, guild_id = %guild_id))]
    pub async fn add_xp(
        &self,
        user_id: UserId,
        guild_id: GuildId,
        delta: i64,
    ) -> DatabaseResult<LevelUpdate> {
        run_blocking(&self.pool, move |conn| {
            let update = modify(conn, user_id, guild_id, |progress| {
                let update = progress.apply_xp(delta);
                (update.progress, update)
            })?;
            debug!(
                xp = update.progress.xp,
                level = update.progress.level,
                leveled_up = update.leveled_up,
                "XP applied"
            );
            Ok(update)
        })
        .await
    }

    /// Add (or with a negative value, remove) levels.
    #[instrument(skip(self), fields(user_id = %user_id, guild_id = %guild_id))]
    pub async fn add_levels(
        &self,
        user_id: UserId,
        guild_id: GuildId,
        levels: i64,
    ) -> DatabaseResult<LevelProgress> {
        run_blocking(&self.pool, move |conn| {
            modify(conn, user_id, guild_id, |progress| {
                let next = progress.add_levels(levels);
                (next, next)
            })
        })
        .await
    }

    /// Overwrite the level, keeping XP.
    #[instrument(skip(self), fields(user_id = %user_id, guild_id = %guild_id))]
    pub async fn set_level(
        &self,
        user_id: UserId,
        guild_id: GuildId,
        level: i64,
    ) -> DatabaseResult<LevelProgress> {
        run_blocking(&self.pool, move |conn| {
            modify(conn, user_id, guild_id, |progress| {
                let next = progress.with_level(level);
                (next, next)
            })
        })
        .await
    }

    /// Overwrite the XP, keeping the level.
    #[instrument(skip(self), fields(user_id = %user_id, guild_id = %guild_id))]
    pub async fn set_xp(
        &self,
        user_id: UserId,
        guild_id: GuildId,
        xp: i64,
    ) -> DatabaseResult<LevelProgress> {
        run_blocking(&self.pool, move |conn| {
            modify(conn, user_id, guild_id, |progress| {
                let next = progress.with_xp(xp);
                (next, next)
            })
        })
        .await
    }

    /// Forget a member's progress. Returns whether any was stored.
    #[instrument(skip(self), fields(user_id = %user_id, guild_id = %guild_id))]
    pub async fn reset(&self, user_id: UserId, guild_id: GuildId) -> DatabaseResult<bool> {
        run_blocking(&self.pool, move |conn| {
            let deleted = diesel::delete(levels::table.find((user_id.as_i64(), guild_id.as_i64())))
                .execute(conn)?;
            Ok(deleted > 0)
        })
        .await
    }
}

/// Lock the member's row (creating it at `(0, 0)` if needed), apply `f`,
/// and write back the progress it returns.
fn modify<T>(
    conn: &mut PgConnection,
    user_id: UserId,
    guild_id: GuildId,
    f: impl FnOnce(LevelProgress) -> (LevelProgress, T),
) -> DatabaseResult<T> {
    let key = (user_id.as_i64(), guild_id.as_i64());

    conn.transaction::<_, DatabaseError, _>(|conn| {
        diesel::insert_into(levels::table)
            .values(&NewLevel::new(user_id, guild_id, LevelProgress::default()))
            .on_conflict((levels::user_id, levels::guild_id))
            .do_nothing()
            .execute(conn)?;

        let row = levels::table
            .find(key)
            .select(LevelRow::as_select())
            .for_update()
            .first::<LevelRow>(conn)?;
        let current = LevelProgress::from(row);

        let (next, output) = f(current);

        diesel::update(levels::table.find(key))
            .set((levels::xp.eq(next.xp), levels::level.eq(next.level)))
            .execute(conn)?;

        Ok(output)
    })
}
