//! Connection pooling and migrations.

use coven_error::{DatabaseError, DatabaseErrorKind, DatabaseResult};
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Shared PostgreSQL connection pool.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Build a connection pool and check that one connection can be opened.
///
/// # Errors
///
/// Returns error if the pool cannot be built or the warm-up connection fails.
#[instrument(skip(database_url))]
pub fn create_pool(database_url: &str, max_size: u32) -> DatabaseResult<PgPool> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Connection(e.to_string())))?;

    // Warm up the pool by getting and immediately releasing a connection
    {
        let _conn = pool.get()?;
    }

    info!(max_size, "Database pool ready");
    Ok(pool)
}

/// Apply any migrations the database has not seen yet.
#[instrument(skip(pool))]
pub async fn run_migrations(pool: &PgPool) -> DatabaseResult<()> {
    let applied = run_blocking(pool, |conn| {
        conn.run_pending_migrations(MIGRATIONS)
            .map(|versions| versions.len())
            .map_err(|e| DatabaseError::new(DatabaseErrorKind::Migration(e.to_string())))
    })
    .await?;

    info!(applied, "Migrations up to date");
    Ok(())
}

/// Run `f` with a pooled connection on the blocking thread pool.
pub(crate) async fn run_blocking<T, F>(pool: &PgPool, f: F) -> DatabaseResult<T>
where
    T: Send + 'static,
    F: FnOnce(&mut PgConnection) -> DatabaseResult<T> + Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut conn = pool.get()?;
        debug!("Acquired pooled connection");
        f(&mut conn)
    })
    .await
    .map_err(|e| DatabaseError::new(DatabaseErrorKind::Join(e.to_string())))?
}
