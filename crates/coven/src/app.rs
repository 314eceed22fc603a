//! Startup wiring for each CLI command.

use crate::config::CovenConfig;
use coven_core::{BanRecord, BanStore, Blacklist, GuildId, SystemClock};
use coven_database::{
    BanRepository, GuildConfigRepository, LevelRepository, PgPool, SelfRoleRepository,
    create_pool, run_migrations,
};
use coven_discord::{CovenBot, CovenHandler, HandlerSettingsBuilder, SerenityGateway};
use coven_error::{ConfigError, CovenResult};
use coven_moderation::{ModerationService, ReconcilePolicyBuilder, SchedulerArgs, SchedulerStatus};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Connect to the database and Discord and process events until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the configuration is incomplete, the database is
/// unreachable or the Discord client fails.
#[instrument(skip_all)]
pub async fn run(config: &CovenConfig) -> CovenResult<()> {
    config.validate()?;

    let pool = connect(config).await?;
    let blacklist = load_blacklist(config)?;
    let moderation = start_moderation(config, pool.clone()).await?;

    let settings = HandlerSettingsBuilder::default()
        .guild_ids(
            config
                .discord
                .guild_ids
                .iter()
                .copied()
                .map(GuildId)
                .collect::<Vec<_>>(),
        )
        .activity(config.discord.activity.clone())
        .xp_per_message(config.leveling.xp_per_message)
        .build()
        .map_err(|e| ConfigError::setup(format!("handler settings: {}", e)))?;

    let handler = CovenHandler::new(
        LevelRepository::new(pool.clone()),
        SelfRoleRepository::new(pool.clone()),
        GuildConfigRepository::new(pool),
        moderation,
        blacklist,
        settings,
    );

    let mut bot = CovenBot::new(&config.discord.token, handler).await?;
    let stopper = bot.stopper();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl-C");
                stopper.stop().await;
            }
            Err(e) => warn!(error = %e, "Could not listen for Ctrl-C"),
        }
    });

    bot.start().await?;
    info!("Bot stopped");
    Ok(())
}

/// Apply pending migrations and exit.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
#[instrument(skip_all)]
pub async fn migrate(config: &CovenConfig) -> CovenResult<()> {
    config.validate_database()?;
    let pool = create_pool(&config.database.url, config.database.pool_size)?;
    run_migrations(&pool).await?;
    Ok(())
}

/// Active temporary bans in a guild, earliest expiry first.
///
/// # Errors
///
/// Returns an error if the database is unreachable.
#[instrument(skip(config))]
pub async fn list_bans(config: &CovenConfig, guild_id: GuildId) -> CovenResult<Vec<BanRecord>> {
    config.validate_database()?;
    let pool = create_pool(&config.database.url, config.database.pool_size)?;
    let mut bans = BanRepository::new(pool).list_bans(guild_id).await?;
    bans.sort_by_key(|ban| ban.unban_time);
    Ok(bans)
}

/// Lift every expired ban once and report when the next one is due.
///
/// Runs the same startup sweep the bot does, without connecting to the
/// gateway.
///
/// # Errors
///
/// Returns an error if the configuration is incomplete, the database is
/// unreachable or the scheduler does not start.
#[instrument(skip_all)]
pub async fn sweep(config: &CovenConfig) -> CovenResult<SchedulerStatus> {
    config.validate()?;
    let pool = connect(config).await?;
    let moderation = start_moderation(config, pool).await?;

    // The sweep runs before the scheduler handles its first message.
    let status = moderation.status().await;
    moderation.shutdown();
    Ok(status?)
}

async fn connect(config: &CovenConfig) -> CovenResult<PgPool> {
    let pool = create_pool(&config.database.url, config.database.pool_size)?;
    if config.database.run_migrations {
        run_migrations(&pool).await?;
    }
    Ok(pool)
}

fn load_blacklist(config: &CovenConfig) -> CovenResult<Blacklist> {
    match &config.blacklist.path {
        Some(path) => {
            let blacklist = Blacklist::load(path)?;
            info!(words = blacklist.len(), path = %path.display(), "Blacklist loaded");
            Ok(blacklist)
        }
        None => {
            info!("No blacklist configured");
            Ok(Blacklist::default())
        }
    }
}

async fn start_moderation(config: &CovenConfig, pool: PgPool) -> CovenResult<ModerationService> {
    let policy = ReconcilePolicyBuilder::default()
        .retries(config.moderation.reconcile_retries)
        .backoff(config.moderation.reconcile_backoff())
        .build()
        .map_err(|e| ConfigError::setup(format!("moderation settings: {}", e)))?;

    let args = SchedulerArgs::new(
        Arc::new(BanRepository::new(pool)),
        Arc::new(SerenityGateway::from_token(&config.discord.token)),
        Arc::new(SystemClock),
    )
    .with_policy(policy);

    Ok(ModerationService::start(args).await?)
}
