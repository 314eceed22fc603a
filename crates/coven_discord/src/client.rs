//! Discord client setup and lifecycle management.

use crate::conversions::ToCoven;
use crate::embeds::Notice;
use crate::handler::CovenHandler;
use coven_core::GuildId;
use coven_error::{PlatformError, PlatformErrorKind, PlatformResult};
use serenity::Client;
use serenity::all::{Cache, Http, ShardManager};
use std::sync::Arc;
use tracing::{info, instrument};

/// The running Discord client.
///
/// # Example
/// ```no_run
/// # async fn example(handler: coven_discord::CovenHandler) -> Result<(), Box<dyn std::error::Error>> {
/// use coven_discord::CovenBot;
///
/// let token = std::env::var("DISCORD_TOKEN")?;
/// let mut bot = CovenBot::new(&token, handler).await?;
/// let stopper = bot.stopper();
/// tokio::spawn(async move {
///     tokio::signal::ctrl_c().await.ok();
///     stopper.stop().await;
/// });
/// bot.start().await?;
/// # Ok(())
/// # }
/// ```
pub struct CovenBot {
    client: Client,
    handler: Arc<CovenHandler>,
}

impl CovenBot {
    /// Build the Serenity client around `handler`.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` if the client cannot be built.
    #[instrument(skip(token, handler), fields(token_len = token.len()))]
    pub async fn new(token: &str, handler: CovenHandler) -> PlatformResult<Self> {
        info!("Initializing coven Discord bot");

        let handler = Arc::new(handler);
        let intents = CovenHandler::intents();
        info!("Building Serenity client with intents: {:?}", intents);

        let client = Client::builder(token, intents)
            .event_handler_arc(handler.clone())
            .await
            .map_err(|e| {
                PlatformError::new(PlatformErrorKind::Unavailable(format!(
                    "Failed to build client: {}",
                    e
                )))
            })?;

        info!("Serenity client built successfully");
        Ok(Self { client, handler })
    }

    /// Connect and process events until stopped.
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway connection fails fatally.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> PlatformResult<()> {
        info!("Starting Discord bot");
        self.client.start().await.map_err(|e| {
            PlatformError::new(PlatformErrorKind::Unavailable(format!("Client error: {}", e)))
        })
    }

    /// HTTP client shared with the gateway connection.
    pub fn http(&self) -> Arc<Http> {
        self.client.http.clone()
    }

    /// Handle that shuts the bot down from another task.
    pub fn stopper(&self) -> Stopper {
        Stopper {
            shard_manager: self.client.shard_manager.clone(),
            http: self.client.http.clone(),
            cache: self.client.cache.clone(),
            handler: self.handler.clone(),
        }
    }
}

/// Shuts a [`CovenBot`] down.
#[derive(Clone)]
pub struct Stopper {
    shard_manager: Arc<ShardManager>,
    http: Arc<Http>,
    cache: Arc<Cache>,
    handler: Arc<CovenHandler>,
}

impl Stopper {
    /// Post the "stopped" notice, stop the unban scheduler and close every shard.
    ///
    /// [`CovenBot::start`] returns once the shards are down.
    #[instrument(skip(self))]
    pub async fn stop(&self) {
        let guild_ids: Vec<GuildId> = self
            .cache
            .guilds()
            .into_iter()
            .map(ToCoven::to_coven)
            .collect();
        info!(guilds = guild_ids.len(), "Shutting down");

        self.handler
            .announce(&self.http, &guild_ids, Notice::stopped())
            .await;
        self.handler.moderation().shutdown();
        self.shard_manager.shutdown_all().await;
        info!("Bot has shut down");
    }
}
