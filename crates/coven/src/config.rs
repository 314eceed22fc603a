//! Layered configuration.
//!
//! Sources, later ones winning:
//! 1. Bundled defaults (`coven.toml` shipped with the binary)
//! 2. `~/.config/coven/coven.toml`
//! 3. `./coven.toml`
//! 4. A file given with `--config`
//! 5. `COVEN__`-prefixed environment variables, e.g. `COVEN__DATABASE__POOL_SIZE=10`
//!
//! `DISCORD_TOKEN` and `DATABASE_URL` fill in the token and url when no
//! source sets them.

use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use coven_error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../coven.toml");

/// Discord connection settings.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DiscordSettings {
    /// Bot token
    #[serde(default)]
    pub token: String,
    /// Guilds that get slash commands registered directly
    #[serde(default)]
    pub guild_ids: Vec<u64>,
    /// "Playing ..." status text
    pub activity: String,
}

impl std::fmt::Debug for DiscordSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordSettings")
            .field("token", &"<redacted>")
            .field("guild_ids", &self.guild_ids)
            .field("activity", &self.activity)
            .finish()
    }
}

/// PostgreSQL settings.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DatabaseSettings {
    /// Connection url
    #[serde(default)]
    pub url: String,
    /// Maximum pooled connections
    pub pool_size: u32,
    /// Apply pending migrations at startup
    pub run_migrations: bool,
}

impl std::fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("url", &"<redacted>")
            .field("pool_size", &self.pool_size)
            .field("run_migrations", &self.run_migrations)
            .finish()
    }
}

/// Leveling settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LevelingSettings {
    /// XP earned per message
    pub xp_per_message: i64,
}

/// Unban scheduler settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ModerationSettings {
    /// Store retries per reconcile
    pub reconcile_retries: usize,
    /// Initial retry backoff in milliseconds
    pub reconcile_backoff_ms: u64,
}

impl ModerationSettings {
    /// Initial retry backoff.
    pub fn reconcile_backoff(&self) -> Duration {
        Duration::from_millis(self.reconcile_backoff_ms)
    }
}

/// Blacklist settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct BlacklistSettings {
    /// JSON word list; no filtering when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingSettings {
    /// Filter used when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of text
    pub json: bool,
}

/// Complete bot configuration.
///
/// # Example
///
/// ```no_run
/// use coven::CovenConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = CovenConfig::load(None)?;
/// println!("pool size: {}", config.database.pool_size);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CovenConfig {
    /// Discord connection
    pub discord: DiscordSettings,
    /// PostgreSQL
    pub database: DatabaseSettings,
    /// Leveling
    pub leveling: LevelingSettings,
    /// Unban scheduler
    pub moderation: ModerationSettings,
    /// Message blacklist
    #[serde(default)]
    pub blacklist: BlacklistSettings,
    /// Logging
    pub logging: LoggingSettings,
}

impl CovenConfig {
    /// Load every source and apply environment fallbacks.
    ///
    /// Nothing is validated here; callers check what they need with
    /// [`Self::validate`] or [`Self::validate_database`].
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or parsed, or if
    /// `explicit` does not exist.
    #[instrument(skip(explicit))]
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        debug!("Loading configuration");

        let mut builder = Self::defaults();
        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/coven/coven.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }
        builder = builder.add_source(File::with_name("coven").required(false));
        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix("COVEN")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("discord.guild_ids")
                .try_parsing(true),
        );

        Ok(Self::build(builder)?.with_env_fallbacks(
            std::env::var("DISCORD_TOKEN").ok(),
            std::env::var("DATABASE_URL").ok(),
        ))
    }

    /// Bundled defaults overlaid with `toml`, without files, environment or validation.
    ///
    /// # Errors
    ///
    /// Returns an error if `toml` cannot be parsed.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        Self::build(Self::defaults().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    fn defaults() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder
            .build()
            .map_err(|e| ConfigError::load("configuration sources", e))?
            .try_deserialize()
            .map_err(|e| ConfigError::load("settings", e))
    }

    /// Fill an empty token or database url from the given values.
    pub fn with_env_fallbacks(mut self, token: Option<String>, url: Option<String>) -> Self {
        if self.discord.token.is_empty() {
            if let Some(token) = token {
                self.discord.token = token;
            }
        }
        if self.database.url.is_empty() {
            if let Some(url) = url {
                self.database.url = url;
            }
        }
        self
    }

    /// Check the settings the bot cannot start without.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.discord.token.trim().is_empty() {
            return Err(ConfigError::invalid(
                "discord.token",
                "is empty; set DISCORD_TOKEN or COVEN__DISCORD__TOKEN",
            ));
        }
        if self.discord.guild_ids.contains(&0) {
            return Err(ConfigError::invalid("discord.guild_ids", "must not contain 0"));
        }
        if self.leveling.xp_per_message < 0 {
            return Err(ConfigError::invalid("leveling.xp_per_message", "must not be negative"));
        }
        self.validate_database()
    }

    /// Check only the database settings, for commands that never connect to Discord.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate_database(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::invalid(
                "database.url",
                "is empty; set DATABASE_URL or COVEN__DATABASE__URL",
            ));
        }
        if self.database.pool_size == 0 {
            return Err(ConfigError::invalid("database.pool_size", "must be at least 1"));
        }
        Ok(())
    }
}
