//! Tests for layered configuration.

use coven::CovenConfig;
use std::path::PathBuf;
use std::time::Duration;

fn complete() -> CovenConfig {
    CovenConfig::from_toml(
        r#"
        [discord]
        token = "abc"

        [database]
        url = "postgres://localhost/coven"
        "#,
    )
    .expect("config parses")
}

#[test]
fn test_defaults_are_bundled() {
    let config = CovenConfig::from_toml("").expect("defaults parse");

    assert_eq!(config.discord.token, "");
    assert!(config.discord.guild_ids.is_empty());
    assert_eq!(config.discord.activity, "witchcraft");
    assert_eq!(config.database.pool_size, 5);
    assert!(config.database.run_migrations);
    assert_eq!(config.leveling.xp_per_message, 10);
    assert_eq!(config.moderation.reconcile_retries, 3);
    assert_eq!(config.moderation.reconcile_backoff(), Duration::from_millis(200));
    assert_eq!(config.blacklist.path, None);
    assert_eq!(config.logging.level, "info");
    assert!(!config.logging.json);
}

#[test]
fn test_overlay_replaces_only_given_keys() {
    let config = CovenConfig::from_toml(
        r#"
        [discord]
        guild_ids = [42, 43]

        [database]
        pool_size = 12

        [blacklist]
        path = "words.json"
        "#,
    )
    .expect("config parses");

    assert_eq!(config.discord.guild_ids, vec![42, 43]);
    assert_eq!(config.discord.activity, "witchcraft");
    assert_eq!(config.database.pool_size, 12);
    assert!(config.database.run_migrations);
    assert_eq!(config.blacklist.path, Some(PathBuf::from("words.json")));
}

#[test]
fn test_malformed_toml_is_rejected() {
    assert!(CovenConfig::from_toml("[database\npool_size = 3").is_err());
}

#[test]
fn test_env_fallbacks_fill_empty_values() {
    let config = CovenConfig::from_toml("")
        .expect("defaults parse")
        .with_env_fallbacks(Some("token".into()), Some("postgres://db".into()));

    assert_eq!(config.discord.token, "token");
    assert_eq!(config.database.url, "postgres://db");
}

#[test]
fn test_env_fallbacks_do_not_override_configured_values() {
    let config =
        complete().with_env_fallbacks(Some("other".into()), Some("postgres://other".into()));

    assert_eq!(config.discord.token, "abc");
    assert_eq!(config.database.url, "postgres://localhost/coven");
}

#[test]
fn test_complete_config_validates() {
    assert!(complete().validate().is_ok());
}

#[test]
fn test_missing_token_fails_validation() {
    let mut config = complete();
    config.discord.token = "   ".to_string();

    let err = config.validate().unwrap_err();
    assert_eq!(err.key(), Some("discord.token"));
    // Database-only commands do not need a token
    assert!(config.validate_database().is_ok());
}

#[test]
fn test_missing_database_url_fails_validation() {
    let mut config = complete();
    config.database.url.clear();

    assert!(config.validate().is_err());
    let err = config.validate_database().unwrap_err();
    assert_eq!(err.key(), Some("database.url"));
}

#[test]
fn test_zero_pool_size_fails_validation() {
    let mut config = complete();
    config.database.pool_size = 0;

    let err = config.validate_database().unwrap_err();
    assert_eq!(err.key(), Some("database.pool_size"));
}

#[test]
fn test_zero_guild_id_fails_validation() {
    let mut config = complete();
    config.discord.guild_ids = vec![1, 0];

    assert!(config.validate().is_err());
}

#[test]
fn test_secrets_are_redacted_in_debug_output() {
    let rendered = format!("{:?}", complete());

    assert!(!rendered.contains("abc"));
    assert!(!rendered.contains("postgres://localhost"));
    assert!(rendered.contains("<redacted>"));
}
