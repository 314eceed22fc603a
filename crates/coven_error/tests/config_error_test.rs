//! Configuration error construction and reporting.

use coven_error::{ConfigError, ConfigErrorKind, CovenError, CovenErrorKind};

#[test]
fn test_invalid_setting_reports_key() {
    let err = ConfigError::invalid("discord.token", "is empty");

    assert_eq!(err.key(), Some("discord.token"));
    assert!(err.file.ends_with("config_error_test.rs"));
    assert!(err.to_string().starts_with("Configuration Error: discord.token is empty"));
}

#[test]
fn test_load_and_setup_have_no_key() {
    let load = ConfigError::load("words.json", "No such file");
    assert_eq!(
        load.kind,
        ConfigErrorKind::Load {
            origin: "words.json".into(),
            reason: "No such file".into(),
        }
    );
    assert_eq!(load.key(), None);

    let setup = ConfigError::setup("subscriber already installed");
    assert_eq!(setup.kind.to_string(), "Setup failed: subscriber already installed");
    assert_eq!(setup.key(), None);
}

#[test]
fn test_user_message_omits_location() {
    let err: CovenError = ConfigError::invalid("database.pool_size", "must be at least 1").into();

    assert!(matches!(err.kind(), CovenErrorKind::Config(_)));
    assert_eq!(err.user_message(), "database.pool_size must be at least 1");
}
