//! Configuration error types.

/// What went wrong with the bot's settings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ConfigErrorKind {
    /// A settings source (file, environment, word list) could not be read or parsed
    #[display("Could not load {}: {}", origin, reason)]
    Load {
        /// File path or source description
        origin: String,
        /// Parser or I/O message
        reason: String,
    },
    /// A setting is present but unusable
    #[display("{} {}", key, reason)]
    Invalid {
        /// Dotted settings key, e.g. `database.pool_size`
        key: String,
        /// What is wrong with the value
        reason: String,
    },
    /// Building a component from valid settings failed
    #[display("Setup failed: {}", _0)]
    Setup(String),
}

/// Configuration error with source location.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    /// The kind of error that occurred
    pub kind: ConfigErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError at the current location.
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// A source that could not be read or parsed.
    #[track_caller]
    pub fn load(origin: impl Into<String>, reason: impl ToString) -> Self {
        Self::new(ConfigErrorKind::Load {
            origin: origin.into(),
            reason: reason.to_string(),
        })
    }

    /// A setting with an unusable value.
    ///
    /// # Examples
    ///
    /// ```
    /// use coven_error::ConfigError;
    ///
    /// let err = ConfigError::invalid("database.pool_size", "must be at least 1");
    /// assert_eq!(err.key(), Some("database.pool_size"));
    /// assert_eq!(err.kind.to_string(), "database.pool_size must be at least 1");
    /// ```
    #[track_caller]
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::Invalid {
            key: key.into(),
            reason: reason.into(),
        })
    }

    /// A component that could not be built from its settings.
    #[track_caller]
    pub fn setup(reason: impl ToString) -> Self {
        Self::new(ConfigErrorKind::Setup(reason.to_string()))
    }

    /// The offending settings key, for `Invalid` errors.
    pub fn key(&self) -> Option<&str> {
        match &self.kind {
            ConfigErrorKind::Invalid { key, .. } => Some(key),
            _ => None,
        }
    }
}
