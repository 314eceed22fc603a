//! Top-level error wrapper types.

use crate::{CommandError, ConfigError, DatabaseError, ModerationError, PlatformError};

/// Every error the bot can surface.
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum CovenErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Database error
    #[from(DatabaseError)]
    Database(DatabaseError),
    /// Chat platform error
    #[from(PlatformError)]
    Platform(PlatformError),
    /// Moderation error
    #[from(ModerationError)]
    Moderation(ModerationError),
    /// Rejected command input
    #[from(CommandError)]
    Command(CommandError),
}

/// Coven error with kind discrimination.
///
/// # Examples
///
/// ```
/// use coven_error::{CovenError, CovenErrorKind, DatabaseError, DatabaseErrorKind};
///
/// let err: CovenError = DatabaseError::new(DatabaseErrorKind::NotFound).into();
/// assert!(matches!(err.kind(), CovenErrorKind::Database(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Coven Error: {}", _0)]
pub struct CovenError(Box<CovenErrorKind>);

impl CovenError {
    /// Create a new error from a kind.
    pub fn new(kind: CovenErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &CovenErrorKind {
        &self.0
    }

    /// Short, user-facing description without source locations.
    pub fn user_message(&self) -> String {
        match self.kind() {
            CovenErrorKind::Config(e) => e.kind.to_string(),
            CovenErrorKind::Database(e) => e.kind.to_string(),
            CovenErrorKind::Platform(e) => e.kind.to_string(),
            CovenErrorKind::Moderation(e) => e.kind.to_string(),
            CovenErrorKind::Command(e) => e.kind.to_string(),
        }
    }
}

// Generic From implementation for any type that converts to CovenErrorKind
impl<T> From<T> for CovenError
where
    T: Into<CovenErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for coven operations.
pub type CovenResult<T> = std::result::Result<T, CovenError>;
