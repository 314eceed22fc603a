//! Moderation error types.

use crate::{DatabaseError, PlatformError};

/// Moderation error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ModerationErrorKind {
    /// The duration string is not `<positive integer><s|m|h|d>`
    #[display("Invalid duration '{}': expected a positive integer followed by s, m, h or d", _0)]
    InvalidDuration(String),
    /// The ban store rejected the operation
    #[display("Ban store error: {}", _0)]
    Store(String),
    /// The chat platform rejected the operation
    #[display("Platform error: {}", _0)]
    Platform(String),
    /// The unban scheduler could not be reached
    #[display("Scheduler error: {}", _0)]
    Scheduler(String),
}

/// Moderation error with source location tracking.
///
/// # Examples
///
/// ```
/// use coven_error::{ModerationError, ModerationErrorKind};
///
/// let err = ModerationError::new(ModerationErrorKind::InvalidDuration("10x".into()));
/// assert!(format!("{}", err).contains("10x"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Moderation Error: {} at line {} in {}", kind, line, file)]
pub struct ModerationError {
    /// The kind of error that occurred
    pub kind: ModerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ModerationError {
    /// Create a new ModerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ModerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl From<DatabaseError> for ModerationError {
    #[track_caller]
    fn from(err: DatabaseError) -> Self {
        ModerationError::new(ModerationErrorKind::Store(err.kind.to_string()))
    }
}

impl From<PlatformError> for ModerationError {
    #[track_caller]
    fn from(err: PlatformError) -> Self {
        ModerationError::new(ModerationErrorKind::Platform(err.kind.to_string()))
    }
}

/// Result type for moderation operations.
pub type ModerationResult<T> = Result<T, ModerationError>;
