//! Chat platform error types.

/// Failure modes of a call to the chat platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PlatformErrorKind {
    /// The platform could not be reached or returned a server error
    #[display("Platform unavailable: {}", _0)]
    Unavailable(String),
    /// The platform reported the target as missing
    #[display("Not found on platform: {}", _0)]
    NotFound(String),
    /// The bot lacks the permission for the action
    #[display("Forbidden by platform: {}", _0)]
    Forbidden(String),
}

/// Platform error with source location tracking.
///
/// # Examples
///
/// ```
/// use coven_error::{PlatformError, PlatformErrorKind};
///
/// let err = PlatformError::new(PlatformErrorKind::Forbidden("ban members".into()));
/// assert!(format!("{}", err).contains("Forbidden"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Platform Error: {} at line {} in {}", kind, line, file)]
pub struct PlatformError {
    /// The kind of error that occurred
    pub kind: PlatformErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PlatformError {
    /// Create a new PlatformError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PlatformErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether the platform reported the target as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, PlatformErrorKind::NotFound(_))
    }
}

/// Result type for platform calls.
pub type PlatformResult<T> = Result<T, PlatformError>;

#[cfg(feature = "discord")]
impl From<serenity::Error> for PlatformError {
    #[track_caller]
    fn from(err: serenity::Error) -> Self {
        use serenity::http::HttpError;

        let message = err.to_string();
        let kind = match &err {
            serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) => {
                match response.status_code.as_u16() {
                    404 => PlatformErrorKind::NotFound(message),
                    403 => PlatformErrorKind::Forbidden(message),
                    _ => PlatformErrorKind::Unavailable(message),
                }
            }
            _ => PlatformErrorKind::Unavailable(message),
        };
        PlatformError::new(kind)
    }
}
