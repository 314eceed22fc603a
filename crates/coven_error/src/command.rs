//! Slash command input errors.

/// Ways a command invocation can be rejected before anything changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum CommandErrorKind {
    /// The command or subcommand is not known to the bot
    #[display("Unknown command: {}", _0)]
    Unknown(String),
    /// A required option was not supplied
    #[display("Missing option: {}", _0)]
    MissingOption(String),
    /// An option was supplied with an unusable value
    #[display("Invalid {}: {}", name, reason)]
    InvalidOption {
        /// Option name
        name: String,
        /// What is wrong with the value
        reason: String,
    },
    /// The command only works inside a server
    #[display("This command can only be used in a server")]
    GuildOnly,
    /// The member has never earned XP in this server
    #[display("{} has no level data yet", _0)]
    NoLevelData(String),
}

/// Command error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Command Error: {} at line {} in {}", kind, line, file)]
pub struct CommandError {
    /// The kind of error that occurred
    pub kind: CommandErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl CommandError {
    /// Create a new CommandError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: CommandErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for [`CommandErrorKind::InvalidOption`].
    #[track_caller]
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(CommandErrorKind::InvalidOption {
            name: name.into(),
            reason: reason.into(),
        })
    }
}

/// Result type for command handling.
pub type CommandResult<T> = Result<T, CommandError>;
