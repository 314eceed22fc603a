//! Channel purposes.

/// What a configured channel is used for.
///
/// `level` and `announce` are reserved keys; every other key is a free-form
/// description shown in the welcome message's channel list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChannelPurpose {
    /// Level-up announcements
    Level,
    /// Ready/stopped notices, welcomes, farewells and `/channel announce`
    Announce,
    /// A channel advertised to new members under this description
    Listed(String),
}

impl ChannelPurpose {
    const LEVEL: &'static str = "level";
    const ANNOUNCE: &'static str = "announce";

    /// Keys that are never listed in the welcome message.
    pub const RESERVED: [&'static str; 2] = [Self::LEVEL, Self::ANNOUNCE];

    /// Storage key.
    pub fn key(&self) -> &str {
        match self {
            Self::Level => Self::LEVEL,
            Self::Announce => Self::ANNOUNCE,
            Self::Listed(description) => description,
        }
    }

    /// Inverse of [`Self::key`].
    pub fn from_key(key: &str) -> Self {
        match key {
            Self::LEVEL => Self::Level,
            Self::ANNOUNCE => Self::Announce,
            other => Self::Listed(other.to_string()),
        }
    }
}
