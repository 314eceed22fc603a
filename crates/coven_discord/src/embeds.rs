//! Embeds posted by the bot.
//!
//! A [`Notice`] is plain data so that message content can be checked without
//! a Discord connection; it becomes a Serenity `CreateEmbed` only when sent.

use coven_core::{ChannelId, LevelProgress, FAREWELL_TEXT};
use serenity::all::{CreateEmbed, CreateEmbedAuthor, CreateEmbedFooter};

/// Embed colours.
pub mod colours {
    /// Success and "ready"
    pub const GREEN: u32 = 0x2ecc71;
    /// Errors, bans and "stopped"
    pub const RED: u32 = 0xe74c3c;
    /// Level changes and warnings
    pub const YELLOW: u32 = 0xfee75c;
    /// Welcome messages
    pub const BRAND_GREEN: u32 = 0x57f287;
    /// Farewell messages
    pub const BRAND_RED: u32 = 0xed4245;

    /// A random opaque colour.
    pub fn random() -> u32 {
        rand::random::<u32>() & 0x00ff_ffff
    }
}

/// Title used when a notice is given none.
const DEFAULT_TITLE: &str = "Discord Bot";

/// Author line of moderation replies.
pub(crate) const MODERATION: &str = "Moderation";
/// Author line of leveling replies.
pub(crate) const LEVEL: &str = "Level";
/// Author line of self-role replies.
pub(crate) const ROLE_SYSTEM: &str = "Role System";
/// Author line of server configuration replies.
pub(crate) const SERVER_SYSTEM: &str = "Server System";

/// One embed field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeField {
    /// Field name
    pub name: String,
    /// Field value
    pub value: String,
    /// Render next to the previous field
    pub inline: bool,
}

/// Content of an embed.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct Notice {
    title: String,
    description: String,
    colour: u32,
    author: Option<String>,
    footer: Option<String>,
    thumbnail: Option<String>,
    fields: Vec<NoticeField>,
}

impl Notice {
    /// A notice with a title and colour.
    pub fn new(title: impl Into<String>, colour: u32) -> Self {
        let title = title.into();
        Self {
            title: if title.is_empty() {
                DEFAULT_TITLE.to_string()
            } else {
                title
            },
            description: String::new(),
            colour,
            author: None,
            footer: None,
            thumbnail: None,
            fields: Vec::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the author line.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the footer to "By {name}".
    pub fn by(mut self, name: &str) -> Self {
        self.footer = Some(format!("By {name}"));
        self
    }

    /// Set the thumbnail when a URL is known.
    pub fn with_thumbnail(mut self, url: Option<String>) -> Self {
        self.thumbnail = url;
        self
    }

    /// Append a field.
    pub fn with_field(
        mut self,
        name: impl Into<String>,
        value: impl ToString,
        inline: bool,
    ) -> Self {
        self.fields.push(NoticeField {
            name: name.into(),
            value: value.to_string(),
            inline,
        });
        self
    }

    /// Posted to every announcements channel once connected.
    pub fn ready() -> Self {
        Self::new("Ready!", colours::GREEN).with_description("🟩 The bot is ready to use!")
    }

    /// Posted to every announcements channel on shutdown.
    pub fn stopped() -> Self {
        Self::new("Stopped.", colours::RED).with_description("🟥 The bot has been stopped!")
    }

    /// Posted to the level channel when a member levels up.
    pub fn level_up(mention: &str, level: i64, avatar: Option<String>) -> Self {
        Self::new("Level up!", colours::YELLOW)
            .with_description(format!("🎉 {mention} just leveled up!"))
            .with_author(LEVEL)
            .with_thumbnail(avatar)
            .with_field("New level", level, true)
    }

    /// Welcome for a new member, listing the server's advertised channels.
    pub fn welcome(
        name: &str,
        guild: &str,
        description: String,
        channels: &[(ChannelId, String)],
        avatar: Option<String>,
    ) -> Self {
        channels.iter().fold(
            Self::new(format!("{name} joined {guild} 🎉"), colours::BRAND_GREEN)
                .with_description(description)
                .with_thumbnail(avatar),
            |notice, (channel, label)| {
                notice.with_field(label.clone(), format!("<#{channel}>"), false)
            },
        )
    }

    /// Farewell for a member who left.
    pub fn farewell(name: &str, avatar: Option<String>) -> Self {
        Self::new(format!("{name} has abandoned us 😢"), colours::BRAND_RED)
            .with_description(FAREWELL_TEXT)
            .with_thumbnail(avatar)
    }

    /// Level and XP of a member.
    pub fn level_check(mention: &str, progress: LevelProgress) -> Self {
        Self::new("Level check", colours::GREEN)
            .with_description(format!(
                "{mention} is level {} ({} XP).",
                progress.level, progress.xp
            ))
            .with_author(LEVEL)
    }

    /// Result of an administrative level change.
    pub fn level_changed(title: &str, description: String, progress: LevelProgress) -> Self {
        Self::new(title, colours::YELLOW)
            .with_description(description)
            .with_author(LEVEL)
            .with_field("Level", progress.level, true)
            .with_field("XP", progress.xp, true)
    }

    /// A command succeeded.
    pub fn success(author: &str, title: &str, description: impl Into<String>) -> Self {
        Self::new(title, colours::GREEN)
            .with_description(description)
            .with_author(author)
    }

    /// A command failed.
    pub fn error(description: impl Into<String>) -> Self {
        Self::new("Error", colours::RED).with_description(description)
    }
}

impl From<Notice> for CreateEmbed {
    fn from(notice: Notice) -> Self {
        let mut embed = CreateEmbed::new()
            .title(notice.title)
            .description(notice.description)
            .colour(notice.colour);
        if let Some(author) = notice.author {
            embed = embed.author(CreateEmbedAuthor::new(author));
        }
        if let Some(footer) = notice.footer {
            embed = embed.footer(CreateEmbedFooter::new(footer));
        }
        if let Some(url) = notice.thumbnail {
            embed = embed.thumbnail(url);
        }
        for field in notice.fields {
            embed = embed.field(field.name, field.value, field.inline);
        }
        embed
    }
}
