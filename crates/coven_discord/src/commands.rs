//! Slash command definitions and parsing.

use crate::options::CommandInput;
use coven_core::{ChannelId, ChannelPurpose, GuildId, Hand, MessageId, RoleId, UserId};
use coven_database::SelfRoleMessageRow;
use coven_error::{CommandError, CommandErrorKind, CommandResult};
use serenity::all::{CommandOptionType, CreateCommand, CreateCommandOption, Permissions};

/// Reason recorded when a moderator gives none.
pub const DEFAULT_REASON: &str = "No reason provided";

/// Names of every top-level command, in registration order.
pub const COMMAND_NAMES: [&str; 13] = [
    "tempban", "pardon", "kick", "level", "reset", "set", "add", "message", "channel", "onjoin",
    "role", "dice", "rps",
];

/// Longest description a listed channel may carry.
const MAX_CHANNEL_DESCRIPTION: usize = 100;

/// A parsed slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    /// `/tempban member duration [reason]`
    Tempban {
        /// Member to ban
        user: UserId,
        /// `<n><s|m|h|d>`, validated by the moderation service
        duration: String,
        /// Audit log reason
        reason: String,
    },
    /// `/pardon user [reason]`
    Pardon {
        /// User to unban
        user: UserId,
        /// Audit log reason
        reason: String,
    },
    /// `/kick member [reason]`
    Kick {
        /// Member to kick
        user: UserId,
        /// Audit log reason
        reason: String,
    },
    /// `/level [member]`, defaulting to the caller
    Level {
        /// Member to look up
        user: Option<UserId>,
    },
    /// `/reset member`
    Reset {
        /// Member whose progress is deleted
        user: UserId,
    },
    /// `/set xp member value`
    SetXp {
        /// Member to change
        user: UserId,
        /// New XP
        value: i64,
    },
    /// `/set level member value`
    SetLevel {
        /// Member to change
        user: UserId,
        /// New level
        value: i64,
    },
    /// `/add xp member value`
    AddXp {
        /// Member to change
        user: UserId,
        /// XP to add
        value: i64,
    },
    /// `/add level member value`
    AddLevel {
        /// Member to change
        user: UserId,
        /// Levels to add
        value: i64,
    },
    /// `/message create title description`
    MessageCreate {
        /// Embed title
        title: String,
        /// Embed description
        description: String,
    },
    /// `/message role add message role emoji`
    MessageRoleAdd {
        /// Self-role message
        message: MessageId,
        /// Role granted by the reaction
        role: RoleId,
        /// Emoji as typed by the moderator
        emoji: String,
    },
    /// `/message role remove message role`
    MessageRoleRemove {
        /// Self-role message
        message: MessageId,
        /// Role to unbind
        role: RoleId,
    },
    /// `/message role reset`
    MessageRoleReset,
    /// `/channel level`, `/channel announcements` and `/channel add`
    ChannelSet {
        /// What the channel is for
        purpose: ChannelPurpose,
        /// Target channel; the current channel when absent
        channel: Option<ChannelId>,
    },
    /// `/channel announce title value [author]`
    ChannelAnnounce {
        /// Embed title
        title: String,
        /// Embed body
        value: String,
        /// Embed author line
        author: Option<String>,
    },
    /// `/channel description value`
    ChannelDescription {
        /// Welcome template, `%u` is the member mention
        value: String,
    },
    /// `/onjoin role`
    OnJoinRole {
        /// Role given to new members
        role: RoleId,
    },
    /// `/role set role level`
    LevelRole {
        /// Role to grant
        role: RoleId,
        /// Level at which it is granted
        level: i64,
    },
    /// `/dice minimum maximum`
    Dice {
        /// Lowest face
        minimum: i64,
        /// Highest face
        maximum: i64,
    },
    /// `/rps rock|paper|scissors`
    Rps {
        /// The player's hand
        hand: Hand,
    },
}

impl BotCommand {
    /// Parse an invocation.
    ///
    /// # Errors
    ///
    /// - `Unknown` for a command path the bot does not register
    /// - `MissingOption` / `InvalidOption` for unusable options
    pub fn parse(input: &CommandInput) -> CommandResult<Self> {
        let path: Vec<&str> = input.subcommands().iter().map(String::as_str).collect();
        let reason = || -> CommandResult<String> {
            Ok(input
                .opt_string("reason")?
                .unwrap_or_else(|| DEFAULT_REASON.to_string()))
        };

        let command = match (input.name().as_str(), path.as_slice()) {
            ("tempban", []) => Self::Tempban {
                user: input.user("member")?,
                duration: input.string("duration")?,
                reason: reason()?,
            },
            ("pardon", []) => Self::Pardon {
                user: input.user("user")?,
                reason: reason()?,
            },
            ("kick", []) => Self::Kick {
                user: input.user("member")?,
                reason: reason()?,
            },
            ("level", []) => Self::Level {
                user: input.opt_user("member")?,
            },
            ("reset", []) => Self::Reset {
                user: input.user("member")?,
            },
            ("set", ["xp"]) => Self::SetXp {
                user: input.user("member")?,
                value: input.integer("value")?,
            },
            ("set", ["level"]) => Self::SetLevel {
                user: input.user("member")?,
                value: input.integer("value")?,
            },
            ("add", ["xp"]) => Self::AddXp {
                user: input.user("member")?,
                value: input.integer("value")?,
            },
            ("add", ["level"]) => Self::AddLevel {
                user: input.user("member")?,
                value: input.integer("value")?,
            },
            ("message", ["create"]) => Self::MessageCreate {
                title: input.string("title")?,
                description: input.string("description")?,
            },
            ("message", ["role", "add"]) => Self::MessageRoleAdd {
                message: parse_message_id(&input.string("message")?)?,
                role: input.role("role")?,
                emoji: non_empty("emoji", input.string("emoji")?)?,
            },
            ("message", ["role", "remove"]) => Self::MessageRoleRemove {
                message: parse_message_id(&input.string("message")?)?,
                role: input.role("role")?,
            },
            ("message", ["role", "reset"]) => Self::MessageRoleReset,
            ("channel", ["level"]) => Self::ChannelSet {
                purpose: ChannelPurpose::Level,
                channel: None,
            },
            ("channel", ["announcements"]) => Self::ChannelSet {
                purpose: ChannelPurpose::Announce,
                channel: None,
            },
            ("channel", ["add"]) => Self::ChannelSet {
                purpose: listed_purpose(input.string("description")?)?,
                channel: input.opt_channel("channel")?,
            },
            ("channel", ["announce"]) => Self::ChannelAnnounce {
                title: input.string("title")?,
                value: input.string("value")?,
                author: input.opt_string("author")?,
            },
            ("channel", ["description"]) => Self::ChannelDescription {
                value: non_empty("value", input.string("value")?)?,
            },
            ("onjoin", []) => Self::OnJoinRole {
                role: input.role("role")?,
            },
            ("role", ["set"]) => Self::LevelRole {
                role: input.role("role")?,
                level: input.integer("level")?,
            },
            ("dice", []) => {
                let minimum = input.integer("minimum")?;
                let maximum = input.integer("maximum")?;
                if minimum > maximum {
                    return Err(CommandError::invalid(
                        "maximum",
                        "must not be lower than minimum",
                    ));
                }
                Self::Dice { minimum, maximum }
            }
            ("rps", [hand]) => Self::Rps {
                hand: hand
                    .parse::<Hand>()
                    .map_err(|_| CommandError::new(CommandErrorKind::Unknown(input.path())))?,
            },
            _ => return Err(CommandError::new(CommandErrorKind::Unknown(input.path()))),
        };
        Ok(command)
    }

    /// Whether the reply waits on the platform and the unban scheduler.
    ///
    /// These are acknowledged straight away so the interaction does not
    /// expire while the ban, the store write and the reconcile run.
    pub fn defers_response(&self) -> bool {
        matches!(
            self,
            Self::Tempban { .. } | Self::Pardon { .. } | Self::Kick { .. }
        )
    }

    /// Whether only administrators may run this command.
    pub fn is_admin(&self) -> bool {
        !matches!(
            self,
            Self::Level { .. } | Self::Dice { .. } | Self::Rps { .. }
        )
    }
}

fn parse_message_id(raw: &str) -> CommandResult<MessageId> {
    match raw.trim().parse::<u64>() {
        Ok(id) if id > 0 => Ok(MessageId(id)),
        _ => Err(CommandError::invalid("message", "expected a message id")),
    }
}

fn non_empty(name: &str, value: String) -> CommandResult<String> {
    if value.trim().is_empty() {
        Err(CommandError::invalid(name, "must not be empty"))
    } else {
        Ok(value)
    }
}

fn listed_purpose(description: String) -> CommandResult<ChannelPurpose> {
    let description = non_empty("description", description)?;
    if description.chars().count() > MAX_CHANNEL_DESCRIPTION {
        return Err(CommandError::invalid(
            "description",
            format!("at most {MAX_CHANNEL_DESCRIPTION} characters"),
        ));
    }
    if ChannelPurpose::RESERVED.contains(&description.as_str()) {
        return Err(CommandError::invalid("description", "that name is reserved"));
    }
    Ok(ChannelPurpose::Listed(description))
}

fn option(kind: CommandOptionType, name: &str, description: &str) -> CreateCommandOption {
    CreateCommandOption::new(kind, name, description)
}

fn required(kind: CommandOptionType, name: &str, description: &str) -> CreateCommandOption {
    option(kind, name, description).required(true)
}

fn subcommand(name: &str, description: &str) -> CreateCommandOption {
    option(CommandOptionType::SubCommand, name, description)
}

fn admin(name: &str, description: &str) -> CreateCommand {
    CreateCommand::new(name)
        .description(description)
        .default_member_permissions(Permissions::ADMINISTRATOR)
}

fn member_value(name: &str, description: &str, value: &str) -> CreateCommandOption {
    subcommand(name, description)
        .add_sub_option(required(CommandOptionType::User, "member", "Member to change."))
        .add_sub_option(required(CommandOptionType::Integer, "value", value))
}

/// Channel of a self-role message registered in `guild_id`.
///
/// Checked before the bot reacts, so a rejected `/message role add` stores nothing.
pub fn self_role_channel(
    registered: Option<&SelfRoleMessageRow>,
    guild_id: GuildId,
) -> CommandResult<ChannelId> {
    match registered {
        Some(row) if GuildId::from_i64(row.guild_id) == guild_id => Ok(row.channel()),
        _ => Err(CommandError::invalid("message", "not a self-role message")),
    }
}

/// Every command the bot registers.
pub fn definitions() -> Vec<CreateCommand> {
    use CommandOptionType as Kind;

    let reason = || option(Kind::String, "reason", "Reason for the audit log.");

    vec![
        admin("tempban", "Temporarily ban a member.")
            .add_option(required(Kind::User, "member", "Member to ban."))
            .add_option(required(
                Kind::String,
                "duration",
                "Duration as <number><unit> (s=seconds, m=minutes, h=hours, d=days).",
            ))
            .add_option(reason()),
        admin("pardon", "Lift a temporary ban early.")
            .add_option(required(Kind::User, "user", "User to pardon."))
            .add_option(reason()),
        admin("kick", "Kick a member.")
            .add_option(required(Kind::User, "member", "Member to kick."))
            .add_option(reason()),
        CreateCommand::new("level")
            .description("Check your level or someone else's.")
            .add_option(option(Kind::User, "member", "Member to check.")),
        admin("reset", "Reset a member's level.")
            .add_option(required(Kind::User, "member", "Member to reset.")),
        admin("set", "Set a member's level or XP.")
            .add_option(member_value("xp", "Set a member's XP.", "New XP value."))
            .add_option(member_value("level", "Set a member's level.", "New level value.")),
        admin("add", "Add to a member's level or XP.")
            .add_option(member_value("xp", "Add XP to a member.", "Amount of XP to add."))
            .add_option(member_value("level", "Add levels to a member.", "Levels to add.")),
        admin("message", "Manage self-role messages.")
            .add_option(
                subcommand("create", "Post a new self-role message.")
                    .add_sub_option(required(Kind::String, "title", "Title of the message."))
                    .add_sub_option(required(Kind::String, "description", "Body of the message.")),
            )
            .add_option(
                option(
                    Kind::SubCommandGroup,
                    "role",
                    "Manage the roles of a message.",
                )
                .add_sub_option(
                    subcommand("add", "Bind a role to a reaction.")
                        .add_sub_option(required(Kind::String, "message", "Id of the message."))
                        .add_sub_option(required(Kind::Role, "role", "Role to grant."))
                        .add_sub_option(required(Kind::String, "emoji", "Emoji that grants it.")),
                )
                .add_sub_option(
                    subcommand("remove", "Unbind a role from a message.")
                        .add_sub_option(required(Kind::String, "message", "Id of the message."))
                        .add_sub_option(required(Kind::Role, "role", "Role to unbind.")),
                )
                .add_sub_option(subcommand("reset", "Unbind every role in this server.")),
            ),
        admin("channel", "Configure server channels.")
            .add_option(subcommand("level", "Use this channel for level-up messages."))
            .add_option(subcommand(
                "announcements",
                "Use this channel for announcements.",
            ))
            .add_option(
                subcommand("add", "List a channel in the welcome message.")
                    .add_sub_option(required(
                        Kind::String,
                        "description",
                        "What the channel is for.",
                    ))
                    .add_sub_option(option(Kind::Channel, "channel", "Channel to list.")),
            )
            .add_option(
                subcommand("announce", "Post in the announcements channel.")
                    .add_sub_option(required(Kind::String, "title", "Title of the announcement."))
                    .add_sub_option(required(Kind::String, "value", "Message to announce."))
                    .add_sub_option(option(Kind::String, "author", "Author of the announcement.")),
            )
            .add_option(
                subcommand("description", "Set the welcome message, %u = member mention.")
                    .add_sub_option(required(Kind::String, "value", "Welcome message.")),
            ),
        admin("onjoin", "Give new members a role.")
            .add_option(required(Kind::Role, "role", "Role to add on join.")),
        admin("role", "Level reward roles.").add_option(
            subcommand("set", "Grant a role from a level on.")
                .add_sub_option(required(Kind::Role, "role", "Role to grant."))
                .add_sub_option(required(Kind::Integer, "level", "Level of the role.")),
        ),
        CreateCommand::new("dice")
            .description("Roll a die.")
            .add_option(required(Kind::Integer, "minimum", "Lowest face."))
            .add_option(required(Kind::Integer, "maximum", "Highest face.")),
        CreateCommand::new("rps")
            .description("Play rock, paper, scissors.")
            .add_option(subcommand("rock", "Play rock."))
            .add_option(subcommand("paper", "Play paper."))
            .add_option(subcommand("scissors", "Play scissors.")),
    ]
}
