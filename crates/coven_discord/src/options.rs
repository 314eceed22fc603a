//! Slash command options, detached from Serenity's borrowed types.

use crate::conversions::ToCoven;
use coven_core::{ChannelId, RoleId, UserId};
use coven_error::{CommandError, CommandErrorKind, CommandResult};
use serenity::all::{CommandData, ResolvedOption, ResolvedValue};
use std::collections::HashMap;
use tracing::debug;

/// A resolved option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// Free text
    String(String),
    /// Whole number
    Integer(i64),
    /// A user or member
    User(UserId),
    /// A role
    Role(RoleId),
    /// A channel
    Channel(ChannelId),
}

impl OptionValue {
    fn kind(&self) -> &'static str {
        match self {
            Self::String(_) => "text",
            Self::Integer(_) => "a number",
            Self::User(_) => "a user",
            Self::Role(_) => "a role",
            Self::Channel(_) => "a channel",
        }
    }
}

/// A command invocation: its name, the chosen subcommand path and the
/// options of the innermost subcommand.
#[derive(Debug, Clone, Default, PartialEq, Eq, derive_getters::Getters)]
pub struct CommandInput {
    /// Top-level command name
    name: String,
    /// Subcommand group and subcommand names, outermost first
    subcommands: Vec<String>,
    /// Options keyed by name
    options: HashMap<String, OptionValue>,
}

macro_rules! accessors {
    ($($required:ident, $optional:ident, $variant:ident => $ty:ty;)*) => {
        $(
            #[doc = concat!("Required option of type `", stringify!($ty), "`.")]
            pub fn $required(&self, name: &str) -> CommandResult<$ty> {
                self.$optional(name)?.ok_or_else(|| {
                    CommandError::new(CommandErrorKind::MissingOption(name.to_string()))
                })
            }

            #[doc = concat!("Optional option of type `", stringify!($ty), "`.")]
            pub fn $optional(&self, name: &str) -> CommandResult<Option<$ty>> {
                match self.options.get(name) {
                    None => Ok(None),
                    Some(OptionValue::$variant(value)) => Ok(Some(value.clone())),
                    Some(other) => Err(CommandError::invalid(
                        name,
                        format!("expected {}, got {}", stringify!($variant), other.kind()),
                    )),
                }
            }
        )*
    };
}

impl CommandInput {
    /// Input for the command `name` with no options.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Append a subcommand to the path.
    pub fn subcommand(mut self, name: impl Into<String>) -> Self {
        self.subcommands.push(name.into());
        self
    }

    /// Set an option.
    pub fn option(mut self, name: impl Into<String>, value: OptionValue) -> Self {
        self.options.insert(name.into(), value);
        self
    }

    /// Flatten an interaction's command data.
    pub fn from_interaction(data: &CommandData) -> Self {
        let mut input = Self::new(data.name.clone());
        input.collect(data.options());
        input
    }

    fn collect(&mut self, options: Vec<ResolvedOption<'_>>) {
        for option in options {
            let value = match option.value {
                ResolvedValue::SubCommand(inner) | ResolvedValue::SubCommandGroup(inner) => {
                    self.subcommands.push(option.name.to_string());
                    self.collect(inner);
                    continue;
                }
                ResolvedValue::String(text) => OptionValue::String(text.to_string()),
                ResolvedValue::Integer(number) => OptionValue::Integer(number),
                ResolvedValue::User(user, _) => OptionValue::User(user.id.to_coven()),
                ResolvedValue::Role(role) => OptionValue::Role(role.id.to_coven()),
                ResolvedValue::Channel(channel) => OptionValue::Channel(channel.id.to_coven()),
                _ => {
                    debug!(option = option.name, "Ignoring unsupported option type");
                    continue;
                }
            };
            self.options.insert(option.name.to_string(), value);
        }
    }

    /// Full command path, e.g. `message role add`.
    pub fn path(&self) -> String {
        std::iter::once(self.name.as_str())
            .chain(self.subcommands.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    accessors! {
        string, opt_string, String => String;
        integer, opt_integer, Integer => i64;
        user, opt_user, User => UserId;
        role, opt_role, Role => RoleId;
        channel, opt_channel, Channel => ChannelId;
    }
}
