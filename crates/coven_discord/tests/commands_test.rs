//! Slash command parsing.

use coven_core::{ChannelId, ChannelPurpose, Hand, MessageId, RoleId, UserId};
use coven_discord::{
    BotCommand, COMMAND_NAMES, CommandInput, DEFAULT_REASON, OptionValue, definitions,
};
use coven_error::CommandErrorKind;

fn kind(input: &CommandInput) -> CommandErrorKind {
    BotCommand::parse(input).unwrap_err().kind
}

#[test]
fn test_every_command_is_defined() {
    assert_eq!(definitions().len(), COMMAND_NAMES.len());
}

fn definition(name: &str) -> serde_json::Value {
    definitions()
        .into_iter()
        .map(|command| serde_json::to_value(command).unwrap())
        .find(|command| command["name"] == name)
        .unwrap_or_else(|| panic!("{name} is not defined"))
}

#[test]
fn test_definitions_match_command_names() {
    let mut defined: Vec<String> = definitions()
        .into_iter()
        .map(|command| serde_json::to_value(command).unwrap()["name"].to_string())
        .map(|name| name.trim_matches('"').to_string())
        .collect();
    let mut expected: Vec<String> = COMMAND_NAMES.iter().map(|n| n.to_string()).collect();
    defined.sort();
    expected.sort();

    assert_eq!(defined, expected);
}

#[test]
fn test_tempban_options_are_typed() {
    let tempban = definition("tempban");
    let options = tempban["options"].as_array().unwrap();
    let summary: Vec<(&str, u64)> = options
        .iter()
        .map(|option| (option["name"].as_str().unwrap(), option["type"].as_u64().unwrap()))
        .collect();

    // User = 6, String = 3
    assert_eq!(summary, vec![("member", 6), ("duration", 3), ("reason", 3)]);
    assert_eq!(tempban["default_member_permissions"], "8");
}

#[test]
fn test_tempban_defaults_reason() {
    let input = CommandInput::new("tempban")
        .option("member", OptionValue::User(UserId(5)))
        .option("duration", OptionValue::String("10m".into()));

    assert_eq!(
        BotCommand::parse(&input).unwrap(),
        BotCommand::Tempban {
            user: UserId(5),
            duration: "10m".into(),
            reason: DEFAULT_REASON.into(),
        }
    );
}

#[test]
fn test_pardon_keeps_reason() {
    let input = CommandInput::new("pardon")
        .option("user", OptionValue::User(UserId(5)))
        .option("reason", OptionValue::String("appeal accepted".into()));

    assert_eq!(
        BotCommand::parse(&input).unwrap(),
        BotCommand::Pardon {
            user: UserId(5),
            reason: "appeal accepted".into(),
        }
    );
}

#[test]
fn test_missing_option_is_reported() {
    let input = CommandInput::new("kick");
    assert_eq!(kind(&input), CommandErrorKind::MissingOption("member".into()));
}

#[test]
fn test_wrong_option_type_is_rejected() {
    let input = CommandInput::new("kick").option("member", OptionValue::Integer(3));
    assert!(matches!(
        kind(&input),
        CommandErrorKind::InvalidOption { name, .. } if name == "member"
    ));
}

#[test]
fn test_level_member_is_optional() {
    let input = CommandInput::new("level");
    assert_eq!(
        BotCommand::parse(&input).unwrap(),
        BotCommand::Level { user: None }
    );
}

#[test]
fn test_set_and_add_subcommands() {
    let set = CommandInput::new("set")
        .subcommand("level")
        .option("member", OptionValue::User(UserId(1)))
        .option("value", OptionValue::Integer(4));
    let add = CommandInput::new("add")
        .subcommand("xp")
        .option("member", OptionValue::User(UserId(1)))
        .option("value", OptionValue::Integer(40));

    assert_eq!(
        BotCommand::parse(&set).unwrap(),
        BotCommand::SetLevel {
            user: UserId(1),
            value: 4,
        }
    );
    assert_eq!(
        BotCommand::parse(&add).unwrap(),
        BotCommand::AddXp {
            user: UserId(1),
            value: 40,
        }
    );
}

#[test]
fn test_message_role_add_parses_message_id() {
    let input = CommandInput::new("message")
        .subcommand("role")
        .subcommand("add")
        .option("message", OptionValue::String(" 1234567890 ".into()))
        .option("role", OptionValue::Role(RoleId(9)))
        .option("emoji", OptionValue::String("👍".into()));

    assert_eq!(input.path(), "message role add");
    assert_eq!(
        BotCommand::parse(&input).unwrap(),
        BotCommand::MessageRoleAdd {
            message: MessageId(1234567890),
            role: RoleId(9),
            emoji: "👍".into(),
        }
    );
}

#[test]
fn test_message_id_must_be_numeric() {
    let input = CommandInput::new("message")
        .subcommand("role")
        .subcommand("remove")
        .option("message", OptionValue::String("not-an-id".into()))
        .option("role", OptionValue::Role(RoleId(9)));

    assert!(matches!(
        kind(&input),
        CommandErrorKind::InvalidOption { name, .. } if name == "message"
    ));
}

#[test]
fn test_channel_add_uses_listed_purpose() {
    let input = CommandInput::new("channel")
        .subcommand("add")
        .option("description", OptionValue::String("Read the rules".into()))
        .option("channel", OptionValue::Channel(ChannelId(77)));

    assert_eq!(
        BotCommand::parse(&input).unwrap(),
        BotCommand::ChannelSet {
            purpose: ChannelPurpose::Listed("Read the rules".into()),
            channel: Some(ChannelId(77)),
        }
    );
}

#[test]
fn test_channel_add_rejects_reserved_and_long_descriptions() {
    let reserved = CommandInput::new("channel")
        .subcommand("add")
        .option("description", OptionValue::String("level".into()));
    let long = CommandInput::new("channel")
        .subcommand("add")
        .option("description", OptionValue::String("x".repeat(101)));

    assert!(matches!(kind(&reserved), CommandErrorKind::InvalidOption { .. }));
    assert!(matches!(kind(&long), CommandErrorKind::InvalidOption { .. }));
}

#[test]
fn test_channel_level_targets_current_channel() {
    let input = CommandInput::new("channel").subcommand("level");
    assert_eq!(
        BotCommand::parse(&input).unwrap(),
        BotCommand::ChannelSet {
            purpose: ChannelPurpose::Level,
            channel: None,
        }
    );
}

#[test]
fn test_dice_rejects_inverted_range() {
    let input = CommandInput::new("dice")
        .option("minimum", OptionValue::Integer(6))
        .option("maximum", OptionValue::Integer(1));
    assert!(matches!(kind(&input), CommandErrorKind::InvalidOption { .. }));
}

#[test]
fn test_rps_hand_comes_from_subcommand() {
    let input = CommandInput::new("rps").subcommand("scissors");
    assert_eq!(
        BotCommand::parse(&input).unwrap(),
        BotCommand::Rps {
            hand: Hand::Scissors,
        }
    );
}

#[test]
fn test_unknown_command() {
    let input = CommandInput::new("rps").subcommand("lizard");
    assert_eq!(kind(&input), CommandErrorKind::Unknown("rps lizard".into()));

    let input = CommandInput::new("hi");
    assert_eq!(kind(&input), CommandErrorKind::Unknown("hi".into()));
}

#[test]
fn test_only_games_and_level_are_public() {
    assert!(!BotCommand::Level { user: None }.is_admin());
    assert!(!BotCommand::Rps { hand: Hand::Rock }.is_admin());
    assert!(BotCommand::MessageRoleReset.is_admin());
    assert!(BotCommand::Reset { user: UserId(1) }.is_admin());
}

#[test]
fn test_moderation_commands_defer_their_response() {
    let tempban = BotCommand::Tempban {
        user: UserId(1),
        duration: "1d".into(),
        reason: DEFAULT_REASON.into(),
    };
    let pardon = BotCommand::Pardon {
        user: UserId(1),
        reason: DEFAULT_REASON.into(),
    };
    let kick = BotCommand::Kick {
        user: UserId(1),
        reason: DEFAULT_REASON.into(),
    };

    assert!(tempban.defers_response());
    assert!(pardon.defers_response());
    assert!(kick.defers_response());
    assert!(!BotCommand::Level { user: None }.defers_response());
    assert!(!BotCommand::MessageRoleReset.defers_response());
}

#[test]
fn test_self_role_channel_requires_registered_message_in_guild() {
    use coven_core::GuildId;
    use coven_database::SelfRoleMessageRow;
    use coven_discord::self_role_channel;

    let row = SelfRoleMessageRow {
        message_id: 10,
        channel_id: 20,
        guild_id: 30,
    };

    assert_eq!(self_role_channel(Some(&row), GuildId(30)).unwrap(), ChannelId(20));

    let unregistered = self_role_channel(None, GuildId(30)).unwrap_err().kind;
    assert!(matches!(
        unregistered,
        CommandErrorKind::InvalidOption { ref name, .. } if name == "message"
    ));

    // A registered message from another guild is rejected before any reaction.
    assert!(self_role_channel(Some(&row), GuildId(31)).is_err());
}
