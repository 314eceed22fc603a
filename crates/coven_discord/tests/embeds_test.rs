//! Embed content.

use coven_core::{ChannelId, GuildId, LevelProgress, UserId, FAREWELL_TEXT};
use coven_discord::{Notice, ToCoven, ToSerenity, colours, reaction_for_key};
use serenity::all::ReactionType;

#[test]
fn test_ready_and_stopped() {
    let ready = Notice::ready();
    assert_eq!(ready.title(), "Ready!");
    assert_eq!(*ready.colour(), colours::GREEN);

    let stopped = Notice::stopped();
    assert_eq!(stopped.title(), "Stopped.");
    assert_eq!(stopped.description(), "🟥 The bot has been stopped!");
}

#[test]
fn test_empty_title_falls_back() {
    assert_eq!(Notice::new("", colours::RED).title(), "Discord Bot");
}

#[test]
fn test_level_up() {
    let notice = Notice::level_up("<@1>", 3, None);

    assert_eq!(notice.description(), "🎉 <@1> just leveled up!");
    assert_eq!(notice.author().as_deref(), Some("Level"));
    assert_eq!(notice.fields().len(), 1);
    assert_eq!(notice.fields()[0].name, "New level");
    assert_eq!(notice.fields()[0].value, "3");
}

#[test]
fn test_welcome_lists_channels_in_order() {
    let channels = vec![
        (ChannelId(10), "Read the rules".to_string()),
        (ChannelId(11), "Say hi".to_string()),
    ];
    let notice = Notice::welcome(
        "ada",
        "Coven",
        "Welcome <@5>!".into(),
        &channels,
        Some("https://cdn/avatar.png".into()),
    );

    assert_eq!(notice.title(), "ada joined Coven 🎉");
    assert_eq!(notice.description(), "Welcome <@5>!");
    assert_eq!(*notice.colour(), colours::BRAND_GREEN);
    let fields: Vec<(&str, &str)> = notice
        .fields()
        .iter()
        .map(|f| (f.name.as_str(), f.value.as_str()))
        .collect();
    assert_eq!(
        fields,
        vec![("Read the rules", "<#10>"), ("Say hi", "<#11>")]
    );
    assert!(notice.fields().iter().all(|f| !f.inline));
}

#[test]
fn test_farewell() {
    let notice = Notice::farewell("ada", None);
    assert_eq!(notice.title(), "ada has abandoned us 😢");
    assert_eq!(notice.description(), FAREWELL_TEXT);
    assert_eq!(*notice.colour(), colours::BRAND_RED);
}

#[test]
fn test_level_check_and_change() {
    let progress = LevelProgress::new(40, 2);

    let check = Notice::level_check("<@1>", progress);
    assert_eq!(check.description(), "<@1> is level 2 (40 XP).");

    let changed = Notice::level_changed("XP changed!", "done".into(), progress).by("mod");
    assert_eq!(changed.footer().as_deref(), Some("By mod"));
    assert_eq!(changed.fields()[0].value, "2");
    assert_eq!(changed.fields()[1].value, "40");
}

#[test]
fn test_random_colour_is_opaque_rgb() {
    for _ in 0..32 {
        assert!(colours::random() <= 0xff_ffff);
    }
}

#[test]
fn test_reaction_for_key() {
    assert!(matches!(
        reaction_for_key("123456"),
        ReactionType::Custom { id, .. } if id.get() == 123456
    ));
    assert_eq!(
        reaction_for_key("🔥"),
        ReactionType::Unicode("🔥".to_string())
    );
}

#[test]
fn test_id_conversion() {
    let guild = GuildId(42);
    assert_eq!(guild.to_serenity().get(), 42);
    assert_eq!(guild.to_serenity().to_coven(), guild);
    assert_eq!(UserId(7).to_serenity().to_coven(), UserId(7));
}
