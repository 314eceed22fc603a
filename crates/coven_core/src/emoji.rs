//! Emoji keys for self-role bindings.

use regex::Regex;
use std::sync::LazyLock;

static CUSTOM_EMOJI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<a?:\w+:(\d+)>$").expect("Valid custom emoji regex"));

/// The key a reaction emoji is stored under.
///
/// Custom emoji (`<:name:id>` or `<a:name:id>`) are keyed by their id, so a
/// rename does not break the binding. Unicode emoji are keyed by their text.
///
/// # Examples
///
/// ```
/// use coven_core::emoji_key;
///
/// assert_eq!(emoji_key("<:witch:123456>"), "123456");
/// assert_eq!(emoji_key("<a:spin:42>"), "42");
/// assert_eq!(emoji_key("🧙"), "🧙");
/// ```
pub fn emoji_key(raw: &str) -> String {
    let raw = raw.trim();
    CUSTOM_EMOJI
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|id| id.as_str().to_string())
        .unwrap_or_else(|| raw.to_string())
}
