//! Welcome and farewell text.

/// Placeholder replaced by the joining member's mention.
pub const MENTION_PLACEHOLDER: &str = "%u";

/// Used when a guild has not set its own welcome description.
pub const DEFAULT_WELCOME: &str = "Welcome %u!\nWe're glad to have you in our server.\nWe hope you'll feel at home.";

/// Description of the farewell embed.
pub const FAREWELL_TEXT: &str = "Sooner or later they'll regret that choice.";

/// Substitute every `%u` in `template` with `mention`.
///
/// # Examples
///
/// ```
/// use coven_core::render_welcome;
///
/// assert_eq!(render_welcome("Hi %u, bye %u", "<@1>"), "Hi <@1>, bye <@1>");
/// ```
pub fn render_welcome(template: &str, mention: &str) -> String {
    template.replace(MENTION_PLACEHOLDER, mention)
}
