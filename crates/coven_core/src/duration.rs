//! Ban duration parsing.

use chrono::{DateTime, TimeDelta, Utc};
use coven_error::{ModerationError, ModerationErrorKind, ModerationResult};

/// A validated, strictly positive ban length.
///
/// Keeps the text the moderator typed so replies can echo it back.
///
/// # Examples
///
/// ```
/// use coven_core::parse_duration;
///
/// let duration = parse_duration("5m").unwrap();
/// assert_eq!(duration.delta().num_seconds(), 300);
/// assert_eq!(duration.to_string(), "5m");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_getters::Getters)]
#[display("{}", text)]
pub struct BanDuration {
    /// The input as typed.
    text: String,
    /// The offset it denotes.
    delta: TimeDelta,
}

impl BanDuration {
    /// The moment a ban of this length issued at `now` expires.
    pub fn expires_at(&self, now: DateTime<Utc>) -> ModerationResult<DateTime<Utc>> {
        now.checked_add_signed(self.delta)
            .ok_or_else(|| invalid(&self.text))
    }
}

/// Parse `<positive integer><unit>` with unit one of `s`, `m`, `h`, `d`.
///
/// No whitespace, sign or compound forms (`"1h30m"`) are accepted.
pub fn parse_duration(input: &str) -> ModerationResult<BanDuration> {
    let Some(unit) = input.chars().last() else {
        return Err(invalid(input));
    };
    let digits = &input[..input.len() - unit.len_utf8()];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(input));
    }

    let multiplier: i64 = match unit {
        's' => 1,
        'm' => 60,
        'h' => 60 * 60,
        'd' => 24 * 60 * 60,
        _ => return Err(invalid(input)),
    };

    let value: i64 = digits.parse().map_err(|_| invalid(input))?;
    if value == 0 {
        return Err(invalid(input));
    }

    let delta = value
        .checked_mul(multiplier)
        .and_then(TimeDelta::try_seconds)
        .ok_or_else(|| invalid(input))?;

    Ok(BanDuration {
        text: input.to_string(),
        delta,
    })
}

#[track_caller]
fn invalid(input: &str) -> ModerationError {
    ModerationError::new(ModerationErrorKind::InvalidDuration(input.to_string()))
}
