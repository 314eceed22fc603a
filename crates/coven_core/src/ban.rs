//! Temporary ban records.

use crate::{GuildId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An active temporary ban. At most one exists per `(user_id, guild_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanRecord {
    /// Banned user
    pub user_id: UserId,
    /// Guild the ban applies to
    pub guild_id: GuildId,
    /// Moderator-supplied reason
    pub reason: String,
    /// When the ban lifts
    pub unban_time: DateTime<Utc>,
}

impl BanRecord {
    /// Create a new record.
    pub fn new(
        user_id: UserId,
        guild_id: GuildId,
        reason: impl Into<String>,
        unban_time: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            guild_id,
            reason: reason.into(),
            unban_time,
        }
    }

    /// Whether the ban has lifted at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.unban_time <= now
    }
}
