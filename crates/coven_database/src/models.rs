//! Row types.

#![allow(missing_docs)]

use crate::schema::{banned, channels, level_roles, levels, messages, roles};
use chrono::{DateTime, Utc};
use coven_core::{BanRecord, ChannelId, GuildId, LevelProgress, MessageId, RoleId, UserId};
use diesel::prelude::*;

/// Database row for the `levels` table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = levels)]
#[diesel(primary_key(user_id, guild_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LevelRow {
    pub user_id: i64,
    pub guild_id: i64,
    pub xp: i64,
    pub level: i64,
}

impl From<LevelRow> for LevelProgress {
    fn from(row: LevelRow) -> Self {
        LevelProgress::new(row.xp, row.level)
    }
}

/// Insertable struct for the `levels` table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = levels)]
pub struct NewLevel {
    pub user_id: i64,
    pub guild_id: i64,
    pub xp: i64,
    pub level: i64,
}

impl NewLevel {
    /// Row for `progress` of a member.
    pub fn new(user_id: UserId, guild_id: GuildId, progress: LevelProgress) -> Self {
        Self {
            user_id: user_id.as_i64(),
            guild_id: guild_id.as_i64(),
            xp: progress.xp,
            level: progress.level,
        }
    }
}

/// Database row for the `banned` table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = banned)]
#[diesel(primary_key(user_id, guild_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BanRow {
    pub user_id: i64,
    pub guild_id: i64,
    pub reason: String,
    pub unban_time: DateTime<Utc>,
}

impl From<BanRow> for BanRecord {
    fn from(row: BanRow) -> Self {
        BanRecord::new(
            UserId::from_i64(row.user_id),
            GuildId::from_i64(row.guild_id),
            row.reason,
            row.unban_time,
        )
    }
}

/// Insertable struct for the `banned` table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = banned)]
pub struct NewBan {
    pub user_id: i64,
    pub guild_id: i64,
    pub reason: String,
    pub unban_time: DateTime<Utc>,
}

impl From<&BanRecord> for NewBan {
    fn from(record: &BanRecord) -> Self {
        Self {
            user_id: record.user_id.as_i64(),
            guild_id: record.guild_id.as_i64(),
            reason: record.reason.clone(),
            unban_time: record.unban_time,
        }
    }
}

/// Database row for the `messages` table: a message members react to for roles.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = messages)]
#[diesel(primary_key(message_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SelfRoleMessageRow {
    pub message_id: i64,
    pub channel_id: i64,
    pub guild_id: i64,
}

impl SelfRoleMessageRow {
    /// Channel the message was posted in.
    pub fn channel(&self) -> ChannelId {
        ChannelId::from_i64(self.channel_id)
    }
}

/// Insertable struct for the `messages` table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = messages)]
pub struct NewSelfRoleMessage {
    pub message_id: i64,
    pub channel_id: i64,
    pub guild_id: i64,
}

/// Database row for the `roles` table: emoji → role binding on a message.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = roles)]
#[diesel(primary_key(role_id, message_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RoleBindingRow {
    pub role_id: i64,
    pub emoji: String,
    pub message_id: i64,
}

/// Insertable struct for the `roles` table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = roles)]
pub struct NewRoleBinding {
    pub role_id: i64,
    pub emoji: String,
    pub message_id: i64,
}

impl NewRoleBinding {
    /// Bind `emoji` to `role_id` on `message_id`.
    pub fn new(message_id: MessageId, role_id: RoleId, emoji: impl Into<String>) -> Self {
        Self {
            role_id: role_id.as_i64(),
            emoji: emoji.into(),
            message_id: message_id.as_i64(),
        }
    }
}

/// Database row for the `channels` table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = channels)]
#[diesel(primary_key(guild_id, description))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChannelRow {
    pub guild_id: i64,
    pub channel_id: i64,
    pub description: String,
}

/// Insertable struct for the `channels` table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = channels)]
pub struct NewChannel {
    pub guild_id: i64,
    pub channel_id: i64,
    pub description: String,
}

/// Database row for the `level_roles` table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = level_roles)]
#[diesel(primary_key(guild_id, role_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LevelRoleRow {
    pub guild_id: i64,
    pub role_id: i64,
    pub level: i64,
}

/// Insertable struct for the `level_roles` table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = level_roles)]
pub struct NewLevelRole {
    pub guild_id: i64,
    pub role_id: i64,
    pub level: i64,
}
