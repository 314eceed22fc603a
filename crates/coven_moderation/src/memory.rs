//! In-memory ban store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use coven_core::{BanRecord, BanStore, GuildId, UserId};
use coven_error::DatabaseResult;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// [`BanStore`] backed by a `HashMap`.
///
/// Used by tests and when the bot runs without a database. All bans are
/// lost when the store is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBanStore {
    bans: Arc<RwLock<HashMap<(UserId, GuildId), BanRecord>>>,
}

impl InMemoryBanStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored bans.
    pub async fn len(&self) -> usize {
        self.bans.read().await.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.bans.read().await.is_empty()
    }
}

fn sorted(mut records: Vec<BanRecord>) -> Vec<BanRecord> {
    records.sort_by_key(|r| (r.unban_time, r.guild_id, r.user_id));
    records
}

#[async_trait]
impl BanStore for InMemoryBanStore {
    async fn upsert_ban(&self, record: &BanRecord) -> DatabaseResult<()> {
        self.bans
            .write()
            .await
            .insert((record.user_id, record.guild_id), record.clone());
        Ok(())
    }

    async fn get_ban(
        &self,
        user_id: UserId,
        guild_id: GuildId,
    ) -> DatabaseResult<Option<BanRecord>> {
        Ok(self.bans.read().await.get(&(user_id, guild_id)).cloned())
    }

    async fn remove_ban(&self, user_id: UserId, guild_id: GuildId) -> DatabaseResult<bool> {
        Ok(self.bans.write().await.remove(&(user_id, guild_id)).is_some())
    }

    async fn next_expiring(&self) -> DatabaseResult<Option<BanRecord>> {
        Ok(self
            .bans
            .read()
            .await
            .values()
            .min_by_key(|r| r.unban_time)
            .cloned())
    }

    async fn expired(&self, now: DateTime<Utc>) -> DatabaseResult<Vec<BanRecord>> {
        let bans = self.bans.read().await;
        Ok(sorted(
            bans.values().filter(|r| r.is_expired(now)).cloned().collect(),
        ))
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> DatabaseResult<usize> {
        let mut bans = self.bans.write().await;
        let before = bans.len();
        bans.retain(|_, r| !r.is_expired(now));
        Ok(before - bans.len())
    }

    async fn list_bans(&self, guild_id: GuildId) -> DatabaseResult<Vec<BanRecord>> {
        let bans = self.bans.read().await;
        Ok(sorted(
            bans.values().filter(|r| r.guild_id == guild_id).cloned().collect(),
        ))
    }
}
