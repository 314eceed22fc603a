//! Test doubles shared by the moderation tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use coven_core::{
    BanRecord, BanStore, GuildId, ManualClock, ModerationGateway, UnbanOutcome, UserId,
};
use coven_error::{
    DatabaseError, DatabaseErrorKind, DatabaseResult, PlatformError, PlatformErrorKind,
    PlatformResult,
};
use coven_moderation::{
    InMemoryBanStore, ModerationService, ReconcilePolicyBuilder, SchedulerArgs,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A platform call the mock gateway saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Ban(GuildId, UserId),
    Unban(GuildId, UserId),
    Kick(GuildId, UserId),
}

/// Gateway that records calls and can be told to fail.
#[derive(Debug, Default)]
pub struct MockGateway {
    calls: Mutex<Vec<Call>>,
    pub fail_ban: AtomicBool,
    pub fail_unban: AtomicBool,
    not_banned: Mutex<HashSet<UserId>>,
    deleted_users: Mutex<HashSet<UserId>>,
}

impl MockGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn unbanned(&self) -> Vec<UserId> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Unban(_, user) => Some(user),
                _ => None,
            })
            .collect()
    }

    /// The platform has no ban for this user.
    pub fn mark_not_banned(&self, user: UserId) {
        self.not_banned.lock().unwrap().insert(user);
    }

    /// The user's account no longer exists.
    pub fn mark_deleted(&self, user: UserId) {
        self.deleted_users.lock().unwrap().insert(user);
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ModerationGateway for MockGateway {
    async fn ban(&self, guild_id: GuildId, user_id: UserId, _reason: &str) -> PlatformResult<()> {
        if self.fail_ban.load(Ordering::SeqCst) {
            return Err(PlatformError::new(PlatformErrorKind::Unavailable(
                "gateway down".to_string(),
            )));
        }
        self.record(Call::Ban(guild_id, user_id));
        Ok(())
    }

    async fn unban(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        _reason: &str,
    ) -> PlatformResult<UnbanOutcome> {
        if self.fail_unban.load(Ordering::SeqCst) {
            return Err(PlatformError::new(PlatformErrorKind::Unavailable(
                "gateway down".to_string(),
            )));
        }
        self.record(Call::Unban(guild_id, user_id));
        if self.not_banned.lock().unwrap().contains(&user_id) {
            Ok(UnbanOutcome::AlreadyAbsent)
        } else {
            Ok(UnbanOutcome::Unbanned)
        }
    }

    async fn kick(&self, guild_id: GuildId, user_id: UserId, _reason: &str) -> PlatformResult<()> {
        self.record(Call::Kick(guild_id, user_id));
        Ok(())
    }

    async fn fetch_user(&self, user_id: UserId) -> PlatformResult<Option<String>> {
        if self.deleted_users.lock().unwrap().contains(&user_id) {
            Ok(None)
        } else {
            Ok(Some(format!("user-{user_id}")))
        }
    }

    async fn has_guild(&self, _guild_id: GuildId) -> PlatformResult<bool> {
        Ok(true)
    }
}

/// In-memory store whose writes or reads can be switched to fail.
#[derive(Debug, Default)]
pub struct FlakyStore {
    pub inner: InMemoryBanStore,
    pub fail_writes: AtomicBool,
    pub fail_reads: AtomicBool,
}

impl FlakyStore {
    fn check(flag: &AtomicBool) -> DatabaseResult<()> {
        if flag.load(Ordering::SeqCst) {
            Err(DatabaseError::new(DatabaseErrorKind::Connection(
                "database down".to_string(),
            )))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl BanStore for FlakyStore {
    async fn upsert_ban(&self, record: &BanRecord) -> DatabaseResult<()> {
        Self::check(&self.fail_writes)?;
        self.inner.upsert_ban(record).await
    }

    async fn get_ban(
        &self,
        user_id: UserId,
        guild_id: GuildId,
    ) -> DatabaseResult<Option<BanRecord>> {
        Self::check(&self.fail_reads)?;
        self.inner.get_ban(user_id, guild_id).await
    }

    async fn remove_ban(&self, user_id: UserId, guild_id: GuildId) -> DatabaseResult<bool> {
        Self::check(&self.fail_writes)?;
        self.inner.remove_ban(user_id, guild_id).await
    }

    async fn next_expiring(&self) -> DatabaseResult<Option<BanRecord>> {
        Self::check(&self.fail_reads)?;
        self.inner.next_expiring().await
    }

    async fn expired(&self, now: DateTime<Utc>) -> DatabaseResult<Vec<BanRecord>> {
        Self::check(&self.fail_reads)?;
        self.inner.expired(now).await
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> DatabaseResult<usize> {
        Self::check(&self.fail_writes)?;
        self.inner.purge_expired(now).await
    }

    async fn list_bans(&self, guild_id: GuildId) -> DatabaseResult<Vec<BanRecord>> {
        Self::check(&self.fail_reads)?;
        self.inner.list_bans(guild_id).await
    }
}

pub const GUILD: GuildId = GuildId(1);

/// Service over `store` and `gateway` with a manual clock and fast retries.
pub async fn start(
    store: Arc<dyn BanStore>,
    gateway: Arc<MockGateway>,
) -> (ModerationService, ManualClock) {
    let clock = ManualClock::new(Utc::now());
    let policy = ReconcilePolicyBuilder::default()
        .retries(1usize)
        .backoff(Duration::from_millis(1))
        .build()
        .unwrap();
    let args = SchedulerArgs::new(store, gateway, Arc::new(clock.clone())).with_policy(policy);
    let service = ModerationService::start(args).await.expect("scheduler starts");
    (service, clock)
}
