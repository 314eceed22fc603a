//! Tempban, pardon and kick through the moderation service.

mod common;

use chrono::TimeDelta;
use common::{Call, FlakyStore, GUILD, MockGateway, start};
use coven_core::{BanStore, Clock, UnbanOutcome, UserId};
use coven_error::ModerationErrorKind;
use coven_moderation::{InMemoryBanStore, PardonOutcome};
use std::sync::Arc;
use std::sync::atomic::Ordering;

#[tokio::test]
async fn test_tempban_records_ban() {
    let store = Arc::new(InMemoryBanStore::new());
    let gateway = MockGateway::new();
    let (service, clock) = start(store.clone(), gateway.clone()).await;

    let receipt = service.tempban(GUILD, UserId(7), "2h", "spam").await.unwrap();

    assert_eq!(receipt.unban_time(), clock.now() + TimeDelta::hours(2));
    assert_eq!(receipt.duration().to_string(), "2h");
    assert_eq!(gateway.calls(), vec![Call::Ban(GUILD, UserId(7))]);

    let stored = store.get_ban(UserId(7), GUILD).await.unwrap().unwrap();
    assert_eq!(stored.reason, "spam");
    assert_eq!(&stored, receipt.record());
}

#[tokio::test]
async fn test_invalid_duration_changes_nothing() {
    let store = Arc::new(InMemoryBanStore::new());
    let gateway = MockGateway::new();
    let (service, _clock) = start(store.clone(), gateway.clone()).await;

    for bad in ["", "10", "abc", "5x", "0m", "-3h", "h"] {
        let err = service.tempban(GUILD, UserId(1), bad, "r").await.unwrap_err();
        assert!(
            matches!(err.kind, ModerationErrorKind::InvalidDuration(_)),
            "{bad:?} gave {err}"
        );
    }

    assert!(gateway.calls().is_empty());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_platform_ban_failure_records_nothing() {
    let store = Arc::new(InMemoryBanStore::new());
    let gateway = MockGateway::new();
    gateway.fail_ban.store(true, Ordering::SeqCst);
    let (service, _clock) = start(store.clone(), gateway.clone()).await;

    let err = service.tempban(GUILD, UserId(1), "1d", "r").await.unwrap_err();

    assert!(matches!(err.kind, ModerationErrorKind::Platform(_)));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_store_failure_rolls_back_platform_ban() {
    let store = Arc::new(FlakyStore::default());
    store.fail_writes.store(true, Ordering::SeqCst);
    let gateway = MockGateway::new();
    let (service, _clock) = start(store.clone(), gateway.clone()).await;

    let err = service.tempban(GUILD, UserId(3), "1h", "r").await.unwrap_err();

    assert!(matches!(err.kind, ModerationErrorKind::Store(_)));
    assert_eq!(
        gateway.calls(),
        vec![Call::Ban(GUILD, UserId(3)), Call::Unban(GUILD, UserId(3))]
    );
    assert!(store.inner.is_empty().await);
}

#[tokio::test]
async fn test_repeat_tempban_replaces_record() {
    let store = Arc::new(InMemoryBanStore::new());
    let (service, clock) = start(store.clone(), MockGateway::new()).await;

    service.tempban(GUILD, UserId(1), "1d", "first").await.unwrap();
    service.tempban(GUILD, UserId(1), "30m", "second").await.unwrap();

    let bans = service.active_bans(GUILD).await.unwrap();
    assert_eq!(bans.len(), 1);
    assert_eq!(bans[0].reason, "second");
    assert_eq!(bans[0].unban_time, clock.now() + TimeDelta::minutes(30));
}

#[tokio::test]
async fn test_pardon_lifts_ban() {
    let store = Arc::new(InMemoryBanStore::new());
    let gateway = MockGateway::new();
    let (service, _clock) = start(store.clone(), gateway.clone()).await;

    service.tempban(GUILD, UserId(5), "1h", "r").await.unwrap();
    let outcome = service.pardon(GUILD, UserId(5), "appeal").await.unwrap();

    assert_eq!(outcome, PardonOutcome::Pardoned(UnbanOutcome::Unbanned));
    assert_eq!(gateway.unbanned(), vec![UserId(5)]);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_pardon_without_ban_skips_platform() {
    let gateway = MockGateway::new();
    let (service, _clock) = start(Arc::new(InMemoryBanStore::new()), gateway.clone()).await;

    let outcome = service.pardon(GUILD, UserId(5), "appeal").await.unwrap();

    assert_eq!(outcome, PardonOutcome::NoActiveBan);
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn test_pardon_of_manually_unbanned_user() {
    let gateway = MockGateway::new();
    let (service, _clock) = start(Arc::new(InMemoryBanStore::new()), gateway.clone()).await;

    service.tempban(GUILD, UserId(5), "1h", "r").await.unwrap();
    gateway.mark_not_banned(UserId(5));

    let outcome = service.pardon(GUILD, UserId(5), "appeal").await.unwrap();
    assert_eq!(outcome, PardonOutcome::Pardoned(UnbanOutcome::AlreadyAbsent));
}

#[tokio::test]
async fn test_pardon_platform_error_still_removes_record() {
    let store = Arc::new(InMemoryBanStore::new());
    let gateway = MockGateway::new();
    let (service, _clock) = start(store.clone(), gateway.clone()).await;

    service.tempban(GUILD, UserId(5), "1h", "r").await.unwrap();
    gateway.fail_unban.store(true, Ordering::SeqCst);

    let err = service.pardon(GUILD, UserId(5), "appeal").await.unwrap_err();
    assert!(matches!(err.kind, ModerationErrorKind::Platform(_)));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_bans_are_scoped_per_guild() {
    let store = Arc::new(InMemoryBanStore::new());
    let (service, _clock) = start(store.clone(), MockGateway::new()).await;
    let other = coven_core::GuildId(2);

    service.tempban(GUILD, UserId(1), "1h", "r").await.unwrap();
    service.tempban(other, UserId(1), "2h", "r").await.unwrap();

    assert_eq!(service.active_bans(GUILD).await.unwrap().len(), 1);
    assert_eq!(
        service.pardon(other, UserId(1), "r").await.unwrap(),
        PardonOutcome::Pardoned(UnbanOutcome::Unbanned)
    );
    assert!(store.get_ban(UserId(1), GUILD).await.unwrap().is_some());
}

#[tokio::test]
async fn test_kick_calls_platform() {
    let gateway = MockGateway::new();
    let (service, _clock) = start(Arc::new(InMemoryBanStore::new()), gateway.clone()).await;

    service.kick(GUILD, UserId(4), "rude").await.unwrap();

    assert_eq!(gateway.calls(), vec![Call::Kick(GUILD, UserId(4))]);
}
