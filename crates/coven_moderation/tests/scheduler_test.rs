//! Scheduler behaviour driven through the moderation service.

mod common;

use chrono::TimeDelta;
use common::{Call, FlakyStore, GUILD, MockGateway, start};
use coven_core::{BanRecord, BanStore, Clock, UserId};
use coven_moderation::{InMemoryBanStore, SchedulerStatus};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

#[tokio::test]
async fn test_empty_store_is_idle() {
    let (service, _clock) = start(Arc::new(InMemoryBanStore::new()), MockGateway::new()).await;
    assert_eq!(service.status().await.unwrap(), SchedulerStatus::Idle);
    assert_eq!(service.reconcile().await, Some(SchedulerStatus::Idle));
}

#[tokio::test]
async fn test_earlier_ban_tightens_timer() {
    let (service, clock) = start(Arc::new(InMemoryBanStore::new()), MockGateway::new()).await;
    let start = clock.now();

    service.tempban(GUILD, UserId(1), "10s", "a").await.unwrap();
    assert_eq!(
        service.status().await.unwrap(),
        SchedulerStatus::Armed(start + TimeDelta::seconds(10))
    );

    let receipt = service.tempban(GUILD, UserId(2), "5s", "b").await.unwrap();
    assert_eq!(
        receipt.scheduler(),
        &Some(SchedulerStatus::Armed(start + TimeDelta::seconds(5)))
    );
    assert_eq!(
        service.status().await.unwrap(),
        SchedulerStatus::Armed(start + TimeDelta::seconds(5))
    );
}

#[tokio::test]
async fn test_later_ban_leaves_timer_alone() {
    let (service, clock) = start(Arc::new(InMemoryBanStore::new()), MockGateway::new()).await;
    let start = clock.now();

    service.tempban(GUILD, UserId(1), "5s", "a").await.unwrap();
    service.tempban(GUILD, UserId(2), "1h", "b").await.unwrap();

    assert_eq!(
        service.status().await.unwrap(),
        SchedulerStatus::Armed(start + TimeDelta::seconds(5))
    );
}

#[tokio::test]
async fn test_reconcile_is_idempotent() {
    let (service, _clock) = start(Arc::new(InMemoryBanStore::new()), MockGateway::new()).await;
    service.tempban(GUILD, UserId(1), "10s", "a").await.unwrap();

    let first = service.reconcile().await;
    let second = service.reconcile().await;
    assert_eq!(first, second);
    assert_eq!(service.status().await.unwrap(), first.unwrap());
}

#[tokio::test]
async fn test_pardon_of_earliest_rearms_for_next() {
    let (service, clock) = start(Arc::new(InMemoryBanStore::new()), MockGateway::new()).await;
    let start = clock.now();

    service.tempban(GUILD, UserId(1), "10s", "a").await.unwrap();
    service.tempban(GUILD, UserId(2), "5s", "b").await.unwrap();
    service.pardon(GUILD, UserId(2), "appeal").await.unwrap();

    assert_eq!(
        service.status().await.unwrap(),
        SchedulerStatus::Armed(start + TimeDelta::seconds(10))
    );
}

#[tokio::test]
async fn test_pardon_of_last_ban_disarms() {
    let (service, _clock) = start(Arc::new(InMemoryBanStore::new()), MockGateway::new()).await;

    service.tempban(GUILD, UserId(1), "10s", "a").await.unwrap();
    service.pardon(GUILD, UserId(1), "appeal").await.unwrap();

    assert_eq!(service.status().await.unwrap(), SchedulerStatus::Idle);
}

#[tokio::test]
async fn test_fire_unbans_purges_and_rearms() {
    let store = Arc::new(InMemoryBanStore::new());
    let gateway = MockGateway::new();
    let (service, clock) = start(store.clone(), gateway.clone()).await;
    let start = clock.now();

    service.tempban(GUILD, UserId(1), "10s", "a").await.unwrap();
    service.tempban(GUILD, UserId(2), "5s", "b").await.unwrap();

    clock.advance(TimeDelta::seconds(5));
    service.fire().unwrap();

    assert_eq!(
        service.status().await.unwrap(),
        SchedulerStatus::Armed(start + TimeDelta::seconds(10))
    );
    assert_eq!(gateway.unbanned(), vec![UserId(2)]);
    assert!(store.get_ban(UserId(2), GUILD).await.unwrap().is_none());
    assert!(store.get_ban(UserId(1), GUILD).await.unwrap().is_some());
}

#[tokio::test]
async fn test_simultaneous_expiries_are_swept_together() {
    let store = Arc::new(InMemoryBanStore::new());
    let gateway = MockGateway::new();
    let (service, clock) = start(store.clone(), gateway.clone()).await;
    let at = clock.now() + TimeDelta::seconds(5);

    store.upsert_ban(&BanRecord::new(UserId(1), GUILD, "a", at)).await.unwrap();
    store.upsert_ban(&BanRecord::new(UserId(2), GUILD, "b", at)).await.unwrap();
    assert_eq!(service.reconcile().await, Some(SchedulerStatus::Armed(at)));

    clock.advance(TimeDelta::seconds(5));
    service.fire().unwrap();

    assert_eq!(service.status().await.unwrap(), SchedulerStatus::Idle);
    let mut unbanned = gateway.unbanned();
    unbanned.sort();
    assert_eq!(unbanned, vec![UserId(1), UserId(2)]);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_early_fire_is_harmless() {
    let store = Arc::new(InMemoryBanStore::new());
    let gateway = MockGateway::new();
    let (service, clock) = start(store.clone(), gateway.clone()).await;
    let start = clock.now();

    service.tempban(GUILD, UserId(1), "10s", "a").await.unwrap();
    service.fire().unwrap();

    assert_eq!(
        service.status().await.unwrap(),
        SchedulerStatus::Armed(start + TimeDelta::seconds(10))
    );
    assert!(gateway.unbanned().is_empty());
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_timer_firing_before_clock_catches_up_rearms() {
    let store = Arc::new(InMemoryBanStore::new());
    let gateway = MockGateway::new();
    let (service, clock) = start(store.clone(), gateway.clone()).await;
    let at = clock.now() + TimeDelta::seconds(1);

    service.tempban(GUILD, UserId(1), "1s", "a").await.unwrap();
    clock.advance(TimeDelta::milliseconds(900));

    // The real timer fires while the clock still reads 100ms short of `at`.
    tokio::time::sleep(Duration::from_millis(1300)).await;
    assert!(gateway.unbanned().is_empty());
    assert_eq!(store.len().await, 1);
    assert_eq!(service.status().await.unwrap(), SchedulerStatus::Armed(at));

    clock.advance(TimeDelta::milliseconds(200));
    assert!(service.reconcile().await.is_some());

    let lifted = tokio::time::timeout(Duration::from_secs(5), async {
        while !gateway.unbanned().contains(&UserId(1)) {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    })
    .await;

    assert!(lifted.is_ok(), "overdue ban was never lifted");
    assert!(store.is_empty().await);
    assert_eq!(service.status().await.unwrap(), SchedulerStatus::Idle);
    service.shutdown();
}

#[tokio::test]
async fn test_startup_sweeps_overdue_bans() {
    let store = Arc::new(InMemoryBanStore::new());
    let gateway = MockGateway::new();
    let now = chrono::Utc::now();
    let future = now + TimeDelta::hours(1);

    store
        .upsert_ban(&BanRecord::new(UserId(1), GUILD, "overdue", now - TimeDelta::hours(1)))
        .await
        .unwrap();
    store.upsert_ban(&BanRecord::new(UserId(2), GUILD, "pending", future)).await.unwrap();

    let (service, _clock) = start(store.clone(), gateway.clone()).await;

    assert_eq!(service.status().await.unwrap(), SchedulerStatus::Armed(future));
    assert_eq!(gateway.unbanned(), vec![UserId(1)]);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_platform_failure_still_purges() {
    let store = Arc::new(InMemoryBanStore::new());
    let gateway = MockGateway::new();
    let (service, clock) = start(store.clone(), gateway.clone()).await;

    service.tempban(GUILD, UserId(1), "5s", "a").await.unwrap();
    gateway.fail_unban.store(true, Ordering::SeqCst);

    clock.advance(TimeDelta::seconds(5));
    service.fire().unwrap();

    assert_eq!(service.status().await.unwrap(), SchedulerStatus::Idle);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_already_unbanned_user_is_not_an_error() {
    let store = Arc::new(InMemoryBanStore::new());
    let gateway = MockGateway::new();
    let (service, clock) = start(store.clone(), gateway.clone()).await;

    service.tempban(GUILD, UserId(1), "5s", "a").await.unwrap();
    gateway.mark_not_banned(UserId(1));

    clock.advance(TimeDelta::seconds(6));
    service.fire().unwrap();

    assert_eq!(service.status().await.unwrap(), SchedulerStatus::Idle);
    assert_eq!(gateway.unbanned(), vec![UserId(1)]);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_deleted_user_is_dropped_without_unban() {
    let store = Arc::new(InMemoryBanStore::new());
    let gateway = MockGateway::new();
    let (service, clock) = start(store.clone(), gateway.clone()).await;

    service.tempban(GUILD, UserId(1), "5s", "a").await.unwrap();
    gateway.mark_deleted(UserId(1));

    clock.advance(TimeDelta::seconds(5));
    service.fire().unwrap();

    assert_eq!(service.status().await.unwrap(), SchedulerStatus::Idle);
    assert_eq!(gateway.calls(), vec![Call::Ban(GUILD, UserId(1))]);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_store_outage_leaves_scheduler_idle() {
    let store = Arc::new(FlakyStore::default());
    let gateway = MockGateway::new();
    let (service, _clock) = start(store.clone(), gateway.clone()).await;

    service.tempban(GUILD, UserId(1), "10s", "a").await.unwrap();
    assert!(matches!(service.status().await.unwrap(), SchedulerStatus::Armed(_)));

    store.fail_reads.store(true, Ordering::SeqCst);
    assert_eq!(service.reconcile().await, Some(SchedulerStatus::Idle));

    store.fail_reads.store(false, Ordering::SeqCst);
    assert!(matches!(service.reconcile().await, Some(SchedulerStatus::Armed(_))));
}

#[tokio::test]
async fn test_timer_fires_in_real_time() {
    use coven_core::SystemClock;
    use coven_moderation::{ModerationService, SchedulerArgs};

    let store = Arc::new(InMemoryBanStore::new());
    let gateway = MockGateway::new();
    let args = SchedulerArgs::new(store.clone(), gateway.clone(), Arc::new(SystemClock));
    let service = ModerationService::start(args).await.unwrap();

    service.tempban(GUILD, UserId(9), "1s", "short").await.unwrap();

    let lifted = tokio::time::timeout(Duration::from_secs(5), async {
        while !gateway.unbanned().contains(&UserId(9)) {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    })
    .await;

    assert!(lifted.is_ok(), "ban was not lifted in time");
    assert_eq!(service.status().await.unwrap(), SchedulerStatus::Idle);
    assert!(store.is_empty().await);
    service.shutdown();
}
