//! The temporary-ban unban scheduler.
//!
//! The scheduler owns a single timer. Its target is always recomputed from
//! the store, never tracked incrementally: on `Reconcile` it reads the
//! earliest `unban_time` and re-arms if that differs from what is armed.
//! When the timer fires it re-reads the store, unbans everything that has
//! expired, purges those rows and reconciles again.

use chrono::{DateTime, Utc};
use coven_core::{BanRecord, BanStore, Clock, ModerationGateway, UnbanOutcome};
use coven_error::DatabaseResult;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_retry2::strategy::{ExponentialBackoff, jitter};
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, error, info, instrument, warn};

const UNBAN_REASON: &str = "Temporary ban expired";
const MAX_BACKOFF: Duration = Duration::from_secs(5);

/// Bounded retry applied to store reads and deletes made by the scheduler.
///
/// # Examples
///
/// ```
/// use coven_moderation::ReconcilePolicyBuilder;
/// use std::time::Duration;
///
/// let policy = ReconcilePolicyBuilder::default()
///     .retries(5usize)
///     .build()
///     .unwrap();
/// assert_eq!(*policy.retries(), 5);
/// assert_eq!(*policy.backoff(), Duration::from_millis(200));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_builder::Builder, derive_getters::Getters)]
#[builder(setter(into))]
pub struct ReconcilePolicy {
    /// Retries after the first failed attempt.
    #[builder(default = "3")]
    retries: usize,
    /// Initial backoff between attempts.
    #[builder(default = "Duration::from_millis(200)")]
    backoff: Duration,
}

impl Default for ReconcilePolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            backoff: Duration::from_millis(200),
        }
    }
}

/// Where the scheduler's single timer points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchedulerStatus {
    /// No timer armed; the store held no bans at the last reconcile.
    Idle,
    /// A timer will fire at this instant.
    Armed(DateTime<Utc>),
}

impl SchedulerStatus {
    /// The armed instant, if any.
    pub fn armed_at(&self) -> Option<DateTime<Utc>> {
        match self {
            SchedulerStatus::Idle => None,
            SchedulerStatus::Armed(at) => Some(*at),
        }
    }
}

/// Messages for the [`UnbanScheduler`] actor.
#[derive(Debug)]
pub enum SchedulerMessage {
    /// Re-derive the timer from the store and reply with the result.
    Reconcile(RpcReplyPort<SchedulerStatus>),
    /// Unban and purge every expired ban, then reconcile.
    Fire,
    /// Report the current timer without touching the store.
    Status(RpcReplyPort<SchedulerStatus>),
}

/// Collaborators the scheduler is started with.
#[derive(Clone)]
pub struct SchedulerArgs {
    /// Ban persistence
    pub store: Arc<dyn BanStore>,
    /// Platform used to lift bans
    pub gateway: Arc<dyn ModerationGateway>,
    /// Time source
    pub clock: Arc<dyn Clock>,
    /// Retry applied to store calls
    pub policy: ReconcilePolicy,
}

impl SchedulerArgs {
    /// Arguments with the default [`ReconcilePolicy`].
    pub fn new(
        store: Arc<dyn BanStore>,
        gateway: Arc<dyn ModerationGateway>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            gateway,
            clock,
            policy: ReconcilePolicy::default(),
        }
    }

    /// Replace the retry policy.
    pub fn with_policy(mut self, policy: ReconcilePolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Actor that lifts temporary bans when they expire.
///
/// On start it sweeps bans that expired while the bot was offline and arms
/// the timer for the next one.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnbanScheduler;

/// State for the unban scheduler actor.
pub struct SchedulerState {
    store: Arc<dyn BanStore>,
    gateway: Arc<dyn ModerationGateway>,
    clock: Arc<dyn Clock>,
    policy: ReconcilePolicy,
    armed: Option<DateTime<Utc>>,
    timer: Option<JoinHandle<()>>,
}

impl SchedulerState {
    fn status(&self) -> SchedulerStatus {
        match self.armed {
            Some(at) => SchedulerStatus::Armed(at),
            None => SchedulerStatus::Idle,
        }
    }

    fn timer_live(&self) -> bool {
        self.timer.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.timer.take() {
            handle.abort();
        }
        self.armed = None;
    }

    fn arm(&mut self, myself: &ActorRef<SchedulerMessage>, at: DateTime<Utc>) {
        self.cancel();

        let delay = (at - self.clock.now()).to_std().unwrap_or(Duration::ZERO);
        let myself = myself.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = myself.send_message(SchedulerMessage::Fire) {
                warn!(error = ?e, "Unban scheduler stopped before its timer fired");
            }
        });

        self.timer = Some(handle);
        self.armed = Some(at);
        info!(%at, delay_ms = delay.as_millis() as u64, "Unban timer armed");
    }
}

impl UnbanScheduler {
    /// Point the timer at the store's earliest ban, or disarm it if there is none.
    #[instrument(skip_all)]
    async fn reconcile(
        &self,
        myself: &ActorRef<SchedulerMessage>,
        state: &mut SchedulerState,
    ) -> SchedulerStatus {
        let store = state.store.clone();
        let next = with_retry(&state.policy, "next_expiring", || {
            let store = store.clone();
            async move { store.next_expiring().await }
        })
        .await;

        match next {
            Ok(Some(record)) if state.armed == Some(record.unban_time) && state.timer_live() => {
                debug!(at = %record.unban_time, "Timer already armed for earliest ban");
            }
            Ok(Some(record)) => state.arm(myself, record.unban_time),
            Ok(None) => {
                if state.armed.is_some() {
                    info!("No temporary bans left, disarming timer");
                }
                state.cancel();
            }
            Err(e) => {
                error!(error = %e, "Could not read bans, scheduler idle until next reconcile");
                state.cancel();
            }
        }

        state.status()
    }

    /// Lift every expired ban, purge those rows and reconcile.
    #[instrument(skip_all)]
    async fn fire(&self, myself: &ActorRef<SchedulerMessage>, state: &mut SchedulerState) {
        let now = state.clock.now();

        // Whatever the timer pointed at, the reconcile below re-derives it.
        // A timer that fires before the clock reaches its target would
        // otherwise leave a spent handle behind that still looks armed.
        state.cancel();

        let store = state.store.clone();
        let expired = with_retry(&state.policy, "expired", || {
            let store = store.clone();
            async move { store.expired(now).await }
        })
        .await;

        let expired = match expired {
            Ok(records) => records,
            Err(e) => {
                error!(error = %e, "Could not read expired bans; idle until next reconcile");
                state.cancel();
                return;
            }
        };

        for record in &expired {
            lift(state.gateway.as_ref(), record).await;
        }

        let store = state.store.clone();
        let purged = with_retry(&state.policy, "purge_expired", || {
            let store = store.clone();
            async move { store.purge_expired(now).await }
        })
        .await;

        match purged {
            Ok(count) => debug!(count, "Purged expired bans"),
            Err(e) => {
                error!(error = %e, "Could not purge expired bans; idle until next reconcile");
                state.cancel();
                return;
            }
        }

        self.reconcile(myself, state).await;
    }
}

/// Lift one expired ban. Failures are logged; the row is purged regardless.
#[instrument(skip_all, fields(user_id = %record.user_id, guild_id = %record.guild_id))]
async fn lift(gateway: &dyn ModerationGateway, record: &BanRecord) {
    match gateway.has_guild(record.guild_id).await {
        Ok(true) => {}
        Ok(false) => {
            warn!("Guild no longer available, dropping expired ban");
            return;
        }
        Err(e) => warn!(error = %e, "Could not resolve guild, attempting unban anyway"),
    }

    match gateway.fetch_user(record.user_id).await {
        Ok(Some(name)) => debug!(user = %name, "Resolved banned user"),
        Ok(None) => {
            info!("User no longer exists, dropping expired ban");
            return;
        }
        Err(e) => warn!(error = %e, "Could not resolve user, attempting unban anyway"),
    }

    match gateway.unban(record.guild_id, record.user_id, UNBAN_REASON).await {
        Ok(UnbanOutcome::Unbanned) => info!("Temporary ban lifted"),
        Ok(UnbanOutcome::AlreadyAbsent) => info!("User was already unbanned"),
        Err(e) => error!(error = %e, "Unban failed, expired ban purged anyway"),
    }
}

/// Run a store call with the policy's exponential backoff.
async fn with_retry<T, F, Fut>(
    policy: &ReconcilePolicy,
    operation: &'static str,
    mut call: F,
) -> DatabaseResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = DatabaseResult<T>>,
{
    let strategy = ExponentialBackoff::from_millis(policy.backoff.as_millis().max(1) as u64)
        .factor(2)
        .max_delay(MAX_BACKOFF)
        .map(jitter)
        .take(policy.retries);

    Retry::spawn(strategy, || {
        let attempt = call();
        async move {
            attempt.await.map_err(|err| {
                warn!(error = %err, operation, "Ban store call failed");
                RetryError::Transient {
                    err,
                    retry_after: None,
                }
            })
        }
    })
    .await
}

#[async_trait::async_trait]
impl Actor for UnbanScheduler {
    type Msg = SchedulerMessage;
    type State = SchedulerState;
    type Arguments = SchedulerArgs;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        args: SchedulerArgs,
    ) -> Result<Self::State, ActorProcessingErr> {
        info!(
            retries = args.policy.retries,
            backoff_ms = args.policy.backoff.as_millis() as u64,
            "UnbanScheduler starting"
        );
        Ok(SchedulerState {
            store: args.store,
            gateway: args.gateway,
            clock: args.clock,
            policy: args.policy,
            armed: None,
            timer: None,
        })
    }

    async fn post_start(
        &self,
        myself: ActorRef<Self::Msg>,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        // Catch up on bans that expired while offline, then arm for the next.
        self.fire(&myself, state).await;
        Ok(())
    }

    #[instrument(skip(self, myself, state))]
    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            SchedulerMessage::Reconcile(reply) => {
                let status = self.reconcile(&myself, state).await;
                let _ = reply.send(status);
            }
            SchedulerMessage::Fire => {
                self.fire(&myself, state).await;
            }
            SchedulerMessage::Status(reply) => {
                let _ = reply.send(state.status());
            }
        }
        Ok(())
    }

    async fn post_stop(
        &self,
        _myself: ActorRef<Self::Msg>,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        state.cancel();
        info!("UnbanScheduler stopped");
        Ok(())
    }
}
