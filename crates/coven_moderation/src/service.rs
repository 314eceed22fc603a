//! Moderation commands: tempban, pardon and kick.

use crate::scheduler::{SchedulerArgs, SchedulerMessage, SchedulerStatus, UnbanScheduler};
use chrono::{DateTime, Utc};
use coven_core::{
    BanDuration, BanRecord, BanStore, Clock, GuildId, ModerationGateway, UnbanOutcome, UserId,
    parse_duration,
};
use coven_error::{ModerationError, ModerationErrorKind, ModerationResult};
use ractor::rpc::CallResult;
use ractor::{Actor, ActorRef};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

/// A temporary ban that was applied and recorded.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct TempbanReceipt {
    /// The stored ban
    record: BanRecord,
    /// The parsed duration
    duration: BanDuration,
    /// Scheduler state after reconciling, `None` if the scheduler did not answer
    scheduler: Option<SchedulerStatus>,
}

impl TempbanReceipt {
    /// When the ban lifts.
    pub fn unban_time(&self) -> DateTime<Utc> {
        self.record.unban_time
    }
}

/// Result of a pardon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PardonOutcome {
    /// The temporary ban was removed and the platform asked to lift it
    Pardoned(UnbanOutcome),
    /// The user had no active temporary ban in this guild
    NoActiveBan,
}

/// Entry point for moderation commands.
///
/// Owns the [`UnbanScheduler`] actor and keeps it in step with every ban
/// it records or removes.
#[derive(Clone)]
pub struct ModerationService {
    store: Arc<dyn BanStore>,
    gateway: Arc<dyn ModerationGateway>,
    clock: Arc<dyn Clock>,
    scheduler: ActorRef<SchedulerMessage>,
}

impl ModerationService {
    /// Spawn the scheduler and wrap it in a service.
    ///
    /// The scheduler sweeps bans that expired while the bot was offline
    /// before it handles any message.
    ///
    /// # Errors
    ///
    /// Returns error if the actor cannot be spawned.
    pub async fn start(args: SchedulerArgs) -> ModerationResult<Self> {
        let (service, _handle) = Self::spawn(args).await?;
        Ok(service)
    }

    /// Like [`Self::start`], also returning the actor's join handle.
    pub async fn spawn(args: SchedulerArgs) -> ModerationResult<(Self, JoinHandle<()>)> {
        let store = args.store.clone();
        let gateway = args.gateway.clone();
        let clock = args.clock.clone();

        let (scheduler, handle) = Actor::spawn(None, UnbanScheduler, args)
            .await
            .map_err(|e| ModerationError::new(ModerationErrorKind::Scheduler(e.to_string())))?;

        Ok((
            Self {
                store,
                gateway,
                clock,
                scheduler,
            },
            handle,
        ))
    }

    /// Ban `user_id` for `duration` (`<n><s|m|h|d>`).
    ///
    /// The platform ban is issued first. If recording it then fails, the ban
    /// is rolled back so nobody is left banned with nothing to lift it.
    ///
    /// # Errors
    ///
    /// - `InvalidDuration` if `duration` does not parse; nothing changes
    /// - `Platform` if the ban call fails; nothing changes
    /// - `Store` if the ban could not be recorded (after rollback)
    #[instrument(skip(self, reason), fields(guild_id = %guild_id, user_id = %user_id))]
    pub async fn tempban(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        duration: &str,
        reason: &str,
    ) -> ModerationResult<TempbanReceipt> {
        let duration = parse_duration(duration)?;
        let unban_time = duration.expires_at(self.clock.now())?;
        let record = BanRecord::new(user_id, guild_id, reason, unban_time);

        self.gateway.ban(guild_id, user_id, reason).await?;

        if let Err(store_err) = self.store.upsert_ban(&record).await {
            error!(error = %store_err, "Could not record temporary ban, rolling back");
            match self
                .gateway
                .unban(guild_id, user_id, "Temporary ban could not be recorded")
                .await
            {
                Ok(_) => info!("Rolled back platform ban"),
                Err(e) => error!(
                    error = %e,
                    "Rollback failed; user stays banned with no scheduled unban"
                ),
            }
            return Err(store_err.into());
        }

        info!(%unban_time, duration = %duration, "Temporary ban recorded");
        let scheduler = self.reconcile().await;

        Ok(TempbanReceipt {
            record,
            duration,
            scheduler,
        })
    }

    /// Remove a temporary ban early.
    ///
    /// A ban already lifted on the platform is reported as
    /// [`UnbanOutcome::AlreadyAbsent`], not as an error.
    ///
    /// # Errors
    ///
    /// - `Store` if the ban could not be removed
    /// - `Platform` if the unban call fails (the record is gone either way)
    #[instrument(skip(self, reason), fields(guild_id = %guild_id, user_id = %user_id))]
    pub async fn pardon(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        reason: &str,
    ) -> ModerationResult<PardonOutcome> {
        if !self.store.remove_ban(user_id, guild_id).await? {
            info!("No active temporary ban to pardon");
            return Ok(PardonOutcome::NoActiveBan);
        }

        let unban = self.gateway.unban(guild_id, user_id, reason).await;
        self.reconcile().await;

        let outcome = unban?;
        if outcome == UnbanOutcome::AlreadyAbsent {
            warn!("Pardoned user was not banned on the platform");
        }
        info!("Temporary ban pardoned");
        Ok(PardonOutcome::Pardoned(outcome))
    }

    /// Kick a member.
    #[instrument(skip(self, reason), fields(guild_id = %guild_id, user_id = %user_id))]
    pub async fn kick(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        reason: &str,
    ) -> ModerationResult<()> {
        self.gateway.kick(guild_id, user_id, reason).await?;
        info!("Member kicked");
        Ok(())
    }

    /// Active temporary bans in a guild.
    pub async fn active_bans(&self, guild_id: GuildId) -> ModerationResult<Vec<BanRecord>> {
        Ok(self.store.list_bans(guild_id).await?)
    }

    /// Ask the scheduler to re-derive its timer.
    ///
    /// Failures are logged: the ban change is already durable and the next
    /// reconcile (at the latest, on restart) picks it up.
    pub async fn reconcile(&self) -> Option<SchedulerStatus> {
        match self.scheduler.call(SchedulerMessage::Reconcile, None).await {
            Ok(CallResult::Success(status)) => Some(status),
            Ok(CallResult::Timeout) => {
                warn!("Scheduler did not answer reconcile in time");
                None
            }
            Ok(CallResult::SenderError) => {
                warn!("Scheduler dropped reconcile reply");
                None
            }
            Err(e) => {
                error!(error = %e, "Could not reach scheduler");
                None
            }
        }
    }

    /// Current scheduler timer.
    ///
    /// # Errors
    ///
    /// Returns `Scheduler` if the actor is not running.
    pub async fn status(&self) -> ModerationResult<SchedulerStatus> {
        match self.scheduler.call(SchedulerMessage::Status, None).await {
            Ok(CallResult::Success(status)) => Ok(status),
            Ok(_) => Err(ModerationError::new(ModerationErrorKind::Scheduler(
                "no status reply".to_string(),
            ))),
            Err(e) => Err(ModerationError::new(ModerationErrorKind::Scheduler(e.to_string()))),
        }
    }

    /// Ask the scheduler to sweep expired bans now, without waiting for it.
    pub fn fire(&self) -> ModerationResult<()> {
        self.scheduler
            .send_message(SchedulerMessage::Fire)
            .map_err(|e| ModerationError::new(ModerationErrorKind::Scheduler(e.to_string())))
    }

    /// Stop the scheduler, cancelling its timer.
    pub fn shutdown(&self) {
        self.scheduler.stop(Some("shutdown".to_string()));
    }
}
