use chrono::Utc;
use store::{StoreError, TaskStore, UserStore};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use super::{run_scan, ScanReport};
use crate::mail::Mailer;
use crate::settings::ReminderSettings;

#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("reminder scheduler is not running")]
    Stopped,
    #[error(transparent)]
    Store(#[from] StoreError),
}

struct ScanRequest {
    reply: oneshot::Sender<Result<ScanReport, StoreError>>,
}

/// Requests an immediate scan from a running [`ReminderScheduler`].
#[derive(Debug, Clone)]
pub struct ReminderHandle {
    requests: mpsc::Sender<ScanRequest>,
}

impl ReminderHandle {
    /// Queue a scan and wait for its report. A scan already in progress
    /// finishes first.
    pub async fn trigger(&self) -> Result<ScanReport, TriggerError> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(ScanRequest { reply })
            .await
            .map_err(|_| TriggerError::Stopped)?;
        Ok(response.await.map_err(|_| TriggerError::Stopped)??)
    }
}

/// Owns the periodic timer. Every scan, timed or manual, runs on this one
/// task, so two scans never overlap.
pub struct ReminderScheduler<S, M> {
    store: S,
    mailer: M,
    settings: ReminderSettings,
}

impl<S, M> ReminderScheduler<S, M>
where
    S: TaskStore + UserStore,
    M: Mailer,
{
    pub fn new(store: S, mailer: M, settings: ReminderSettings) -> Self {
        Self {
            store,
            mailer,
            settings,
        }
    }

    pub fn spawn(self) -> (ReminderHandle, JoinHandle<()>) {
        let (requests, inbox) = mpsc::channel(16);
        let task = tokio::spawn(self.run(inbox));
        (ReminderHandle { requests }, task)
    }

    async fn run(self, mut inbox: mpsc::Receiver<ScanRequest>) {
        let timer_enabled = self.settings.enabled;
        let mut ticker = interval_at(
            Instant::now() + self.settings.initial_delay(),
            self.settings.interval(),
        );
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut inbox_open = true;

        if timer_enabled {
            info!(
                every_secs = self.settings.interval().as_secs(),
                first_in_secs = self.settings.initial_delay().as_secs(),
                "reminder scheduler started"
            );
        } else {
            info!("periodic reminders disabled, manual triggers only");
        }

        loop {
            tokio::select! {
                _ = ticker.tick(), if timer_enabled => {
                    debug!("scheduled reminder scan");
                    if let Err(e) = self.scan().await {
                        error!(error = %e, "scheduled reminder scan failed");
                    }
                }
                request = inbox.recv(), if inbox_open => match request {
                    Some(ScanRequest { reply }) => {
                        info!("manual reminder scan requested");
                        let _ = reply.send(self.scan().await);
                    }
                    None => {
                        inbox_open = false;
                        if !timer_enabled {
                            break;
                        }
                    }
                },
            }
        }
        debug!("reminder scheduler stopped");
    }

    async fn scan(&self) -> Result<ScanReport, StoreError> {
        run_scan(&self.store, &self.mailer, Utc::now()).await
    }
}
