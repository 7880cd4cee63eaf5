//! # Reminder dispatch
//!
//! [`run_scan`] is the one place reminders are sent. It reads both tiers'
//! candidates from the store, keeps the ones whose rounded hours-until-due
//! fall inside the tier's band, emails the owner and records the dispatch.
//!
//! - A send failure leaves the task's flags untouched, so the next scan
//!   picks it up again.
//! - A failure to record a dispatch that was already sent is logged and the
//!   scan moves on.
//! - A store query failure aborts the scan before anything else is marked.
//!
//! Scans only run inside the [`ReminderScheduler`] task, which serializes
//! timer ticks and manual triggers.

mod scheduler;

use chrono::{DateTime, Utc};
use store::{hours_until_due, ReminderTier, StoreError, Task, TaskStore, UserStore};
use tracing::{debug, error, info, warn};

use crate::mail::{templates, Mailer};

pub use scheduler::{ReminderHandle, ReminderScheduler, TriggerError};

/// Outcome of one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub sent_24h: usize,
    pub sent_12h: usize,
    pub failed: usize,
    /// Candidates whose owner no longer exists.
    pub skipped: usize,
}

impl ScanReport {
    pub fn sent(&self) -> usize {
        self.sent_24h + self.sent_12h
    }

    fn record_sent(&mut self, tier: ReminderTier) {
        match tier {
            ReminderTier::DayBefore => self.sent_24h += 1,
            ReminderTier::HalfDay => self.sent_12h += 1,
        }
    }
}

pub async fn run_scan<S, M>(store: &S, mailer: &M, now: DateTime<Utc>) -> Result<ScanReport, StoreError>
where
    S: TaskStore + UserStore,
    M: Mailer,
{
    let mut batches = Vec::with_capacity(ReminderTier::ALL.len());
    for tier in ReminderTier::ALL {
        let candidates = store.reminder_candidates(tier, now).await.map_err(|e| {
            error!(tier = tier.label(), error = %e, "reminder candidate query failed");
            e
        })?;
        debug!(tier = tier.label(), count = candidates.len(), "reminder candidates");
        batches.push((tier, candidates));
    }

    let mut report = ScanReport::default();
    for (tier, candidates) in batches {
        for task in candidates {
            dispatch(store, mailer, tier, &task, now, &mut report).await?;
        }
    }

    if report.sent() > 0 || report.failed > 0 {
        info!(
            sent_24h = report.sent_24h,
            sent_12h = report.sent_12h,
            failed = report.failed,
            skipped = report.skipped,
            "reminder scan finished"
        );
    } else {
        info!("no reminders needed at this time");
    }
    Ok(report)
}

async fn dispatch<S, M>(
    store: &S,
    mailer: &M,
    tier: ReminderTier,
    task: &Task,
    now: DateTime<Utc>,
    report: &mut ScanReport,
) -> Result<(), StoreError>
where
    S: TaskStore + UserStore,
    M: Mailer,
{
    let Some(due) = task.due_date else {
        return Ok(());
    };
    let hours = hours_until_due(due, now);
    if !tier.accepts(hours) {
        debug!(task = %task.id, tier = tier.label(), hours, "outside reminder band");
        return Ok(());
    }

    let Some(owner) = store.find_user(task.owner_id).await? else {
        warn!(task = %task.id, owner = %task.owner_id, "task owner missing, skipping reminder");
        report.skipped += 1;
        return Ok(());
    };
    if owner.email.is_empty() {
        warn!(task = %task.id, "task owner has no email, skipping reminder");
        report.skipped += 1;
        return Ok(());
    }

    if let Err(e) = mailer.send(templates::reminder(&owner, task, tier)).await {
        warn!(task = %task.id, tier = tier.label(), error = %e, "reminder email failed");
        report.failed += 1;
        return Ok(());
    }
    info!(task = %task.id, to = %owner.email, tier = tier.label(), hours, "reminder sent");
    report.record_sent(tier);

    if let Err(e) = store.mark_reminded(task.id, tier, now).await {
        error!(task = %task.id, tier = tier.label(), error = %e, "reminder sent but not recorded");
    }
    Ok(())
}
