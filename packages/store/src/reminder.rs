//! # Reminder tiers and eligibility
//!
//! A task gets at most one email per tier: one roughly a day before it is due
//! and one roughly half a day before. Eligibility is decided in two steps.
//!
//! 1. **Candidate** ([`ReminderTier::is_candidate`]): the coarse filter a store
//!    evaluates. The task is incomplete, its due date lies inside the tier's
//!    window `[now - h, now + h]`, and its reminder flags say the tier has not
//!    fired recently. Only plain inequalities, so a SQL backend can index it.
//! 2. **Due** ([`ReminderTier::accepts`]): the rounded hours until the due date
//!    fall inside the tier's narrow band. This rejects tasks the coarse window
//!    admits but which belong to the other tier, or are already overdue.
//!
//! | Tier | Window | Stale after | Band | Marks |
//! |------|--------|-------------|------|-------|
//! | [`ReminderTier::DayBefore`] | ±24h | 23h | 22..=26 | `reminder_sent`, `last_reminder_sent` |
//! | [`ReminderTier::HalfDay`] | ±12h | 11h | 10..=14 | `last_reminder_sent` |
//!
//! The half-day tier compares against `last_reminder_sent`, so a task that was
//! never reminded at all is not a half-day candidate.

use std::ops::RangeInclusive;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Task;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReminderTier {
    #[serde(rename = "24h")]
    DayBefore,
    #[serde(rename = "12h")]
    HalfDay,
}

impl ReminderTier {
    /// Scan order.
    pub const ALL: [ReminderTier; 2] = [ReminderTier::DayBefore, ReminderTier::HalfDay];

    /// Nominal hours before the due date.
    pub fn hours(self) -> i64 {
        match self {
            ReminderTier::DayBefore => 24,
            ReminderTier::HalfDay => 12,
        }
    }

    /// Coarse due-date window, inclusive on both ends.
    pub fn window(self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let span = Duration::hours(self.hours());
        (now - span, now + span)
    }

    /// A previous reminder older than this re-arms the tier.
    pub fn stale_after(self) -> Duration {
        Duration::hours(self.hours() - 1)
    }

    /// Cut-off instant: `last_reminder_sent` strictly before this is stale.
    pub fn stale_before(self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.stale_after()
    }

    /// Accepted hours-until-due, inclusive.
    pub fn band(self) -> RangeInclusive<i64> {
        let h = self.hours();
        (h - 2)..=(h + 2)
    }

    pub fn accepts(self, hours_until_due: i64) -> bool {
        self.band().contains(&hours_until_due)
    }

    /// The store-level filter.
    pub fn is_candidate(self, task: &Task, now: DateTime<Utc>) -> bool {
        if task.completed {
            return false;
        }
        let Some(due) = task.due_date else {
            return false;
        };
        let (start, end) = self.window(now);
        if due < start || due > end {
            return false;
        }
        let stale = task
            .last_reminder_sent
            .is_some_and(|sent| sent < self.stale_before(now));
        match self {
            ReminderTier::DayBefore => !task.reminder_sent || stale,
            ReminderTier::HalfDay => stale,
        }
    }

    /// Candidate and inside the narrow band: a reminder should go out now.
    pub fn is_due(self, task: &Task, now: DateTime<Utc>) -> bool {
        self.is_candidate(task, now)
            && task
                .due_date
                .is_some_and(|due| self.accepts(hours_until_due(due, now)))
    }

    /// Apply the flags a successful dispatch leaves behind.
    pub fn mark(self, task: &mut Task, now: DateTime<Utc>) {
        if self == ReminderTier::DayBefore {
            task.reminder_sent = true;
        }
        task.last_reminder_sent = Some(now);
    }

    pub fn label(self) -> &'static str {
        match self {
            ReminderTier::DayBefore => "24h",
            ReminderTier::HalfDay => "12h",
        }
    }
}

/// Whole hours from `now` until `due`, rounded to the nearest hour.
/// Negative once the task is overdue.
pub fn hours_until_due(due: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let secs = (due - now).num_seconds() as f64;
    (secs / 3600.0).round() as i64
}

/// The tier a scan at `now` would dispatch for `task`, if any.
pub fn eligible_tier(task: &Task, now: DateTime<Utc>) -> Option<ReminderTier> {
    ReminderTier::ALL
        .into_iter()
        .find(|tier| tier.is_due(task, now))
}
