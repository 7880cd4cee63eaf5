//! Upcoming deadlines and reminder status, refreshed every five minutes,
//! with a button that runs a reminder scan on demand.

use api::schema::{NotificationStats, TriggerResponse};
use dioxus::prelude::*;
use store::ReminderTier;

use crate::auth::{client_for, handle_failure, use_auth, use_sessions};
use crate::icons::{FaArrowsRotate, FaBell};
use crate::task_list::priority_class;
use crate::{sleep, Icon};

const REFRESH_EVERY: std::time::Duration = std::time::Duration::from_secs(5 * 60);

pub fn tier_label(tier: Option<ReminderTier>) -> &'static str {
    match tier {
        Some(ReminderTier::DayBefore) => "24h reminder pending",
        Some(ReminderTier::HalfDay) => "12h reminder pending",
        None => "",
    }
}

pub fn describe_trigger(response: &TriggerResponse) -> String {
    let sent = response.sent_24h + response.sent_12h;
    let mut text = match sent {
        0 => "No reminders were due.".to_string(),
        1 => "Sent 1 reminder.".to_string(),
        n => format!("Sent {n} reminders."),
    };
    if response.failed > 0 {
        text.push_str(&format!(" {} failed and will be retried.", response.failed));
    }
    text
}

#[component]
pub fn NotificationCenter() -> Element {
    let mut auth = use_auth();
    let sessions = use_sessions();
    let mut stats = use_signal(|| Option::<NotificationStats>::None);
    let mut error = use_signal(|| Option::<String>::None);
    let mut notice = use_signal(|| Option::<String>::None);
    let mut running = use_signal(|| false);
    let mut generation = use_signal(|| 0u32);

    let load_sessions = sessions.clone();
    let _loader = use_resource(move || {
        let sessions = load_sessions.clone();
        async move {
            let _ = generation();
            match client_for(&auth()).notification_stats().await {
                Ok(fresh) => {
                    stats.set(Some(fresh));
                    error.set(None);
                }
                Err(e) => error.set(handle_failure(&mut auth, &sessions, &e)),
            }
        }
    });

    use_effect(move || {
        spawn(async move {
            loop {
                sleep(REFRESH_EVERY).await;
                *generation.write() += 1;
            }
        });
    });

    let trigger = move |_| {
        let sessions = sessions.clone();
        spawn(async move {
            running.set(true);
            let client = client_for(&auth.peek());
            match client.trigger_reminders().await {
                Ok(response) => {
                    notice.set(Some(describe_trigger(&response)));
                    *generation.write() += 1;
                }
                Err(e) => {
                    if let Some(message) = handle_failure(&mut auth, &sessions, &e) {
                        error.set(Some(format!("Reminder check failed: {message}")));
                    }
                }
            }
            running.set(false);
        });
    };

    rsx! {
        section {
            class: "notification-center",
            header {
                class: "notification-header",
                h2 {
                    Icon { icon: FaBell, width: 18, height: 18 }
                    " Notifications"
                }
                button {
                    class: "btn",
                    disabled: running(),
                    onclick: trigger,
                    Icon { icon: FaArrowsRotate, width: 14, height: 14 }
                    if running() { " Checking..." } else { " Check reminders now" }
                }
            }
            if let Some(message) = error() {
                div { class: "alert alert-error", "{message}" }
            }
            if let Some(message) = notice() {
                div { class: "alert alert-info", "{message}" }
            }
            match stats() {
                None => rsx! { p { class: "muted", "Loading..." } },
                Some(stats) => rsx! {
                    div {
                        class: "notification-counts",
                        div { strong { "{stats.total_upcoming_tasks}" } span { " upcoming" } }
                        div { strong { "{stats.tasks_in_next_24_hours}" } span { " due within 24h" } }
                        div { strong { "{stats.tasks_in_next_12_hours}" } span { " due within 12h" } }
                    }
                    if stats.upcoming_tasks.is_empty() {
                        p { class: "muted", "No upcoming deadlines." }
                    }
                    ul {
                        class: "upcoming-list",
                        for task in stats.upcoming_tasks {
                            li {
                                key: "{task.id}",
                                span { class: "upcoming-title", "{task.title}" }
                                span { class: priority_class(task.priority), "{task.priority}" }
                                span { class: "muted", "in {task.hours_until_due}h" }
                                if task.reminder_sent {
                                    span { class: "task-reminded", "reminded" }
                                }
                                span { class: "tier", {tier_label(task.eligible_tier)} }
                            }
                        }
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(sent_24h: usize, sent_12h: usize, failed: usize) -> TriggerResponse {
        TriggerResponse {
            message: "Reminder check completed successfully".into(),
            sent_24h,
            sent_12h,
            failed,
        }
    }

    #[test]
    fn trigger_summaries() {
        assert_eq!(describe_trigger(&response(0, 0, 0)), "No reminders were due.");
        assert_eq!(describe_trigger(&response(1, 0, 0)), "Sent 1 reminder.");
        assert_eq!(
            describe_trigger(&response(2, 1, 1)),
            "Sent 3 reminders. 1 failed and will be retried."
        );
    }

    #[test]
    fn tier_labels() {
        assert_eq!(tier_label(Some(ReminderTier::HalfDay)), "12h reminder pending");
        assert_eq!(tier_label(None), "");
    }
}
