//! # Task listings
//!
//! [`TaskBoard`] loads either the active or the completed list and renders a
//! [`TaskCard`] per task. Deletes are optimistic: the card disappears at once
//! and is put back in its old position if the server refuses. Toggling
//! refetches, since the task moves to the other list.

use chrono::{DateTime, Utc};
use dioxus::prelude::*;
use store::{Priority, Task};
use uuid::Uuid;

use crate::auth::{client_for, handle_failure, use_auth, use_sessions};
use crate::icons::{FaCheck, FaPen, FaRotateLeft, FaTrash};
use crate::Icon;

/// A task taken out of the list, with enough to put it back.
#[derive(Clone, Debug, PartialEq)]
pub struct Removed {
    index: usize,
    task: Task,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskListState {
    tasks: Vec<Task>,
}

impl TaskListState {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn remove(&mut self, id: Uuid) -> Option<Removed> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        let task = self.tasks.remove(index);
        Some(Removed { index, task })
    }

    /// Undo a [`TaskListState::remove`].
    pub fn restore(&mut self, removed: Removed) {
        let index = removed.index.min(self.tasks.len());
        self.tasks.insert(index, removed.task);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoardKind {
    Active,
    Completed,
}

pub fn priority_class(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "priority priority-high",
        Priority::Medium => "priority priority-medium",
        Priority::Low => "priority priority-low",
    }
}

/// "due in 5h", "due in 3d", "overdue by 2h".
pub fn due_label(due: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = (due - now).num_hours();
    let span = |h: i64| {
        if h.abs() >= 48 {
            format!("{}d", h.abs() / 24)
        } else {
            format!("{}h", h.abs())
        }
    };
    if due < now {
        format!("overdue by {}", span(hours))
    } else {
        format!("due in {}", span(hours))
    }
}

#[component]
pub fn TaskCard(
    task: Task,
    on_toggle: EventHandler<Uuid>,
    on_delete: EventHandler<Uuid>,
    on_edit: EventHandler<Uuid>,
) -> Element {
    let id = task.id;
    let now = Utc::now();
    let overdue = !task.completed && task.due_date.is_some_and(|d| d < now);
    let due = task
        .due_date
        .map(|d| (d.format("%Y-%m-%d %H:%M UTC").to_string(), due_label(d, now)));
    let completed = task
        .completed_at
        .map(|d| format!("completed {}", d.format("%Y-%m-%d %H:%M")));

    rsx! {
        div {
            class: if overdue { "task-card task-card-overdue" } else { "task-card" },
            div {
                class: "task-card-header",
                h3 { class: "task-title", "{task.title}" }
                span { class: priority_class(task.priority), "{task.priority}" }
            }
            if let Some(description) = &task.description {
                p { class: "task-description", "{description}" }
            }
            div {
                class: "task-meta",
                if let Some((exact, relative)) = due {
                    span { title: "{exact}", "{relative}" }
                }
                if let Some(completed) = completed {
                    span { "{completed}" }
                }
                if task.reminder_sent {
                    span { class: "task-reminded", "reminder sent" }
                }
            }
            div {
                class: "task-actions",
                button {
                    title: if task.completed { "Mark as pending" } else { "Mark as completed" },
                    onclick: move |_| on_toggle.call(id),
                    if task.completed {
                        Icon { icon: FaRotateLeft, width: 14, height: 14 }
                    } else {
                        Icon { icon: FaCheck, width: 14, height: 14 }
                    }
                }
                button {
                    title: "Edit",
                    onclick: move |_| on_edit.call(id),
                    Icon { icon: FaPen, width: 14, height: 14 }
                }
                button {
                    title: "Delete",
                    onclick: move |_| on_delete.call(id),
                    Icon { icon: FaTrash, width: 14, height: 14 }
                }
            }
        }
    }
}

#[component]
pub fn TaskBoard(kind: BoardKind, on_edit: EventHandler<Uuid>) -> Element {
    let mut auth = use_auth();
    let sessions = use_sessions();
    let mut list = use_signal(TaskListState::default);
    let mut error = use_signal(|| Option::<String>::None);
    let mut generation = use_signal(|| 0u32);

    let load_sessions = sessions.clone();
    let loader = use_resource(move || {
        let sessions = load_sessions.clone();
        async move {
            let _ = generation();
            let client = client_for(&auth());
            let result = match kind {
                BoardKind::Active => client.active_tasks().await,
                BoardKind::Completed => client.completed_tasks().await,
            };
            match result {
                Ok(tasks) => {
                    list.set(TaskListState::new(tasks));
                    error.set(None);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to load tasks");
                    error.set(handle_failure(&mut auth, &sessions, &e));
                }
            }
        }
    });

    let toggle_sessions = sessions.clone();
    let on_toggle = move |id: Uuid| {
        let sessions = toggle_sessions.clone();
        spawn(async move {
            let client = client_for(&auth.peek());
            match client.toggle_task(id).await {
                Ok(_) => *generation.write() += 1,
                Err(e) => error.set(handle_failure(&mut auth, &sessions, &e)),
            }
        });
    };

    let on_delete = move |id: Uuid| {
        let sessions = sessions.clone();
        let removed = list.write().remove(id);
        spawn(async move {
            let client = client_for(&auth.peek());
            if let Err(e) = client.delete_task(id).await {
                tracing::warn!(task = %id, error = %e, "delete failed, restoring");
                if let Some(removed) = removed {
                    list.write().restore(removed);
                }
                if let Some(message) = handle_failure(&mut auth, &sessions, &e) {
                    error.set(Some(format!("Could not delete task: {message}")));
                }
            }
        });
    };

    let empty_text = match kind {
        BoardKind::Active => "Nothing to do. Add a task to get started.",
        BoardKind::Completed => "No completed tasks yet.",
    };

    rsx! {
        div {
            class: "task-board",
            if let Some(message) = error() {
                div { class: "alert alert-error", "{message}" }
            }
            if loader.read().is_none() {
                p { class: "muted", "Loading tasks..." }
            } else if list.read().tasks().is_empty() {
                p { class: "muted", "{empty_text}" }
            } else {
                for task in list.read().tasks().iter().cloned() {
                    TaskCard {
                        key: "{task.id}",
                        task,
                        on_toggle: on_toggle.clone(),
                        on_delete: on_delete.clone(),
                        on_edit,
                    }
                }
            }
        }
    }
}
