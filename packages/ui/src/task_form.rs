//! Create/edit form for a task. [`TaskDraft`] holds the raw form fields and
//! turns them into API request bodies; the `datetime-local` input is read as
//! UTC.

use api::schema::{validate_patch, NewTaskRequest};
use chrono::{DateTime, NaiveDateTime, Utc};
use dioxus::prelude::*;
use store::{Priority, Task, TaskPatch};

const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    /// `YYYY-MM-DDTHH:MM`, or empty.
    pub due: String,
    pub priority: Priority,
}

impl TaskDraft {
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            due: task
                .due_date
                .map(|d| d.format(INPUT_FORMAT).to_string())
                .unwrap_or_default(),
            priority: task.priority,
        }
    }

    fn due_date(&self) -> Result<Option<DateTime<Utc>>, String> {
        let raw = self.due.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        NaiveDateTime::parse_from_str(raw, INPUT_FORMAT)
            .map(|naive| Some(naive.and_utc()))
            .map_err(|_| "Due date is not a valid date and time".to_string())
    }

    fn description(&self) -> Option<String> {
        Some(self.description.clone()).filter(|d| !d.trim().is_empty())
    }

    pub fn to_new_task(&self) -> Result<NewTaskRequest, String> {
        NewTaskRequest {
            title: self.title.clone(),
            description: self.description(),
            due_date: self.due_date()?,
            priority: Some(self.priority),
        }
        .validate()
        .map_err(|e| e.0)
    }

    /// A full update: every field, with cleared inputs sent as `null`.
    pub fn to_patch(&self) -> Result<TaskPatch, String> {
        validate_patch(TaskPatch {
            title: Some(self.title.clone()),
            description: Some(self.description()),
            due_date: Some(self.due_date()?),
            priority: Some(self.priority),
            completed: None,
        })
        .map_err(|e| e.0)
    }
}

#[component]
pub fn TaskForm(
    initial: TaskDraft,
    submit_label: String,
    busy: bool,
    on_submit: EventHandler<TaskDraft>,
) -> Element {
    let mut draft = use_signal(|| initial.clone());

    rsx! {
        form {
            class: "task-form",
            onsubmit: move |evt: FormEvent| {
                evt.prevent_default();
                on_submit.call(draft());
            },
            input {
                r#type: "text",
                placeholder: "Title",
                value: draft.read().title.clone(),
                oninput: move |evt: FormEvent| draft.write().title = evt.value(),
            }
            textarea {
                placeholder: "Description (optional)",
                value: draft.read().description.clone(),
                oninput: move |evt: FormEvent| draft.write().description = evt.value(),
            }
            div {
                class: "task-form-row",
                label {
                    "Due "
                    input {
                        r#type: "datetime-local",
                        value: draft.read().due.clone(),
                        oninput: move |evt: FormEvent| draft.write().due = evt.value(),
                    }
                }
                label {
                    "Priority "
                    select {
                        value: draft.read().priority.as_str(),
                        onchange: move |evt: FormEvent| {
                            if let Ok(priority) = evt.value().parse::<Priority>() {
                                draft.write().priority = priority;
                            }
                        },
                        for priority in Priority::ALL {
                            option {
                                value: "{priority}",
                                selected: draft.read().priority == priority,
                                "{priority}"
                            }
                        }
                    }
                }
            }
            button {
                r#type: "submit",
                class: "btn btn-primary",
                disabled: busy,
                if busy { "Saving..." } else { "{submit_label}" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    #[test]
    fn new_task_from_draft() {
        let draft = TaskDraft {
            title: "  Ship it ".into(),
            description: "   ".into(),
            due: "2030-03-01T17:30".into(),
            priority: Priority::High,
        };
        let request = draft.to_new_task().unwrap();
        assert_eq!(request.title, "Ship it");
        assert!(request.description.is_none());
        assert_eq!(
            request.due_date,
            Some(Utc.with_ymd_and_hms(2030, 3, 1, 17, 30, 0).unwrap())
        );
        assert_eq!(request.priority, Some(Priority::High));
    }

    #[test]
    fn blank_title_and_bad_date_are_rejected() {
        let blank = TaskDraft::default();
        assert_eq!(blank.to_new_task().unwrap_err(), "Title is required");

        let bad_date = TaskDraft {
            title: "x".into(),
            due: "tomorrow".into(),
            ..TaskDraft::default()
        };
        assert!(bad_date.to_new_task().is_err());
    }

    #[test]
    fn edit_round_trips_and_clears() {
        let now = Utc.with_ymd_and_hms(2030, 1, 1, 8, 0, 0).unwrap();
        let task = Task::new(
            Uuid::new_v4(),
            "Taxes".into(),
            Some("receipts".into()),
            Some(now),
            Priority::Low,
            now,
        );
        let mut draft = TaskDraft::from_task(&task);
        assert_eq!(draft.due, "2030-01-01T08:00");

        draft.description.clear();
        draft.due.clear();
        let patch = draft.to_patch().unwrap();
        assert_eq!(patch.title.as_deref(), Some("Taxes"));
        assert_eq!(patch.description, Some(None));
        assert_eq!(patch.due_date, Some(None));
        assert_eq!(patch.priority, Some(Priority::Low));
    }
}
