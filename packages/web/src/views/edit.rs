//! Edit page for a single task. Every field is sent, so clearing the
//! description or due date removes it.

use dioxus::prelude::*;
use ui::{client_for, handle_failure, use_auth, use_sessions, TaskDraft, TaskForm};
use uuid::Uuid;

use crate::Route;

#[component]
pub fn EditTask(id: String) -> Element {
    let mut auth = use_auth();
    let sessions = use_sessions();
    let nav = use_navigator();
    let mut error = use_signal(|| Option::<String>::None);
    let mut busy = use_signal(|| false);

    let task_id = id.parse::<Uuid>().ok();
    // `Err(None)` means the session was torn down and the layout is redirecting.
    let load_sessions = sessions.clone();
    let task = use_resource(move || {
        let sessions = load_sessions.clone();
        async move {
            let Some(id) = task_id else {
                return Err(Some("Task not found".to_string()));
            };
            client_for(&auth())
                .task(id)
                .await
                .map_err(|e| handle_failure(&mut auth, &sessions, &e))
        }
    });

    let on_submit = use_callback(move |draft: TaskDraft| {
        let sessions = sessions.clone();
        let Some(id) = task_id else {
            return;
        };
        let patch = match draft.to_patch() {
            Ok(patch) => patch,
            Err(message) => {
                error.set(Some(message));
                return;
            }
        };
        spawn(async move {
            busy.set(true);
            let client = client_for(&auth.peek());
            match client.update_task(id, &patch).await {
                Ok(_) => {
                    nav.push(Route::Tasks {});
                }
                Err(e) => match handle_failure(&mut auth, &sessions, &e) {
                    Some(message) => error.set(Some(message)),
                    None => {
                        nav.replace(Route::SignIn {});
                    }
                },
            }
            busy.set(false);
        });
    });

    rsx! {
        section {
            class: "page",
            h1 { "Edit task" }
            if let Some(message) = error() {
                div { class: "alert alert-error", "{message}" }
            }
            match &*task.read() {
                None => rsx! { p { class: "muted", "Loading..." } },
                Some(Err(None)) => rsx! {},
                Some(Err(Some(message))) => rsx! {
                    div { class: "alert alert-error", "{message}" }
                },
                Some(Ok(task)) => rsx! {
                    TaskForm {
                        initial: TaskDraft::from_task(task),
                        submit_label: "Save changes",
                        busy: busy(),
                        on_submit,
                    }
                },
            }
            Link { class: "btn", to: Route::Tasks {}, "Back to tasks" }
        }
    }
}
