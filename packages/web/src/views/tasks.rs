use dioxus::prelude::*;
use ui::{
    client_for, handle_failure, use_auth, use_sessions, BoardKind, TaskBoard, TaskDraft, TaskForm,
};

use crate::Route;

/// Add form above the board of active tasks.
#[component]
pub fn Tasks() -> Element {
    let mut auth = use_auth();
    let sessions = use_sessions();
    let nav = use_navigator();
    let mut error = use_signal(|| Option::<String>::None);
    let mut busy = use_signal(|| false);
    // Bumped after each add; remounts the form (cleared) and the board (reloaded).
    let mut added = use_signal(|| 0u32);

    let on_submit = use_callback(move |draft: TaskDraft| {
        let sessions = sessions.clone();
        let request = match draft.to_new_task() {
            Ok(request) => request,
            Err(message) => {
                error.set(Some(message));
                return;
            }
        };
        spawn(async move {
            busy.set(true);
            let client = client_for(&auth.peek());
            match client.add_task(&request).await {
                Ok(_) => {
                    error.set(None);
                    *added.write() += 1;
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
            h1 { "My Tasks" }
            if let Some(message) = error() {
                div { class: "alert alert-error", "{message}" }
            }
            for generation in [added()] {
                div {
                    key: "{generation}",
                    TaskForm {
                        initial: TaskDraft::default(),
                        submit_label: "Add task",
                        busy: busy(),
                        on_submit,
                    }
                    TaskBoard {
                        kind: BoardKind::Active,
                        on_edit: move |id: uuid::Uuid| {
                            nav.push(Route::EditTask { id: id.to_string() });
                        },
                    }
                }
            }
        }
    }
}
