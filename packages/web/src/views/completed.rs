use dioxus::prelude::*;
use ui::{BoardKind, TaskBoard};

use crate::Route;

#[component]
pub fn Completed() -> Element {
    let nav = use_navigator();

    rsx! {
        section {
            class: "page",
            h1 { "Completed" }
            TaskBoard {
                kind: BoardKind::Completed,
                on_edit: move |id: uuid::Uuid| {
                    nav.push(Route::EditTask { id: id.to_string() });
                },
            }
        }
    }
}
