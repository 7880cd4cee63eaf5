use dioxus::prelude::*;
use ui::NotificationCenter;

#[component]
pub fn Notifications() -> Element {
    rsx! {
        section {
            class: "page",
            NotificationCenter {}
        }
    }
}
