use dioxus::prelude::*;

use ui::icons::{FaBell, FaCircleCheck, FaListCheck};
use ui::{use_auth, Icon, LogoutButton, ThemeToggle};

use crate::Route;

/// Shell for the signed-in pages. Visitors without a session are sent to
/// sign-in.
#[component]
pub fn AppLayout() -> Element {
    let auth = use_auth();
    let nav = use_navigator();

    let state = auth();
    if !state.signed_in() {
        nav.replace(Route::SignIn {});
        return rsx! {};
    }
    let name = state.user.map(|u| u.name).unwrap_or_default();

    rsx! {
        div {
            class: "app-shell",
            header {
                class: "app-nav",
                Link { class: "brand", to: Route::Tasks {}, "TaskFlow" }
                nav {
                    Link {
                        to: Route::Tasks {},
                        active_class: "active",
                        Icon { icon: FaListCheck, width: 14, height: 14 }
                        " Tasks"
                    }
                    Link {
                        to: Route::Completed {},
                        active_class: "active",
                        Icon { icon: FaCircleCheck, width: 14, height: 14 }
                        " Completed"
                    }
                    Link {
                        to: Route::Notifications {},
                        active_class: "active",
                        Icon { icon: FaBell, width: 14, height: 14 }
                        " Notifications"
                    }
                }
                div {
                    class: "app-nav-user",
                    if !state.online {
                        span { class: "offline-badge", title: "Could not reach the server", "offline" }
                    }
                    span { class: "muted", "{name}" }
                    ThemeToggle {}
                    LogoutButton { class: "btn" }
                }
            }
            main {
                class: "app-main",
                Outlet::<Route> {}
            }
        }
    }
}
