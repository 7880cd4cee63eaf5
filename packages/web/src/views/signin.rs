//! Sign-in page with email/password form and a "remember me" switch.

use api::schema::LoginRequest;
use api::ApiClient;
use dioxus::prelude::*;
use ui::{api_base_url, sign_in, use_auth, use_sessions, Persistence};

use crate::Route;

#[component]
pub fn SignIn() -> Element {
    let mut auth = use_auth();
    let sessions = use_sessions();
    let nav = use_navigator();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut remember = use_signal(|| true);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    if auth().signed_in() {
        nav.replace(Route::Tasks {});
    }

    let handle_login = move |evt: FormEvent| {
        evt.prevent_default();
        let sessions = sessions.clone();
        spawn(async move {
            error.set(None);
            let request = match (LoginRequest {
                email: email(),
                password: password(),
            })
            .validate()
            {
                Ok(request) => request,
                Err(e) => {
                    error.set(Some(e.0));
                    return;
                }
            };

            loading.set(true);
            match ApiClient::new(api_base_url()).login(&request).await {
                Ok(response) => {
                    sign_in(
                        &mut auth,
                        &sessions,
                        response,
                        Persistence::from_remember_me(remember()),
                    );
                    nav.replace(Route::Tasks {});
                }
                Err(e) => error.set(Some(e.to_string())),
            }
            loading.set(false);
        });
    };

    rsx! {
        div {
            class: "auth-page",
            h1 { "Welcome back" }
            p { class: "muted", "Sign in to TaskFlow" }

            form {
                class: "auth-form",
                onsubmit: handle_login,

                if let Some(err) = error() {
                    div { class: "alert alert-error", "{err}" }
                }

                input {
                    r#type: "email",
                    placeholder: "Email",
                    value: email(),
                    oninput: move |evt: FormEvent| email.set(evt.value()),
                }
                input {
                    r#type: "password",
                    placeholder: "Password",
                    value: password(),
                    oninput: move |evt: FormEvent| password.set(evt.value()),
                }
                label {
                    class: "checkbox",
                    input {
                        r#type: "checkbox",
                        checked: remember(),
                        onchange: move |evt: FormEvent| remember.set(evt.checked()),
                    }
                    " Remember me"
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: loading(),
                    if loading() { "Signing in..." } else { "Sign in" }
                }
            }

            p {
                class: "muted",
                "No account yet? "
                Link { to: Route::SignUp {}, "Create one" }
            }
        }
    }
}
