//! Registration page. New accounts stay signed in across browser restarts.

use api::schema::RegisterRequest;
use api::ApiClient;
use dioxus::prelude::*;
use ui::{api_base_url, sign_in, use_auth, use_sessions, Persistence};

use crate::Route;

#[component]
pub fn SignUp() -> Element {
    let mut auth = use_auth();
    let sessions = use_sessions();
    let nav = use_navigator();
    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm_password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    if auth().signed_in() {
        nav.replace(Route::Tasks {});
    }

    let handle_register = move |evt: FormEvent| {
        evt.prevent_default();
        let sessions = sessions.clone();
        spawn(async move {
            error.set(None);
            if password() != confirm_password() {
                error.set(Some("Passwords do not match".to_string()));
                return;
            }
            let request = match (RegisterRequest {
                name: name(),
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
            match ApiClient::new(api_base_url()).register(&request).await {
                Ok(response) => {
                    sign_in(&mut auth, &sessions, response, Persistence::Durable);
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
            h1 { "Create Account" }
            p { class: "muted", "Sign up for TaskFlow" }

            form {
                class: "auth-form",
                onsubmit: handle_register,

                if let Some(err) = error() {
                    div { class: "alert alert-error", "{err}" }
                }

                input {
                    r#type: "text",
                    placeholder: "Name",
                    value: name(),
                    oninput: move |evt: FormEvent| name.set(evt.value()),
                }
                input {
                    r#type: "email",
                    placeholder: "Email",
                    value: email(),
                    oninput: move |evt: FormEvent| email.set(evt.value()),
                }
                input {
                    r#type: "password",
                    placeholder: "Password (min 6 characters)",
                    value: password(),
                    oninput: move |evt: FormEvent| password.set(evt.value()),
                }
                input {
                    r#type: "password",
                    placeholder: "Confirm password",
                    value: confirm_password(),
                    oninput: move |evt: FormEvent| confirm_password.set(evt.value()),
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: loading(),
                    if loading() { "Creating account..." } else { "Sign up" }
                }
            }

            p {
                class: "muted",
                "Already have an account? "
                Link { to: Route::SignIn {}, "Sign in" }
            }
        }
    }
}
