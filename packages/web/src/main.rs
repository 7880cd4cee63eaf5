use dioxus::prelude::*;

use ui::{load_theme_from_storage, use_auth, AuthProvider, Theme, ThemeSignal};
use views::{AppLayout, Completed, EditTask, Notifications, SignIn, SignUp, Tasks};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Root {},
    #[route("/signin")]
    SignIn {},
    #[route("/signup")]
    SignUp {},
    #[layout(AppLayout)]
        #[route("/my-tasks")]
        Tasks {},
        #[route("/completed")]
        Completed {},
        #[route("/edit/:id")]
        EditTask { id: String },
        #[route("/notifications")]
        Notifications {},
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    #[cfg(feature = "server")]
    {
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime,
            Err(e) => {
                eprintln!("failed to start tokio runtime: {e}");
                std::process::exit(1);
            }
        };
        if let Err(e) = runtime.block_on(launch_server()) {
            tracing::error!(error = %e, "server exited");
            std::process::exit(1);
        }
    }

    #[cfg(not(feature = "server"))]
    {
        dioxus::launch(App);
    }
}

#[cfg(feature = "server")]
async fn launch_server() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use api::auth::TokenIssuer;
    use api::db::{self, PgStore};
    use api::mail::MailTransport;
    use api::reminders::ReminderScheduler;
    use api::settings::Settings;
    use api::AppState;
    use dioxus::server::{DioxusRouterExt, ServeConfig};
    use std::future::IntoFuture;
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let settings = Settings::new()?;

    let pool = db::connect(&settings.database).await?;
    db::migrate(&pool).await?;
    let store = PgStore::new(pool);

    let mailer = MailTransport::from_settings(settings.smtp.as_ref())?;
    let tokens = TokenIssuer::new(
        settings.auth.token_secret.as_bytes(),
        settings.auth.token_ttl()?,
    );

    let (reminders, scheduler) =
        ReminderScheduler::new(store.clone(), mailer.clone(), settings.reminders.clone()).spawn();

    let state = AppState::new(store, mailer, tokens, reminders);
    let router = api::routes::router(state).serve_dioxus_application(ServeConfig::new(), App);

    // Under `dx serve` the CLI decides where the server binds.
    let addr = match (
        dioxus::cli_config::server_ip(),
        dioxus::cli_config::server_port(),
    ) {
        (Some(ip), Some(port)) => std::net::SocketAddr::new(ip, port),
        _ => settings.server.addr.parse()?,
    };
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("TaskFlow listening on {}", addr);

    // The router holds the scheduler handle, so the task only ends by panicking.
    tokio::select! {
        served = axum::serve(listener, router.into_make_service()).into_future() => served?,
        stopped = scheduler => {
            match &stopped {
                Ok(()) => tracing::error!("reminder scheduler exited"),
                Err(e) => tracing::error!(error = %e, "reminder scheduler crashed"),
            }
            return Err("reminder scheduler stopped, shutting down".into());
        }
    }
    Ok(())
}

#[component]
fn App() -> Element {
    let mut theme: ThemeSignal = use_context_provider(|| Signal::new(Theme::default()));
    use_effect(move || load_theme_from_storage(&mut theme));

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        AuthProvider {
            Router::<Route> {}
        }
    }
}

/// Redirect `/` to the task board, or to sign-in without a session.
#[component]
fn Root() -> Element {
    let auth = use_auth();
    let nav = use_navigator();
    if auth().signed_in() {
        nav.replace(Route::Tasks {});
    } else {
        nav.replace(Route::SignIn {});
    }
    rsx! {}
}
