use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use store::MemoryStore;
use tower::ServiceExt;

use super::router;
use crate::auth::TokenIssuer;
use crate::mail::testing::RecordingMailer;
use crate::reminders::ReminderScheduler;
use crate::settings::ReminderSettings;
use crate::state::AppState;

struct TestApp {
    router: Router,
    store: MemoryStore,
    mailer: RecordingMailer,
}

fn app() -> TestApp {
    let store = MemoryStore::default();
    let mailer = RecordingMailer::default();
    let settings = ReminderSettings {
        enabled: false,
        ..ReminderSettings::default()
    };
    let (reminders, _) = ReminderScheduler::new(store.clone(), mailer.clone(), settings).spawn();
    let tokens = TokenIssuer::new(b"test-secret", Duration::hours(24));
    TestApp {
        router: router(AppState::new(store.clone(), mailer.clone(), tokens, reminders)),
        store,
        mailer,
    }
}

impl TestApp {
    async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        self.call_raw(method, uri, token, body.map(|b| b.to_string())).await
    }

    async fn call_raw(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<String>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(body) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                Body::from(body)
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    /// Register and return the bearer token.
    async fn register(&self, name: &str, email: &str) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                "/register",
                None,
                Some(json!({ "name": name, "email": email, "password": "secret123" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["token"].as_str().unwrap().to_string()
    }

    async fn add_task(&self, token: &str, body: Value) -> Value {
        let (status, task) = self
            .call(Method::POST, "/addTask", Some(token), Some(body))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{task}");
        task
    }
}

fn titles(tasks: &Value) -> Vec<&str> {
    tasks
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn register_login_and_validate() {
    let app = app();
    let token = app.register("Ada", "Ada@Example.com").await;
    assert_eq!(app.mailer.sent().len(), 1, "welcome email");

    let (status, body) = app
        .call(
            Method::POST,
            "/register",
            None,
            Some(json!({ "name": "Ada", "email": "ada@example.com", "password": "secret123" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User already exists with this email");

    let (status, body) = app
        .call(
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": "ada@example.com", "password": "wrong-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid credentials");

    let (status, body) = app
        .call(
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": " ADA@example.com", "password": "secret123" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "ada@example.com");

    let (status, body) = app
        .call(Method::GET, "/validate-token", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);
    assert_eq!(body["user"]["name"], "Ada");
}

#[tokio::test]
async fn welcome_email_failure_does_not_block_registration() {
    let app = app();
    app.mailer.set_failing(true);
    app.register("Ada", "ada@example.com").await;
}

#[tokio::test]
async fn missing_and_invalid_tokens() {
    let app = app();

    let (status, body) = app.call(Method::GET, "/active-tasks", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Access token required");

    let (status, body) = app
        .call(Method::GET, "/active-tasks", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Invalid or expired token");
}

#[tokio::test]
async fn active_tasks_sorted_by_priority() {
    let app = app();
    let token = app.register("Ada", "ada@example.com").await;

    app.add_task(&token, json!({ "title": "low", "priority": "Low" })).await;
    app.add_task(&token, json!({ "title": "high", "priority": "High" })).await;
    app.add_task(&token, json!({ "title": "medium" })).await;
    app.add_task(&token, json!({ "title": "high again", "priority": "High" })).await;

    let (status, tasks) = app.call(Method::GET, "/active-tasks", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&tasks), ["high", "high again", "medium", "low"]);
}

#[tokio::test]
async fn toggle_moves_task_between_lists() {
    let app = app();
    let token = app.register("Ada", "ada@example.com").await;
    let first = app.add_task(&token, json!({ "title": "first" })).await;
    let second = app.add_task(&token, json!({ "title": "second" })).await;

    let (status, body) = app
        .call(Method::PATCH, &format!("/toggleTask/{}", first["id"].as_str().unwrap()), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task marked as completed!");
    assert_eq!(body["task"]["completed"], true);
    assert!(body["task"]["completedAt"].is_string());

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    app.call(Method::PATCH, &format!("/toggleTask/{}", second["id"].as_str().unwrap()), Some(&token), None)
        .await;

    let (_, done) = app.call(Method::GET, "/completed-tasks", Some(&token), None).await;
    assert_eq!(titles(&done), ["second", "first"]);
    let (_, active) = app.call(Method::GET, "/active-tasks", Some(&token), None).await;
    assert!(active.as_array().unwrap().is_empty());

    let (_, body) = app
        .call(Method::PATCH, &format!("/toggleTask/{}", first["id"].as_str().unwrap()), Some(&token), None)
        .await;
    assert_eq!(body["message"], "Task marked as pending!");
    assert_eq!(body["task"]["completed"], false);
    assert!(body["task"]["completedAt"].is_null());
}

#[tokio::test]
async fn tasks_are_invisible_to_other_users() {
    let app = app();
    let ada = app.register("Ada", "ada@example.com").await;
    let bob = app.register("Bob", "bob@example.com").await;
    let task = app.add_task(&ada, json!({ "title": "private" })).await;
    let id = task["id"].as_str().unwrap();

    for (method, uri, body) in [
        (Method::GET, format!("/task/{id}"), None),
        (Method::PUT, format!("/updateTask/{id}"), Some(json!({ "title": "mine now" }))),
        (Method::PATCH, format!("/toggleTask/{id}"), None),
        (Method::DELETE, format!("/deleteTask/{id}"), None),
    ] {
        let (status, body) = app.call(method, &uri, Some(&bob), body).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["message"], "Task not found");
    }

    let (_, bobs) = app.call(Method::GET, "/tasks", Some(&bob), None).await;
    assert!(bobs.as_array().unwrap().is_empty());

    let (status, body) = app.call(Method::GET, &format!("/task/{id}"), Some(&ada), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "private");
    assert_eq!(body["completed"], false);
}

#[tokio::test]
async fn update_applies_only_given_fields() {
    let app = app();
    let token = app.register("Ada", "ada@example.com").await;
    let task = app
        .add_task(&token, json!({ "title": "draft", "description": "notes", "priority": "Low" }))
        .await;
    let uri = format!("/updateTask/{}", task["id"].as_str().unwrap());

    let (status, body) = app
        .call(Method::PUT, &uri, Some(&token), Some(json!({ "title": "final" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task Updated Successfully!");
    assert_eq!(body["task"]["title"], "final");
    assert_eq!(body["task"]["description"], "notes");
    assert_eq!(body["task"]["priority"], "Low");

    let (_, body) = app
        .call(Method::PUT, &uri, Some(&token), Some(json!({ "description": null })))
        .await;
    assert!(body["task"]["description"].is_null());

    let (status, _) = app
        .call(Method::PUT, &uri, Some(&token), Some(json!({ "title": "  " })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .call_raw(Method::PUT, &uri, Some(&token), Some("{not json".into()))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .call(Method::PUT, "/updateTask/not-a-uuid", Some(&token), Some(json!({ "title": "x" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_rejects_bad_input() {
    let app = app();
    let token = app.register("Ada", "ada@example.com").await;

    let (status, body) = app
        .call(Method::POST, "/addTask", Some(&token), Some(json!({ "title": "" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Title is required");

    let (status, _) = app
        .call(Method::POST, "/addTask", Some(&token), Some(json!({ "title": "x", "priority": "Urgent" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_is_not_repeatable() {
    let app = app();
    let token = app.register("Ada", "ada@example.com").await;
    let task = app.add_task(&token, json!({ "title": "once" })).await;
    let uri = format!("/deleteTask/{}", task["id"].as_str().unwrap());

    let (status, body) = app.call(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task deleted successfully!");

    let (status, _) = app.call(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn manual_trigger_sends_day_before_reminder_once() {
    let app = app();
    let token = app.register("Ada", "ada@example.com").await;
    let due = Utc::now() + Duration::hours(24);
    let task = app
        .add_task(&token, json!({ "title": "Pay rent", "dueDate": due, "priority": "High" }))
        .await;
    app.add_task(&token, json!({ "title": "someday" })).await;

    let (status, body) = app
        .call(Method::POST, "/trigger-reminders", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sent24h"], 1);
    assert_eq!(body["sent12h"], 0);

    let reminders = app.mailer.reminders();
    assert_eq!(reminders.len(), 1);
    assert_eq!(reminders[0].to, "ada@example.com");
    assert_eq!(reminders[0].subject, "REMINDER: Task \"Pay rent\" due in 24 hours!");

    let (_, stored) = app
        .call(Method::GET, &format!("/task/{}", task["id"].as_str().unwrap()), Some(&token), None)
        .await;
    assert_eq!(stored["reminderSent"], true);
    assert!(stored["lastReminderSent"].is_string());

    let (_, body) = app
        .call(Method::POST, "/trigger-reminders", Some(&token), None)
        .await;
    assert_eq!(body["sent24h"], 0);
    assert_eq!(app.mailer.reminders().len(), 1);
}

#[tokio::test]
async fn trigger_reports_store_failure() {
    let app = app();
    let token = app.register("Ada", "ada@example.com").await;
    app.store.set_unavailable(true);

    let (status, body) = app
        .call(Method::POST, "/trigger-reminders", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Internal server error");
}

#[tokio::test]
async fn notification_stats_counts_windows() {
    let app = app();
    let token = app.register("Ada", "ada@example.com").await;
    let now = Utc::now();
    for (title, hours) in [("soon", 6), ("tomorrow", 20), ("later", 48), ("overdue", -3)] {
        app.add_task(&token, json!({ "title": title, "dueDate": now + Duration::hours(hours) }))
            .await;
    }

    let (status, stats) = app
        .call(Method::GET, "/notification-stats", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalUpcomingTasks"], 3);
    assert_eq!(stats["tasksInNext24Hours"], 2);
    assert_eq!(stats["tasksInNext12Hours"], 1);
    assert_eq!(stats["upcomingTasks"][0]["title"], "soon");
}
