//! # Typed HTTP client for the REST API
//!
//! [`ApiClient`] wraps `reqwest` (fetch on wasm, hyper natively) and maps each
//! endpoint to a method returning the matching [`crate::schema`] type. A
//! client built with [`ApiClient::with_token`] sends `Authorization: Bearer`.
//!
//! Errors are split so the UI can react correctly:
//!
//! - [`ClientError::Network`]: the server was not reached. An existing
//!   session must survive this.
//! - [`ClientError::Rejected`]: the server answered with an error status.
//!   [`ClientError::is_auth_rejection`] is true for 401/403 only, which is the
//!   sole signal to tear down a local session.
//! - [`ClientError::Decode`]: a success status with an unexpected body.

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use store::{Task, TaskPatch};
use thiserror::Error;
use uuid::Uuid;

use crate::schema::{
    AuthResponse, LoginRequest, MessageResponse, NewTaskRequest, NotificationStats,
    RegisterRequest, TaskMessage, TriggerResponse, ValidateTokenResponse,
};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ClientError {
    /// The server explicitly refused the credentials.
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self, ClientError::Rejected { status: 401 | 403, .. })
    }
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            http: reqwest::Client::new(),
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<MessageResponse>().await {
                Ok(body) => body.message,
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string(),
            };
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send(self.request(Method::GET, path)).await
    }

    async fn with_body<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        self.send(self.request(method, path).json(body)).await
    }

    pub async fn register(&self, body: &RegisterRequest) -> Result<AuthResponse, ClientError> {
        self.with_body(Method::POST, "/register", body).await
    }

    pub async fn login(&self, body: &LoginRequest) -> Result<AuthResponse, ClientError> {
        self.with_body(Method::POST, "/login", body).await
    }

    pub async fn validate_token(&self) -> Result<ValidateTokenResponse, ClientError> {
        self.get("/validate-token").await
    }

    pub async fn add_task(&self, body: &NewTaskRequest) -> Result<Task, ClientError> {
        self.with_body(Method::POST, "/addTask", body).await
    }

    pub async fn active_tasks(&self) -> Result<Vec<Task>, ClientError> {
        self.get("/active-tasks").await
    }

    pub async fn completed_tasks(&self) -> Result<Vec<Task>, ClientError> {
        self.get("/completed-tasks").await
    }

    pub async fn task(&self, id: Uuid) -> Result<Task, ClientError> {
        self.get(&format!("/task/{id}")).await
    }

    pub async fn update_task(&self, id: Uuid, patch: &TaskPatch) -> Result<TaskMessage, ClientError> {
        self.with_body(Method::PUT, &format!("/updateTask/{id}"), patch)
            .await
    }

    pub async fn toggle_task(&self, id: Uuid) -> Result<TaskMessage, ClientError> {
        self.send(self.request(Method::PATCH, &format!("/toggleTask/{id}")))
            .await
    }

    pub async fn delete_task(&self, id: Uuid) -> Result<MessageResponse, ClientError> {
        self.send(self.request(Method::DELETE, &format!("/deleteTask/{id}")))
            .await
    }

    pub async fn notification_stats(&self) -> Result<NotificationStats, ClientError> {
        self.get("/notification-stats").await
    }

    pub async fn trigger_reminders(&self) -> Result<TriggerResponse, ClientError> {
        self.send(self.request(Method::POST, "/trigger-reminders"))
            .await
    }
}
