use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use store::StoreError;
use tracing::{info, warn};

use crate::auth::{hash_password_blocking, verify_password_blocking, AuthUser};
use crate::error::{ApiError, ApiJson};
use crate::mail::{templates, Mailer};
use crate::models::UserInfo;
use crate::schema::{AuthResponse, LoginRequest, RegisterRequest, ValidateTokenResponse};
use crate::state::{AppState, AppStore};

const DUPLICATE_EMAIL: &str = "User already exists with this email";
const BAD_CREDENTIALS: &str = "Invalid credentials";

/// `POST /register`
pub async fn register<S: AppStore, M: Mailer>(
    State(state): State<AppState<S, M>>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let body = body.validate()?;

    if state.store.find_user_by_email(&body.email).await?.is_some() {
        return Err(ApiError::Validation(DUPLICATE_EMAIL.into()));
    }

    let password_hash = hash_password_blocking(body.password).await?;
    let user = match state
        .store
        .create_user(body.name, body.email, password_hash)
        .await
    {
        Ok(user) => user,
        Err(StoreError::Conflict(_)) => return Err(ApiError::Validation(DUPLICATE_EMAIL.into())),
        Err(e) => return Err(e.into()),
    };
    info!(user = %user.id, "registered new account");

    if let Err(e) = state.mailer.send(templates::welcome(&user)).await {
        warn!(user = %user.id, error = %e, "welcome email failed");
    }

    let info = UserInfo::from(&user);
    let token = state.tokens.issue(&info, Utc::now())?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".into(),
            token,
            user: info,
        }),
    ))
}

/// `POST /login`
pub async fn login<S: AppStore, M: Mailer>(
    State(state): State<AppState<S, M>>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let body = body.validate()?;

    let Some(user) = state.store.find_user_by_email(&body.email).await? else {
        return Err(ApiError::Validation(BAD_CREDENTIALS.into()));
    };
    if !verify_password_blocking(body.password, user.password_hash.clone()).await? {
        return Err(ApiError::Validation(BAD_CREDENTIALS.into()));
    }

    let info = UserInfo::from(&user);
    let token = state.tokens.issue(&info, Utc::now())?;
    Ok(Json(AuthResponse {
        message: "Login successful".into(),
        token,
        user: info,
    }))
}

/// `GET /validate-token`
pub async fn validate_token<S: AppStore, M: Mailer>(
    State(state): State<AppState<S, M>>,
    auth: AuthUser,
) -> Result<Json<ValidateTokenResponse>, ApiError> {
    let user = state
        .store
        .find_user(auth.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    Ok(Json(ValidateTokenResponse {
        valid: true,
        user: UserInfo::from(&user),
    }))
}
