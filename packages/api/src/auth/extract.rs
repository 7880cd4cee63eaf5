//! Bearer-token extraction for axum handlers.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

use super::{Claims, TokenIssuer};
use crate::error::ApiError;

/// The authenticated owner of a request.
///
/// Rejects with 401 when no `Authorization: Bearer <token>` header is present
/// and 403 when the token does not verify or has expired.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    TokenIssuer: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| ApiError::Unauthorized("Access token required".into()))?;

        let issuer = TokenIssuer::from_ref(state);
        match issuer.verify(token) {
            Ok(claims) => Ok(claims.into()),
            Err(err) => {
                tracing::debug!(error = %err, "rejected bearer token");
                Err(ApiError::Forbidden("Invalid or expired token".into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/active-tasks");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn parses_bearer_header() {
        assert_eq!(bearer_token(&parts(Some("Bearer abc.def"))), Some("abc.def"));
        assert_eq!(bearer_token(&parts(Some("bearer abc"))), Some("abc"));
        assert_eq!(bearer_token(&parts(Some("Basic abc"))), None);
        assert_eq!(bearer_token(&parts(Some("Bearer "))), None);
        assert_eq!(bearer_token(&parts(None)), None);
    }

    #[tokio::test]
    async fn missing_and_invalid_tokens_reject_differently() {
        let issuer = TokenIssuer::new(b"secret", chrono::Duration::hours(24));

        let missing = AuthUser::from_request_parts(&mut parts(None), &issuer).await;
        assert!(matches!(missing, Err(ApiError::Unauthorized(_))));

        let invalid = AuthUser::from_request_parts(&mut parts(Some("Bearer nope")), &issuer).await;
        assert!(matches!(invalid, Err(ApiError::Forbidden(_))));
    }
}
