// ABOUTME: User identification for API requests
// ABOUTME: Extractors reading the caller's identity from the User-Id header

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;

/// Header carrying the caller's user ID
pub const USER_ID_HEADER: &str = "User-Id";

/// Caller identity, required. Rejects with 401 when the header is missing or blank.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
}

/// Caller identity, if the request carries one
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<String>);

fn user_id_from_parts(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        user_id_from_parts(parts)
            .map(|id| Self { id })
            .ok_or(ApiError::Unauthorized)
    }
}

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(user_id_from_parts(parts)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/v1/agents");
        if let Some(value) = header {
            builder = builder.header(USER_ID_HEADER, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_current_user_from_header() {
        let mut parts = parts_with(Some("user-42"));
        let user = CurrentUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(user.id, "user-42");
    }

    #[tokio::test]
    async fn test_current_user_missing_header() {
        let mut parts = parts_with(None);
        let err = CurrentUser::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));

        let mut parts = parts_with(Some("   "));
        assert!(CurrentUser::from_request_parts(&mut parts, &())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_maybe_user() {
        let mut parts = parts_with(None);
        let MaybeUser(user) = MaybeUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(user.is_none());

        let mut parts = parts_with(Some("user-42"));
        let MaybeUser(user) = MaybeUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(user.as_deref(), Some("user-42"));
    }
}
