use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::debug;

use crate::auth::jwt::{AuthError, Identity};
use crate::errors::AppError;
use crate::state::AppState;

/// Authenticated caller. Taking this as the first handler argument verifies the
/// bearer token exactly once, before the request body is read.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let tokens = state.tokens.as_ref().ok_or(AppError::AuthNotConfigured)?;

        let identity = tokens.verify(token).map_err(|e| {
            debug!("Token rejected: {e}");
            match e {
                AuthError::Expired => AppError::Unauthenticated("Token has expired.".to_string()),
                _ => AppError::Unauthenticated("Invalid token.".to_string()),
            }
        })?;

        Ok(AuthUser(identity))
    }
}

/// Reads the token from `Authorization`, with or without a `Bearer ` prefix.
fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthenticated("Missing Authorization header.".to_string()))?;

    let value = header
        .to_str()
        .map_err(|_| AppError::Unauthenticated("Malformed Authorization header.".to_string()))?;

    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    if token.is_empty() {
        return Err(AppError::Unauthenticated(
            "Malformed Authorization header.".to_string(),
        ));
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(auth: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/analyze-job-ad");
        if let Some(value) = auth {
            builder = builder.header("authorization", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_extract_token_with_bearer() {
        let p = parts(Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&p).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_extract_token_without_bearer() {
        let p = parts(Some("abc.def.ghi"));
        assert_eq!(bearer_token(&p).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_no_auth_header() {
        let p = parts(None);
        assert!(matches!(
            bearer_token(&p),
            Err(AppError::Unauthenticated(_))
        ));
    }

    #[test]
    fn test_empty_bearer() {
        let p = parts(Some("Bearer "));
        assert!(matches!(
            bearer_token(&p),
            Err(AppError::Unauthenticated(_))
        ));
    }
}
