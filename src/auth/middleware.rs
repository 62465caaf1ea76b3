//! Authentication gate
//!
//! `require_auth` guards the protected route tree and rejects requests
//! without a valid bearer token before they reach any handler. Handlers
//! obtain the verified identity through the `AuthUser` extractor rather than
//! from values stashed in request extensions.

use crate::auth::jwt::TokenIssuer;
use crate::core::error::{DexError, Result};
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// Identity of the caller, valid for a single request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
}

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

/// Verify the request's bearer token and return the caller's identity
pub fn authorize(headers: &HeaderMap, tokens: &TokenIssuer) -> Result<AuthUser> {
    let token = bearer_token(headers).ok_or(DexError::MissingToken)?;
    let user_id = tokens.verify(token)?;
    Ok(AuthUser { user_id })
}

/// Authentication middleware for the protected route tree
pub async fn require_auth(
    State(tokens): State<Arc<TokenIssuer>>,
    request: Request,
    next: Next,
) -> Response {
    match authorize(request.headers(), &tokens) {
        Ok(user) => {
            tracing::debug!(user_id = user.user_id, "Request authenticated");
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    Arc<TokenIssuer>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = DexError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        let tokens = Arc::<TokenIssuer>::from_ref(state);
        authorize(&parts.headers, &tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::tests::TEST_SECRET;
    use axum::{
        body::Body,
        http::{HeaderValue, Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use std::time::Duration;
    use tower::util::ServiceExt;

    fn tokens() -> Arc<TokenIssuer> {
        Arc::new(TokenIssuer::new(TEST_SECRET, Some(Duration::from_secs(3600))))
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    async fn whoami(user: AuthUser) -> String {
        user.user_id.to_string()
    }

    fn app(tokens: Arc<TokenIssuer>) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .layer(middleware::from_fn_with_state(tokens.clone(), require_auth))
            .with_state(tokens)
    }

    async fn call(app: Router, authorization: Option<&str>) -> (StatusCode, String) {
        let mut builder = HttpRequest::builder().uri("/whoami");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers_with("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers_with("bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers_with("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers_with("Bearer ")), None);
        assert_eq!(bearer_token(&headers_with("Bearer")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_authorize() {
        let tokens = tokens();
        let token = tokens.issue(9).unwrap();

        let user = authorize(&headers_with(&format!("Bearer {}", token)), &tokens).unwrap();
        assert_eq!(user, AuthUser { user_id: 9 });

        assert!(matches!(
            authorize(&HeaderMap::new(), &tokens),
            Err(DexError::MissingToken)
        ));
        assert!(matches!(
            authorize(&headers_with("Bearer nonsense"), &tokens),
            Err(DexError::TokenMalformed(_))
        ));
    }

    #[tokio::test]
    async fn test_valid_token_reaches_handler() {
        let tokens = tokens();
        let token = tokens.issue(42).unwrap();

        let (status, body) = call(app(tokens), Some(&format!("Bearer {}", token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "42");
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let (status, body) = call(app(tokens()), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Authentication required"));
    }

    #[tokio::test]
    async fn test_failures_share_one_response_shape() {
        let tokens = tokens();
        let good = tokens.issue(42).unwrap();
        let expired = tokens
            .issue_at(42, chrono::Utc::now() - chrono::Duration::hours(2))
            .unwrap();
        let foreign = TokenIssuer::new("some-other-secret-of-sufficient-length", None)
            .issue(42)
            .unwrap();
        let flipped = format!("X{}", &good[1..]);

        for token in [expired, foreign, flipped, "garbage".to_string()] {
            let (status, body) = call(app(tokens.clone()), Some(&format!("Bearer {}", token))).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);

            let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
            assert_eq!(parsed["error"], "Unauthorized");
            assert_eq!(parsed["message"], "Authentication required");
        }
    }
}
