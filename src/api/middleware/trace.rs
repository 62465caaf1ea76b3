use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use crate::core::error::REQUEST_TRACE_ID;
use tracing::{info_span, Instrument};
use uuid::Uuid;

/// HTTP header name for trace ID
pub const TRACE_ID_HEADER: &str = "X-Trace-Id";

/// Opens an `http_request` span for every request and echoes its trace ID
/// in the response headers.
///
/// A well-formed UUID in an incoming `X-Trace-Id` header is reused so that
/// callers can correlate their own logs; anything else gets a fresh ID.
/// Error bodies produced while serving the request carry the same ID.
pub async fn trace_id_middleware(request: Request, next: Next) -> Response {
    let trace_id = request
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| Uuid::parse_str(h).ok())
        .unwrap_or_else(Uuid::new_v4)
        .to_string();

    let span = info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %request.method(),
        uri = %request.uri().path(),
    );

    let handled = async move {
        let response = next.run(request).await;
        tracing::info!(status = %response.status(), "Request completed");
        response
    }
    .instrument(span);
    let response = REQUEST_TRACE_ID.scope(trace_id.clone(), handled).await;

    let (mut parts, body) = response.into_parts();
    if let Ok(value) = HeaderValue::from_str(&trace_id) {
        parts.headers.insert(TRACE_ID_HEADER, value);
    }

    Response::from_parts(parts, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{DexError, ErrorResponse};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use tower::util::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/test", get(|| async { StatusCode::OK }))
            .route(
                "/missing",
                get(|| async { DexError::NotFound("pokemon".to_string()) }),
            )
            .layer(middleware::from_fn(trace_id_middleware))
    }

    async fn trace_id_of(request: Request<Body>) -> String {
        let response = app().oneshot(request).await.unwrap();
        response
            .headers()
            .get(TRACE_ID_HEADER)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_generates_unique_ids() {
        let first = trace_id_of(Request::builder().uri("/test").body(Body::empty()).unwrap()).await;
        let second = trace_id_of(Request::builder().uri("/test").body(Body::empty()).unwrap()).await;

        assert!(Uuid::parse_str(&first).is_ok());
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_reuses_incoming_uuid() {
        let incoming = Uuid::new_v4().to_string();
        let request = Request::builder()
            .uri("/test")
            .header(TRACE_ID_HEADER, &incoming)
            .body(Body::empty())
            .unwrap();

        assert_eq!(trace_id_of(request).await, incoming);
    }

    #[tokio::test]
    async fn test_replaces_garbage_incoming_id() {
        let request = Request::builder()
            .uri("/test")
            .header(TRACE_ID_HEADER, "<script>")
            .body(Body::empty())
            .unwrap();

        let trace_id = trace_id_of(request).await;
        assert_ne!(trace_id, "<script>");
        assert!(Uuid::parse_str(&trace_id).is_ok());
    }

    #[tokio::test]
    async fn test_error_body_carries_request_trace_id() {
        let response = app()
            .oneshot(Request::builder().uri("/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let header = response
            .headers()
            .get(TRACE_ID_HEADER)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: ErrorResponse = serde_json::from_slice(&body).unwrap();

        assert_eq!(parsed.trace_id, header);
    }
}
