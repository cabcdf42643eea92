//! Correlation ids for HTTP requests and WebSocket sessions.
//!
//! Every request gets an id, either the caller's `x-request-id` or a fresh
//! UUID, and the id is echoed on the response. A WebSocket session keeps the
//! id of its upgrade request for its whole life, so the join, rejection and
//! leave logs of one connection share a `request_id` field.

use axum::{
    extract::{FromRequestParts, Request},
    http::{HeaderMap, HeaderValue, StatusCode, request::Parts},
    middleware::Next,
    response::Response,
};
use std::{convert::Infallible, fmt, time::Instant};
use uuid::Uuid;

/// Header carrying the correlation id in both directions
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied id that is accepted as is
pub const MAX_REQUEST_ID_LEN: usize = 128;

/// Correlation id for one request, or one WebSocket session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    /// Fresh random id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Reuse the caller's id when it is present, printable and not too long
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN)
            .map(|id| Self(id.to_string()))
            .unwrap_or_else(Self::generate)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Attach a [`RequestId`] to the request and echo it on the response.
///
/// A `101 Switching Protocols` response is logged as the start of a
/// session rather than a completed request; the session handler logs its
/// end.
///
/// # Example
///
/// ```no_run
/// use axum::{Router, middleware, routing::get};
/// use roshambo_server::api::request_id::{RequestId, request_id_middleware};
///
/// let app: Router = Router::new()
///     .route("/", get(|id: RequestId| async move { id.to_string() }))
///     .layer(middleware::from_fn(request_id_middleware));
/// ```
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = RequestId::from_headers(request.headers());
    request.extensions_mut().insert(request_id.clone());

    tracing::debug!(
        request_id = %request_id,
        method = %request.method(),
        uri = %request.uri(),
        "Request received"
    );

    let started = Instant::now();
    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    if status == StatusCode::SWITCHING_PROTOCOLS {
        tracing::info!(request_id = %request_id, "WebSocket session upgraded");
    } else {
        tracing::info!(
            request_id = %request_id,
            status = %status,
            elapsed_ms,
            "Request completed"
        );
    }

    response
}

/// Reads the id stored by [`request_id_middleware`]. Routes mounted without
/// the middleware get a fresh id instead of a rejection.
impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestId>()
            .cloned()
            .unwrap_or_else(RequestId::generate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, middleware, routing::get};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn headers_with(id: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_str(id).unwrap());
        headers
    }

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_caller_id_is_reused() {
        let id = RequestId::from_headers(&headers_with("lobby-session-7"));
        assert_eq!(id.as_str(), "lobby-session-7");
    }

    #[test]
    fn test_missing_blank_or_oversized_ids_are_replaced() {
        let oversized = "x".repeat(MAX_REQUEST_ID_LEN + 1);
        for headers in [HeaderMap::new(), headers_with("   "), headers_with(&oversized)] {
            let id = RequestId::from_headers(&headers);
            assert!(Uuid::parse_str(id.as_str()).is_ok(), "kept {id}");
        }
    }

    #[tokio::test]
    async fn test_middleware_shares_id_with_handler_and_response() {
        let app = Router::new()
            .route("/", get(|id: RequestId| async move { id.to_string() }))
            .layer(middleware::from_fn(request_id_middleware));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(REQUEST_ID_HEADER, "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()[REQUEST_ID_HEADER], "abc-123");
        assert_eq!(body_text(response).await, "abc-123");
    }

    #[tokio::test]
    async fn test_extractor_without_middleware_generates_id() {
        let app = Router::new().route("/", get(|id: RequestId| async move { id.to_string() }));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(response.headers().get(REQUEST_ID_HEADER).is_none());
        assert!(Uuid::parse_str(&body_text(response).await).is_ok());
    }
}
