//! Pre-shared key guard for the admin routes.
//!
//! Keys are compared in constant time.

use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use crate::errors::AppError;

/// Header carrying the admin key.
pub const ADMIN_KEY_HEADER: &str = "x-api-key";

/// Let the request through when it carries `expected_key` in `x-api-key` or as a
/// bearer token. With no key configured every request passes.
pub async fn admin_key_layer(
    expected_key: Option<String>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = expected_key else {
        return next.run(request).await;
    };

    let headers = request.headers();
    let from_header = headers
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok());
    let from_bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "));

    let provided = from_header.or(from_bearer).map(str::to_owned);

    match provided {
        Some(provided) if keys_match(&provided, &expected) => next.run(request).await,
        Some(_) => {
            tracing::warn!("Rejected admin request to {} with wrong key", request.uri());
            AppError::Unauthorized("Invalid admin key".to_string()).into_response()
        }
        None => AppError::Unauthorized("Missing admin key".to_string()).into_response(),
    }
}

fn keys_match(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    fn guarded(key: Option<&str>) -> Router {
        let key = key.map(str::to_string);
        Router::new()
            .route("/admin/ping", get(|| async { "pong" }))
            .layer(middleware::from_fn(move |req, next| {
                admin_key_layer(key.clone(), req, next)
            }))
    }

    async fn status(app: Router, header: Option<(&str, &str)>) -> StatusCode {
        let mut request = Request::builder().uri("/admin/ping");
        if let Some((name, value)) = header {
            request = request.header(name, value);
        }
        app.oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_layer_accepts_header_or_bearer() {
        assert_eq!(
            status(guarded(Some("k1")), Some(("x-api-key", "k1"))).await,
            StatusCode::OK
        );
        assert_eq!(
            status(guarded(Some("k1")), Some(("authorization", "Bearer k1"))).await,
            StatusCode::OK
        );
        assert_eq!(
            status(guarded(Some("k1")), Some(("x-api-key", "k2"))).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status(guarded(Some("k1")), None).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_layer_open_without_configured_key() {
        assert_eq!(status(guarded(None), None).await, StatusCode::OK);
    }

    #[test]
    fn test_keys_match_equal() {
        assert!(keys_match("nav-admin-key", "nav-admin-key"));
    }

    #[test]
    fn test_keys_match_not_equal() {
        assert!(!keys_match("nav-admin-key", "nav-admin-kez"));
    }

    #[test]
    fn test_keys_match_different_lengths() {
        assert!(!keys_match("short", "much-longer-key"));
        assert!(!keys_match("", "not-empty"));
    }
}
