//! Request ID middleware for request tracing and correlation.
//!
//! Every response carries an `x-request-id` header. An id supplied by an
//! upstream proxy is reused when it looks sane (short, printable ASCII);
//! otherwise a fresh UUID v4 is generated. The id is recorded on the request
//! span and set as a Sentry tag so a failed checkout can be traced from the
//! visitor's report to the logs.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream id accepted as-is.
const MAX_UPSTREAM_ID_LEN: usize = 128;

/// Middleware that ensures every request has a unique request ID.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = upstream_id(request.headers().get(REQUEST_ID_HEADER))
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", &request_id);
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Accept an upstream id only if it is non-empty, bounded and printable.
fn upstream_id(header: Option<&HeaderValue>) -> Option<String> {
    let id = header?.to_str().ok()?.trim();
    let acceptable = !id.is_empty()
        && id.len() <= MAX_UPSTREAM_ID_LEN
        && id.bytes().all(|b| b.is_ascii_graphic());
    acceptable.then(|| id.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_id_reused_when_sane() {
        let header = HeaderValue::from_static("cf-7d3a9b2c");
        assert_eq!(upstream_id(Some(&header)).as_deref(), Some("cf-7d3a9b2c"));
    }

    #[test]
    fn test_upstream_id_rejected_when_missing_or_odd() {
        assert!(upstream_id(None).is_none());
        assert!(upstream_id(Some(&HeaderValue::from_static(""))).is_none());
        assert!(upstream_id(Some(&HeaderValue::from_static("two words"))).is_none());

        let long = HeaderValue::from_str(&"a".repeat(MAX_UPSTREAM_ID_LEN + 1)).ok();
        assert!(upstream_id(long.as_ref()).is_none());
    }
}
