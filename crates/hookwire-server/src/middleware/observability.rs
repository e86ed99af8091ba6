//! Request tracing with request ids and redacted credentials.

use axum::Router;
use axum::http::HeaderName;
use axum::http::header;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;

const REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Request headers that carry signatures, tokens or credentials.
///
/// Covers the signature and token headers of every bundled provider.
pub const SENSITIVE_HEADERS: [HeaderName; 8] = [
    header::AUTHORIZATION,
    header::COOKIE,
    HeaderName::from_static("x-hub-signature"),
    HeaderName::from_static("x-gogs-signature"),
    HeaderName::from_static("x-gitlab-token"),
    HeaderName::from_static("x-goog-channel-token"),
    HeaderName::from_static("pepo-signature"),
    HeaderName::from_static("x-leanix-signature"),
];

/// Extension trait for `axum::`[`Router`] to apply observability middleware.
pub trait RouterObservabilityExt<S> {
    /// Layers request tracing.
    ///
    /// Every request gets an `x-request-id` (generated unless the sender
    /// supplied one) which is echoed on the response, and
    /// [`SENSITIVE_HEADERS`] are marked so they are never logged.
    fn with_observability(self) -> Self;
}

impl<S> RouterObservabilityExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_observability(self) -> Self {
        self.layer(PropagateRequestIdLayer::new(REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetSensitiveRequestHeadersLayer::new(SENSITIVE_HEADERS))
            .layer(SetRequestIdLayer::new(REQUEST_ID, MakeRequestUuid))
    }
}
