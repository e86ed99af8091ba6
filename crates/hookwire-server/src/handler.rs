//! Caller-supplied handling of parsed deliveries.

use std::future::Future;

use async_trait::async_trait;
use axum::response::{IntoResponse, Response};
use hookwire_core::{Provider, Result};

/// Turns the outcome of a parse into the response sent back to the provider.
///
/// The handler receives failures as well as payloads, so it decides the
/// status surfaced to the sender. [`ErrorResponse`](crate::ErrorResponse)
/// converts any core error into the recommended one.
///
/// Implemented for async closures taking `Result<P::Payload>`:
///
/// ```rust,ignore
/// let handler = |result: Result<github::Payload>| async move {
///     match result {
///         Ok(payload) => StatusCode::OK.into_response(),
///         Err(error) => ErrorResponse::from(error).into_response(),
///     }
/// };
/// ```
#[async_trait]
pub trait WebhookHandler<P: Provider>: Send + Sync + 'static {
    /// Handles one delivery.
    async fn handle(&self, result: Result<P::Payload>) -> Response;
}

#[async_trait]
impl<P, F, Fut, R> WebhookHandler<P> for F
where
    P: Provider,
    F: Fn(Result<P::Payload>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send,
    R: IntoResponse,
{
    async fn handle(&self, result: Result<P::Payload>) -> Response {
        (self)(result).await.into_response()
    }
}
