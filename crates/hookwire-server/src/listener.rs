//! Routing of deliveries to configured hooks.

use std::fmt;
use std::sync::Arc;

use axum::Router;
use axum::extract::Request;
use axum::http::{HeaderValue, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{MethodRouter, post};
use hookwire_core::{ErrorKind, Hook, Provider, Subscription};

use crate::{ErrorResponse, WebhookHandler};

/// Tracing target for delivery routing.
pub const TRACING_TARGET: &str = "hookwire_server::listener";

/// A hook, the subscription it parses with and the handler of the outcome.
struct Endpoint<P: Provider, H> {
    hook: Hook<P>,
    subscription: Subscription<P::Event>,
    handler: H,
}

impl<P, H> Endpoint<P, H>
where
    P: Provider,
    H: WebhookHandler<P>,
{
    async fn dispatch(&self, request: Request) -> Response {
        let result = self.hook.parse(request, self.subscription.clone()).await;

        if let Err(error) = &result
            && error.kind.is_authentication_failure()
        {
            tracing::warn!(
                target: TRACING_TARGET,
                provider = P::SPEC.name,
                kind = %error.kind,
                "delivery failed authentication"
            );
        }

        self.handler.handle(result).await
    }
}

/// Builds the route of a single hook.
///
/// `POST` requests are parsed exactly once and the handler's response is
/// returned unchanged. Any other method is answered with `405` and an
/// `Allow: POST` header without invoking the hook or the handler.
pub fn webhook_route<P, H, S>(
    hook: Hook<P>,
    subscription: impl Into<Subscription<P::Event>>,
    handler: H,
) -> MethodRouter<S>
where
    P: Provider,
    H: WebhookHandler<P>,
    S: Clone + Send + Sync + 'static,
{
    let endpoint = Arc::new(Endpoint {
        hook,
        subscription: subscription.into(),
        handler,
    });

    post(move |request: Request| async move { endpoint.dispatch(request).await })
        .fallback(method_not_allowed)
}

async fn method_not_allowed() -> Response {
    let mut response = ErrorResponse::from(ErrorKind::InvalidMethod).into_response();
    response
        .headers_mut()
        .insert(header::ALLOW, HeaderValue::from_static("POST"));
    response
}

async fn not_found(uri: Uri) -> ErrorResponse<'static> {
    ErrorResponse::NOT_FOUND.with_message(uri.path().to_owned())
}

/// Joins a mount prefix and a hook path into an absolute route path.
fn join_path(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_matches('/');
    let path = path.trim_start_matches('/');

    match (prefix.is_empty(), path.is_empty()) {
        (true, _) => format!("/{path}"),
        (false, true) => format!("/{prefix}"),
        (false, false) => format!("/{prefix}/{path}"),
    }
}

/// A set of hooks mounted under a common path prefix.
///
/// Requests to paths without a hook are answered with a `404` JSON error.
///
/// ```rust,ignore
/// let router = WebhookListener::new()
///     .with_prefix("/webhooks")
///     .hook("/github", GitHubHook::new().with_secret(secret), Subscription::all(), handler)
///     .into_router();
/// ```
#[must_use = "a listener does nothing unless turned into a router"]
pub struct WebhookListener {
    prefix: String,
    routes: Vec<(String, &'static str, MethodRouter)>,
}

impl WebhookListener {
    /// Creates a listener with no hooks mounted at the root.
    pub fn new() -> Self {
        Self {
            prefix: String::new(),
            routes: Vec::new(),
        }
    }

    /// Sets the prefix every hook path is mounted under.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Mounts a hook at `path`.
    pub fn hook<P, H>(
        mut self,
        path: impl Into<String>,
        hook: Hook<P>,
        subscription: impl Into<Subscription<P::Event>>,
        handler: H,
    ) -> Self
    where
        P: Provider,
        H: WebhookHandler<P>,
    {
        let route = webhook_route(hook, subscription, handler);
        self.routes.push((path.into(), P::SPEC.name, route));
        self
    }

    /// Returns the absolute path and provider name of every mounted hook.
    pub fn paths(&self) -> impl Iterator<Item = (String, &'static str)> + '_ {
        self.routes
            .iter()
            .map(|(path, provider, _)| (join_path(&self.prefix, path), *provider))
    }

    /// Builds the router.
    ///
    /// # Panics
    ///
    /// Panics if two hooks are mounted at the same path.
    pub fn into_router(self) -> Router {
        let prefix = self.prefix;
        self.routes
            .into_iter()
            .fold(Router::new(), |router, (path, provider, route)| {
                let path = join_path(&prefix, &path);
                tracing::debug!(
                    target: TRACING_TARGET,
                    provider = provider,
                    path = %path,
                    "mounted webhook"
                );
                router.route(&path, route)
            })
            .fallback(not_found)
    }
}

impl Default for WebhookListener {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WebhookListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookListener")
            .field("prefix", &self.prefix)
            .field("paths", &self.paths().collect::<Vec<_>>())
            .finish()
    }
}

impl From<WebhookListener> for Router {
    fn from(listener: WebhookListener) -> Self {
        listener.into_router()
    }
}
