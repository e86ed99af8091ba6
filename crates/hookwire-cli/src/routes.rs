//! Mounts every provider and logs accepted deliveries.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use hookwire_core::{EventKind, Provider, Result};
use hookwire_providers::{
    Bitbucket, BitbucketOptions, DockerHub, GitHub, GitLab, Gogs, GoogleCalendar, Leanix, Pepo,
    bitbucket, docker_hub, github, gitlab, gogs, google_calendar, leanix, pepo,
};
use hookwire_server::middleware::{RouterObservabilityExt, RouterRecoveryExt};
use hookwire_server::{ErrorResponse, WebhookHandler, WebhookListener};
use serde::Serialize;

use crate::TRACING_TARGET_DELIVERY;
use crate::config::{HooksConfig, MiddlewareConfig, subscription};

/// Body of the response to an accepted delivery.
#[derive(Debug, Serialize)]
struct Accepted {
    status: &'static str,
}

/// Creates a handler that logs the outcome of each delivery.
///
/// `event_of` names the event of a decoded payload.
fn receiver<P: Provider>(event_of: fn(&P::Payload) -> P::Event) -> impl WebhookHandler<P> {
    move |result: Result<P::Payload>| {
        let response = respond::<P>(result.map(|payload| event_of(&payload)));
        async move { response }
    }
}

fn respond<P: Provider>(outcome: Result<P::Event>) -> Response {
    match outcome {
        Ok(event) => {
            tracing::info!(
                target: TRACING_TARGET_DELIVERY,
                provider = P::SPEC.name,
                event = event.tag(),
                "delivery accepted"
            );

            (StatusCode::OK, Json(Accepted { status: "accepted" })).into_response()
        }
        Err(error) => {
            tracing::warn!(
                target: TRACING_TARGET_DELIVERY,
                provider = P::SPEC.name,
                kind = %error.kind,
                error = %error,
                "delivery rejected"
            );

            ErrorResponse::from(error).into_response()
        }
    }
}

/// Mounts one hook per provider under the configured prefix.
pub fn create_listener(config: &HooksConfig) -> anyhow::Result<WebhookListener> {
    let bitbucket_options = BitbucketOptions {
        uuid: config.bitbucket_hook_uuid,
    };

    let listener = WebhookListener::new()
        .with_prefix(config.path_prefix.as_str())
        .hook(
            "/github",
            config.hook::<GitHub>(config.github_secret.as_ref()),
            subscription::<GitHub>("GITHUB_EVENTS", &config.github_events)?,
            receiver::<GitHub>(github::Payload::event),
        )
        .hook(
            "/gogs",
            config.hook::<Gogs>(config.gogs_secret.as_ref()),
            subscription::<Gogs>("GOGS_EVENTS", &config.gogs_events)?,
            receiver::<Gogs>(gogs::Payload::event),
        )
        .hook(
            "/bitbucket",
            config
                .hook::<Bitbucket>(config.bitbucket_secret.as_ref())
                .with_options(bitbucket_options),
            subscription::<Bitbucket>("BITBUCKET_EVENTS", &config.bitbucket_events)?,
            receiver::<Bitbucket>(bitbucket::Payload::event),
        )
        .hook(
            "/gitlab",
            config.hook::<GitLab>(config.gitlab_secret.as_ref()),
            subscription::<GitLab>("GITLAB_EVENTS", &config.gitlab_events)?,
            receiver::<GitLab>(gitlab::Payload::event),
        )
        .hook(
            "/docker-hub",
            config.hook::<DockerHub>(None),
            docker_hub::Event::Build,
            receiver::<DockerHub>(docker_hub::Payload::event),
        )
        .hook(
            "/google-calendar",
            config.hook::<GoogleCalendar>(config.google_calendar_secret.as_ref()),
            subscription::<GoogleCalendar>(
                "GOOGLE_CALENDAR_EVENTS",
                &config.google_calendar_events,
            )?,
            receiver::<GoogleCalendar>(google_calendar::Payload::event),
        )
        .hook(
            "/pepo",
            config.hook::<Pepo>(config.pepo_secret.as_ref()),
            pepo::Event::VideoUpdate,
            receiver::<Pepo>(pepo::Payload::event),
        )
        .hook(
            "/leanix",
            config.hook::<Leanix>(config.leanix_secret.as_ref()),
            subscription::<Leanix>("LEANIX_EVENTS", &config.leanix_events)?,
            receiver::<Leanix>(leanix::Payload::event),
        );

    Ok(listener)
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Recovery (outermost) - timeouts and panics
/// 2. Observability - request ids and tracing spans
/// 3. Hooks (innermost)
pub fn create_router(hooks: &HooksConfig, middleware: &MiddlewareConfig) -> anyhow::Result<Router> {
    let router = create_listener(hooks)?
        .into_router()
        .with_observability()
        .with_recovery(&middleware.recovery);

    Ok(router)
}
