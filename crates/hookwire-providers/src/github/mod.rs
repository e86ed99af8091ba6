//! GitHub repository webhooks.
//!
//! Deliveries name their event in `X-GitHub-Event` and are signed with
//! HMAC-SHA1 over the raw body, sent as `sha1=<hex>` in `X-Hub-Signature`.

mod payload;

use hookwire_core::{
    BodyKind, Delivery, Encoding, EventSource, Hook, Provider, ProviderSpec, Result,
    SignatureScheme, SignatureSpec,
};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr, VariantArray};

pub use self::payload::*;
use crate::macros::json_payloads;

/// Header naming the event of a delivery.
pub const EVENT_HEADER: &str = "X-GitHub-Event";

/// Header carrying the body signature.
pub const SIGNATURE_HEADER: &str = "X-Hub-Signature";

/// Header carrying the unique delivery id.
pub const DELIVERY_HEADER: &str = "X-GitHub-Delivery";

/// GitHub event tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr, VariantArray)]
#[strum(serialize_all = "snake_case")]
pub enum Event {
    Ping,
    Push,
    Create,
    Delete,
    Fork,
    Issues,
    IssueComment,
    PullRequest,
    PullRequestReview,
    Release,
    Watch,
    Status,
}

json_payloads! {
    /// A decoded GitHub delivery.
    pub enum Payload for Event {
        Ping(Ping),
        Push(Push),
        Create(Create),
        Delete(Delete),
        Fork(Fork),
        Issues(Issues),
        IssueComment(IssueComment),
        PullRequest(PullRequest),
        PullRequestReview(PullRequestReview),
        Release(Release),
        Watch(Watch),
        Status(Status),
    }
}

/// The GitHub provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitHub;

impl Provider for GitHub {
    type Event = Event;
    type Options = ();
    type Payload = Payload;

    const SPEC: ProviderSpec = ProviderSpec {
        name: "github",
        event: EventSource::Header(EVENT_HEADER),
        signature: Some(SignatureSpec::body(
            SIGNATURE_HEADER,
            SignatureScheme::HmacSha1 {
                prefix: Some("sha1="),
                encoding: Encoding::Hex,
            },
        )),
        body: BodyKind::Json,
    };

    fn decode(event: Event, delivery: &Delivery) -> Result<Payload> {
        Payload::from_json(event, delivery)
    }
}

/// A hook receiving GitHub deliveries.
pub type GitHubHook = Hook<GitHub>;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use hookwire_core::{ErrorKind, EventKind, Subscription};
    use http::Method;
    use tokio::task::JoinSet;

    use super::*;
    use crate::testing::{
        SECRET, TrackedBody, assert_round_trip, drops, full_request, request, sign,
    };

    const PUSH: &[u8] = include_bytes!("../../fixtures/github/push.json");

    const FIXTURES: &[(Event, &[u8])] = &[
        (Event::Ping, include_bytes!("../../fixtures/github/ping.json")),
        (Event::Push, PUSH),
        (Event::Create, include_bytes!("../../fixtures/github/create.json")),
        (Event::Delete, include_bytes!("../../fixtures/github/delete.json")),
        (Event::Fork, include_bytes!("../../fixtures/github/fork.json")),
        (Event::Issues, include_bytes!("../../fixtures/github/issues.json")),
        (Event::IssueComment, include_bytes!("../../fixtures/github/issue_comment.json")),
        (Event::PullRequest, include_bytes!("../../fixtures/github/pull_request.json")),
        (
            Event::PullRequestReview,
            include_bytes!("../../fixtures/github/pull_request_review.json"),
        ),
        (Event::Release, include_bytes!("../../fixtures/github/release.json")),
        (Event::Watch, include_bytes!("../../fixtures/github/watch.json")),
        (Event::Status, include_bytes!("../../fixtures/github/status.json")),
    ];

    fn hook() -> GitHubHook {
        GitHubHook::new().with_secret(SECRET)
    }

    async fn deliver(event: Event, body: &[u8]) -> Result<Payload> {
        let signature = sign::<GitHub>(body);
        let request = full_request(
            Method::POST,
            &[
                (EVENT_HEADER, event.tag()),
                (SIGNATURE_HEADER, &signature),
                (DELIVERY_HEADER, "72d3162e-cc78-11e3-81ab-4c9367dc0958"),
            ],
            body,
        );

        hook().parse(request, event).await
    }

    #[test]
    fn every_event_has_a_fixture() {
        assert_eq!(FIXTURES.len(), Event::VARIANTS.len());
        for event in Event::VARIANTS {
            assert!(FIXTURES.iter().any(|(e, _)| e == event), "{event}");
        }
    }

    #[tokio::test]
    async fn push_is_decoded() {
        let payload = deliver(Event::Push, PUSH).await.unwrap();
        let Payload::Push(push) = payload else {
            panic!("expected a push payload, got {payload:?}");
        };

        assert_eq!(push.git_ref, "refs/heads/changes");
        assert_eq!(push.commits.len(), 1);
        assert_eq!(push.repository.full_name, "baxterthehacker/public-repo");
        assert_eq!(push.pusher.name, "baxterthehacker");
        assert!(push.base_ref.is_none());
    }

    #[tokio::test]
    async fn null_emails_are_decoded() {
        let mut value: serde_json::Value = serde_json::from_slice(PUSH).unwrap();
        value["pusher"]["email"] = serde_json::Value::Null;
        value["commits"][0]["author"]["email"] = serde_json::Value::Null;
        value["commits"][0]["committer"]["email"] = serde_json::Value::Null;
        let body = serde_json::to_vec(&value).unwrap();

        let Payload::Push(push) = deliver(Event::Push, &body).await.unwrap() else {
            panic!("expected a push payload");
        };

        assert_eq!(push.pusher.name, "baxterthehacker");
        assert!(push.pusher.email.is_none());
        assert!(push.commits[0].author.email.is_none());
        assert!(push.commits[0].committer.email.is_none());
        assert_round_trip(&push);
    }

    #[tokio::test]
    async fn null_master_branch_is_decoded() {
        let body = include_bytes!("../../fixtures/github/create.json");
        let mut value: serde_json::Value = serde_json::from_slice(body).unwrap();
        value["master_branch"] = serde_json::Value::Null;
        let body = serde_json::to_vec(&value).unwrap();

        let Payload::Create(create) = deliver(Event::Create, &body).await.unwrap() else {
            panic!("expected a create payload");
        };

        assert_eq!(create.ref_type, "tag");
        assert!(create.master_branch.is_none());
    }

    #[tokio::test]
    async fn every_fixture_decodes_to_its_event() {
        for (event, body) in FIXTURES {
            let payload = deliver(*event, body).await.unwrap();
            assert_eq!(payload.event(), *event);
        }
    }

    #[tokio::test]
    async fn wildcard_subscription_accepts_known_events() {
        let signature = sign::<GitHub>(PUSH);
        let request = full_request(
            Method::POST,
            &[(EVENT_HEADER, "push"), (SIGNATURE_HEADER, &signature)],
            PUSH,
        );

        let payload = hook().parse(request, Subscription::all()).await.unwrap();
        assert_eq!(payload.event(), Event::Push);
    }

    #[tokio::test]
    async fn unprefixed_signature_is_rejected() {
        let signature = sign::<GitHub>(PUSH);
        let request = full_request(
            Method::POST,
            &[
                (EVENT_HEADER, "push"),
                (SIGNATURE_HEADER, signature.trim_start_matches("sha1=")),
            ],
            PUSH,
        );

        let error = hook().parse(request, Event::Push).await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::SignatureMismatch);
    }

    #[tokio::test]
    async fn missing_signature_header() {
        let request = full_request(Method::POST, &[(EVENT_HEADER, "push")], PUSH);
        let error = hook().parse(request, Event::Push).await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::MissingSignatureHeader);
    }

    #[tokio::test]
    async fn mismatched_schema_is_parse_error() {
        let body = br#"{"ref": ["not", "a", "string"]}"#;
        let error = deliver(Event::Push, body).await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::ParseError);
    }

    #[tokio::test]
    async fn body_is_released_after_success() {
        let signature = sign::<GitHub>(PUSH);
        let (body, counter) = TrackedBody::new(PUSH);
        let request = request(
            Method::POST,
            &[(EVENT_HEADER, "push"), (SIGNATURE_HEADER, &signature)],
            body,
        );

        assert!(hook().parse(request, Event::Push).await.is_ok());
        assert_eq!(drops(&counter), 1);
    }

    #[tokio::test]
    async fn push_round_trips() {
        let Payload::Push(push) = deliver(Event::Push, PUSH).await.unwrap() else {
            panic!("expected a push payload");
        };

        assert_round_trip(&push);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_parses_match_serial() {
        let hook = Arc::new(hook());

        let mut serial = Vec::new();
        for (event, body) in FIXTURES {
            serial.push(deliver(*event, body).await.unwrap());
        }

        let mut tasks = JoinSet::new();
        for (index, (event, body)) in FIXTURES.iter().enumerate() {
            let hook = Arc::clone(&hook);
            let (event, body) = (*event, *body);
            tasks.spawn(async move {
                let signature = sign::<GitHub>(body);
                let request = full_request(
                    Method::POST,
                    &[(EVENT_HEADER, event.tag()), (SIGNATURE_HEADER, &signature)],
                    body,
                );
                (index, hook.parse(request, event).await.unwrap())
            });
        }

        let mut concurrent = Vec::new();
        while let Some(result) = tasks.join_next().await {
            concurrent.push(result.unwrap());
        }
        concurrent.sort_by_key(|(index, _)| *index);

        let concurrent: Vec<_> = concurrent.into_iter().map(|(_, payload)| payload).collect();
        assert_eq!(concurrent, serial);
    }
}
