//! Bitbucket Cloud repository webhooks.
//!
//! Deliveries name their event in `X-Event-Key` and carry the id of the
//! sending webhook in `X-Hook-UUID`. When a secret is configured they are
//! signed with HMAC-SHA256 over the raw body, sent as `sha256=<hex>` in
//! `X-Hub-Signature`.

mod payload;

use hookwire_core::{
    BodyKind, Delivery, Encoding, Error, ErrorKind, EventSource, Hook, Provider, ProviderSpec,
    Result, SignatureScheme, SignatureSpec,
};
use http::HeaderMap;
use strum::{AsRefStr, Display, EnumString, IntoStaticStr, VariantArray};
use uuid::Uuid;

pub use self::payload::*;
use crate::macros::json_payloads;

/// Header naming the event of a delivery.
pub const EVENT_HEADER: &str = "X-Event-Key";

/// Header carrying the body signature.
pub const SIGNATURE_HEADER: &str = "X-Hub-Signature";

/// Header carrying the id of the sending webhook.
pub const HOOK_UUID_HEADER: &str = "X-Hook-UUID";

/// Header carrying the unique delivery id.
pub const REQUEST_UUID_HEADER: &str = "X-Request-UUID";

/// Bitbucket event tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr, VariantArray)]
pub enum Event {
    #[strum(serialize = "repo:push")]
    RepoPush,
    #[strum(serialize = "repo:fork")]
    RepoFork,
    #[strum(serialize = "repo:updated")]
    RepoUpdated,
    #[strum(serialize = "repo:commit_comment_created")]
    RepoCommitCommentCreated,
    #[strum(serialize = "repo:commit_status_created")]
    RepoCommitStatusCreated,
    #[strum(serialize = "repo:commit_status_updated")]
    RepoCommitStatusUpdated,
    #[strum(serialize = "issue:created")]
    IssueCreated,
    #[strum(serialize = "issue:updated")]
    IssueUpdated,
    #[strum(serialize = "issue:comment_created")]
    IssueCommentCreated,
    #[strum(serialize = "pullrequest:created")]
    PullRequestCreated,
    #[strum(serialize = "pullrequest:updated")]
    PullRequestUpdated,
    #[strum(serialize = "pullrequest:approved")]
    PullRequestApproved,
    #[strum(serialize = "pullrequest:unapproved")]
    PullRequestUnapproved,
    #[strum(serialize = "pullrequest:fulfilled")]
    PullRequestMerged,
    #[strum(serialize = "pullrequest:rejected")]
    PullRequestDeclined,
    #[strum(serialize = "pullrequest:comment_created")]
    PullRequestCommentCreated,
    #[strum(serialize = "pullrequest:comment_updated")]
    PullRequestCommentUpdated,
    #[strum(serialize = "pullrequest:comment_deleted")]
    PullRequestCommentDeleted,
}

json_payloads! {
    /// A decoded Bitbucket delivery.
    pub enum Payload for Event {
        RepoPush(RepoPush),
        RepoFork(RepoFork),
        RepoUpdated(RepoUpdated),
        RepoCommitCommentCreated(RepoCommitComment),
        RepoCommitStatusCreated(RepoCommitStatus),
        RepoCommitStatusUpdated(RepoCommitStatus),
        IssueCreated(IssueCreated),
        IssueUpdated(IssueUpdated),
        IssueCommentCreated(IssueCommentCreated),
        PullRequestCreated(PullRequestEvent),
        PullRequestUpdated(PullRequestEvent),
        PullRequestApproved(PullRequestApproval),
        PullRequestUnapproved(PullRequestApproval),
        PullRequestMerged(PullRequestEvent),
        PullRequestDeclined(PullRequestEvent),
        PullRequestCommentCreated(PullRequestComment),
        PullRequestCommentUpdated(PullRequestComment),
        PullRequestCommentDeleted(PullRequestComment),
    }
}

/// Bitbucket hook options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BitbucketOptions {
    /// When set, deliveries must come from the webhook with this id.
    pub uuid: Option<Uuid>,
}

impl BitbucketOptions {
    /// Requires deliveries to carry the given webhook id.
    pub fn with_uuid(uuid: Uuid) -> Self {
        Self { uuid: Some(uuid) }
    }
}

/// The Bitbucket Cloud provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bitbucket;

impl Provider for Bitbucket {
    type Event = Event;
    type Options = BitbucketOptions;
    type Payload = Payload;

    const SPEC: ProviderSpec = ProviderSpec {
        name: "bitbucket",
        event: EventSource::Header(EVENT_HEADER),
        signature: Some(SignatureSpec::body(
            SIGNATURE_HEADER,
            SignatureScheme::HmacSha256 {
                prefix: Some("sha256="),
                encoding: Encoding::Hex,
            },
        )),
        body: BodyKind::Json,
    };

    fn check_options(options: &BitbucketOptions, headers: &HeaderMap) -> Result<()> {
        let Some(expected) = options.uuid else {
            return Ok(());
        };

        let provided = headers
            .get(HOOK_UUID_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| Error::new(ErrorKind::MissingHookUuid))?;

        let provided = provided.trim().trim_start_matches('{').trim_end_matches('}');
        match Uuid::parse_str(provided) {
            Ok(uuid) if uuid == expected => Ok(()),
            _ => Err(Error::new(ErrorKind::HookUuidMismatch)),
        }
    }

    fn decode(event: Event, delivery: &Delivery) -> Result<Payload> {
        Payload::from_json(event, delivery)
    }
}

/// A hook receiving Bitbucket Cloud deliveries.
pub type BitbucketHook = Hook<Bitbucket>;

#[cfg(test)]
mod tests {
    use hookwire_core::EventKind;
    use http::Method;

    use super::*;
    use crate::testing::{
        SECRET, TrackedBody, assert_round_trip, drops, full_request, request, sign,
    };

    const HOOK_ID: &str = "e2a2a5d8-2b1c-4c7e-9a3f-3f5cbd4e1a77";

    const PUSH: &[u8] = include_bytes!("../../fixtures/bitbucket/repo_push.json");
    const PULL_REQUEST: &[u8] = include_bytes!("../../fixtures/bitbucket/pullrequest.json");
    const APPROVAL: &[u8] = include_bytes!("../../fixtures/bitbucket/pullrequest_approval.json");
    const PR_COMMENT: &[u8] = include_bytes!("../../fixtures/bitbucket/pullrequest_comment.json");
    const COMMIT_STATUS: &[u8] = include_bytes!("../../fixtures/bitbucket/repo_commit_status.json");

    const FIXTURES: &[(Event, &[u8])] = &[
        (Event::RepoPush, PUSH),
        (Event::RepoFork, include_bytes!("../../fixtures/bitbucket/repo_fork.json")),
        (Event::RepoUpdated, include_bytes!("../../fixtures/bitbucket/repo_updated.json")),
        (
            Event::RepoCommitCommentCreated,
            include_bytes!("../../fixtures/bitbucket/repo_commit_comment_created.json"),
        ),
        (Event::RepoCommitStatusCreated, COMMIT_STATUS),
        (Event::RepoCommitStatusUpdated, COMMIT_STATUS),
        (Event::IssueCreated, include_bytes!("../../fixtures/bitbucket/issue_created.json")),
        (Event::IssueUpdated, include_bytes!("../../fixtures/bitbucket/issue_updated.json")),
        (
            Event::IssueCommentCreated,
            include_bytes!("../../fixtures/bitbucket/issue_comment_created.json"),
        ),
        (Event::PullRequestCreated, PULL_REQUEST),
        (Event::PullRequestUpdated, PULL_REQUEST),
        (Event::PullRequestApproved, APPROVAL),
        (Event::PullRequestUnapproved, APPROVAL),
        (Event::PullRequestMerged, PULL_REQUEST),
        (Event::PullRequestDeclined, PULL_REQUEST),
        (Event::PullRequestCommentCreated, PR_COMMENT),
        (Event::PullRequestCommentUpdated, PR_COMMENT),
        (Event::PullRequestCommentDeleted, PR_COMMENT),
    ];

    fn hook() -> BitbucketHook {
        let uuid = Uuid::parse_str(HOOK_ID).unwrap();
        BitbucketHook::new()
            .with_secret(SECRET)
            .with_options(BitbucketOptions::with_uuid(uuid))
    }

    #[test]
    fn event_tags() {
        assert_eq!(Event::VARIANTS.len(), 18);
        assert_eq!(Event::PullRequestMerged.tag(), "pullrequest:fulfilled");
        assert_eq!(Event::from_tag("repo:push"), Some(Event::RepoPush));
        assert_eq!(Event::from_tag("repo:transfer"), None);
    }

    #[tokio::test]
    async fn every_fixture_decodes_to_its_event() {
        assert_eq!(FIXTURES.len(), Event::VARIANTS.len());

        for (event, body) in FIXTURES {
            let signature = sign::<Bitbucket>(body);
            let request = full_request(
                Method::POST,
                &[
                    (EVENT_HEADER, event.tag()),
                    (SIGNATURE_HEADER, &signature),
                    (HOOK_UUID_HEADER, HOOK_ID),
                    (REQUEST_UUID_HEADER, "afe7d5a8-6b0e-4d3c-8bb2-51d9d8b6c0a1"),
                ],
                body,
            );

            let payload = hook().parse(request, *event).await.unwrap();
            assert_eq!(payload.event(), *event);
        }
    }

    #[tokio::test]
    async fn push_is_decoded() {
        let signature = sign::<Bitbucket>(PUSH);
        let request = full_request(
            Method::POST,
            &[
                (EVENT_HEADER, "repo:push"),
                (SIGNATURE_HEADER, &signature),
                (HOOK_UUID_HEADER, HOOK_ID),
            ],
            PUSH,
        );

        let Payload::RepoPush(push) = hook().parse(request, Event::RepoPush).await.unwrap() else {
            panic!("expected a push payload");
        };

        let change = &push.push.changes[0];
        assert_eq!(change.new.as_ref().unwrap().name, "master");
        assert_eq!(change.commits.len(), 1);
        assert_eq!(push.repository.full_name, "team_name/repo_name");
        assert_round_trip(&push);
    }

    #[tokio::test]
    async fn missing_hook_uuid() {
        let signature = sign::<Bitbucket>(PUSH);
        let (body, counter) = TrackedBody::new(PUSH);
        let request = request(
            Method::POST,
            &[(EVENT_HEADER, "repo:push"), (SIGNATURE_HEADER, &signature)],
            body,
        );

        let error = hook().parse(request, Event::RepoPush).await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::MissingHookUuid);
        assert_eq!(drops(&counter), 1);
    }

    #[tokio::test]
    async fn mismatched_hook_uuid() {
        let signature = sign::<Bitbucket>(PUSH);
        for provided in ["3b0b4b1a-0d8e-4f4c-9f3e-1c2b3a4d5e6f", "not-a-uuid"] {
            let request = full_request(
                Method::POST,
                &[
                    (EVENT_HEADER, "repo:push"),
                    (SIGNATURE_HEADER, &signature),
                    (HOOK_UUID_HEADER, provided),
                ],
                PUSH,
            );

            let error = hook().parse(request, Event::RepoPush).await.unwrap_err();
            assert_eq!(error.kind, ErrorKind::HookUuidMismatch);
        }
    }

    #[tokio::test]
    async fn braced_hook_uuid_is_accepted() {
        let signature = sign::<Bitbucket>(PUSH);
        let braced = format!("{{{HOOK_ID}}}");
        let request = full_request(
            Method::POST,
            &[
                (EVENT_HEADER, "repo:push"),
                (SIGNATURE_HEADER, &signature),
                (HOOK_UUID_HEADER, &braced),
            ],
            PUSH,
        );

        assert!(hook().parse(request, Event::RepoPush).await.is_ok());
    }

    #[tokio::test]
    async fn hook_uuid_is_optional_without_options() {
        let signature = sign::<Bitbucket>(PUSH);
        let request = full_request(
            Method::POST,
            &[(EVENT_HEADER, "repo:push"), (SIGNATURE_HEADER, &signature)],
            PUSH,
        );

        let hook = BitbucketHook::new().with_secret(SECRET);
        assert!(hook.parse(request, Event::RepoPush).await.is_ok());
    }

    #[tokio::test]
    async fn sha1_style_signature_is_rejected() {
        let request = full_request(
            Method::POST,
            &[
                (EVENT_HEADER, "repo:push"),
                (SIGNATURE_HEADER, "sha1=0d1a26e67d8f5eaf1f6ba5c57fc3c7d91ac0fd1c"),
                (HOOK_UUID_HEADER, HOOK_ID),
            ],
            PUSH,
        );

        let error = hook().parse(request, Event::RepoPush).await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::SignatureMismatch);
    }
}
