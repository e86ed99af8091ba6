//! GitLab project and group webhooks.
//!
//! Deliveries name their event in `X-Gitlab-Event`. GitLab does not sign
//! payloads; the configured secret token is echoed back verbatim in
//! `X-Gitlab-Token` and compared as a shared token.

mod payload;

use hookwire_core::{
    BodyKind, Delivery, EventSource, Hook, Provider, ProviderSpec, Result, SignatureScheme,
    SignatureSpec,
};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr, VariantArray};

pub use self::payload::*;
use crate::macros::json_payloads;

/// Header naming the event of a delivery.
pub const EVENT_HEADER: &str = "X-Gitlab-Event";

/// Header carrying the secret token.
pub const TOKEN_HEADER: &str = "X-Gitlab-Token";

/// GitLab event tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr, VariantArray)]
pub enum Event {
    #[strum(serialize = "Push Hook")]
    Push,
    #[strum(serialize = "Tag Push Hook")]
    TagPush,
    #[strum(serialize = "Issue Hook")]
    Issue,
    #[strum(serialize = "Confidential Issue Hook")]
    ConfidentialIssue,
    #[strum(serialize = "Note Hook")]
    Note,
    #[strum(serialize = "Confidential Note Hook")]
    ConfidentialNote,
    #[strum(serialize = "Merge Request Hook")]
    MergeRequest,
    #[strum(serialize = "Wiki Page Hook")]
    WikiPage,
    #[strum(serialize = "Pipeline Hook")]
    Pipeline,
    /// Older GitLab releases send `Build Hook`.
    #[strum(to_string = "Job Hook", serialize = "Build Hook")]
    Job,
    #[strum(serialize = "Release Hook")]
    Release,
}

json_payloads! {
    /// A decoded GitLab delivery.
    pub enum Payload for Event {
        Push(Push),
        TagPush(Push),
        Issue(Issue),
        ConfidentialIssue(Issue),
        Note(Note),
        ConfidentialNote(Note),
        MergeRequest(MergeRequest),
        WikiPage(WikiPage),
        Pipeline(Pipeline),
        Job(Job),
        Release(Release),
    }
}

/// The GitLab provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitLab;

impl Provider for GitLab {
    type Event = Event;
    type Options = ();
    type Payload = Payload;

    const SPEC: ProviderSpec = ProviderSpec {
        name: "gitlab",
        event: EventSource::Header(EVENT_HEADER),
        signature: Some(SignatureSpec::body(TOKEN_HEADER, SignatureScheme::Token)),
        body: BodyKind::Json,
    };

    fn decode(event: Event, delivery: &Delivery) -> Result<Payload> {
        Payload::from_json(event, delivery)
    }
}

/// A hook receiving GitLab deliveries.
pub type GitLabHook = Hook<GitLab>;
