//! Gogs repository webhooks.
//!
//! Deliveries name their event in `X-Gogs-Event` and are signed with
//! HMAC-SHA256 over the raw body, sent as bare lowercase hex in
//! `X-Gogs-Signature`.

mod payload;

use hookwire_core::{
    BodyKind, Delivery, Encoding, EventSource, Hook, Provider, ProviderSpec, Result,
    SignatureScheme, SignatureSpec,
};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr, VariantArray};

pub use self::payload::*;
use crate::macros::json_payloads;

/// Header naming the event of a delivery.
pub const EVENT_HEADER: &str = "X-Gogs-Event";

/// Header carrying the body signature.
pub const SIGNATURE_HEADER: &str = "X-Gogs-Signature";

/// Header carrying the unique delivery id.
pub const DELIVERY_HEADER: &str = "X-Gogs-Delivery";

/// Gogs event tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr, VariantArray)]
#[strum(serialize_all = "snake_case")]
pub enum Event {
    Create,
    Delete,
    Fork,
    Push,
    Issues,
    IssueComment,
    PullRequest,
    Release,
}

json_payloads! {
    /// A decoded Gogs delivery.
    pub enum Payload for Event {
        Create(Create),
        Delete(Delete),
        Fork(Fork),
        Push(Push),
        Issues(Issues),
        IssueComment(IssueComment),
        PullRequest(PullRequest),
        Release(Release),
    }
}

/// The Gogs provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gogs;

impl Provider for Gogs {
    type Event = Event;
    type Options = ();
    type Payload = Payload;

    const SPEC: ProviderSpec = ProviderSpec {
        name: "gogs",
        event: EventSource::Header(EVENT_HEADER),
        signature: Some(SignatureSpec::body(
            SIGNATURE_HEADER,
            SignatureScheme::HmacSha256 {
                prefix: None,
                encoding: Encoding::Hex,
            },
        )),
        body: BodyKind::Json,
    };

    fn decode(event: Event, delivery: &Delivery) -> Result<Payload> {
        Payload::from_json(event, delivery)
    }
}

/// A hook receiving Gogs deliveries.
pub type GogsHook = Hook<Gogs>;
