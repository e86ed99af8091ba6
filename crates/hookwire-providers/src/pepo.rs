//! Pepo video activity webhooks.
//!
//! Pepo sends one kind of delivery, `video/update`. Deliveries are signed
//! with HMAC-SHA256 over `{pepo-timestamp}.{pepo-version}.{body}` and the hex
//! digest is sent in `pepo-signature`.
//!
//! The signing scheme is not published by Pepo, so by default the signature
//! header is only required to be present. Enable the `pepo-verify` feature to
//! verify it.

use std::collections::HashMap;

use hookwire_core::{
    BodyKind, Delivery, Encoding, Enforcement, EventSource, Hook, Provider, ProviderSpec, Result,
    SignatureScheme, SignatureSpec, SignedMaterial,
};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr, VariantArray};

use crate::macros::json_payloads;

/// Header carrying the signature.
pub const SIGNATURE_HEADER: &str = "pepo-signature";

/// Header carrying the signing time in seconds since the Unix epoch.
pub const TIMESTAMP_HEADER: &str = "pepo-timestamp";

/// Header carrying the signature version.
pub const VERSION_HEADER: &str = "pepo-version";

/// Pepo event tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr, VariantArray)]
pub enum Event {
    #[strum(serialize = "video/update")]
    VideoUpdate,
}

/// A Pepo user referenced by an activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub user_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_id: Option<String>,
    pub approved_creator: bool,
    pub status: String,
    /// Last update, in seconds since the Unix epoch.
    pub uts: i64,
}

/// A Pepo video referenced by an activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Video {
    pub id: i64,
    pub creator_user_id: i64,
    pub status: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_image_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub link_ids: Vec<i64>,
    pub total_contributed_by: i64,
    pub total_amount_raised_in_wei: String,
    pub per_reply_amount_in_wei: String,
    /// Last update, in seconds since the Unix epoch.
    pub uts: i64,
}

/// The activity that triggered the delivery.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Activity {
    pub id: String,
    pub kind: String,
    pub status: String,
    pub video_id: i64,
    pub actor_id: i64,
    /// Time of the activity, in seconds since the Unix epoch.
    pub uts: i64,
}

/// The entities of a delivery.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityData {
    pub activity: Activity,
    /// Users referenced by the activity, keyed by user id.
    pub users: HashMap<String, User>,
    /// Videos referenced by the activity, keyed by video id.
    pub videos: HashMap<String, Video>,
}

/// Payload of the `video/update` event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoActivity {
    pub id: String,
    pub topic: String,
    /// Creation time, in seconds since the Unix epoch.
    pub created_at: i64,
    pub webhook_id: String,
    pub version: String,
    pub data: ActivityData,
}

json_payloads! {
    /// A decoded Pepo delivery.
    pub enum Payload for Event {
        VideoUpdate(VideoActivity),
    }
}

/// The Pepo provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pepo;

impl Provider for Pepo {
    type Event = Event;
    type Options = ();
    type Payload = Payload;

    const SPEC: ProviderSpec = ProviderSpec {
        name: "pepo",
        event: EventSource::Intrinsic("video/update"),
        signature: Some(SignatureSpec {
            header: SIGNATURE_HEADER,
            scheme: SignatureScheme::HmacSha256 {
                prefix: None,
                encoding: Encoding::Hex,
            },
            material: SignedMaterial::DottedHeaders(&[TIMESTAMP_HEADER, VERSION_HEADER]),
            enforcement: if cfg!(feature = "pepo-verify") {
                Enforcement::Verify
            } else {
                Enforcement::PresenceOnly
            },
        }),
        body: BodyKind::Json,
    };

    fn decode(event: Event, delivery: &Delivery) -> Result<Payload> {
        Payload::from_json(event, delivery)
    }
}

/// A hook receiving Pepo deliveries.
pub type PepoHook = Hook<Pepo>;

#[cfg(test)]
mod tests {
    use hookwire_core::{ErrorKind, Subscription};
    use http::Method;

    use super::*;
    use crate::testing::{SECRET, assert_round_trip, full_request, sign};

    const VIDEO_UPDATE: &[u8] = include_bytes!("../fixtures/pepo/video_update.json");
    const TIMESTAMP: &str = "1580283536";
    const VERSION: &str = "v2";

    fn signed_material(body: &[u8]) -> Vec<u8> {
        [TIMESTAMP.as_bytes(), b".", VERSION.as_bytes(), b".", body].concat()
    }

    fn hook() -> PepoHook {
        PepoHook::new().with_secret(SECRET)
    }

    #[tokio::test]
    async fn video_update_is_decoded() {
        let signature = sign::<Pepo>(&signed_material(VIDEO_UPDATE));
        let request = full_request(
            Method::POST,
            &[
                (SIGNATURE_HEADER, &signature),
                (TIMESTAMP_HEADER, TIMESTAMP),
                (VERSION_HEADER, VERSION),
            ],
            VIDEO_UPDATE,
        );

        let Payload::VideoUpdate(activity) =
            hook().parse(request, Subscription::none()).await.unwrap();

        assert_eq!(activity.topic, "video/update");
        assert_eq!(activity.data.activity.video_id, 2001);
        assert_eq!(activity.data.users["1000"].user_name, "jasonbourne");
        assert_eq!(activity.data.videos["2001"].creator_user_id, 1000);
        assert_round_trip(&activity);
    }

    #[tokio::test]
    async fn signature_header_is_required() {
        let request = full_request(
            Method::POST,
            &[(TIMESTAMP_HEADER, TIMESTAMP), (VERSION_HEADER, VERSION)],
            VIDEO_UPDATE,
        );

        let error = hook().parse(request, Event::VideoUpdate).await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::MissingSignatureHeader);
    }

    #[tokio::test]
    async fn signed_headers_are_required() {
        let signature = sign::<Pepo>(&signed_material(VIDEO_UPDATE));
        let request = full_request(
            Method::POST,
            &[(SIGNATURE_HEADER, &signature), (VERSION_HEADER, VERSION)],
            VIDEO_UPDATE,
        );

        let error = hook().parse(request, Event::VideoUpdate).await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::MissingSignatureHeader);
    }

    #[tokio::test]
    async fn body_signature_covers_headers() {
        // Signed over the body alone, without the dotted header prefix.
        let signature = sign::<Pepo>(VIDEO_UPDATE);
        let request = full_request(
            Method::POST,
            &[
                (SIGNATURE_HEADER, &signature),
                (TIMESTAMP_HEADER, TIMESTAMP),
                (VERSION_HEADER, VERSION),
            ],
            VIDEO_UPDATE,
        );

        let result = hook().parse(request, Event::VideoUpdate).await;
        if cfg!(feature = "pepo-verify") {
            assert_eq!(result.unwrap_err().kind, ErrorKind::SignatureMismatch);
        } else {
            assert!(result.is_ok());
        }
    }

    #[test]
    fn enforcement_follows_feature() {
        let signature = Pepo::SPEC.signature.unwrap();
        let expected = if cfg!(feature = "pepo-verify") {
            Enforcement::Verify
        } else {
            Enforcement::PresenceOnly
        };
        assert_eq!(signature.enforcement, expected);
        assert_eq!(
            signature.headers().collect::<Vec<_>>(),
            [SIGNATURE_HEADER, TIMESTAMP_HEADER, VERSION_HEADER]
        );
    }
}
