//! The generic parse engine.

use std::fmt;
use std::marker::PhantomData;

use bytes::{Bytes, BytesMut};
use http::{Method, Request};
use http_body::Body;

use crate::delivery::{DEFAULT_BODY_LIMIT, header_str, read_body};
use crate::spec::{BodyKind, Enforcement, EventSource, SignedMaterial};
use crate::{
    BoxedError, Delivery, Error, ErrorKind, Provider, Result, Secret, Selection, Subscription,
};

/// Tracing target for hook parsing.
pub const TRACING_TARGET: &str = "hookwire_core::hook";

/// A configured receiver for one provider.
///
/// A hook is created once and shared; [`Hook::parse`] only reads the
/// configuration, so any number of parses may run concurrently on it.
pub struct Hook<P: Provider> {
    secret: Option<Secret>,
    options: P::Options,
    body_limit: usize,
    _provider: PhantomData<fn() -> P>,
}

impl<P: Provider> Hook<P> {
    /// Creates a hook without a secret; signatures are not checked.
    pub fn new() -> Self {
        Self {
            secret: None,
            options: P::Options::default(),
            body_limit: DEFAULT_BODY_LIMIT,
            _provider: PhantomData,
        }
    }

    /// Sets the shared secret used to authenticate deliveries.
    pub fn with_secret(mut self, secret: impl Into<Secret>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// Sets the provider-specific options.
    pub fn with_options(mut self, options: P::Options) -> Self {
        self.options = options;
        self
    }

    /// Sets the maximum accepted body size in bytes.
    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    /// Returns `true` if a secret is configured.
    #[must_use]
    pub fn has_secret(&self) -> bool {
        self.secret.is_some()
    }

    /// Returns the provider-specific options.
    pub fn options(&self) -> &P::Options {
        &self.options
    }

    /// Returns the provider's static descriptor.
    pub fn spec(&self) -> &'static crate::ProviderSpec {
        &P::SPEC
    }

    /// Validates, authenticates and decodes a delivery.
    ///
    /// The request is consumed; its body is released before this returns on
    /// every path, including failures.
    pub async fn parse<B>(
        &self,
        request: Request<B>,
        subscription: impl Into<Subscription<P::Event>>,
    ) -> Result<P::Payload>
    where
        B: Body,
        B::Error: Into<BoxedError>,
    {
        let subscription = subscription.into();
        let result = self.run(request, &subscription).await;

        match &result {
            Ok(_) => tracing::debug!(
                target: TRACING_TARGET,
                provider = P::SPEC.name,
                subscription = %subscription,
                "delivery accepted"
            ),
            Err(error) => tracing::debug!(
                target: TRACING_TARGET,
                provider = P::SPEC.name,
                kind = %error.kind,
                "delivery rejected"
            ),
        }

        result
    }

    async fn run<B>(
        &self,
        request: Request<B>,
        subscription: &Subscription<P::Event>,
    ) -> Result<P::Payload>
    where
        B: Body,
        B::Error: Into<BoxedError>,
    {
        let spec = &P::SPEC;
        let (parts, body) = request.into_parts();

        if parts.method != Method::POST {
            drop(body);
            return Err(
                Error::new(ErrorKind::InvalidMethod)
                    .with_message(format!("expected POST, got {}", parts.method)),
            );
        }

        let selection = match spec.event {
            EventSource::Header(name) => {
                let raw = header_str(&parts.headers, name).ok_or_else(|| {
                    Error::new(ErrorKind::MissingEventHeader).with_message(name)
                })?;
                Some(Selection::select(raw))
            }
            EventSource::Intrinsic(tag) => Some(Selection::select(tag)),
            EventSource::BodyField(_) => None,
        };

        if spec.event.requires_subscription() && subscription.is_empty() {
            return Err(Error::new(ErrorKind::NoEventSpecified));
        }

        if let Some(selection) = &selection {
            ensure_subscribed(subscription, selection)?;
        }

        P::check_options(&self.options, &parts.headers)?;

        let body = match spec.body {
            BodyKind::Json => read_body(body, self.body_limit).await?,
            BodyKind::Ignored => {
                drop(body);
                Bytes::new()
            }
        };

        tracing::trace!(
            target: TRACING_TARGET,
            provider = spec.name,
            body_len = body.len(),
            "delivery body read"
        );

        let delivery = Delivery::new(parts.headers, body);
        self.verify(&delivery)?;

        let selection = match (selection, spec.event) {
            (Some(selection), _) => selection,
            (None, EventSource::BodyField(field)) => {
                let raw = delivery.json_field(field)?.ok_or_else(|| {
                    Error::new(ErrorKind::MissingEventHeader).with_message(field)
                })?;
                let selection = Selection::select(&raw);
                ensure_subscribed(subscription, &selection)?;
                selection
            }
            (None, _) => return Err(Error::new(ErrorKind::MissingEventHeader)),
        };

        let event = match selection {
            Selection::Known(event) => event,
            Selection::Unrecognized(tag) => {
                return Err(Error::parse(format!(
                    "event '{tag}' is not recognized by {}",
                    spec.name
                )));
            }
        };

        tracing::trace!(
            target: TRACING_TARGET,
            provider = spec.name,
            event = crate::EventKind::tag(event),
            "decoding payload"
        );

        P::decode(event, &delivery)
    }

    /// Checks the delivery's signature if a secret is configured.
    fn verify(&self, delivery: &Delivery) -> Result<()> {
        let (Some(secret), Some(signature)) = (&self.secret, &P::SPEC.signature) else {
            return Ok(());
        };

        let provided = delivery.header(signature.header).ok_or_else(|| {
            Error::new(ErrorKind::MissingSignatureHeader).with_message(signature.header)
        })?;

        let material = match signature.material {
            SignedMaterial::Body => delivery.body().clone(),
            SignedMaterial::DottedHeaders(names) => {
                let mut material = BytesMut::new();
                for name in names {
                    let value = delivery.header(name).ok_or_else(|| {
                        Error::new(ErrorKind::MissingSignatureHeader).with_message(*name)
                    })?;
                    material.extend_from_slice(value.as_bytes());
                    material.extend_from_slice(b".");
                }
                material.extend_from_slice(delivery.body());
                material.freeze()
            }
        };

        match signature.enforcement {
            Enforcement::Verify => signature.scheme.verify(secret, &material, provided),
            Enforcement::PresenceOnly => Ok(()),
        }
    }
}

/// Rejects a selection that is not part of a non-empty subscription.
fn ensure_subscribed<E: crate::EventKind>(
    subscription: &Subscription<E>,
    selection: &Selection<E>,
) -> Result<()> {
    if subscription.is_empty() || subscription.accepts(selection) {
        return Ok(());
    }

    Err(Error::new(ErrorKind::EventNotSubscribed).with_message(selection.as_str().to_owned()))
}

impl<P: Provider> Default for Hook<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Provider> Clone for Hook<P> {
    fn clone(&self) -> Self {
        Self {
            secret: self.secret.clone(),
            options: self.options.clone(),
            body_limit: self.body_limit,
            _provider: PhantomData,
        }
    }
}

impl<P: Provider> fmt::Debug for Hook<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook")
            .field("provider", &P::SPEC.name)
            .field("secret", &self.secret)
            .field("options", &self.options)
            .field("body_limit", &self.body_limit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::pin::Pin;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::task::{Context, Poll};

    use http::HeaderMap;
    use http_body::Frame;
    use http_body_util::Full;
    use serde::Deserialize;
    use strum::{EnumString, IntoStaticStr, VariantArray};

    use super::*;
    use crate::ProviderSpec;
    use crate::signature::{Encoding, SignatureScheme};
    use crate::spec::SignatureSpec;

    const SECRET: &str = "IsWishesWereHorsesWedAllBeEatingSteak!";

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[derive(EnumString, IntoStaticStr, VariantArray)]
    #[strum(serialize_all = "snake_case")]
    enum Event {
        Push,
        Create,
    }

    #[derive(Debug, Default, PartialEq, Deserialize)]
    #[serde(default)]
    struct Push {
        #[serde(rename = "ref")]
        git_ref: String,
    }

    #[derive(Debug, Default, PartialEq, Deserialize)]
    #[serde(default)]
    struct Create {
        ref_type: String,
    }

    #[derive(Debug, PartialEq)]
    enum Payload {
        Push(Push),
        Create(Create),
    }

    /// Header-selected, body-signed JSON provider.
    struct Forge;

    impl Provider for Forge {
        type Event = Event;
        type Payload = Payload;
        type Options = ();

        const SPEC: ProviderSpec = ProviderSpec {
            name: "forge",
            event: EventSource::Header("X-Forge-Event"),
            signature: Some(SignatureSpec::body(
                "X-Forge-Signature",
                SignatureScheme::HmacSha256 {
                    prefix: Some("sha256="),
                    encoding: Encoding::Hex,
                },
            )),
            body: BodyKind::Json,
        };

        fn decode(event: Event, delivery: &Delivery) -> Result<Payload> {
            match event {
                Event::Push => delivery.json().map(Payload::Push),
                Event::Create => delivery.json().map(Payload::Create),
            }
        }
    }

    /// Provider whose event tag lives in the body.
    struct Ledger;

    impl Provider for Ledger {
        type Event = Event;
        type Payload = Payload;
        type Options = ();

        const SPEC: ProviderSpec = ProviderSpec {
            name: "ledger",
            event: EventSource::BodyField("kind"),
            signature: Some(SignatureSpec::body(
                "X-Ledger-Signature",
                SignatureScheme::HmacSha256 {
                    prefix: None,
                    encoding: Encoding::Base64,
                },
            )),
            body: BodyKind::Json,
        };

        fn decode(event: Event, delivery: &Delivery) -> Result<Payload> {
            Forge::decode(event, delivery)
        }
    }

    /// Single-event provider signed over dotted headers, checked for presence only.
    struct Relay;

    impl Provider for Relay {
        type Event = Event;
        type Payload = Payload;
        type Options = ();

        const SPEC: ProviderSpec = ProviderSpec {
            name: "relay",
            event: EventSource::Intrinsic("push"),
            signature: Some(SignatureSpec {
                header: "x-relay-signature",
                scheme: SignatureScheme::HmacSha256 {
                    prefix: None,
                    encoding: Encoding::Hex,
                },
                material: SignedMaterial::DottedHeaders(&["x-relay-timestamp"]),
                enforcement: Enforcement::PresenceOnly,
            }),
            body: BodyKind::Json,
        };

        fn decode(event: Event, delivery: &Delivery) -> Result<Payload> {
            Forge::decode(event, delivery)
        }
    }

    /// Header-only provider.
    struct Beacon;

    impl Provider for Beacon {
        type Event = Event;
        type Payload = String;
        type Options = ();

        const SPEC: ProviderSpec = ProviderSpec {
            name: "beacon",
            event: EventSource::Header("x-beacon-state"),
            signature: Some(SignatureSpec::body("x-beacon-token", SignatureScheme::Token)),
            body: BodyKind::Ignored,
        };

        fn decode(_event: Event, delivery: &Delivery) -> Result<String> {
            delivery.require_header("x-beacon-id").map(str::to_owned)
        }
    }

    /// Body that counts how often it is dropped.
    struct TrackedBody {
        inner: Full<Bytes>,
        drops: Arc<AtomicUsize>,
    }

    impl TrackedBody {
        fn new(bytes: &'static [u8], drops: &Arc<AtomicUsize>) -> Self {
            Self {
                inner: Full::new(Bytes::from_static(bytes)),
                drops: Arc::clone(drops),
            }
        }
    }

    impl Body for TrackedBody {
        type Data = Bytes;
        type Error = std::convert::Infallible;

        fn poll_frame(
            self: Pin<&mut Self>,
            cx: &mut Context<'_>,
        ) -> Poll<Option<std::result::Result<Frame<Bytes>, Self::Error>>> {
            Pin::new(&mut self.get_mut().inner).poll_frame(cx)
        }
    }

    impl Drop for TrackedBody {
        fn drop(&mut self) {
            self.drops.fetch_add(1, Ordering::SeqCst);
        }
    }

    const PUSH_BODY: &[u8] = br#"{"ref":"refs/heads/changes","unknown":true}"#;

    fn sign(body: &[u8]) -> String {
        SignatureScheme::HmacSha256 {
            prefix: Some("sha256="),
            encoding: Encoding::Hex,
        }
        .sign(&Secret::from(SECRET), body)
    }

    fn request<B>(method: Method, headers: &[(&str, String)], body: B) -> Request<B> {
        let mut builder = Request::builder().method(method).uri("/webhooks");
        for (name, value) in headers {
            builder = builder.header(*name, value.as_str());
        }
        builder.body(body).expect("valid request")
    }

    fn push_request(body: &'static [u8]) -> Request<Full<Bytes>> {
        request(
            Method::POST,
            &[
                ("X-Forge-Event", "push".to_owned()),
                ("X-Forge-Signature", sign(body)),
            ],
            Full::new(Bytes::from_static(body)),
        )
    }

    fn hook() -> Hook<Forge> {
        Hook::new().with_secret(SECRET)
    }

    #[tokio::test]
    async fn parses_signed_delivery() {
        let payload = hook()
            .parse(push_request(PUSH_BODY), Event::Push)
            .await
            .unwrap();

        assert_eq!(
            payload,
            Payload::Push(Push {
                git_ref: "refs/heads/changes".to_owned()
            })
        );
    }

    #[tokio::test]
    async fn invalid_method() {
        let request = request(
            Method::GET,
            &[("X-Forge-Event", "push".to_owned())],
            Full::new(Bytes::from_static(PUSH_BODY)),
        );

        let error = hook().parse(request, Event::Push).await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::InvalidMethod);
    }

    #[tokio::test]
    async fn missing_event_header() {
        let request = request(Method::POST, &[], Full::new(Bytes::from_static(PUSH_BODY)));

        let error = hook().parse(request, Event::Push).await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::MissingEventHeader);
    }

    #[tokio::test]
    async fn no_event_specified() {
        let error = hook()
            .parse(push_request(PUSH_BODY), Subscription::none())
            .await
            .unwrap_err();
        assert_eq!(error.kind, ErrorKind::NoEventSpecified);
    }

    #[tokio::test]
    async fn event_not_subscribed() {
        let error = hook()
            .parse(push_request(PUSH_BODY), Event::Create)
            .await
            .unwrap_err();
        assert_eq!(error.kind, ErrorKind::EventNotSubscribed);
    }

    #[tokio::test]
    async fn unknown_event_needs_wildcard() {
        let headers = [
            ("X-Forge-Event", "gollum".to_owned()),
            ("X-Forge-Signature", sign(PUSH_BODY)),
        ];

        let error = hook()
            .parse(
                request(Method::POST, &headers, Full::new(Bytes::from_static(PUSH_BODY))),
                [Event::Push, Event::Create],
            )
            .await
            .unwrap_err();
        assert_eq!(error.kind, ErrorKind::EventNotSubscribed);

        let error = hook()
            .parse(
                request(Method::POST, &headers, Full::new(Bytes::from_static(PUSH_BODY))),
                Subscription::all(),
            )
            .await
            .unwrap_err();
        assert_eq!(error.kind, ErrorKind::ParseError);
        assert!(error.to_string().contains("gollum"));
    }

    #[tokio::test]
    async fn empty_body() {
        let error = hook()
            .parse(push_request(b""), Event::Push)
            .await
            .unwrap_err();
        assert_eq!(error.kind, ErrorKind::ParseError);
    }

    #[tokio::test]
    async fn missing_signature_header() {
        let request = request(
            Method::POST,
            &[("X-Forge-Event", "push".to_owned())],
            Full::new(Bytes::from_static(PUSH_BODY)),
        );

        let error = hook().parse(request, Event::Push).await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::MissingSignatureHeader);
    }

    #[tokio::test]
    async fn signature_mismatch() {
        let request = request(
            Method::POST,
            &[
                ("X-Forge-Event", "push".to_owned()),
                ("X-Forge-Signature", sign(b"another body")),
            ],
            Full::new(Bytes::from_static(PUSH_BODY)),
        );

        let error = hook().parse(request, Event::Push).await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::SignatureMismatch);
    }

    #[tokio::test]
    async fn no_secret_skips_verification() {
        let request = request(
            Method::POST,
            &[("X-Forge-Event", "push".to_owned())],
            Full::new(Bytes::from_static(PUSH_BODY)),
        );

        let payload = Hook::<Forge>::new().parse(request, Event::Push).await;
        assert!(payload.is_ok());
    }

    #[tokio::test]
    async fn decode_failure_is_parse_error() {
        let body: &'static [u8] = br#"{"ref": 42}"#;
        let error = hook()
            .parse(push_request(body), Event::Push)
            .await
            .unwrap_err();
        assert_eq!(error.kind, ErrorKind::ParseError);
    }

    #[tokio::test]
    async fn body_is_released_on_every_path() {
        let cases: Vec<(Method, Vec<(&str, String)>, Subscription<Event>, &'static [u8])> = vec![
            (Method::GET, vec![], Event::Push.into(), PUSH_BODY),
            (Method::POST, vec![], Event::Push.into(), PUSH_BODY),
            (
                Method::POST,
                vec![("X-Forge-Event", "push".to_owned())],
                Subscription::none(),
                PUSH_BODY,
            ),
            (
                Method::POST,
                vec![("X-Forge-Event", "push".to_owned())],
                Event::Create.into(),
                PUSH_BODY,
            ),
            (
                Method::POST,
                vec![("X-Forge-Event", "push".to_owned())],
                Event::Push.into(),
                &b""[..],
            ),
            (
                Method::POST,
                vec![("X-Forge-Event", "push".to_owned())],
                Event::Push.into(),
                PUSH_BODY,
            ),
            (
                Method::POST,
                vec![
                    ("X-Forge-Event", "push".to_owned()),
                    ("X-Forge-Signature", "sha256=00".to_owned()),
                ],
                Event::Push.into(),
                PUSH_BODY,
            ),
            (
                Method::POST,
                vec![
                    ("X-Forge-Event", "push".to_owned()),
                    ("X-Forge-Signature", sign(PUSH_BODY)),
                ],
                Event::Push.into(),
                PUSH_BODY,
            ),
        ];

        for (method, headers, subscription, body) in cases {
            let drops = Arc::new(AtomicUsize::new(0));
            let request = request(method, &headers, TrackedBody::new(body, &drops));
            let _ = hook().parse(request, subscription).await;
            assert_eq!(drops.load(Ordering::SeqCst), 1);
        }
    }

    #[tokio::test]
    async fn body_field_event_source() {
        let body: &'static [u8] = br#"{"kind":"create","ref_type":"tag"}"#;
        let secret = Secret::from(SECRET);
        let signature = SignatureScheme::HmacSha256 {
            prefix: None,
            encoding: Encoding::Base64,
        }
        .sign(&secret, body);
        let headers = [("X-Ledger-Signature", signature)];
        let hook = Hook::<Ledger>::new().with_secret(SECRET);

        let payload = hook
            .parse(
                request(Method::POST, &headers, Full::new(Bytes::from_static(body))),
                Event::Create,
            )
            .await
            .unwrap();
        assert_eq!(
            payload,
            Payload::Create(Create {
                ref_type: "tag".to_owned()
            })
        );

        let error = hook
            .parse(
                request(Method::POST, &headers, Full::new(Bytes::from_static(body))),
                Event::Push,
            )
            .await
            .unwrap_err();
        assert_eq!(error.kind, ErrorKind::EventNotSubscribed);

        let error = hook
            .parse(
                request(Method::POST, &headers, Full::new(Bytes::from_static(body))),
                Subscription::none(),
            )
            .await
            .unwrap_err();
        assert_eq!(error.kind, ErrorKind::NoEventSpecified);
    }

    #[tokio::test]
    async fn intrinsic_event_allows_empty_subscription() {
        let hook = Hook::<Relay>::new().with_secret(SECRET);
        let headers = [
            ("x-relay-signature", "not-checked".to_owned()),
            ("x-relay-timestamp", "1700000000".to_owned()),
        ];

        let payload = hook
            .parse(
                request(Method::POST, &headers, Full::new(Bytes::from_static(PUSH_BODY))),
                Subscription::none(),
            )
            .await;
        assert!(matches!(payload, Ok(Payload::Push(_))));

        let error = hook
            .parse(
                request(Method::POST, &headers, Full::new(Bytes::from_static(PUSH_BODY))),
                Event::Create,
            )
            .await
            .unwrap_err();
        assert_eq!(error.kind, ErrorKind::EventNotSubscribed);
    }

    #[tokio::test]
    async fn presence_only_still_requires_headers() {
        let hook = Hook::<Relay>::new().with_secret(SECRET);

        let error = hook
            .parse(
                request(
                    Method::POST,
                    &[("x-relay-timestamp", "1700000000".to_owned())],
                    Full::new(Bytes::from_static(PUSH_BODY)),
                ),
                Subscription::none(),
            )
            .await
            .unwrap_err();
        assert_eq!(error.kind, ErrorKind::MissingSignatureHeader);

        let error = hook
            .parse(
                request(
                    Method::POST,
                    &[("x-relay-signature", "abc".to_owned())],
                    Full::new(Bytes::from_static(PUSH_BODY)),
                ),
                Subscription::none(),
            )
            .await
            .unwrap_err();
        assert_eq!(error.kind, ErrorKind::MissingSignatureHeader);
    }

    #[tokio::test]
    async fn header_only_provider_ignores_body() {
        let hook = Hook::<Beacon>::new().with_secret("token");
        let drops = Arc::new(AtomicUsize::new(0));
        let request = request(
            Method::POST,
            &[
                ("x-beacon-state", "push".to_owned()),
                ("x-beacon-token", "token".to_owned()),
                ("x-beacon-id", "channel-1".to_owned()),
            ],
            TrackedBody::new(b"", &drops),
        );

        let payload = hook.parse(request, Event::Push).await.unwrap();
        assert_eq!(payload, "channel-1");
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn header_only_provider_checks_token() {
        let hook = Hook::<Beacon>::new().with_secret("token");
        let request = request(
            Method::POST,
            &[
                ("x-beacon-state", "push".to_owned()),
                ("x-beacon-token", "wrong".to_owned()),
                ("x-beacon-id", "channel-1".to_owned()),
            ],
            Full::new(Bytes::new()),
        );

        let error = hook.parse(request, Event::Push).await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::SignatureMismatch);
    }

    #[test]
    fn debug_redacts_secret() {
        let debug = format!("{:?}", hook());
        assert!(debug.contains("forge"));
        assert!(!debug.contains("Horses"));
    }

    #[test]
    fn options_check_defaults_to_ok() {
        assert!(Forge::check_options(&(), &HeaderMap::new()).is_ok());
    }
}
