//! Static per-provider descriptors.
//!
//! A [`ProviderSpec`] captures everything that differs between providers in
//! the intake pipeline: where the event tag comes from, how deliveries are
//! signed and whether the payload travels in the body at all. The parse
//! engine in [`Hook`](crate::Hook) is driven entirely by this table.

use crate::signature::SignatureScheme;

/// Where a provider carries the event tag of a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSource {
    /// A request header names the event.
    Header(&'static str),
    /// A top-level string field of the JSON body names the event.
    BodyField(&'static str),
    /// The provider has a single intrinsic event with the given tag.
    Intrinsic(&'static str),
}

impl EventSource {
    /// Returns `true` if callers must subscribe to at least one event.
    #[must_use]
    pub const fn requires_subscription(&self) -> bool {
        !matches!(self, Self::Intrinsic(_))
    }
}

/// How the payload travels in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// The body is a JSON document.
    Json,
    /// The payload is carried in headers; the body is discarded unread.
    Ignored,
}

/// The bytes a signature is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignedMaterial {
    /// The raw body bytes as received.
    Body,
    /// The listed header values joined with `.`, followed by `.` and the body.
    DottedHeaders(&'static [&'static str]),
}

/// Whether the signature is checked or only required to be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enforcement {
    /// The signature is verified against the secret.
    Verify,
    /// The signature header must be present but is not verified.
    PresenceOnly,
}

/// Signature header and scheme of a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureSpec {
    /// Name of the header carrying the signature.
    pub header: &'static str,
    /// Algorithm and encoding of the signature.
    pub scheme: SignatureScheme,
    /// Bytes the signature covers.
    pub material: SignedMaterial,
    /// Whether the signature is verified.
    pub enforcement: Enforcement,
}

impl SignatureSpec {
    /// Creates a verified signature over the raw body.
    #[must_use]
    pub const fn body(header: &'static str, scheme: SignatureScheme) -> Self {
        Self {
            header,
            scheme,
            material: SignedMaterial::Body,
            enforcement: Enforcement::Verify,
        }
    }

    /// Returns every header name the signature depends on.
    pub fn headers(&self) -> impl Iterator<Item = &'static str> {
        let material: &'static [&'static str] = match self.material {
            SignedMaterial::Body => &[],
            SignedMaterial::DottedHeaders(headers) => headers,
        };

        std::iter::once(self.header).chain(material.iter().copied())
    }
}

/// Static description of a webhook provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderSpec {
    /// Stable provider identifier, such as `github`.
    pub name: &'static str,
    /// Where the event tag is carried.
    pub event: EventSource,
    /// Signature header and scheme, if the provider signs deliveries.
    pub signature: Option<SignatureSpec>,
    /// How the payload travels.
    pub body: BodyKind,
}
