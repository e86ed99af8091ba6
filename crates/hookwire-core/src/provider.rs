//! The seam between the parse engine and a concrete provider.

use std::fmt::Debug;

use http::HeaderMap;

use crate::{Delivery, EventKind, ProviderSpec, Result};

/// A webhook provider: its descriptor, event set and payload decoder.
///
/// Implementors are zero-sized marker types; all per-hook state lives in
/// [`Hook`](crate::Hook).
pub trait Provider: Send + Sync + 'static {
    /// The provider's event tags.
    type Event: EventKind;

    /// The sum type of every payload the provider delivers.
    type Payload: Send + 'static;

    /// Provider-specific hook options beyond the shared secret.
    type Options: Debug + Clone + Default + Send + Sync + 'static;

    /// The static intake descriptor.
    const SPEC: ProviderSpec;

    /// Validates provider-specific headers against the hook options.
    ///
    /// Runs after subscription checks and before the body is read.
    fn check_options(options: &Self::Options, headers: &HeaderMap) -> Result<()> {
        let _ = (options, headers);
        Ok(())
    }

    /// Decodes the payload of an accepted delivery.
    ///
    /// The returned variant must correspond to `event`.
    fn decode(event: Self::Event, delivery: &Delivery) -> Result<Self::Payload>;
}
