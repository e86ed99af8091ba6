//! Shared helpers for provider tests.

use std::fmt::Debug;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};

use bytes::Bytes;
use hookwire_core::{Provider, Secret};
use http::{Method, Request};
use http_body::{Body, Frame};
use http_body_util::Full;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Secret shared by every signed test delivery.
pub(crate) const SECRET: &str = "IsWishesWereHorsesWedAllBeEatingSteak!";

/// Builds a request with the given headers and body.
pub(crate) fn request<B>(method: Method, headers: &[(&str, &str)], body: B) -> Request<B> {
    let mut builder = Request::builder().method(method).uri("/webhooks");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }

    builder.body(body).expect("valid test request")
}

/// Builds a request with an in-memory body.
pub(crate) fn full_request(
    method: Method,
    headers: &[(&str, &str)],
    body: &[u8],
) -> Request<Full<Bytes>> {
    request(method, headers, Full::new(Bytes::copy_from_slice(body)))
}

/// Signs the material the way the provider's sender would.
pub(crate) fn sign<P: Provider>(material: &[u8]) -> String {
    let signature = P::SPEC.signature.expect("provider signs deliveries");
    signature.scheme.sign(&Secret::from(SECRET), material)
}

/// Serializes and re-decodes a payload, asserting nothing was lost.
pub(crate) fn assert_round_trip<T>(value: &T)
where
    T: Serialize + DeserializeOwned + PartialEq + Debug,
{
    let json = serde_json::to_vec(value).expect("payload serializes");
    let decoded: T = serde_json::from_slice(&json).expect("payload decodes");
    assert_eq!(&decoded, value);
}

/// A body that records how many times it was dropped.
pub(crate) struct TrackedBody {
    inner: Full<Bytes>,
    drops: Arc<AtomicUsize>,
}

impl TrackedBody {
    pub(crate) fn new(bytes: &[u8]) -> (Self, Arc<AtomicUsize>) {
        let drops = Arc::new(AtomicUsize::new(0));
        let body = Self {
            inner: Full::new(Bytes::copy_from_slice(bytes)),
            drops: Arc::clone(&drops),
        };

        (body, drops)
    }
}

impl Body for TrackedBody {
    type Data = Bytes;
    type Error = std::convert::Infallible;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Bytes>, Self::Error>>> {
        Pin::new(&mut self.get_mut().inner).poll_frame(cx)
    }
}

impl Drop for TrackedBody {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

/// Returns the number of recorded drops.
pub(crate) fn drops(counter: &Arc<AtomicUsize>) -> usize {
    counter.load(Ordering::SeqCst)
}
