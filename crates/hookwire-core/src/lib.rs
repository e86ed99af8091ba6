#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod delivery;
mod error;
mod event;
mod hook;
mod provider;
mod secret;

pub mod signature;
pub mod spec;

pub use delivery::{DEFAULT_BODY_LIMIT, Delivery};
pub use error::{BoxedError, Error, ErrorKind, Result};
pub use event::{EventKind, Selection, Subscription, WILDCARD_TAG};
pub use hook::{Hook, TRACING_TARGET};
pub use provider::Provider;
pub use secret::Secret;
pub use signature::{Encoding, SignatureScheme};
pub use spec::{BodyKind, Enforcement, EventSource, ProviderSpec, SignatureSpec, SignedMaterial};
