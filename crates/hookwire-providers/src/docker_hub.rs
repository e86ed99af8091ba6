//! Docker Hub repository webhooks.
//!
//! Docker Hub sends a single kind of delivery after an image push or
//! automated build, without an event header and without a signature.

use hookwire_core::{BodyKind, Delivery, EventSource, Hook, Provider, ProviderSpec, Result};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr, VariantArray};

use crate::macros::json_payloads;

/// Docker Hub event tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr, VariantArray)]
#[strum(serialize_all = "snake_case")]
pub enum Event {
    Build,
}

/// The pushed image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushData {
    pub images: Vec<String>,
    /// Seconds since the Unix epoch.
    pub pushed_at: f64,
    pub pusher: String,
    pub tag: String,
}

/// The repository the image was pushed to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    pub comment_count: i64,
    /// Seconds since the Unix epoch.
    pub date_created: f64,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dockerfile: Option<String>,
    pub full_description: String,
    pub is_official: bool,
    pub is_private: bool,
    pub is_trusted: bool,
    pub name: String,
    pub namespace: String,
    pub owner: String,
    pub repo_name: String,
    pub repo_url: String,
    pub star_count: i64,
    pub status: String,
}

/// Payload of the `build` event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Build {
    /// URL to post a validation callback to.
    pub callback_url: String,
    pub push_data: PushData,
    pub repository: Repository,
}

json_payloads! {
    /// A decoded Docker Hub delivery.
    pub enum Payload for Event {
        Build(Build),
    }
}

/// The Docker Hub provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct DockerHub;

impl Provider for DockerHub {
    type Event = Event;
    type Options = ();
    type Payload = Payload;

    const SPEC: ProviderSpec = ProviderSpec {
        name: "docker-hub",
        event: EventSource::Intrinsic("build"),
        signature: None,
        body: BodyKind::Json,
    };

    fn decode(event: Event, delivery: &Delivery) -> Result<Payload> {
        Payload::from_json(event, delivery)
    }
}

/// A hook receiving Docker Hub deliveries.
pub type DockerHubHook = Hook<DockerHub>;
