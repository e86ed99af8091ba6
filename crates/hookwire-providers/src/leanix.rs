//! LeanIX fact sheet webhooks.
//!
//! LeanIX names the event in the `type` field of the JSON body, so the body
//! is read before the subscription can be checked. Deliveries are signed with
//! HMAC-SHA256 over the raw body, sent base64 encoded in
//! `X-Leanix-Signature`.

use hookwire_core::{
    BodyKind, Delivery, Encoding, EventSource, Hook, Provider, ProviderSpec, Result,
    SignatureScheme, SignatureSpec,
};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr, VariantArray};

use crate::macros::json_payloads;

/// Body field naming the event of a delivery.
pub const EVENT_FIELD: &str = "type";

/// Header carrying the body signature.
pub const SIGNATURE_HEADER: &str = "X-Leanix-Signature";

/// LeanIX event tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr, VariantArray)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Event {
    FactSheetCreated,
    FactSheetUpdated,
    FactSheetArchived,
    FactSheetDeleted,
    FactSheetRecovered,
}

/// The user who made the change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub display_name: String,
}

/// The changed fact sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FactSheet {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub display_name: String,
    pub status: String,
    pub rev: i64,
}

/// One field-level change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldChange {
    pub field: String,
    pub old_value: serde_json::Value,
    pub new_value: serde_json::Value,
}

/// Payload of every fact sheet event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FactSheetChange {
    /// The event tag, such as `FACT_SHEET_UPDATED`.
    #[serde(rename = "type")]
    pub event_type: String,
    pub id: String,
    pub workspace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    pub fact_sheet: FactSheet,
    pub changes: Vec<FieldChange>,
}

json_payloads! {
    /// A decoded LeanIX delivery.
    pub enum Payload for Event {
        FactSheetCreated(FactSheetChange),
        FactSheetUpdated(FactSheetChange),
        FactSheetArchived(FactSheetChange),
        FactSheetDeleted(FactSheetChange),
        FactSheetRecovered(FactSheetChange),
    }
}

/// The LeanIX provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct Leanix;

impl Provider for Leanix {
    type Event = Event;
    type Options = ();
    type Payload = Payload;

    const SPEC: ProviderSpec = ProviderSpec {
        name: "leanix",
        event: EventSource::BodyField(EVENT_FIELD),
        signature: Some(SignatureSpec::body(
            SIGNATURE_HEADER,
            SignatureScheme::HmacSha256 {
                prefix: None,
                encoding: Encoding::Base64,
            },
        )),
        body: BodyKind::Json,
    };

    fn decode(event: Event, delivery: &Delivery) -> Result<Payload> {
        Payload::from_json(event, delivery)
    }
}

/// A hook receiving LeanIX deliveries.
pub type LeanixHook = Hook<Leanix>;
