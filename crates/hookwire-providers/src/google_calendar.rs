//! Google Calendar push notification channels.
//!
//! Notifications carry no body; everything is in `X-Goog-*` headers. The
//! resource state names the event, and the channel token set when the
//! channel was created is echoed in `X-Goog-Channel-Token`.

use hookwire_core::{
    BodyKind, Delivery, EventSource, Hook, Provider, ProviderSpec, Result, SignatureScheme,
    SignatureSpec,
};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr, VariantArray};

/// Header carrying the channel id.
pub const CHANNEL_ID_HEADER: &str = "X-Goog-Channel-ID";

/// Header carrying the channel token.
pub const CHANNEL_TOKEN_HEADER: &str = "X-Goog-Channel-Token";

/// Header carrying the channel expiration in RFC 1123 format.
pub const CHANNEL_EXPIRATION_HEADER: &str = "X-Goog-Channel-Expiration";

/// Header carrying the watched resource id.
pub const RESOURCE_ID_HEADER: &str = "X-Goog-Resource-ID";

/// Header carrying the watched resource URI.
pub const RESOURCE_URI_HEADER: &str = "X-Goog-Resource-URI";

/// Header naming the event of a notification.
pub const RESOURCE_STATE_HEADER: &str = "X-Goog-Resource-State";

/// Header carrying the message sequence number.
pub const MESSAGE_NUMBER_HEADER: &str = "X-Goog-Message-Number";

/// Google Calendar resource states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr, VariantArray)]
#[strum(serialize_all = "snake_case")]
pub enum Event {
    /// The channel was created.
    Sync,
    /// The resource was created or changed.
    Exists,
    /// The resource was deleted.
    NotExists,
}

/// A push notification, decoded from its headers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarNotification {
    pub channel_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_expiration: Option<Timestamp>,
    pub resource_id: String,
    pub resource_uri: String,
    pub resource_state: String,
    pub message_number: i64,
}

impl CalendarNotification {
    fn from_headers(delivery: &Delivery) -> Result<Self> {
        Ok(Self {
            channel_id: owned(delivery.header(CHANNEL_ID_HEADER)),
            channel_token: delivery.header(CHANNEL_TOKEN_HEADER).map(str::to_owned),
            channel_expiration: delivery.rfc1123_header(CHANNEL_EXPIRATION_HEADER)?,
            resource_id: owned(delivery.header(RESOURCE_ID_HEADER)),
            resource_uri: owned(delivery.header(RESOURCE_URI_HEADER)),
            resource_state: owned(delivery.header(RESOURCE_STATE_HEADER)),
            message_number: delivery.require_parsed_header(MESSAGE_NUMBER_HEADER)?,
        })
    }
}

fn owned(value: Option<&str>) -> String {
    value.map(str::to_owned).unwrap_or_default()
}

/// A decoded Google Calendar notification.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Sync(CalendarNotification),
    Exists(CalendarNotification),
    NotExists(CalendarNotification),
}

impl Payload {
    /// Returns the event this payload was decoded for.
    pub fn event(&self) -> Event {
        match self {
            Self::Sync(_) => Event::Sync,
            Self::Exists(_) => Event::Exists,
            Self::NotExists(_) => Event::NotExists,
        }
    }

    /// Returns the notification regardless of its state.
    pub fn notification(&self) -> &CalendarNotification {
        match self {
            Self::Sync(notification)
            | Self::Exists(notification)
            | Self::NotExists(notification) => notification,
        }
    }
}

/// The Google Calendar provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoogleCalendar;

impl Provider for GoogleCalendar {
    type Event = Event;
    type Options = ();
    type Payload = Payload;

    const SPEC: ProviderSpec = ProviderSpec {
        name: "google-calendar",
        event: EventSource::Header(RESOURCE_STATE_HEADER),
        signature: Some(SignatureSpec::body(
            CHANNEL_TOKEN_HEADER,
            SignatureScheme::Token,
        )),
        body: BodyKind::Ignored,
    };

    fn decode(event: Event, delivery: &Delivery) -> Result<Payload> {
        let notification = CalendarNotification::from_headers(delivery)?;
        Ok(match event {
            Event::Sync => Payload::Sync(notification),
            Event::Exists => Payload::Exists(notification),
            Event::NotExists => Payload::NotExists(notification),
        })
    }
}

/// A hook receiving Google Calendar notifications.
pub type GoogleCalendarHook = Hook<GoogleCalendar>;
