//! Event tags, tag selection and per-call subscriptions.

use std::fmt;
use std::fmt::Debug;
use std::hash::Hash;
use std::str::FromStr;

use strum::VariantArray;

use crate::{Error, Result};

/// The distinguished tag subscribing to every event a provider supports.
pub const WILDCARD_TAG: &str = "*";

/// A provider-scoped event identifier.
///
/// Implemented for every provider event enum deriving strum's `EnumString`,
/// `IntoStaticStr` and `VariantArray`. The wildcard is never a variant.
pub trait EventKind: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// Looks up the event named by a raw wire tag.
    fn from_tag(tag: &str) -> Option<Self>;

    /// Returns the wire tag of this event.
    fn tag(self) -> &'static str;

    /// Returns every event of the provider.
    fn variants() -> &'static [Self];
}

impl<T> EventKind for T
where
    T: Copy + Eq + Hash + Debug + Send + Sync + 'static,
    T: FromStr + Into<&'static str> + VariantArray,
{
    fn from_tag(tag: &str) -> Option<Self> {
        T::from_str(tag).ok()
    }

    fn tag(self) -> &'static str {
        self.into()
    }

    fn variants() -> &'static [Self] {
        T::VARIANTS
    }
}

/// Result of looking up a raw event value in a provider's tag table.
///
/// Unknown values are kept rather than rejected so that a wildcard
/// subscription surfaces them as a decoding error instead of dropping them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<E> {
    /// The value names a known event.
    Known(E),
    /// The value is not in the provider's tag table.
    Unrecognized(String),
}

impl<E: EventKind> Selection<E> {
    /// Selects the event named by a raw wire value.
    pub fn select(raw: &str) -> Self {
        match E::from_tag(raw) {
            Some(event) => Self::Known(event),
            None => Self::Unrecognized(raw.to_owned()),
        }
    }

    /// Returns the raw tag of the selection.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(event) => event.tag(),
            Self::Unrecognized(raw) => raw,
        }
    }
}

/// The set of events a caller accepts on a single parse call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subscription<E> {
    /// Every event the provider supports, including unrecognized ones.
    All,
    /// Only the listed events.
    Only(Vec<E>),
}

impl<E: EventKind> Subscription<E> {
    /// Subscribes to every event.
    pub const fn all() -> Self {
        Self::All
    }

    /// The empty subscription.
    pub const fn none() -> Self {
        Self::Only(Vec::new())
    }

    /// Parses a subscription from wire tags, accepting the wildcard tag.
    ///
    /// Unknown tags are rejected with a parse error naming the tag.
    pub fn from_tags<I, S>(tags: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut events = Vec::new();
        for tag in tags {
            let tag = tag.as_ref().trim();
            if tag.is_empty() {
                continue;
            }

            if tag == WILDCARD_TAG {
                return Ok(Self::All);
            }

            let event = E::from_tag(tag)
                .ok_or_else(|| Error::parse(format!("unknown event tag '{tag}'")))?;
            if !events.contains(&event) {
                events.push(event);
            }
        }

        Ok(Self::Only(events))
    }

    /// Returns `true` if no event is accepted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Only(events) if events.is_empty())
    }

    /// Returns `true` if the event is accepted.
    #[must_use]
    pub fn contains(&self, event: E) -> bool {
        match self {
            Self::All => true,
            Self::Only(events) => events.contains(&event),
        }
    }

    /// Returns `true` if the selected event is accepted.
    #[must_use]
    pub fn accepts(&self, selection: &Selection<E>) -> bool {
        match (self, selection) {
            (Self::All, _) => true,
            (Self::Only(events), Selection::Known(event)) => events.contains(event),
            (Self::Only(_), Selection::Unrecognized(_)) => false,
        }
    }

    /// Returns the explicitly listed events; every event for [`Subscription::All`].
    pub fn events(&self) -> &[E] {
        match self {
            Self::All => E::variants(),
            Self::Only(events) => events,
        }
    }
}

impl<E: EventKind> Default for Subscription<E> {
    fn default() -> Self {
        Self::none()
    }
}

impl<E: EventKind> From<E> for Subscription<E> {
    fn from(event: E) -> Self {
        Self::Only(vec![event])
    }
}

impl<E: EventKind, const N: usize> From<[E; N]> for Subscription<E> {
    fn from(events: [E; N]) -> Self {
        events.into_iter().collect()
    }
}

impl<E: EventKind> From<&[E]> for Subscription<E> {
    fn from(events: &[E]) -> Self {
        events.iter().copied().collect()
    }
}

impl<E: EventKind> From<Vec<E>> for Subscription<E> {
    fn from(events: Vec<E>) -> Self {
        events.into_iter().collect()
    }
}

impl<E: EventKind> FromIterator<E> for Subscription<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        let mut events = Vec::new();
        for event in iter {
            if !events.contains(&event) {
                events.push(event);
            }
        }
        Self::Only(events)
    }
}

impl<E: EventKind> fmt::Display for Subscription<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(WILDCARD_TAG),
            Self::Only(events) => {
                for (i, event) in events.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    f.write_str(event.tag())?;
                }
                Ok(())
            }
        }
    }
}
