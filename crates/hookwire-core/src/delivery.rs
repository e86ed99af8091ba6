//! Request intake and typed access to a received delivery.

use std::str::FromStr;

use bytes::Bytes;
use http::HeaderMap;
use http_body::Body;
use http_body_util::{BodyExt, Limited};
use jiff::Timestamp;
use jiff::fmt::rfc2822::DateTimeParser;
use serde::de::DeserializeOwned;

use crate::{BoxedError, Error, ErrorKind, Result};

/// Default upper bound on a delivery body, matching GitHub's payload cap.
pub const DEFAULT_BODY_LIMIT: usize = 25 * 1024 * 1024;

static RFC1123: DateTimeParser = DateTimeParser::new();

/// Reads a request body to completion.
///
/// The body is consumed and released before this returns, whether reading
/// succeeds or not. Read failures, bodies over `limit` and empty bodies are
/// [`ErrorKind::ParseError`].
pub(crate) async fn read_body<B>(body: B, limit: usize) -> Result<Bytes>
where
    B: Body,
    B::Error: Into<BoxedError>,
{
    let collected = Limited::new(body, limit).collect().await.map_err(|error| {
        Error::from_source(ErrorKind::ParseError, error).with_message("failed to read request body")
    })?;

    let bytes = collected.to_bytes();
    if bytes.is_empty() {
        return Err(Error::parse("empty request body"));
    }

    Ok(bytes)
}

/// A delivery that passed intake: its headers and the raw body bytes.
#[derive(Debug, Clone)]
pub struct Delivery {
    headers: HeaderMap,
    body: Bytes,
}

impl Delivery {
    /// Creates a delivery from received parts.
    pub fn new(headers: HeaderMap, body: Bytes) -> Self {
        Self { headers, body }
    }

    /// Returns the request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the raw body exactly as received.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns a header value if present and valid visible ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        header_str(&self.headers, name)
    }

    /// Returns a header value, failing with a parse error if absent.
    pub fn require_header(&self, name: &str) -> Result<&str> {
        self.header(name)
            .ok_or_else(|| Error::parse(format!("missing header '{name}'")))
    }

    /// Parses an optional typed header.
    pub fn parse_header<T>(&self, name: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.header(name)
            .map(|value| {
                value.trim().parse::<T>().map_err(|error| {
                    Error::parse(format!("invalid value for header '{name}': {error}"))
                })
            })
            .transpose()
    }

    /// Parses a required typed header.
    pub fn require_parsed_header<T>(&self, name: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.parse_header(name)?
            .ok_or_else(|| Error::parse(format!("missing header '{name}'")))
    }

    /// Parses an optional RFC 1123 timestamp header, e.g.
    /// `Tue, 19 Nov 2013 01:13:52 GMT`.
    pub fn rfc1123_header(&self, name: &str) -> Result<Option<Timestamp>> {
        self.header(name)
            .map(|value| {
                RFC1123.parse_timestamp(value.trim()).map_err(|error| {
                    Error::from_source(ErrorKind::ParseError, error)
                        .with_message(format!("invalid timestamp in header '{name}'"))
                })
            })
            .transpose()
    }

    /// Decodes the body as JSON.
    ///
    /// Unknown fields are ignored; missing fields fall back to the schema's
    /// defaults.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(Error::from)
    }

    /// Reads a top-level string field of the JSON body.
    pub(crate) fn json_field(&self, field: &str) -> Result<Option<String>> {
        let value: serde_json::Value = self.json()?;
        Ok(value
            .get(field)
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned))
    }
}

/// Returns a header value as a string, ignoring values that are not ASCII.
pub(crate) fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;
    use http_body_util::Full;

    use super::*;

    fn delivery(headers: &[(&'static str, &'static str)], body: &'static [u8]) -> Delivery {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            map.insert(*name, HeaderValue::from_static(value));
        }
        Delivery::new(map, Bytes::from_static(body))
    }

    #[tokio::test]
    async fn read_body_collects_bytes() {
        let body = Full::new(Bytes::from_static(b"{\"ref\":\"main\"}"));
        let bytes = read_body(body, DEFAULT_BODY_LIMIT).await.unwrap();
        assert_eq!(&bytes[..], b"{\"ref\":\"main\"}");
    }

    #[tokio::test]
    async fn read_body_rejects_empty() {
        let body = Full::new(Bytes::new());
        let error = read_body(body, DEFAULT_BODY_LIMIT).await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::ParseError);
    }

    #[tokio::test]
    async fn read_body_enforces_limit() {
        let body = Full::new(Bytes::from_static(b"0123456789"));
        let error = read_body(body, 4).await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::ParseError);
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let delivery = delivery(&[("x-github-event", "push")], b"");
        assert_eq!(delivery.header("X-GitHub-Event"), Some("push"));
        assert_eq!(delivery.header("X-Gitlab-Event"), None);
        assert!(delivery.require_header("X-Gitlab-Event").is_err());
    }

    #[test]
    fn typed_headers() {
        let delivery = delivery(
            &[
                ("x-goog-message-number", "42"),
                ("x-goog-resource-state", "sync"),
                ("x-goog-channel-expiration", "Tue, 19 Nov 2013 01:13:52 GMT"),
                ("x-broken-number", "4x2"),
                ("x-broken-date", "yesterday"),
            ],
            b"",
        );

        assert_eq!(
            delivery
                .require_parsed_header::<i64>("X-Goog-Message-Number")
                .unwrap(),
            42
        );
        assert_eq!(delivery.parse_header::<i64>("X-Missing").unwrap(), None);
        assert_eq!(
            delivery
                .parse_header::<i64>("X-Broken-Number")
                .unwrap_err()
                .kind,
            ErrorKind::ParseError
        );

        let expiration = delivery
            .rfc1123_header("X-Goog-Channel-Expiration")
            .unwrap()
            .expect("expiration present");
        assert_eq!(expiration.as_second(), 1_384_823_632);
        assert!(delivery.rfc1123_header("X-Broken-Date").is_err());
    }

    #[test]
    fn json_field_lookup() {
        let delivery = delivery(&[], b"{\"type\":\"FACT_SHEET_UPDATED\",\"n\":1}");
        assert_eq!(
            delivery.json_field("type").unwrap().as_deref(),
            Some("FACT_SHEET_UPDATED")
        );
        assert_eq!(delivery.json_field("n").unwrap(), None);
        assert_eq!(delivery.json_field("missing").unwrap(), None);
    }
}
