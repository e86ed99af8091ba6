//! Signature schemes used by webhook providers.
//!
//! Every scheme authenticates the delivery with the hook's shared secret.
//! MAC schemes decode the provided signature and verify it with
//! [`Mac::verify_slice`], which compares in constant time. The token scheme
//! compares SHA-256 digests of both values with [`ConstantTimeEq`], so the
//! token length does not affect timing either.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use strum::{AsRefStr, Display, IntoStaticStr};
use subtle::ConstantTimeEq;

use crate::{Error, ErrorKind, Result, Secret};

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;

/// Text encoding of a MAC in the signature header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Encoding {
    /// Lowercase hexadecimal.
    Hex,
    /// Standard base64 with padding.
    Base64,
}

impl Encoding {
    /// Encodes raw MAC bytes.
    #[must_use]
    pub fn encode(self, bytes: &[u8]) -> String {
        match self {
            Self::Hex => hex::encode(bytes),
            Self::Base64 => BASE64.encode(bytes),
        }
    }

    /// Decodes signature text, returning `None` on malformed input.
    #[must_use]
    pub fn decode(self, text: &str) -> Option<Vec<u8>> {
        match self {
            Self::Hex => hex::decode(text).ok(),
            Self::Base64 => BASE64.decode(text).ok(),
        }
    }
}

/// Algorithm and wire format of a provider's signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureScheme {
    /// HMAC-SHA1 over the signed material.
    HmacSha1 {
        /// Prefix preceding the encoded MAC, such as `sha1=`.
        prefix: Option<&'static str>,
        /// Encoding of the MAC.
        encoding: Encoding,
    },
    /// HMAC-SHA256 over the signed material.
    HmacSha256 {
        /// Prefix preceding the encoded MAC, such as `sha256=`.
        prefix: Option<&'static str>,
        /// Encoding of the MAC.
        encoding: Encoding,
    },
    /// The header carries the shared secret itself.
    Token,
}

impl SignatureScheme {
    /// Returns a short name of the algorithm.
    #[must_use]
    pub const fn algorithm(&self) -> &'static str {
        match self {
            Self::HmacSha1 { .. } => "hmac-sha1",
            Self::HmacSha256 { .. } => "hmac-sha256",
            Self::Token => "token",
        }
    }

    /// Produces the header value a sender would attach for the material.
    #[must_use]
    pub fn sign(&self, secret: &Secret, material: &[u8]) -> String {
        match *self {
            Self::HmacSha1 { prefix, encoding } => {
                let tag = mac::<HmacSha1>(secret, material).finalize().into_bytes();
                format!("{}{}", prefix.unwrap_or_default(), encoding.encode(&tag))
            }
            Self::HmacSha256 { prefix, encoding } => {
                let tag = mac::<HmacSha256>(secret, material).finalize().into_bytes();
                format!("{}{}", prefix.unwrap_or_default(), encoding.encode(&tag))
            }
            Self::Token => String::from_utf8_lossy(secret.expose()).into_owned(),
        }
    }

    /// Verifies a provided header value against the material.
    ///
    /// A missing prefix, undecodable text or a MAC of the wrong length are all
    /// reported as [`ErrorKind::SignatureMismatch`].
    pub fn verify(&self, secret: &Secret, material: &[u8], provided: &str) -> Result<()> {
        let verified = match *self {
            Self::HmacSha1 { prefix, encoding } => decode_mac(prefix, encoding, provided)
                .is_some_and(|tag| mac::<HmacSha1>(secret, material).verify_slice(&tag).is_ok()),
            Self::HmacSha256 { prefix, encoding } => decode_mac(prefix, encoding, provided)
                .is_some_and(|tag| mac::<HmacSha256>(secret, material).verify_slice(&tag).is_ok()),
            Self::Token => token_eq(secret.expose(), provided.as_bytes()),
        };

        if verified {
            Ok(())
        } else {
            Err(Error::new(ErrorKind::SignatureMismatch))
        }
    }
}

/// Strips the expected prefix and decodes the MAC text.
fn decode_mac(prefix: Option<&str>, encoding: Encoding, provided: &str) -> Option<Vec<u8>> {
    let encoded = match prefix {
        Some(prefix) => provided.strip_prefix(prefix)?,
        None => provided,
    };

    encoding.decode(encoded.trim())
}

/// Keys a MAC with the secret and feeds it the material.
fn mac<M: Mac + KeyInit>(secret: &Secret, material: &[u8]) -> M {
    let mut mac = <M as KeyInit>::new_from_slice(secret.expose())
        .expect("HMAC can take key of any size");
    mac.update(material);
    mac
}

/// Compares two tokens in time independent of their content and length.
fn token_eq(expected: &[u8], provided: &[u8]) -> bool {
    let expected = Sha256::digest(expected);
    let provided = Sha256::digest(provided);

    expected.as_slice().ct_eq(provided.as_slice()).into()
}
