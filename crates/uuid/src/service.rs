//! Implementation of [`SessionId`].

use crate::{SessionIdError, SessionIdResult};
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use std::{fmt, str::FromStr};
use uuid::{Builder, Uuid, Variant};

/// A chat session identifier in hyphenated UUID-v4 form.
///
/// Once constructed the inner value is guaranteed to satisfy the wire form described in the
/// crate documentation.
///
/// # Construction
/// - [`SessionId::generate`] draws a fresh identifier from a non-cryptographic RNG.
/// - [`SessionId::generate_with`] draws from a caller-supplied RNG (deterministic in tests).
/// - [`SessionId::parse`] validates an externally supplied identifier (CLI input).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generates a new identifier seeded from OS entropy.
    pub fn generate() -> Self {
        Self::generate_with(&mut SmallRng::from_entropy())
    }

    /// Generates a new identifier from `rng`.
    ///
    /// The builder fixes the version nibble to `4` and the variant bits to RFC 4122
    /// (`10xx`), which yields a variant character in `{8, 9, a, b}`.
    pub fn generate_with<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 16];
        rng.fill_bytes(&mut bytes);
        Self(Builder::from_random_bytes(bytes).into_uuid())
    }

    /// Validates and wraps an identifier that must already be in wire form.
    ///
    /// Uppercase, braced, URN or simple (unhyphenated) forms are rejected rather than
    /// normalised, since the backend keys history by the exact string.
    ///
    /// # Errors
    ///
    /// Returns [`SessionIdError::InvalidInput`] if `input` is not in wire form.
    pub fn parse(input: &str) -> SessionIdResult<Self> {
        if !Self::is_wire_form(input) {
            return Err(SessionIdError::InvalidInput(format!(
                "expected a 36-character lowercase hyphenated UUID v4, got: '{}'",
                input
            )));
        }

        let uuid = Uuid::parse_str(input)
            .map_err(|e| SessionIdError::InvalidInput(format!("'{}': {}", input, e)))?;

        if uuid.get_version_num() != 4 || uuid.get_variant() != Variant::RFC4122 {
            return Err(SessionIdError::InvalidInput(format!(
                "'{}' is not a version 4 RFC 4122 identifier",
                input
            )));
        }

        Ok(Self(uuid))
    }

    /// Purely syntactic check of the wire form.
    pub fn is_wire_form(input: &str) -> bool {
        let bytes = input.as_bytes();
        if bytes.len() != 36 {
            return false;
        }

        let layout_ok = bytes.iter().enumerate().all(|(i, b)| match i {
            8 | 13 | 18 | 23 => *b == b'-',
            _ => matches!(b, b'0'..=b'9' | b'a'..=b'f'),
        });

        layout_ok && bytes[14] == b'4' && matches!(bytes[19], b'8' | b'9' | b'a' | b'b')
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for SessionId {
    type Err = SessionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SessionId::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for SessionId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SessionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        SessionId::parse(&s).map_err(serde::de::Error::custom)
    }
}
