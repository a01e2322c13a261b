//! Identifier codec.
//!
//! Two kinds of identifiers share the same opaque byte representation on the wire:
//!
//! - locator identifiers are the raw UTF-8 bytes of the locator returned by the blob service;
//! - height identifiers are [`HEIGHT_MARKER`] followed by the 8-byte big-endian block height.
//!
//! `0xff` never appears in UTF-8, so the first byte alone tells the two encodings apart.

use std::{fmt, str};

/// First byte of every height identifier.
pub const HEIGHT_MARKER: u8 = 0xff;
/// Length of an encoded height identifier.
pub const HEIGHT_ID_LEN: usize = 1 + 8;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("identifier is empty")]
    Empty,
    #[error("height identifier must be {HEIGHT_ID_LEN} bytes long, got {0}")]
    HeightLength(usize),
    #[error("locator identifier is not valid UTF-8")]
    InvalidLocator(#[from] str::Utf8Error),
}

/// Identifier of a blob (or a set of blobs) in the DA layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    /// Locator returned by the blob service for a single published blob.
    Locator(String),
    /// Block height, produced by height enumeration. Never dereferenced to a blob.
    Height(u64),
}

impl Identifier {
    pub fn locator(locator: impl Into<String>) -> Self {
        Self::Locator(locator.into())
    }

    pub fn as_locator(&self) -> Option<&str> {
        match self {
            Self::Locator(locator) => Some(locator),
            Self::Height(_) => None,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Locator(locator) => locator.as_bytes().to_vec(),
            Self::Height(height) => {
                let mut bytes = Vec::with_capacity(HEIGHT_ID_LEN);
                bytes.push(HEIGHT_MARKER);
                bytes.extend_from_slice(&encode_height(*height));
                bytes
            }
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IdentifierError> {
        match bytes {
            [] => Err(IdentifierError::Empty),
            [HEIGHT_MARKER, payload @ ..] => decode_height(payload)
                .map(Self::Height)
                .ok_or(IdentifierError::HeightLength(bytes.len())),
            _ => Ok(Self::Locator(str::from_utf8(bytes)?.to_owned())),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Locator(locator) => f.write_str(locator),
            Self::Height(height) => write!(f, "height:{height}"),
        }
    }
}

/// Encodes a block height as 8 big-endian bytes.
///
/// For heights below `2^32` the last four bytes are the 32-bit big-endian height and the
/// first four are zero. Larger heights are kept in full rather than truncated.
pub fn encode_height(height: u64) -> [u8; 8] {
    height.to_be_bytes()
}

pub fn decode_height(bytes: &[u8]) -> Option<u64> {
    let bytes: [u8; 8] = bytes.try_into().ok()?;
    Some(u64::from_be_bytes(bytes))
}
