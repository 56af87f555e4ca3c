use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Supported output widths for content hashing, in bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashWidth {
    W128,
    W256,
    W384,
    W512,
}

impl HashWidth {
    /// All widths the hasher accepts.
    pub const ALL: [HashWidth; 4] = [Self::W128, Self::W256, Self::W384, Self::W512];

    /// Parse a width from a bit count. Anything outside the supported set
    /// is a caller bug and fails fast.
    pub fn from_bits(bits: u16) -> Result<Self, TypeError> {
        match bits {
            128 => Ok(Self::W128),
            256 => Ok(Self::W256),
            384 => Ok(Self::W384),
            512 => Ok(Self::W512),
            other => Err(TypeError::InvalidWidth(other)),
        }
    }

    /// Width in bits.
    pub fn bits(&self) -> u16 {
        match self {
            Self::W128 => 128,
            Self::W256 => 256,
            Self::W384 => 384,
            Self::W512 => 512,
        }
    }

    /// Width in bytes.
    pub fn byte_len(&self) -> usize {
        self.bits() as usize / 8
    }
}

impl Default for HashWidth {
    fn default() -> Self {
        Self::W256
    }
}

impl fmt::Display for HashWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// Content-addressed identifier for an anchored payload.
///
/// A `ContentHash` is the digest of a payload at one of the supported
/// [`HashWidth`]s. Identical payload and width always produce the same
/// identifier, so a hash doubles as a cross-reference key between anchors.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentHash(Vec<u8>);

impl ContentHash {
    /// Create a `ContentHash` from pre-computed digest bytes.
    ///
    /// The byte length must correspond to a supported [`HashWidth`].
    pub fn from_digest(bytes: Vec<u8>) -> Result<Self, TypeError> {
        HashWidth::from_bits((bytes.len() * 8) as u16)?;
        Ok(Self(bytes))
    }

    /// The width of this hash.
    pub fn width(&self) -> HashWidth {
        // Only constructible at a supported width.
        HashWidth::from_bits((self.0.len() * 8) as u16).expect("hash constructed at valid width")
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse from a hex string. The decoded length must match a supported
    /// width.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        Self::from_digest(bytes)
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({}, {} bits)", self.short_hex(), self.width())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
