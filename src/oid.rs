use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::config::ObjectFormat;
use crate::types::ObjectType;
use crate::Error;

/// byte separating the type tag from the payload in stored objects
pub const TYPE_SEPARATOR: u8 = 0;

/// SHA-256 object id used for content addressing
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Oid([u8; 32]);

impl Oid {
    /// zero oid (useful as sentinel)
    pub const ZERO: Oid = Oid([0u8; 32]);

    /// length of the hex form
    pub const HEX_LEN: usize = 64;

    /// create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// parse from hex string
    pub fn from_hex(s: &str) -> crate::Result<Self> {
        if s.len() != Self::HEX_LEN {
            return Err(Error::InvalidOid(s.to_string()));
        }
        let bytes = hex::decode(s).map_err(|_| Error::InvalidOid(s.to_string()))?;
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// does this string look like a full hex oid
    pub fn is_hex_oid(s: &str) -> bool {
        s.len() == Self::HEX_LEN && s.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// get raw bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// convert to lowercase hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// abbreviated form for display
    pub fn short(&self) -> String {
        self.to_hex()[..12].to_string()
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid({})", self.short())
    }
}

impl FromStr for Oid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Oid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Oid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// compute the oid of an object
///
/// typed format hashes the stored bytes: tag | 0x00 | payload.
/// legacy format hashes the payload alone, so a blob and a tree with the
/// same bytes share an oid.
pub fn compute_oid(format: ObjectFormat, kind: ObjectType, payload: &[u8]) -> Oid {
    let mut hasher = Sha256::new();
    if format == ObjectFormat::Typed {
        hasher.update(kind.as_str().as_bytes());
        hasher.update([TYPE_SEPARATOR]);
    }
    hasher.update(payload);
    Oid(hasher.finalize().into())
}
