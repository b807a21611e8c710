//! Plan fingerprints: blake3 over the JSON form, used by `explain` output and
//! as a cache key for compiled plans.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PlanFingerprint(pub [u8; 32]);

impl PlanFingerprint {
    pub fn to_hex(&self) -> String {
        blake3::Hash::from(self.0).to_hex().to_string()
    }

    /// First 12 hex chars; enough to tell plans apart in logs.
    pub fn short(&self) -> String {
        let mut hex = self.to_hex();
        hex.truncate(12);
        hex
    }
}

impl fmt::Display for PlanFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

pub fn fingerprint_bytes(bytes: &[u8]) -> PlanFingerprint {
    PlanFingerprint(*blake3::hash(bytes).as_bytes())
}

/// Fingerprint any serializable value through its JSON encoding.
pub fn fingerprint_serde<T: Serialize>(value: &T) -> Result<PlanFingerprint> {
    let bytes = serde_json::to_vec(value).map_err(|e| Error::Hash(e.to_string()))?;
    Ok(fingerprint_bytes(&bytes))
}
