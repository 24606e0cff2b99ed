//! Manifest of collection items: the list of records whose media the run
//! downloads. Fetched once per run and held fully in memory.

pub mod error;
pub mod source;

pub use error::ManifestError;
pub use source::{HttpManifestSource, ManifestSource};

use serde::Deserialize;
use serde_json::Value;

use crate::types::AssetKind;

/// One manifest entry. Fields other than these are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManifestRecord {
    /// Token id; the API sends a number but strings are tolerated.
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub animation: Option<String>,
}

impl ManifestRecord {
    /// The id as a non-negative integer, if it is one.
    pub fn numeric_id(&self) -> Option<u64> {
        match &self.id {
            Value::Number(n) => n.as_u64().or_else(|| {
                n.as_f64()
                    .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                    .map(|f| f as u64)
            }),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// URL for the given asset kind; empty strings count as absent.
    pub fn url_for(&self, kind: AssetKind) -> Option<&str> {
        let url = match kind {
            AssetKind::Image => self.image.as_deref(),
            AssetKind::Animation => self.animation.as_deref(),
        };
        url.filter(|u| !u.trim().is_empty())
    }
}
