use std::borrow::Cow;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::faces::comparer::euclidean_distance;
use crate::faces::signature::FaceSignature;

/// Default distance for a blocklist hit; stricter than the identity threshold.
pub const BLOCKLIST_THRESHOLD: f64 = 0.5;

/// One blocklist element as supplied by the caller.
///
/// Stored signatures arrive either as a numeric array or as a string holding
/// the JSON of one. Any other shape is kept as `Other` so a single bad row
/// never rejects the whole blocklist.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BlocklistEntry {
    Signature(Vec<f64>),
    Encoded(String),
    Other(Value),
}

impl BlocklistEntry {
    /// Signature values of this entry. Numeric entries are borrowed; only
    /// encoded entries allocate.
    pub fn decode(&self) -> Option<Cow<'_, [f64]>> {
        match self {
            BlocklistEntry::Signature(values) => Some(Cow::Borrowed(values.as_slice())),
            BlocklistEntry::Encoded(text) => serde_json::from_str::<Vec<f64>>(text)
                .map(Cow::Owned)
                .ok(),
            BlocklistEntry::Other(_) => None,
        }
    }
}

impl From<FaceSignature> for BlocklistEntry {
    fn from(signature: FaceSignature) -> Self {
        BlocklistEntry::Signature(signature.into_inner())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlocklistMatch {
    pub is_match: bool,
    pub evidence: Option<String>,
}

impl BlocklistMatch {
    fn none() -> Self {
        Self::default()
    }

    fn hit(distance: f64) -> Self {
        Self {
            is_match: true,
            evidence: Some(format!("match_distance_{distance:.3}")),
        }
    }
}

/// Parses a serialized blocklist. A document that is not a JSON array yields
/// an empty blocklist.
pub fn parse_blocklist(raw: &str) -> Vec<BlocklistEntry> {
    match serde_json::from_str::<Vec<BlocklistEntry>>(raw) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(error = %err, "ignoring unparsable blocklist");
            Vec::new()
        }
    }
}

/// Scans `blocklist` in order and reports the first entry within `threshold`
/// of `candidate`. Entries that cannot be decoded are skipped.
pub fn check_blocklist(
    candidate: Option<&[f64]>,
    blocklist: &[BlocklistEntry],
    threshold: f64,
) -> BlocklistMatch {
    let candidate = match candidate {
        Some(values) if !values.is_empty() => values,
        _ => return BlocklistMatch::none(),
    };
    if blocklist.is_empty() {
        return BlocklistMatch::none();
    }

    for (index, entry) in blocklist.iter().enumerate() {
        let Some(blocked) = entry.decode() else {
            debug!(index, "skipping undecodable blocklist entry");
            continue;
        };
        let distance = euclidean_distance(candidate, &blocked);
        if distance.is_finite() && distance <= threshold {
            debug!(index, distance, "blocklist entry matched");
            return BlocklistMatch::hit(distance);
        }
    }

    BlocklistMatch::none()
}
