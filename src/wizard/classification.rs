//! Listing classification and the step indices each one hides.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Steps hidden for land parcels: rooms, features, energy, building, condition
const LAND_PARCEL_SKIPS: &[usize] = &[3, 4, 5, 7, 8];

/// Steps hidden for parking spaces: features, surfaces, building, condition
const PARKING_SKIPS: &[usize] = &[4, 6, 7, 8];

/// Category tag of a listing, read from the form data.
///
/// Known tags drive the skip rules; any other tag is kept verbatim and
/// hides nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Classification {
    #[default]
    Standard,
    LandParcel,
    Parking,
    Other(String),
}

impl Classification {
    /// Canonical tag for this classification
    pub fn tag(&self) -> &str {
        match self {
            Classification::Standard => "standard",
            Classification::LandParcel => "land_parcel",
            Classification::Parking => "parking",
            Classification::Other(tag) => tag,
        }
    }

    /// Parse a tag, folding case and `-`/space separators.
    pub fn from_tag(tag: &str) -> Self {
        let normalized = tag.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "" | "standard" => Classification::Standard,
            "land_parcel" | "land" | "plot" | "land_parcel_like" => Classification::LandParcel,
            "parking" | "garage" | "parking_like" => Classification::Parking,
            _ => Classification::Other(tag.trim().to_string()),
        }
    }

    /// All classifications with a dedicated skip rule
    pub fn known() -> &'static [Classification] {
        &[
            Classification::Standard,
            Classification::LandParcel,
            Classification::Parking,
        ]
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Classification {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_tag(s))
    }
}

impl From<String> for Classification {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<Classification> for String {
    fn from(classification: Classification) -> Self {
        classification.tag().to_string()
    }
}

/// Catalog indices that must never be shown for a classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipSet(BTreeSet<usize>);

impl SkipSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of skipped indices that fall inside a catalog of `len` steps
    pub fn count_below(&self, len: usize) -> usize {
        self.0.range(..len).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<usize> for SkipSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Skip rule for a classification. Index 0 is never skipped.
pub fn compute_skip_set(classification: &Classification) -> SkipSet {
    let indices: &[usize] = match classification {
        Classification::LandParcel => LAND_PARCEL_SKIPS,
        Classification::Parking => PARKING_SKIPS,
        Classification::Standard | Classification::Other(_) => &[],
    };
    indices.iter().copied().filter(|&i| i != 0).collect()
}
