use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

// ═══════════════════════════════════════════════════════════
// Status
// ═══════════════════════════════════════════════════════════

/// Classification of a biomarker value against its reference range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiomarkerStatus {
    /// Below the hard low bound.
    Low,
    /// Within the hard bounds but outside the optimal band.
    Borderline,
    /// Within the optimal band.
    Optimal,
    /// Above the hard high bound.
    High,
    /// The biomarker has no entry in the reference table.
    NoReference,
}

impl fmt::Display for BiomarkerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Borderline => write!(f, "borderline"),
            Self::Optimal => write!(f, "optimal"),
            Self::High => write!(f, "high"),
            Self::NoReference => write!(f, "no_reference"),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Readings
// ═══════════════════════════════════════════════════════════

/// A single biomarker value pulled out of report text.
#[derive(Debug, Clone, PartialEq)]
pub struct BiomarkerReading {
    pub name: String,
    pub value: f64,
}

/// Extraction output: the source tag plus every biomarker actually
/// detected, in recognizer-table order.
///
/// Undetected biomarkers are absent from `readings`, never present with
/// a null value. Serializes `readings` as a JSON object keyed by name.
#[derive(Debug, Clone, Serialize)]
pub struct BloodworkExtraction {
    #[serde(rename = "filename")]
    pub source: String,
    #[serde(rename = "biomarkers", serialize_with = "readings_as_map")]
    pub readings: Vec<BiomarkerReading>,
}

impl BloodworkExtraction {
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Value of a detected biomarker, if any.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.readings
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.value)
    }
}

fn readings_as_map<S>(readings: &[BiomarkerReading], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(readings.len()))?;
    for reading in readings {
        map.serialize_entry(&reading.name, &reading.value)?;
    }
    map.end()
}

// ═══════════════════════════════════════════════════════════
// Flagged biomarkers
// ═══════════════════════════════════════════════════════════

/// A biomarker reading joined with its reference classification.
#[derive(Debug, Clone, PartialEq)]
pub struct FlaggedBiomarker {
    pub name: String,
    pub value: f64,
    pub unit: String,
    pub status: BiomarkerStatus,
    /// Human-readable optimal band. `None` exactly when `status` is
    /// `NoReference`.
    pub reference: Option<String>,
}

/// Insertion-ordered collection of flagged biomarkers.
///
/// Serializes as a JSON object keyed by biomarker name,
/// `{name: {value, unit, status, reference?}}`, preserving the order
/// entries were inserted in, so identical inputs always produce
/// byte-identical output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlaggedBiomarkers(Vec<FlaggedBiomarker>);

impl FlaggedBiomarkers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, marker: FlaggedBiomarker) {
        self.0.push(marker);
    }

    pub fn get(&self, name: &str) -> Option<&FlaggedBiomarker> {
        self.0.iter().find(|m| m.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FlaggedBiomarker> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<FlaggedBiomarker> for FlaggedBiomarkers {
    fn from_iter<I: IntoIterator<Item = FlaggedBiomarker>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Serialize)]
struct FlaggedEntry<'a> {
    value: f64,
    unit: &'a str,
    status: BiomarkerStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference: Option<&'a str>,
}

impl Serialize for FlaggedBiomarkers {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for marker in &self.0 {
            map.serialize_entry(
                &marker.name,
                &FlaggedEntry {
                    value: marker.value,
                    unit: &marker.unit,
                    status: marker.status,
                    reference: marker.reference.as_deref(),
                },
            )?;
        }
        map.end()
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
