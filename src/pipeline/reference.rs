use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Sentinel meaning "no clinical upper bound" for a marker.
pub const NO_UPPER_BOUND: f64 = 999.0;

/// Reference band for one biomarker.
///
/// Invariant: `low <= optimal_low <= optimal_high <= high`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BiomarkerReference {
    pub low: f64,
    pub optimal_low: f64,
    pub optimal_high: f64,
    pub high: f64,
    /// Unit string, used verbatim downstream.
    pub unit: String,
}

impl BiomarkerReference {
    fn is_ordered(&self) -> bool {
        self.low <= self.optimal_low
            && self.optimal_low <= self.optimal_high
            && self.optimal_high <= self.high
    }
}

/// One row of an external reference-table file.
#[derive(Debug, Deserialize)]
struct NamedReference {
    name: String,
    #[serde(flatten)]
    reference: BiomarkerReference,
}

/// Errors from loading an external reference table.
#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("failed to read reference table {0}: {1}")]
    Load(String, String),

    #[error("failed to parse reference table {0}: {1}")]
    Parse(String, String),

    #[error("reference bounds out of order for '{0}'")]
    Invalid(String),
}

/// Immutable reference-range table.
///
/// Built once at process start (`standard()` or `from_json_file`) and
/// passed by reference into the flagging engine, never held as a
/// process-wide mutable singleton. Lookup is by exact key; synonym
/// normalization is the extractor's job, not this table's.
#[derive(Debug, Clone)]
pub struct ReferenceRanges {
    entries: Vec<(String, BiomarkerReference)>,
}

fn entry(
    name: &str,
    low: f64,
    optimal_low: f64,
    optimal_high: f64,
    high: f64,
    unit: &str,
) -> (String, BiomarkerReference) {
    (
        name.to_string(),
        BiomarkerReference {
            low,
            optimal_low,
            optimal_high,
            high,
            unit: unit.to_string(),
        },
    )
}

impl ReferenceRanges {
    /// The standard clinical vocabulary: 19 markers.
    pub fn standard() -> Self {
        Self {
            entries: vec![
                entry("total_cholesterol", 0.0, 0.0, 200.0, 240.0, "mg/dL"),
                entry("ldl", 0.0, 0.0, 100.0, 160.0, "mg/dL"),
                entry("hdl", 40.0, 60.0, NO_UPPER_BOUND, NO_UPPER_BOUND, "mg/dL"),
                entry("triglycerides", 0.0, 0.0, 150.0, 200.0, "mg/dL"),
                entry("glucose", 70.0, 70.0, 100.0, 126.0, "mg/dL"),
                entry("hba1c", 0.0, 0.0, 5.7, 6.5, "%"),
                entry("hemoglobin", 12.0, 13.5, 17.5, NO_UPPER_BOUND, "g/dL"),
                entry("hematocrit", 36.0, 41.0, 53.0, NO_UPPER_BOUND, "%"),
                entry("wbc", 4.5, 4.5, 11.0, 11.0, "K/uL"),
                entry("platelets", 150.0, 150.0, 400.0, 400.0, "K/uL"),
                entry("vitamin_d", 20.0, 40.0, 80.0, 100.0, "ng/mL"),
                entry("vitamin_b12", 200.0, 400.0, 900.0, NO_UPPER_BOUND, "pg/mL"),
                entry("ferritin", 12.0, 30.0, 300.0, 300.0, "ng/mL"),
                entry("iron", 60.0, 80.0, 170.0, 170.0, "ug/dL"),
                entry("tsh", 0.4, 0.4, 4.0, 4.0, "mIU/L"),
                entry("creatinine", 0.6, 0.7, 1.2, 1.3, "mg/dL"),
                entry("bun", 7.0, 7.0, 20.0, 25.0, "mg/dL"),
                entry("alt", 0.0, 0.0, 40.0, 56.0, "U/L"),
                entry("ast", 0.0, 0.0, 40.0, 56.0, "U/L"),
            ],
        }
    }

    /// Load a reference table from a JSON array of
    /// `{name, low, optimal_low, optimal_high, high, unit}` rows.
    ///
    /// Rows violating the bound ordering invariant are rejected.
    pub fn from_json_file(path: &Path) -> Result<Self, ReferenceError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ReferenceError::Load(path.display().to_string(), e.to_string())
        })?;
        let rows: Vec<NamedReference> = serde_json::from_str(&json).map_err(|e| {
            ReferenceError::Parse(path.display().to_string(), e.to_string())
        })?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            if !row.reference.is_ordered() {
                return Err(ReferenceError::Invalid(row.name));
            }
            entries.push((row.name, row.reference));
        }
        Ok(Self { entries })
    }

    /// Look up the reference band for a biomarker name.
    pub fn lookup(&self, name: &str) -> Option<&BiomarkerReference> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, r)| r)
    }

    /// Marker names in table order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
