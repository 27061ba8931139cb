//! Biomarker extraction from already-extracted report text.
//!
//! Extraction never fails on a missing biomarker: a recognizer that finds
//! no label-plus-value contributes nothing, and the result simply lacks
//! that entry. Only the orchestrator treats a fully empty result as an
//! error, before any network call happens.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::biomarker::{BiomarkerReading, BloodworkExtraction};

/// Numeric token accepted after a label: integer or decimal.
const VALUE_TOKEN: &str = r"(\d+\.?\d*)";

/// Label synonyms per biomarker, in priority order.
///
/// Each label matches case-insensitively, followed by punctuation or
/// whitespace and a numeric token. Synonyms become regex alternatives, so
/// the earlier one wins when two could match at the same position, and
/// the leftmost occurrence in the text wins overall.
const RECOGNIZERS: &[(&str, &[&str])] = &[
    ("total_cholesterol", &[r"total\s+cholesterol"]),
    ("ldl", &[r"ldl", r"low\s+density"]),
    ("hdl", &[r"hdl", r"high\s+density"]),
    ("triglycerides", &[r"triglycerides?"]),
    ("glucose", &[r"glucose"]),
    // Tolerates the "ha1c" OCR misread alongside the proper spelling.
    ("hba1c", &[r"hb?a1c"]),
    ("hemoglobin", &[r"hemoglobin"]),
    ("hematocrit", &[r"hematocrit"]),
    ("wbc", &[r"wbc", r"white\s+blood"]),
    ("platelets", &[r"platelets?"]),
    ("vitamin_d", &[r"vitamin\s+d"]),
    ("vitamin_b12", &[r"vitamin\s+b12"]),
    ("ferritin", &[r"ferritin"]),
    ("iron", &[r"iron"]),
    ("tsh", &[r"tsh"]),
    ("creatinine", &[r"creatinine"]),
    ("bun", &[r"bun"]),
    ("alt", &[r"alt"]),
    ("ast", &[r"ast"]),
];

struct Recognizer {
    name: &'static str,
    pattern: Regex,
}

static COMPILED: LazyLock<Vec<Recognizer>> = LazyLock::new(|| {
    RECOGNIZERS
        .iter()
        .map(|(name, labels)| {
            let alternatives: Vec<String> = labels
                .iter()
                .map(|label| format!(r"{label}[:\s]+{VALUE_TOKEN}"))
                .collect();
            let pattern = Regex::new(&format!("(?i){}", alternatives.join("|")))
                .expect("valid recognizer pattern");
            Recognizer { name, pattern }
        })
        .collect()
});

/// Extract every recognizable biomarker from `text`.
///
/// The result keeps recognizer-table order and carries the `source` tag.
pub fn extract(text: &str, source: &str) -> BloodworkExtraction {
    let mut readings = Vec::new();
    for recognizer in COMPILED.iter() {
        let Some(caps) = recognizer.pattern.captures(text) else {
            continue;
        };
        // First non-empty capture group belongs to the synonym that matched.
        let Some(token) = caps.iter().skip(1).flatten().next() else {
            continue;
        };
        // A token the grammar accepted but f64 refuses is skipped, not an error.
        if let Ok(value) = token.as_str().parse::<f64>() {
            readings.push(BiomarkerReading {
                name: recognizer.name.to_string(),
                value,
            });
        }
    }

    tracing::debug!(source, count = readings.len(), "biomarker extraction complete");
    BloodworkExtraction {
        source: source.to_string(),
        readings,
    }
}
