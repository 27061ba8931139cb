//! Reference-range classification of extracted biomarker values.

use crate::error::AdvisorError;
use crate::models::biomarker::{
    BiomarkerReading, BiomarkerStatus, FlaggedBiomarker, FlaggedBiomarkers,
};

use super::reference::{BiomarkerReference, ReferenceRanges};

/// Unit reported for biomarkers missing from the reference table.
const UNKNOWN_UNIT: &str = "unknown";

/// Classify one value against a reference band.
///
/// Hard bounds are checked before the optimal band: a value below `low`
/// reports `Low` even though it also falls outside the optimal band, and
/// likewise for `High` above `high`.
pub fn classify(value: f64, reference: &BiomarkerReference) -> BiomarkerStatus {
    if value < reference.low {
        BiomarkerStatus::Low
    } else if value > reference.high {
        BiomarkerStatus::High
    } else if value < reference.optimal_low || value > reference.optimal_high {
        BiomarkerStatus::Borderline
    } else {
        BiomarkerStatus::Optimal
    }
}

/// Flag every reading against the table, preserving input order.
///
/// Unknown biomarker names are not errors: they degrade to `NoReference`
/// with an `"unknown"` unit. Non-finite values fail fast because no band
/// can classify them.
pub fn flag(
    readings: &[BiomarkerReading],
    ranges: &ReferenceRanges,
) -> Result<FlaggedBiomarkers, AdvisorError> {
    let mut flagged = FlaggedBiomarkers::new();
    for reading in readings {
        if !reading.value.is_finite() {
            return Err(AdvisorError::InvalidInput(format!(
                "non-numeric value {} for biomarker '{}'",
                reading.value, reading.name,
            )));
        }

        let marker = match ranges.lookup(&reading.name) {
            None => FlaggedBiomarker {
                name: reading.name.clone(),
                value: reading.value,
                unit: UNKNOWN_UNIT.to_string(),
                status: BiomarkerStatus::NoReference,
                reference: None,
            },
            Some(reference) => FlaggedBiomarker {
                name: reading.name.clone(),
                value: reading.value,
                unit: reference.unit.clone(),
                status: classify(reading.value, reference),
                reference: Some(format!(
                    "{}–{} {} (optimal)",
                    reference.optimal_low, reference.optimal_high, reference.unit,
                )),
            },
        };
        flagged.push(marker);
    }
    Ok(flagged)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(low: f64, optimal_low: f64, optimal_high: f64, high: f64) -> BiomarkerReference {
        BiomarkerReference {
            low,
            optimal_low,
            optimal_high,
            high,
            unit: "mg/dL".to_string(),
        }
    }

    fn reading(name: &str, value: f64) -> BiomarkerReading {
        BiomarkerReading {
            name: name.to_string(),
            value,
        }
    }

    // ── classify: rule order ────────────────────────────

    #[test]
    fn below_hard_low_is_low() {
        let r = reference(70.0, 75.0, 100.0, 126.0);
        assert_eq!(classify(50.0, &r), BiomarkerStatus::Low);
    }

    #[test]
    fn above_hard_high_is_high() {
        let r = reference(70.0, 70.0, 100.0, 126.0);
        assert_eq!(classify(130.0, &r), BiomarkerStatus::High);
    }

    #[test]
    fn outside_optimal_band_is_borderline() {
        let r = reference(70.0, 80.0, 100.0, 126.0);
        assert_eq!(classify(75.0, &r), BiomarkerStatus::Borderline);
        assert_eq!(classify(110.0, &r), BiomarkerStatus::Borderline);
    }

    #[test]
    fn inside_optimal_band_is_optimal() {
        let r = reference(70.0, 80.0, 100.0, 126.0);
        assert_eq!(classify(90.0, &r), BiomarkerStatus::Optimal);
    }

    #[test]
    fn hard_bound_takes_precedence_over_band() {
        // 60 fails both the hard low check and the band check; the hard
        // bound wins because it is tested first.
        let r = reference(70.0, 80.0, 100.0, 126.0);
        assert_eq!(classify(60.0, &r), BiomarkerStatus::Low);
        assert_eq!(classify(200.0, &r), BiomarkerStatus::High);
    }

    // ── classify: boundary values ───────────────────────

    #[test]
    fn value_exactly_at_low_is_not_low() {
        let r = reference(70.0, 80.0, 100.0, 126.0);
        // Comparison is strict: v < low.
        assert_eq!(classify(70.0, &r), BiomarkerStatus::Borderline);
    }

    #[test]
    fn value_exactly_at_high_is_not_high() {
        let r = reference(70.0, 80.0, 100.0, 126.0);
        assert_eq!(classify(126.0, &r), BiomarkerStatus::Borderline);
    }

    #[test]
    fn band_edges_are_optimal() {
        let r = reference(70.0, 80.0, 100.0, 126.0);
        assert_eq!(classify(80.0, &r), BiomarkerStatus::Optimal);
        assert_eq!(classify(100.0, &r), BiomarkerStatus::Optimal);
    }

    #[test]
    fn coincident_low_and_band_edge_is_optimal_at_the_edge() {
        // Tables like glucose share low == optimal_low.
        let r = reference(70.0, 70.0, 100.0, 126.0);
        assert_eq!(classify(70.0, &r), BiomarkerStatus::Optimal);
    }

    // ── flag: table integration ─────────────────────────

    #[test]
    fn glucose_110_is_borderline() {
        let ranges = ReferenceRanges::standard();
        let flagged = flag(&[reading("glucose", 110.0)], &ranges).unwrap();
        assert_eq!(flagged.get("glucose").unwrap().status, BiomarkerStatus::Borderline);
    }

    #[test]
    fn glucose_130_is_high() {
        let ranges = ReferenceRanges::standard();
        let flagged = flag(&[reading("glucose", 130.0)], &ranges).unwrap();
        assert_eq!(flagged.get("glucose").unwrap().status, BiomarkerStatus::High);
    }

    #[test]
    fn hdl_70_is_optimal() {
        let ranges = ReferenceRanges::standard();
        let flagged = flag(&[reading("hdl", 70.0)], &ranges).unwrap();
        assert_eq!(flagged.get("hdl").unwrap().status, BiomarkerStatus::Optimal);
    }

    #[test]
    fn flagged_entry_carries_unit_and_reference() {
        let ranges = ReferenceRanges::standard();
        let flagged = flag(&[reading("glucose", 95.0)], &ranges).unwrap();
        let glucose = flagged.get("glucose").unwrap();
        assert_eq!(glucose.unit, "mg/dL");
        assert_eq!(glucose.reference.as_deref(), Some("70–100 mg/dL (optimal)"));
    }

    #[test]
    fn unknown_marker_degrades_to_no_reference() {
        let ranges = ReferenceRanges::standard();
        for value in [0.0, 47.5, 1.0e9, -12.0] {
            let flagged = flag(&[reading("homocysteine", value)], &ranges).unwrap();
            let marker = flagged.get("homocysteine").unwrap();
            assert_eq!(marker.status, BiomarkerStatus::NoReference);
            assert_eq!(marker.unit, "unknown");
            assert!(marker.reference.is_none());
        }
    }

    #[test]
    fn non_finite_value_fails_fast() {
        let ranges = ReferenceRanges::standard();
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = flag(&[reading("glucose", bad)], &ranges).unwrap_err();
            assert!(matches!(err, AdvisorError::InvalidInput(_)), "accepted {bad}");
        }
    }

    #[test]
    fn output_preserves_input_order() {
        let ranges = ReferenceRanges::standard();
        let readings = vec![
            reading("tsh", 2.0),
            reading("ldl", 150.0),
            reading("glucose", 90.0),
        ];
        let flagged = flag(&readings, &ranges).unwrap();
        let names: Vec<&str> = flagged.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["tsh", "ldl", "glucose"]);
    }

    #[test]
    fn empty_input_flags_to_empty_output() {
        let ranges = ReferenceRanges::standard();
        let flagged = flag(&[], &ranges).unwrap();
        assert!(flagged.is_empty());
    }
}
