use serde::Serialize;

use super::biomarker::FlaggedBiomarkers;

/// Aggregate output of one bloodwork analysis run.
///
/// Constructed once per pipeline run and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    /// Source identifier the raw text came from (e.g. a filename).
    pub filename: String,
    pub flagged_biomarkers: FlaggedBiomarkers,
    pub model_used: String,
    /// Cleaned recommendation text, reasoning blocks already stripped.
    pub recommendations: String,
}

impl AnalysisResult {
    /// Render the saveable report: flagged values as JSON, then the
    /// recommendations. `generated_at` is stamped into the header so the
    /// rendering itself stays deterministic and testable.
    pub fn report_text(&self, generated_at: &str) -> String {
        let flagged_json = serde_json::to_string_pretty(&self.flagged_biomarkers)
            .expect("flagged biomarkers serialize");
        format!(
            "Bloodwork report — {} ({})\ngenerated: {}\n\nFLAGGED BIOMARKERS\n{}\n\nRECOMMENDATIONS\n{}\n",
            self.filename, self.model_used, generated_at, flagged_json, self.recommendations,
        )
    }
}

/// Result of one symptom-triage request.
#[derive(Debug, Clone, Serialize)]
pub struct TriageReport {
    pub condition: String,
    pub recommendation: String,
    pub model_used: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::biomarker::{BiomarkerStatus, FlaggedBiomarker};

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            filename: "labs_2026.pdf".into(),
            flagged_biomarkers: [FlaggedBiomarker {
                name: "glucose".into(),
                value: 110.0,
                unit: "mg/dL".into(),
                status: BiomarkerStatus::Borderline,
                reference: Some("70–100 mg/dL (optimal)".into()),
            }]
            .into_iter()
            .collect(),
            model_used: "deepseek-ai/DeepSeek-R1-0528".into(),
            recommendations: "Summary: mostly fine.".into(),
        }
    }

    #[test]
    fn serializes_contract_shape() {
        let value = serde_json::to_value(sample_result()).unwrap();
        assert_eq!(value["filename"], "labs_2026.pdf");
        assert_eq!(value["model_used"], "deepseek-ai/DeepSeek-R1-0528");
        assert_eq!(value["recommendations"], "Summary: mostly fine.");
        assert_eq!(value["flagged_biomarkers"]["glucose"]["status"], "borderline");
    }

    #[test]
    fn report_text_contains_all_sections() {
        let text = sample_result().report_text("2026-08-05T10:00:00Z");
        assert!(text.contains("FLAGGED BIOMARKERS"));
        assert!(text.contains("RECOMMENDATIONS"));
        assert!(text.contains("2026-08-05T10:00:00Z"));
        assert!(text.contains("glucose"));
        assert!(text.contains("Summary: mostly fine."));
    }

    #[test]
    fn report_text_is_deterministic_for_fixed_stamp() {
        let a = sample_result().report_text("stamp");
        let b = sample_result().report_text("stamp");
        assert_eq!(a, b);
    }
}
