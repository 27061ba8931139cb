//! Prompt construction for the report model call.
//!
//! Pure string building: no network I/O, no input mutation, and
//! byte-identical output for identical inputs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::biomarker::FlaggedBiomarkers;
use crate::models::profile::UserProfile;

/// Placeholder rendered for profile fields the caller did not supply.
const UNKNOWN: &str = "unknown";

// ═══════════════════════════════════════════════════════════
// Persona
// ═══════════════════════════════════════════════════════════

/// Named system-prompt variants the orchestrator selects between.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    /// Verbose clinical-nutritionist persona with fully sectioned output.
    #[default]
    ClinicalNutritionist,
    /// Terse coach persona; forbids exposing internal reasoning.
    ConciseCoach,
}

impl Persona {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClinicalNutritionist => "clinical_nutritionist",
            Self::ConciseCoach => "concise_coach",
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Persona {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clinical_nutritionist" | "nutritionist" => Ok(Self::ClinicalNutritionist),
            "concise_coach" | "coach" => Ok(Self::ConciseCoach),
            other => Err(format!(
                "unknown persona '{other}' (expected clinical_nutritionist or concise_coach)"
            )),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// System prompts
// ═══════════════════════════════════════════════════════════

const CLINICAL_NUTRITIONIST_SYSTEM: &str = "\
You are a certified clinical nutritionist and exercise physiologist. \
You analyze blood work data and provide evidence-based, personalized meal plans \
and exercise programs. Always:\n\
- Explain WHY each recommendation ties back to specific biomarker findings.\n\
- Prioritize safety — flag anything that warrants a doctor's visit.\n\
- Keep language clear, practical, and actionable.\n\
- Format your response with clear sections: \
**Summary**, **Key Concerns**, **7-Day Meal Plan**, **Exercise Program**, \
**Supplements to Consider**, **When to See a Doctor**.\n\
- Do NOT provide medical diagnoses.";

const CONCISE_COACH_SYSTEM: &str = "\
You are a no-nonsense health coach reviewing blood work. Be brief and direct. \
No introductions, no filler, and never reveal your internal reasoning or \
thought process in the reply.\n\
Rules:\n\
- Tie every recommendation to a specific biomarker finding, one line each.\n\
- Flag anything that warrants a doctor's visit.\n\
- Use the sections: **Summary**, **Key Concerns**, **7-Day Meal Plan**, \
**Exercise Program**, **Supplements to Consider**, **When to See a Doctor**.\n\
- Do NOT provide medical diagnoses. No disclaimers beyond that.";

/// Get the system prompt for a persona.
pub fn system_prompt(persona: Persona) -> &'static str {
    match persona {
        Persona::ClinicalNutritionist => CLINICAL_NUTRITIONIST_SYSTEM,
        Persona::ConciseCoach => CONCISE_COACH_SYSTEM,
    }
}

// ═══════════════════════════════════════════════════════════
// User prompt
// ═══════════════════════════════════════════════════════════

/// Build the user instruction: the flagged biomarker map as structured
/// JSON, the profile block (when a profile was supplied), and the exact
/// response sections expected back.
pub fn build_user_prompt(flagged: &FlaggedBiomarkers, profile: Option<&UserProfile>) -> String {
    let profile_text = profile.map(profile_block).unwrap_or_default();
    let markers_json =
        serde_json::to_string_pretty(flagged).expect("flagged biomarkers serialize");

    format!(
        "Here are the patient's blood work results with status flags:{profile_text}\n\n\
         ```json\n{markers_json}\n```\n\n\
         Please provide a comprehensive, personalized meal plan and exercise program \
         based on these results. Explain each recommendation in the context of the \
         specific biomarker values shown above. Structure the response with exactly \
         these sections: Summary, Key Concerns, 7-Day Meal Plan, Exercise Program, \
         Supplements to Consider, When to See a Doctor."
    )
}

/// Render the profile block. Missing fields become the explicit
/// "unknown" placeholder, never a dropped line, so the prompt shape is
/// stable no matter which fields a caller fills in.
fn profile_block(profile: &UserProfile) -> String {
    format!(
        "\n\nUser profile:\n\
         - Age: {}\n\
         - Sex: {}\n\
         - Weight: {} kg\n\
         - Height: {} cm\n\
         - Activity level: {}\n\
         - Health goals: {}\n\
         - Dietary restrictions: {}\n",
        profile
            .age
            .map(|v| v.to_string())
            .unwrap_or_else(|| UNKNOWN.to_string()),
        text_or_unknown(&profile.sex),
        num_or_unknown(profile.weight_kg),
        num_or_unknown(profile.height_cm),
        text_or_unknown(&profile.activity_level),
        text_or_unknown(&profile.goals),
        text_or_unknown(&profile.dietary_restrictions),
    )
}

fn text_or_unknown(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or(UNKNOWN)
}

fn num_or_unknown(field: Option<f64>) -> String {
    field
        .map(|v| v.to_string())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::biomarker::{BiomarkerStatus, FlaggedBiomarker};

    fn sample_flagged() -> FlaggedBiomarkers {
        [
            FlaggedBiomarker {
                name: "glucose".into(),
                value: 110.0,
                unit: "mg/dL".into(),
                status: BiomarkerStatus::Borderline,
                reference: Some("70–100 mg/dL (optimal)".into()),
            },
            FlaggedBiomarker {
                name: "hdl".into(),
                value: 70.0,
                unit: "mg/dL".into(),
                status: BiomarkerStatus::Optimal,
                reference: Some("60–999 mg/dL (optimal)".into()),
            },
        ]
        .into_iter()
        .collect()
    }

    fn sample_profile() -> UserProfile {
        UserProfile {
            age: Some(38),
            sex: Some("male".into()),
            goals: Some("lower cholesterol".into()),
            ..UserProfile::default()
        }
    }

    // ── System prompts ───────────────────────────────────

    #[test]
    fn nutritionist_prompt_names_all_sections() {
        let sp = system_prompt(Persona::ClinicalNutritionist);
        for section in [
            "**Summary**",
            "**Key Concerns**",
            "**7-Day Meal Plan**",
            "**Exercise Program**",
            "**Supplements to Consider**",
            "**When to See a Doctor**",
        ] {
            assert!(sp.contains(section), "missing section {section}");
        }
        assert!(sp.contains("Do NOT provide medical diagnoses"));
    }

    #[test]
    fn coach_prompt_forbids_exposed_reasoning() {
        let sp = system_prompt(Persona::ConciseCoach);
        assert!(sp.contains("never reveal your internal reasoning"));
        assert!(sp.contains("brief and direct"));
        assert!(sp.contains("Do NOT provide medical diagnoses"));
    }

    #[test]
    fn coach_prompt_is_the_terse_variant() {
        assert!(
            system_prompt(Persona::ConciseCoach).len()
                < system_prompt(Persona::ClinicalNutritionist).len()
        );
    }

    // ── User prompt ──────────────────────────────────────

    #[test]
    fn user_prompt_embeds_flagged_json() {
        let prompt = build_user_prompt(&sample_flagged(), None);
        assert!(prompt.contains("```json"));
        assert!(prompt.contains("\"glucose\""));
        assert!(prompt.contains("\"borderline\""));
        assert!(prompt.contains("70–100 mg/dL (optimal)"));
    }

    #[test]
    fn user_prompt_restates_expected_sections() {
        let prompt = build_user_prompt(&sample_flagged(), None);
        assert!(prompt.contains(
            "Summary, Key Concerns, 7-Day Meal Plan, Exercise Program, \
             Supplements to Consider, When to See a Doctor"
        ));
    }

    #[test]
    fn profile_block_omitted_without_profile() {
        let prompt = build_user_prompt(&sample_flagged(), None);
        assert!(!prompt.contains("User profile:"));
    }

    #[test]
    fn supplied_profile_fields_render_verbatim() {
        let prompt = build_user_prompt(&sample_flagged(), Some(&sample_profile()));
        assert!(prompt.contains("- Age: 38"));
        assert!(prompt.contains("- Sex: male"));
        assert!(prompt.contains("- Health goals: lower cholesterol"));
    }

    #[test]
    fn missing_profile_fields_render_as_unknown() {
        let prompt = build_user_prompt(&sample_flagged(), Some(&sample_profile()));
        assert!(prompt.contains("- Weight: unknown kg"));
        assert!(prompt.contains("- Height: unknown cm"));
        assert!(prompt.contains("- Activity level: unknown"));
        assert!(prompt.contains("- Dietary restrictions: unknown"));
    }

    #[test]
    fn fully_empty_profile_still_renders_every_line() {
        let prompt = build_user_prompt(&sample_flagged(), Some(&UserProfile::default()));
        assert_eq!(prompt.matches("unknown").count(), 7);
    }

    // ── Determinism ──────────────────────────────────────

    #[test]
    fn identical_inputs_build_identical_bytes() {
        let flagged = sample_flagged();
        let profile = sample_profile();
        let a = build_user_prompt(&flagged, Some(&profile));
        let b = build_user_prompt(&flagged, Some(&profile));
        assert_eq!(a, b);
    }

    // ── Persona plumbing ─────────────────────────────────

    #[test]
    fn persona_parses_from_str() {
        assert_eq!(
            "clinical_nutritionist".parse::<Persona>().unwrap(),
            Persona::ClinicalNutritionist
        );
        assert_eq!("coach".parse::<Persona>().unwrap(), Persona::ConciseCoach);
        assert!("oracle".parse::<Persona>().is_err());
    }

    #[test]
    fn persona_serializes_snake_case() {
        let json = serde_json::to_string(&Persona::ConciseCoach).unwrap();
        assert_eq!(json, "\"concise_coach\"");
    }

    #[test]
    fn persona_display_matches_as_str() {
        assert_eq!(Persona::ClinicalNutritionist.to_string(), "clinical_nutritionist");
    }
}
