//! Symptom triage: route a described condition to either a specialist
//! referral (severe) or over-the-counter guidance (mild), via one model
//! call.

use crate::error::AdvisorError;
use crate::llm::{ChatClient, ChatMessage, ChatRequest};
use crate::models::report::TriageReport;
use crate::pipeline::normalize::normalize;

/// Severity-routing instruction. Low temperature keeps the format tight.
const TRIAGE_SYSTEM_PROMPT: &str = "\
You are a medical assistant. Be brief and direct. No introductions, no filler.\n\
\n\
If the condition is SEVERE (cancer, heart disease, stroke, organ failure, serious infection, etc.):\n\
- One sentence: state it is serious.\n\
- Specialist to see: [name the exact type of doctor]\n\
- Reason: [one sentence why]\n\
\n\
If the condition is MILD (cold, flu, fever, headache, allergies, sore throat, minor pain, etc.):\n\
- Medications (list 2-3):\n\
  - [Brand / Generic] — [dose] — [how often] — [one warning if any]\n\
- Do: [2-3 bullet care tips, e.g. rest, fluids]\n\
- Avoid: [1-2 things to avoid]\n\
\n\
End with one line: \"See a doctor if symptoms worsen or last more than X days.\"\n\
No lengthy explanations. No disclaimers beyond the final line.";

const TRIAGE_TEMPERATURE: f32 = 0.2;
const TRIAGE_MAX_TOKENS: u32 = 800;

/// One-shot triage advisor over an injected chat client.
pub struct TriageAdvisor {
    client: Box<dyn ChatClient + Send + Sync>,
    model: String,
}

impl TriageAdvisor {
    pub fn new(client: Box<dyn ChatClient + Send + Sync>, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }

    /// Get a recommendation for a described condition.
    ///
    /// A blank condition is rejected before any network call.
    pub fn recommend(&self, condition: &str) -> Result<TriageReport, AdvisorError> {
        let condition = condition.trim();
        if condition.is_empty() {
            return Err(AdvisorError::InvalidInput(
                "condition must not be empty".to_string(),
            ));
        }

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(TRIAGE_SYSTEM_PROMPT),
                ChatMessage::user(format!("I think I might have: {condition}")),
            ],
            max_tokens: TRIAGE_MAX_TOKENS,
            temperature: TRIAGE_TEMPERATURE,
        };
        let reply = self.client.chat(&request)?;

        tracing::info!(condition, model = %self.model, "triage recommendation generated");
        Ok(TriageReport {
            condition: condition.to_string(),
            recommendation: normalize(&reply),
            model_used: self.model.clone(),
        })
    }
}
