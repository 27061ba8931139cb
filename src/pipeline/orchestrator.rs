//! End-to-end bloodwork analysis: extraction → flagging → prompt →
//! model call → normalization.

use std::fmt;

use crate::config::AdvisorConfig;
use crate::error::AdvisorError;
use crate::llm::{ChatClient, ChatMessage, ChatRequest};
use crate::models::profile::UserProfile;
use crate::models::report::AnalysisResult;

use super::extraction;
use super::flagging;
use super::normalize::normalize;
use super::prompt::{build_user_prompt, system_prompt};
use super::reference::ReferenceRanges;

/// Pipeline progress states. Every run moves left to right; any step can
/// drop to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Extracting,
    Flagging,
    PromptBuilding,
    AwaitingModel,
    Normalizing,
    Done,
    Failed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extracting => write!(f, "extracting"),
            Self::Flagging => write!(f, "flagging"),
            Self::PromptBuilding => write!(f, "prompt_building"),
            Self::AwaitingModel => write!(f, "awaiting_model"),
            Self::Normalizing => write!(f, "normalizing"),
            Self::Done => write!(f, "done"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Orchestrates one analysis run over an injected chat client.
///
/// Holds no cross-call state: every `analyze` invocation is independent
/// and safely retryable by the caller. No retries happen here. At most
/// one model call is issued per run, and an empty extraction halts the
/// pipeline before any network traffic.
pub struct BloodworkAdvisor {
    client: Box<dyn ChatClient + Send + Sync>,
    ranges: ReferenceRanges,
    config: AdvisorConfig,
}

impl BloodworkAdvisor {
    pub fn new(
        client: Box<dyn ChatClient + Send + Sync>,
        ranges: ReferenceRanges,
        config: AdvisorConfig,
    ) -> Self {
        Self {
            client,
            ranges,
            config,
        }
    }

    /// Run the full pipeline on already-extracted report text.
    pub fn analyze(
        &self,
        raw_text: &str,
        source: &str,
        profile: Option<&UserProfile>,
    ) -> Result<AnalysisResult, AdvisorError> {
        let _span = tracing::info_span!("analyze_bloodwork", source).entered();

        // Step 1: Extract biomarker readings
        transition(PipelineStage::Extracting);
        let extraction = extraction::extract(raw_text, source);
        if extraction.is_empty() {
            return Err(failed(AdvisorError::NoBiomarkers));
        }

        // Step 2: Flag each reading against the reference table
        transition(PipelineStage::Flagging);
        let flagged = flagging::flag(&extraction.readings, &self.ranges).map_err(failed)?;

        // Step 3: Build the prompt pair
        transition(PipelineStage::PromptBuilding);
        let system = system_prompt(self.config.persona);
        let user = build_user_prompt(&flagged, profile);

        // Step 4: The single model call of the run
        transition(PipelineStage::AwaitingModel);
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };
        let raw_reply = self.client.chat(&request).map_err(failed)?;

        // Step 5: Strip reasoning artifacts and normalize whitespace
        transition(PipelineStage::Normalizing);
        let recommendations = normalize(&raw_reply);

        transition(PipelineStage::Done);
        tracing::info!(
            source,
            markers = flagged.len(),
            model = %self.config.model,
            "bloodwork analysis complete"
        );

        Ok(AnalysisResult {
            filename: extraction.source,
            flagged_biomarkers: flagged,
            model_used: self.config.model.clone(),
            recommendations,
        })
    }
}

fn transition(stage: PipelineStage) {
    tracing::debug!(%stage, "pipeline stage");
}

fn failed(err: AdvisorError) -> AdvisorError {
    tracing::warn!(stage = %PipelineStage::Failed, error = %err, "pipeline failed");
    err
}
