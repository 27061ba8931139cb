//! Conversational health check-in.
//!
//! A session is one rolling conversation: the system prompt stays at the
//! front, each `send` appends the user turn and the normalized reply.
//! Sessions hold no state beyond their own history.

use crate::error::AdvisorError;
use crate::llm::{ChatClient, ChatMessage, ChatRequest};
use crate::pipeline::normalize::normalize;

const CHECKIN_SYSTEM_PROMPT: &str = "\
You are a friendly health assistant checking in on how the user is feeling. \
Keep replies brief and supportive, ask short follow-up questions, and suggest \
seeing a doctor when symptoms sound concerning. Do NOT provide medical diagnoses.";

const CHECKIN_MAX_TOKENS: u32 = 512;
const CHECKIN_TEMPERATURE: f32 = 0.7;

/// One ongoing check-in conversation.
pub struct CheckinSession {
    client: Box<dyn ChatClient + Send + Sync>,
    model: String,
    history: Vec<ChatMessage>,
}

impl CheckinSession {
    pub fn new(client: Box<dyn ChatClient + Send + Sync>, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
            history: vec![ChatMessage::system(CHECKIN_SYSTEM_PROMPT)],
        }
    }

    /// Send one user turn and return the assistant's normalized reply.
    ///
    /// On failure the user turn is rolled back, so a failed call leaves
    /// the session exactly as it was and the turn can be retried.
    pub fn send(&mut self, text: &str) -> Result<String, AdvisorError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AdvisorError::InvalidInput(
                "message must not be empty".to_string(),
            ));
        }

        self.history.push(ChatMessage::user(text));
        let request = ChatRequest {
            model: self.model.clone(),
            messages: self.history.clone(),
            max_tokens: CHECKIN_MAX_TOKENS,
            temperature: CHECKIN_TEMPERATURE,
        };

        let raw = match self.client.chat(&request) {
            Ok(raw) => raw,
            Err(e) => {
                self.history.pop();
                return Err(e);
            }
        };

        let reply = normalize(&raw);
        self.history.push(ChatMessage::assistant(reply.clone()));
        Ok(reply)
    }

    /// Full conversation so far, system prompt included.
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }
}
