use crate::pipeline::prompt::Persona;

/// Application-level constants
pub const APP_NAME: &str = "Bloodlens";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// OpenAI-compatible chat-completions endpoint.
pub const DEFAULT_API_URL: &str = "https://api.featherless.ai/v1/chat/completions";

/// Default report model. Swap to any model the endpoint serves.
pub const DEFAULT_MODEL: &str = "deepseek-ai/DeepSeek-R1-0528";

/// Default triage model. Smaller and cheaper than the report model.
pub const DEFAULT_TRIAGE_MODEL: &str = "meta-llama/Meta-Llama-3.1-8B-Instruct";

/// Default check-in model. A non-reasoning chat model keeps turns fast.
pub const DEFAULT_CHECKIN_MODEL: &str = "deepseek-ai/DeepSeek-V3.2";

pub const DEFAULT_MAX_TOKENS: u32 = 3000;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Upper bound on one model call, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Environment variable consulted for the API credential when the caller
/// does not pass one explicitly.
pub const API_KEY_ENV: &str = "FEATHERLESS_API_KEY";

/// Default `RUST_LOG`-style filter when the environment sets none.
pub fn default_log_filter() -> &'static str {
    "info,bloodlens=debug"
}

/// Read the API key from the environment.
pub fn api_key_from_env() -> Option<String> {
    std::env::var(API_KEY_ENV).ok()
}

/// Per-run pipeline configuration. All of it is caller-supplied; the
/// defaults here are starting points, not silent fallbacks inside the
/// pipeline.
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Bound on the model call. Enforced by the HTTP client; carried
    /// here so one value describes the whole run.
    pub timeout_secs: u64,
    pub persona: Persona,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            persona: Persona::default(),
        }
    }
}

impl AdvisorConfig {
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_persona(mut self, persona: Persona) -> Self {
        self.persona = persona;
        self
    }
}
