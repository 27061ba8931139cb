pub mod client;
pub mod types;

pub use client::{ChatClient, FeatherlessClient, MockChatClient};
pub use types::{ChatCompletionResponse, ChatMessage, ChatRequest};
