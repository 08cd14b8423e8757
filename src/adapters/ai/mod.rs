//! AI Adapters.
//!
//! - `ChatCompletionsProvider` - OpenAI-compatible hosted models
//! - `MockAIProvider` - configurable mock for testing
//! - `LlmResponseSynthesizer` - persuasive replies through an `AIProvider`
//! - `CannedResponseSynthesizer` - fixed replies for offline mode

mod canned_synthesizer;
mod llm_synthesizer;
mod mock_provider;
mod openai_provider;
pub mod prompts;

pub use canned_synthesizer::CannedResponseSynthesizer;
pub use llm_synthesizer::LlmResponseSynthesizer;
pub use mock_provider::{MockAIProvider, MockError, MockResponse};
pub use openai_provider::{
    ChatCompletionsConfig, ChatCompletionsProvider, DEFAULT_BASE_URL, DEFAULT_MODEL,
};
