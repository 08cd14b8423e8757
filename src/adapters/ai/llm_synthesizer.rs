//! Response synthesis backed by a hosted chat model.

use async_trait::async_trait;
use std::sync::Arc;

use crate::ports::{
    AIProvider, CompletionRequest, MessageRole, RedirectRequest, ResponseSynthesizer,
    SynthesisError, SynthesisRequest,
};

use super::prompts::{persuasion_prompt, redirect_prompt, SYSTEM_PROMPT};

pub struct LlmResponseSynthesizer {
    provider: Arc<dyn AIProvider>,
    temperature: f32,
    max_tokens: u32,
}

impl LlmResponseSynthesizer {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self {
            provider,
            temperature: 0.8,
            max_tokens: 64,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    async fn ask(
        &self,
        prompt: String,
        request: CompletionRequest,
    ) -> Result<String, SynthesisError> {
        let request = request
            .with_system_prompt(SYSTEM_PROMPT)
            .with_message(MessageRole::User, prompt)
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature);
        let response = self.provider.complete(request).await?;
        let text = response.content.trim();
        if text.is_empty() {
            return Err(SynthesisError::Empty);
        }
        Ok(text.to_string())
    }
}

#[async_trait]
impl ResponseSynthesizer for LlmResponseSynthesizer {
    async fn generate(&self, request: &SynthesisRequest) -> Result<String, SynthesisError> {
        tracing::debug!(
            session_id = %request.session_id,
            strategy = %request.strategy,
            recovery = request.is_recovery,
            "synthesizing reply"
        );
        self.ask(
            persuasion_prompt(request),
            CompletionRequest::new().for_session(request.session_id.clone()),
        )
        .await
    }

    async fn redirect(&self, request: &RedirectRequest) -> Result<String, SynthesisError> {
        self.ask(
            redirect_prompt(request),
            CompletionRequest::new().for_session(request.session_id.clone()),
        )
        .await
    }
}
