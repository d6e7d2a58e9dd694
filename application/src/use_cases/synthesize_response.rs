//! Response synthesis use case.
//!
//! Writes the final answer from the original query and the evidence block.
//! This is the one stage whose failure the pipeline cannot mask.

use crate::config::ExecutionParams;
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::use_cases::shared::complete_bounded;
use rag_domain::{PromptTemplate, ToolResults, render_evidence};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during response synthesis
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    #[error("Gateway error: {0}")]
    Gateway(GatewayError),

    #[error("Response generation timed out")]
    Timeout,

    #[error("No response from model")]
    EmptyResponse,
}

impl From<GatewayError> for SynthesisError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Timeout => SynthesisError::Timeout,
            other => SynthesisError::Gateway(other),
        }
    }
}

/// Produces the final answer with one model call.
pub struct ResponseSynthesizer {
    gateway: Arc<dyn LlmGateway>,
    temperature: f32,
    language: String,
    timeout: Option<Duration>,
}

impl ResponseSynthesizer {
    pub fn new(gateway: Arc<dyn LlmGateway>, params: &ExecutionParams) -> Self {
        Self {
            gateway,
            temperature: params.response_temperature,
            language: params.response_language.clone(),
            timeout: params.llm_timeout,
        }
    }

    /// Answer `query` from `results` (possibly empty).
    pub async fn synthesize(&self, query: &str, results: &ToolResults) -> Result<String, SynthesisError> {
        let evidence = render_evidence(results);
        let prompt = PromptTemplate::response_generation(query, &evidence, &self.language);
        debug!(
            "Response prompt: {} bytes, {} tool results",
            prompt.len(),
            results.len()
        );

        let response = complete_bounded(self.gateway.as_ref(), &prompt, self.temperature, self.timeout).await?;

        if response.trim().is_empty() {
            return Err(SynthesisError::EmptyResponse);
        }
        Ok(response)
    }
}
