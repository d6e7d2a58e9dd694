//! LLM Gateway port
//!
//! Defines the interface for communicating with the language-model endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,
}

/// Connectivity and model probe result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Configured model name
    pub model: String,
    /// Whether the endpoint answered the probe
    pub api_available: bool,
}

/// Gateway for LLM communication
///
/// This port defines how the application layer talks to the model.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send a single prompt and return the completion text
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String, GatewayError>;

    /// Probe the endpoint. Never fails: an unreachable endpoint reports
    /// `api_available: false`.
    async fn model_info(&self) -> ModelInfo;
}
