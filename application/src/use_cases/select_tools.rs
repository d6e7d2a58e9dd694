//! Tool selection use case.
//!
//! Asks the model which tools apply to a query and parses its answer into
//! [`ToolInvocation`]s. Callers treat every [`SelectionError`] as "no tools
//! selected".

use crate::config::ExecutionParams;
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::use_cases::shared::complete_bounded;
use rag_domain::util::truncate_str;
use rag_domain::{PromptTemplate, SelectionParseError, ToolInvocation, ToolRegistry, parse_tool_invocations};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during tool selection
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Gateway error: {0}")]
    Gateway(GatewayError),

    #[error("Tool selection timed out")]
    Timeout,

    #[error("Could not parse tool selection: {0}")]
    Parse(#[from] SelectionParseError),
}

impl From<GatewayError> for SelectionError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Timeout => SelectionError::Timeout,
            other => SelectionError::Gateway(other),
        }
    }
}

/// Selects tools for a query with one low-temperature model call.
pub struct ToolSelector {
    gateway: Arc<dyn LlmGateway>,
    registry: Arc<ToolRegistry>,
    temperature: f32,
    timeout: Option<Duration>,
}

impl ToolSelector {
    pub fn new(gateway: Arc<dyn LlmGateway>, registry: Arc<ToolRegistry>, params: &ExecutionParams) -> Self {
        Self {
            gateway,
            registry,
            temperature: params.selection_temperature,
            timeout: params.llm_timeout,
        }
    }

    /// Select zero or more tool invocations for `query`.
    ///
    /// With no enabled tools the model is not consulted at all.
    pub async fn select(&self, query: &str) -> Result<Vec<ToolInvocation>, SelectionError> {
        if self.registry.is_empty() {
            debug!("No tools enabled, skipping tool selection");
            return Ok(Vec::new());
        }

        let prompt = PromptTemplate::tool_selection(query, &self.registry);
        debug!("Tool selection prompt: {} bytes", prompt.len());

        let raw = complete_bounded(self.gateway.as_ref(), &prompt, self.temperature, self.timeout).await?;
        debug!("Tool selection raw output: {}", truncate_str(&raw, 500));

        let invocations = parse_tool_invocations(&raw)?;
        debug!(
            "Selected tools: {:?}",
            invocations.iter().map(|c| c.name.as_str()).collect::<Vec<_>>()
        );
        Ok(invocations)
    }
}
