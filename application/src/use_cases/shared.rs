//! Shared utilities for use cases.

use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use std::time::Duration;

/// Call the model, bounded by `timeout` when one is set.
///
/// An elapsed bound is reported as [`GatewayError::Timeout`], the same as a
/// client-side timeout.
pub(crate) async fn complete_bounded(
    gateway: &dyn LlmGateway,
    prompt: &str,
    temperature: f32,
    timeout: Option<Duration>,
) -> Result<String, GatewayError> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, gateway.complete(prompt, temperature))
            .await
            .map_err(|_| GatewayError::Timeout)?,
        None => gateway.complete(prompt, temperature).await,
    }
}
