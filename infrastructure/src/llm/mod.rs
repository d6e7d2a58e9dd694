//! Language-model endpoint adapter
//!
//! Talks to an OpenAI-compatible chat-completions server (LM Studio by
//! default) and implements the application's `LlmGateway` port.

pub mod gateway;
pub mod protocol;

pub use gateway::LmStudioGateway;
