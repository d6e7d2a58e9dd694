//! Process Query use case — the query pipeline.
//!
//! Composes [`ToolSelector`] → [`ToolDispatcher`] → [`ResponseSynthesizer`]
//! into the single entry point used by every front end.
//!
//! | Stage failure | Effect |
//! |---------------|--------|
//! | selection (gateway, timeout, unparseable output) | logged, treated as zero tools |
//! | a tool (unknown, error, panic, timeout) | `failure` entry in `tool_results` |
//! | synthesis | [`ProcessQueryError::Synthesis`] returned to the caller |

use crate::config::ExecutionParams;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger};
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::tool_executor::ToolExecutorPort;
use crate::use_cases::dispatch_tools::ToolDispatcher;
use crate::use_cases::select_tools::ToolSelector;
use crate::use_cases::synthesize_response::{ResponseSynthesizer, SynthesisError};
use rag_domain::util::truncate_str;
use rag_domain::{PipelineStage, Query, QueryOutcome, ToolRegistry, ToolResults};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that end a query without a response
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessQueryError {
    #[error("Query cannot be empty")]
    EmptyQuery,

    #[error("Failed to generate a response: {0}")]
    Synthesis(#[from] SynthesisError),
}

/// Use case for answering one query with tools.
///
/// Holds no per-query state: concurrent calls share only the read-only
/// registry, executors and gateway.
pub struct ProcessQueryUseCase {
    selector: ToolSelector,
    dispatcher: ToolDispatcher,
    synthesizer: ResponseSynthesizer,
    registry: Arc<ToolRegistry>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl ProcessQueryUseCase {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        registry: Arc<ToolRegistry>,
        executors: Vec<Arc<dyn ToolExecutorPort>>,
        params: ExecutionParams,
    ) -> Self {
        Self {
            selector: ToolSelector::new(gateway.clone(), registry.clone(), &params),
            dispatcher: ToolDispatcher::new(registry.clone(), executors, &params),
            synthesizer: ResponseSynthesizer::new(gateway, &params),
            registry,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Answer `query`: select tools, run them, synthesize the response.
    pub async fn process_query(&self, query: &str) -> Result<QueryOutcome, ProcessQueryError> {
        self.process_query_with_progress(query, &NoProgress).await
    }

    /// Same as [`process_query`](Self::process_query), with progress callbacks.
    pub async fn process_query_with_progress(
        &self,
        query: &str,
        progress: &dyn ProgressNotifier,
    ) -> Result<QueryOutcome, ProcessQueryError> {
        let query = Query::try_new(query).map_err(|_| ProcessQueryError::EmptyQuery)?;
        let text = query.content();
        info!("Processing query: {}", truncate_str(text, 100));

        // Stage 1: selection
        progress.on_stage_start(PipelineStage::Selection, 1);
        let tool_calls = match self.selector.select(text).await {
            Ok(calls) => {
                self.conversation_logger.log(ConversationEvent::new(
                    "tool_selection",
                    serde_json::json!({ "query": text, "tool_calls": &calls }),
                ));
                calls
            }
            Err(e) => {
                warn!("Tool selection failed, answering without tools: {}", e);
                self.conversation_logger.log(ConversationEvent::new(
                    "tool_selection",
                    serde_json::json!({ "query": text, "error": e.to_string() }),
                ));
                Vec::new()
            }
        };
        progress.on_stage_complete(PipelineStage::Selection);
        info!("Selected {} tool call(s)", tool_calls.len());

        // Stage 2: dispatch
        let tool_results = if tool_calls.is_empty() {
            ToolResults::new()
        } else {
            progress.on_stage_start(PipelineStage::Dispatch, tool_calls.len());
            let results = self
                .dispatcher
                .dispatch_with_progress(&tool_calls, progress)
                .await;
            progress.on_stage_complete(PipelineStage::Dispatch);

            for result in results.values() {
                self.conversation_logger.log(ConversationEvent::new(
                    "tool_result",
                    serde_json::json!({
                        "tool": result.tool_name,
                        "success": result.is_success(),
                        "duration_ms": result.metadata.duration_ms,
                        "output": truncate_str(&result.render(), 2000),
                    }),
                ));
            }
            results
        };

        // Stage 3: synthesis
        progress.on_stage_start(PipelineStage::Synthesis, 1);
        let synthesis = self.synthesizer.synthesize(text, &tool_results).await;
        progress.on_stage_complete(PipelineStage::Synthesis);

        let response = match synthesis {
            Ok(response) => response,
            Err(e) => {
                warn!("Response generation failed: {}", e);
                self.conversation_logger.log(ConversationEvent::new(
                    "query_failed",
                    serde_json::json!({ "query": text, "error": e.to_string() }),
                ));
                return Err(e.into());
            }
        };

        self.conversation_logger.log(ConversationEvent::new(
            "response_generated",
            serde_json::json!({
                "query": text,
                "response": response,
                "tools": tool_calls.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            }),
        ));
        info!(
            "Query complete ({} tool result(s), {} failed)",
            tool_results.len(),
            tool_results.values().filter(|r| !r.is_success()).count()
        );

        Ok(QueryOutcome::new(response, tool_calls, tool_results))
    }
}
