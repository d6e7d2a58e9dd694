//! Tool dispatch use case.
//!
//! Executes the selected [`ToolInvocation`]s against their executors and
//! aggregates one [`ToolResult`] per attempted tool name.
//!
//! Every invocation is isolated: an unknown name, an executor error, a
//! panic, or an elapsed timeout becomes a failure entry and never aborts
//! the remaining invocations.
//!
//! # Duplicate names
//!
//! Results are applied to the map in invocation order after all
//! executions finish, so when the model selects the same tool twice the
//! **last** occurrence wins, independent of completion order.

use crate::config::ExecutionParams;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::tool_executor::ToolExecutorPort;
use crate::use_cases::tool_helpers::tool_args_preview;
use futures::{FutureExt, StreamExt, stream};
use rag_domain::{ToolError, ToolInvocation, ToolRegistry, ToolResult, ToolResults};
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Runs tool invocations with bounded concurrency and per-call timeouts.
pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
    executors: HashMap<String, Arc<dyn ToolExecutorPort>>,
    tool_timeout: Duration,
    max_concurrent: usize,
}

impl ToolDispatcher {
    pub fn new(
        registry: Arc<ToolRegistry>,
        executors: Vec<Arc<dyn ToolExecutorPort>>,
        params: &ExecutionParams,
    ) -> Self {
        let executors = executors
            .into_iter()
            .map(|e| (e.tool_name().to_string(), e))
            .collect();

        Self {
            registry,
            executors,
            tool_timeout: params.tool_timeout,
            max_concurrent: params.concurrency(),
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Execute `invocations` and collect one result per distinct tool name.
    pub async fn dispatch(&self, invocations: &[ToolInvocation]) -> ToolResults {
        self.dispatch_with_progress(invocations, &NoProgress).await
    }

    /// Like [`dispatch`](Self::dispatch), reporting each finished tool.
    pub async fn dispatch_with_progress(
        &self,
        invocations: &[ToolInvocation],
        progress: &dyn ProgressNotifier,
    ) -> ToolResults {
        // Collected up front: the dispatch future must stay spawnable.
        let pending: Vec<_> = invocations
            .iter()
            .enumerate()
            .map(|(index, invocation)| async move {
                let result = self.run_one(invocation).await;
                progress.on_tool_complete(&result);
                (index, result)
            })
            .collect();

        let mut finished: Vec<(usize, ToolResult)> = stream::iter(pending)
            .buffer_unordered(self.max_concurrent)
            .collect()
            .await;

        finished.sort_by_key(|(index, _)| *index);

        let mut results = HashMap::with_capacity(finished.len());
        for (_, result) in finished {
            if results.contains_key(&result.tool_name) {
                debug!("Duplicate invocation of {}, keeping the later result", result.tool_name);
            }
            results.insert(result.tool_name.clone(), result);
        }
        results
    }

    async fn run_one(&self, invocation: &ToolInvocation) -> ToolResult {
        let name = invocation.name.as_str();

        if !self.registry.contains(name) {
            warn!("Rejected invocation of unknown tool: {}", name);
            return ToolResult::failure(name, ToolError::unknown_tool());
        }

        let Some(executor) = self.executors.get(name) else {
            warn!("Tool {} is enabled but has no executor", name);
            return ToolResult::failure(
                name,
                ToolError::unavailable(format!("No executor registered for {}", name)),
            );
        };

        debug!("Executing {} ({})", name, tool_args_preview(invocation));
        let started = Instant::now();
        let execution = AssertUnwindSafe(executor.execute(&invocation.arguments)).catch_unwind();

        let result = match tokio::time::timeout(self.tool_timeout, execution).await {
            Ok(Ok(Ok(payload))) => ToolResult::success(name, payload),
            Ok(Ok(Err(error))) => {
                warn!("Tool {} failed: {}", name, error);
                ToolResult::failure(name, error)
            }
            Ok(Err(panic)) => {
                let message = panic_message(panic.as_ref());
                warn!("Tool {} panicked: {}", name, message);
                ToolResult::failure(
                    name,
                    ToolError::execution_failed(format!("Tool panicked: {}", message)),
                )
            }
            Err(_) => {
                warn!("Tool {} timed out after {:?}", name, self.tool_timeout);
                ToolResult::failure(name, ToolError::timeout())
            }
        };

        result.with_duration(started.elapsed().as_millis() as u64)
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rag_domain::{ToolArguments, ToolPayload, ToolSpec};
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Echoes one argument back, after an optional delay.
    struct EchoExecutor {
        name: &'static str,
        key: &'static str,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl EchoExecutor {
        fn new(name: &'static str, key: &'static str) -> Self {
            Self {
                name,
                key,
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    #[async_trait]
    impl ToolExecutorPort for EchoExecutor {
        fn tool_name(&self) -> &str {
            self.name
        }

        async fn execute(&self, arguments: &ToolArguments) -> Result<ToolPayload, ToolError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let value = arguments.require_str(self.key)?;
            Ok(ToolPayload::text(format!("{}={}", self.key, value)))
        }
    }

    struct FailingExecutor;

    #[async_trait]
    impl ToolExecutorPort for FailingExecutor {
        fn tool_name(&self) -> &str {
            "weather_tool"
        }

        async fn execute(&self, _arguments: &ToolArguments) -> Result<ToolPayload, ToolError> {
            Err(ToolError::execution_failed("HTTP 503"))
        }
    }

    struct PanickingExecutor;

    #[async_trait]
    impl ToolExecutorPort for PanickingExecutor {
        fn tool_name(&self) -> &str {
            "search_tool"
        }

        async fn execute(&self, _arguments: &ToolArguments) -> Result<ToolPayload, ToolError> {
            panic!("search backend exploded");
        }
    }

    struct HangingExecutor;

    #[async_trait]
    impl ToolExecutorPort for HangingExecutor {
        fn tool_name(&self) -> &str {
            "weather_tool"
        }

        async fn execute(&self, _arguments: &ToolArguments) -> Result<ToolPayload, ToolError> {
            std::future::pending().await
        }
    }

    fn registry() -> Arc<ToolRegistry> {
        Arc::new(ToolRegistry::all(vec![
            ToolSpec::new("calculator_tool", "Evaluate arithmetic"),
            ToolSpec::new("weather_tool", "Current weather"),
            ToolSpec::new("search_tool", "Web search"),
            ToolSpec::new("list_files_tool", "List files"),
        ]))
    }

    fn params() -> ExecutionParams {
        ExecutionParams::default().with_tool_timeout(Duration::from_millis(200))
    }

    fn calc(expression: &str) -> ToolInvocation {
        ToolInvocation::new("calculator_tool").with_arg("expression", expression)
    }

    fn weather(location: &str) -> ToolInvocation {
        ToolInvocation::new("weather_tool").with_arg("location", location)
    }

    #[tokio::test]
    async fn test_empty_invocations() {
        let dispatcher = ToolDispatcher::new(registry(), vec![], &params());
        assert!(dispatcher.dispatch(&[]).await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_tool_rejected_without_execution() {
        let calculator = Arc::new(EchoExecutor::new("calculator_tool", "expression"));
        let dispatcher = ToolDispatcher::new(registry(), vec![calculator.clone()], &params());

        let results = dispatcher
            .dispatch(&[ToolInvocation::new("delete_everything")])
            .await;

        let result = &results["delete_everything"];
        assert_eq!(result.failure_message(), Some("unknown tool"));
        assert_eq!(result.error().unwrap().code, "UNKNOWN_TOOL");
        assert_eq!(calculator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_executor_registered_for_disabled_tool_is_not_reachable() {
        let registry = Arc::new(ToolRegistry::from_catalog(
            vec![ToolSpec::new("calculator_tool", "Evaluate arithmetic")],
            Vec::<String>::new(),
        ));
        let calculator = Arc::new(EchoExecutor::new("calculator_tool", "expression"));
        let dispatcher = ToolDispatcher::new(registry, vec![calculator.clone()], &params());

        let results = dispatcher.dispatch(&[calc("1+1")]).await;

        assert_eq!(results["calculator_tool"].failure_message(), Some("unknown tool"));
        assert_eq!(calculator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_executor_is_unavailable() {
        let dispatcher = ToolDispatcher::new(registry(), vec![], &params());

        let results = dispatcher.dispatch(&[ToolInvocation::new("list_files_tool")]).await;

        assert_eq!(results["list_files_tool"].error().unwrap().code, "UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_keys_are_exactly_attempted_names() {
        let dispatcher = ToolDispatcher::new(
            registry(),
            vec![
                Arc::new(EchoExecutor::new("calculator_tool", "expression")),
                Arc::new(FailingExecutor),
            ],
            &params(),
        );
        let invocations = vec![
            calc("2+2"),
            weather("Seoul"),
            ToolInvocation::new("delete_everything"),
            ToolInvocation::new("list_files_tool"),
        ];

        let results = dispatcher.dispatch(&invocations).await;

        let keys: HashSet<&str> = results.keys().map(String::as_str).collect();
        let expected: HashSet<&str> = invocations.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(keys, expected);
        assert!(results["calculator_tool"].is_success());
        assert!(!results["weather_tool"].is_success());
    }

    #[tokio::test]
    async fn test_partial_failure_isolated() {
        let dispatcher = ToolDispatcher::new(
            registry(),
            vec![
                Arc::new(EchoExecutor::new("calculator_tool", "expression")),
                Arc::new(FailingExecutor),
            ],
            &params(),
        );

        let results = dispatcher.dispatch(&[weather("Seoul"), calc("2+2")]).await;

        assert_eq!(results["weather_tool"].failure_message(), Some("HTTP 503"));
        assert_eq!(
            results["calculator_tool"].payload(),
            Some(&ToolPayload::text("expression=2+2"))
        );
    }

    #[tokio::test]
    async fn test_invalid_argument_is_failure() {
        let dispatcher = ToolDispatcher::new(
            registry(),
            vec![Arc::new(EchoExecutor::new("calculator_tool", "expression"))],
            &params(),
        );

        let results = dispatcher.dispatch(&[ToolInvocation::new("calculator_tool")]).await;

        assert_eq!(results["calculator_tool"].error().unwrap().code, "INVALID_ARGUMENT");
    }

    #[tokio::test]
    async fn test_panic_isolated() {
        let dispatcher = ToolDispatcher::new(
            registry(),
            vec![
                Arc::new(EchoExecutor::new("calculator_tool", "expression")),
                Arc::new(PanickingExecutor),
            ],
            &params(),
        );

        let results = dispatcher
            .dispatch(&[ToolInvocation::new("search_tool").with_arg("query", "x"), calc("1")])
            .await;

        let failure = results["search_tool"].failure_message().unwrap();
        assert!(failure.contains("search backend exploded"));
        assert!(results["calculator_tool"].is_success());
    }

    #[tokio::test]
    async fn test_timeout_becomes_failure() {
        let dispatcher = ToolDispatcher::new(
            registry(),
            vec![
                Arc::new(HangingExecutor),
                Arc::new(EchoExecutor::new("calculator_tool", "expression")),
            ],
            &ExecutionParams::default().with_tool_timeout(Duration::from_millis(30)),
        );

        let results = dispatcher.dispatch(&[weather("Oslo"), calc("3*3")]).await;

        assert_eq!(results["weather_tool"].failure_message(), Some("timeout"));
        assert_eq!(results["weather_tool"].error().unwrap().code, "TIMEOUT");
        assert!(results["calculator_tool"].is_success());
    }

    #[tokio::test]
    async fn test_ordering_independence() {
        let executors = || -> Vec<Arc<dyn ToolExecutorPort>> {
            vec![
                Arc::new(EchoExecutor::new("calculator_tool", "expression")),
                Arc::new(EchoExecutor::new("weather_tool", "location").with_delay(Duration::from_millis(20))),
            ]
        };
        let forward = [weather("Seoul"), calc("2+2")];
        let reverse = [calc("2+2"), weather("Seoul")];

        let parallel = ToolDispatcher::new(registry(), executors(), &params());
        let sequential = ToolDispatcher::new(
            registry(),
            executors(),
            &params().with_max_concurrent_tools(1),
        );

        let a = parallel.dispatch(&forward).await;
        let b = parallel.dispatch(&reverse).await;
        let c = sequential.dispatch(&forward).await;

        for results in [&b, &c] {
            assert_eq!(results.len(), a.len());
            for (name, result) in &a {
                assert_eq!(results[name].outcome, result.outcome);
            }
        }
    }

    #[tokio::test]
    async fn test_idempotent_dispatch() {
        let dispatcher = ToolDispatcher::new(
            registry(),
            vec![Arc::new(EchoExecutor::new("calculator_tool", "expression"))],
            &params(),
        );
        let invocations = [calc("6*7"), ToolInvocation::new("delete_everything")];

        let first = dispatcher.dispatch(&invocations).await;
        let second = dispatcher.dispatch(&invocations).await;

        assert_eq!(first.len(), second.len());
        for (name, result) in &first {
            assert_eq!(second[name].outcome, result.outcome);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_dispatch_runs_inside_spawned_task() {
        let dispatcher = Arc::new(ToolDispatcher::new(
            registry(),
            vec![
                Arc::new(EchoExecutor::new("calculator_tool", "expression")),
                Arc::new(EchoExecutor::new("weather_tool", "location")),
            ],
            &params(),
        ));

        let handle = tokio::spawn({
            let dispatcher = dispatcher.clone();
            async move {
                let invocations = vec![calc("1+1"), weather("Busan")];
                dispatcher.dispatch(&invocations).await
            }
        });

        let results = handle.await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(
            results["weather_tool"].payload(),
            Some(&ToolPayload::text("location=Busan"))
        );
    }

    #[tokio::test]
    async fn test_duplicate_name_last_occurrence_wins() {
        // The first call finishes last, yet the later invocation's result is kept.
        struct SlowFirst;

        #[async_trait]
        impl ToolExecutorPort for SlowFirst {
            fn tool_name(&self) -> &str {
                "calculator_tool"
            }

            async fn execute(&self, arguments: &ToolArguments) -> Result<ToolPayload, ToolError> {
                let expression = arguments.require_str("expression")?;
                if expression == "first" {
                    tokio::time::sleep(Duration::from_millis(40)).await;
                }
                Ok(ToolPayload::text(expression))
            }
        }

        let dispatcher = ToolDispatcher::new(registry(), vec![Arc::new(SlowFirst)], &params());

        let results = dispatcher.dispatch(&[calc("first"), calc("second")]).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results["calculator_tool"].payload(), Some(&ToolPayload::text("second")));
    }

    #[tokio::test]
    async fn test_progress_reports_each_tool() {
        struct Counting(AtomicUsize);

        impl ProgressNotifier for Counting {
            fn on_stage_start(&self, _stage: rag_domain::PipelineStage, _total: usize) {}
            fn on_tool_complete(&self, _result: &ToolResult) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
            fn on_stage_complete(&self, _stage: rag_domain::PipelineStage) {}
        }

        let dispatcher = ToolDispatcher::new(
            registry(),
            vec![Arc::new(EchoExecutor::new("calculator_tool", "expression"))],
            &params(),
        );
        let progress = Counting(AtomicUsize::new(0));

        dispatcher
            .dispatch_with_progress(&[calc("1"), calc("2"), ToolInvocation::new("nope")], &progress)
            .await;

        assert_eq!(progress.0.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_duration_recorded() {
        let dispatcher = ToolDispatcher::new(
            registry(),
            vec![Arc::new(EchoExecutor::new("calculator_tool", "expression"))],
            &params(),
        );
        let results = dispatcher.dispatch(&[calc("1")]).await;
        assert!(results["calculator_tool"].metadata.duration_ms.is_some());
    }
}
