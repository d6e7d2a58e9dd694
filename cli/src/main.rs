//! CLI entrypoint for agentic-rag
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use rag_application::{
    ConversationLogger, DocumentStorePort, LlmGateway, NoConversationLogger, ProcessQueryUseCase,
};
use rag_domain::ToolRegistry;
use rag_infrastructure::{
    ConfigLoader, FileConfig, JsonlConversationLogger, LmStudioGateway, LocalDocumentStore,
    build_executors, builtin_catalog,
};
use rag_presentation::{ChatRepl, Cli, ConsoleFormatter, OutputFormat, ProgressReporter};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, prelude::*};

/// Install the stderr subscriber, plus a file layer when `log_file` is set.
///
/// The returned guard must live until exit so buffered lines are flushed.
fn init_tracing(verbose: u8, config: &FileConfig) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let mut guard = None;
    let file_layer = config.logging.log_file.as_ref().and_then(|path| {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            let _ = std::fs::create_dir_all(parent);
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| eprintln!("Warning: cannot open log file {}: {}", path.display(), e))
            .ok()?;
        let (writer, worker_guard) = tracing_appender::non_blocking(file);
        guard = Some(worker_guard);
        Some(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
    });

    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    if cli.no_config {
        return Ok(ConfigLoader::load_defaults());
    }
    ConfigLoader::load(cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!("{}", e))
        .context("Failed to load configuration")
}

fn show_config(cli: &Cli, config: &FileConfig) -> Result<()> {
    for line in ConfigLoader::describe_sources(cli.config.as_deref()) {
        println!("{}", line);
    }

    let mut shown = config.clone();
    if shown.tools.weather.api_key.is_some() {
        shown.tools.weather.api_key = Some("********".to_string());
    }
    println!();
    println!("Effective configuration:");
    println!("{}", toml::to_string_pretty(&shown)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    let _log_guard = init_tracing(cli.verbose, &config);

    info!("Starting agentic-rag");

    for issue in config.validate() {
        warn!("Configuration issue: {}", issue);
        eprintln!("Warning: {}", issue);
    }

    if cli.show_config {
        return show_config(&cli, &config);
    }

    // === Dependency Injection ===
    let registry = Arc::new(ToolRegistry::from_catalog(
        builtin_catalog(config.rag.top_k.max(1)),
        &config.tools.enabled,
    ));

    if cli.tools {
        print!("{}", ConsoleFormatter::format_tools(&registry));
        return Ok(());
    }

    let lm_studio = LmStudioGateway::new(
        &config.llm.base_url,
        &config.llm.api_key,
        &config.llm.model,
        Duration::from_secs(config.llm.timeout_seconds.max(1)),
    )
    .with_max_retries(config.llm.max_retries);
    let endpoint = lm_studio.base_url().to_string();
    let gateway: Arc<dyn LlmGateway> = Arc::new(lm_studio);

    if cli.model_info {
        let info = gateway.model_info().await;
        print!("{}", ConsoleFormatter::format_model_info(&info, &endpoint));
        return Ok(());
    }

    let store: Arc<dyn DocumentStorePort> = Arc::new(LocalDocumentStore::open(
        &config.rag.documents_dir,
        config.rag.chunk_size.max(1),
        config.effective_chunk_overlap(),
    )?);

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.tools.timeout_seconds.max(1)))
        .build()?;
    let executors = build_executors(&registry, &config.to_tool_settings(), store, http);

    let conversation_logger: Arc<dyn ConversationLogger> = match &config.logging.conversation_log
    {
        Some(path) => match JsonlConversationLogger::open(path) {
            Some(logger) => Arc::new(logger),
            None => Arc::new(NoConversationLogger),
        },
        None => Arc::new(NoConversationLogger),
    };

    let use_case = Arc::new(
        ProcessQueryUseCase::new(
            gateway.clone(),
            registry.clone(),
            executors,
            config.to_execution_params(),
        )
        .with_conversation_logger(conversation_logger),
    );

    // Chat mode
    if cli.chat {
        let mut repl = ChatRepl::new(use_case, gateway, endpoint)
            .with_progress(!cli.quiet)
            .with_debug(cli.output == OutputFormat::Debug);
        repl.run().await?;
        return Ok(());
    }

    // Single query mode - query is required
    let Some(query) = cli.query.as_deref() else {
        bail!("A query is required. Use --chat for interactive mode.");
    };

    let outcome = if cli.quiet {
        use_case.process_query(query).await?
    } else {
        let progress = ProgressReporter::new();
        use_case.process_query_with_progress(query, &progress).await?
    };

    let output = match cli.output {
        OutputFormat::Text => ConsoleFormatter::format_text(&outcome),
        OutputFormat::Json => ConsoleFormatter::format_json(&outcome),
        OutputFormat::Debug => ConsoleFormatter::format_debug(query, &outcome),
    };
    println!("{}", output.trim_end());

    Ok(())
}
