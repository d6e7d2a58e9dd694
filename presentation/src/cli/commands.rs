//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// How a query outcome is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Only the final answer
    Text,
    /// The whole outcome (response, tool calls, tool results) as JSON
    Json,
    /// The answer plus the selected tool calls and every tool result
    Debug,
}

/// CLI arguments for agentic-rag
#[derive(Parser, Debug)]
#[command(name = "agentic-rag")]
#[command(author, version, about = "Tool-routing assistant backed by a local language model")]
#[command(long_about = r#"
agentic-rag answers a request in three stages:
1. Tool Selection: the model picks zero or more tools and their arguments
2. Tool Execution: the selected tools run concurrently, failures are isolated
3. Response Generation: the model writes the answer from the tool results

Available tools: search_tool, vector_search_tool, calculator_tool,
weather_tool, list_files_tool, excel_reader_tool.

Configuration is merged from (highest priority first):
1. AGENTIC_RAG_<SECTION>__<KEY> environment variables (.env is loaded)
2. --config <path>          Explicit config file
3. ./agentic-rag.toml       Project-level config
4. ~/.config/agentic-rag/config.toml   Global config

Example:
  agentic-rag "What is 1234 * 5678?"
  agentic-rag -o debug "Weather in Seoul and the latest AI news"
  agentic-rag --chat
"#)]
pub struct Cli {
    /// The request to answer (not required in chat mode)
    pub query: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration sources and the effective configuration, then exit
    #[arg(long)]
    pub show_config: bool,

    /// List the enabled tools and exit
    #[arg(long)]
    pub tools: bool,

    /// Probe the language-model endpoint and exit
    #[arg(long)]
    pub model_info: bool,
}
