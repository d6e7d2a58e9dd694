//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::{ConsoleFormatter, ProgressReporter};
use colored::Colorize;
use rag_application::{LlmGateway, NoProgress, ProcessQueryUseCase};
use rag_domain::QueryOutcome;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;
use std::sync::Arc;

/// Slash commands understood by the REPL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Tools,
    Model,
    Debug,
    History,
    Quit,
    Unknown(String),
}

impl ReplCommand {
    /// Parse a line starting with `/`. Returns `None` for ordinary input.
    pub fn parse(line: &str) -> Option<Self> {
        let command = line.trim().strip_prefix('/')?;
        let name = command.split_whitespace().next().unwrap_or("");
        Some(match name.to_lowercase().as_str() {
            "help" | "h" | "?" => Self::Help,
            "tools" => Self::Tools,
            "model" => Self::Model,
            "debug" => Self::Debug,
            "history" => Self::History,
            "quit" | "exit" | "q" => Self::Quit,
            _ => Self::Unknown(line.trim().to_string()),
        })
    }
}

/// Interactive chat REPL
pub struct ChatRepl {
    use_case: Arc<ProcessQueryUseCase>,
    gateway: Arc<dyn LlmGateway>,
    endpoint: String,
    show_progress: bool,
    debug: bool,
    history: Vec<(String, QueryOutcome)>,
}

impl ChatRepl {
    pub fn new(
        use_case: Arc<ProcessQueryUseCase>,
        gateway: Arc<dyn LlmGateway>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            use_case,
            gateway,
            endpoint: endpoint.into(),
            show_progress: true,
            debug: false,
            history: Vec::new(),
        }
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Start with debug output (tool calls and results) enabled
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    fn history_path() -> Option<PathBuf> {
        dirs::data_dir().map(|p| p.join("agentic-rag").join("history.txt"))
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = Self::history_path();
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            match rl.readline(">>> ") {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if let Some(command) = ReplCommand::parse(line) {
                        if self.handle_command(command).await {
                            break;
                        }
                        continue;
                    }

                    let _ = rl.add_history_entry(line);
                    self.process_query(line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│           agentic-rag - Chat Mode           │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!(
            "Tools: {}",
            self.use_case.registry().names().collect::<Vec<_>>().join(", ")
        );
        println!();
        Self::print_help();
    }

    fn print_help() {
        println!("Commands:");
        println!("  /help, /h, /?     - Show this help");
        println!("  /tools            - Show the enabled tools");
        println!("  /model            - Show the model and endpoint status");
        println!("  /debug            - Toggle tool call/result output");
        println!("  /history          - Show the questions of this session");
        println!("  /quit, /exit, /q  - Exit chat");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    async fn handle_command(&mut self, command: ReplCommand) -> bool {
        match command {
            ReplCommand::Quit => {
                println!("Bye!");
                return true;
            }
            ReplCommand::Help => {
                println!();
                Self::print_help();
            }
            ReplCommand::Tools => {
                println!();
                println!("{}", ConsoleFormatter::format_tools(self.use_case.registry()));
            }
            ReplCommand::Model => {
                let info = self.gateway.model_info().await;
                println!();
                println!("{}", ConsoleFormatter::format_model_info(&info, &self.endpoint));
            }
            ReplCommand::Debug => {
                self.debug = !self.debug;
                let state = if self.debug { "on" } else { "off" };
                println!("Debug output {}", state.bold());
            }
            ReplCommand::History => {
                println!();
                if self.history.is_empty() {
                    println!("{}", "(no questions yet)".dimmed());
                }
                for (i, (query, outcome)) in self.history.iter().enumerate() {
                    let tools: Vec<&str> =
                        outcome.tool_calls.iter().map(|c| c.name.as_str()).collect();
                    let tools = if tools.is_empty() {
                        "no tools".to_string()
                    } else {
                        tools.join(", ")
                    };
                    println!("{:>3}. {} {}", i + 1, query, format!("[{}]", tools).dimmed());
                }
                println!();
            }
            ReplCommand::Unknown(cmd) => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
            }
        }
        false
    }

    async fn process_query(&mut self, query: &str) {
        println!();

        let result = if self.show_progress {
            let progress = ProgressReporter::new();
            self.use_case.process_query_with_progress(query, &progress).await
        } else {
            self.use_case.process_query_with_progress(query, &NoProgress).await
        };

        match result {
            Ok(outcome) => {
                let output = if self.debug {
                    ConsoleFormatter::format_debug(query, &outcome)
                } else {
                    ConsoleFormatter::format_text(&outcome)
                };
                println!("{}", output);
                self.history.push((query.to_string(), outcome));
            }
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
            }
        }
        println!();
    }
}
