//! Tool executors
//!
//! One module per tool, each exposing `NAME`, a `*_definition()` and an
//! executor implementing [`ToolExecutorPort`]:
//!
//! | Tool | Backend |
//! |------|---------|
//! | `search_tool` | DuckDuckGo Instant Answer API |
//! | `vector_search_tool` | document store similarity search |
//! | `calculator_tool` | in-process expression evaluator |
//! | `weather_tool` | OpenWeatherMap current weather |
//! | `list_files_tool` | document store listing |
//! | `excel_reader_tool` | document store + spreadsheet reader |

pub mod calculator;
pub mod excel_reader;
pub mod list_files;
pub mod search;
pub mod vector_search;
pub mod weather;

pub use calculator::CalculatorExecutor;
pub use excel_reader::ExcelReaderExecutor;
pub use list_files::ListFilesExecutor;
pub use search::WebSearchExecutor;
pub use vector_search::VectorSearchExecutor;
pub use weather::WeatherExecutor;

use rag_application::ports::{
    document_store::{DocumentStorePort, StoreError},
    tool_executor::ToolExecutorPort,
};
use rag_domain::tool::{ToolError, ToolRegistry, ToolSpec};
use std::sync::Arc;
use tracing::debug;

/// Names of every tool in the static catalog, in catalog order
pub const ALL_TOOL_NAMES: &[&str] = &[
    search::NAME,
    vector_search::NAME,
    calculator::NAME,
    weather::NAME,
    list_files::NAME,
    excel_reader::NAME,
];

/// Static catalog of every built-in tool.
///
/// `top_k` is advertised as the default of `vector_search_tool`.
pub fn builtin_catalog(top_k: usize) -> Vec<ToolSpec> {
    vec![
        search::search_definition(),
        vector_search::vector_search_definition(top_k),
        calculator::calculator_definition(),
        weather::weather_definition(),
        list_files::list_files_definition(),
        excel_reader::excel_reader_definition(),
    ]
}

/// Backend settings for the tool executors
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSettings {
    pub search_base_url: String,
    pub weather_base_url: String,
    pub weather_api_key: Option<String>,
    pub default_top_k: usize,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            search_base_url: search::DEFAULT_BASE_URL.to_string(),
            weather_base_url: weather::DEFAULT_BASE_URL.to_string(),
            weather_api_key: None,
            default_top_k: 10,
        }
    }
}

/// Create executors for the tools enabled in `registry`, in registry order.
pub fn build_executors(
    registry: &ToolRegistry,
    settings: &ToolSettings,
    store: Arc<dyn DocumentStorePort>,
    http: reqwest::Client,
) -> Vec<Arc<dyn ToolExecutorPort>> {
    registry
        .names()
        .filter_map(|name| -> Option<Arc<dyn ToolExecutorPort>> {
            let executor: Arc<dyn ToolExecutorPort> = match name {
                search::NAME => Arc::new(WebSearchExecutor::new(
                    http.clone(),
                    settings.search_base_url.clone(),
                )),
                vector_search::NAME => Arc::new(VectorSearchExecutor::new(
                    store.clone(),
                    settings.default_top_k,
                )),
                calculator::NAME => Arc::new(CalculatorExecutor),
                weather::NAME => Arc::new(WeatherExecutor::new(
                    http.clone(),
                    settings.weather_base_url.clone(),
                    settings.weather_api_key.clone(),
                )),
                list_files::NAME => Arc::new(ListFilesExecutor::new(store.clone())),
                excel_reader::NAME => Arc::new(ExcelReaderExecutor::new(store.clone())),
                other => {
                    debug!("No built-in executor for tool '{}'", other);
                    return None;
                }
            };
            Some(executor)
        })
        .collect()
}

/// Map a document store failure onto the tool error vocabulary
pub(crate) fn store_error(error: StoreError) -> ToolError {
    match error {
        StoreError::NotFound(what) => ToolError::not_found(what),
        StoreError::Io(message) => ToolError::execution_failed(message),
        StoreError::Unsupported(message) => ToolError::invalid_argument(message),
    }
}
