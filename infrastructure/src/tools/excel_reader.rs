//! `excel_reader_tool` — preview a spreadsheet from the document store.
//!
//! Workbooks (`xlsx`, `xlsm`, `xls`, `ods`) are read with `calamine`, `csv`
//! files with the `csv` crate. The first row is the header; the preview is
//! the first [`PREVIEW_ROWS`] data rows as records keyed by header.

use super::store_error;
use async_trait::async_trait;
use calamine::{Data, Reader, open_workbook_auto};
use rag_application::ports::{
    document_store::{DocumentStorePort, FileSelector},
    tool_executor::ToolExecutorPort,
};
use rag_domain::tool::{
    entities::{ToolArguments, ToolParameter, ToolSpec},
    value_objects::{ToolError, ToolPayload},
};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

pub const NAME: &str = "excel_reader_tool";

pub const PREVIEW_ROWS: usize = 5;

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

pub fn excel_reader_definition() -> ToolSpec {
    ToolSpec::new(
        NAME,
        "Preview the contents of an uploaded spreadsheet (Excel, ODS or CSV). \
         Identify the file by file_id (preferred) or by (partial) filename. \
         Examples: 'show the sales spreadsheet', 'what is in budget.xlsx'.",
    )
    .with_parameter(ToolParameter::new(
        "file_id",
        "Document id as shown by list_files_tool",
        false,
    ))
    .with_parameter(ToolParameter::new(
        "filename",
        "File name or part of it",
        false,
    ))
}

/// Executor for `excel_reader_tool`
pub struct ExcelReaderExecutor {
    store: Arc<dyn DocumentStorePort>,
}

impl ExcelReaderExecutor {
    pub fn new(store: Arc<dyn DocumentStorePort>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ToolExecutorPort for ExcelReaderExecutor {
    fn tool_name(&self) -> &str {
        NAME
    }

    async fn execute(&self, arguments: &ToolArguments) -> Result<ToolPayload, ToolError> {
        let selector = FileSelector {
            file_id: arguments.get_str("file_id").map(str::to_string),
            filename: arguments.get_str("filename").map(str::to_string),
        };
        if selector.is_empty() {
            return Err(ToolError::invalid_argument(
                "Either file_id or filename is required",
            ));
        }

        let (info, path) = self.store.locate(&selector).await.map_err(store_error)?;
        debug!("Previewing spreadsheet {} ({})", info.id, path.display());

        let rows = tokio::task::spawn_blocking(move || read_preview(&path))
            .await
            .map_err(|e| ToolError::execution_failed(format!("Spreadsheet reader failed: {}", e)))??;

        Ok(ToolPayload::Records(rows))
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

fn read_preview(path: &Path) -> Result<Vec<Map<String, Value>>, ToolError> {
    let ext = extension(path);
    let rows = if ext == "csv" {
        read_csv_rows(path)?
    } else if WORKBOOK_EXTENSIONS.contains(&ext.as_str()) {
        read_workbook_rows(path)?
    } else {
        return Err(ToolError::invalid_argument(format!(
            "Unsupported spreadsheet type: {}",
            path.display()
        )));
    };

    Ok(rows_to_records(rows))
}

/// Header plus at most `PREVIEW_ROWS` data rows from the first sheet.
fn read_workbook_rows(path: &Path) -> Result<Vec<Vec<Value>>, ToolError> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| ToolError::execution_failed(format!("Failed to open workbook: {}", e)))?;

    let Some(sheet) = workbook.sheet_names().first().cloned() else {
        return Ok(Vec::new());
    };
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| ToolError::execution_failed(format!("Failed to read sheet '{}': {}", sheet, e)))?;

    Ok(range
        .rows()
        .take(PREVIEW_ROWS + 1)
        .map(|row| row.iter().map(cell_value).collect())
        .collect())
}

fn read_csv_rows(path: &Path) -> Result<Vec<Vec<Value>>, ToolError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| ToolError::execution_failed(format!("Failed to open CSV: {}", e)))?;

    let mut rows = Vec::new();
    for record in reader.records().take(PREVIEW_ROWS + 1) {
        let record =
            record.map_err(|e| ToolError::execution_failed(format!("Failed to read CSV: {}", e)))?;
        rows.push(record.iter().map(text_value).collect());
    }
    Ok(rows)
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::Int(i) => Value::from(*i),
        Data::Float(f) => Value::from(*f),
        Data::Bool(b) => Value::from(*b),
        Data::String(s) => Value::from(s.as_str()),
        other => Value::from(other.to_string()),
    }
}

/// Numbers stay numbers; everything else is kept as text.
fn text_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(f) = trimmed.parse::<f64>()
        && f.is_finite()
    {
        return Value::from(f);
    }
    Value::from(trimmed)
}

/// Claim `name`, or `name_2`, `name_3`, ... when it is already taken.
fn unique_header(name: String, taken: &mut HashSet<String>) -> String {
    if taken.insert(name.clone()) {
        return name;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}_{}", name, n);
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

fn rows_to_records(rows: Vec<Vec<Value>>) -> Vec<Map<String, Value>> {
    let mut rows = rows.into_iter();
    let Some(header_row) = rows.next() else {
        return Vec::new();
    };

    let mut taken = HashSet::new();
    let headers: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let name = match cell {
                Value::Null => format!("column_{}", i + 1),
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            unique_header(name, &mut taken)
        })
        .collect();

    rows.take(PREVIEW_ROWS)
        .map(|row| {
            let mut record = Map::new();
            for (i, header) in headers.iter().enumerate() {
                record.insert(header.clone(), row.get(i).cloned().unwrap_or(Value::Null));
            }
            let mut row_taken = taken.clone();
            for (i, extra) in row.iter().enumerate().skip(headers.len()) {
                let key = unique_header(format!("column_{}", i + 1), &mut row_taken);
                record.insert(key, extra.clone());
            }
            record
        })
        .collect()
}
