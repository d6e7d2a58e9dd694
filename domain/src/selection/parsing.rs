//! Best-effort extraction of tool invocations from model output.
//!
//! Extraction order:
//! 1. the whole response as JSON
//! 2. fenced code blocks (` ```json ` or bare fences)
//! 3. every balanced `{...}` / `[...]` span, in textual order
//!
//! Each candidate is parsed strictly, then once more with trailing commas
//! removed. The first candidate that parses wins.

use crate::tool::entities::{ToolArguments, ToolInvocation};
use serde_json::Value;
use thiserror::Error;

/// Selection output could not be turned into tool invocations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionParseError {
    #[error("No JSON object or array found in model output")]
    NoJson,

    #[error("Expected a JSON object or array, got {0}")]
    UnexpectedShape(&'static str),
}

/// Extract the first JSON value recoverable from `text`.
pub fn extract_json_value(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(value) = parse_lenient(trimmed) {
        return Some(value);
    }

    for block in fenced_blocks(trimmed) {
        if let Some(value) = parse_lenient(block) {
            return Some(value);
        }
    }

    let bytes = trimmed.as_bytes();
    for (start, &b) in bytes.iter().enumerate() {
        if (b == b'{' || b == b'[')
            && let Some(end) = balanced_span_end(bytes, start)
            && let Some(value) = parse_lenient(&trimmed[start..=end])
        {
            return Some(value);
        }
    }

    None
}

/// Parse model output into zero or more tool invocations.
///
/// A single object becomes a one-element list, an array contributes every
/// entry that is an object with a non-empty string `name`. `[]` is the
/// valid "no tool applies" answer and yields an empty list.
pub fn parse_tool_invocations(text: &str) -> Result<Vec<ToolInvocation>, SelectionParseError> {
    let value = extract_json_value(text).ok_or(SelectionParseError::NoJson)?;

    let entries = match value {
        Value::Object(_) => vec![value],
        Value::Array(items) => items,
        other => return Err(SelectionParseError::UnexpectedShape(kind_of(&other))),
    };

    Ok(entries.iter().filter_map(invocation_from_json).collect())
}

fn invocation_from_json(entry: &Value) -> Option<ToolInvocation> {
    let obj = entry.as_object()?;
    let name = obj.get("name")?.as_str()?.trim();
    if name.is_empty() {
        return None;
    }

    let raw_args = obj.get("arguments").or_else(|| obj.get("parameters"));
    let arguments = match raw_args {
        Some(Value::Object(map)) => ToolArguments::from(map.clone()),
        // OpenAI function-calling style: arguments as a JSON-encoded string
        Some(Value::String(s)) => match parse_lenient(s.trim()) {
            Some(Value::Object(map)) => ToolArguments::from(map),
            _ => ToolArguments::new(),
        },
        _ => ToolArguments::new(),
    };

    Some(ToolInvocation::new(name).with_arguments(arguments))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn parse_lenient(candidate: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str(candidate) {
        return Some(value);
    }
    let repaired = strip_trailing_commas(candidate);
    if repaired != candidate {
        return serde_json::from_str(&repaired).ok();
    }
    None
}

/// Contents of ``` fenced blocks, language tag removed.
fn fenced_blocks(text: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find("```") {
        let after_open = &rest[open + 3..];
        // Skip the info string (e.g. "json") up to the end of the line
        let body_start = after_open.find('\n').map(|i| i + 1).unwrap_or(0);
        let body = &after_open[body_start..];
        match body.find("```") {
            Some(close) => {
                blocks.push(body[..close].trim());
                rest = &body[close + 3..];
            }
            None => break,
        }
    }

    blocks
}

/// Index of the bracket closing the one at `start`, skipping string contents.
///
/// Returns `None` on a mismatched closer or when the text ends first.
fn balanced_span_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut stack: Vec<u8> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => stack.push(b'}'),
            b'[' => stack.push(b']'),
            b'}' | b']' => {
                if stack.pop() != Some(b) {
                    return None;
                }
                if stack.is_empty() {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }

    None
}

/// Drop commas that directly precede a closing bracket (outside strings).
fn strip_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            out.push(c);
            continue;
        }

        if c == '"' {
            in_string = true;
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
            if matches!(next, Some('}') | Some(']')) {
                continue;
            }
        }
        out.push(c);
    }

    out
}
