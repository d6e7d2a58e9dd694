//! `calculator_tool` — evaluate an arithmetic expression with `meval`.
//!
//! Operators: `+ - * / % ^` (`**` is accepted for `^`, as are `×`, `÷`
//! and `−`). Functions are meval's builtins (`sqrt abs exp ln sin cos tan
//! floor ceil round min max` and friends) plus `log` in base 10. Constants:
//! `pi`, `e`.

use async_trait::async_trait;
use meval::{Context, Expr};
use rag_application::ports::tool_executor::ToolExecutorPort;
use rag_domain::tool::{
    entities::{ToolArguments, ToolParameter, ToolSpec},
    value_objects::{ToolError, ToolPayload},
};

pub const NAME: &str = "calculator_tool";

/// Deepest parenthesis nesting accepted from the model
pub const MAX_NESTING: usize = 64;

pub fn calculator_definition() -> ToolSpec {
    ToolSpec::new(
        NAME,
        "Evaluate mathematical expressions, unit conversions and formulas. \
         Examples: '123 * 45', '(30 * 9 / 5) + 32', 'sqrt(2) ^ 2'.",
    )
    .with_parameter(ToolParameter::new(
        "expression",
        "The arithmetic expression to evaluate",
        true,
    ))
}

/// Executor for `calculator_tool`
pub struct CalculatorExecutor;

#[async_trait]
impl ToolExecutorPort for CalculatorExecutor {
    fn tool_name(&self) -> &str {
        NAME
    }

    async fn execute(&self, arguments: &ToolArguments) -> Result<ToolPayload, ToolError> {
        let expression = arguments.require_str("expression")?;
        let value = evaluate(expression).map_err(ToolError::invalid_argument)?;
        Ok(ToolPayload::Number(value))
    }
}

/// Rewrite operator spellings meval does not know and fold case.
fn normalize(expression: &str) -> String {
    expression
        .replace("**", "^")
        .replace('×', "*")
        .replace('÷', "/")
        .replace('−', "-")
        .to_lowercase()
}

fn nesting_depth(expression: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    for c in expression.chars() {
        match c {
            '(' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

/// Evaluate `expression`, returning a finite number or an error message.
pub fn evaluate(expression: &str) -> Result<f64, String> {
    let expression = normalize(expression);
    if expression.trim().is_empty() {
        return Err("Empty expression".to_string());
    }
    if nesting_depth(&expression) > MAX_NESTING {
        return Err(format!(
            "Expression nests deeper than {} parentheses",
            MAX_NESTING
        ));
    }

    let parsed: Expr = expression
        .parse()
        .map_err(|e| format!("Invalid expression: {}", e))?;

    let mut context = Context::new();
    context.func("log", f64::log10);

    let value = parsed
        .eval_with_context(context)
        .map_err(|e| format!("Invalid expression: {}", e))?;

    if !value.is_finite() {
        return Err(
            "Result is not a finite number (division by zero or input outside the function's domain)"
                .to_string(),
        );
    }
    Ok(value)
}
