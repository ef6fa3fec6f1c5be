//! Arithmetic tools — exact integer addition and multiplication.
//!
//! Trivial on purpose: they give the agent loop something deterministic to
//! call, so multi-step tool use can be exercised without a document corpus.
//! Arguments must be JSON integers; floats and strings are rejected so the
//! model gets a precise error to correct against.

use async_trait::async_trait;
use docmind_core::{Tool, ToolError};

/// Extract a required integer argument, rejecting missing or mistyped values.
fn integer_arg(arguments: &serde_json::Value, name: &str) -> Result<i64, ToolError> {
    match arguments.get(name) {
        Some(value) => value.as_i64().ok_or_else(|| {
            ToolError::InvalidArguments(format!("Argument '{name}' must be an integer, got {value}"))
        }),
        None => Err(ToolError::InvalidArguments(format!(
            "Missing '{name}' argument"
        ))),
    }
}

fn two_integer_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "a": { "type": "integer", "description": "First operand" },
            "b": { "type": "integer", "description": "Second operand" }
        },
        "required": ["a", "b"]
    })
}

pub struct AddTool;

#[async_trait]
impl Tool for AddTool {
    fn name(&self) -> &str {
        "add"
    }

    fn description(&self) -> &str {
        "Add two integers and return their sum."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        two_integer_schema()
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let a = integer_arg(&arguments, "a")?;
        let b = integer_arg(&arguments, "b")?;
        let sum = a.checked_add(b).ok_or_else(|| ToolError::ExecutionFailed {
            tool_name: "add".into(),
            reason: format!("{a} + {b} overflows"),
        })?;
        Ok(sum.to_string())
    }
}

pub struct MultiplyTool;

#[async_trait]
impl Tool for MultiplyTool {
    fn name(&self) -> &str {
        "multiply"
    }

    fn description(&self) -> &str {
        "Multiply two integers and return their product."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        two_integer_schema()
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let a = integer_arg(&arguments, "a")?;
        let b = integer_arg(&arguments, "b")?;
        let product = a.checked_mul(b).ok_or_else(|| ToolError::ExecutionFailed {
            tool_name: "multiply".into(),
            reason: format!("{a} * {b} overflows"),
        })?;
        Ok(product.to_string())
    }
}
