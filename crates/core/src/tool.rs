//! Tool trait and registry — the agent's callable capabilities.
//!
//! Tools are a closed set at startup: arithmetic helpers and document
//! retrieval. The registry maps names to boxed `Tool` implementations,
//! validates arguments, executes, and serializes results. Tool-level
//! failures during dispatch do not propagate: `dispatch` folds them into a
//! failed `ToolResult` so the model sees the error text and can recover.
//! The single exception is an upstream service failure inside a tool
//! (`ToolError::Upstream`), which is fatal for the turn and escapes.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ToolError;
use crate::provider::ToolDefinition;

/// A request to execute a tool, as emitted by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Unique call ID (matches the LLM's tool_call.id)
    pub id: String,

    /// Name of the tool to execute
    pub name: String,

    /// Arguments as a JSON object (argument name → value)
    pub arguments: serde_json::Value,
}

/// The result of a tool execution, correlated to its request by `call_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// The call ID this result is for
    pub call_id: String,

    /// Whether the tool executed successfully
    pub success: bool,

    /// The output content (or the error text on failure)
    pub content: String,
}

/// The core Tool trait.
///
/// Each tool (add, multiply, retrieve) implements this trait. Tools are
/// registered in the ToolRegistry and made available to the agent loop.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "add", "retrieve").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the LLM).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with the given arguments, returning the output
    /// content. Argument validation failures are `ToolError::InvalidArguments`.
    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<String, ToolError>;

    /// Convert this tool into a ToolDefinition for sending to the LLM.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// A registry of available tools.
///
/// The agent loop uses this to:
/// 1. Get tool definitions to send to the LLM
/// 2. Dispatch tool-call requests when the LLM issues them
///
/// The registry owns no state beyond the name → tool table and is read-only
/// after startup, so it is safe to share across concurrent agent runs.
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Get all tool definitions (for sending to the LLM).
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.to_definition()).collect()
    }

    /// List all registered tool names.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    /// Execute a tool-call request.
    ///
    /// Unknown tools, invalid arguments, and execution failures become a
    /// failed result whose content carries the error text; they are never
    /// surfaced as process-level errors. Only `ToolError::Upstream` is
    /// returned as `Err` — a dependency the tool needs is down or timing
    /// out, so retrying within the same turn is pointless.
    pub async fn dispatch(
        &self,
        request: &ToolCallRequest,
    ) -> std::result::Result<ToolResult, ToolError> {
        let outcome = match self.tools.get(&request.name) {
            Some(tool) => tool.execute(request.arguments.clone()).await,
            None => Err(ToolError::NotFound(request.name.clone())),
        };

        match outcome {
            Ok(content) => Ok(ToolResult {
                call_id: request.id.clone(),
                success: true,
                content,
            }),
            Err(e @ ToolError::Upstream { .. }) => {
                warn!(tool = %request.name, error = %e, "Upstream failure during tool dispatch");
                Err(e)
            }
            Err(e) => {
                warn!(tool = %request.name, error = %e, "Tool dispatch failed");
                Ok(ToolResult {
                    call_id: request.id.clone(),
                    success: false,
                    content: format!("Error: {e}"),
                })
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
