//! The agent reasoning loop implementation.

use std::sync::Arc;

use docmind_core::{
    AgentError, CancelToken, Error, Message, Provider, ProviderRequest, Result, ToolRegistry,
    Transcript,
};
use tracing::{debug, info, warn};

/// The core agent loop that orchestrates model calls and tool execution.
///
/// The loop is stateless between turns: each `run_turn` starts from the
/// transcript the caller passes in and returns a new transcript on success.
/// Conversation state lives with the caller, never inside the loop.
pub struct AgentLoop {
    /// The LLM provider to use
    provider: Arc<dyn Provider>,

    /// The model to use
    model: String,

    /// Temperature setting
    temperature: f32,

    /// Default max tokens per response
    max_tokens: Option<u32>,

    /// Tool registry
    tools: Arc<ToolRegistry>,

    /// System persona prepended to every model request
    system_persona: String,

    /// Hard limit on model calls per turn
    max_model_calls: u32,
}

/// The result of one completed turn.
#[derive(Debug)]
pub struct TurnOutput {
    /// The model's final answer text.
    pub answer: String,

    /// The prior transcript plus everything this turn appended: the user
    /// message, any tool-requesting assistant messages and their results,
    /// and the final answer.
    pub transcript: Transcript,
}

impl AgentLoop {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        temperature: f32,
        tools: Arc<ToolRegistry>,
        system_persona: impl Into<String>,
        max_model_calls: u32,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
            max_tokens: None,
            tools,
            system_persona: system_persona.into(),
            max_model_calls,
        }
    }

    /// Set the default max tokens per model response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Run one turn: user message in, final answer out.
    ///
    /// The prior transcript is read but never mutated. On success the
    /// returned transcript extends it with this turn's messages; on any
    /// error the turn commits nothing and the caller keeps `prior` as-is.
    ///
    /// Errors terminate the turn: provider failures, upstream failures
    /// inside a tool, a cancelled token, and an exhausted model-call
    /// budget. Ordinary tool failures do not; they are fed back to the
    /// model as failed tool results.
    pub async fn run_turn(
        &self,
        user_text: &str,
        prior: &Transcript,
        cancel: &CancelToken,
    ) -> Result<TurnOutput> {
        let mut transcript = prior.clone();
        transcript.push(Message::user(user_text));

        let tool_definitions = self.tools.definitions();
        let mut call_count: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(Error::Agent(AgentError::Cancelled { state: "deciding" }));
            }
            if call_count >= self.max_model_calls {
                warn!(
                    budget = self.max_model_calls,
                    "Model-call budget exhausted without a final answer"
                );
                return Err(Error::Agent(AgentError::BudgetExhausted {
                    budget: self.max_model_calls,
                }));
            }
            call_count += 1;
            debug!(call = call_count, budget = self.max_model_calls, "Model call");

            let mut messages = Vec::with_capacity(transcript.len() + 1);
            messages.push(Message::system(&self.system_persona));
            messages.extend(transcript.messages().iter().cloned());

            let request = ProviderRequest {
                model: self.model.clone(),
                messages,
                temperature: self.temperature,
                max_tokens: self.max_tokens,
                tools: tool_definitions.clone(),
            };
            let response = self.provider.complete(request).await?;

            if !response.message.requests_tools() {
                // Final answer ends the turn.
                let answer = response.message.content.clone();
                transcript.push(response.message);
                info!(model_calls = call_count, "Turn complete");
                return Ok(TurnOutput { answer, transcript });
            }

            let tool_calls = response.message.tool_calls.clone();
            transcript.push(response.message);

            if cancel.is_cancelled() {
                return Err(Error::Agent(AgentError::Cancelled {
                    state: "executing tools",
                }));
            }

            // Execute sequentially, appending results in request order so
            // each result stays adjacent to its call id.
            debug!(tool_count = tool_calls.len(), "Executing tool calls");
            for call in &tool_calls {
                let result = self.tools.dispatch(call).await?;
                transcript.push(Message::tool_result(&result.call_id, &result.content));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use docmind_core::{
        ProviderError, ProviderResponse, Role, Tool, ToolCallRequest, ToolError, Usage,
    };
    use docmind_tools::{AddTool, MultiplyTool};

    /// Replays a fixed sequence of assistant messages, one per `complete`.
    struct ScriptedProvider {
        script: Mutex<Vec<Message>>,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        fn new(script: Vec<Message>) -> Self {
            Self {
                script: Mutex::new(script),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl Provider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            _request: ProviderRequest,
        ) -> std::result::Result<ProviderResponse, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut script = self.script.lock().unwrap();
            if script.is_empty() {
                return Err(ProviderError::InvalidResponse("script exhausted".into()));
            }
            Ok(ProviderResponse {
                message: script.remove(0),
                usage: Some(Usage {
                    prompt_tokens: 10,
                    completion_tokens: 5,
                    total_tokens: 15,
                }),
                model: "scripted-model".into(),
            })
        }
    }

    /// Always asks for the same tool call, never answers.
    struct GreedyProvider;

    #[async_trait::async_trait]
    impl Provider for GreedyProvider {
        fn name(&self) -> &str {
            "greedy"
        }

        async fn complete(
            &self,
            _request: ProviderRequest,
        ) -> std::result::Result<ProviderResponse, ProviderError> {
            Ok(ProviderResponse {
                message: Message::assistant_with_tools("", vec![add_call("c", 1, 1)]),
                usage: None,
                model: "greedy-model".into(),
            })
        }
    }

    fn add_call(id: &str, a: i64, b: i64) -> ToolCallRequest {
        ToolCallRequest {
            id: id.into(),
            name: "add".into(),
            arguments: serde_json::json!({"a": a, "b": b}),
        }
    }

    fn arithmetic_registry() -> Arc<ToolRegistry> {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(AddTool));
        registry.register(Box::new(MultiplyTool));
        Arc::new(registry)
    }

    fn agent(provider: Arc<dyn Provider>, tools: Arc<ToolRegistry>, budget: u32) -> AgentLoop {
        AgentLoop::new(provider, "test-model", 0.0, tools, "You are helpful.", budget)
    }

    #[tokio::test]
    async fn answer_without_tools() {
        let provider = Arc::new(ScriptedProvider::new(vec![Message::assistant(
            "Hello! How can I help?",
        )]));
        let agent = agent(provider.clone(), arithmetic_registry(), 8);

        let out = agent
            .run_turn("Hello!", &Transcript::new(), &CancelToken::default())
            .await
            .unwrap();
        assert_eq!(out.answer, "Hello! How can I help?");
        // User + assistant.
        assert_eq!(out.transcript.len(), 2);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn tool_call_then_answer() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Message::assistant_with_tools("", vec![add_call("call_1", 3, 4)]),
            Message::assistant("3 + 4 is 7."),
        ]));
        let agent = agent(provider.clone(), arithmetic_registry(), 8);

        let out = agent
            .run_turn("What is 3 + 4?", &Transcript::new(), &CancelToken::default())
            .await
            .unwrap();
        assert_eq!(out.answer, "3 + 4 is 7.");
        assert_eq!(provider.call_count(), 2);

        // User, assistant(tool call), tool result, assistant answer.
        let messages = out.transcript.messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[2].role, Role::Tool);
        assert_eq!(messages[2].content, "7");
        assert_eq!(messages[2].tool_call_id.as_deref(), Some("call_1"));
    }

    #[tokio::test]
    async fn parallel_tool_requests_answered_in_order() {
        let calls = vec![
            add_call("call_a", 1, 2),
            ToolCallRequest {
                id: "call_b".into(),
                name: "multiply".into(),
                arguments: serde_json::json!({"a": 2, "b": 5}),
            },
        ];
        let provider = Arc::new(ScriptedProvider::new(vec![
            Message::assistant_with_tools("", calls),
            Message::assistant("Done."),
        ]));
        let agent = agent(provider, arithmetic_registry(), 8);

        let out = agent
            .run_turn("compute both", &Transcript::new(), &CancelToken::default())
            .await
            .unwrap();
        let messages = out.transcript.messages();
        assert_eq!(messages[2].tool_call_id.as_deref(), Some("call_a"));
        assert_eq!(messages[2].content, "3");
        assert_eq!(messages[3].tool_call_id.as_deref(), Some("call_b"));
        assert_eq!(messages[3].content, "10");
    }

    #[tokio::test]
    async fn failed_tool_result_is_fed_back() {
        let bad_call = ToolCallRequest {
            id: "call_1".into(),
            name: "add".into(),
            arguments: serde_json::json!({"a": 3}),
        };
        let provider = Arc::new(ScriptedProvider::new(vec![
            Message::assistant_with_tools("", vec![bad_call]),
            Message::assistant("I could not compute that."),
        ]));
        let agent = agent(provider, arithmetic_registry(), 8);

        let out = agent
            .run_turn("add", &Transcript::new(), &CancelToken::default())
            .await
            .unwrap();
        let messages = out.transcript.messages();
        assert_eq!(messages[2].role, Role::Tool);
        assert!(messages[2].content.contains("Error:"));
        assert_eq!(out.answer, "I could not compute that.");
    }

    #[tokio::test]
    async fn budget_exhaustion_is_an_error() {
        let provider = Arc::new(GreedyProvider);
        let agent = agent(provider, arithmetic_registry(), 3);

        let err = agent
            .run_turn("loop forever", &Transcript::new(), &CancelToken::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Agent(AgentError::BudgetExhausted { budget: 3 })
        ));
    }

    #[tokio::test]
    async fn budget_counts_model_calls_exactly() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Message::assistant_with_tools("", vec![add_call("c1", 1, 1)]),
            Message::assistant_with_tools("", vec![add_call("c2", 2, 2)]),
            Message::assistant_with_tools("", vec![add_call("c3", 3, 3)]),
        ]));
        let agent = agent(provider.clone(), arithmetic_registry(), 3);

        let err = agent
            .run_turn("keep going", &Transcript::new(), &CancelToken::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Agent(AgentError::BudgetExhausted { .. })));
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn cancelled_before_first_call() {
        let provider = Arc::new(ScriptedProvider::new(vec![Message::assistant("hi")]));
        let agent = agent(provider.clone(), arithmetic_registry(), 8);

        let cancel = CancelToken::default();
        cancel.cancel();
        let err = agent
            .run_turn("hello", &Transcript::new(), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Agent(AgentError::Cancelled { .. })));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn provider_error_terminates_turn() {
        // Empty script: the first complete() fails.
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let agent = agent(provider, arithmetic_registry(), 8);

        let err = agent
            .run_turn("hello", &Transcript::new(), &CancelToken::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Provider(_)));
    }

    struct DownstreamTool;

    #[async_trait::async_trait]
    impl Tool for DownstreamTool {
        fn name(&self) -> &str {
            "downstream"
        }
        fn description(&self) -> &str {
            "Needs a service that is down"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({"type": "object", "properties": {}})
        }
        async fn execute(
            &self,
            _arguments: serde_json::Value,
        ) -> std::result::Result<String, ToolError> {
            Err(ToolError::Upstream {
                tool_name: "downstream".into(),
                source: ProviderError::Unavailable("connection refused".into()),
            })
        }
    }

    #[tokio::test]
    async fn upstream_tool_failure_terminates_turn() {
        let call = ToolCallRequest {
            id: "call_1".into(),
            name: "downstream".into(),
            arguments: serde_json::json!({}),
        };
        let provider = Arc::new(ScriptedProvider::new(vec![
            Message::assistant_with_tools("", vec![call]),
            Message::assistant("unreachable"),
        ]));
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(DownstreamTool));
        let agent = agent(provider, Arc::new(registry), 8);

        let err = agent
            .run_turn("fetch", &Transcript::new(), &CancelToken::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Tool(ToolError::Upstream { .. })));
    }

    #[tokio::test]
    async fn turn_extends_prior_transcript() {
        let mut prior = Transcript::new();
        prior.push(Message::user("earlier question"));
        prior.push(Message::assistant("earlier answer"));

        let provider = Arc::new(ScriptedProvider::new(vec![Message::assistant(
            "second answer",
        )]));
        let agent = agent(provider, arithmetic_registry(), 8);

        let out = agent
            .run_turn("follow-up", &prior, &CancelToken::default())
            .await
            .unwrap();
        assert_eq!(out.transcript.len(), 4);
        assert_eq!(out.transcript.messages()[0].content, "earlier question");
        assert_eq!(out.transcript.messages()[2].content, "follow-up");
        // Prior itself is untouched.
        assert_eq!(prior.len(), 2);
    }
}
