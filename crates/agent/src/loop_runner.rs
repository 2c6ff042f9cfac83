//! The agent loop implementation.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use sandeval_core::message::{Message, MessageToolCall, Transcript};
use sandeval_core::provider::{Provider, ProviderRequest, ToolChoice, ToolDefinition};
use sandeval_core::tool::{ToolArguments, ToolExecutionResult, ToolInvoker};
use sandeval_core::{Error, Result};
use sandeval_telemetry::{MetricsRecorder, MetricsSnapshot};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::system_prompt::DEFAULT_SYSTEM_PROMPT;
use crate::tags::{correction_message, missing_tags};

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Between rounds; the iteration budget is checked here.
    Running,
    /// Waiting on the model for the next assistant message.
    AwaitingModel,
    /// Executing the tool calls of the last assistant message.
    DispatchingTools,
    /// Checking a tool-free assistant message against the tag contract.
    ValidatingFinal,
    Done,
    Exhausted,
}

/// How a run that did not fail came to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The model produced a tool-free answer with all three tags.
    Done,
    /// The iteration budget ran out first.
    Exhausted,
}

/// The outcome of one run.
#[derive(Debug, Clone)]
pub struct AgentRun {
    /// Content of the last assistant message.
    pub final_text: String,
    pub metrics: MetricsSnapshot,
    pub termination: Termination,
    /// Number of model rounds performed.
    pub iterations: u32,
    pub transcript: Transcript,
}

impl AgentRun {
    pub fn is_done(&self) -> bool {
        self.termination == Termination::Done
    }
}

/// Drives a model through tool calls until it produces a tagged answer.
pub struct AgentLoop {
    /// The LLM provider to use
    provider: Arc<dyn Provider>,

    /// Executes the tool calls the model requests
    invoker: Arc<dyn ToolInvoker>,

    /// The model or deployment to use
    model: String,

    system_prompt: String,

    /// Maximum model rounds per run, tag retries included
    max_iterations: u32,

    max_tokens: Option<u32>,

    temperature: Option<f32>,
}

impl AgentLoop {
    /// Create a new agent loop.
    pub fn new(
        provider: Arc<dyn Provider>,
        invoker: Arc<dyn ToolInvoker>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            invoker,
            model: model.into(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_iterations: 50,
            max_tokens: Some(4096),
            temperature: None,
        }
    }

    /// Set the maximum number of model rounds.
    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max;
        self
    }

    /// Replace the built-in system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Set the max tokens per LLM response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Run one task to completion.
    ///
    /// Tool failures are reported to the model and never end the run. A
    /// provider failure or a tool call whose arguments are not a JSON object
    /// ends it with an error.
    pub async fn run(&self, prompt: &str, tools: &[ToolDefinition]) -> Result<AgentRun> {
        let mut transcript = Transcript::seeded(&self.system_prompt, prompt);
        let mut recorder = MetricsRecorder::new();
        let mut iterations = 0u32;
        let mut state = LoopState::Running;

        info!(
            run_id = %transcript.id,
            tools = tools.len(),
            max_iterations = self.max_iterations,
            "Starting agent run"
        );

        loop {
            state = match state {
                LoopState::Running => {
                    if iterations >= self.max_iterations {
                        LoopState::Exhausted
                    } else {
                        iterations += 1;
                        debug!(
                            run_id = %transcript.id,
                            iteration = iterations,
                            "Agent loop iteration"
                        );
                        LoopState::AwaitingModel
                    }
                }

                LoopState::AwaitingModel => {
                    let request = ProviderRequest {
                        model: self.model.clone(),
                        messages: transcript.snapshot(),
                        temperature: self.temperature,
                        max_tokens: self.max_tokens,
                        tools: tools.to_vec(),
                        tool_choice: (!tools.is_empty()).then_some(ToolChoice::Auto),
                    };

                    let response = self.provider.complete(request).await?;
                    if let Some(usage) = &response.usage {
                        debug!(
                            model = %response.model,
                            total_tokens = usage.total_tokens,
                            "Model responded"
                        );
                    }

                    let next = if response.message.has_tool_calls() {
                        LoopState::DispatchingTools
                    } else {
                        LoopState::ValidatingFinal
                    };
                    transcript.push(response.message);
                    next
                }

                LoopState::DispatchingTools => {
                    let calls = transcript
                        .last()
                        .map(|m| m.tool_calls.clone())
                        .unwrap_or_default();
                    debug!(tool_count = calls.len(), "Executing tool calls");

                    for call in &calls {
                        let result = self.dispatch(call, &mut recorder).await?;
                        let text = result.to_transcript_text();
                        transcript.push(Message::tool_result(&call.id, text));
                    }
                    LoopState::Running
                }

                LoopState::ValidatingFinal => {
                    let content = transcript
                        .last()
                        .map(|m| m.content.as_str())
                        .unwrap_or_default();
                    let missing = missing_tags(content);

                    if missing.is_empty() {
                        LoopState::Done
                    } else {
                        warn!(
                            iteration = iterations,
                            max_iterations = self.max_iterations,
                            missing = ?missing.iter().map(|t| t.name()).collect::<Vec<_>>(),
                            "Answer is missing required tags, asking again"
                        );
                        transcript.push(Message::user(correction_message(&missing)));
                        LoopState::Running
                    }
                }

                LoopState::Done => {
                    return Ok(self.finish(transcript, recorder, iterations, Termination::Done));
                }

                LoopState::Exhausted => {
                    warn!(iterations, "Iteration budget exhausted without a tagged answer");
                    let termination = Termination::Exhausted;
                    return Ok(self.finish(transcript, recorder, iterations, termination));
                }
            };
        }
    }

    /// Decode, execute and record one tool call.
    async fn dispatch(
        &self,
        call: &MessageToolCall,
        recorder: &mut MetricsRecorder,
    ) -> Result<ToolExecutionResult> {
        let arguments = decode_arguments(call)?;
        debug!(tool = %call.name, call_id = %call.id, "Executing tool");

        let timestamp = Utc::now();
        let start = Instant::now();
        let outcome = self.invoker.invoke(&call.name, &arguments).await;
        let duration = start.elapsed();

        let result = ToolExecutionResult::from_invocation(outcome);
        match &result {
            ToolExecutionResult::Success(_) => {
                debug!(
                    tool = %call.name,
                    duration_ms = duration.as_millis() as u64,
                    "Tool completed"
                );
            }
            ToolExecutionResult::Failure { kind, message } => {
                warn!(
                    tool = %call.name,
                    duration_ms = duration.as_millis() as u64,
                    kind = %kind,
                    error = %message,
                    "Tool execution failed"
                );
            }
        }

        recorder.record(&call.name, duration, arguments, timestamp);
        Ok(result)
    }

    fn finish(
        &self,
        transcript: Transcript,
        recorder: MetricsRecorder,
        iterations: u32,
        termination: Termination,
    ) -> AgentRun {
        let final_text = transcript
            .last_assistant()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        let metrics = recorder.into_snapshot();

        info!(
            run_id = %transcript.id,
            ?termination,
            iterations,
            tool_calls = metrics.total_calls(),
            "Agent run finished"
        );

        AgentRun {
            final_text,
            metrics,
            termination,
            iterations,
            transcript,
        }
    }
}

fn decode_arguments(call: &MessageToolCall) -> Result<ToolArguments> {
    let malformed = |reason: String| Error::MalformedToolArguments {
        tool_name: call.name.clone(),
        arguments: call.arguments.clone(),
        reason,
    };

    match serde_json::from_str::<serde_json::Value>(&call.arguments) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(other) => Err(malformed(format!("expected a JSON object, got {other}"))),
        Err(e) => {
            warn!(tool = %call.name, error = %e, "Tool arguments are not valid JSON");
            Err(malformed(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sandeval_core::error::{ProviderError, ToolError};
    use sandeval_core::message::Role;
    use sandeval_core::provider::{ProviderResponse, Usage};
    use sandeval_core::tool::ToolContent;
    use std::collections::HashMap;
    use std::sync::Mutex;

    const TAGGED: &str =
        "<summary>Added the numbers.</summary><feedback>None.</feedback><response>4</response>";

    /// Replays a fixed list of assistant messages; the last one repeats.
    struct ScriptedProvider {
        replies: Vec<Message>,
        requests: Mutex<Vec<ProviderRequest>>,
    }

    impl ScriptedProvider {
        fn new(replies: Vec<Message>) -> Arc<Self> {
            Arc::new(Self {
                replies,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        fn request(&self, i: usize) -> ProviderRequest {
            self.requests.lock().unwrap()[i].clone()
        }
    }

    #[async_trait::async_trait]
    impl Provider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            request: ProviderRequest,
        ) -> std::result::Result<ProviderResponse, ProviderError> {
            let mut requests = self.requests.lock().unwrap();
            let idx = requests.len().min(self.replies.len() - 1);
            requests.push(request);
            let mut message = self.replies[idx].clone();
            message.timestamp = Utc::now();
            Ok(ProviderResponse {
                message,
                usage: Some(Usage {
                    prompt_tokens: 10,
                    completion_tokens: 5,
                    total_tokens: 15,
                }),
                model: "scripted-model".into(),
            })
        }
    }

    struct FailingProvider;

    #[async_trait::async_trait]
    impl Provider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        async fn complete(
            &self,
            _request: ProviderRequest,
        ) -> std::result::Result<ProviderResponse, ProviderError> {
            Err(ProviderError::ApiError {
                status_code: 500,
                message: "upstream down".into(),
            })
        }
    }

    /// Returns canned outputs per tool name and records every invocation.
    #[derive(Default)]
    struct ScriptedInvoker {
        outputs: HashMap<String, std::result::Result<ToolContent, ToolError>>,
        invoked: Mutex<Vec<(String, ToolArguments)>>,
    }

    impl ScriptedInvoker {
        fn with(mut self, tool: &str, output: std::result::Result<ToolContent, ToolError>) -> Self {
            self.outputs.insert(tool.into(), output);
            self
        }

        fn names(&self) -> Vec<String> {
            self.invoked.lock().unwrap().iter().map(|(n, _)| n.clone()).collect()
        }
    }

    #[async_trait::async_trait]
    impl ToolInvoker for ScriptedInvoker {
        async fn invoke(
            &self,
            tool_name: &str,
            arguments: &ToolArguments,
        ) -> std::result::Result<ToolContent, ToolError> {
            self.invoked
                .lock()
                .unwrap()
                .push((tool_name.to_string(), arguments.clone()));
            self.outputs
                .get(tool_name)
                .cloned()
                .unwrap_or_else(|| Err(ToolError::NotFound(tool_name.to_string())))
        }
    }

    fn call(id: &str, name: &str, arguments: &str) -> MessageToolCall {
        MessageToolCall {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    fn calc_tool() -> ToolDefinition {
        ToolDefinition {
            name: "calc".into(),
            description: "Evaluate an arithmetic expression".into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {"expr": {"type": "string"}},
                "required": ["expr"]
            }),
        }
    }

    fn agent(provider: Arc<dyn Provider>, invoker: Arc<dyn ToolInvoker>) -> AgentLoop {
        AgentLoop::new(provider, invoker, "gpt-4")
    }

    #[tokio::test]
    async fn direct_tagged_answer_finishes_in_one_round() {
        let provider = ScriptedProvider::new(vec![Message::assistant(TAGGED)]);
        let invoker = Arc::new(ScriptedInvoker::default());

        let run = agent(provider.clone(), invoker)
            .run("What is 2+2?", &[])
            .await
            .unwrap();

        assert_eq!(run.termination, Termination::Done);
        assert_eq!(run.final_text, TAGGED);
        assert!(run.metrics.is_empty());
        assert_eq!(run.iterations, 1);

        let request = provider.request(0);
        assert!(request.tools.is_empty());
        assert_eq!(request.tool_choice, None);
        assert_eq!(request.max_tokens, Some(4096));
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[0].content, DEFAULT_SYSTEM_PROMPT);
        assert_eq!(request.messages[1].content, "What is 2+2?");
    }

    #[tokio::test]
    async fn tool_round_is_recorded_and_fed_back() {
        let provider = ScriptedProvider::new(vec![
            Message::assistant_with_tools("", vec![call("call_1", "calc", r#"{"expr":"2+2"}"#)]),
            Message::assistant(TAGGED),
        ]);
        let invoker = Arc::new(ScriptedInvoker::default().with("calc", Ok(ToolContent::text("4"))));

        let run = agent(provider.clone(), invoker.clone())
            .run("What is 2+2?", &[calc_tool()])
            .await
            .unwrap();

        assert!(run.is_done());
        assert_eq!(run.iterations, 2);
        let calc = run.metrics.get("calc").unwrap();
        assert_eq!(calc.count(), 1);
        assert_eq!(calc.calls()[0].arguments["expr"], "2+2");

        let first = provider.request(0);
        assert_eq!(first.tool_choice, Some(ToolChoice::Auto));
        assert_eq!(first.tools[0].name, "calc");

        let second = provider.request(1);
        let tool_msg = second.messages.last().unwrap();
        assert_eq!(tool_msg.role, Role::Tool);
        assert_eq!(tool_msg.tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(tool_msg.content, "4");
    }

    #[tokio::test]
    async fn missing_tags_trigger_one_correction() {
        let provider = ScriptedProvider::new(vec![
            Message::assistant("The answer is 4."),
            Message::assistant(TAGGED),
        ]);
        let invoker = Arc::new(ScriptedInvoker::default());

        let run = agent(provider.clone(), invoker).run("What is 2+2?", &[]).await.unwrap();

        assert!(run.is_done());
        assert_eq!(run.iterations, 2);
        assert_eq!(provider.calls(), 2);

        let correction = &run.transcript.messages()[3];
        assert_eq!(correction.role, Role::User);
        assert!(correction.content.contains("<response>, <summary>, <feedback>"));
        assert_eq!(run.final_text, TAGGED);
    }

    #[tokio::test]
    async fn budget_exhaustion_stops_after_exact_round_count() {
        let provider = ScriptedProvider::new(vec![
            Message::assistant("attempt 1"),
            Message::assistant("attempt 2"),
            Message::assistant("attempt 3"),
            Message::assistant("attempt 4"),
        ]);
        let invoker = Arc::new(ScriptedInvoker::default());

        let run = agent(provider.clone(), invoker)
            .with_max_iterations(3)
            .run("What is 2+2?", &[])
            .await
            .unwrap();

        assert_eq!(run.termination, Termination::Exhausted);
        assert_eq!(run.iterations, 3);
        assert_eq!(provider.calls(), 3);
        assert_eq!(run.final_text, "attempt 3");
        // Every miss, including the last, gets a correction.
        let corrections = run
            .transcript
            .messages()
            .iter()
            .filter(|m| m.role == Role::User && m.content.starts_with("ERROR:"))
            .count();
        assert_eq!(corrections, 3);
    }

    #[tokio::test]
    async fn endless_tool_calls_also_exhaust_the_budget() {
        let provider = ScriptedProvider::new(vec![Message::assistant_with_tools(
            "still working",
            vec![call("c", "calc", r#"{"expr":"1"}"#)],
        )]);
        let invoker = Arc::new(ScriptedInvoker::default().with("calc", Ok(ToolContent::text("1"))));

        let run = agent(provider.clone(), invoker)
            .with_max_iterations(4)
            .run("loop forever", &[calc_tool()])
            .await
            .unwrap();

        assert_eq!(run.termination, Termination::Exhausted);
        assert_eq!(provider.calls(), 4);
        assert_eq!(run.metrics.get("calc").unwrap().count(), 4);
        assert_eq!(run.final_text, "still working");
    }

    #[tokio::test]
    async fn zero_budget_never_calls_the_model() {
        let provider = ScriptedProvider::new(vec![Message::assistant(TAGGED)]);
        let run = agent(provider.clone(), Arc::new(ScriptedInvoker::default()))
            .with_max_iterations(0)
            .run("anything", &[])
            .await
            .unwrap();

        assert_eq!(run.termination, Termination::Exhausted);
        assert_eq!(provider.calls(), 0);
        assert_eq!(run.final_text, "");
    }

    #[tokio::test]
    async fn tool_results_follow_issue_order() {
        let provider = ScriptedProvider::new(vec![
            Message::assistant_with_tools(
                "",
                vec![
                    call("c3", "write", r#"{"path":"/a"}"#),
                    call("c1", "read", r#"{"path":"/a"}"#),
                    call("c2", "write", r#"{"path":"/b"}"#),
                ],
            ),
            Message::assistant(TAGGED),
        ]);
        let invoker = Arc::new(
            ScriptedInvoker::default()
                .with("write", Ok(ToolContent::text("ok")))
                .with("read", Ok(ToolContent::text("data"))),
        );

        let run = agent(provider, invoker.clone()).run("files", &[]).await.unwrap();

        assert_eq!(invoker.names(), vec!["write", "read", "write"]);
        let tool_ids: Vec<_> = run
            .transcript
            .messages()
            .iter()
            .filter(|m| m.role == Role::Tool)
            .map(|m| m.tool_call_id.clone().unwrap())
            .collect();
        assert_eq!(tool_ids, vec!["c3", "c1", "c2"]);
        assert_eq!(run.metrics.tool_names(), vec!["write", "read"]);
    }

    #[tokio::test]
    async fn metrics_stay_consistent_across_rounds() {
        let provider = ScriptedProvider::new(vec![
            Message::assistant_with_tools(
                "",
                vec![call("a", "calc", r#"{"expr":"1"}"#), call("b", "shell", "{}")],
            ),
            Message::assistant_with_tools("", vec![call("c", "calc", r#"{"expr":"2"}"#)]),
            Message::assistant(TAGGED),
        ]);
        let invoker = Arc::new(
            ScriptedInvoker::default()
                .with("calc", Ok(ToolContent::text("1")))
                .with("shell", Err(ToolError::Transport("boom".into()))),
        );

        let run = agent(provider, invoker).run("mix", &[]).await.unwrap();

        assert_eq!(run.metrics.total_calls(), 3);
        for (_, m) in run.metrics.iter() {
            assert_eq!(m.durations().len(), m.count());
            assert_eq!(m.calls().len(), m.count());
            for (d, c) in m.durations().iter().zip(m.calls()) {
                assert_eq!(*d, c.duration);
            }
        }
        assert_eq!(run.metrics.timeline().len(), 3);
        assert_eq!(run.metrics.tool_names(), vec!["calc", "shell"]);
    }

    #[tokio::test]
    async fn tool_failure_is_reported_in_band() {
        let provider = ScriptedProvider::new(vec![
            Message::assistant_with_tools("", vec![call("x", "shell", r#"{"command":"ls"}"#)]),
            Message::assistant(TAGGED),
        ]);
        let invoker = Arc::new(
            ScriptedInvoker::default()
                .with("shell", Err(ToolError::Transport("connection reset".into()))),
        );

        let run = agent(provider, invoker).run("list files", &[]).await.unwrap();

        assert!(run.is_done());
        assert_eq!(run.metrics.get("shell").unwrap().count(), 1);
        let tool_msg = run
            .transcript
            .messages()
            .iter()
            .find(|m| m.role == Role::Tool)
            .unwrap();
        assert!(
            tool_msg
                .content
                .starts_with("ERROR: Tool execution failed\nType: TransportError\n")
        );
        assert!(tool_msg.content.contains("connection reset"));
        assert!(tool_msg.content.ends_with(sandeval_core::tool::FAILURE_GUIDANCE));
    }

    #[tokio::test]
    async fn unknown_tool_is_contained() {
        let provider = ScriptedProvider::new(vec![
            Message::assistant_with_tools("", vec![call("x", "ghost", "{}")]),
            Message::assistant(TAGGED),
        ]);
        let run = agent(provider, Arc::new(ScriptedInvoker::default()))
            .run("call a missing tool", &[])
            .await
            .unwrap();

        assert!(run.is_done());
        assert_eq!(run.metrics.get("ghost").unwrap().count(), 1);
    }

    #[tokio::test]
    async fn invalid_json_arguments_are_fatal() {
        let provider = ScriptedProvider::new(vec![Message::assistant_with_tools(
            "",
            vec![call("x", "calc", r#"{"expr": "2+2""#)],
        )]);
        let invoker = Arc::new(ScriptedInvoker::default().with("calc", Ok(ToolContent::text("4"))));

        let err = agent(provider, invoker.clone())
            .run("What is 2+2?", &[calc_tool()])
            .await
            .unwrap_err();

        match err {
            Error::MalformedToolArguments { tool_name, arguments, .. } => {
                assert_eq!(tool_name, "calc");
                assert_eq!(arguments, r#"{"expr": "2+2""#);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(invoker.names().is_empty());
    }

    #[tokio::test]
    async fn calls_before_a_malformed_one_have_already_run() {
        let provider = ScriptedProvider::new(vec![Message::assistant_with_tools(
            "",
            vec![
                call("a", "calc", r#"{"expr":"1+1"}"#),
                call("b", "calc", "{broken"),
                call("c", "calc", r#"{"expr":"3+3"}"#),
            ],
        )]);
        let invoker = Arc::new(ScriptedInvoker::default().with("calc", Ok(ToolContent::text("2"))));

        let err = agent(provider.clone(), invoker.clone())
            .run("add things", &[calc_tool()])
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "MalformedToolArguments");
        assert_eq!(provider.calls(), 1);
        let invoked = invoker.invoked.lock().unwrap().clone();
        assert_eq!(invoked.len(), 1);
        assert_eq!(invoked[0].1["expr"], "1+1");
    }

    #[tokio::test]
    async fn non_object_arguments_are_fatal() {
        let provider = ScriptedProvider::new(vec![Message::assistant_with_tools(
            "",
            vec![call("x", "calc", "[1, 2]")],
        )]);
        let err = agent(provider, Arc::new(ScriptedInvoker::default()))
            .run("What is 2+2?", &[])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "MalformedToolArguments");
    }

    #[tokio::test]
    async fn provider_failure_surfaces() {
        let err = agent(Arc::new(FailingProvider), Arc::new(ScriptedInvoker::default()))
            .run("What is 2+2?", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Provider(ProviderError::ApiError { status_code: 500, .. })));
    }

    #[tokio::test]
    async fn options_reach_the_request() {
        let provider = ScriptedProvider::new(vec![Message::assistant(TAGGED)]);
        agent(provider.clone(), Arc::new(ScriptedInvoker::default()))
            .with_system_prompt("Answer with tags.")
            .with_max_tokens(512)
            .with_temperature(0.2)
            .run("What is 2+2?", &[])
            .await
            .unwrap();

        let request = provider.request(0);
        assert_eq!(request.messages[0].content, "Answer with tags.");
        assert_eq!(request.max_tokens, Some(512));
        assert_eq!(request.temperature, Some(0.2));
        assert_eq!(request.model, "gpt-4");
    }
}
