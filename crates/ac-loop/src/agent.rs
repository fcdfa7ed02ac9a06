//! The Agent Loop: the think/act state machine tying every other component
//! together.

use std::sync::Arc;
use std::time::Duration;

use ac_context::ContextAssembler;
use ac_datasource::DatasourceRegistry;
use ac_domain::config::Config;
use ac_domain::error::{Error, Result};
use ac_domain::message::{Message, Role};
use ac_domain::trace::TraceEvent;
use ac_eventlog::{Event, EventLog, EventPayload, MessageRole};
use ac_knowledge::KnowledgeRegistry;
use ac_llm::{LlmProvider, ToolChoice};
use ac_plan::{PlanStore, Planner};
use ac_tools::{ToolCatalog, ToolOutput};
use chrono::Utc;

use crate::state::RunState;
use crate::summary::{RunSummary, ToolCallResult};

const SUCCESS_LEXEMES: [&str; 5] = ["success", "completed", "done", "created", "updated"];

fn contains_success_lexeme(text: &str) -> bool {
    let lower = text.to_lowercase();
    SUCCESS_LEXEMES.iter().any(|lexeme| lower.contains(lexeme))
}

/// Re-derives the conversational (Message/Observation) projection directly
/// from event payloads, deliberately not reusing `EventLog::to_messages`
/// (which also renders Plan/Knowledge/Datasource as system messages) — the
/// Assembler owns rendering those blocks, so folding them in here too would
/// duplicate them in the prompt. See DESIGN.md.
fn conversation_messages(log: &EventLog) -> Vec<Message> {
    log.all()
        .iter()
        .filter_map(|event| match &event.payload {
            EventPayload::Message { role, content, image } => {
                let transport_role = match role {
                    MessageRole::User => Role::User,
                    MessageRole::Assistant => Role::Assistant,
                };
                Some(Message {
                    role: transport_role,
                    content: content.clone(),
                    tool_call_id: None,
                    name: None,
                    image: image.clone(),
                })
            }
            EventPayload::Observation {
                tool_name,
                tool_call_id,
                output,
                error,
                ..
            } => {
                let content = match error {
                    Some(e) => format!("Error: {e}"),
                    None => output.clone(),
                };
                Some(Message::tool(tool_call_id.clone(), tool_name.clone(), content))
            }
            _ => None,
        })
        .collect()
}

fn default_stable_prefix() -> String {
    "You are an autonomous agent. Think step by step, use the available tools to \
     accomplish the user's request, and invoke the terminate tool once the \
     objective is verifiably satisfied."
        .to_string()
}

pub struct AgentLoop {
    config: Config,
    llm: Arc<dyn LlmProvider>,
    tools: Arc<ToolCatalog>,
    knowledge: Arc<KnowledgeRegistry>,
    datasource: Arc<DatasourceRegistry>,
    event_log: EventLog,
    plan_store: PlanStore,
    assembler: ContextAssembler,
    state: RunState,
}

impl AgentLoop {
    pub fn new(
        config: Config,
        llm: Arc<dyn LlmProvider>,
        tools: Arc<ToolCatalog>,
        knowledge: Arc<KnowledgeRegistry>,
        datasource: Arc<DatasourceRegistry>,
    ) -> Self {
        let mut assembler = ContextAssembler::new(
            config.context.recitation_update_frequency,
            config.context.error_ring_cap,
            config.context.summary_threshold,
            config.context.vary_serialization,
        );
        assembler.set_stable_prefix(default_stable_prefix());
        Self {
            event_log: EventLog::new(config.event_log.max_events),
            plan_store: PlanStore::new(config.plan.history_cap, config.plan.replan_on_error),
            assembler,
            state: RunState::Idle,
            config,
            llm,
            tools,
            knowledge,
            datasource,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    pub fn mask_tool(&mut self, tool: &str, reason: &str, conditions: Option<String>) {
        self.assembler.tool_masks.mask(tool, reason, conditions);
    }

    pub fn unmask_tool(&mut self, tool: &str) {
        self.assembler.tool_masks.unmask(tool);
    }

    /// Drives one full run to completion. Fails immediately with
    /// `InvalidState` if this loop is not `Idle`; re-entering `run` while a
    /// run is already in progress is a fatal misuse, not something to queue
    /// or merge.
    pub async fn run(&mut self, request: &str) -> Result<RunSummary> {
        if self.state != RunState::Idle {
            return Err(Error::InvalidState(format!("run() called while in {:?}", self.state)));
        }
        self.state = RunState::Running;
        let run_id = uuid::Uuid::new_v4().to_string();
        TraceEvent::RunStarted { run_id: run_id.clone() }.emit();

        let result = self.run_inner(&run_id, request).await;
        match &result {
            Ok(summary) => {
                self.state = RunState::Finished;
                TraceEvent::RunFinished {
                    run_id: run_id.clone(),
                    steps_used: summary.steps_used,
                    truncated: summary.truncated,
                }
                .emit();
            }
            Err(e) => {
                self.state = RunState::Error;
                TraceEvent::RunErrored {
                    run_id: run_id.clone(),
                    error_kind: error_kind_label(e),
                    message: e.to_string(),
                }
                .emit();
            }
        }
        result
    }

    async fn run_inner(&mut self, run_id: &str, request: &str) -> Result<RunSummary> {
        let now = Utc::now();
        self.event_log.append(Event::new(
            EventPayload::Message {
                role: MessageRole::User,
                content: request.to_string(),
                image: None,
            },
            now,
        ));

        if self.plan_store.current().is_none() {
            self.create_plan(run_id, request, None, now).await?;
        }

        let active_tools = self.tools.snapshot().names();
        for item in self.knowledge.relevant(request, &active_tools) {
            self.event_log.append(Event::new(
                EventPayload::Knowledge {
                    scope: item.scope.as_str().to_string(),
                    category: item.category.as_str().to_string(),
                    content: item.content.clone(),
                    conditions: item.conditions.clone(),
                    priority: item.priority,
                },
                now,
            ));
        }
        for ds in self.datasource.find_relevant(request, self.config.datasource.find_relevant_limit) {
            let endpoint = ds.endpoints.first().map(|e| e.path.clone()).unwrap_or_default();
            self.event_log.append(Event::new(
                EventPayload::Datasource {
                    source_id: ds.id.clone(),
                    name: ds.name.clone(),
                    endpoint,
                    auth_scheme: Some(ds.auth.label().to_string()),
                    documentation: ds.to_documentation(),
                    priority: ds.priority,
                },
                now,
            ));
        }

        let mut final_message = None;
        let mut tool_results = Vec::new();
        let mut step = 0usize;
        let mut completed_naturally = false;

        while step < self.config.agent.max_steps {
            step += 1;
            TraceEvent::StepStarted { run_id: run_id.to_string(), step }.emit();

            let knowledge_items = self.knowledge.relevant(request, &active_tools);
            let datasource_items = self
                .datasource
                .find_relevant(request, self.config.datasource.find_relevant_limit);
            let plan = self.plan_store.current().cloned();
            let recent = conversation_messages(&self.event_log);
            let (prefix, dynamic) = self.assembler.build_context(&knowledge_items, &datasource_items, plan.as_ref(), &recent);

            let mut system_messages = vec![Message::system(prefix)];
            let mut conversation = Vec::new();
            for message in dynamic {
                if message.role == Role::System {
                    system_messages.push(message);
                } else {
                    conversation.push(message);
                }
            }

            let snapshot = self.tools.snapshot();
            let reply = self
                .ask_tool_with_retry(&conversation, &system_messages, snapshot.definitions(), ToolChoice::Auto)
                .await?;

            if reply.tool_calls.is_empty() {
                let content = reply.content.unwrap_or_default();
                let now = Utc::now();
                self.event_log.append(Event::new(
                    EventPayload::Message {
                        role: MessageRole::Assistant,
                        content: content.clone(),
                        image: None,
                    },
                    now,
                ));
                final_message = Some(content);
                let plan_complete = self.plan_store.current().map(|p| p.complete).unwrap_or(true);
                if plan_complete {
                    completed_naturally = true;
                    break;
                }
                continue;
            }

            let mut hit_terminal = false;
            for call in reply.tool_calls {
                let input_value = call.parsed_arguments();
                let now = Utc::now();
                self.event_log.append(Event::new(
                    EventPayload::Action {
                        tool_name: call.name.clone(),
                        tool_call_id: call.id.clone(),
                        input: input_value.clone(),
                    },
                    now,
                ));
                TraceEvent::ToolDispatched {
                    run_id: run_id.to_string(),
                    tool_name: call.name.clone(),
                    tool_call_id: call.id.clone(),
                }
                .emit();

                let outcome = self.dispatch_tool(&call.name, input_value).await;
                let (output, error, image) = match outcome {
                    Ok(out) if out.is_success() => (out.output, None, out.image),
                    Ok(out) => {
                        let message = out.error.unwrap_or_else(|| "tool failed".to_string());
                        (out.output, Some(message), out.image)
                    }
                    Err(e) => (String::new(), Some(e.to_string()), None),
                };
                let output = ac_domain::truncation::truncate_bytes(&output, self.config.agent.max_observe);

                let now = Utc::now();
                self.event_log.append(Event::new(
                    EventPayload::Observation {
                        tool_name: call.name.clone(),
                        tool_call_id: call.id.clone(),
                        output: output.clone(),
                        error: error.clone(),
                        image: image.clone(),
                    },
                    now,
                ));

                if let Some(err) = &error {
                    self.assembler.error_ring.record(call.name.clone(), err.clone());
                    TraceEvent::ToolFailed {
                        run_id: run_id.to_string(),
                        tool_name: call.name.clone(),
                        error: err.clone(),
                    }
                    .emit();
                    tool_results.push(ToolCallResult {
                        tool_call_id: call.id.clone(),
                        tool_name: call.name.clone(),
                        output: output.clone(),
                        error: Some(err.clone()),
                    });
                    if self.plan_store.should_replan(err) {
                        self.replan(run_id, request, err, now).await?;
                    }
                } else {
                    tool_results.push(ToolCallResult {
                        tool_call_id: call.id.clone(),
                        tool_name: call.name.clone(),
                        output: output.clone(),
                        error: None,
                    });
                    if contains_success_lexeme(&output) {
                        self.advance_plan(now);
                    }
                }

                if self.config.agent.special_tool_names.iter().any(|n| n == &call.name) {
                    hit_terminal = true;
                }
            }
            if hit_terminal {
                completed_naturally = true;
                break;
            }
        }

        let truncated = self.config.agent.max_steps > 0 && !completed_naturally;
        Ok(RunSummary {
            run_id: run_id.to_string(),
            final_message,
            tool_results,
            plan_progress: self.plan_store.current().map(|p| p.progress()),
            steps_used: step,
            truncated,
        })
    }

    async fn create_plan(&mut self, run_id: &str, request: &str, context: Option<&str>, now: chrono::DateTime<Utc>) -> Result<()> {
        let planner = Planner::new(self.llm.as_ref());
        let (plan_id, step_count, payload) = {
            let plan = self.plan_store.create(&planner, uuid::Uuid::new_v4().to_string(), request, context, now).await?;
            (plan.id.clone(), plan.steps.len(), plan.to_event_payload())
        };
        self.event_log.append(Event::new(payload, now));
        TraceEvent::PlanCreated {
            run_id: run_id.to_string(),
            plan_id,
            step_count,
        }
        .emit();
        if let Some(plan) = self.plan_store.current() {
            let remaining = plan
                .steps
                .iter()
                .filter(|s| !s.status.is_terminal())
                .map(|s| s.description.clone())
                .collect();
            let completed = plan
                .steps
                .iter()
                .filter(|s| s.status.is_terminal())
                .map(|s| s.description.clone())
                .collect();
            self.assembler.todo.update(remaining, completed, now);
        }
        Ok(())
    }

    async fn replan(&mut self, run_id: &str, request: &str, reason: &str, now: chrono::DateTime<Utc>) -> Result<()> {
        let planner = Planner::new(self.llm.as_ref());
        let (new_plan_id, payload) = {
            let plan = self
                .plan_store
                .replan(&planner, uuid::Uuid::new_v4().to_string(), reason, request, now)
                .await?;
            (plan.id.clone(), plan.to_event_payload())
        };
        self.event_log.append(Event::new(payload, now));
        TraceEvent::Replanned {
            run_id: run_id.to_string(),
            reason: reason.to_string(),
            new_plan_id,
        }
        .emit();
        Ok(())
    }

    fn advance_plan(&mut self, now: chrono::DateTime<Utc>) {
        if let Some(plan) = self.plan_store.current_mut() {
            plan.advance(now);
        }
        if let Some(plan) = self.plan_store.current() {
            let payload = plan.to_event_payload();
            self.event_log.append(Event::new(payload, now));
        }
    }

    async fn dispatch_tool(&self, name: &str, params: serde_json::Value) -> Result<ToolOutput> {
        match self.tools.get(name) {
            Some(tool) => tool.execute(params).await,
            None => Err(Error::ToolNotFound(name.to_string())),
        }
    }

    /// Retries `ask_tool` with exponential backoff on `LlmTransient` errors,
    /// up to `llm_retry_cap`. `LlmFatal` (auth, token-limit) propagates
    /// immediately, never retried.
    async fn ask_tool_with_retry(
        &self,
        messages: &[Message],
        system_messages: &[Message],
        tools: &[ac_domain::message::ToolDefinition],
        tool_choice: ToolChoice,
    ) -> Result<ac_domain::message::AskToolReply> {
        let mut attempt = 0;
        loop {
            match self.llm.ask_tool(messages, system_messages, tools, tool_choice, None).await {
                Ok(reply) => return Ok(reply),
                Err(Error::LlmTransient(message)) => {
                    attempt += 1;
                    if attempt > self.config.agent.llm_retry_cap {
                        return Err(Error::LlmTransient(message));
                    }
                    let backoff_ms = 100u64.saturating_mul(1 << attempt.min(10));
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                }
                Err(other) => return Err(other),
            }
        }
    }
}

fn error_kind_label(error: &Error) -> String {
    match error {
        Error::InvalidState(_) => "InvalidState",
        Error::PlanningFailure(_) => "PlanningFailure",
        Error::ToolNotFound(_) => "ToolNotFound",
        Error::ToolFailure { .. } => "ToolFailure",
        Error::ToolTimeout(_) => "ToolTimeout",
        Error::LlmTransient(_) => "LlmTransient",
        Error::LlmFatal(_) => "LlmFatal",
        _ => "Other",
    }
    .to_string()
}
