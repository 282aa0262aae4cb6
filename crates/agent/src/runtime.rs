use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use pattybot_core::config::AppConfig;
use pattybot_core::errors::ApplicationError;
use pattybot_core::validation::{sanitize_text, validate_user_input};

use crate::conversation::ConversationHistory;
use crate::llm::{ChatMessage, LlmClient};
use crate::retry::{self, RetryPolicy};
use crate::tools::{standard_registry, KioskState, ToolRegistry};

const SYSTEM_PROMPT: &str = "\
You are the friendly ordering assistant at a burger restaurant kiosk.

Your job:
1. Take the customer's order accurately using the provided tools.
2. Answer questions about the menu.
3. Suggest sides or drinks where it fits naturally.
4. Review the order with the customer and help them confirm it.

Guidelines:
- Always be polite and clear.
- Use the tools for every menu lookup and order change; never invent
  items or prices.
- Confirm what you changed after each order mutation.
- Ask a clarifying question when the request is ambiguous.
- Thank the customer once the order is confirmed.";

/// What the kiosk screen renders for one customer turn.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentReply {
    pub message: String,
    pub success: bool,
    pub error: Option<String>,
    /// Running total, present whenever the order has lines.
    pub order_total: Option<Decimal>,
}

impl AgentReply {
    fn failure(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self { message: message.into(), success: false, error: Some(error.into()), order_total: None }
    }
}

/// Per-session orchestrator: one runtime owns one order and one
/// conversation. Turns are strictly sequential.
pub struct AgentRuntime {
    llm: Arc<dyn LlmClient>,
    registry: ToolRegistry,
    state: KioskState,
    history: ConversationHistory,
    retry: RetryPolicy,
    max_tool_iterations: u32,
    history_window: usize,
}

impl AgentRuntime {
    pub fn new(llm: Arc<dyn LlmClient>, state: KioskState, config: &AppConfig) -> Self {
        Self {
            llm,
            registry: standard_registry(state.clone()),
            state,
            history: ConversationHistory::new(),
            retry: RetryPolicy::from_config(&config.llm),
            max_tool_iterations: config.kiosk.max_tool_iterations,
            history_window: config.kiosk.history_window,
        }
    }

    pub fn state(&self) -> &KioskState {
        &self.state
    }

    /// Handle one customer utterance: validate, consult the model, run any
    /// tool calls it asks for (bounded), and return the final wording.
    pub async fn handle_turn(&mut self, input: &str) -> AgentReply {
        let report = validate_user_input(input);
        if !report.is_valid() {
            return AgentReply::failure(
                "Sorry, I couldn't read that. Could you phrase it differently?",
                report.errors.join("; "),
            );
        }

        let sanitized = sanitize_text(input);
        self.history.push_user(&sanitized);

        let definitions = self.registry.definitions();
        let mut messages = Vec::with_capacity(self.history_window + 2);
        messages.push(ChatMessage::system(SYSTEM_PROMPT));
        messages.extend(self.history.window(self.history_window));

        for iteration in 0..self.max_tool_iterations {
            let turn = match retry::with_backoff(&self.retry, "llm.chat", || {
                self.llm.chat(&messages, &definitions)
            })
            .await
            {
                Ok(turn) => turn,
                Err(llm_error) => {
                    error!(
                        event_name = "agent.turn.llm_failed",
                        iteration,
                        error = %llm_error,
                        "llm call failed after retries"
                    );
                    let application = ApplicationError::Llm(llm_error.to_string());
                    return AgentReply::failure(application.user_message(), llm_error.to_string());
                }
            };

            if !turn.has_tool_calls() {
                let message = turn
                    .content
                    .filter(|content| !content.trim().is_empty())
                    .unwrap_or_else(|| "Is there anything else I can get you?".to_string());
                self.history.push_assistant(&message);
                return AgentReply {
                    message,
                    success: true,
                    error: None,
                    order_total: self.current_total().await,
                };
            }

            messages.push(ChatMessage::assistant_tool_calls(
                turn.content.clone(),
                turn.tool_calls.clone(),
            ));

            for call in &turn.tool_calls {
                debug!(
                    event_name = "agent.turn.tool_call",
                    iteration,
                    tool = %call.function.name,
                    "executing tool call"
                );

                let arguments = match serde_json::from_str::<Value>(&call.function.arguments) {
                    Ok(value) => value,
                    Err(decode_error) => {
                        // Recover with empty arguments rather than dropping
                        // the turn; the tool will report what is missing.
                        warn!(
                            event_name = "agent.turn.bad_tool_arguments",
                            tool = %call.function.name,
                            error = %decode_error,
                            raw = %call.function.arguments,
                            "tool arguments were not valid json"
                        );
                        json!({})
                    }
                };

                let payload = self.registry.dispatch(&call.function.name, arguments).await;
                messages.push(ChatMessage::tool_result(&call.id, payload.to_string()));
            }
        }

        warn!(
            event_name = "agent.turn.iteration_cap",
            max_tool_iterations = self.max_tool_iterations,
            "tool loop hit its iteration cap"
        );
        AgentReply {
            message: "I'm having trouble finishing that step. Could you try once more?"
                .to_string(),
            success: false,
            error: Some("tool iteration cap reached".to_string()),
            order_total: self.current_total().await,
        }
    }

    /// Wipe the order and the conversation, as when a customer walks away.
    pub async fn reset(&mut self) {
        self.history.clear();
        self.state.reset_order().await;
    }

    async fn current_total(&self) -> Option<Decimal> {
        let order = self.state.order.lock().await;
        (!order.is_empty()).then(|| order.total())
    }
}
