//! Agent runtime - LLM-powered order taking and tool orchestration
//!
//! This crate is the conversational "front of house" of the kiosk:
//! - Talks to an OpenAI-compatible chat-completion endpoint (`llm`)
//! - Wraps remote calls in bounded exponential-backoff retries (`retry`)
//! - Exposes menu and order operations as callable tools (`tools`)
//! - Runs the bounded tool-call loop per customer turn (`runtime`)
//! - Keeps a windowed in-process conversation history (`conversation`)
//!
//! # Safety Principle
//!
//! The LLM is strictly a translator. It NEVER decides prices or order
//! arithmetic. Tool handlers copy prices from the menu catalog and all
//! mutation goes through the `pattybot-core` order aggregate, so a
//! hallucinated price in model output has nowhere to land.

pub mod conversation;
pub mod llm;
pub mod retry;
pub mod runtime;
pub mod tools;

pub use llm::{AssistantTurn, ChatMessage, ChatToolCall, LlmClient, LlmError, OpenAiCompatClient};
pub use retry::RetryPolicy;
pub use runtime::{AgentReply, AgentRuntime};
pub use tools::{KioskState, Tool, ToolRegistry};
