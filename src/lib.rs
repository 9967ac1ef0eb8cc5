//! AgentLend Underwriting Orchestrator
//!
//! A demo lending-underwriting assistant that:
//! - Fans a loan submission out to three LLM-prompted agents
//!   (business verification, financial analysis, risk assessment)
//! - Augments each agent's prompt with web-search snippets
//! - Synthesizes the three findings into a final decision with one more
//!   LLM call
//! - Streams progress to the client as Server-Sent Events
//!
//! PIPELINE:
//! SUBMISSION → AGENTS (parallel) → JOIN → SYNTHESIS → DECISION

pub mod agents;
pub mod api;
pub mod coordinator;
pub mod error;
pub mod extract;
pub mod llm;
pub mod models;
pub mod reporter;
pub mod search;

pub use error::Result;

// Re-export common types
pub use coordinator::Coordinator;
pub use models::*;
pub use reporter::ProgressEvent;
