//! Streaming reporter — the ordered progress-event boundary
//!
//! One analysis run maps to a fixed event sequence:
//! `analysis_started`, three `agent_started`, then after the Phase-1 join
//! three `agent_completed` in declared agent order, `synthesis_started`, and
//! a terminal `analysis_complete` — or a single terminal `error` if the model
//! collaborator fails. Events flow through an mpsc channel; a dropped
//! receiver (client went away) just stops emission.

use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::agents::{BUSINESS_VERIFIER, FINANCIAL_ANALYST, RISK_ASSESSOR};
use crate::coordinator::Coordinator;
use crate::models::{Submission, UnderwritingDecision};

/// A transient, ordered progress signal. Consumed once by the boundary.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    AnalysisStarted,
    AgentStarted {
        agent_name: &'static str,
    },
    AgentCompleted {
        agent_name: &'static str,
        result: Value,
    },
    SynthesisStarted,
    AnalysisComplete(Box<UnderwritingDecision>),
    Error {
        message: String,
    },
}

impl ProgressEvent {
    /// Wire-level event name.
    pub fn kind(&self) -> &'static str {
        match self {
            ProgressEvent::AnalysisStarted => "analysis_started",
            ProgressEvent::AgentStarted { .. } => "agent_started",
            ProgressEvent::AgentCompleted { .. } => "agent_completed",
            ProgressEvent::SynthesisStarted => "synthesis_started",
            ProgressEvent::AnalysisComplete(_) => "analysis_complete",
            ProgressEvent::Error { .. } => "error",
        }
    }

    /// Wire-level JSON payload.
    pub fn payload(&self) -> Value {
        match self {
            ProgressEvent::AnalysisStarted => {
                json!({ "message": "Starting underwriting analysis" })
            }
            ProgressEvent::AgentStarted { agent_name } => {
                json!({ "agentName": agent_name, "status": "started" })
            }
            ProgressEvent::AgentCompleted { agent_name, result } => {
                json!({ "agentName": agent_name, "result": result })
            }
            ProgressEvent::SynthesisStarted => {
                json!({ "message": "Synthesizing final decision" })
            }
            ProgressEvent::AnalysisComplete(decision) => {
                serde_json::to_value(decision.as_ref()).unwrap_or_default()
            }
            ProgressEvent::Error { message } => json!({
                "message": "An error occurred during analysis",
                "error": message,
            }),
        }
    }

    /// Terminal events end the stream; exactly one is emitted per run.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProgressEvent::AnalysisComplete(_) | ProgressEvent::Error { .. }
        )
    }
}

/// Drive one analysis and push its event sequence into `tx`.
///
/// Emission stops silently if the receiver is dropped mid-run.
pub async fn run_streaming(
    coordinator: Arc<Coordinator>,
    submission: Submission,
    tx: mpsc::Sender<ProgressEvent>,
) {
    let started = Instant::now();

    let preamble = [
        ProgressEvent::AnalysisStarted,
        ProgressEvent::AgentStarted {
            agent_name: BUSINESS_VERIFIER,
        },
        ProgressEvent::AgentStarted {
            agent_name: FINANCIAL_ANALYST,
        },
        ProgressEvent::AgentStarted {
            agent_name: RISK_ASSESSOR,
        },
    ];
    for event in preamble {
        if tx.send(event).await.is_err() {
            debug!("Event receiver dropped before analysis started");
            return;
        }
    }

    let findings = match coordinator.run_agents(&submission).await {
        Ok(findings) => findings,
        Err(e) => {
            error!("Agent phase failed: {}", e);
            let _ = tx
                .send(ProgressEvent::Error {
                    message: e.to_string(),
                })
                .await;
            return;
        }
    };

    let completions = [
        (
            BUSINESS_VERIFIER,
            serde_json::to_value(&findings.business_verifier).unwrap_or_default(),
        ),
        (
            FINANCIAL_ANALYST,
            serde_json::to_value(&findings.financial_analyst).unwrap_or_default(),
        ),
        (
            RISK_ASSESSOR,
            serde_json::to_value(&findings.risk_assessor).unwrap_or_default(),
        ),
    ];
    for (agent_name, result) in completions {
        let event = ProgressEvent::AgentCompleted { agent_name, result };
        if tx.send(event).await.is_err() {
            debug!("Event receiver dropped after agent phase");
            return;
        }
    }

    if tx.send(ProgressEvent::SynthesisStarted).await.is_err() {
        return;
    }

    match coordinator.finish(&submission, findings, started).await {
        Ok(decision) => {
            let _ = tx
                .send(ProgressEvent::AnalysisComplete(Box::new(decision)))
                .await;
        }
        Err(e) => {
            error!("Synthesis failed: {}", e);
            let _ = tx
                .send(ProgressEvent::Error {
                    message: e.to_string(),
                })
                .await;
        }
    }
}
