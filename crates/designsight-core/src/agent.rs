//! The agent capability contract shared by every concrete agent.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;
use crate::registry::AgentId;
use crate::state::{DebateTurn, Scorecard};

/// Shared input handed to every agent in a run.
#[derive(Debug, Clone)]
pub enum Payload {
    /// A design mockup, base64-encoded PNG.
    Design { image_base64: String },
    /// A research question.
    Research { question: String },
}

impl Payload {
    pub fn design(image_base64: impl Into<String>) -> Self {
        Payload::Design {
            image_base64: image_base64.into(),
        }
    }

    pub fn research(question: impl Into<String>) -> Self {
        Payload::Research {
            question: question.into(),
        }
    }
}

/// Structured result of a successful agent invocation. Immutable once
/// produced; consumed exactly once by the state merger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentAssessment {
    pub agent_id: AgentId,
    pub agent_label: String,
    pub narrative: String,
    pub score: f32,
}

/// A unit that turns a payload plus free-form context into a scored
/// narrative via exactly one outbound model call.
///
/// Implementations do not retry; retry and timeout policy belong to the
/// orchestrator.
#[async_trait]
pub trait Agent: Send + Sync {
    fn id(&self) -> AgentId;

    fn label(&self) -> &str;

    async fn analyze(&self, payload: &Payload, context: &str)
    -> Result<AgentAssessment, AgentError>;
}

/// Post-pass critique executor for Judge mode: one call over the
/// concatenated per-agent narratives.
#[async_trait]
pub trait CritiqueAgent: Send + Sync {
    async fn critique(&self, report: &str) -> Result<Scorecard, AgentError>;
}

/// Adversarial pro/con executor for Debate mode. Turns are returned in
/// speaking order; the orchestrator appends each to the transcript
/// individually.
#[async_trait]
pub trait DebateAgent: Send + Sync {
    async fn debate(&self, payload: &Payload, context: &str)
    -> Result<Vec<DebateTurn>, AgentError>;
}
