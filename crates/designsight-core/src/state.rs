//! Accumulated run state and the structural fold that builds it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::agent::AgentAssessment;
use crate::error::FailureKind;
use crate::registry::AgentId;

/// One line of run progress, keyed by the emitting agent. Append-only;
/// emission order matches invocation order so runs replay deterministically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub agent_id: AgentId,
    pub message: String,
}

impl LogEntry {
    pub fn new(agent_id: AgentId, message: impl Into<String>) -> Self {
        Self {
            agent_id,
            message: message.into(),
        }
    }
}

/// Side of the debate a turn belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebateRole {
    Pro,
    Con,
}

impl DebateRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebateRole::Pro => "Pro",
            DebateRole::Con => "Con",
        }
    }
}

impl std::fmt::Display for DebateRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single utterance in the adversarial transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateTurn {
    pub role: DebateRole,
    pub content: String,
}

/// Judge-mode critique over the aggregated report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    pub overall_score: f32,
    pub required_fixes: Vec<String>,
}

/// Failure record that substitutes for an assessment in the result stream,
/// so aggregation downstream never branches on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentFailure {
    pub agent_id: AgentId,
    pub kind: FailureKind,
    pub message: String,
}

/// Success-or-failure unit occupying one slot in the result sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AgentOutcome {
    Assessed(AgentAssessment),
    Failed(AgentFailure),
}

impl AgentOutcome {
    pub fn agent_id(&self) -> AgentId {
        match self {
            AgentOutcome::Assessed(assessment) => assessment.agent_id,
            AgentOutcome::Failed(failure) => failure.agent_id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            AgentOutcome::Assessed(assessment) => &assessment.agent_label,
            AgentOutcome::Failed(failure) => failure.agent_id.label(),
        }
    }

    /// Failures score 0 so aggregate statistics stay defined under
    /// partial failure.
    pub fn score(&self) -> f32 {
        match self {
            AgentOutcome::Assessed(assessment) => assessment.score,
            AgentOutcome::Failed(_) => 0.0,
        }
    }

    pub fn narrative(&self) -> &str {
        match self {
            AgentOutcome::Assessed(assessment) => &assessment.narrative,
            AgentOutcome::Failed(failure) => &failure.message,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            AgentOutcome::Assessed(_) => None,
            AgentOutcome::Failed(failure) => Some(failure.kind),
        }
    }
}

/// Partial update emitted by the orchestrator and folded by the merger.
#[derive(Debug, Clone)]
pub enum StateDelta {
    Outcome(AgentOutcome),
    Log(LogEntry),
    Scorecard(Scorecard),
    Turn(DebateTurn),
}

/// Merged run state. Handed to consumers read-only once the run completes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccumulatedState {
    pub results: Vec<AgentOutcome>,
    pub logs: Vec<LogEntry>,
    pub scorecard: Option<Scorecard>,
    pub transcript: Vec<DebateTurn>,
}

impl AccumulatedState {
    pub fn result_for(&self, id: AgentId) -> Option<&AgentOutcome> {
        self.results.iter().find(|outcome| outcome.agent_id() == id)
    }

    pub fn mean_score(&self) -> f32 {
        if self.results.is_empty() {
            return 0.0;
        }
        let total: f32 = self.results.iter().map(AgentOutcome::score).sum();
        total / self.results.len() as f32
    }
}

/// Structural fold of the orchestrator's emission stream.
///
/// First writer wins per agent id; logs and transcript are append-only; the
/// scorecard is set once. The merger never inspects narrative content.
#[derive(Debug, Default)]
pub struct StateMerger {
    state: AccumulatedState,
    recorded: HashSet<AgentId>,
}

impl StateMerger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, delta: StateDelta) {
        match delta {
            StateDelta::Outcome(outcome) => {
                let id = outcome.agent_id();
                if !self.recorded.insert(id) {
                    tracing::warn!(agent_id = %id, "duplicate outcome dropped");
                    return;
                }
                self.state.results.push(outcome);
            }
            StateDelta::Log(entry) => self.state.logs.push(entry),
            StateDelta::Scorecard(scorecard) => {
                if self.state.scorecard.is_some() {
                    tracing::warn!("second scorecard dropped");
                    return;
                }
                self.state.scorecard = Some(scorecard);
            }
            StateDelta::Turn(turn) => self.state.transcript.push(turn),
        }
    }

    /// Freeze the accumulated state; no further deltas can be applied.
    pub fn finish(self) -> AccumulatedState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assessment(id: AgentId, score: f32) -> AgentOutcome {
        AgentOutcome::Assessed(AgentAssessment {
            agent_id: id,
            agent_label: id.label().to_string(),
            narrative: format!("narrative for {id}"),
            score,
        })
    }

    fn sample_stream() -> Vec<StateDelta> {
        vec![
            StateDelta::Log(LogEntry::new(AgentId::Brand, "started")),
            StateDelta::Outcome(assessment(AgentId::Brand, 8.0)),
            StateDelta::Log(LogEntry::new(AgentId::Aesthetic, "started")),
            StateDelta::Outcome(assessment(AgentId::Aesthetic, 6.0)),
        ]
    }

    #[test]
    fn merge_preserves_invocation_order() {
        let mut merger = StateMerger::new();
        for delta in sample_stream() {
            merger.apply(delta);
        }
        let state = merger.finish();

        assert_eq!(state.results.len(), 2);
        assert_eq!(state.results[0].agent_id(), AgentId::Brand);
        assert_eq!(state.results[1].agent_id(), AgentId::Aesthetic);
        assert_eq!(state.logs.len(), 2);
    }

    #[test]
    fn merge_is_idempotent_across_fresh_states() {
        let mut first = StateMerger::new();
        let mut second = StateMerger::new();
        for delta in sample_stream() {
            first.apply(delta);
        }
        for delta in sample_stream() {
            second.apply(delta);
        }
        assert_eq!(first.finish(), second.finish());
    }

    #[test]
    fn first_writer_wins_per_agent_id() {
        let mut merger = StateMerger::new();
        merger.apply(StateDelta::Outcome(assessment(AgentId::Brand, 8.0)));
        merger.apply(StateDelta::Outcome(assessment(AgentId::Brand, 2.0)));
        let state = merger.finish();

        assert_eq!(state.results.len(), 1);
        assert_eq!(state.results[0].score(), 8.0);
    }

    #[test]
    fn scorecard_is_set_once() {
        let mut merger = StateMerger::new();
        merger.apply(StateDelta::Scorecard(Scorecard {
            overall_score: 6.0,
            required_fixes: vec!["tighten CTA copy".into()],
        }));
        merger.apply(StateDelta::Scorecard(Scorecard {
            overall_score: 1.0,
            required_fixes: vec![],
        }));
        let state = merger.finish();

        assert_eq!(state.scorecard.expect("scorecard").overall_score, 6.0);
    }

    #[test]
    fn failures_score_zero_in_aggregates() {
        let mut merger = StateMerger::new();
        merger.apply(StateDelta::Outcome(assessment(AgentId::Brand, 8.0)));
        merger.apply(StateDelta::Outcome(AgentOutcome::Failed(AgentFailure {
            agent_id: AgentId::Privacy,
            kind: FailureKind::ConfigurationMissing,
            message: "no credential available for provider tavily".into(),
        })));
        let state = merger.finish();

        assert_eq!(state.results.len(), 2);
        assert_eq!(state.mean_score(), 4.0);
        assert_eq!(
            state.result_for(AgentId::Privacy).and_then(AgentOutcome::failure_kind),
            Some(FailureKind::ConfigurationMissing)
        );
    }
}
