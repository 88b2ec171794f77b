//! Sequences agent invocations, isolates per-agent failure, and streams
//! every outcome into the state merger.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{info, warn};

use crate::agent::{Agent, Payload};
use crate::config::{AgentSelection, EvaluationMode, RunConfiguration, RunLimits};
use crate::registry::{AgentId, AgentRegistry};
use crate::security::CredentialStore;
use crate::state::{
    AccumulatedState, AgentFailure, AgentOutcome, LogEntry, StateDelta, StateMerger,
};

/// Runs one configured agent set to completion.
///
/// Agents execute strictly sequentially in the enabled order, so log and
/// result ordering observed downstream always matches the configuration.
/// Each invocation is bounded by a per-agent deadline; an elapsed deadline
/// becomes a `Timeout` failure occupying the agent's slot.
pub struct Orchestrator {
    agent_timeout: Duration,
}

impl Orchestrator {
    pub fn new(agent_timeout: Duration) -> Self {
        Self { agent_timeout }
    }

    pub fn from_limits(limits: &RunLimits) -> Self {
        Self::new(Duration::from_secs(limits.agent_timeout_secs))
    }

    /// Resolve the ordered enabled agent list for a configuration.
    ///
    /// Explicit checklists are taken verbatim (first occurrence wins on
    /// duplicates). Domain selection activates the discipline's mandatory
    /// agents unconditionally, its optional agents only when their provider
    /// credential is present, web search whenever a search key exists, and
    /// the context analyzer whenever shared context was supplied.
    pub fn resolve_agents(
        config: &RunConfiguration,
        credentials: &CredentialStore,
    ) -> Vec<AgentId> {
        match &config.selection {
            AgentSelection::Explicit(ids) => {
                let mut resolved = Vec::new();
                for id in ids {
                    if id.is_evaluation_stage() {
                        warn!(agent_id = %id, "evaluation stage selected via checklist; use --mode instead");
                        continue;
                    }
                    if resolved.contains(id) {
                        warn!(agent_id = %id, "duplicate checklist entry ignored");
                        continue;
                    }
                    resolved.push(*id);
                }
                resolved
            }
            AgentSelection::ByDomain(domain) => {
                let mut resolved = Vec::new();
                let push_if_satisfied = |id: AgentId, resolved: &mut Vec<AgentId>| {
                    match id.required_provider() {
                        Some(provider) if !credentials.is_satisfied(provider) => {
                            info!(agent_id = %id, %provider, "agent skipped: credential absent");
                        }
                        _ => resolved.push(id),
                    }
                };

                push_if_satisfied(AgentId::WebSearch, &mut resolved);
                resolved.extend_from_slice(domain.mandatory_agents());
                for id in domain.optional_agents() {
                    push_if_satisfied(*id, &mut resolved);
                }
                if !config.shared_context.trim().is_empty() {
                    resolved.push(AgentId::ContextAnalyzer);
                }
                resolved
            }
        }
    }

    /// Execute the run and return the frozen accumulated state.
    ///
    /// Failures are contained at the single-agent boundary; the run always
    /// produces a complete state. Zero enabled agents is a valid terminal
    /// state: the merger is never constructed and no agent is invoked.
    pub async fn run(
        &self,
        registry: &AgentRegistry,
        config: &RunConfiguration,
        payload: &Payload,
    ) -> AccumulatedState {
        if registry.is_empty() {
            info!("no agents enabled; returning empty run state");
            return AccumulatedState::default();
        }

        let mut merger = StateMerger::new();
        let mut digest = String::new();

        info!(agents = registry.len(), "starting agent run");

        for (id, agent) in registry.entries() {
            merger.apply(StateDelta::Log(LogEntry::new(*id, "analysis started")));

            let outcome = self.invoke(*id, agent, payload, &config.shared_context).await;

            let completion_note = match &outcome {
                AgentOutcome::Assessed(assessment) => {
                    format!("analysis complete (score {:.1}/10)", assessment.score)
                }
                AgentOutcome::Failed(failure) => {
                    format!("analysis failed: {}", failure.message)
                }
            };
            merger.apply(StateDelta::Log(LogEntry::new(*id, completion_note)));

            let _ = write!(
                digest,
                "## {}\n**Score:** {:.1}/10\n\n{}\n\n",
                outcome.label(),
                outcome.score(),
                outcome.narrative()
            );
            merger.apply(StateDelta::Outcome(outcome));
        }

        match config.evaluation_mode {
            EvaluationMode::Standard => {}
            EvaluationMode::Judge => self.run_judge(registry, &digest, &mut merger).await,
            EvaluationMode::Debate => {
                self.run_debate(registry, payload, &config.shared_context, &mut merger)
                    .await
            }
        }

        merger.finish()
    }

    async fn invoke(
        &self,
        id: AgentId,
        agent: &Arc<dyn Agent>,
        payload: &Payload,
        context: &str,
    ) -> AgentOutcome {
        info!(agent_id = %id, "invoking agent");

        match timeout(self.agent_timeout, agent.analyze(payload, context)).await {
            Ok(Ok(assessment)) => AgentOutcome::Assessed(assessment),
            Ok(Err(err)) => {
                warn!(agent_id = %id, error = %err, "agent invocation failed");
                AgentOutcome::Failed(AgentFailure {
                    agent_id: id,
                    kind: err.kind(),
                    message: err.to_string(),
                })
            }
            Err(_) => {
                warn!(agent_id = %id, timeout_secs = self.agent_timeout.as_secs(), "agent timed out");
                AgentOutcome::Failed(AgentFailure {
                    agent_id: id,
                    kind: crate::error::FailureKind::Timeout,
                    message: format!(
                        "model call timed out after {} s",
                        self.agent_timeout.as_secs()
                    ),
                })
            }
        }
    }

    async fn run_judge(&self, registry: &AgentRegistry, digest: &str, merger: &mut StateMerger) {
        let Some(critic) = registry.critique() else {
            warn!("judge mode requested but no critique agent registered");
            return;
        };

        merger.apply(StateDelta::Log(LogEntry::new(
            AgentId::Judge,
            "critiquing aggregated report",
        )));

        match timeout(self.agent_timeout, critic.critique(digest)).await {
            Ok(Ok(scorecard)) => {
                merger.apply(StateDelta::Log(LogEntry::new(
                    AgentId::Judge,
                    format!("scorecard issued ({:.1}/10)", scorecard.overall_score),
                )));
                merger.apply(StateDelta::Scorecard(scorecard));
            }
            Ok(Err(err)) => {
                warn!(error = %err, "critique failed; run continues without scorecard");
                merger.apply(StateDelta::Log(LogEntry::new(
                    AgentId::Judge,
                    format!("critique failed: {err}"),
                )));
            }
            Err(_) => {
                warn!("critique timed out; run continues without scorecard");
                merger.apply(StateDelta::Log(LogEntry::new(
                    AgentId::Judge,
                    "critique timed out",
                )));
            }
        }
    }

    async fn run_debate(
        &self,
        registry: &AgentRegistry,
        payload: &Payload,
        context: &str,
        merger: &mut StateMerger,
    ) {
        let Some(debate) = registry.debate() else {
            warn!("debate mode requested but no debate agents registered");
            return;
        };

        merger.apply(StateDelta::Log(LogEntry::new(
            AgentId::Debate,
            "adversarial evaluation started",
        )));

        // One model call per turn, so the exchange needs a wider deadline
        // than a single agent invocation.
        let deadline = self.agent_timeout * 4;
        match timeout(deadline, debate.debate(payload, context)).await {
            Ok(Ok(turns)) => {
                merger.apply(StateDelta::Log(LogEntry::new(
                    AgentId::Debate,
                    format!("transcript complete ({} turns)", turns.len()),
                )));
                for turn in turns {
                    merger.apply(StateDelta::Turn(turn));
                }
            }
            Ok(Err(err)) => {
                warn!(error = %err, "debate failed; run continues without transcript");
                merger.apply(StateDelta::Log(LogEntry::new(
                    AgentId::Debate,
                    format!("debate failed: {err}"),
                )));
            }
            Err(_) => {
                warn!("debate timed out; run continues without transcript");
                merger.apply(StateDelta::Log(LogEntry::new(
                    AgentId::Debate,
                    "debate timed out",
                )));
            }
        }
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::from_limits(&RunLimits::default())
    }
}
