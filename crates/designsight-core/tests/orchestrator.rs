//! End-to-end orchestration behavior against deterministic in-process agents.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use designsight_core::{
    Agent, AgentAssessment, AgentError, AgentId, AgentRegistry, CritiqueAgent, DebateAgent,
    DebateRole, DebateTurn, EvaluationMode, FailureKind, Orchestrator, Payload, ReportAssembler,
    RunConfiguration, RunStatus, Scorecard,
};

/// Agent that answers immediately with a fixed score.
struct FixedAgent {
    id: AgentId,
    score: f32,
    invocations: Arc<AtomicUsize>,
}

impl FixedAgent {
    fn new(id: AgentId, score: f32) -> (Self, Arc<AtomicUsize>) {
        let invocations = Arc::new(AtomicUsize::new(0));
        (
            Self {
                id,
                score,
                invocations: invocations.clone(),
            },
            invocations,
        )
    }
}

#[async_trait]
impl Agent for FixedAgent {
    fn id(&self) -> AgentId {
        self.id
    }

    fn label(&self) -> &str {
        self.id.label()
    }

    async fn analyze(
        &self,
        _payload: &Payload,
        _context: &str,
    ) -> Result<AgentAssessment, AgentError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        Ok(AgentAssessment {
            agent_id: self.id,
            agent_label: self.id.label().to_string(),
            narrative: format!("Detailed findings. Score: {}/10", self.score),
            score: self.score,
        })
    }
}

/// Agent that always fails with the given error.
struct FailingAgent {
    id: AgentId,
    error: fn() -> AgentError,
}

#[async_trait]
impl Agent for FailingAgent {
    fn id(&self) -> AgentId {
        self.id
    }

    fn label(&self) -> &str {
        self.id.label()
    }

    async fn analyze(
        &self,
        _payload: &Payload,
        _context: &str,
    ) -> Result<AgentAssessment, AgentError> {
        Err((self.error)())
    }
}

/// Agent that never answers within any reasonable deadline.
struct StallingAgent {
    id: AgentId,
}

#[async_trait]
impl Agent for StallingAgent {
    fn id(&self) -> AgentId {
        self.id
    }

    fn label(&self) -> &str {
        self.id.label()
    }

    async fn analyze(
        &self,
        _payload: &Payload,
        _context: &str,
    ) -> Result<AgentAssessment, AgentError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        unreachable!("the orchestrator deadline fires first");
    }
}

struct FixedCritic;

#[async_trait]
impl CritiqueAgent for FixedCritic {
    async fn critique(&self, report: &str) -> Result<Scorecard, AgentError> {
        assert!(report.contains("## "), "critique runs over the digest");
        Ok(Scorecard {
            overall_score: 6.0,
            required_fixes: vec!["clarify the value proposition".to_string()],
        })
    }
}

struct FixedDebate;

#[async_trait]
impl DebateAgent for FixedDebate {
    async fn debate(
        &self,
        _payload: &Payload,
        _context: &str,
    ) -> Result<Vec<DebateTurn>, AgentError> {
        Ok(vec![
            DebateTurn {
                role: DebateRole::Pro,
                content: "The design earns attention quickly.".to_string(),
            },
            DebateTurn {
                role: DebateRole::Con,
                content: "It sacrifices clarity to do so.".to_string(),
            },
        ])
    }
}

fn payload() -> Payload {
    Payload::design("aW1hZ2UtYnl0ZXM=")
}

#[tokio::test]
async fn every_enabled_agent_runs_exactly_once_in_order() {
    let (brand, brand_count) = FixedAgent::new(AgentId::Brand, 8.0);
    let (aesthetic, aesthetic_count) = FixedAgent::new(AgentId::Aesthetic, 6.0);

    let mut registry = AgentRegistry::new();
    registry.register(Arc::new(brand));
    registry.register(Arc::new(aesthetic));

    let config = RunConfiguration::explicit([AgentId::Brand, AgentId::Aesthetic])
        .with_context("e-commerce landing page");
    let orchestrator = Orchestrator::new(Duration::from_secs(5));
    let state = orchestrator.run(&registry, &config, &payload()).await;

    assert_eq!(brand_count.load(Ordering::SeqCst), 1);
    assert_eq!(aesthetic_count.load(Ordering::SeqCst), 1);
    assert_eq!(state.results.len(), 2);
    assert_eq!(state.results[0].agent_id(), AgentId::Brand);
    assert_eq!(state.results[1].agent_id(), AgentId::Aesthetic);

    // Log emission order matches invocation order.
    let log_ids: Vec<AgentId> = state.logs.iter().map(|entry| entry.agent_id).collect();
    assert_eq!(
        log_ids,
        vec![
            AgentId::Brand,
            AgentId::Brand,
            AgentId::Aesthetic,
            AgentId::Aesthetic
        ]
    );

    let report = ReportAssembler::assemble(&state, &config.shared_context);
    assert_eq!(report.mean_score, 7.0);
    assert_eq!(report.status, RunStatus::Strong);
}

#[tokio::test]
async fn one_failing_agent_does_not_disturb_the_others() {
    let (brand, _) = FixedAgent::new(AgentId::Brand, 8.0);
    let (trends, _) = FixedAgent::new(AgentId::Trends, 7.0);

    let mut registry = AgentRegistry::new();
    registry.register(Arc::new(brand));
    registry.register(Arc::new(FailingAgent {
        id: AgentId::Privacy,
        error: || AgentError::ConfigurationMissing("tavily".to_string()),
    }));
    registry.register(Arc::new(trends));

    let config =
        RunConfiguration::explicit([AgentId::Brand, AgentId::Privacy, AgentId::Trends]);
    let orchestrator = Orchestrator::new(Duration::from_secs(5));
    let state = orchestrator.run(&registry, &config, &payload()).await;

    assert_eq!(state.results.len(), 3);
    let privacy = state.result_for(AgentId::Privacy).expect("slot kept");
    assert_eq!(privacy.score(), 0.0);
    assert_eq!(privacy.failure_kind(), Some(FailureKind::ConfigurationMissing));
    assert_eq!(state.results[2].agent_id(), AgentId::Trends);
    assert_eq!(state.results[2].score(), 7.0);

    // The document stays complete: every agent keeps its section.
    let markdown = ReportAssembler::assemble(&state, "").to_markdown();
    assert!(markdown.contains("## Brand Consistency Agent"));
    assert!(markdown.contains("## Privacy & Security Agent"));
    assert!(markdown.contains("## Trend Analysis Agent"));
}

#[tokio::test]
async fn stalled_agent_becomes_a_timeout_failure() {
    let (brand, _) = FixedAgent::new(AgentId::Brand, 9.0);

    let mut registry = AgentRegistry::new();
    registry.register(Arc::new(StallingAgent {
        id: AgentId::Conversion,
    }));
    registry.register(Arc::new(brand));

    let config = RunConfiguration::explicit([AgentId::Conversion, AgentId::Brand]);
    let orchestrator = Orchestrator::new(Duration::from_millis(50));
    let state = orchestrator.run(&registry, &config, &payload()).await;

    assert_eq!(state.results.len(), 2);
    assert_eq!(
        state.results[0].failure_kind(),
        Some(FailureKind::Timeout)
    );
    assert_eq!(state.results[1].score(), 9.0);
}

#[tokio::test]
async fn judge_mode_attaches_a_scorecard() {
    let (conversion, _) = FixedAgent::new(AgentId::Conversion, 5.0);

    let mut registry = AgentRegistry::new();
    registry.register(Arc::new(conversion));
    registry.set_critique(Arc::new(FixedCritic));

    let config = RunConfiguration::explicit([AgentId::Conversion])
        .with_mode(EvaluationMode::Judge);
    let orchestrator = Orchestrator::new(Duration::from_secs(5));
    let state = orchestrator.run(&registry, &config, &payload()).await;

    let scorecard = state.scorecard.as_ref().expect("scorecard present");
    assert_eq!(scorecard.overall_score, 6.0);
    assert!(!scorecard.required_fixes.is_empty());
    assert!(state.transcript.is_empty());
}

#[tokio::test]
async fn debate_mode_appends_turns_without_judge_artifacts() {
    let (aesthetic, _) = FixedAgent::new(AgentId::Aesthetic, 7.0);

    let mut registry = AgentRegistry::new();
    registry.register(Arc::new(aesthetic));
    registry.set_debate(Arc::new(FixedDebate));

    let config = RunConfiguration::explicit([AgentId::Aesthetic])
        .with_mode(EvaluationMode::Debate);
    let orchestrator = Orchestrator::new(Duration::from_secs(5));
    let state = orchestrator.run(&registry, &config, &payload()).await;

    assert!(state.scorecard.is_none());
    assert_eq!(state.transcript.len(), 2);
    assert_eq!(state.transcript[0].role, DebateRole::Pro);
    assert_eq!(state.transcript[1].role, DebateRole::Con);
}

#[tokio::test]
async fn zero_enabled_agents_is_a_valid_terminal_state() {
    let registry = AgentRegistry::new();
    let config = RunConfiguration::explicit(Vec::new());
    let orchestrator = Orchestrator::new(Duration::from_secs(5));
    let state = orchestrator.run(&registry, &config, &payload()).await;

    assert!(state.results.is_empty());
    let report = ReportAssembler::assemble(&state, "");
    assert_eq!(report.agent_count, 0);
    assert_eq!(report.mean_score, 0.0);
}
