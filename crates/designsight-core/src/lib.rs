//! DesignSight core orchestration engine.
//!
//! Resolves which agents a run enables, invokes them sequentially against a
//! shared payload while containing per-agent failure, folds every partial
//! result into one accumulated state, and derives the terminal report
//! artifacts consumed by a presentation layer.

mod agent;
mod config;
mod error;
mod llm;
mod logging;
mod orchestrator;
mod registry;
mod report;
mod score;
mod security;
mod state;

pub use agent::{Agent, AgentAssessment, CritiqueAgent, DebateAgent, Payload};
pub use config::{
    AgentSelection, Config, ConfigLoader, Domain, EvaluationMode, LlmConfig, LoggingConfig,
    RunConfiguration, RunLimits,
};
pub use error::{AgentError, DesignSightError, FailureKind};
pub use llm::{
    ChatMessage, ChatRole, CompletionRequest, DynModelClient, ImageUrl, MessagePart, ModelClient,
    OpenRouterClient, StaticModelClient,
};
pub use logging::{RunLogInput, log_run_completion};
pub use orchestrator::Orchestrator;
pub use registry::{AgentId, AgentRegistry};
pub use report::{
    ADEQUATE_THRESHOLD, Report, ReportAssembler, ReportSection, RunStatus, STRONG_THRESHOLD,
};
pub use score::{SCORE_FALLBACK, extract_score};
pub use security::{CredentialStore, Provider, SecretValue, require_env};
pub use state::{
    AccumulatedState, AgentFailure, AgentOutcome, DebateRole, DebateTurn, LogEntry, Scorecard,
    StateDelta, StateMerger,
};
