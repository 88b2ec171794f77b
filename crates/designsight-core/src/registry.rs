//! Closed agent identifier set and the per-run registry resolved from it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::agent::{Agent, CritiqueAgent, DebateAgent};
use crate::security::Provider;

/// Every agent identity known to the engine.
///
/// The set is closed on purpose: new capabilities are added by extending this
/// enum and implementing [`Agent`], not by registering arbitrary strings at
/// runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentId {
    // Design review panel
    Brand,
    Aesthetic,
    Conversion,
    Monetization,
    Privacy,
    Ethical,
    Trends,
    // Research disciplines
    WebSearch,
    Arxiv,
    SemanticScholar,
    PubMed,
    ClinicalTrials,
    MarketData,
    Perplexity,
    Reddit,
    YouTube,
    GitHub,
    ContextAnalyzer,
    // Evaluation-mode executors; selected by mode, never by checklist
    Judge,
    Debate,
}

impl AgentId {
    /// The seven panel agents, in their canonical invocation order.
    pub const DESIGN_PANEL: [AgentId; 7] = [
        AgentId::Brand,
        AgentId::Aesthetic,
        AgentId::Conversion,
        AgentId::Monetization,
        AgentId::Privacy,
        AgentId::Ethical,
        AgentId::Trends,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentId::Brand => "brand",
            AgentId::Aesthetic => "aesthetic",
            AgentId::Conversion => "conversion",
            AgentId::Monetization => "monetization",
            AgentId::Privacy => "privacy",
            AgentId::Ethical => "ethical",
            AgentId::Trends => "trends",
            AgentId::WebSearch => "web_search",
            AgentId::Arxiv => "arxiv",
            AgentId::SemanticScholar => "semantic_scholar",
            AgentId::PubMed => "pubmed",
            AgentId::ClinicalTrials => "clinical_trials",
            AgentId::MarketData => "market_data",
            AgentId::Perplexity => "perplexity",
            AgentId::Reddit => "reddit",
            AgentId::YouTube => "youtube",
            AgentId::GitHub => "github",
            AgentId::ContextAnalyzer => "context_analyzer",
            AgentId::Judge => "judge",
            AgentId::Debate => "debate",
        }
    }

    /// Inverse of [`AgentId::as_str`], used to parse explicit checklists.
    pub fn parse(value: &str) -> Option<AgentId> {
        let id = match value.trim().to_ascii_lowercase().as_str() {
            "brand" => AgentId::Brand,
            "aesthetic" => AgentId::Aesthetic,
            "conversion" => AgentId::Conversion,
            "monetization" => AgentId::Monetization,
            "privacy" => AgentId::Privacy,
            "ethical" => AgentId::Ethical,
            "trends" => AgentId::Trends,
            "web_search" => AgentId::WebSearch,
            "arxiv" => AgentId::Arxiv,
            "semantic_scholar" => AgentId::SemanticScholar,
            "pubmed" => AgentId::PubMed,
            "clinical_trials" => AgentId::ClinicalTrials,
            "market_data" => AgentId::MarketData,
            "perplexity" => AgentId::Perplexity,
            "reddit" => AgentId::Reddit,
            "youtube" => AgentId::YouTube,
            "github" => AgentId::GitHub,
            "context_analyzer" => AgentId::ContextAnalyzer,
            "judge" => AgentId::Judge,
            "debate" => AgentId::Debate,
            _ => return None,
        };
        Some(id)
    }

    /// Human-readable label used in reports and progress logs.
    pub fn label(&self) -> &'static str {
        match self {
            AgentId::Brand => "Brand Consistency Agent",
            AgentId::Aesthetic => "Aesthetic Quality Agent",
            AgentId::Conversion => "Conversion Optimization Agent",
            AgentId::Monetization => "Monetization Agent",
            AgentId::Privacy => "Privacy & Security Agent",
            AgentId::Ethical => "Ethical Design Agent",
            AgentId::Trends => "Trend Analysis Agent",
            AgentId::WebSearch => "Web Search Agent",
            AgentId::Arxiv => "Arxiv Agent",
            AgentId::SemanticScholar => "Semantic Scholar Agent",
            AgentId::PubMed => "PubMed Agent",
            AgentId::ClinicalTrials => "Clinical Trials Agent",
            AgentId::MarketData => "Market Data Agent",
            AgentId::Perplexity => "Perplexity Agent",
            AgentId::Reddit => "Reddit Agent",
            AgentId::YouTube => "YouTube Agent",
            AgentId::GitHub => "GitHub Agent",
            AgentId::ContextAnalyzer => "Context Analyzer Agent",
            AgentId::Judge => "Judge Agent",
            AgentId::Debate => "Debate Agents",
        }
    }

    /// True for the pseudo-identities that are activated by evaluation mode
    /// rather than by selection.
    pub fn is_evaluation_stage(&self) -> bool {
        matches!(self, AgentId::Judge | AgentId::Debate)
    }

    /// Credential the agent depends on, if any. Agents without one are
    /// served entirely by the run's primary model.
    pub fn required_provider(&self) -> Option<Provider> {
        match self {
            AgentId::WebSearch => Some(Provider::Tavily),
            AgentId::SemanticScholar => Some(Provider::SemanticScholar),
            AgentId::Perplexity => Some(Provider::Perplexity),
            AgentId::Reddit => Some(Provider::Reddit),
            AgentId::YouTube => Some(Provider::YouTube),
            AgentId::GitHub => Some(Provider::GitHub),
            _ => None,
        }
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered agent set for one run.
///
/// Built once from the resolved configuration; iteration order is invocation
/// order. The judge and debate executors ride along so the orchestrator can
/// branch on evaluation mode without knowing concrete agent types.
#[derive(Default)]
pub struct AgentRegistry {
    entries: Vec<(AgentId, Arc<dyn Agent>)>,
    critique: Option<Arc<dyn CritiqueAgent>>,
    debate: Option<Arc<dyn DebateAgent>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an agent, preserving insertion order. A second registration
    /// under the same id is dropped so each id is invoked at most once.
    pub fn register(&mut self, agent: Arc<dyn Agent>) {
        let id = agent.id();
        if self.entries.iter().any(|(existing, _)| *existing == id) {
            tracing::warn!(agent_id = %id, "duplicate agent registration ignored");
            return;
        }
        self.entries.push((id, agent));
    }

    pub fn set_critique(&mut self, critic: Arc<dyn CritiqueAgent>) {
        self.critique = Some(critic);
    }

    pub fn set_debate(&mut self, debate: Arc<dyn DebateAgent>) {
        self.debate = Some(debate);
    }

    pub fn entries(&self) -> &[(AgentId, Arc<dyn Agent>)] {
        &self.entries
    }

    pub fn ids(&self) -> Vec<AgentId> {
        self.entries.iter().map(|(id, _)| *id).collect()
    }

    pub fn get(&self, id: AgentId) -> Option<&Arc<dyn Agent>> {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == id)
            .map(|(_, agent)| agent)
    }

    pub fn critique(&self) -> Option<&Arc<dyn CritiqueAgent>> {
        self.critique.as_ref()
    }

    pub fn debate(&self) -> Option<&Arc<dyn DebateAgent>> {
        self.debate.as_ref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
