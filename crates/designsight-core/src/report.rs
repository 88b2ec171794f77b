//! Terminal artifacts derived from a completed run.

use std::cmp::Ordering;
use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::registry::AgentId;
use crate::state::{AccumulatedState, DebateTurn, Scorecard};

/// Mean score at or above which a run is classified as strong.
pub const STRONG_THRESHOLD: f32 = 7.0;
/// Mean score at or above which a run is classified as adequate.
pub const ADEQUATE_THRESHOLD: f32 = 5.0;

/// Overall classification of a run against the fixed thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Strong,
    Adequate,
    Weak,
}

impl RunStatus {
    pub fn from_mean(mean: f32) -> Self {
        if mean >= STRONG_THRESHOLD {
            RunStatus::Strong
        } else if mean >= ADEQUATE_THRESHOLD {
            RunStatus::Adequate
        } else {
            RunStatus::Weak
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Strong => "strong",
            RunStatus::Adequate => "adequate",
            RunStatus::Weak => "weak",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One agent's section of the final document, in invocation order.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSection {
    pub agent_id: AgentId,
    pub label: String,
    pub score: f32,
    pub narrative: String,
    pub failed: bool,
}

/// The run's user-facing artifacts.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub context: String,
    pub agent_count: usize,
    pub mean_score: f32,
    pub status: RunStatus,
    pub generated_at: DateTime<Utc>,
    pub sections: Vec<ReportSection>,
    pub scorecard: Option<Scorecard>,
    pub transcript: Vec<DebateTurn>,
}

pub struct ReportAssembler;

impl ReportAssembler {
    /// Derive the terminal artifacts from the frozen run state.
    ///
    /// Failures already carry score 0, so the mean and the document remain
    /// well-defined under partial failure. An empty run yields a mean of 0.
    pub fn assemble(state: &AccumulatedState, context: &str) -> Report {
        let sections: Vec<ReportSection> = state
            .results
            .iter()
            .map(|outcome| ReportSection {
                agent_id: outcome.agent_id(),
                label: outcome.label().to_string(),
                score: outcome.score(),
                narrative: outcome.narrative().to_string(),
                failed: outcome.failure_kind().is_some(),
            })
            .collect();

        let mean_score = state.mean_score();

        Report {
            context: context.to_string(),
            agent_count: sections.len(),
            mean_score,
            status: RunStatus::from_mean(mean_score),
            generated_at: Utc::now(),
            sections,
            scorecard: state.scorecard.clone(),
            transcript: state.transcript.clone(),
        }
    }
}

impl Report {
    /// Sections ranked by score, highest first; invocation order breaks ties.
    pub fn ranked(&self) -> Vec<&ReportSection> {
        let mut ranked: Vec<&ReportSection> = self.sections.iter().collect();
        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
        });
        ranked
    }

    /// Render the exportable markdown document: a fixed header block
    /// followed by one section per agent in invocation order, then the
    /// critique and debate sections when present.
    pub fn to_markdown(&self) -> String {
        let mut doc = String::new();

        let _ = writeln!(doc, "# Design Intelligence Report");
        let _ = writeln!(doc, "**Multi-Agent Analysis**\n");
        let context = if self.context.trim().is_empty() {
            "N/A"
        } else {
            self.context.as_str()
        };
        let _ = writeln!(doc, "**Context:** {context}");
        let _ = writeln!(doc, "**Agents:** {}", self.agent_count);
        let _ = writeln!(doc, "**Avg Score:** {:.1}/10", self.mean_score);
        let _ = writeln!(doc, "**Status:** {}", self.status);
        let _ = writeln!(
            doc,
            "**Timestamp:** {}",
            self.generated_at.format("%Y-%m-%d %H:%M:%S")
        );
        let _ = writeln!(doc, "\n---\n");

        for section in &self.sections {
            let _ = writeln!(doc, "## {}", section.label);
            let _ = writeln!(doc, "**Score:** {:.1}/10\n", section.score);
            let _ = writeln!(doc, "{}\n", section.narrative);
            let _ = writeln!(doc, "---\n");
        }

        if let Some(scorecard) = &self.scorecard {
            let _ = writeln!(doc, "## Critique");
            let _ = writeln!(doc, "**Overall Score:** {:.1}/10\n", scorecard.overall_score);
            if !scorecard.required_fixes.is_empty() {
                let _ = writeln!(doc, "**Required fixes:**");
                for fix in &scorecard.required_fixes {
                    let _ = writeln!(doc, "- {fix}");
                }
                doc.push('\n');
            }
            let _ = writeln!(doc, "---\n");
        }

        if !self.transcript.is_empty() {
            let _ = writeln!(doc, "## Debate");
            for turn in &self.transcript {
                let _ = writeln!(doc, "**{}:** {}\n", turn.role, turn.content);
            }
            let _ = writeln!(doc, "---\n");
        }

        doc
    }
}
