//! Judge-mode critique over the aggregated report.

use async_trait::async_trait;
use designsight_core::{
    AgentError, ChatMessage, CompletionRequest, CritiqueAgent, DynModelClient, LlmConfig,
    Scorecard, extract_score,
};
use serde::Deserialize;

use crate::prompts;

/// Issues one post-pass critique call and parses the scorecard out of the
/// reply. A reply that is not valid JSON degrades to a score-only card
/// rather than failing the run.
pub struct JudgeCritic {
    client: DynModelClient,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl JudgeCritic {
    pub fn new(client: DynModelClient, llm: &LlmConfig) -> Self {
        Self {
            client,
            model: llm.model.clone(),
            max_tokens: llm.max_tokens,
            temperature: llm.temperature,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScorecardWire {
    overall_score: f32,
    #[serde(default)]
    required_fixes: Vec<String>,
}

fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn parse_scorecard(reply: &str) -> Scorecard {
    if let Some(json) = extract_json_object(reply) {
        if let Ok(wire) = serde_json::from_str::<ScorecardWire>(json) {
            return Scorecard {
                overall_score: wire.overall_score.clamp(0.0, 10.0),
                required_fixes: wire.required_fixes,
            };
        }
    }

    tracing::debug!("scorecard reply was not valid JSON; deriving score from text");
    Scorecard {
        overall_score: extract_score(reply),
        required_fixes: Vec::new(),
    }
}

#[async_trait]
impl CritiqueAgent for JudgeCritic {
    async fn critique(&self, report: &str) -> Result<Scorecard, AgentError> {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user_text(prompts::judge(report))],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let reply = self
            .client
            .complete(request)
            .await
            .map_err(|err| AgentError::UpstreamCallFailed(err.to_string()))?;

        Ok(parse_scorecard(&reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use designsight_core::StaticModelClient;
    use std::sync::Arc;

    #[tokio::test]
    async fn json_reply_becomes_a_full_scorecard() {
        let client = Arc::new(StaticModelClient::with_responses([
            r#"Here is my verdict: {"overall_score": 6.5, "required_fixes": ["cite primary sources", "quantify claims"]}"#,
        ]));
        let judge = JudgeCritic::new(client, &LlmConfig::default());

        let scorecard = judge.critique("## Agent\n**Score:** 5.0/10\n\ntext").await.unwrap();
        assert_eq!(scorecard.overall_score, 6.5);
        assert_eq!(scorecard.required_fixes.len(), 2);
    }

    #[tokio::test]
    async fn prose_reply_degrades_to_score_extraction() {
        let client = Arc::new(StaticModelClient::with_responses([
            "The report is thin on evidence. Overall score: 4/10.",
        ]));
        let judge = JudgeCritic::new(client, &LlmConfig::default());

        let scorecard = judge.critique("report body").await.unwrap();
        assert_eq!(scorecard.overall_score, 4.0);
        assert!(scorecard.required_fixes.is_empty());
    }

    #[test]
    fn out_of_range_json_score_is_clamped() {
        let scorecard = parse_scorecard(r#"{"overall_score": 14, "required_fixes": []}"#);
        assert_eq!(scorecard.overall_score, 10.0);
    }
}
