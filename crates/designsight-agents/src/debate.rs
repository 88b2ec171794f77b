//! Adversarial pro/con evaluation.

use async_trait::async_trait;
use designsight_core::{
    AgentError, ChatMessage, CompletionRequest, DebateAgent, DebateRole, DebateTurn,
    DynModelClient, LlmConfig, Payload,
};

use crate::prompts;

/// Runs a fixed number of alternating pro/con rounds, one model call per
/// turn. Each turn sees the transcript produced so far.
pub struct DebatePairAgent {
    client: DynModelClient,
    model: String,
    max_tokens: u32,
    temperature: f32,
    rounds: u8,
}

impl DebatePairAgent {
    pub fn new(client: DynModelClient, llm: &LlmConfig, rounds: u8) -> Self {
        Self {
            client,
            model: llm.model.clone(),
            max_tokens: llm.max_tokens,
            temperature: llm.temperature,
            rounds: rounds.max(1),
        }
    }
}

#[async_trait]
impl DebateAgent for DebatePairAgent {
    async fn debate(
        &self,
        payload: &Payload,
        context: &str,
    ) -> Result<Vec<DebateTurn>, AgentError> {
        let subject = match payload {
            Payload::Research { question } => question.clone(),
            Payload::Design { .. } => {
                if context.trim().is_empty() {
                    "the submitted design".to_string()
                } else {
                    context.to_string()
                }
            }
        };

        let mut transcript = Vec::with_capacity(self.rounds as usize * 2);

        for round in 0..self.rounds {
            for role in [DebateRole::Pro, DebateRole::Con] {
                tracing::debug!(%role, round, "debate turn");

                let request = CompletionRequest {
                    model: self.model.clone(),
                    messages: vec![ChatMessage::user_text(prompts::debate(
                        role,
                        &subject,
                        &transcript,
                    ))],
                    max_tokens: self.max_tokens,
                    temperature: self.temperature,
                };

                let content = self
                    .client
                    .complete(request)
                    .await
                    .map_err(|err| AgentError::UpstreamCallFailed(err.to_string()))?;

                transcript.push(DebateTurn { role, content });
            }
        }

        Ok(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use designsight_core::StaticModelClient;
    use std::sync::Arc;

    #[tokio::test]
    async fn turns_alternate_pro_then_con_per_round() {
        let client = Arc::new(StaticModelClient::with_responses([
            "Strong adoption case.",
            "Costs are understated.",
            "Costs amortize quickly.",
            "Only under ideal load.",
        ]));
        let pair = DebatePairAgent::new(client, &LlmConfig::default(), 2);

        let transcript = pair
            .debate(&Payload::research("should we adopt the tool?"), "")
            .await
            .unwrap();

        assert_eq!(transcript.len(), 4);
        assert_eq!(transcript[0].role, DebateRole::Pro);
        assert_eq!(transcript[1].role, DebateRole::Con);
        assert_eq!(transcript[2].role, DebateRole::Pro);
        assert_eq!(transcript[3].role, DebateRole::Con);
        assert_eq!(transcript[2].content, "Costs amortize quickly.");
    }

    #[tokio::test]
    async fn zero_rounds_still_produces_one_exchange() {
        let client = Arc::new(StaticModelClient::default());
        let pair = DebatePairAgent::new(client, &LlmConfig::default(), 0);

        let transcript = pair
            .debate(&Payload::design("aW1n"), "pricing page")
            .await
            .unwrap();
        assert_eq!(transcript.len(), 2);
    }
}
