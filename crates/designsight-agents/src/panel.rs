//! Prompt-bound agent: one model call, score extracted from the reply.

use async_trait::async_trait;
use designsight_core::{
    Agent, AgentAssessment, AgentError, AgentId, ChatMessage, CompletionRequest, DynModelClient,
    LlmConfig, Payload, Provider, extract_score,
};

use crate::prompts;

/// Generic agent implementation shared by the design panel and the research
/// identities. Behavior differences live entirely in the prompt template
/// selected by the id.
pub struct PromptAgent {
    id: AgentId,
    client: DynModelClient,
    model: String,
    max_tokens: u32,
    temperature: f32,
    missing_provider: Option<Provider>,
}

impl PromptAgent {
    pub fn new(id: AgentId, client: DynModelClient, llm: &LlmConfig) -> Self {
        Self {
            id,
            client,
            model: llm.model.clone(),
            max_tokens: llm.max_tokens,
            temperature: llm.temperature,
            missing_provider: None,
        }
    }

    /// Mark the agent's required credential as absent. The agent then fails
    /// fast with `ConfigurationMissing` instead of issuing a model call.
    pub fn with_missing_provider(mut self, provider: Option<Provider>) -> Self {
        self.missing_provider = provider;
        self
    }
}

#[async_trait]
impl Agent for PromptAgent {
    fn id(&self) -> AgentId {
        self.id
    }

    fn label(&self) -> &str {
        self.id.label()
    }

    async fn analyze(
        &self,
        payload: &Payload,
        context: &str,
    ) -> Result<AgentAssessment, AgentError> {
        if let Some(provider) = self.missing_provider {
            return Err(AgentError::ConfigurationMissing(provider.to_string()));
        }

        let prompt = prompts::render(self.id, payload, context);
        let message = match payload {
            Payload::Design { image_base64 } => ChatMessage::user_with_image(image_base64, prompt),
            Payload::Research { .. } => ChatMessage::user_text(prompt),
        };

        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![message],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        tracing::debug!(agent_id = %self.id, model = %self.model, "running analysis");

        let narrative = self
            .client
            .complete(request)
            .await
            .map_err(|err| AgentError::UpstreamCallFailed(err.to_string()))?;

        let score = extract_score(&narrative);

        Ok(AgentAssessment {
            agent_id: self.id,
            agent_label: self.id.label().to_string(),
            narrative,
            score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use designsight_core::StaticModelClient;
    use std::sync::Arc;

    fn llm() -> LlmConfig {
        LlmConfig::default()
    }

    #[tokio::test]
    async fn assessment_carries_the_extracted_score() {
        let client = Arc::new(StaticModelClient::with_responses([
            "Typography drifts from the brand font. Score: 6/10",
        ]));
        let agent = PromptAgent::new(AgentId::Brand, client, &llm());

        let assessment = agent
            .analyze(&Payload::design("aW1n"), "fintech landing page")
            .await
            .expect("analysis succeeds");

        assert_eq!(assessment.agent_id, AgentId::Brand);
        assert_eq!(assessment.agent_label, "Brand Consistency Agent");
        assert_eq!(assessment.score, 6.0);
        assert!(assessment.narrative.contains("Typography"));
    }

    #[tokio::test]
    async fn narrative_without_score_uses_the_fallback() {
        let client = Arc::new(StaticModelClient::with_responses([
            "Composition is well balanced throughout.",
        ]));
        let agent = PromptAgent::new(AgentId::Aesthetic, client, &llm());

        let assessment = agent
            .analyze(&Payload::design("aW1n"), "")
            .await
            .expect("analysis succeeds");
        assert_eq!(assessment.score, designsight_core::SCORE_FALLBACK);
    }

    #[tokio::test]
    async fn missing_credential_fails_before_any_model_call() {
        let client = Arc::new(StaticModelClient::default());
        let agent = PromptAgent::new(AgentId::Reddit, client, &llm())
            .with_missing_provider(Some(Provider::Reddit));

        let err = agent
            .analyze(&Payload::research("is the tool liked?"), "")
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::ConfigurationMissing(_)));
    }
}
