//! Resolves a run configuration into a populated agent registry.

use std::sync::Arc;

use designsight_core::{
    AgentRegistry, CredentialStore, DynModelClient, EvaluationMode, LlmConfig, Orchestrator,
    RunConfiguration, RunLimits,
};

use crate::debate::DebatePairAgent;
use crate::judge::JudgeCritic;
use crate::panel::PromptAgent;

/// Everything needed to materialize the agent set for one run.
pub struct RegistryOptions<'a> {
    pub run: &'a RunConfiguration,
    pub llm: &'a LlmConfig,
    pub limits: &'a RunLimits,
    pub credentials: &'a CredentialStore,
    pub client: DynModelClient,
}

/// Build the ordered registry for a run.
///
/// Domain selection already filtered out credential-gated agents whose key
/// is absent; an explicitly checklisted agent with a missing credential is
/// still registered and will occupy its report slot with a
/// `ConfigurationMissing` failure.
pub fn build_registry(options: RegistryOptions<'_>) -> AgentRegistry {
    let enabled = Orchestrator::resolve_agents(options.run, options.credentials);
    let mut registry = AgentRegistry::new();

    for id in enabled {
        let missing = id
            .required_provider()
            .filter(|provider| !options.credentials.is_satisfied(*provider));
        let agent = PromptAgent::new(id, options.client.clone(), options.llm)
            .with_missing_provider(missing);
        registry.register(Arc::new(agent));
    }

    match options.run.evaluation_mode {
        EvaluationMode::Standard => {}
        EvaluationMode::Judge => {
            registry.set_critique(Arc::new(JudgeCritic::new(
                options.client.clone(),
                options.llm,
            )));
        }
        EvaluationMode::Debate => {
            registry.set_debate(Arc::new(DebatePairAgent::new(
                options.client.clone(),
                options.llm,
                options.limits.debate_rounds,
            )));
        }
    }

    tracing::info!(
        agents = registry.len(),
        mode = ?options.run.evaluation_mode,
        "registry resolved"
    );

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use designsight_core::{AgentId, Domain, Provider, SecretValue, StaticModelClient};

    fn options<'a>(
        run: &'a RunConfiguration,
        llm: &'a LlmConfig,
        limits: &'a RunLimits,
        credentials: &'a CredentialStore,
    ) -> RegistryOptions<'a> {
        RegistryOptions {
            run,
            llm,
            limits,
            credentials,
            client: Arc::new(StaticModelClient::default()),
        }
    }

    #[test]
    fn explicit_checklist_registers_in_order() {
        let run = RunConfiguration::explicit([AgentId::Brand, AgentId::Aesthetic]);
        let llm = LlmConfig::default();
        let limits = RunLimits::default();
        let credentials = CredentialStore::empty();

        let registry = build_registry(options(&run, &llm, &limits, &credentials));
        assert_eq!(registry.ids(), vec![AgentId::Brand, AgentId::Aesthetic]);
        assert!(registry.critique().is_none());
        assert!(registry.debate().is_none());
    }

    #[test]
    fn domain_selection_respects_credentials() {
        let run = RunConfiguration::by_domain(Domain::Academic);
        let llm = LlmConfig::default();
        let limits = RunLimits::default();
        let credentials =
            CredentialStore::empty().with_key(Provider::SemanticScholar, SecretValue::new("key"));

        let registry = build_registry(options(&run, &llm, &limits, &credentials));
        assert_eq!(
            registry.ids(),
            vec![AgentId::Arxiv, AgentId::SemanticScholar]
        );
    }

    #[test]
    fn judge_mode_attaches_the_critic() {
        let run = RunConfiguration::explicit([AgentId::Conversion])
            .with_mode(EvaluationMode::Judge);
        let llm = LlmConfig::default();
        let limits = RunLimits::default();
        let credentials = CredentialStore::empty();

        let registry = build_registry(options(&run, &llm, &limits, &credentials));
        assert!(registry.critique().is_some());
        assert!(registry.debate().is_none());
    }
}
