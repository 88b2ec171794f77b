use std::collections::HashMap;
use std::env;

use serde::{Deserialize, Serialize};

use crate::DesignSightError;

/// Wrapper around sensitive values to reduce accidental logging.
#[derive(Clone)]
pub struct SecretValue(String);

impl SecretValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "***redacted***")
    }
}

/// Require that a given environment variable is set and non-empty.
pub fn require_env(var: &str) -> Result<SecretValue, DesignSightError> {
    match env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(SecretValue(value)),
        _ => Err(DesignSightError::MissingSecret(var.to_string())),
    }
}

/// External services an agent may need a credential for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    OpenRouter,
    Tavily,
    SemanticScholar,
    Perplexity,
    Reddit,
    YouTube,
    GitHub,
}

impl Provider {
    pub const ALL: [Provider; 7] = [
        Provider::OpenRouter,
        Provider::Tavily,
        Provider::SemanticScholar,
        Provider::Perplexity,
        Provider::Reddit,
        Provider::YouTube,
        Provider::GitHub,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenRouter => "openrouter",
            Provider::Tavily => "tavily",
            Provider::SemanticScholar => "semantic_scholar",
            Provider::Perplexity => "perplexity",
            Provider::Reddit => "reddit",
            Provider::YouTube => "youtube",
            Provider::GitHub => "github",
        }
    }

    /// Environment variable the credential is resolved from.
    pub fn env_var(&self) -> &'static str {
        match self {
            Provider::OpenRouter => "OPENROUTER_API_KEY",
            Provider::Tavily => "TAVILY_API_KEY",
            Provider::SemanticScholar => "SEMANTIC_SCHOLAR_API_KEY",
            Provider::Perplexity => "PERPLEXITY_API_KEY",
            Provider::Reddit => "REDDIT_CLIENT_ID",
            Provider::YouTube => "YOUTUBE_API_KEY",
            Provider::GitHub => "GITHUB_TOKEN",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-run credential presence map.
///
/// Built once at run start; the orchestration layer only ever asks whether a
/// provider is satisfied. Raw key material is handed out solely to the client
/// constructors that need it.
#[derive(Debug, Default)]
pub struct CredentialStore {
    keys: HashMap<Provider, SecretValue>,
}

impl CredentialStore {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Collect whichever provider credentials are present in the environment.
    pub fn from_env() -> Self {
        let mut keys = HashMap::new();
        for provider in Provider::ALL {
            if let Ok(secret) = require_env(provider.env_var()) {
                keys.insert(provider, secret);
            }
        }
        tracing::debug!(providers = keys.len(), "resolved credential store");
        Self { keys }
    }

    pub fn with_key(mut self, provider: Provider, secret: SecretValue) -> Self {
        self.keys.insert(provider, secret);
        self
    }

    pub fn is_satisfied(&self, provider: Provider) -> bool {
        self.keys.contains_key(&provider)
    }

    pub fn get(&self, provider: Provider) -> Option<&SecretValue> {
        self.keys.get(&provider)
    }
}
