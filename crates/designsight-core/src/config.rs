use std::{
    env, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::registry::AgentId;
use crate::security::SecretValue;
use crate::{DesignSightError, require_env};

const DEFAULT_CONFIG_PATH: &str = "config.toml";
const CONFIG_PATH_ENV: &str = "DESIGNSIGHT_CONFIG";

/// Top-level configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub llm: LlmConfig,
    #[serde(default)]
    pub run: RunLimits,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Resolve the configured LLM secret value (from environment only).
    pub fn llm_api_key(&self) -> Result<SecretValue, DesignSightError> {
        require_env(&self.llm.api_key_env)
    }

    /// Defaults used when a run is forced offline and no file is present.
    pub fn fallback() -> Self {
        Self {
            llm: LlmConfig::default(),
            run: RunLimits::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Helper to load configuration with best-practice guard rails.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a provided path or discoverable defaults.
    ///
    /// Resolution order:
    /// 1. Explicit `path` argument.
    /// 2. `DESIGNSIGHT_CONFIG` environment variable.
    /// 3. `config.toml` in the current working directory.
    pub fn load(path: Option<PathBuf>) -> Result<Config, DesignSightError> {
        let candidate = resolve_path(path);
        let raw = fs::read_to_string(&candidate)
            .map_err(|err| DesignSightError::config_io(candidate.clone(), err))?;
        let config: Config = toml::from_str(&raw)
            .map_err(|err| DesignSightError::InvalidConfiguration(err.to_string()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn validate(config: &Config) -> Result<(), DesignSightError> {
        if config.llm.api_key_env.trim().is_empty() {
            return Err(DesignSightError::InvalidConfiguration(
                "llm.api_key_env must reference an environment variable".into(),
            ));
        }
        if config.run.agent_timeout_secs == 0 {
            return Err(DesignSightError::InvalidConfiguration(
                "run.agent_timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

fn resolve_path(path: Option<PathBuf>) -> PathBuf {
    if let Some(path) = path {
        return path;
    }

    if let Ok(from_env) = env::var(CONFIG_PATH_ENV) {
        if !from_env.trim().is_empty() {
            return PathBuf::from(from_env);
        }
    }

    Path::new(DEFAULT_CONFIG_PATH).to_path_buf()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub provider: String,
    pub model: String,
    #[serde(default = "LlmConfig::default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "LlmConfig::default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "LlmConfig::default_temperature")]
    pub temperature: f32,
}

impl LlmConfig {
    fn default_api_key_env() -> String {
        "OPENROUTER_API_KEY".to_string()
    }

    const fn default_max_tokens() -> u32 {
        2500
    }

    const fn default_temperature() -> f32 {
        0.7
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openrouter".to_string(),
            model: "anthropic/claude-3.5-sonnet".to_string(),
            api_key_env: Self::default_api_key_env(),
            max_tokens: Self::default_max_tokens(),
            temperature: Self::default_temperature(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunLimits {
    #[serde(default = "RunLimits::default_agent_timeout_secs")]
    pub agent_timeout_secs: u64,
    #[serde(default = "RunLimits::default_debate_rounds")]
    pub debate_rounds: u8,
}

impl RunLimits {
    const fn default_agent_timeout_secs() -> u64 {
        60
    }

    const fn default_debate_rounds() -> u8 {
        2
    }
}

impl Default for RunLimits {
    fn default() -> Self {
        Self {
            agent_timeout_secs: Self::default_agent_timeout_secs(),
            debate_rounds: Self::default_debate_rounds(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Research disciplines a run can be conditioned on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Academic,
    Finance,
    Medical,
    ProductComparison,
    General,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Academic => "academic",
            Domain::Finance => "finance",
            Domain::Medical => "medical",
            Domain::ProductComparison => "product_comparison",
            Domain::General => "general",
        }
    }

    /// Agents that are unconditionally active for the discipline.
    pub fn mandatory_agents(&self) -> &'static [AgentId] {
        match self {
            Domain::Academic => &[AgentId::Arxiv],
            Domain::Medical => &[AgentId::PubMed, AgentId::ClinicalTrials],
            Domain::Finance => &[AgentId::MarketData],
            Domain::ProductComparison | Domain::General => &[],
        }
    }

    /// Agents activated only when their provider credential is present.
    pub fn optional_agents(&self) -> &'static [AgentId] {
        match self {
            Domain::Academic => &[AgentId::SemanticScholar],
            Domain::Finance => &[AgentId::Perplexity],
            Domain::ProductComparison => &[AgentId::Reddit, AgentId::YouTube, AgentId::GitHub],
            Domain::Medical | Domain::General => &[],
        }
    }
}

impl FromStr for Domain {
    type Err = DesignSightError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "academic" => Ok(Domain::Academic),
            "finance" => Ok(Domain::Finance),
            "medical" => Ok(Domain::Medical),
            "product_comparison" | "product" => Ok(Domain::ProductComparison),
            "general" => Ok(Domain::General),
            other => Err(DesignSightError::InvalidConfiguration(format!(
                "unknown domain: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the run's evaluation is staged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    #[default]
    Standard,
    Judge,
    Debate,
}

impl FromStr for EvaluationMode {
    type Err = DesignSightError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(EvaluationMode::Standard),
            "judge" => Ok(EvaluationMode::Judge),
            "debate" => Ok(EvaluationMode::Debate),
            other => Err(DesignSightError::InvalidConfiguration(format!(
                "unknown evaluation mode: {other}"
            ))),
        }
    }
}

/// Which agents a run enables.
#[derive(Debug, Clone)]
pub enum AgentSelection {
    /// Verbatim ordered checklist.
    Explicit(Vec<AgentId>),
    /// Derived from discipline plus available credentials.
    ByDomain(Domain),
}

/// Per-run input, constructed once from user input and read-only thereafter.
#[derive(Debug, Clone)]
pub struct RunConfiguration {
    pub selection: AgentSelection,
    pub evaluation_mode: EvaluationMode,
    pub shared_context: String,
}

impl RunConfiguration {
    pub fn new(selection: AgentSelection) -> Self {
        Self {
            selection,
            evaluation_mode: EvaluationMode::Standard,
            shared_context: String::new(),
        }
    }

    pub fn explicit(ids: impl Into<Vec<AgentId>>) -> Self {
        Self::new(AgentSelection::Explicit(ids.into()))
    }

    pub fn by_domain(domain: Domain) -> Self {
        Self::new(AgentSelection::ByDomain(domain))
    }

    pub fn with_mode(mut self, mode: EvaluationMode) -> Self {
        self.evaluation_mode = mode;
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.shared_context = context.into();
        self
    }
}
