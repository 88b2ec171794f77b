use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Run-level error type for DesignSight.
///
/// Only top-level configuration problems surface through this type; anything
/// that goes wrong inside a single agent is contained as an [`AgentError`]
/// and never aborts the run.
#[derive(Debug, Error)]
pub enum DesignSightError {
    #[error("configuration error: {0}")]
    InvalidConfiguration(String),
    #[error("missing environment variable: {0}")]
    MissingSecret(String),
    #[error("I/O error while reading {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DesignSightError {
    pub fn config_io(path: PathBuf, source: std::io::Error) -> Self {
        Self::ConfigIo { path, source }
    }
}

/// Classification of a failed agent invocation, recorded alongside the
/// message in the result stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    ConfigurationMissing,
    UpstreamCallFailed,
    Timeout,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::ConfigurationMissing => "configuration_missing",
            FailureKind::UpstreamCallFailed => "upstream_call_failed",
            FailureKind::Timeout => "timeout",
        }
    }
}

/// Error raised by one agent invocation.
///
/// The orchestrator converts this into an `AgentFailure` record occupying the
/// agent's slot in the result sequence; it never propagates further.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("no credential available for provider {0}")]
    ConfigurationMissing(String),
    #[error("model call failed: {0}")]
    UpstreamCallFailed(String),
    #[error("model call timed out after {0} s")]
    Timeout(u64),
}

impl AgentError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AgentError::ConfigurationMissing(_) => FailureKind::ConfigurationMissing,
            AgentError::UpstreamCallFailed(_) => FailureKind::UpstreamCallFailed,
            AgentError::Timeout(_) => FailureKind::Timeout,
        }
    }
}
