//! Concrete DesignSight agents.
//!
//! The design review panel, the research-discipline identities, and the
//! judge/debate evaluators all share one prompt-bound implementation; this
//! crate owns the prompt templates and the registry builder that resolves a
//! run configuration into an ordered agent set.

mod debate;
mod judge;
mod panel;
mod prompts;
mod registry;

pub use debate::DebatePairAgent;
pub use judge::JudgeCritic;
pub use panel::PromptAgent;
pub use registry::{RegistryOptions, build_registry};
