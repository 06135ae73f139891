//! Shared types, error model, and configuration for PromptCraft.
//!
//! This crate is the foundation depended on by all other PromptCraft crates.
//! It provides:
//! - [`PromptCraftError`], the unified error type
//! - Request/result types ([`Context`], [`QueryAnalysis`], [`Preferences`],
//!   [`EvaluationResult`], [`EvaluationReport`], [`GenerationOutcome`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, EvaluatorConfig, config_dir, config_file_path, init_config,
    load_config, load_config_from, validate_config,
};
pub use error::{PromptCraftError, Result};
pub use types::{
    AgentIdentity, CREATE_AGENT_ID, Complexity, Context, DEFAULT_QUERY, EvaluationReport,
    EvaluationResult, EvaluationSummary, GenerationOutcome, MAX_RECOMMENDATIONS, Preferences,
    QueryAnalysis, ReasoningDepth, RigorLevel, StepResult,
};
