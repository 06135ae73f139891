//! Rule-based C.R.E.A.T.E. prompt generation for PromptCraft.
//!
//! This crate turns a free-text query and its upstream analysis into a
//! six-section Markdown prompt document (Context, Request, Examples,
//! Augmentations, Tone & Format, Evaluation), optionally scored by an
//! external evaluator.

pub mod agent;
pub mod assembler;
pub mod bridge;
pub mod classifier;
pub mod evaluation;
pub mod rigor;
pub mod sections;
pub mod tables;

pub use agent::{CreateAgent, EMPTY_QUERY_MESSAGE, fallback_document};
pub use bridge::SubprocessEvaluator;
pub use evaluation::{PromptEvaluator, evaluate_document, rigor_for};
pub use rigor::{display_rigor_label, select_rigor};
