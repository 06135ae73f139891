//! Rigor selection for the external evaluator.
//!
//! Two lookups live here and they intentionally disagree:
//! - [`select_rigor`] picks the level actually sent to the evaluator.
//! - [`display_rigor_label`] picks the label printed in the Evaluation section.
//!
//! Keys are `(Option<ReasoningDepth>, Option<Complexity>)` where `None` stands
//! for a label outside the known vocabulary, so unknown inputs are part of the
//! table rather than an implicit branch.

use promptcraft_shared::{Complexity, ReasoningDepth, RigorLevel};

use promptcraft_shared::ReasoningDepth::{Basic, Comprehensive, Intermediate as Mid};

type Key = (Option<ReasoningDepth>, Option<Complexity>);

/// Pairs that do not resolve to [`RigorLevel::Standard`].
const RIGOR_TABLE: &[(Key, RigorLevel)] = &[
    ((Some(Comprehensive), Some(Complexity::Simple)), RigorLevel::Advanced),
    ((Some(Comprehensive), Some(Complexity::Intermediate)), RigorLevel::Advanced),
    ((Some(Comprehensive), Some(Complexity::Complex)), RigorLevel::Advanced),
    ((Some(Comprehensive), None), RigorLevel::Advanced),
    ((Some(Basic), Some(Complexity::Complex)), RigorLevel::Advanced),
    ((Some(Mid), Some(Complexity::Complex)), RigorLevel::Advanced),
    ((None, Some(Complexity::Complex)), RigorLevel::Advanced),
    ((Some(Basic), Some(Complexity::Simple)), RigorLevel::Basic),
];

const DEFAULT_RIGOR: RigorLevel = RigorLevel::Standard;

/// Pairs that do not resolve to [`DEFAULT_DISPLAY_LABEL`].
///
/// Unlike [`RIGOR_TABLE`], intermediate depth shows "Standard" for every
/// non-complex complexity, and basic depth never shows "Standard".
const DISPLAY_TABLE: &[(Key, &str)] = &[
    ((Some(Comprehensive), Some(Complexity::Simple)), "Advanced"),
    ((Some(Comprehensive), Some(Complexity::Intermediate)), "Advanced"),
    ((Some(Comprehensive), Some(Complexity::Complex)), "Advanced"),
    ((Some(Comprehensive), None), "Advanced"),
    ((Some(Basic), Some(Complexity::Complex)), "Advanced"),
    ((Some(Mid), Some(Complexity::Complex)), "Advanced"),
    ((None, Some(Complexity::Complex)), "Advanced"),
    ((Some(Mid), Some(Complexity::Simple)), "Standard"),
    ((Some(Mid), Some(Complexity::Intermediate)), "Standard"),
    ((Some(Mid), None), "Standard"),
];

const DEFAULT_DISPLAY_LABEL: &str = "Basic";

fn key(reasoning_depth: &str, complexity: &str) -> Key {
    (
        ReasoningDepth::parse(reasoning_depth),
        Complexity::parse(complexity),
    )
}

/// Rigor level passed to the evaluator.
pub fn select_rigor(reasoning_depth: &str, complexity: &str) -> RigorLevel {
    let key = key(reasoning_depth, complexity);
    RIGOR_TABLE
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, level)| *level)
        .unwrap_or(DEFAULT_RIGOR)
}

/// Rigor label rendered inside the document's Evaluation section.
pub fn display_rigor_label(reasoning_depth: &str, complexity: &str) -> &'static str {
    let key = key(reasoning_depth, complexity);
    DISPLAY_TABLE
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| *label)
        .unwrap_or(DEFAULT_DISPLAY_LABEL)
}
