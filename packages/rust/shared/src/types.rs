//! Core domain types for PromptCraft generation requests and results.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Query substituted when `generate` is called with a completely empty context.
pub const DEFAULT_QUERY: &str = "Provide helpful assistance";

/// Maximum number of improvement recommendations carried into a report.
pub const MAX_RECOMMENDATIONS: usize = 5;

// ---------------------------------------------------------------------------
// Enumerated inputs
// ---------------------------------------------------------------------------

/// How deep the requested answer should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasoningDepth {
    Basic,
    Intermediate,
    Comprehensive,
}

impl ReasoningDepth {
    /// Parse the wire label. Unknown labels yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "basic" => Some(Self::Basic),
            "intermediate" => Some(Self::Intermediate),
            "comprehensive" => Some(Self::Comprehensive),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Intermediate => "intermediate",
            Self::Comprehensive => "comprehensive",
        }
    }
}

/// Upstream estimate of how hard the query is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    Intermediate,
    Complex,
}

impl Complexity {
    /// Parse the wire label. Unknown labels yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "simple" => Some(Self::Simple),
            "intermediate" => Some(Self::Intermediate),
            "complex" => Some(Self::Complex),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Intermediate => "intermediate",
            Self::Complex => "complex",
        }
    }
}

/// Strictness the external evaluator applies when scoring a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RigorLevel {
    Basic,
    Standard,
    Advanced,
}

impl RigorLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Standard => "standard",
            Self::Advanced => "advanced",
        }
    }
}

impl std::fmt::Display for RigorLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Request mappings
// ---------------------------------------------------------------------------

/// Upstream analysis of the query. Never constructed by the core itself.
///
/// Fields stay as raw strings: labels outside the known vocabulary are legal
/// and simply miss every lookup table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<String>,
    /// Any other keys the upstream analyzer attached.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QueryAnalysis {
    pub fn new(query_type: impl Into<String>, complexity: impl Into<String>) -> Self {
        Self {
            query_type: Some(query_type.into()),
            complexity: Some(complexity.into()),
            extra: Map::new(),
        }
    }

    /// Query type label, `general` when absent.
    pub fn query_type(&self) -> &str {
        self.query_type.as_deref().unwrap_or("general")
    }

    /// Complexity label, `intermediate` when absent.
    pub fn complexity(&self) -> &str {
        self.complexity.as_deref().unwrap_or("intermediate")
    }

    /// Complexity as an enumerated value, if the label is recognised.
    pub fn complexity_level(&self) -> Option<Complexity> {
        Complexity::parse(self.complexity())
    }
}

/// Input mapping for one generation call.
///
/// `query` is also accepted as `task` or `request`; the first non-empty one wins.
/// A known key sent as `null` still counts as present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "ContextFields")]
pub struct Context {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_analysis: Option<QueryAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_depth: Option<String>,
    /// Keys the core does not read but forwards to the evaluator.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip)]
    has_null_keys: bool,
}

/// Wire shape of [`Context`], distinguishing a missing key from `null`.
#[derive(Deserialize)]
struct ContextFields {
    #[serde(default, deserialize_with = "present")]
    query: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    task: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    request: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    query_analysis: Option<Option<QueryAnalysis>>,
    #[serde(default, deserialize_with = "present")]
    reasoning_depth: Option<Option<String>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl From<ContextFields> for Context {
    fn from(f: ContextFields) -> Self {
        let has_null_keys = matches!(f.query, Some(None))
            || matches!(f.task, Some(None))
            || matches!(f.request, Some(None))
            || matches!(f.query_analysis, Some(None))
            || matches!(f.reasoning_depth, Some(None));
        Self {
            query: f.query.flatten(),
            task: f.task.flatten(),
            request: f.request.flatten(),
            query_analysis: f.query_analysis.flatten(),
            reasoning_depth: f.reasoning_depth.flatten(),
            extra: f.extra,
            has_null_keys,
        }
    }
}

impl Context {
    /// A context carrying only a query.
    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    pub fn analysis(mut self, analysis: QueryAnalysis) -> Self {
        self.query_analysis = Some(analysis);
        self
    }

    pub fn depth(mut self, depth: impl Into<String>) -> Self {
        self.reasoning_depth = Some(depth.into());
        self
    }

    /// True when no key at all is present.
    pub fn is_empty(&self) -> bool {
        self.query.is_none()
            && self.task.is_none()
            && self.request.is_none()
            && self.query_analysis.is_none()
            && self.reasoning_depth.is_none()
            && self.extra.is_empty()
            && !self.has_null_keys
    }

    /// The first non-empty of `query`, `task`, `request`, or `""`.
    pub fn resolved_query(&self) -> &str {
        [&self.query, &self.task, &self.request]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .find(|s| !s.is_empty())
            .unwrap_or("")
    }

    /// Reasoning depth label, `intermediate` when absent.
    pub fn reasoning_depth(&self) -> &str {
        self.reasoning_depth.as_deref().unwrap_or("intermediate")
    }
}

/// Optional style hints. Only `tone_preference` is consumed by the core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone_preference: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Preferences {
    pub fn with_tone(tone: impl Into<String>) -> Self {
        Self {
            tone_preference: Some(tone.into()),
            extra: Map::new(),
        }
    }

    /// Tone label, `professional` when absent.
    pub fn tone(&self) -> &str {
        self.tone_preference.as_deref().unwrap_or("professional")
    }
}

// ---------------------------------------------------------------------------
// Evaluation results
// ---------------------------------------------------------------------------

/// Per-step score reported by the evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub score: f64,
}

/// Full result returned by the evaluation collaborator. The core only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub overall_score: f64,
    pub overall_confidence: f64,
    pub compliance_score: f64,
    pub rigor_level: RigorLevel,
    pub is_passing: bool,
    pub needs_revision: bool,
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub critical_issues: Vec<String>,
    #[serde(default)]
    pub improvement_recommendations: Vec<String>,
    #[serde(default)]
    pub step_results: BTreeMap<String, StepResult>,
}

/// Flat projection of an [`EvaluationResult`] for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationSummary {
    pub overall_score: f64,
    pub overall_confidence: f64,
    pub compliance_score: f64,
    pub rigor_level: RigorLevel,
    pub is_passing: bool,
    pub needs_revision: bool,
    pub flags: Vec<String>,
    pub critical_issues: Vec<String>,
    /// At most [`MAX_RECOMMENDATIONS`] entries, in evaluator order.
    pub recommendations: Vec<String>,
    pub step_scores: BTreeMap<String, f64>,
}

impl From<&EvaluationResult> for EvaluationSummary {
    fn from(result: &EvaluationResult) -> Self {
        Self {
            overall_score: result.overall_score,
            overall_confidence: result.overall_confidence,
            compliance_score: result.compliance_score,
            rigor_level: result.rigor_level,
            is_passing: result.is_passing,
            needs_revision: result.needs_revision,
            flags: result.flags.clone(),
            critical_issues: result.critical_issues.clone(),
            recommendations: result
                .improvement_recommendations
                .iter()
                .take(MAX_RECOMMENDATIONS)
                .cloned()
                .collect(),
            step_scores: result
                .step_results
                .iter()
                .map(|(step, r)| (step.clone(), r.score))
                .collect(),
        }
    }
}

/// Evaluation report attached to a generation when evaluation was requested.
///
/// Serializes to a flat mapping: the summary fields on success, `{error}` when
/// the evaluator failed, `{error, evaluation: null}` when generation itself
/// never produced a full document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EvaluationReport {
    Completed(EvaluationSummary),
    EvaluatorFailed {
        error: String,
    },
    Aborted {
        error: String,
        /// Always `None`; serialized as an explicit `null`.
        evaluation: Option<EvaluationSummary>,
    },
}

impl EvaluationReport {
    pub fn aborted(reason: impl Into<String>) -> Self {
        Self::Aborted {
            error: reason.into(),
            evaluation: None,
        }
    }

    /// The error message, if this report records a failure.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Completed(_) => None,
            Self::EvaluatorFailed { error } | Self::Aborted { error, .. } => Some(error),
        }
    }

    pub fn summary(&self) -> Option<&EvaluationSummary> {
        match self {
            Self::Completed(summary) => Some(summary),
            _ => None,
        }
    }
}

/// Result of one `generate` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationOutcome {
    /// The rendered document; always present.
    pub document: String,
    /// Present only when evaluation was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<EvaluationReport>,
    /// True when the short fallback template was used.
    pub degraded: bool,
}

// ---------------------------------------------------------------------------
// Agent identity
// ---------------------------------------------------------------------------

/// Identifier of the C.R.E.A.T.E. prompt agent.
pub const CREATE_AGENT_ID: &str = "create_agent";

/// Fixed identity fields exposed to registry and discovery collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentIdentity {
    agent_id: String,
    knowledge_base_path: String,
    collection: String,
}

impl AgentIdentity {
    pub fn new(agent_id: impl Into<String>) -> Self {
        let agent_id = agent_id.into();
        Self {
            knowledge_base_path: format!("/knowledge/{agent_id}/"),
            collection: agent_id.clone(),
            agent_id,
        }
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub fn knowledge_base_path(&self) -> &str {
        &self.knowledge_base_path
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }
}

impl Default for AgentIdentity {
    fn default() -> Self {
        Self::new(CREATE_AGENT_ID)
    }
}
