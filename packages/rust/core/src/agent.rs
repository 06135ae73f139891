//! The C.R.E.A.T.E. prompt agent.
//!
//! [`CreateAgent::generate`] is the single entry point. It runs
//! validate → classify → build → assemble → (evaluate), and never fails:
//! any error along the way degrades to the fallback document.

use tracing::{debug, error, info, instrument, warn};

use promptcraft_shared::{
    AgentIdentity, Context, DEFAULT_QUERY, EvaluationReport, GenerationOutcome, Preferences,
    PromptCraftError, QueryAnalysis, Result,
};

use crate::assembler::{self, Sections};
use crate::classifier::classify;
use crate::evaluation::{PromptEvaluator, evaluate_document};
use crate::rigor::display_rigor_label;
use crate::sections;

/// Message used when the context names keys but no usable query.
pub const EMPTY_QUERY_MESSAGE: &str = "Empty query provided";

/// Rule-based C.R.E.A.T.E. prompt generator.
pub struct CreateAgent {
    identity: AgentIdentity,
    evaluator: Option<Box<dyn PromptEvaluator>>,
}

impl Default for CreateAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CreateAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateAgent")
            .field("identity", &self.identity)
            .field("evaluator", &self.evaluator.as_ref().map(|e| e.name()))
            .finish()
    }
}

impl CreateAgent {
    /// Agent with the standard `create_agent` identity and no evaluator.
    pub fn new() -> Self {
        Self {
            identity: AgentIdentity::default(),
            evaluator: None,
        }
    }

    pub fn with_evaluator(mut self, evaluator: impl PromptEvaluator + 'static) -> Self {
        self.evaluator = Some(Box::new(evaluator));
        self
    }

    pub fn with_boxed_evaluator(mut self, evaluator: Option<Box<dyn PromptEvaluator>>) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    pub fn agent_id(&self) -> &str {
        self.identity.agent_id()
    }

    pub fn knowledge_base_path(&self) -> &str {
        self.identity.knowledge_base_path()
    }

    pub fn collection(&self) -> &str {
        self.identity.collection()
    }

    /// Generate a C.R.E.A.T.E. document for `context`.
    ///
    /// `report` is `Some` exactly when `include_evaluation` is set. The
    /// evaluator is only consulted when the full document was produced.
    #[instrument(skip_all, fields(agent = %self.identity.agent_id(), include_evaluation = include_evaluation))]
    pub fn generate(
        &self,
        context: &Context,
        preferences: Option<&Preferences>,
        include_evaluation: bool,
    ) -> GenerationOutcome {
        self.generate_with(context, include_evaluation, |query| {
            render(query, context, preferences)
        })
    }

    /// The generation state machine around a caller-supplied render step.
    pub(crate) fn generate_with<F>(
        &self,
        context: &Context,
        include_evaluation: bool,
        render: F,
    ) -> GenerationOutcome
    where
        F: FnOnce(&str) -> Result<String>,
    {
        let query = match validate(context) {
            Ok(query) => query,
            Err(e) => {
                warn!(reason = %e, "generation aborted during validation");
                return degraded(&e.detail(), include_evaluation);
            }
        };

        info!(
            query_len = query.len(),
            depth = context.reasoning_depth(),
            "generating document"
        );

        let document = match render(query) {
            Ok(document) => document,
            Err(e) => {
                error!(error = %e, "generation failed, returning fallback document");
                let message = format!("Generation failed: {}", e.detail());
                return degraded(&message, include_evaluation);
            }
        };

        info!(bytes = document.len(), "document generated");

        let report = include_evaluation
            .then(|| evaluate_document(self.evaluator.as_deref(), &document, context));

        GenerationOutcome {
            document,
            report,
            degraded: false,
        }
    }
}

/// The query to render, or the reason generation cannot start.
///
/// A wholly empty context substitutes the default query; a context with
/// keys but no usable query is rejected.
fn validate(context: &Context) -> Result<&str> {
    let query = context.resolved_query();
    if !query.trim().is_empty() {
        return Ok(query);
    }
    if context.is_empty() {
        debug!("empty context, using default query");
        return Ok(DEFAULT_QUERY);
    }
    Err(PromptCraftError::validation(EMPTY_QUERY_MESSAGE))
}

fn render(query: &str, context: &Context, preferences: Option<&Preferences>) -> Result<String> {
    let default_analysis = QueryAnalysis::default();
    let analysis = context.query_analysis.as_ref().unwrap_or(&default_analysis);
    let depth = context.reasoning_depth();

    let c = classify(query, analysis, depth, preferences);
    let rigor_label = display_rigor_label(depth, analysis.complexity());

    let blocks = Sections {
        context: sections::context(&c),
        request: sections::request(query, &c),
        examples: sections::examples(query),
        augmentations: sections::augmentations(&c),
        tone_format: sections::tone_format(&c),
        evaluation: sections::evaluation(rigor_label),
    };

    assembler::assemble(&blocks)
}

fn degraded(message: &str, include_evaluation: bool) -> GenerationOutcome {
    GenerationOutcome {
        document: fallback_document(message),
        report: include_evaluation.then(|| EvaluationReport::aborted(message)),
        degraded: true,
    }
}

/// Short document returned whenever the full template cannot be produced.
pub fn fallback_document(message: &str) -> String {
    format!(
        "# Prompt Generation Error\n\
         \n\
         An error occurred during CREATE framework prompt generation: {message}\n\
         \n\
         Please try again with a clearer query, or contact support if the issue persists.\n\
         \n\
         ## Fallback Prompt Structure\n\
         \n\
         **Context**: Please act as a helpful assistant\n\
         **Request**: {message}\n\
         **Guidance**: Provide a clear, accurate response based on the query provided\n"
    )
}
