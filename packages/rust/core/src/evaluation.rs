//! Evaluation adapter.
//!
//! Hands a finished document to the external evaluator and folds the result
//! into an [`EvaluationReport`]. Evaluator failures are absorbed here: they
//! are logged and reported under `error`, never retried, never propagated.

use std::panic::{self, AssertUnwindSafe};

use tracing::{info, instrument, warn};

use promptcraft_shared::{
    Context, EvaluationReport, EvaluationResult, EvaluationSummary, Result, RigorLevel,
};

use crate::rigor::select_rigor;

/// The external quality-scoring collaborator.
///
/// Implementations may be slow; they are expected to bound their own
/// latency (see [`crate::bridge::SubprocessEvaluator`]).
pub trait PromptEvaluator: Send + Sync {
    /// Score `document` at the given rigor level.
    fn evaluate(
        &self,
        document: &str,
        context: &Context,
        rigor: RigorLevel,
    ) -> Result<EvaluationResult>;

    /// Human-readable evaluator name for tracing.
    fn name(&self) -> &str {
        "evaluator"
    }
}

/// Rigor level for a context, from its reasoning depth and analysis complexity.
pub fn rigor_for(context: &Context) -> RigorLevel {
    let complexity = context
        .query_analysis
        .as_ref()
        .map(|a| a.complexity())
        .unwrap_or("intermediate");
    select_rigor(context.reasoning_depth(), complexity)
}

/// Run the evaluator over `document` and project the outcome into a report.
#[instrument(skip_all, fields(depth = context.reasoning_depth()))]
pub fn evaluate_document(
    evaluator: Option<&dyn PromptEvaluator>,
    document: &str,
    context: &Context,
) -> EvaluationReport {
    let Some(evaluator) = evaluator else {
        warn!("evaluation requested but no evaluator is configured");
        return failed("no evaluator configured");
    };

    let rigor = rigor_for(context);
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        evaluator.evaluate(document, context, rigor)
    }));

    match outcome {
        Ok(Ok(result)) => completed(&result),
        Ok(Err(e)) => {
            warn!(evaluator = evaluator.name(), %rigor, error = %e, "evaluation failed");
            failed(e.detail())
        }
        Err(payload) => {
            let msg = panic_message(payload.as_ref());
            warn!(evaluator = evaluator.name(), %rigor, panic = %msg, "evaluator panicked");
            failed(format!("evaluator panicked: {msg}"))
        }
    }
}

fn completed(result: &EvaluationResult) -> EvaluationReport {
    info!(
        score = result.overall_score,
        compliance = result.compliance_score,
        flags = result.flags.len(),
        "evaluation complete"
    );
    EvaluationReport::Completed(EvaluationSummary::from(result))
}

fn failed(cause: impl std::fmt::Display) -> EvaluationReport {
    EvaluationReport::EvaluatorFailed {
        error: format!("Evaluation failed: {cause}"),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use promptcraft_shared::{PromptCraftError, QueryAnalysis, StepResult};

    use super::*;

    /// Records the rigor it was called with and returns a fixed result.
    struct Recording {
        seen: Mutex<Vec<RigorLevel>>,
    }

    impl PromptEvaluator for Recording {
        fn evaluate(&self, _: &str, _: &Context, rigor: RigorLevel) -> Result<EvaluationResult> {
            self.seen.lock().expect("lock").push(rigor);
            Ok(EvaluationResult {
                overall_score: 88.0,
                overall_confidence: 0.8,
                compliance_score: 95.0,
                rigor_level: rigor,
                is_passing: true,
                needs_revision: false,
                flags: vec!["hedging_low".into()],
                critical_issues: vec![],
                improvement_recommendations: (0..7).map(|i| format!("tip {i}")).collect(),
                step_results: BTreeMap::from([
                    ("anchor".to_string(), StepResult { score: 9.0 }),
                    ("verify".to_string(), StepResult { score: 7.0 }),
                ]),
            })
        }
    }

    struct Failing;

    impl PromptEvaluator for Failing {
        fn evaluate(&self, _: &str, _: &Context, _: RigorLevel) -> Result<EvaluationResult> {
            Err(PromptCraftError::Timeout(Duration::from_secs(3)))
        }
    }

    struct Panicking;

    impl PromptEvaluator for Panicking {
        fn evaluate(&self, _: &str, _: &Context, _: RigorLevel) -> Result<EvaluationResult> {
            panic!("scorer exploded");
        }
    }

    #[test]
    fn success_projects_summary() {
        let evaluator = Recording {
            seen: Mutex::new(Vec::new()),
        };
        let ctx = Context::with_query("q")
            .depth("basic")
            .analysis(QueryAnalysis::new("general", "simple"));

        let report = evaluate_document(Some(&evaluator), "doc", &ctx);
        let summary = report.summary().expect("completed");

        assert_eq!(summary.rigor_level, RigorLevel::Basic);
        assert_eq!(summary.recommendations.len(), 5);
        assert_eq!(summary.step_scores.len(), 2);
        assert_eq!(*evaluator.seen.lock().expect("lock"), vec![RigorLevel::Basic]);
    }

    #[test]
    fn rigor_defaults_without_analysis() {
        assert_eq!(rigor_for(&Context::with_query("q")), RigorLevel::Standard);
        assert_eq!(
            rigor_for(&Context::with_query("q").depth("comprehensive")),
            RigorLevel::Advanced
        );
    }

    #[test]
    fn error_is_reported_not_raised() {
        let report = evaluate_document(Some(&Failing), "doc", &Context::with_query("q"));
        assert_eq!(
            report.error(),
            Some("Evaluation failed: evaluator timed out after 3s")
        );
        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json.as_object().map(|o| o.len()), Some(1));
    }

    struct Unreachable;

    impl PromptEvaluator for Unreachable {
        fn evaluate(&self, _: &str, _: &Context, _: RigorLevel) -> Result<EvaluationResult> {
            Err(PromptCraftError::evaluation("scoring backend unreachable"))
        }
    }

    #[test]
    fn error_cause_is_not_double_prefixed() {
        let report = evaluate_document(Some(&Unreachable), "doc", &Context::with_query("q"));
        assert_eq!(
            report.error(),
            Some("Evaluation failed: scoring backend unreachable")
        );
    }

    #[test]
    fn panic_is_reported_not_raised() {
        let report = evaluate_document(Some(&Panicking), "doc", &Context::with_query("q"));
        let error = report.error().expect("error report");
        assert!(error.contains("scorer exploded"));
    }

    #[test]
    fn missing_evaluator_is_an_evaluation_failure() {
        let report = evaluate_document(None, "doc", &Context::with_query("q"));
        assert_eq!(
            report.error(),
            Some("Evaluation failed: no evaluator configured")
        );
    }
}
