//! Section builders, one per C.R.E.A.T.E. slot.
//!
//! Each builder is a pure function rendering a fixed skeleton with classifier
//! values substituted in. No builder reads another builder's output.

use crate::classifier::Classification;
use crate::tables::{self, COMPARISON_SHAPE_TERMS};

/// C: role, background, goal, audience.
pub fn context(c: &Classification) -> String {
    format!(
        "**Role**: You are a {role}, {persona}\n\
         \n\
         **Background**: {background}\n\
         \n\
         **Goal**: {goal}\n\
         \n\
         **Audience**: The response should be appropriate for {audience}-level understanding.",
        role = c.role,
        persona = c.persona,
        background = c.background,
        goal = c.goal,
        audience = c.audience_level,
    )
}

/// R: the task verbatim plus deliverable requirements.
pub fn request(query: &str, c: &Classification) -> String {
    format!(
        "**Primary Task**: {query}\n\
         \n\
         **Deliverable Requirements**:\n\
         - Format: {format}\n\
         - Depth: {tier}\n\
         - Action Focus: {verbs}\n\
         - Scope: Comprehensive analysis addressing all aspects of the query\n\
         - Quality Standard: Professional-grade output suitable for business decision-making\n\
         \n\
         **Success Criteria**: Response must be actionable, well-structured, and provide clear value to the user.",
        format = c.output_format,
        tier = c.tier,
        verbs = c.action_verbs,
    )
}

const COMPARISON_EXAMPLES: &str = "### Example Structure ###
**Aspect 1 Comparison**:
- Option A: [Specific characteristic with evidence]
- Option B: [Contrasting characteristic with evidence]
- Key Differentiator: [Critical distinction that influences decisions]

### Example Quality Standard ###
Each comparison point should include:
- Specific, measurable differences
- Relevant examples or case studies
- Clear implications for the user's context";

const GENERIC_EXAMPLES: &str = "### Example Response Pattern ###
**Analysis Framework**:
1. Core Concept Definition: [Clear, precise definition]
2. Key Components: [Essential elements with explanations]
3. Practical Applications: [Real-world examples and use cases]
4. Implementation Considerations: [Actionable guidance]

**Quality Indicators**: Specific details, credible sources, actionable insights";

/// E: few-shot structure. Uses its own comparison test, not the query type.
pub fn examples(query: &str) -> String {
    let query_lower = query.to_lowercase();
    if tables::contains_any(&query_lower, COMPARISON_SHAPE_TERMS) {
        COMPARISON_EXAMPLES.to_string()
    } else {
        GENERIC_EXAMPLES.to_string()
    }
}

/// A: frameworks and evidence requirements.
pub fn augmentations(c: &Classification) -> String {
    format!(
        "**Analytical Frameworks to Apply**:\n\
         {frameworks}\n\
         \n\
         **Evidence Requirements**:\n\
         {evidence}\n\
         \n\
         **Advanced Reasoning**: Apply systematic analysis with clear logical progression. \
         For complex topics, use step-by-step reasoning to build conclusions from evidence.",
        frameworks = c.frameworks,
        evidence = c.evidence,
    )
}

/// T: tone plus the fixed stylometry defaults.
pub fn tone_format(c: &Classification) -> String {
    format!(
        "**Tone**: {tone} and accessible, with authoritative expertise\n\
         \n\
         **Writing Standards**:\n\
         - Moderate hedge density (5-10% of sentences) to acknowledge appropriate uncertainties\n\
         - High lexical diversity (varied vocabulary, no word appearing >2% of tokens)\n\
         - Sentence variability (average 17-22 words, with mix of short and long sentences)\n\
         - Include at least one rhetorical question to engage critical thinking\n\
         - Use narrative prose over bullet lists unless specifically requested\n\
         \n\
         **Structure**: Clear heading hierarchy with logical flow from overview to specific details\n\
         \n\
         **Citation Style**: Include sources and evidence attribution where claims require support",
        tone = title_case(&c.tone),
    )
}

/// E: quality assurance protocol at the displayed rigor label.
pub fn evaluation(rigor_label: &str) -> String {
    format!(
        "**Quality Assurance Protocol** (ANCHOR-QR-8, {rigor_label} Rigor):\n\
         \n\
         **Success Criteria**:\n\
         - Does the response fully address the original query?\n\
         - Are all claims supported by evidence or clearly marked as expert judgment?\n\
         - Is the analysis logically consistent throughout?\n\
         - Does the response provide actionable insights?\n\
         - Is the tone appropriate for the intended audience?\n\
         \n\
         **Verification Requirements**:\n\
         - Check for internal contradictions\n\
         - Verify factual accuracy of key claims\n\
         - Ensure recommendations are feasible and specific\n\
         - Confirm appropriate uncertainty acknowledgment\n\
         \n\
         **Quality Standards**: Professional-grade accuracy, comprehensive coverage, clear practical value"
    )
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;
    use promptcraft_shared::{Preferences, QueryAnalysis};

    fn classification(query: &str) -> Classification {
        classify(query, &QueryAnalysis::default(), "intermediate", None)
    }

    #[test]
    fn context_renders_role_and_audience() {
        let c = classification("Explain Kubernetes operators");
        let block = context(&c);
        assert!(block.starts_with(
            "**Role**: You are a senior software architect, specializing in scalable enterprise system design"
        ));
        assert!(block.contains("**Goal**: Provide comprehensive understanding"));
        assert!(block.ends_with("appropriate for intermediate-level understanding."));
    }

    #[test]
    fn request_embeds_query_verbatim() {
        let query = "How to Configure  TLS?";
        let block = request(query, &classification(query));
        assert!(block.starts_with("**Primary Task**: How to Configure  TLS?\n"));
        assert!(block.contains("- Format: Structured guide with clear steps and checkpoints"));
        assert!(block.contains("- Action Focus: Guide, implement, and optimize"));
    }

    #[test]
    fn examples_branch_on_comparison_shape() {
        assert!(examples("Postgres VS MySQL").starts_with("### Example Structure ###"));
        assert!(examples("Describe a comparison").contains("Key Differentiator"));
        // "compare" alone is not the comparison shape for examples.
        assert!(examples("Compare two editors").starts_with("### Example Response Pattern ###"));
    }

    #[test]
    fn augmentations_lists_frameworks_then_evidence() {
        let block = augmentations(&classification("security audit"));
        let stride = block.find("STRIDE").expect("frameworks rendered");
        let evidence = block.find("**Evidence Requirements**").expect("evidence rendered");
        assert!(stride < evidence);
        assert!(block.ends_with("build conclusions from evidence."));
    }

    #[test]
    fn tone_is_title_cased() {
        let c = classify(
            "q",
            &QueryAnalysis::default(),
            "basic",
            Some(&Preferences::with_tone("warm CASUAL")),
        );
        assert!(tone_format(&c).starts_with("**Tone**: Warm Casual and accessible"));
    }

    #[test]
    fn title_case_rules() {
        assert_eq!(title_case("professional"), "Professional");
        assert_eq!(title_case("semi-formal"), "Semi-Formal");
        assert_eq!(title_case("they're"), "They'Re");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn evaluation_shows_label() {
        assert!(evaluation("Standard").starts_with("**Quality Assurance Protocol** (ANCHOR-QR-8, Standard Rigor):"));
    }
}
