//! Query classifier.
//!
//! Applies the category tables to a raw query and its upstream analysis,
//! producing every label and fragment the section builders consume.
//! Classification never fails: each decision has a default.

use tracing::debug;

use promptcraft_shared::{Complexity, Preferences, QueryAnalysis, ReasoningDepth};

use crate::tables::{self, KeywordRule};

/// Derived labels and fragments for one query. Every field is always populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub role: &'static str,
    /// At most twelve words.
    pub persona: &'static str,
    /// Background sentences joined with `". "` and terminated with `"."`.
    pub background: String,
    pub goal: &'static str,
    pub tier: &'static str,
    pub action_verbs: &'static str,
    pub output_format: &'static str,
    /// Markdown bullet list, one framework per line.
    pub frameworks: String,
    /// Markdown bullet list, one requirement per line.
    pub evidence: String,
    pub tone: String,
    /// Raw complexity label echoed into the Audience line.
    pub audience_level: String,
}

/// Classify a query along every axis.
pub fn classify(
    query: &str,
    analysis: &QueryAnalysis,
    reasoning_depth: &str,
    preferences: Option<&Preferences>,
) -> Classification {
    let query_lower = query.to_lowercase();
    let query_type = analysis.query_type();
    let complexity = analysis.complexity_level();

    let role = determine_role(&query_lower, query_type);
    let classification = Classification {
        role,
        persona: persona_clause(role, query_type),
        background: background(&query_lower, complexity),
        goal: goal(&query_lower),
        tier: select_tier(reasoning_depth, analysis.complexity()),
        action_verbs: action_verbs(&query_lower),
        output_format: output_format(&query_lower, complexity),
        frameworks: frameworks(&query_lower, query_type),
        evidence: evidence_requirements(complexity),
        tone: preferences
            .map(Preferences::tone)
            .unwrap_or("professional")
            .to_string(),
        audience_level: analysis.complexity().to_string(),
    };

    debug!(
        role = classification.role,
        tier = classification.tier,
        query_type,
        "query classified"
    );

    classification
}

/// Keyword sets first, then the `query_type` table, then the generic role.
pub fn determine_role(query_lower: &str, query_type: &str) -> &'static str {
    tables::first_match(tables::ROLE_RULES, query_lower)
        .map(|label| label.resolve(query_lower))
        .or_else(|| tables::lookup(tables::ROLE_BY_QUERY_TYPE, query_type))
        .unwrap_or(tables::DEFAULT_ROLE)
}

/// Persona keyed on words inside the resolved role label.
pub fn persona_clause(role: &str, query_type: &str) -> &'static str {
    let role_lower = role.to_lowercase();
    tables::PERSONA_BY_ROLE_WORD
        .iter()
        .find(|(word, _)| role_lower.contains(word))
        .map(|(_, persona)| *persona)
        .or_else(|| tables::lookup(tables::PERSONA_BY_QUERY_TYPE, query_type))
        .unwrap_or(tables::DEFAULT_PERSONA)
}

/// Complexity sentence first (when applicable), then every matching pattern.
pub fn background(query_lower: &str, complexity: Option<Complexity>) -> String {
    let complexity_sentence = match complexity {
        Some(Complexity::Complex) => Some(tables::COMPLEX_BACKGROUND),
        Some(Complexity::Intermediate) => Some(tables::INTERMEDIATE_BACKGROUND),
        Some(Complexity::Simple) | None => None,
    };

    let mut sentences: Vec<&str> = complexity_sentence.into_iter().collect();
    sentences.extend(
        tables::BACKGROUND_RULES
            .iter()
            .filter(|rule| rule.matches(query_lower))
            .map(|rule| rule.value),
    );

    if sentences.is_empty() {
        sentences.push(tables::DEFAULT_BACKGROUND);
    }

    format!("{}.", sentences.join(". "))
}

pub fn goal(query_lower: &str) -> &'static str {
    first_or(tables::GOAL_RULES, query_lower, tables::DEFAULT_GOAL)
}

/// Sparse (depth, complexity) lookup with a single default tier.
pub fn select_tier(reasoning_depth: &str, complexity: &str) -> &'static str {
    let key = ReasoningDepth::parse(reasoning_depth).zip(Complexity::parse(complexity));
    key.and_then(|key| {
        tables::TIER_TABLE
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, tier)| *tier)
    })
    .unwrap_or(tables::DEFAULT_TIER)
}

pub fn action_verbs(query_lower: &str) -> &'static str {
    first_or(
        tables::ACTION_VERB_RULES,
        query_lower,
        tables::DEFAULT_ACTION_VERBS,
    )
}

pub fn output_format(query_lower: &str, complexity: Option<Complexity>) -> &'static str {
    if let Some(format) = tables::first_match(tables::OUTPUT_FORMAT_RULES, query_lower) {
        return format;
    }
    if complexity == Some(Complexity::Complex) {
        tables::COMPLEX_OUTPUT_FORMAT
    } else {
        tables::DEFAULT_OUTPUT_FORMAT
    }
}

pub fn frameworks(query_lower: &str, query_type: &str) -> String {
    tables::FRAMEWORK_RULES
        .iter()
        .find(|rule| rule.matches(query_type, query_lower))
        .map(|rule| rule.frameworks)
        .unwrap_or(tables::DEFAULT_FRAMEWORKS)
        .join("\n")
}

/// Evidence requirements depend on complexity alone.
pub fn evidence_requirements(complexity: Option<Complexity>) -> String {
    match complexity {
        Some(Complexity::Complex) => tables::COMPLEX_EVIDENCE.join("\n"),
        _ => tables::DEFAULT_EVIDENCE.join("\n"),
    }
}

fn first_or(rules: &[KeywordRule<&'static str>], text: &str, default: &'static str) -> &'static str {
    tables::first_match(rules, text).copied().unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role_of(query: &str) -> &'static str {
        determine_role(&query.to_lowercase(), "general")
    }

    #[test]
    fn security_outranks_comparison() {
        assert_eq!(
            role_of("Compare threat models for our API gateway"),
            "cybersecurity architect"
        );
        assert_eq!(
            role_of("Security of cloud storage vs on-prem"),
            "cloud security architect"
        );
    }

    #[test]
    fn role_priority_chain() {
        assert_eq!(role_of("Deploy with Kubernetes"), "senior software architect");
        assert_eq!(role_of("Tune my SQL queries"), "senior data architect");
        assert_eq!(role_of("How to configure nginx"), "technical implementation specialist");
        assert_eq!(role_of("Rust versus Go"), "technology consultant");
        assert_eq!(role_of("Grow my startup"), "senior technology strategist");
        assert_eq!(role_of("Train a machine learning classifier"), "machine learning engineer");
    }

    #[test]
    fn role_falls_back_to_query_type_then_default() {
        assert_eq!(
            determine_role("write a poem", "documentation"),
            "technical documentation specialist"
        );
        assert_eq!(determine_role("write a poem", "poetry"), "senior consultant");
    }

    #[test]
    fn persona_follows_role_words() {
        assert_eq!(
            persona_clause("cloud security architect", "general"),
            "with 15+ years defending critical infrastructure systems"
        );
        assert_eq!(
            persona_clause("senior data architect", "general"),
            "specializing in scalable enterprise system design"
        );
        assert_eq!(
            persona_clause("subject matter expert", "general_query"),
            "with comprehensive knowledge across domains"
        );
        assert_eq!(
            persona_clause("senior consultant", "unknown"),
            "with proven expertise in technology strategy"
        );
        assert_eq!(
            persona_clause("wizard", "unknown"),
            "with deep expertise in the relevant field"
        );
    }

    #[test]
    fn background_accumulates_matches() {
        let text = background(
            "how to harden microservices api security vs a monolith",
            Some(Complexity::Complex),
        );
        let sentences: Vec<&str> = text.trim_end_matches('.').split(". ").collect();
        assert_eq!(sentences[0], tables::COMPLEX_BACKGROUND);
        assert!(text.contains("systematic comparison"));
        assert!(text.contains("step-by-step guidance"));
        assert!(text.contains("Security considerations"));
        assert!(text.contains("Architectural decisions"));
        assert!(text.ends_with('.'));
    }

    #[test]
    fn background_default_when_nothing_fires() {
        assert_eq!(
            background("tell me a story", Some(Complexity::Simple)),
            format!("{}.", tables::DEFAULT_BACKGROUND)
        );
        assert_eq!(
            background("tell me a story", None),
            format!("{}.", tables::DEFAULT_BACKGROUND)
        );
    }

    #[test]
    fn goal_first_match() {
        assert!(goal("how to compare things").starts_with("Provide step-by-step"));
        assert!(goal("compare and explain").starts_with("Deliver clear comparisons"));
        assert!(goal("explain monads").starts_with("Provide comprehensive understanding"));
        assert_eq!(goal("hello"), tables::DEFAULT_GOAL);
    }

    #[test]
    fn tier_lookup_and_fallback() {
        assert!(select_tier("basic", "simple").starts_with("Tier 3"));
        assert!(select_tier("comprehensive", "complex").starts_with("Tier 9"));
        assert_eq!(select_tier("intermediate", "complex"), tables::DEFAULT_TIER);
        assert_eq!(select_tier("basic", "complex"), tables::DEFAULT_TIER);
        assert_eq!(select_tier("expert", "simple"), tables::DEFAULT_TIER);
    }

    #[test]
    fn output_format_precedence() {
        assert!(output_format("step by step vs", None).starts_with("Structured guide"));
        assert!(output_format("postgres vs mysql", None).starts_with("Comparative"));
        assert_eq!(
            output_format("distributed consensus", Some(Complexity::Complex)),
            tables::COMPLEX_OUTPUT_FORMAT
        );
        assert_eq!(output_format("hello", None), tables::DEFAULT_OUTPUT_FORMAT);
    }

    #[test]
    fn frameworks_by_type_or_keyword() {
        assert!(frameworks("anything", "security").contains("STRIDE"));
        assert!(frameworks("security review", "general").contains("Defense-in-Depth"));
        assert!(frameworks("a vs b", "analysis_request").contains("Decision Matrix"));
        assert!(frameworks("market study", "analysis_request").contains("SWOT"));
        assert!(frameworks("market study", "general").contains("Structured Analysis"));
        assert_eq!(frameworks("market study", "general").lines().count(), 2);
    }

    #[test]
    fn evidence_by_complexity() {
        assert_eq!(evidence_requirements(Some(Complexity::Complex)).lines().count(), 5);
        assert_eq!(evidence_requirements(Some(Complexity::Simple)).lines().count(), 4);
        assert_eq!(evidence_requirements(None).lines().count(), 4);
    }

    #[test]
    fn classify_populates_every_field() {
        let c = classify("", &QueryAnalysis::default(), "intermediate", None);
        assert!(!c.role.is_empty());
        assert!(!c.persona.is_empty());
        assert!(!c.background.is_empty());
        assert!(!c.goal.is_empty());
        assert!(!c.tier.is_empty());
        assert!(!c.action_verbs.is_empty());
        assert!(!c.output_format.is_empty());
        assert!(!c.frameworks.is_empty());
        assert!(!c.evidence.is_empty());
        assert_eq!(c.tone, "professional");
        assert_eq!(c.audience_level, "intermediate");
    }

    #[test]
    fn classify_reads_tone_preference() {
        let prefs = Preferences::with_tone("friendly");
        let c = classify("hi", &QueryAnalysis::default(), "basic", Some(&prefs));
        assert_eq!(c.tone, "friendly");
    }
}
