//! Category tables: keyword sets and label lookups used by the classifier.
//!
//! Every first-match chain is an ordered slice of rules. Order is priority:
//! the first rule whose keywords hit wins, regardless of how specific a later
//! rule would have been. All matching is lowercase substring matching.

use promptcraft_shared::{Complexity, ReasoningDepth};

// ---------------------------------------------------------------------------
// Rule types
// ---------------------------------------------------------------------------

/// A keyword set mapped to a value.
#[derive(Debug)]
pub struct KeywordRule<T> {
    pub keywords: &'static [&'static str],
    pub value: T,
}

impl<T> KeywordRule<T> {
    /// True if any keyword occurs in `text` (expected to be lowercased).
    pub fn matches(&self, text: &str) -> bool {
        contains_any(text, self.keywords)
    }
}

/// Return the value of the first rule that matches `text`.
pub fn first_match<'a, T>(rules: &'a [KeywordRule<T>], text: &str) -> Option<&'a T> {
    rules.iter().find(|r| r.matches(text)).map(|r| &r.value)
}

/// True if any of `keywords` is a substring of `text`.
pub fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Look up `key` in a label table.
pub fn lookup<'a>(table: &'a [(&str, &'a str)], key: &str) -> Option<&'a str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

// ---------------------------------------------------------------------------
// Shared keyword sets
// ---------------------------------------------------------------------------

pub const SECURITY_TERMS: &[&str] = &[
    "security",
    "threat",
    "vulnerability",
    "cyber",
    "attack",
    "defense",
];
pub const DEVELOPMENT_TERMS: &[&str] = &[
    "api",
    "microservices",
    "docker",
    "kubernetes",
    "ci/cd",
    "devops",
];
pub const DATA_TERMS: &[&str] = &["data", "analytics", "power bi", "sql", "database"];
pub const HOW_TO_TERMS: &[&str] = &["how to", "implement", "setup", "configure"];
pub const COMPARISON_TERMS: &[&str] = &["compare", "vs", "versus", "difference"];
pub const STRATEGY_TERMS: &[&str] = &["startup", "business", "strategy", "decision", "recommend"];
pub const ML_TERMS: &[&str] = &["machine learning", "ai", "artificial intelligence", "model"];

/// Narrower comparison test used by the examples, format, and framework chains.
pub const COMPARISON_SHAPE_TERMS: &[&str] = &["comparison", "vs"];

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// A role produced by a matched keyword set.
#[derive(Debug)]
pub enum RoleLabel {
    Fixed(&'static str),
    /// Refined by a second keyword chain, with a label for when none hits.
    Refined {
        by: &'static [KeywordRule<&'static str>],
        otherwise: &'static str,
    },
}

impl RoleLabel {
    pub fn resolve(&self, query_lower: &str) -> &'static str {
        match self {
            Self::Fixed(label) => *label,
            Self::Refined { by, otherwise } => {
                first_match(by, query_lower).copied().unwrap_or(*otherwise)
            }
        }
    }
}

const SECURITY_REFINEMENTS: &[KeywordRule<&str>] = &[
    KeywordRule {
        keywords: &["network", "infrastructure"],
        value: "network security specialist",
    },
    KeywordRule {
        keywords: &["cloud"],
        value: "cloud security architect",
    },
];

/// Domain keyword sets in priority order.
pub const ROLE_RULES: &[KeywordRule<RoleLabel>] = &[
    KeywordRule {
        keywords: SECURITY_TERMS,
        value: RoleLabel::Refined {
            by: SECURITY_REFINEMENTS,
            otherwise: "cybersecurity architect",
        },
    },
    KeywordRule {
        keywords: DEVELOPMENT_TERMS,
        value: RoleLabel::Fixed("senior software architect"),
    },
    KeywordRule {
        keywords: DATA_TERMS,
        value: RoleLabel::Fixed("senior data architect"),
    },
    KeywordRule {
        keywords: HOW_TO_TERMS,
        value: RoleLabel::Fixed("technical implementation specialist"),
    },
    KeywordRule {
        keywords: COMPARISON_TERMS,
        value: RoleLabel::Fixed("technology consultant"),
    },
    KeywordRule {
        keywords: STRATEGY_TERMS,
        value: RoleLabel::Fixed("senior technology strategist"),
    },
    KeywordRule {
        keywords: ML_TERMS,
        value: RoleLabel::Fixed("machine learning engineer"),
    },
];

/// Role by upstream `query_type`, consulted when no keyword set matches.
pub const ROLE_BY_QUERY_TYPE: &[(&str, &str)] = &[
    ("security", "cybersecurity architect"),
    ("technical_analysis", "senior systems analyst"),
    ("analysis_request", "strategic business analyst"),
    ("documentation", "technical documentation specialist"),
    ("create_enhancement", "prompt engineering specialist"),
    ("implementation", "senior solution architect"),
    ("general_query", "subject matter expert"),
];

pub const DEFAULT_ROLE: &str = "senior consultant";

// ---------------------------------------------------------------------------
// Persona (each clause at most twelve words)
// ---------------------------------------------------------------------------

/// Persona by a word inside the resolved role label, in priority order.
pub const PERSONA_BY_ROLE_WORD: &[(&str, &str)] = &[
    ("security", "with 15+ years defending critical infrastructure systems"),
    ("architect", "specializing in scalable enterprise system design"),
    ("consultant", "with proven expertise in technology strategy"),
    ("engineer", "experienced in production-grade system implementation"),
    ("analyst", "focused on data-driven decision making"),
    ("specialist", "with deep domain expertise and practical experience"),
    ("strategist", "experienced in guiding technical business decisions"),
];

pub const PERSONA_BY_QUERY_TYPE: &[(&str, &str)] = &[
    ("security", "with proven experience in cybersecurity domains"),
    ("technical_analysis", "specializing in system optimization and architecture"),
    ("analysis_request", "focused on evidence-based strategic analysis"),
    ("documentation", "known for creating clear, actionable guidance"),
    ("implementation", "with hands-on experience in complex deployments"),
    ("general_query", "with comprehensive knowledge across domains"),
];

pub const DEFAULT_PERSONA: &str = "with deep expertise in the relevant field";

pub const MAX_PERSONA_WORDS: usize = 12;

// ---------------------------------------------------------------------------
// Background
// ---------------------------------------------------------------------------

pub const COMPLEX_BACKGROUND: &str = "This is a complex topic requiring comprehensive multi-faceted analysis with consideration of various perspectives and implications";
pub const INTERMEDIATE_BACKGROUND: &str =
    "This topic requires structured analysis with attention to key factors and relationships";

/// Pattern sentences; every matching rule contributes, in this order.
pub const BACKGROUND_RULES: &[KeywordRule<&str>] = &[
    KeywordRule {
        keywords: COMPARISON_TERMS,
        value: "Multiple options or approaches require systematic comparison to support informed decision-making",
    },
    KeywordRule {
        keywords: HOW_TO_TERMS,
        value: "The user needs step-by-step guidance for practical implementation",
    },
    KeywordRule {
        keywords: &["security", "threat", "vulnerability"],
        value: "Security considerations and risk factors must be thoroughly addressed",
    },
    KeywordRule {
        keywords: &["startup", "business", "strategy"],
        value: "Business context and strategic implications are critical to the analysis",
    },
    KeywordRule {
        keywords: &["machine learning", "ai", "model"],
        value: "Technical accuracy and practical applicability are essential for AI/ML topics",
    },
    KeywordRule {
        keywords: &["microservices", "architecture"],
        value: "Architectural decisions have long-term implications for scalability and maintainability",
    },
    KeywordRule {
        keywords: &["ci/cd", "devops"],
        value: "Implementation must consider development workflow and operational requirements",
    },
];

pub const DEFAULT_BACKGROUND: &str =
    "The user seeks authoritative information with practical applicability";

// ---------------------------------------------------------------------------
// Goal
// ---------------------------------------------------------------------------

pub const GOAL_RULES: &[KeywordRule<&str>] = &[
    KeywordRule {
        keywords: &["how to"],
        value: "Provide step-by-step guidance that enables successful implementation",
    },
    KeywordRule {
        keywords: COMPARISON_TERMS,
        value: "Deliver clear comparisons that support informed decision-making",
    },
    KeywordRule {
        keywords: &["explain"],
        value: "Provide comprehensive understanding with practical context",
    },
];

pub const DEFAULT_GOAL: &str = "Deliver actionable insights that directly address the user's needs";

// ---------------------------------------------------------------------------
// Tier (sparse two-key table)
// ---------------------------------------------------------------------------

/// Depth tiers for the listed (depth, complexity) pairs.
///
/// `(basic, complex)` and `(intermediate, complex)` are deliberately absent and
/// resolve to [`DEFAULT_TIER`].
pub const TIER_TABLE: &[((ReasoningDepth, Complexity), &str)] = &[
    (
        (ReasoningDepth::Basic, Complexity::Simple),
        "Tier 3: Summary (200-400 words) - Concise overview",
    ),
    (
        (ReasoningDepth::Basic, Complexity::Intermediate),
        "Tier 4: Overview (400-900 words) - Analyst briefing",
    ),
    (
        (ReasoningDepth::Intermediate, Complexity::Simple),
        "Tier 4: Overview (400-900 words) - Analyst briefing",
    ),
    (
        (ReasoningDepth::Intermediate, Complexity::Intermediate),
        "Tier 6: In-Depth Analysis (2000-5000 words) - Professional memo",
    ),
    (
        (ReasoningDepth::Comprehensive, Complexity::Simple),
        "Tier 6: In-Depth Analysis (2000-5000 words) - Professional memo",
    ),
    (
        (ReasoningDepth::Comprehensive, Complexity::Intermediate),
        "Tier 8: Comprehensive Study (8000-15000 words) - Research report",
    ),
    (
        (ReasoningDepth::Comprehensive, Complexity::Complex),
        "Tier 9: Expert Analysis (15000-30000 words) - Detailed study",
    ),
];

pub const DEFAULT_TIER: &str = "Tier 5: Detailed Response (900-2000 words) - Professional analysis";

// ---------------------------------------------------------------------------
// Action verbs / output format
// ---------------------------------------------------------------------------

pub const ACTION_VERB_RULES: &[KeywordRule<&str>] = &[
    KeywordRule {
        keywords: &["analyze", "analysis"],
        value: "Analyze, evaluate, and synthesize",
    },
    KeywordRule {
        keywords: &["compare"],
        value: "Compare, contrast, and recommend",
    },
    KeywordRule {
        keywords: &["explain"],
        value: "Explain, clarify, and illustrate",
    },
    KeywordRule {
        keywords: &["implement", "how to"],
        value: "Guide, implement, and optimize",
    },
];

pub const DEFAULT_ACTION_VERBS: &str = "Examine, assess, and advise";

/// Query-driven formats; checked before the complexity-driven one.
pub const OUTPUT_FORMAT_RULES: &[KeywordRule<&str>] = &[
    KeywordRule {
        keywords: &["step", "how to"],
        value: "Structured guide with clear steps and checkpoints",
    },
    KeywordRule {
        keywords: COMPARISON_SHAPE_TERMS,
        value: "Comparative analysis with side-by-side evaluation",
    },
];

pub const COMPLEX_OUTPUT_FORMAT: &str =
    "Comprehensive report with executive summary and detailed sections";
pub const DEFAULT_OUTPUT_FORMAT: &str =
    "Professional analysis with clear structure and actionable insights";

// ---------------------------------------------------------------------------
// Frameworks
// ---------------------------------------------------------------------------

/// A framework pair selected by query type or query keywords.
#[derive(Debug)]
pub struct FrameworkRule {
    /// Matches when the upstream query type equals this label.
    pub query_type: Option<&'static str>,
    /// Matches when any keyword occurs in the query.
    pub keywords: &'static [&'static str],
    pub frameworks: &'static [&'static str],
}

impl FrameworkRule {
    pub fn matches(&self, query_type: &str, query_lower: &str) -> bool {
        self.query_type == Some(query_type) || contains_any(query_lower, self.keywords)
    }
}

pub const FRAMEWORK_RULES: &[FrameworkRule] = &[
    FrameworkRule {
        query_type: Some("security"),
        keywords: &["security"],
        frameworks: &[
            "- **STRIDE Analysis**: Systematic threat modeling",
            "- **Defense-in-Depth**: Layered security approach",
        ],
    },
    FrameworkRule {
        query_type: None,
        keywords: COMPARISON_SHAPE_TERMS,
        frameworks: &[
            "- **Comparative Analysis**: Systematic side-by-side evaluation",
            "- **Decision Matrix**: Weighted criteria assessment",
        ],
    },
    FrameworkRule {
        query_type: Some("analysis_request"),
        keywords: &[],
        frameworks: &[
            "- **SWOT Analysis**: Strengths, Weaknesses, Opportunities, Threats",
            "- **Root Cause Analysis**: Systematic problem investigation",
        ],
    },
];

pub const DEFAULT_FRAMEWORKS: &[&str] = &[
    "- **Structured Analysis**: Systematic examination of key components",
    "- **Evidence-Based Reasoning**: Claims supported by credible sources",
];

// ---------------------------------------------------------------------------
// Evidence
// ---------------------------------------------------------------------------

pub const COMPLEX_EVIDENCE: &[&str] = &[
    "- Cite authoritative sources for all factual claims",
    "- Include recent examples or case studies where relevant",
    "- Acknowledge limitations and uncertainties appropriately",
    "- Reference industry standards or best practices",
    "- Use [ExpertJudgment] tags for professional opinions requiring domain expertise",
];

pub const DEFAULT_EVIDENCE: &[&str] = &[
    "- Support key claims with evidence or reasoning",
    "- Include relevant examples to illustrate concepts",
    "- Acknowledge areas of uncertainty with appropriate hedging",
    "- Reference credible sources where factual accuracy is critical",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persona_clauses_fit_word_limit() {
        let clauses = PERSONA_BY_ROLE_WORD
            .iter()
            .chain(PERSONA_BY_QUERY_TYPE)
            .map(|(_, clause)| *clause)
            .chain(std::iter::once(DEFAULT_PERSONA));

        for clause in clauses {
            let words = clause.split_whitespace().count();
            assert!(
                words <= MAX_PERSONA_WORDS,
                "persona clause has {words} words: {clause}"
            );
        }
    }

    #[test]
    fn first_match_respects_table_order() {
        let hit = first_match(ROLE_RULES, "compare security postures").map(|r| r.resolve(""));
        assert_eq!(hit, Some("cybersecurity architect"));
    }

    #[test]
    fn substring_matching_is_literal() {
        // "vs" hides inside "devs"; the tables do not do word splitting.
        assert!(contains_any("onboarding for new devs", COMPARISON_TERMS));
        assert!(!contains_any("onboarding for new hires", COMPARISON_TERMS));
        // "ai" hides inside "explain".
        assert!(contains_any("explain paging", ML_TERMS));
    }

    #[test]
    fn tier_table_lists_seven_pairs() {
        assert_eq!(TIER_TABLE.len(), 7);
        let listed = |d: ReasoningDepth, c: Complexity| {
            TIER_TABLE.iter().any(|(key, _)| *key == (d, c))
        };
        assert!(!listed(ReasoningDepth::Basic, Complexity::Complex));
        assert!(!listed(ReasoningDepth::Intermediate, Complexity::Complex));
    }

    #[test]
    fn security_refinement() {
        let security = &ROLE_RULES[0].value;
        assert_eq!(security.resolve("network threat"), "network security specialist");
        assert_eq!(security.resolve("cloud threat"), "cloud security architect");
        assert_eq!(security.resolve("threat"), "cybersecurity architect");
    }

    #[test]
    fn label_lookup() {
        assert_eq!(
            lookup(ROLE_BY_QUERY_TYPE, "documentation"),
            Some("technical documentation specialist")
        );
        assert_eq!(lookup(ROLE_BY_QUERY_TYPE, "poetry"), None);
    }
}
