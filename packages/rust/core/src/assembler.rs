//! Document assembler.
//!
//! Takes the six rendered section blocks and wraps them in the fixed
//! C.R.E.A.T.E. document layout: one `#` title, six `##` headings in order,
//! then the usage note and attribution footer.

use tracing::{debug, instrument};

use promptcraft_shared::{PromptCraftError, Result};

/// Document title line.
pub const DOCUMENT_TITLE: &str = "# C.R.E.A.T.E. Framework Enhanced Prompt";

/// The six section headings, in document order.
pub const SECTION_HEADINGS: [&str; 6] = [
    "C - Context (Role, Background, Goal)",
    "R - Request (Task, Format, Depth, Action Verbs)",
    "E - Examples (Few-Shot Prompting)",
    "A - Augmentations (Frameworks, Evidence, Reasoning)",
    "T - Tone & Format (Voice, Style, Structure)",
    "E - Evaluation (Quality Assurance, Verification)",
];

const USAGE_NOTE: &str = "**Instructions for Use**: Copy this entire C.R.E.A.T.E. framework prompt and provide it to your AI assistant to receive a comprehensive, well-structured response that meets professional standards.";

const ATTRIBUTION: &str = "*This CREATE framework prompt was generated by PromptCraft to ensure high-quality, reliable AI outputs with minimal hallucinations and appropriate sourcing for independent validation.*";

/// Rendered blocks, one per template slot.
#[derive(Debug, Clone)]
pub struct Sections {
    pub context: String,
    pub request: String,
    pub examples: String,
    pub augmentations: String,
    pub tone_format: String,
    pub evaluation: String,
}

impl Sections {
    fn in_order(&self) -> [&str; 6] {
        [
            self.context.as_str(),
            self.request.as_str(),
            self.examples.as_str(),
            self.augmentations.as_str(),
            self.tone_format.as_str(),
            self.evaluation.as_str(),
        ]
    }
}

/// Assemble the final document.
///
/// Fails only if a block is blank, which would leave a heading with no body.
#[instrument(skip_all)]
pub fn assemble(sections: &Sections) -> Result<String> {
    let blocks = sections.in_order();

    if let Some(i) = blocks.iter().position(|b| b.trim().is_empty()) {
        return Err(PromptCraftError::generation(format!(
            "section '{}' rendered empty",
            SECTION_HEADINGS[i]
        )));
    }

    let capacity = blocks.iter().map(|b| b.len() + 64).sum::<usize>() + 512;
    let mut doc = String::with_capacity(capacity);
    doc.push_str(DOCUMENT_TITLE);
    doc.push('\n');
    for (heading, block) in SECTION_HEADINGS.iter().zip(blocks) {
        doc.push_str("\n## ");
        doc.push_str(heading);
        doc.push('\n');
        doc.push_str(block);
        doc.push('\n');
    }
    doc.push_str("\n---\n\n");
    doc.push_str(USAGE_NOTE);
    doc.push_str("\n\n");
    doc.push_str(ATTRIBUTION);

    debug!(bytes = doc.len(), "document assembled");
    Ok(doc)
}

/// Split a document into `(heading, body)` pairs for each `##` section.
///
/// Bodies are trimmed. The trailing usage note after `---` is not part of
/// the last section.
pub fn split_sections(document: &str) -> Vec<(&str, &str)> {
    let body_end = document.rfind("\n---\n").unwrap_or(document.len());
    let body = &document[..body_end];

    let mut out = Vec::new();
    let mut rest = body;
    while let Some(start) = find_heading(rest) {
        let after = &rest[start + 3..];
        let line_end = after.find('\n').unwrap_or(after.len());
        let heading = after[..line_end].trim();
        let content = &after[line_end..];
        let next = find_heading(content).unwrap_or(content.len());
        out.push((heading, content[..next].trim()));
        rest = &content[next..];
    }
    out
}

/// Byte offset of the next `## ` heading at the start of a line.
fn find_heading(text: &str) -> Option<usize> {
    if text.starts_with("## ") {
        return Some(0);
    }
    text.find("\n## ").map(|i| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Sections {
        Sections {
            context: "ctx".into(),
            request: "req".into(),
            examples: "ex".into(),
            augmentations: "aug".into(),
            tone_format: "tone".into(),
            evaluation: "eval".into(),
        }
    }

    #[test]
    fn layout_is_fixed() {
        let doc = assemble(&sample()).expect("assemble");
        assert!(doc.starts_with("# C.R.E.A.T.E. Framework Enhanced Prompt\n\n## C - Context"));
        assert!(doc.contains("## C - Context (Role, Background, Goal)\nctx\n\n## R - Request"));
        assert!(doc.contains("eval\n\n---\n\n**Instructions for Use**"));
        assert!(doc.ends_with("independent validation.*"));
    }

    #[test]
    fn headings_in_order() {
        let doc = assemble(&sample()).expect("assemble");
        let parsed = split_sections(&doc);
        let headings: Vec<&str> = parsed.iter().map(|(h, _)| *h).collect();
        assert_eq!(headings, SECTION_HEADINGS);
        assert_eq!(parsed[5].1, "eval");
    }

    #[test]
    fn blank_section_is_a_generation_error() {
        let mut sections = sample();
        sections.augmentations = "  \n".into();
        let err = assemble(&sections).unwrap_err();
        assert!(matches!(err, PromptCraftError::Generation(_)));
        assert!(err.to_string().contains("A - Augmentations"));
    }

    #[test]
    fn deterministic() {
        assert_eq!(
            assemble(&sample()).expect("first"),
            assemble(&sample()).expect("second")
        );
    }
}
