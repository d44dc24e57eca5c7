//! Prompts for LLM-based BRD analysis.
//!
//! Every prompt the service sends lives here so that tests can inspect them
//! without a live model. The schema part of the user prompt is generated from
//! [`crate::report::SCHEMA`], so adding a report field updates the prompt too.

use crate::report::SCHEMA;

/// System instruction framing the model as a business analyst.
pub const SYSTEM_PROMPT: &str = "You are a senior business analyst producing an enterprise-grade \
Business Requirements Document (BRD) analysis of the document you are given. \
Write in a clear, professional register suitable for executives and delivery teams. \
Your output MUST be a single valid JSON object and nothing else, following the schema in the user message exactly.";

/// Authoring rules appended after the schema.
pub const AUTHORING_RULES: &str = "\
- Every key of the schema must be present; use an empty array or empty string when nothing applies.
- concise_summary is flowing prose (150-250 words), never bullets.
- Include at least 18 functional requirements and at least 10 test scenarios when the material allows.
- Each functional requirement starts with its id (FR-1, FR-2, ...) and ends with its priority in brackets: [Must], [Should] or [Could].
- Each non-functional requirement starts with its id (NFR-1, NFR-2, ...).
- Keep list items short and specific; one fact per item.
- If details are missing, infer carefully and record the open point in gaps_and_questions.
- Describe the suggested swimlane/flow diagrams in process_flow_analysis.
- Do not mention that you are an AI, do not add disclaimers, and do not wrap the JSON in Markdown fences.";

/// Render the schema as a JSON-like object listing every field and its shape.
pub fn schema_description() -> String {
    let body = SCHEMA
        .iter()
        .map(|f| format!("  \"{}\": {}", f.name, f.shape))
        .collect::<Vec<_>>()
        .join(",\n");
    format!("{{\n{}\n}}", body)
}

/// Truncate `text` to at most `max_chars` characters on a char boundary.
///
/// Returns the (possibly shortened) text and whether anything was cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => (&text[..byte_idx], true),
        None => (text, false),
    }
}

/// Build the user message: schema, rules, then the (truncated) document.
pub fn build_user_prompt(document_text: &str, max_chars: usize) -> String {
    let (text, _) = truncate_chars(document_text, max_chars);
    format!(
        "Analyze the following BRD / process document and produce a structured report worth at least two pages.\n\n\
Return JSON only, matching this schema exactly (keys must exist, arrays can be empty):\n\
{schema}\n\n\
Rules:\n\
{rules}\n\n\
DOCUMENT CONTENT:\n\
\"\"\"\n{text}\n\"\"\"",
        schema = schema_description(),
        rules = AUTHORING_RULES,
        text = text,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_lists_every_field() {
        let schema = schema_description();
        for f in SCHEMA {
            assert!(
                schema.contains(&format!("\"{}\":", f.name)),
                "schema missing {}",
                f.name
            );
        }
        assert!(schema.starts_with('{') && schema.ends_with('}'));
    }

    #[test]
    fn functional_requirement_format_is_described() {
        let schema = schema_description();
        assert!(schema.contains("FR-<n>"));
        assert!(schema.contains("[Must|Should|Could]"));
        assert!(AUTHORING_RULES.contains("[Must]"));
    }

    #[test]
    fn system_prompt_demands_json() {
        assert!(SYSTEM_PROMPT.contains("JSON"));
        assert!(SYSTEM_PROMPT.contains("business analyst"));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let (t, cut) = truncate_chars("héllo wörld", 4);
        assert_eq!(t, "héll");
        assert!(cut);
        let (t, cut) = truncate_chars("short", 100);
        assert_eq!(t, "short");
        assert!(!cut);
    }

    #[test]
    fn user_prompt_embeds_truncated_document() {
        let doc = "A".repeat(50) + "TAIL";
        let prompt = build_user_prompt(&doc, 50);
        assert!(prompt.contains(&"A".repeat(50)));
        assert!(!prompt.contains("TAIL"));
        assert!(prompt.contains("DOCUMENT CONTENT:"));
        assert!(prompt.contains("at least 18 functional requirements"));
    }
}
