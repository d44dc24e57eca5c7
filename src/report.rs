//! The Structured Report: schema, normalisation and typed views.
//!
//! The model answers with loosely-typed JSON, so the report is stored as the
//! JSON object it arrived as and only interpreted when it is read. Every
//! read goes through [`FieldValue`], a tagged union of the shapes a field
//! may take, so a renderer can never trip over an unexpected type.
//!
//! [`SCHEMA`] is the single list of fields. The prompt describes it to the
//! model, [`StructuredReport::normalize`] guarantees each entry exists, and
//! the PDF renderer lays the sections out from it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Title used when the model did not supply one.
pub const DEFAULT_TITLE: &str = "BRD Analysis Report";

/// Expected top-level shape of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A single string (`""` when empty).
    Text,
    /// An ordered sequence (`[]` when empty).
    List,
    /// A mapping of sub-sections (`{}` when empty).
    Record,
}

impl FieldKind {
    /// The value inserted for a missing field.
    pub fn empty_value(self) -> Value {
        match self {
            FieldKind::Text => Value::String(String::new()),
            FieldKind::List => Value::Array(Vec::new()),
            FieldKind::Record => Value::Object(Map::new()),
        }
    }
}

/// One field of the requested report schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    /// JSON fragment describing the expected value, embedded in the prompt.
    pub shape: &'static str,
}

const fn field(name: &'static str, kind: FieldKind, shape: &'static str) -> FieldSpec {
    FieldSpec { name, kind, shape }
}

/// Every field the model is asked to produce, in prompt order.
///
/// List items are flat strings; structured facts such as ids, priorities or
/// impact ratings are carried inside the string.
pub const SCHEMA: &[FieldSpec] = &[
    field("title", FieldKind::Text, r#""string""#),
    field(
        "concise_summary",
        FieldKind::Text,
        r#""string (150-250 words of flowing prose, no bullets)""#,
    ),
    field("business_objectives", FieldKind::List, r#"["string"]"#),
    field("in_scope", FieldKind::List, r#"["string"]"#),
    field("out_of_scope", FieldKind::List, r#"["string"]"#),
    field(
        "stakeholders_and_roles",
        FieldKind::List,
        r#"["<Role>: <responsibilities>"]"#,
    ),
    field(
        "current_process",
        FieldKind::List,
        r#"["string (one step per item, in order)"]"#,
    ),
    field(
        "proposed_process",
        FieldKind::List,
        r#"["string (one step per item, in order)"]"#,
    ),
    field(
        "functional_requirements",
        FieldKind::List,
        r#"["FR-<n>: <requirement> [Must|Should|Could]"]"#,
    ),
    field(
        "non_functional_requirements",
        FieldKind::List,
        r#"["NFR-<n>: <requirement>"]"#,
    ),
    field("data_entities", FieldKind::List, r#"["<Entity>: <notes>"]"#),
    field(
        "integrations",
        FieldKind::List,
        r#"["<System> (inbound|outbound|both): <notes>"]"#,
    ),
    field("assumptions", FieldKind::List, r#"["string"]"#),
    field("dependencies", FieldKind::List, r#"["string"]"#),
    field(
        "risks",
        FieldKind::List,
        r#"["<risk> [Impact: Low|Medium|High] Mitigation: <mitigation>"]"#,
    ),
    field("gaps_and_questions", FieldKind::List, r#"["string"]"#),
    field(
        "process_flow_analysis",
        FieldKind::List,
        r#"["string (describe swimlanes, hand-offs and bottlenecks of the flow)"]"#,
    ),
    field("suggestions", FieldKind::List, r#"["string"]"#),
    field(
        "preferred_steps",
        FieldKind::List,
        r#"["string (step-by-step implementation plan)"]"#,
    ),
    field("acceptance_criteria", FieldKind::List, r#"["string"]"#),
    field("test_scenarios", FieldKind::List, r#"["string"]"#),
    field(
        "appendix",
        FieldKind::Record,
        r#"{"extracted_keywords": ["string"], "glossary": ["<Term>: <definition>"]}"#,
    ),
];

/// The normalised business-requirements analysis for one document.
///
/// Serialises to exactly the JSON object it holds, so the `json` output
/// mode is a plain passthrough.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructuredReport {
    fields: Map<String, Value>,
}

impl StructuredReport {
    /// Wrap a JSON object produced by the model.
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Insert every missing (or `null`) schema field with its empty value.
    ///
    /// Existing values are never altered and unknown keys are kept.
    /// Returns the names of the fields that had to be filled in.
    pub fn normalize(&mut self) -> Vec<&'static str> {
        let mut filled = Vec::new();
        for spec in SCHEMA {
            let absent = matches!(self.fields.get(spec.name), None | Some(Value::Null));
            if absent {
                self.fields
                    .insert(spec.name.to_string(), spec.kind.empty_value());
                filled.push(spec.name);
            }
        }
        filled
    }

    /// The report title, or [`DEFAULT_TITLE`] when absent or blank.
    pub fn title(&self) -> &str {
        match self.fields.get("title") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim(),
            _ => DEFAULT_TITLE,
        }
    }

    /// Typed view of one field.
    pub fn field(&self, name: &str) -> FieldValue<'_> {
        FieldValue::classify(self.fields.get(name))
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }
}

/// Shape of a report field as found at read time.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    /// Key absent or `null`.
    Missing,
    Text(&'a str),
    List(Vec<ListItem<'a>>),
    Record(&'a Map<String, Value>),
    /// Number, boolean or any other scalar.
    Scalar(&'a Value),
}

/// One element of a list-shaped field.
#[derive(Debug, Clone, PartialEq)]
pub enum ListItem<'a> {
    Text(&'a str),
    Record(&'a Map<String, Value>),
    Scalar(&'a Value),
}

impl<'a> FieldValue<'a> {
    pub fn classify(value: Option<&'a Value>) -> Self {
        match value {
            None | Some(Value::Null) => FieldValue::Missing,
            Some(Value::String(s)) => FieldValue::Text(s),
            Some(Value::Array(items)) => FieldValue::List(
                items
                    .iter()
                    .filter(|v| !is_blank(v))
                    .map(ListItem::classify)
                    .collect(),
            ),
            Some(Value::Object(map)) => FieldValue::Record(map),
            Some(other) => FieldValue::Scalar(other),
        }
    }

    /// True when the field should render as the placeholder.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Missing => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Record(map) => map.is_empty(),
            FieldValue::Scalar(_) => false,
        }
    }
}

/// `null` and whitespace-only strings carry nothing to render.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

impl<'a> ListItem<'a> {
    fn classify(value: &'a Value) -> Self {
        match value {
            Value::String(s) => ListItem::Text(s),
            Value::Object(map) => ListItem::Record(map),
            other => ListItem::Scalar(other),
        }
    }
}

/// Flatten any JSON value into display text.
///
/// Sequences are joined with `", "`, mappings become `key: value` pairs
/// joined with `"; "`.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) => display_record(map),
        other => other.to_string(),
    }
}

/// `key: value` pairs of a mapping joined with `"; "`.
pub fn display_record(map: &Map<String, Value>) -> String {
    map.iter()
        .map(|(k, v)| format!("{}: {}", k, display_value(v)))
        .collect::<Vec<_>>()
        .join("; ")
}
