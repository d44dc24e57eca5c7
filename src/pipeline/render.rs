//! PDF rendering: `StructuredReport` → paginated A4 document.
//!
//! Rendering happens in three steps, each a pure function:
//!
//! 1. [`build_story`] turns the report into a flat list of [`Block`]s
//!    (headings, paragraphs, bullets, spacers, page breaks) following the
//!    fixed section order in [`PAGES`];
//! 2. `layout` word-wraps the blocks into positioned lines and paginates
//!    them, starting a new page on overflow or on an explicit break;
//! 3. `write_pdf` emits the lines with lopdf using the built-in Helvetica
//!    and Courier fonts in WinAnsi encoding.
//!
//! Missing or empty fields never fail rendering; they show [`PLACEHOLDER`].

use crate::error::BrdError;
use crate::report::{display_record, display_value, FieldValue, ListItem, StructuredReport};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};
use serde_json::Value;
use tracing::debug;

/// Body text shown for absent or empty sections.
pub const PLACEHOLDER: &str = "Not specified.";

/// Section headings and the report field each one shows, grouped by page.
pub const PAGES: [&[(&str, &str)]; 3] = [
    &[
        ("Executive Summary", "concise_summary"),
        ("Business Objectives", "business_objectives"),
        ("In Scope", "in_scope"),
        ("Out of Scope", "out_of_scope"),
        ("Stakeholders and Roles", "stakeholders_and_roles"),
    ],
    &[
        ("Current Process", "current_process"),
        ("Proposed Process", "proposed_process"),
        ("Functional Requirements", "functional_requirements"),
        ("Non-Functional Requirements", "non_functional_requirements"),
        ("Data Entities", "data_entities"),
        ("System Integrations", "integrations"),
        ("Assumptions", "assumptions"),
        ("Dependencies", "dependencies"),
        ("Risk Assessment", "risks"),
    ],
    &[
        ("Gaps and Open Questions", "gaps_and_questions"),
        ("Process Flow Analysis", "process_flow_analysis"),
        ("Strategic Recommendations", "suggestions"),
        ("Implementation Roadmap", "preferred_steps"),
        ("Acceptance Criteria", "acceptance_criteria"),
        ("Test Scenarios", "test_scenarios"),
        ("Appendix", "appendix"),
    ],
];

// ── Page geometry (points) ───────────────────────────────────────────────

const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;
/// 2 cm.
const MARGIN: f32 = 56.69;
const TEXT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const BULLET_INDENT: f32 = 12.0;
const NESTED_INDENT: f32 = 24.0;

// ── Styles ───────────────────────────────────────────────────────────────

/// The four standard fonts the renderer uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
    Italic,
    Mono,
}

impl Font {
    const ALL: [Font; 4] = [Font::Regular, Font::Bold, Font::Italic, Font::Mono];

    fn resource_name(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
            Font::Italic => "F3",
            Font::Mono => "F4",
        }
    }

    fn base_font(self) -> &'static str {
        match self {
            Font::Regular => "Helvetica",
            Font::Bold => "Helvetica-Bold",
            Font::Italic => "Helvetica-Oblique",
            Font::Mono => "Courier",
        }
    }

    /// Advance width of one WinAnsi byte in thousandths of the font size.
    fn glyph_width(self, byte: u8) -> f32 {
        match self {
            Font::Mono => 600.0,
            // Bold glyphs run roughly 8% wider than regular ones.
            Font::Bold => helvetica_width(byte) * 1.08,
            Font::Regular | Font::Italic => helvetica_width(byte),
        }
    }

    fn text_width(self, text: &[u8], size: f32) -> f32 {
        text.iter().map(|b| self.glyph_width(*b)).sum::<f32>() * size / 1000.0
    }
}

/// Helvetica AFM widths for printable ASCII; other bytes use a typical width.
fn helvetica_width(byte: u8) -> f32 {
    const ASCII: [u16; 95] = [
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
        278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
        278, 278, 278, 469, 556, 333, // '['..'`'
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
        334, 260, 334, 584, // '{'..'~'
    ];
    match byte {
        0x20..=0x7E => f32::from(ASCII[usize::from(byte - 0x20)]),
        0x95 => 350.0,
        0x96 => 556.0,
        0x97 => 1000.0,
        _ => 556.0,
    }
}

/// Typography of one block kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub font: Font,
    pub size: f32,
    pub leading: f32,
    pub space_before: f32,
    pub space_after: f32,
}

pub const TITLE: Style = Style {
    font: Font::Bold,
    size: 18.0,
    leading: 22.0,
    space_before: 0.0,
    space_after: 12.0,
};

pub const HEADING: Style = Style {
    font: Font::Bold,
    size: 14.0,
    leading: 18.0,
    space_before: 10.0,
    space_after: 6.0,
};

pub const SUB_HEADING: Style = Style {
    font: Font::Bold,
    size: 11.0,
    leading: 14.0,
    space_before: 4.0,
    space_after: 2.0,
};

pub const BODY: Style = Style {
    font: Font::Regular,
    size: 10.0,
    leading: 13.0,
    space_before: 0.0,
    space_after: 3.0,
};

pub const PLACEHOLDER_STYLE: Style = Style {
    font: Font::Italic,
    ..BODY
};

pub const RECORD_ITEM: Style = Style {
    font: Font::Mono,
    size: 9.0,
    leading: 11.0,
    space_before: 0.0,
    space_after: 3.0,
};

// ── Story ────────────────────────────────────────────────────────────────

/// One unit of the document flow.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph {
        text: String,
        style: Style,
        indent: f32,
        bullet: bool,
    },
    Spacer(f32),
    PageBreak,
}

impl Block {
    fn para(text: impl Into<String>, style: Style) -> Self {
        Block::Paragraph {
            text: text.into(),
            style,
            indent: 0.0,
            bullet: false,
        }
    }

    fn bullet(text: impl Into<String>, style: Style, indent: f32) -> Self {
        Block::Paragraph {
            text: text.into(),
            style,
            indent,
            bullet: true,
        }
    }

    /// Paragraph text, if this block is a paragraph.
    pub fn text(&self) -> Option<&str> {
        match self {
            Block::Paragraph { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// Lay the report out as a flat story in the fixed section order.
pub fn build_story(report: &StructuredReport) -> Vec<Block> {
    let mut story = vec![Block::para(report.title(), TITLE)];
    for (i, sections) in PAGES.iter().enumerate() {
        if i > 0 {
            story.push(Block::PageBreak);
        }
        for (heading, field) in sections.iter() {
            section(&mut story, heading, report.field(field));
        }
    }
    story
}

fn section(story: &mut Vec<Block>, heading: &str, value: FieldValue<'_>) {
    story.push(Block::para(heading, HEADING));
    if value.is_empty() {
        story.push(Block::para(PLACEHOLDER, PLACEHOLDER_STYLE));
        story.push(Block::Spacer(6.0));
        return;
    }
    match value {
        FieldValue::Text(text) => story.push(Block::para(text.trim(), BODY)),
        FieldValue::List(items) => {
            for item in items {
                story.push(match item {
                    ListItem::Text(text) => Block::bullet(text.trim(), BODY, BULLET_INDENT),
                    ListItem::Record(map) => {
                        Block::bullet(display_record(map), RECORD_ITEM, BULLET_INDENT)
                    }
                    ListItem::Scalar(v) => Block::bullet(display_value(v), BODY, BULLET_INDENT),
                });
            }
        }
        FieldValue::Record(map) => {
            for (key, v) in map {
                match v {
                    Value::Array(items) => {
                        story.push(Block::para(humanize_key(key), SUB_HEADING));
                        let mut any = false;
                        for item in items.iter().map(display_value).filter(|s| !s.trim().is_empty()) {
                            story.push(Block::bullet(item, BODY, NESTED_INDENT));
                            any = true;
                        }
                        if !any {
                            story.push(Block::Paragraph {
                                text: PLACEHOLDER.to_string(),
                                style: PLACEHOLDER_STYLE,
                                indent: NESTED_INDENT,
                                bullet: false,
                            });
                        }
                    }
                    other => story.push(Block::para(
                        format!("{}: {}", humanize_key(key), display_value(other)),
                        BODY,
                    )),
                }
            }
        }
        FieldValue::Scalar(v) => story.push(Block::para(display_value(v), BODY)),
        FieldValue::Missing => {}
    }
    story.push(Block::Spacer(6.0));
}

/// `extracted_keywords` → `Extracted Keywords`.
fn humanize_key(key: &str) -> String {
    key.split(['_', '-', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Text encoding ────────────────────────────────────────────────────────

/// Encode text as WinAnsi bytes for the standard fonts.
///
/// Tabs become spaces, other control characters are dropped and characters
/// outside the code page become `?`. PDF string delimiters are escaped by
/// the writer, so `(`, `)` and `\` pass through unchanged.
pub fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .filter_map(|c| match c {
            '\t' => Some(b' '),
            c if c.is_control() => None,
            ' '..='~' => Some(c as u8),
            '\u{A0}'..='\u{FF}' => Some(c as u32 as u8),
            _ => Some(win_ansi_special(c).unwrap_or(b'?')),
        })
        .collect()
}

fn win_ansi_special(c: char) -> Option<u8> {
    let byte = match c {
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => return None,
    };
    Some(byte)
}

/// Split text into explicit lines, then word-wrap each to `max_width`.
fn wrap(text: &str, font: Font, size: f32, max_width: f32) -> Vec<Vec<u8>> {
    let mut lines = Vec::new();
    for raw_line in text.replace("\r\n", "\n").replace('\r', "\n").split('\n') {
        let encoded = to_win_ansi(raw_line);
        let mut current: Vec<u8> = Vec::new();
        for word in encoded.split(|b| *b == b' ').filter(|w| !w.is_empty()) {
            let candidate_width = if current.is_empty() {
                font.text_width(word, size)
            } else {
                font.text_width(&current, size) + font.text_width(b" ", size) + font.text_width(word, size)
            };
            if candidate_width <= max_width {
                if !current.is_empty() {
                    current.push(b' ');
                }
                current.extend_from_slice(word);
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            // Hard-break words wider than the line.
            for &b in word {
                if !current.is_empty()
                    && font.text_width(&current, size) + font.glyph_width(b) * size / 1000.0 > max_width
                {
                    lines.push(std::mem::take(&mut current));
                }
                current.push(b);
            }
        }
        lines.push(current);
    }
    lines
}

// ── Layout ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
struct PlacedLine {
    x: f32,
    y: f32,
    font: Font,
    size: f32,
    text: Vec<u8>,
}

struct Layout {
    pages: Vec<Vec<PlacedLine>>,
    cursor: f32,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            cursor: PAGE_HEIGHT - MARGIN,
        }
    }

    fn current_is_empty(&self) -> bool {
        self.pages.last().map_or(true, |p| p.is_empty())
    }

    fn new_page(&mut self) {
        self.pages.push(Vec::new());
        self.cursor = PAGE_HEIGHT - MARGIN;
    }

    fn place(&mut self, line: Vec<u8>, x: f32, style: &Style) {
        if self.cursor - style.leading < MARGIN && !self.current_is_empty() {
            self.new_page();
        }
        self.cursor -= style.leading;
        let y = self.cursor + (style.leading - style.size);
        if let Some(page) = self.pages.last_mut() {
            page.push(PlacedLine {
                x,
                y,
                font: style.font,
                size: style.size,
                text: line,
            });
        }
    }

    fn skip(&mut self, amount: f32) {
        if !self.current_is_empty() {
            self.cursor -= amount;
        }
    }
}

fn layout(story: &[Block]) -> Vec<Vec<PlacedLine>> {
    let mut l = Layout::new();
    for block in story {
        match block {
            Block::PageBreak => {
                if !l.current_is_empty() {
                    l.new_page();
                }
            }
            Block::Spacer(h) => l.skip(*h),
            Block::Paragraph {
                text,
                style,
                indent,
                bullet,
            } => {
                l.skip(style.space_before);
                let left = MARGIN + indent;
                let marker = if *bullet { "\u{2022} " } else { "" };
                let marker_width = style.font.text_width(&to_win_ansi(marker), style.size);
                let width = (TEXT_WIDTH - indent - marker_width).max(style.size * 4.0);
                for (i, mut line) in wrap(text, style.font, style.size, width)
                    .into_iter()
                    .enumerate()
                {
                    let x = if *bullet && i == 0 {
                        let mut with_marker = to_win_ansi(marker);
                        with_marker.append(&mut line);
                        line = with_marker;
                        left
                    } else {
                        left + marker_width
                    };
                    l.place(line, x, style);
                }
                l.skip(style.space_after);
            }
        }
    }
    l.pages
}

// ── PDF writer ───────────────────────────────────────────────────────────

/// Render the report as PDF bytes.
pub fn render_pdf(report: &StructuredReport) -> Result<Vec<u8>, BrdError> {
    let story = build_story(report);
    let pages = layout(&story);
    debug!("Laid out {} blocks on {} pages", story.len(), pages.len());
    write_pdf(report.title(), &pages)
}

fn write_pdf(title: &str, pages: &[Vec<PlacedLine>]) -> Result<Vec<u8>, BrdError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut fonts = lopdf::Dictionary::new();
    for font in Font::ALL {
        let id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(font.resource_name(), id);
    }
    let resources_id = doc.add_object(dictionary! { "Font" => fonts });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for lines in pages {
        let page_id = write_page(&mut doc, pages_id, lines)?;
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => text_string(title),
        "Producer" => Object::string_literal(concat!("brd-analyzer ", env!("CARGO_PKG_VERSION"))),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf)
        .map_err(|e| BrdError::RenderFailed(e.to_string()))?;
    Ok(buf)
}

fn write_page(
    doc: &mut Document,
    parent: ObjectId,
    lines: &[PlacedLine],
) -> Result<ObjectId, BrdError> {
    let mut operations = Vec::with_capacity(lines.len() * 5);
    for line in lines {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![line.font.resource_name().into(), line.size.into()],
        ));
        operations.push(Operation::new("Td", vec![line.x.into(), line.y.into()]));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(line.text.clone(), StringFormat::Literal)],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    let content = Content { operations }
        .encode()
        .map_err(|e| BrdError::RenderFailed(e.to_string()))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, content));
    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => parent,
        "Contents" => content_id,
    }))
}

/// PDF text string: literal when ASCII, UTF-16BE with BOM otherwise.
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extract::{extract_text, DocumentKind};
    use serde_json::json;

    fn report(v: Value) -> StructuredReport {
        match v {
            Value::Object(map) => StructuredReport::from_map(map),
            _ => panic!("fixture must be an object"),
        }
    }

    fn texts(story: &[Block]) -> Vec<&str> {
        story.iter().filter_map(Block::text).collect()
    }

    /// Text of the block right after a section heading.
    fn first_body<'a>(story: &'a [Block], heading: &str) -> &'a str {
        let t = texts(story);
        let pos = t.iter().position(|s| *s == heading).expect("heading present");
        t[pos + 1]
    }

    #[test]
    fn story_follows_fixed_section_order() {
        let story = build_story(&report(json!({"title": "Invoicing"})));
        let t = texts(&story);
        assert_eq!(t[0], "Invoicing");
        let order: Vec<&str> = PAGES.iter().flat_map(|p| p.iter().map(|(h, _)| *h)).collect();
        let positions: Vec<usize> = order
            .iter()
            .map(|h| t.iter().position(|s| s == h).expect("heading"))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(
            story.iter().filter(|b| **b == Block::PageBreak).count(),
            2
        );
    }

    #[test]
    fn missing_risks_render_placeholder() {
        let story = build_story(&report(json!({"title": "T", "assumptions": ["A1"]})));
        assert_eq!(first_body(&story, "Risk Assessment"), PLACEHOLDER);
        assert_eq!(first_body(&story, "Assumptions"), "A1");
    }

    #[test]
    fn empty_values_render_placeholder() {
        let story = build_story(&report(json!({
            "concise_summary": "  ",
            "in_scope": [],
            "appendix": {}
        })));
        assert_eq!(first_body(&story, "Executive Summary"), PLACEHOLDER);
        assert_eq!(first_body(&story, "In Scope"), PLACEHOLDER);
        assert_eq!(first_body(&story, "Appendix"), PLACEHOLDER);
    }

    #[test]
    fn blank_list_items_render_placeholder() {
        let story = build_story(&report(json!({
            "in_scope": ["  ", ""],
            "out_of_scope": ["", "Payroll", "\t"]
        })));
        assert_eq!(first_body(&story, "In Scope"), PLACEHOLDER);
        assert_eq!(first_body(&story, "Out of Scope"), "Payroll");
        assert!(!texts(&story).contains(&""));
    }

    #[test]
    fn list_items_become_bullets() {
        let story = build_story(&report(json!({
            "in_scope": ["Invoice capture", "Approval routing"]
        })));
        let bullets: Vec<_> = story
            .iter()
            .filter(|b| matches!(b, Block::Paragraph { bullet: true, .. }))
            .filter_map(Block::text)
            .collect();
        assert_eq!(bullets, vec!["Invoice capture", "Approval routing"]);
    }

    #[test]
    fn record_items_join_key_value_pairs() {
        let story = build_story(&report(json!({
            "stakeholders_and_roles": [
                {"role": "Finance", "responsibilities": ["approve", "audit"]}
            ]
        })));
        assert_eq!(
            first_body(&story, "Stakeholders and Roles"),
            "role: Finance; responsibilities: approve, audit"
        );
    }

    #[test]
    fn mapping_renders_sub_headings_and_nested_bullets() {
        let story = build_story(&report(json!({
            "appendix": {
                "extracted_keywords": ["invoice", "ERP"],
                "version": 2
            }
        })));
        let t = texts(&story);
        let pos = t.iter().position(|s| *s == "Appendix").unwrap();
        assert_eq!(&t[pos + 1..pos + 5], &["Extracted Keywords", "invoice", "ERP", "Version: 2"]);
    }

    #[test]
    fn win_ansi_maps_typography() {
        assert_eq!(to_win_ansi("a\u{2022}b"), vec![b'a', 0x95, b'b']);
        assert_eq!(to_win_ansi("caf\u{e9}"), b"caf\xe9".to_vec());
        assert_eq!(to_win_ansi("\u{4e2d}"), b"?".to_vec());
        assert_eq!(to_win_ansi("a\tb\u{7}"), b"a b".to_vec());
    }

    #[test]
    fn wrap_respects_width_and_explicit_breaks() {
        let text = "word ".repeat(200) + "\nsecond line";
        let lines = wrap(&text, Font::Regular, 10.0, TEXT_WIDTH);
        assert!(lines.len() > 3);
        for line in &lines {
            assert!(Font::Regular.text_width(line, 10.0) <= TEXT_WIDTH + 0.01);
        }
        assert_eq!(lines.last().unwrap(), b"second line");
    }

    #[test]
    fn wrap_breaks_overlong_words() {
        let lines = wrap(&"x".repeat(500), Font::Mono, 9.0, 100.0);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| Font::Mono.text_width(l, 9.0) <= 100.0 + 0.01));
    }

    #[test]
    fn humanize_key_title_cases_words() {
        assert_eq!(humanize_key("extracted_keywords"), "Extracted Keywords");
        assert_eq!(humanize_key("glossary"), "Glossary");
    }

    #[test]
    fn long_lists_overflow_onto_more_pages() {
        let many: Vec<String> = (1..=120).map(|i| format!("FR-{i}: Requirement {i} [Must]")).collect();
        let story = build_story(&report(json!({"functional_requirements": many})));
        let pages = layout(&story);
        assert!(pages.len() > 3, "got {} pages", pages.len());
        for page in &pages {
            for line in page {
                assert!(line.y >= MARGIN - 0.01 && line.y <= PAGE_HEIGHT - MARGIN);
            }
        }
    }

    #[test]
    fn rendered_pdf_is_readable() {
        let r = report(json!({
            "title": "Invoicing Automation",
            "concise_summary": "R&D <core> (phase 1)\nwith a second line",
            "in_scope": ["Invoice capture"]
        }));
        let bytes = render_pdf(&r).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);

        let text = extract_text(&bytes, DocumentKind::Pdf).unwrap();
        assert!(text.contains("Invoicing Automation"), "got: {text}");
        assert!(text.contains("R&D <core> (phase 1)"), "got: {text}");
        assert!(text.contains(PLACEHOLDER), "got: {text}");
    }

    #[test]
    fn report_without_any_fields_still_renders() {
        let bytes = render_pdf(&StructuredReport::default()).unwrap();
        let text = extract_text(&bytes, DocumentKind::Pdf).unwrap();
        assert!(text.contains(crate::report::DEFAULT_TITLE));
    }

    #[test]
    fn non_ascii_title_uses_utf16() {
        match text_string("Überblick") {
            Object::String(bytes, StringFormat::Hexadecimal) => {
                assert_eq!(&bytes[..2], &[0xFE, 0xFF]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
