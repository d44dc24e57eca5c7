//! Text extraction: PDF or DOCX bytes → one plain-text string.
//!
//! Both strategies read from an in-memory buffer; nothing touches the file
//! system. Parsing is CPU-bound, so async callers go through [`extract`],
//! which moves the work onto the blocking pool.

use crate::error::BrdError;
use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use std::fmt;
use tracing::{debug, warn};

/// Document formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Select the format from a filename's extension (case-insensitive).
    ///
    /// The extension is whatever follows the last `.`; a name without a dot
    /// has no extension and is rejected.
    pub fn from_filename(filename: &str) -> Result<Self, BrdError> {
        let ext = match filename.rsplit_once('.') {
            Some((_, ext)) => ext.to_ascii_lowercase(),
            None => String::new(),
        };
        match ext.as_str() {
            "pdf" => Ok(DocumentKind::Pdf),
            "docx" => Ok(DocumentKind::Docx),
            _ => Err(BrdError::UnsupportedFormat {
                filename: filename.to_string(),
            }),
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Pdf => f.write_str("PDF"),
            DocumentKind::Docx => f.write_str("DOCX"),
        }
    }
}

/// Extract text on the blocking pool.
pub async fn extract(data: Vec<u8>, kind: DocumentKind) -> Result<String, BrdError> {
    tokio::task::spawn_blocking(move || extract_text(&data, kind))
        .await
        .map_err(|e| BrdError::Internal(format!("extraction task panicked: {e}")))?
}

/// Extract the trimmed plain text of a document; `""` when it holds no text.
pub fn extract_text(data: &[u8], kind: DocumentKind) -> Result<String, BrdError> {
    let text = match kind {
        DocumentKind::Pdf => extract_pdf(data)?,
        DocumentKind::Docx => extract_docx(data)?,
    };
    debug!("Extracted {} chars from {} document", text.len(), kind);
    Ok(text)
}

/// Per-page text joined by a blank line; blank pages are dropped.
fn extract_pdf(data: &[u8]) -> Result<String, BrdError> {
    let doc = lopdf::Document::load_mem(data).map_err(|e| BrdError::DocumentParse {
        kind: DocumentKind::Pdf,
        detail: e.to_string(),
    })?;

    let mut parts = Vec::new();
    for page_num in doc.get_pages().keys() {
        match doc.extract_text(&[*page_num]) {
            Ok(text) if !text.trim().is_empty() => parts.push(text.trim_end().to_string()),
            Ok(_) => debug!("Page {}: no text", page_num),
            Err(e) => warn!("Page {}: text extraction failed: {}", page_num, e),
        }
    }

    Ok(parts.join("\n\n").trim().to_string())
}

/// Top-level paragraphs joined by a newline; blank paragraphs are dropped.
fn extract_docx(data: &[u8]) -> Result<String, BrdError> {
    let docx = docx_rs::read_docx(data).map_err(|e| BrdError::DocumentParse {
        kind: DocumentKind::Docx,
        detail: e.to_string(),
    })?;

    let parts: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(&para.children)),
            _ => None,
        })
        .filter(|text| !text.trim().is_empty())
        .collect();

    Ok(parts.join("\n").trim().to_string())
}

fn paragraph_text(children: &[ParagraphChild]) -> String {
    let mut out = String::new();
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for rc in &run.children {
                    match rc {
                        RunChild::Text(t) => out.push_str(&t.text),
                        RunChild::Tab(_) => out.push('\t'),
                        RunChild::Break(_) => out.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => out.push_str(&paragraph_text(&link.children)),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Paragraph, Run};
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};
    use std::io::Cursor;

    fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
        let mut docx = Docx::new();
        for p in paragraphs {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*p)));
        }
        let mut cursor = Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).expect("pack docx");
        cursor.into_inner()
    }

    /// Minimal PDF with one Helvetica text line per page (`""` = blank page).
    fn pdf_bytes(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let ops = if text.is_empty() {
                Vec::new()
            } else {
                vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ]
            };
            let content = Content { operations: ops };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().expect("encode")));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
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
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        let mut buf = Vec::new();
        doc.save_to(&mut buf).expect("save pdf");
        buf
    }

    #[test]
    fn kind_from_filename_is_case_insensitive() {
        assert_eq!(DocumentKind::from_filename("a.PDF").unwrap(), DocumentKind::Pdf);
        assert_eq!(
            DocumentKind::from_filename("spec.v2.Docx").unwrap(),
            DocumentKind::Docx
        );
    }

    #[test]
    fn kind_rejects_other_extensions() {
        for name in ["notes.txt", "legacy.doc", "pdf", "archive.pdf.zip", ""] {
            assert!(
                matches!(
                    DocumentKind::from_filename(name),
                    Err(BrdError::UnsupportedFormat { .. })
                ),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn docx_paragraphs_joined_in_order() {
        let data = docx_bytes(&["First requirement.", "   ", "", "Second requirement."]);
        let text = extract_text(&data, DocumentKind::Docx).unwrap();
        assert_eq!(text, "First requirement.\nSecond requirement.");
    }

    #[test]
    fn docx_without_text_yields_empty_string() {
        let data = docx_bytes(&["  "]);
        assert_eq!(extract_text(&data, DocumentKind::Docx).unwrap(), "");
    }

    #[test]
    fn corrupt_docx_is_a_parse_error() {
        let err = extract_text(b"definitely not a zip", DocumentKind::Docx).unwrap_err();
        assert!(matches!(
            err,
            BrdError::DocumentParse {
                kind: DocumentKind::Docx,
                ..
            }
        ));
    }

    #[test]
    fn pdf_pages_joined_and_blank_pages_skipped() {
        let data = pdf_bytes(&["Alpha page", "", "Omega page"]);
        let text = extract_text(&data, DocumentKind::Pdf).unwrap();
        assert!(text.starts_with("Alpha page"), "got: {text:?}");
        assert!(text.ends_with("Omega page"), "got: {text:?}");
        assert!(text.contains("\n\n"));
        assert_eq!(text, text.trim());
    }

    #[test]
    fn corrupt_pdf_is_a_parse_error() {
        let err = extract_text(b"%PDF-1.7 garbage", DocumentKind::Pdf).unwrap_err();
        assert!(matches!(
            err,
            BrdError::DocumentParse {
                kind: DocumentKind::Pdf,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn async_extract_runs_on_blocking_pool() {
        let data = docx_bytes(&["Project X requires automated invoicing."]);
        let text = extract(data, DocumentKind::Docx).await.unwrap();
        assert_eq!(text, "Project X requires automated invoicing.");
    }
}
