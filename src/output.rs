//! Output types: the requested delivery format and the rendered artifact.

use crate::error::BrdError;
use crate::report::StructuredReport;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Suffix appended to the upload's base name for PDF downloads.
pub const REPORT_SUFFIX: &str = "-brd-report.pdf";

/// RFC 5987 `attr-char`: everything else in `filename*` is percent-encoded.
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// Delivery format of the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// The structured record as JSON, unchanged.
    Json,
    /// A paginated PDF report. (default)
    #[default]
    Pdf,
}

impl FromStr for OutputMode {
    type Err = BrdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputMode::Json),
            "pdf" => Ok(OutputMode::Pdf),
            _ => Err(BrdError::InvalidOutputMode {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMode::Json => f.write_str("json"),
            OutputMode::Pdf => f.write_str("pdf"),
        }
    }
}

/// The final product of one analysis.
#[derive(Debug, Clone)]
pub enum ReportArtifact {
    /// `json` mode: the normalised record.
    Json(StructuredReport),
    /// `pdf` mode: the rendered document and its suggested download name.
    Pdf { bytes: Vec<u8>, filename: String },
}

impl ReportArtifact {
    pub fn content_type(&self) -> &'static str {
        match self {
            ReportArtifact::Json(_) => "application/json",
            ReportArtifact::Pdf { .. } => "application/pdf",
        }
    }

    /// Serialise the artifact to the bytes sent to the caller.
    pub fn into_bytes(self) -> Result<Vec<u8>, BrdError> {
        match self {
            ReportArtifact::Json(report) => serde_json::to_vec_pretty(&report)
                .map_err(|e| BrdError::Internal(format!("JSON serialisation failed: {e}"))),
            ReportArtifact::Pdf { bytes, .. } => Ok(bytes),
        }
    }
}

/// Download name for the PDF report: `<basename>-brd-report.pdf`.
///
/// The base name is the upload's file name without directories or its last
/// extension; quotes, backslashes and control characters are removed so the
/// name is safe inside a `Content-Disposition` header. An empty base name
/// becomes `brd-report`.
pub fn report_filename(upload_name: &str) -> String {
    let file = upload_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(upload_name);
    let stem = match file.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => file,
    };
    let clean: String = stem
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect();
    let clean = clean.trim();
    let base = if clean.is_empty() { "brd-report" } else { clean };
    format!("{base}{REPORT_SUFFIX}")
}

/// `Content-Disposition` value for a PDF download.
///
/// ASCII names are sent as a quoted `filename`. Other names get an ASCII
/// fallback (non-ASCII characters replaced by `_`) plus a UTF-8
/// `filename*` parameter.
pub fn content_disposition(filename: &str) -> String {
    if filename.is_ascii() {
        return format!("attachment; filename=\"{filename}\"");
    }
    let fallback: String = filename
        .chars()
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect();
    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        utf8_percent_encode(filename, ATTR_CHAR)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_mode_parsing() {
        assert_eq!("json".parse::<OutputMode>().unwrap(), OutputMode::Json);
        assert_eq!("PDF".parse::<OutputMode>().unwrap(), OutputMode::Pdf);
        assert!(matches!(
            "xml".parse::<OutputMode>(),
            Err(BrdError::InvalidOutputMode { .. })
        ));
        assert_eq!(OutputMode::default(), OutputMode::Pdf);
    }

    #[test]
    fn filename_uses_base_name() {
        assert_eq!(report_filename("requirements.docx"), "requirements-brd-report.pdf");
        assert_eq!(report_filename("Q3.plan.pdf"), "Q3.plan-brd-report.pdf");
        assert_eq!(report_filename("README"), "README-brd-report.pdf");
    }

    #[test]
    fn filename_strips_directories_and_quotes() {
        assert_eq!(
            report_filename("C:\\Users\\ana\\brd \"final\".docx"),
            "brd final-brd-report.pdf"
        );
        assert_eq!(report_filename("../../etc/spec.pdf"), "spec-brd-report.pdf");
    }

    #[test]
    fn empty_base_name_falls_back() {
        assert_eq!(report_filename(".pdf"), "brd-report-brd-report.pdf");
        assert_eq!(report_filename(""), "brd-report-brd-report.pdf");
    }

    #[test]
    fn ascii_disposition_is_plain() {
        assert_eq!(
            content_disposition("scope-brd-report.pdf"),
            "attachment; filename=\"scope-brd-report.pdf\""
        );
    }

    #[test]
    fn non_ascii_disposition_adds_utf8_name() {
        let name = report_filename("Überblick Q3.docx");
        assert_eq!(name, "Überblick Q3-brd-report.pdf");
        let value = content_disposition(&name);
        assert_eq!(
            value,
            "attachment; filename=\"_berblick Q3-brd-report.pdf\"; \
             filename*=UTF-8''%C3%9Cberblick%20Q3-brd-report.pdf"
        );
        assert!(value.is_ascii());
    }

    #[test]
    fn artifact_content_types() {
        let json = ReportArtifact::Json(StructuredReport::default());
        assert_eq!(json.content_type(), "application/json");
        let pdf = ReportArtifact::Pdf {
            bytes: b"%PDF".to_vec(),
            filename: "x-brd-report.pdf".into(),
        };
        assert_eq!(pdf.content_type(), "application/pdf");
        assert_eq!(pdf.into_bytes().unwrap(), b"%PDF".to_vec());
    }
}
