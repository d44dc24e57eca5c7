//! Error types for the brd-analyzer library.
//!
//! Every stage of the pipeline fails with a single [`BrdError`]. The enum is
//! grouped by the party at fault, and [`BrdError::status_code`] turns that
//! grouping into the HTTP status the request handler answers with:
//!
//! * **Client input** (`4xx`): empty or unreadable uploads, unsupported
//!   formats, bad query parameters. Raised before the completion service is
//!   ever contacted.
//! * **Configuration** (`500`): the completion credential is missing.
//! * **Upstream** (`502`): the completion service failed or answered with
//!   something that could not be repaired into JSON.
//!
//! Rendering never fails on missing report fields; those are masked with
//! placeholder text instead of becoming errors.

use crate::pipeline::extract::DocumentKind;
use axum::http::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the brd-analyzer library.
#[derive(Debug, Error)]
pub enum BrdError {
    // ── Client input errors ───────────────────────────────────────────────
    /// The uploaded file contained zero bytes.
    #[error("Empty file")]
    EmptyUpload,

    /// The multipart body had no `file` field.
    #[error("Missing 'file' upload field")]
    MissingUpload,

    /// The multipart body could not be read.
    #[error("Invalid upload: {detail}")]
    InvalidUpload { detail: String },

    /// The upload exceeded the configured body limit.
    #[error("Upload exceeds the {limit} byte limit")]
    UploadTooLarge { limit: usize },

    /// The filename extension is neither `pdf` nor `docx`.
    #[error("Only .pdf or .docx supported (got '{filename}')")]
    UnsupportedFormat { filename: String },

    /// The query string could not be parsed.
    #[error("Invalid query string: {detail}")]
    InvalidQuery { detail: String },

    /// The `output` selector is neither `pdf` nor `json`.
    #[error("Invalid output '{value}': expected 'pdf' or 'json'")]
    InvalidOutputMode { value: String },

    /// The document bytes could not be parsed as the declared type.
    #[error("Could not read {kind} document: {detail}")]
    DocumentParse { kind: DocumentKind, detail: String },

    /// Parsing succeeded but the document holds no text.
    #[error("No extractable text found in document")]
    NoExtractableText,

    // ── Configuration errors ──────────────────────────────────────────────
    /// The completion service credential is not configured.
    #[error("Missing {var}")]
    MissingApiKey { var: &'static str },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Upstream errors ───────────────────────────────────────────────────
    /// The completion service could not be reached or returned an error status.
    #[error("Completion service error: {message}")]
    Upstream { message: String },

    /// The model output was not JSON, even after brace-extraction repair.
    #[error("Model returned non-JSON output: {preview}")]
    MalformedModelOutput { preview: String },

    // ── Local I/O errors (CLI) ────────────────────────────────────────────
    /// Could not read the input document or write the report file.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Internal errors ───────────────────────────────────────────────────
    /// The PDF report could not be assembled.
    #[error("Failed to render PDF report: {0}")]
    RenderFailed(String),

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BrdError {
    /// HTTP status the request handler reports for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            BrdError::EmptyUpload
            | BrdError::UnsupportedFormat { .. }
            | BrdError::DocumentParse { .. }
            | BrdError::NoExtractableText => StatusCode::BAD_REQUEST,
            BrdError::MissingUpload
            | BrdError::InvalidUpload { .. }
            | BrdError::InvalidQuery { .. }
            | BrdError::InvalidOutputMode { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            BrdError::UploadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            BrdError::Upstream { .. } | BrdError::MalformedModelOutput { .. } => {
                StatusCode::BAD_GATEWAY
            }
            BrdError::MissingApiKey { .. }
            | BrdError::InvalidConfig(_)
            | BrdError::Io { .. }
            | BrdError::RenderFailed(_)
            | BrdError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True when the caller, not the service, is at fault.
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_400() {
        assert_eq!(BrdError::EmptyUpload.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            BrdError::NoExtractableText.status_code(),
            StatusCode::BAD_REQUEST
        );
        let e = BrdError::UnsupportedFormat {
            filename: "notes.txt".into(),
        };
        assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);
        assert!(e.to_string().contains("notes.txt"));
        assert!(e.is_client_error());
    }

    #[test]
    fn document_parse_names_the_kind() {
        let e = BrdError::DocumentParse {
            kind: DocumentKind::Docx,
            detail: "zip header missing".into(),
        };
        assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);
        assert!(e.to_string().contains("DOCX"), "got: {e}");
    }

    #[test]
    fn missing_key_is_a_server_error() {
        let e = BrdError::MissingApiKey {
            var: "GROQ_API_KEY",
        };
        assert_eq!(e.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.to_string(), "Missing GROQ_API_KEY");
        assert!(!e.is_client_error());
    }

    #[test]
    fn malformed_output_is_bad_gateway() {
        let e = BrdError::MalformedModelOutput {
            preview: "Sorry, I cannot".into(),
        };
        assert_eq!(e.status_code(), StatusCode::BAD_GATEWAY);
        assert!(e.to_string().contains("Sorry, I cannot"));
    }

    #[test]
    fn request_shape_errors_are_unprocessable() {
        let e = BrdError::InvalidOutputMode {
            value: "xml".into(),
        };
        assert_eq!(e.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            BrdError::MissingUpload.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        let q = BrdError::InvalidQuery {
            detail: "duplicate field `output`".into(),
        };
        assert_eq!(q.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(!q.to_string().contains("Invalid output"));
    }
}
