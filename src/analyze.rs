//! Document-to-report entry points.
//!
//! [`analyze_document`] runs the whole pipeline for one upload:
//!
//! ```text
//! bytes ──▶ extract ──▶ prompt ──▶ complete ──▶ repair ──▶ normalise ──▶ render
//!          (pdf/docx)             (one call)   (JSON)     (all fields)  (json/pdf)
//! ```
//!
//! Checks are ordered so that every client error is raised before the
//! completion service is contacted: empty upload, then unsupported format,
//! then unreadable document, then a document without text.

use crate::config::AnalyzerConfig;
use crate::error::BrdError;
use crate::output::{report_filename, OutputMode, ReportArtifact};
use crate::pipeline::extract::{self, DocumentKind};
use crate::pipeline::llm::{CompletionRequest, CompletionService};
use crate::pipeline::{render, repair};
use crate::report::StructuredReport;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Analyse one uploaded document and render the result.
///
/// # Arguments
/// * `data`: raw document bytes
/// * `filename`: upload name; its extension selects the extractor and its
///   base name the PDF download name
/// * `mode`: JSON passthrough or PDF report
///
/// # Errors
/// Client errors (`EmptyUpload`, `UnsupportedFormat`, `DocumentParse`,
/// `NoExtractableText`) are returned without calling the completion
/// service. `MissingApiKey`, `Upstream` and `MalformedModelOutput` come
/// from report generation.
pub async fn analyze_document(
    data: Vec<u8>,
    filename: &str,
    mode: OutputMode,
    service: &dyn CompletionService,
    config: &AnalyzerConfig,
) -> Result<ReportArtifact, BrdError> {
    let total_start = Instant::now();

    if data.is_empty() {
        return Err(BrdError::EmptyUpload);
    }
    let kind = DocumentKind::from_filename(filename)?;
    info!("Analysing '{}' ({} bytes, {})", filename, data.len(), kind);

    let text = extract::extract(data, kind).await?;
    if text.trim().is_empty() {
        return Err(BrdError::NoExtractableText);
    }

    let report = generate_report(&text, service, config).await?;
    let artifact = render_report(report, mode, filename).await?;

    info!(
        "Analysis of '{}' finished in {}ms ({} output)",
        filename,
        total_start.elapsed().as_millis(),
        mode
    );
    Ok(artifact)
}

/// Prompt the completion service with the document text and return the
/// repaired, fully populated report.
pub async fn generate_report(
    document_text: &str,
    service: &dyn CompletionService,
    config: &AnalyzerConfig,
) -> Result<StructuredReport, BrdError> {
    let char_count = document_text.chars().count();
    if char_count > config.max_document_chars {
        warn!(
            "Document text truncated from {} to {} characters",
            char_count, config.max_document_chars
        );
    }

    let request = CompletionRequest::for_document(document_text, config);
    let llm_start = Instant::now();
    let raw = service.complete(&request).await?;
    debug!(
        "Completion returned {} bytes in {}ms",
        raw.len(),
        llm_start.elapsed().as_millis()
    );

    let mut report = StructuredReport::from_map(repair::parse_report_json(&raw)?);
    let filled = report.normalize();
    if !filled.is_empty() {
        debug!("Model omitted {} fields: {}", filled.len(), filled.join(", "));
    }
    Ok(report)
}

/// Render a report in the requested mode. PDF layout runs on the blocking pool.
pub async fn render_report(
    report: StructuredReport,
    mode: OutputMode,
    upload_name: &str,
) -> Result<ReportArtifact, BrdError> {
    match mode {
        OutputMode::Json => Ok(ReportArtifact::Json(report)),
        OutputMode::Pdf => {
            let bytes = tokio::task::spawn_blocking(move || render::render_pdf(&report))
                .await
                .map_err(|e| BrdError::Internal(format!("render task panicked: {e}")))??;
            debug!("Rendered PDF report: {} bytes", bytes.len());
            Ok(ReportArtifact::Pdf {
                bytes,
                filename: report_filename(upload_name),
            })
        }
    }
}

/// Analyse a local file and write the artifact to `output`.
///
/// Returns the number of bytes written.
pub async fn analyze_to_file(
    input: &Path,
    output: &Path,
    mode: OutputMode,
    service: &dyn CompletionService,
    config: &AnalyzerConfig,
) -> Result<usize, BrdError> {
    let artifact = analyze_path(input, mode, service, config).await?;
    let bytes = artifact.into_bytes()?;
    tokio::fs::write(output, &bytes)
        .await
        .map_err(|source| BrdError::Io {
            path: output.to_path_buf(),
            source,
        })?;
    info!("Wrote {} bytes to {}", bytes.len(), output.display());
    Ok(bytes.len())
}

/// Analyse a local file.
pub async fn analyze_path(
    input: &Path,
    mode: OutputMode,
    service: &dyn CompletionService,
    config: &AnalyzerConfig,
) -> Result<ReportArtifact, BrdError> {
    let data = tokio::fs::read(input).await.map_err(|source| BrdError::Io {
        path: input.to_path_buf(),
        source,
    })?;
    let filename = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    analyze_document(data, &filename, mode, service, config).await
}
