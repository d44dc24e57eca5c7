//! # brd-analyzer
//!
//! Turn an uploaded business document (PDF or DOCX) into a structured
//! Business Requirements Document analysis, delivered as JSON or as a
//! formatted PDF report.
//!
//! The service is stateless: every request extracts the document text,
//! asks a chat-completion model for a fixed JSON schema, repairs and
//! normalises the answer, and renders it. Nothing is stored between
//! requests.
//!
//! ## Pipeline Overview
//!
//! ```text
//! upload
//!  │
//!  ├─ 1. Validate  empty upload, .pdf/.docx extension
//!  ├─ 2. Extract   lopdf / docx-rs text extraction (spawn_blocking)
//!  ├─ 3. Prompt    system prompt + schema + document text
//!  ├─ 4. Complete  one OpenAI-compatible chat call (Groq by default)
//!  ├─ 5. Repair    strict JSON, else outermost {…} substring
//!  ├─ 6. Normalise every schema field present
//!  └─ 7. Render    JSON passthrough or 3-section PDF report
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use brd_analyzer::{analyze_document, AnalyzerConfig, ChatCompletionClient, OutputMode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads GROQ_API_KEY / GROQ_BASE_URL / BRD_MODEL
//!     let config = AnalyzerConfig::from_env();
//!     let client = ChatCompletionClient::new(&config);
//!     let bytes = std::fs::read("requirements.docx")?;
//!     let artifact =
//!         analyze_document(bytes, "requirements.docx", OutputMode::Json, &client, &config).await?;
//!     println!("{}", String::from_utf8(artifact.into_bytes()?)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `brd-analyzer` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod analyze;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod report;
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analyze::{analyze_document, analyze_path, analyze_to_file, generate_report, render_report};
pub use config::{AnalyzerConfig, AnalyzerConfigBuilder, ServerConfig};
pub use error::BrdError;
pub use output::{report_filename, OutputMode, ReportArtifact};
pub use pipeline::extract::DocumentKind;
pub use pipeline::llm::{ChatCompletionClient, CompletionRequest, CompletionService};
pub use report::{FieldValue, ListItem, StructuredReport};
pub use server::{router, serve, AppState};
