//! Pipeline stages for document-to-report analysis.
//!
//! Each submodule implements exactly one transformation step.
//!
//! ## Data Flow
//!
//! ```text
//! upload ──▶ extract ──▶ llm ──▶ repair ──▶ render
//! (bytes)   (pdf/docx)  (chat)  (JSON)    (pdf)
//! ```
//!
//! 1. [`extract`]: pull plain text out of PDF or DOCX bytes; runs in
//!    `spawn_blocking` because both parsers are synchronous
//! 2. [`llm`]: one chat-completion call behind the
//!    [`CompletionService`](llm::CompletionService) trait; the only stage
//!    with network I/O
//! 3. [`repair`]: recover a JSON object from the raw model text
//! 4. [`render`]: lay the normalised report out as a paginated PDF

pub mod extract;
pub mod llm;
pub mod render;
pub mod repair;
