//! Plain-text extraction from PDF resumes.
//!
//! Page text is concatenated in document order with no page markers; layout
//! and structure are not preserved.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors surfaced by a text extractor
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Extraction(String),
}

/// Full extracted text of a resume. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeText(String);

impl ResumeText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the document produced nothing but whitespace
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

/// Source of resume text for a session
pub trait TextExtractor {
    fn extract(&self, path: &Path) -> Result<ResumeText, ExtractError>;
}

/// Extractor backed by the `pdf-extract` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, path: &Path) -> Result<ResumeText, ExtractError> {
        if !path.exists() {
            return Err(ExtractError::NotFound(path.to_path_buf()));
        }

        let bytes = std::fs::read(path).map_err(|source| ExtractError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        // pdf-extract panics instead of erroring on some malformed content streams.
        let text = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(&bytes))
            .map_err(|payload| {
                ExtractError::Extraction(format!(
                    "malformed PDF content: {}",
                    panic_message(&*payload)
                ))
            })?
            .map_err(|e| ExtractError::Extraction(e.to_string()))?;

        debug!(
            "Extracted {} chars from {} ({} bytes)",
            text.chars().count(),
            path.display(),
            bytes.len()
        );

        Ok(ResumeText::new(text))
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("text extraction panicked")
}
