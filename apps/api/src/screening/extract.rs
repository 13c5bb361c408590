//! Text extraction for uploaded documents.
//!
//! Each supported format maps to one parser: `pdf-extract` for PDFs,
//! `docx-rs` for DOCX, lossy UTF-8 decoding for plain text. Extraction
//! failures carry the format-specific cause; the handler decides whether a
//! failed file aborts the batch or is skipped.

use std::path::Path;

use thiserror::Error;

/// Supported document formats, derived from the filename extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Txt,
}

impl DocumentKind {
    /// Parses the text after the last `.` in the filename, case-insensitive.
    /// Returns `None` for unsupported or missing extensions.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        match ext.to_lowercase().as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            "txt" => Some(DocumentKind::Txt),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF parsing failed: {0}")]
    Pdf(String),

    #[error("DOCX parsing failed: {0}")]
    Docx(String),
}

/// Reads the file at `path` and returns its plain-text content.
pub async fn extract_text(path: &Path, kind: DocumentKind) -> Result<String, ExtractError> {
    let bytes = tokio::fs::read(path).await?;
    match kind {
        DocumentKind::Txt => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        DocumentKind::Docx => extract_docx(&bytes),
        DocumentKind::Pdf => {
            pdf_extract::extract_text_from_mem(&bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
        }
    }
}

/// Concatenates all paragraph texts with newline separators. Paragraphs with
/// no text runs contribute an empty line rather than an error.
fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| ExtractError::Docx(e.to_string()))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .into_iter()
        .filter_map(|child| match child {
            docx_rs::DocumentChild::Paragraph(p) => Some(paragraph_text(&p)),
            _ => None,
        })
        .collect();

    Ok(paragraphs.join("\n"))
}

fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        if let docx_rs::ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                if let docx_rs::RunChild::Text(t) = run_child {
                    text.push_str(&t.text);
                }
            }
        }
    }
    text
}
