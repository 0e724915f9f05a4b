//! Plain-text extraction from uploaded resume documents.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),
}

/// Accepted upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    /// Legacy Word binary. Accepted and stored, but no text is extracted.
    Doc,
}

impl DocumentKind {
    /// Recognizes the extension case-insensitively.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let ext = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "doc" => Some(Self::Doc),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Doc => "doc",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Doc => "application/msword",
        }
    }
}

/// Extracts text from the document bytes. Blocking; call from `spawn_blocking`.
pub fn extract_text(kind: DocumentKind, bytes: &[u8]) -> Result<String, ExtractError> {
    match kind {
        DocumentKind::Pdf => {
            pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
        }
        DocumentKind::Docx => {
            let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
                .map_err(|e| ExtractError::Docx(format!("Failed to open DOCX: {e}")))?;
            extract_docx_text(&mut archive)
        }
        DocumentKind::Doc => {
            warn!("Legacy .doc text extraction is not supported; storing without text");
            Ok(String::new())
        }
    }
}

fn extract_docx_text<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
) -> Result<String, ExtractError> {
    let mut document_xml = archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractError::Docx(format!("Failed to find document.xml: {e}")))?;

    let mut xml = String::new();
    document_xml
        .read_to_string(&mut xml)
        .map_err(|e| ExtractError::Docx(format!("Failed to read document.xml: {e}")))?;

    parse_document_xml(&xml)
}

/// Text of every `w:t` run, one line per `w:p` paragraph.
fn parse_document_xml(xml: &str) -> Result<String, ExtractError> {
    let mut reader = Reader::from_str(xml);

    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => in_run_text = true,
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_run_text = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) if in_run_text => {
                let decoded = e
                    .unescape()
                    .map_err(|err| ExtractError::Docx(format!("XML text error: {err}")))?;
                text.push_str(&decoded);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractError::Docx(format!("XML parsing error: {e}"))),
            _ => {}
        }
    }

    Ok(text.trim().to_string())
}
