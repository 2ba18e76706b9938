//! .docx text extraction.
//!
//! A .docx file is a zip archive; the body lives in `word/document.xml` as
//! runs of `<w:t>` text inside `<w:p>` paragraphs. We pull the text out
//! directly with a streaming XML pass, mirroring how word processors flatten
//! a document: paragraphs joined by newlines, tabs and soft breaks preserved,
//! blank paragraphs dropped.

use std::io::{Cursor, Read};
use std::path::Path;

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, Event};
use quick_xml::Reader;
use thiserror::Error;
use zip::result::ZipError;
use zip::ZipArchive;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("not a valid .docx archive: {0}")]
    Archive(String),

    #[error("archive has no word/document.xml")]
    MissingDocument,

    #[error("document.xml is not well-formed: {0}")]
    Xml(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Case-insensitive extension check used to gate uploads.
pub fn has_docx_extension(filename: &str) -> bool {
    filename.to_ascii_lowercase().ends_with(".docx")
}

/// Reads a .docx file from disk and extracts its text.
pub fn load_document_text(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path).map_err(|source| ExtractError::Io {
        path: path.display().to_string(),
        source,
    })?;
    extract_docx_text(&bytes)
}

/// Extracts plain text from in-memory .docx bytes.
///
/// Returns an empty string when the document contains no text at all;
/// callers decide whether that is an error.
pub fn extract_docx_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| ExtractError::Archive(e.to_string()))?;

    let mut document = match archive.by_name("word/document.xml") {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Err(ExtractError::MissingDocument),
        Err(e) => return Err(ExtractError::Archive(e.to_string())),
    };

    let mut xml = Vec::new();
    document
        .read_to_end(&mut xml)
        .map_err(|e| ExtractError::Archive(e.to_string()))?;

    parse_document_xml(&xml)
}

fn parse_document_xml(xml: &[u8]) -> Result<String, ExtractError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();

    let mut paragraphs: Vec<String> = Vec::new();
    let mut paragraph = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"t" => in_text_run = true,
                b"tab" => paragraph.push('\t'),
                b"br" | b"cr" => paragraph.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" => paragraph.push('\t'),
                b"br" | b"cr" => paragraph.push('\n'),
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => flush_paragraph(&mut paragraph, &mut paragraphs),
                _ => {}
            },
            Ok(Event::Text(e)) if in_text_run => {
                let text = e
                    .xml_content()
                    .map_err(|e| ExtractError::Xml(e.to_string()))?;
                paragraph.push_str(&text);
            }
            // Escaped characters arrive as their own events, not as part of
            // the surrounding text.
            Ok(Event::GeneralRef(e)) if in_text_run => push_reference(&e, &mut paragraph)?,
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractError::Xml(e.to_string())),
            _ => {}
        }
        buf.clear();
    }
    flush_paragraph(&mut paragraph, &mut paragraphs);

    Ok(paragraphs.join("\n"))
}

/// Resolves one `&...;` reference: numeric character references and the five
/// predefined XML entities. Anything else is kept verbatim so no characters
/// are silently dropped.
fn push_reference(reference: &BytesRef<'_>, paragraph: &mut String) -> Result<(), ExtractError> {
    if let Some(ch) = reference
        .resolve_char_ref()
        .map_err(|e| ExtractError::Xml(e.to_string()))?
    {
        paragraph.push(ch);
        return Ok(());
    }

    let name = reference
        .decode()
        .map_err(|e| ExtractError::Xml(e.to_string()))?;
    match resolve_predefined_entity(&name) {
        Some(text) => paragraph.push_str(text),
        None => {
            paragraph.push('&');
            paragraph.push_str(&name);
            paragraph.push(';');
        }
    }
    Ok(())
}

/// Keeps non-blank paragraphs only, matching how a human reads the document.
fn flush_paragraph(paragraph: &mut String, paragraphs: &mut Vec<String>) {
    if !paragraph.trim().is_empty() {
        paragraphs.push(std::mem::take(paragraph));
    } else {
        paragraph.clear();
    }
}
