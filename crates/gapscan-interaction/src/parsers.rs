//! Format-specific text extraction for downloaded attachments.
//!
//! Supported: plain text (.txt), PDF (.pdf), Word (.docx, .doc as the
//! OOXML container).

use quick_xml::Reader;
use quick_xml::events::Event;
use std::io::{Cursor, Read};

use gapscan_core::error::ExtractionError;

use crate::extractor::file_extension;

/// Extracts plain text from raw file bytes, dispatching on the filename
/// extension.
pub fn extract_text(bytes: &[u8], filename: &str) -> Result<String, ExtractionError> {
    match file_extension(filename).as_str() {
        "txt" => Ok(extract_plain_text(bytes)),
        "pdf" => extract_pdf_text(bytes),
        "docx" | "doc" => extract_docx_text(bytes),
        _ => Err(ExtractionError::UnsupportedType {
            filename: filename.to_string(),
        }),
    }
}

/// UTF-8 when valid, latin-1 otherwise. Latin-1 maps every byte to a
/// scalar value, so this never fails.
fn extract_plain_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|err| ExtractionError::Parse(format!("failed to parse PDF: {err}")))
}

/// Reads word/document.xml out of the OOXML zip container and collects
/// the `<w:t>` text runs, one line per `<w:p>` paragraph.
fn extract_docx_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|err| ExtractionError::Parse(format!("not a valid Word archive: {err}")))?;

    let mut document_xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|err| ExtractionError::Parse(format!("missing word/document.xml: {err}")))?
        .read_to_string(&mut document_xml)
        .map_err(|err| ExtractionError::Parse(format!("failed to read document.xml: {err}")))?;

    let mut reader = Reader::from_reader(document_xml.as_bytes());

    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text_run = true,
                b"p" => current.clear(),
                _ => {}
            },
            Ok(Event::Text(ref t)) if in_text_run => {
                let text = t
                    .xml_content()
                    .map_err(|err| ExtractionError::Parse(format!("bad text run: {err}")))?;
                current.push_str(&text);
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => {
                    if !current.trim().is_empty() {
                        paragraphs.push(current.trim().to_string());
                    }
                    current.clear();
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                return Err(ExtractionError::Parse(format!(
                    "failed to parse document.xml: {err}"
                )));
            }
        }
        buf.clear();
    }

    Ok(paragraphs.join("\n"))
}
