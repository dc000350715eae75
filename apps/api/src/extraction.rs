//! Document text extraction — turns an uploaded CV (PDF or DOCX) into plain
//! text for question generation. Dispatch is on the file-name extension;
//! exactly two formats are supported and nothing is ever retried.

use std::io::{Cursor, Read};
use std::path::Path;

use anyhow::{anyhow, Context};
use quick_xml::events::Event;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported CV format '{0}' (expected .pdf or .docx)")]
    UnsupportedFormat(String),

    /// The file parsed, but produced no text at all.
    #[error("the document contains no extractable text")]
    EmptyContent,

    #[error("text extraction failed: {0}")]
    Failed(#[from] anyhow::Error),
}

/// Extracts plain text from `file_bytes`, dispatching on the extension of
/// `file_name`.
pub fn extract_text(file_bytes: &[u8], file_name: &str) -> Result<String, ExtractError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let text = match extension.as_str() {
        "pdf" => pdf_text(file_bytes)?,
        "docx" => docx_text(file_bytes)?,
        _ => return Err(ExtractError::UnsupportedFormat(file_name.to_string())),
    };

    if text.trim().is_empty() {
        return Err(ExtractError::EmptyContent);
    }
    Ok(text)
}

fn pdf_text(bytes: &[u8]) -> Result<String, anyhow::Error> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| anyhow!("PDF parse error: {e}"))
}

/// A DOCX is a ZIP archive; the document body lives in `word/document.xml`
/// as `<w:t>` text runs grouped into `<w:p>` paragraphs.
fn docx_text(bytes: &[u8]) -> Result<String, anyhow::Error> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).context("not a valid DOCX archive")?;

    let mut doc_xml = String::new();
    archive
        .by_name("word/document.xml")
        .context("missing word/document.xml")?
        .read_to_string(&mut doc_xml)
        .context("unreadable word/document.xml")?;

    let mut reader = quick_xml::Reader::from_reader(doc_xml.as_bytes());
    let mut out = String::new();
    let mut paragraph = String::new();
    let mut in_text_run = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"p" => paragraph.clear(),
                b"t" => in_text_run = true,
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"p" => {
                    if !paragraph.trim().is_empty() {
                        out.push_str(paragraph.trim_end());
                        out.push('\n');
                    }
                    paragraph.clear();
                }
                b"t" => in_text_run = false,
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if in_text_run {
                    paragraph.push_str(&e.unescape().context("invalid XML text run")?);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(anyhow!("XML parse error: {e}")),
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn docx_from_xml(document_xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        writer.start_file("word/document.xml", options).unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_unsupported_extension_is_rejected() {
        let err = extract_text(b"plain text", "cv.txt").unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_extension_is_rejected() {
        let err = extract_text(b"bytes", "cv").unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_docx_paragraphs_and_split_runs() {
        let xml = r#"<?xml version="1.0"?>
            <w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
              <w:body>
                <w:p><w:r><w:t>Senior Rust </w:t></w:r><w:r><w:t>engineer</w:t></w:r></w:p>
                <w:p><w:r><w:t>Five years of backend work</w:t></w:r></w:p>
              </w:body>
            </w:document>"#;
        let bytes = docx_from_xml(xml);
        let text = extract_text(&bytes, "cv.docx").unwrap();
        assert_eq!(text, "Senior Rust engineer\nFive years of backend work\n");
    }

    #[test]
    fn test_docx_entities_are_unescaped() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
              <w:body><w:p><w:r><w:t>C &amp; systems</w:t></w:r></w:p></w:body>
            </w:document>"#;
        let bytes = docx_from_xml(xml);
        let text = extract_text(&bytes, "CV.DOCX").unwrap();
        assert_eq!(text.trim(), "C & systems");
    }

    #[test]
    fn test_docx_without_text_is_empty_content() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
              <w:body><w:p></w:p></w:body>
            </w:document>"#;
        let bytes = docx_from_xml(xml);
        let err = extract_text(&bytes, "cv.docx").unwrap_err();
        assert!(matches!(err, ExtractError::EmptyContent));
    }

    #[test]
    fn test_docx_missing_document_xml_fails_with_cause() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        writer.start_file("word/other.xml", options).unwrap();
        writer.write_all(b"<x/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let err = extract_text(&bytes, "cv.docx").unwrap_err();
        match err {
            ExtractError::Failed(e) => assert!(e.to_string().contains("document.xml")),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn test_docx_garbage_bytes_fail_with_cause() {
        let err = extract_text(b"definitely not a zip", "cv.docx").unwrap_err();
        assert!(matches!(err, ExtractError::Failed(_)));
    }
}
