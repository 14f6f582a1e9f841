//! DOCX text: the `<w:t>` runs of `word/document.xml`.

use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::Event;

use folio_core::domain::DocumentKind;
use folio_core::ports::ExtractionError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Upper bound on the decompressed document part.
const MAX_DOCUMENT_XML_BYTES: u64 = 64 * 1024 * 1024;

pub(super) fn extract(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(malformed)?;
    let part = archive.by_name(DOCUMENT_PART).map_err(malformed)?;

    let mut xml = String::new();
    part.take(MAX_DOCUMENT_XML_BYTES)
        .read_to_string(&mut xml)
        .map_err(malformed)?;

    text_from_document_xml(&xml)
}

fn text_from_document_xml(xml: &str) -> Result<String, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_run_text = true,
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_run_text = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" => text.push('\t'),
                b"br" | b"cr" | b"p" => text.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_run_text => text.push_str(&t.unescape().map_err(malformed)?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}

fn malformed(e: impl std::fmt::Display) -> ExtractionError {
    ExtractionError::Malformed {
        kind: DocumentKind::Docx,
        reason: e.to_string(),
    }
}
