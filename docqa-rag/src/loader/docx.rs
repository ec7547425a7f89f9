//! Word-processor (.docx) extraction: one text unit per paragraph.
//!
//! A .docx file is a zip archive; the document body lives in
//! `word/document.xml` with paragraphs as `<w:p>` elements whose visible
//! text sits in `<w:t>` runs.

use std::io::Read;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use crate::error::Result;

use super::extraction_error;

pub fn extract(path: &Path) -> Result<Vec<String>> {
    let file = std::fs::File::open(path).map_err(|e| extraction_error(path, e))?;
    let mut archive = ZipArchive::new(file).map_err(|e| extraction_error(path, e))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| extraction_error(path, e))?
        .read_to_string(&mut xml)
        .map_err(|e| extraction_error(path, e))?;

    paragraphs(&xml).map_err(|e| extraction_error(path, e))
}

/// Collect one string per `<w:p>` element, concatenating its `<w:t>` runs.
fn paragraphs(xml: &str) -> std::result::Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Event::Text(t) if in_text_run => {
                if let Ok(text) = t.unescape() {
                    current.push_str(&text);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}
