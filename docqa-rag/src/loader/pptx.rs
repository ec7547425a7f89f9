//! Slide-deck (.pptx) extraction: one text unit per slide.
//!
//! Slides live at `ppt/slides/slideN.xml` inside the archive. All text
//! runs (`<a:t>`) on a slide are concatenated into one unit, covering
//! every text-bearing shape on the slide.

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

    // Collect slide entries and order them by slide number; archive
    // iteration order is not the deck order.
    let mut slide_names: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| Some((slide_number(name)?, name.to_string())))
        .collect();
    slide_names.sort();

    let mut slides = Vec::with_capacity(slide_names.len());
    for (_, name) in slide_names {
        let mut xml = String::new();
        archive
            .by_name(&name)
            .map_err(|e| extraction_error(path, e))?
            .read_to_string(&mut xml)
            .map_err(|e| extraction_error(path, e))?;
        slides.push(slide_text(&xml).map_err(|e| extraction_error(path, e))?);
    }

    Ok(slides)
}

/// Parse `ppt/slides/slideN.xml` into `N`; anything else is `None`.
fn slide_number(name: &str) -> Option<u32> {
    name.strip_prefix("ppt/slides/slide")?.strip_suffix(".xml")?.parse().ok()
}

/// Concatenate every `<a:t>` run on a slide, space-separated.
fn slide_text(xml: &str) -> std::result::Result<String, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"a:t" => in_text_run = true,
            Event::Text(t) if in_text_run => {
                if let Ok(run) = t.unescape() {
                    if !text.is_empty() {
                        text.push(' ');
                    }
                    text.push_str(&run);
                }
            }
            Event::End(e) if e.name().as_ref() == b"a:t" => in_text_run = false,
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}
