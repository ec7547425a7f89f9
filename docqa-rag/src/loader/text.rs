//! Plain text and markdown extraction: one text unit per paragraph
//! (blank-line separated).

use std::path::Path;

use crate::error::Result;

use super::extraction_error;

pub fn extract(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|e| extraction_error(path, e))?;
    Ok(paragraphs(&content))
}

fn paragraphs(content: &str) -> Vec<String> {
    content
        .replace("\r\n", "\n")
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
