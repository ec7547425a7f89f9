//! PDF extraction: one text unit per page.

use std::path::Path;

use crate::error::Result;

use super::extraction_error;

pub fn extract(path: &Path) -> Result<Vec<String>> {
    pdf_extract::extract_text_by_pages(path).map_err(|e| extraction_error(path, e))
}
