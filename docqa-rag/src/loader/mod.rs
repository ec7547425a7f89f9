//! Document loading: directory of files → ordered [`TextBlock`]s.
//!
//! Files are dispatched by extension to a format-specific extractor.
//! Each extractor preserves the document's own unit boundaries — pages
//! for PDFs, paragraphs for word-processor files, slides for decks — so
//! chunking never merges unrelated material. Extraction failures are
//! per-file: a corrupt document is logged and skipped, and the rest of
//! the corpus still loads.

mod docx;
mod pdf;
mod pptx;
mod text;

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::document::TextBlock;
use crate::error::{RagError, Result};

/// Load every supported document in `dir` into text blocks.
///
/// Files are processed in name order for deterministic output. Blocks
/// are stamped with the file name only — never the full path — and
/// blank blocks are discarded. Unsupported extensions are skipped
/// silently.
///
/// # Errors
///
/// Returns [`RagError::LoaderError`] only if the directory itself cannot
/// be read; individual file failures are absorbed with a warning.
pub fn load_directory(dir: &Path) -> Result<Vec<TextBlock>> {
    let entries = std::fs::read_dir(dir).map_err(|e| RagError::LoaderError {
        file: dir.display().to_string(),
        message: format!("failed to read directory: {e}"),
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    let mut blocks = Vec::new();
    for path in paths {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string)
        else {
            continue;
        };

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let extracted = match extension.as_deref() {
            Some("pdf") => pdf::extract(&path),
            Some("docx") => docx::extract(&path),
            Some("pptx") => pptx::extract(&path),
            Some("txt" | "md") => text::extract(&path),
            _ => {
                debug!(file = %file_name, "skipping unsupported extension");
                continue;
            }
        };

        match extracted {
            Ok(units) => {
                let before = blocks.len();
                blocks.extend(
                    units
                        .into_iter()
                        .filter(|unit| !unit.trim().is_empty())
                        .map(|unit| TextBlock {
                            file_name: file_name.clone(),
                            text: unit.trim().to_string(),
                        }),
                );
                debug!(file = %file_name, blocks = blocks.len() - before, "loaded document");
            }
            Err(e) => {
                warn!(file = %file_name, error = %e, "failed to extract document; skipping");
            }
        }
    }

    Ok(blocks)
}

/// Build the per-file extraction error used by every extractor.
fn extraction_error(path: &Path, message: impl std::fmt::Display) -> RagError {
    RagError::LoaderError {
        file: path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("<unknown>")
            .to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn write_docx(path: &Path, document_xml: &str) {
        let file = std::fs::File::create(path).unwrap();
        let mut writer = ZipWriter::new(file);
        writer.start_file("word/document.xml", SimpleFileOptions::default()).unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap();
    }

    const DOCX_XML: &str = r#"<?xml version="1.0"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>First paragraph.</w:t></w:r></w:p>
    <w:p><w:r><w:t> </w:t></w:r></w:p>
    <w:p><w:r><w:t>Second </w:t></w:r><w:r><w:t>paragraph.</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    #[test]
    fn loads_supported_files_and_skips_the_rest() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();

        write_docx(&root.join("notes.docx"), DOCX_XML);
        std::fs::write(root.join("plain.txt"), "One block.\n\nAnother block.").unwrap();
        std::fs::write(root.join("image.png"), [0x89, 0x50, 0x4e, 0x47]).unwrap();

        let blocks = load_directory(root).unwrap();

        // Two docx paragraphs (blank one dropped) + two txt paragraphs.
        assert_eq!(blocks.len(), 4);
        assert!(blocks.iter().all(|b| b.file_name == "notes.docx" || b.file_name == "plain.txt"));
        assert!(blocks.iter().all(|b| !b.text.trim().is_empty()));
        assert!(blocks.iter().any(|b| b.text == "Second paragraph."));
    }

    #[test]
    fn corrupt_file_is_skipped_and_the_rest_still_load() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();

        std::fs::write(root.join("broken.docx"), "this is not a zip archive").unwrap();
        std::fs::write(root.join("fine.txt"), "Still loads.").unwrap();

        let blocks = load_directory(root).unwrap();

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].file_name, "fine.txt");
    }

    #[test]
    fn attribution_is_file_name_not_path() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("doc.md"), "content here").unwrap();

        let blocks = load_directory(temp.path()).unwrap();

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].file_name, "doc.md");
    }

    #[test]
    fn unreadable_directory_is_an_error() {
        let missing = Path::new("/nonexistent/kb/dir");
        assert!(matches!(load_directory(missing), Err(RagError::LoaderError { .. })));
    }
}
