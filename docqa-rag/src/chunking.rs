//! Word-window chunking.
//!
//! Splits extracted text into overlapping fixed-size word windows. The
//! window never crosses a [`TextBlock`] boundary, so a chunk always
//! belongs to exactly one page/paragraph/slide of exactly one file.

use crate::document::{Chunk, TextBlock};
use crate::error::{RagError, Result};

/// A strategy for splitting a text block into chunks.
///
/// Implementations produce [`Chunk`]s with a placeholder `index` of the
/// chunk's position within the block; the pipeline renumbers indices
/// per file so ids stay stable across blocks.
pub trait Chunker: Send + Sync {
    /// Split one block into chunks. Returns an empty `Vec` for blank text.
    fn chunk(&self, block: &TextBlock) -> Vec<Chunk>;
}

/// Splits text into fixed-size word windows with configurable overlap.
///
/// A window of `chunk_size` words advances by `chunk_size − chunk_overlap`
/// words per step. The final window may be shorter; empty windows are
/// never emitted.
///
/// # Example
///
/// ```rust,ignore
/// use docqa_rag::WordWindowChunker;
///
/// let chunker = WordWindowChunker::new(500, 50)?;
/// let chunks = chunker.chunk(&block);
/// ```
#[derive(Debug, Clone)]
pub struct WordWindowChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl WordWindowChunker {
    /// Create a new `WordWindowChunker`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if `chunk_size` is zero or
    /// `chunk_overlap >= chunk_size` — the stride would be non-positive
    /// and the window would never advance.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(RagError::ConfigError("chunk_size must be greater than zero".to_string()));
        }
        if chunk_overlap >= chunk_size {
            return Err(RagError::ConfigError(format!(
                "chunk_overlap ({chunk_overlap}) must be less than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self { chunk_size, chunk_overlap })
    }
}

impl Chunker for WordWindowChunker {
    fn chunk(&self, block: &TextBlock) -> Vec<Chunk> {
        let words: Vec<&str> = block.text.split_whitespace().collect();
        if words.is_empty() {
            return Vec::new();
        }

        let stride = self.chunk_size - self.chunk_overlap;
        let mut chunks = Vec::new();
        let mut start = 0;

        // Stop once a window reaches the end of the block; advancing
        // further would only re-emit the overlap tail.
        loop {
            let end = (start + self.chunk_size).min(words.len());
            chunks.push(Chunk {
                file_name: block.file_name.clone(),
                text: words[start..end].join(" "),
                index: chunks.len(),
            });
            if end == words.len() {
                break;
            }
            start += stride;
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(words: usize) -> TextBlock {
        let text = (0..words).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        TextBlock { file_name: "doc.pdf".into(), text }
    }

    fn word_count(chunk: &Chunk) -> usize {
        chunk.text.split_whitespace().count()
    }

    #[test]
    fn rejects_invalid_parameters() {
        assert!(WordWindowChunker::new(0, 0).is_err());
        assert!(WordWindowChunker::new(10, 10).is_err());
        assert!(WordWindowChunker::new(10, 20).is_err());
    }

    #[test]
    fn chunks_550_words_into_two_windows_at_offsets_0_and_450() {
        let chunker = WordWindowChunker::new(500, 50).unwrap();
        let chunks = chunker.chunk(&block(550));

        assert_eq!(chunks.len(), 2);
        assert_eq!(word_count(&chunks[0]), 500);
        assert_eq!(word_count(&chunks[1]), 100);
        assert!(chunks[0].text.starts_with("w0 "));
        assert!(chunks[1].text.starts_with("w450 "));
        assert!(chunks[1].text.ends_with(" w549"));
    }

    #[test]
    fn no_trailing_subwindow_when_first_window_covers_the_block() {
        // 451 words fit in one 500-word window; no 1-word tail chunk.
        let chunker = WordWindowChunker::new(500, 50).unwrap();
        let chunks = chunker.chunk(&block(451));
        assert_eq!(chunks.len(), 1);
        assert_eq!(word_count(&chunks[0]), 451);
    }

    #[test]
    fn block_shorter_than_window_yields_one_chunk() {
        let chunker = WordWindowChunker::new(500, 50).unwrap();
        let chunks = chunker.chunk(&block(7));
        assert_eq!(chunks.len(), 1);
        assert_eq!(word_count(&chunks[0]), 7);
    }

    #[test]
    fn blank_block_yields_no_chunks() {
        let chunker = WordWindowChunker::new(10, 2).unwrap();
        let blank = TextBlock { file_name: "doc.pdf".into(), text: "  \n\t ".into() };
        assert!(chunker.chunk(&blank).is_empty());
    }

    #[test]
    fn consecutive_chunks_overlap_by_configured_word_count() {
        let chunker = WordWindowChunker::new(10, 4).unwrap();
        let chunks = chunker.chunk(&block(30));

        for window in chunks.windows(2) {
            let left: Vec<&str> = window[0].text.split_whitespace().collect();
            let right: Vec<&str> = window[1].text.split_whitespace().collect();
            assert_eq!(&left[left.len() - 4..], &right[..4]);
        }
    }
}
