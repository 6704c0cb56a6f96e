//! Fixed-size character chunking with no overlap.

use core::mem;

use docqa_core::config::ChunkingConfig;
use docqa_core::Passage;

use crate::ingest::SourceDocument;

/// Default chunk size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
/// Default piece separator.
pub const DEFAULT_SEPARATOR: &str = "\n\n";

/// Chunking parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkConfig {
    /// Maximum chunk length in characters
    pub chunk_size: usize,
    /// Separator used to break documents into pieces before merging
    pub separator: String,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            separator: DEFAULT_SEPARATOR.to_owned(),
        }
    }
}

impl From<&ChunkingConfig> for ChunkConfig {
    fn from(config: &ChunkingConfig) -> Self {
        Self {
            chunk_size: config.chunk_size.max(1),
            separator: config.separator.clone(),
        }
    }
}

/// A bounded slice of a source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChunk {
    /// Uploaded file the chunk came from
    pub source: String,
    /// Page of the source document, if paged
    pub page: Option<usize>,
    /// Position in the chunk sequence
    pub index: usize,
    /// Chunk text
    pub content: String,
}

impl DocumentChunk {
    /// Converts the chunk into a prompt passage.
    #[must_use]
    pub fn to_passage(&self) -> Passage {
        Passage::new(self.source.clone(), self.page, self.content.clone())
    }
}

/// Splits documents into chunks of at most `config.chunk_size` characters.
///
/// Pieces between separators are merged greedily; a piece longer than the
/// chunk size is cut at character boundaries. Chunks never span documents.
#[must_use]
pub fn split_documents(documents: &[SourceDocument], config: &ChunkConfig) -> Vec<DocumentChunk> {
    let mut chunks = Vec::new();

    for document in documents {
        for content in split_text(&document.text, config) {
            chunks.push(DocumentChunk {
                source: document.source.clone(),
                page: document.page,
                index: chunks.len(),
                content,
            });
        }
    }

    tracing::debug!(
        documents = documents.len(),
        chunks = chunks.len(),
        chunk_size = config.chunk_size,
        "Split documents"
    );
    chunks
}

fn split_text(text: &str, config: &ChunkConfig) -> Vec<String> {
    let size = config.chunk_size.max(1);
    let separator = config.separator.as_str();
    let separator_len = separator.chars().count();

    let pieces: Vec<&str> = if separator.is_empty() {
        vec![text.trim()]
    } else {
        text.split(separator).map(str::trim).collect()
    };

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for piece in pieces.into_iter().filter(|piece| !piece.is_empty()) {
        let piece_len = piece.chars().count();

        if piece_len > size {
            flush(&mut chunks, &mut current, &mut current_len);
            chunks.extend(hard_split(piece, size));
            continue;
        }

        if current.is_empty() {
            current.push_str(piece);
            current_len = piece_len;
        } else if current_len + separator_len + piece_len <= size {
            current.push_str(separator);
            current.push_str(piece);
            current_len += separator_len + piece_len;
        } else {
            flush(&mut chunks, &mut current, &mut current_len);
            current.push_str(piece);
            current_len = piece_len;
        }
    }
    flush(&mut chunks, &mut current, &mut current_len);

    chunks
}

fn flush(chunks: &mut Vec<String>, current: &mut String, current_len: &mut usize) {
    if !current.is_empty() {
        chunks.push(mem::take(current));
    }
    *current_len = 0;
}

fn hard_split(piece: &str, size: usize) -> Vec<String> {
    let chars: Vec<char> = piece.chars().collect();
    chars
        .chunks(size)
        .map(|window| window.iter().collect::<String>().trim().to_owned())
        .filter(|chunk| !chunk.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(source: &str, text: &str) -> SourceDocument {
        SourceDocument {
            source: source.to_owned(),
            page: None,
            text: text.to_owned(),
        }
    }

    fn non_whitespace(text: &str) -> String {
        text.chars().filter(|ch| !ch.is_whitespace()).collect()
    }

    fn config(chunk_size: usize) -> ChunkConfig {
        ChunkConfig {
            chunk_size,
            ..ChunkConfig::default()
        }
    }

    #[test]
    fn test_small_document_is_one_chunk() {
        let chunks = split_documents(&[document("a.txt", "The sky is blue.")], &ChunkConfig::default());
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "The sky is blue.");
        assert_eq!(chunks[0].source, "a.txt");
        assert_eq!(chunks[0].index, 0);
    }

    #[test]
    fn test_2500_characters_make_three_chunks() {
        let text = "x".repeat(2500);
        let chunks = split_documents(&[document("a.txt", &text)], &ChunkConfig::default());

        let lengths: Vec<_> = chunks.iter().map(|chunk| chunk.content.chars().count()).collect();
        assert_eq!(lengths, vec![1000, 1000, 500]);
    }

    #[test]
    fn test_paragraphs_merge_up_to_chunk_size() {
        let text = "aaaa\n\nbbbb\n\ncccc\n\ndddd";
        let chunks = split_documents(&[document("a.txt", text)], &config(10));

        let contents: Vec<_> = chunks.iter().map(|chunk| chunk.content.as_str()).collect();
        assert_eq!(contents, vec!["aaaa\n\nbbbb", "cccc\n\ndddd"]);
    }

    #[test]
    fn test_oversized_piece_is_hard_split() {
        let text = "short\n\n0123456789abcdefghij\n\ntail";
        let chunks = split_documents(&[document("a.txt", text)], &config(8));

        let contents: Vec<_> = chunks.iter().map(|chunk| chunk.content.as_str()).collect();
        assert_eq!(contents, vec!["short", "01234567", "89abcdef", "ghij", "tail"]);
    }

    #[test]
    fn test_multibyte_characters_split_at_char_boundaries() {
        let text = "é".repeat(25);
        let chunks = split_documents(&[document("a.txt", &text)], &config(10));
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|chunk| chunk.content.chars().count() <= 10));
    }

    #[test]
    fn test_chunks_never_span_documents() {
        let documents = vec![document("a.txt", "first"), document("b.txt", "second")];
        let chunks = split_documents(&documents, &ChunkConfig::default());

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].source, "a.txt");
        assert_eq!(chunks[1].source, "b.txt");
        assert_eq!(chunks[1].index, 1);
    }

    #[test]
    fn test_page_numbers_are_carried() {
        let documents = vec![SourceDocument {
            source: "r.pdf".to_owned(),
            page: Some(3),
            text: "page three".to_owned(),
        }];
        let chunks = split_documents(&documents, &ChunkConfig::default());
        assert_eq!(chunks[0].page, Some(3));
        assert_eq!(chunks[0].to_passage().location(), "r.pdf p.3");
    }

    #[test]
    fn test_length_bound_and_reconstruction() {
        let mut text = String::new();
        for paragraph in 0..40 {
            let words = (paragraph * 7) % 60 + 1;
            for word in 0..words {
                text.push_str(&format!("word{paragraph}_{word} "));
            }
            text.push_str(if paragraph % 3 == 0 { "\n\n" } else { "\n" });
        }
        text.push_str(&"z".repeat(450));

        for size in [50, 100, 333, 1000] {
            let chunks = split_documents(&[document("a.txt", &text)], &config(size));
            assert!(chunks.iter().all(|chunk| chunk.content.chars().count() <= size));

            let rebuilt: String = chunks.iter().map(|chunk| chunk.content.as_str()).collect();
            assert_eq!(non_whitespace(&rebuilt), non_whitespace(&text));
        }
    }

    #[test]
    fn test_whitespace_only_document_has_no_chunks() {
        let chunks = split_documents(&[document("a.txt", " \n\n \n\n")], &ChunkConfig::default());
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_from_chunking_config() {
        let settings = ChunkingConfig {
            chunk_size: 250,
            separator: "\n".to_owned(),
        };
        let config = ChunkConfig::from(&settings);
        assert_eq!(config.chunk_size, 250);
        assert_eq!(config.separator, "\n");
    }
}
