//! Integration tests for the upload-to-index pipeline.

#[cfg(test)]
mod tests {
    use crate::support::KeywordEmbedder;
    use docqa_context::{
        ChunkConfig, DocumentFormat, EmbeddingProvider, UploadedFile, load_documents, process_documents,
        split_documents,
    };
    use docqa_core::Error;
    use std::fs;
    use std::io::{Cursor, Write as _};
    use std::sync::Arc;
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    fn docx(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|text| format!("<w:p><w:r><w:t>{text}</w:t></w:r></w:p>"))
            .collect();
        let xml = format!(
            r#"<?xml version="1.0"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        );

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        writer.start_file("word/document.xml", options).unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    /// Tests that a long text file is chunked within bounds and indexed whole.
    #[tokio::test]
    async fn test_long_text_is_chunked_and_indexed() {
        let paragraph = "The sky is blue over the sea and the grass is green. ".repeat(9);
        let text = vec![paragraph.trim(); 12].join("\n\n");
        let embedder = Arc::new(KeywordEmbedder::default());

        let (index, report) = process_documents(
            vec![UploadedFile::new("long.txt", text.clone())],
            DocumentFormat::Text,
            &ChunkConfig::default(),
            Arc::clone(&embedder) as Arc<dyn EmbeddingProvider>,
        )
        .await
        .unwrap();

        assert_eq!(report.documents, 1);
        assert!(report.chunks > 1);
        assert_eq!(index.len(), report.chunks);

        let batches = embedder.batches.lock().unwrap();
        let indexed: Vec<&String> = batches.iter().flatten().collect();
        assert_eq!(indexed.len(), report.chunks);
        assert!(indexed.iter().all(|chunk| chunk.chars().count() <= 1000));

        let strip = |value: &str| value.split_whitespace().collect::<String>();
        let rebuilt: String = indexed.iter().map(|chunk| chunk.as_str()).collect();
        assert_eq!(strip(&rebuilt), strip(&text));
    }

    /// Tests DOCX extraction feeding the chunker.
    #[test]
    fn test_docx_paragraphs_become_chunks() {
        let bytes = docx(&["The sky is blue.", "Grass is green &amp; soft."]);
        let documents =
            load_documents(&[UploadedFile::new("facts.docx", bytes)], DocumentFormat::Docx).unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].text, "The sky is blue.\n\nGrass is green & soft.");

        let config = ChunkConfig {
            chunk_size: 20,
            ..ChunkConfig::default()
        };
        let chunks = split_documents(&documents, &config);
        let contents: Vec<_> = chunks.iter().map(|chunk| chunk.content.as_str()).collect();
        assert_eq!(contents, vec!["The sky is blue.", "Grass is green & sof", "t."]);
    }

    /// Tests that a text file declared as DOCX is rejected before parsing.
    #[tokio::test]
    async fn test_declared_format_must_match() {
        let error = process_documents(
            vec![UploadedFile::new("notes.txt", "just text")],
            DocumentFormat::Docx,
            &ChunkConfig::default(),
            Arc::new(KeywordEmbedder::default()),
        )
        .await
        .unwrap_err();

        assert_eq!(error.to_string(), "notes.txt is not a valid DOCX file");
    }

    /// Tests that embedding failures surface as embedding errors.
    #[tokio::test]
    async fn test_embedding_failure_propagates() {
        let error = process_documents(
            vec![UploadedFile::new("sky.txt", "The sky is blue.")],
            DocumentFormat::Text,
            &ChunkConfig::default(),
            Arc::new(KeywordEmbedder::failing("invalid api key")),
        )
        .await
        .unwrap_err();

        assert!(matches!(error, Error::Embedding(message) if message == "invalid api key"));
    }

    /// Tests reading uploads from disk.
    #[tokio::test]
    async fn test_upload_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "The sky is blue.").unwrap();

        let upload = UploadedFile::from_path(&path).await.unwrap();
        assert_eq!(upload.name, "notes.txt");
        assert_eq!(upload.bytes, b"The sky is blue.");

        let missing = dir.path().join("missing.txt");
        let error = UploadedFile::from_path(&missing).await.unwrap_err();
        assert!(matches!(error, Error::Read { path, .. } if path == missing));
    }
}
