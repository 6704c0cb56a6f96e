//! End-to-end question answering over an indexed upload.

#[cfg(test)]
mod tests {
    use crate::support::KeywordEmbedder;
    use docqa_context::{
        Answer, ChunkConfig, DocumentFormat, KnowledgeIndex, NO_INDEX_PLACEHOLDER, QaOrchestrator,
        Retriever as _, UploadedFile, process_documents,
    };
    use docqa_core::{Error, Session};
    use docqa_providers::MockProvider;
    use std::sync::Arc;

    async fn sky_and_grass_index() -> KnowledgeIndex {
        let (index, _) = process_documents(
            vec![UploadedFile::new(
                "facts.txt",
                "The sky is blue.\n\nGrass is green.",
            )],
            DocumentFormat::Text,
            &ChunkConfig {
                chunk_size: 20,
                ..ChunkConfig::default()
            },
            Arc::new(KeywordEmbedder::default()),
        )
        .await
        .unwrap();
        index
    }

    /// Tests that retrieval puts the relevant chunk first.
    #[tokio::test]
    async fn test_retrieval_ranks_relevant_chunk_first() {
        let index = sky_and_grass_index().await;
        assert_eq!(index.len(), 2);

        let results = index.retrieve("What color is the grass?", 4).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.content, "Grass is green.");
    }

    /// Tests the full upload, ask and follow-up flow against a mock model.
    #[tokio::test]
    async fn test_answers_grow_history_by_one() {
        let index = sky_and_grass_index().await;
        let provider = MockProvider::new()
            .with_response("What color is the sky?", "Blue")
            .with_response("Follow Up Input: And the grass", "What color is the grass?")
            .with_response("Question: What color is the grass?", "Green");
        let qa = QaOrchestrator::new(Arc::new(provider.clone()));
        let mut session = Session::new();

        let answer = qa
            .answer(Some(&index), "What color is the sky?", session.chat_history())
            .await
            .unwrap();
        assert_eq!(answer.text(), "Blue");
        session.record_turn(answer.into_turn("What color is the sky?"));
        assert_eq!(session.chat_history().len(), 1);

        let answer = qa
            .answer(Some(&index), "And the grass?", session.chat_history())
            .await
            .unwrap();
        assert_eq!(answer.text(), "Green");
        session.record_turn(answer.into_turn("And the grass?"));

        let history = session.chat_history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].question, "And the grass?");
        assert_eq!(history[1].answer, "Green");

        // first answer, condense step, follow-up answer
        let calls = provider.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[2].context.passages[0].content, "Grass is green.");
    }

    /// Tests that no model call happens before a document is processed.
    #[tokio::test]
    async fn test_question_before_upload_gets_placeholder() {
        let provider = MockProvider::new().with_default_response("should not be used");
        let qa = QaOrchestrator::new(Arc::new(provider.clone()));

        let answer = qa.answer(None, "What color is the sky?", &[]).await.unwrap();
        assert_eq!(answer, Answer::Placeholder(NO_INDEX_PLACEHOLDER.to_owned()));
        assert_eq!(provider.call_count(), 0);
    }

    /// Tests that clearing history keeps the index usable.
    #[tokio::test]
    async fn test_clear_history_keeps_index() {
        let index = sky_and_grass_index().await;
        let provider = MockProvider::new().with_default_response("Blue");
        let qa = QaOrchestrator::new(Arc::new(provider.clone()));
        let mut session = Session::new();

        let answer = qa
            .answer(Some(&index), "What color is the sky?", session.chat_history())
            .await
            .unwrap();
        session.record_turn(answer.into_turn("What color is the sky?"));
        session.clear_history();
        assert!(session.chat_history().is_empty());

        let answer = qa
            .answer(Some(&index), "What color is the sky?", session.chat_history())
            .await
            .unwrap();
        assert!(matches!(answer, Answer::Generated { .. }));
        assert_eq!(provider.call_count(), 2);
    }

    /// Tests that a failing model leaves the caller's history untouched.
    #[tokio::test]
    async fn test_completion_failure_is_reported() {
        let index = sky_and_grass_index().await;
        let provider = MockProvider::new().with_failure("rate limit exceeded");
        let qa = QaOrchestrator::new(Arc::new(provider));
        let session = Session::new();

        let error = qa
            .answer(Some(&index), "What color is the sky?", session.chat_history())
            .await
            .unwrap_err();
        assert!(matches!(error, Error::Completion(_)));
        assert!(session.chat_history().is_empty());
    }
}
