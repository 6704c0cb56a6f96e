//! TUI flow tests driving `TuiApp` over a `TestBackend`
#![cfg_attr(
    test,
    allow(
        dead_code,
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::missing_panics_doc,
        clippy::missing_errors_doc,
        clippy::tests_outside_test_module,
        reason = "Test allows"
    )
)]

use std::fs;
use std::sync::Arc;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use docqa_cli::{AppOptions, Field, FocusedPane, Phase, ScriptedEventSource, ServiceFactory, TuiApp};
use docqa_cli::ui::state::API_KEY_WARNING;
use docqa_context::{DocumentFormat, EmbeddingProvider, FakeEmbeddingClient};
use docqa_core::{ApiKey, AppConfig, ModelProvider, Result, Session};
use docqa_providers::MockProvider;
use ratatui::backend::TestBackend;
use tempfile::TempDir;

struct TestServices {
    provider: MockProvider,
}

impl ServiceFactory for TestServices {
    fn embedder(&self, _api_key: &ApiKey) -> Result<Arc<dyn EmbeddingProvider>> {
        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(FakeEmbeddingClient);
        Ok(embedder)
    }

    fn completion(&self, _api_key: &ApiKey) -> Result<Arc<dyn ModelProvider>> {
        let provider: Arc<dyn ModelProvider> = Arc::new(self.provider.clone());
        Ok(provider)
    }
}

fn app_with(provider: &MockProvider, options: AppOptions) -> TuiApp<TestBackend> {
    let services: Arc<dyn ServiceFactory> = Arc::new(TestServices {
        provider: provider.clone(),
    });
    TuiApp::with_backend(
        TestBackend::new(110, 40),
        Box::new(ScriptedEventSource::new()),
        services,
        options,
    )
    .unwrap()
}

fn app(provider: &MockProvider) -> TuiApp<TestBackend> {
    app_with(provider, AppOptions::default())
}

fn press(app: &mut TuiApp<TestBackend>, code: KeyCode) -> bool {
    app.handle_event(&Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
}

fn press_ctrl(app: &mut TuiApp<TestBackend>, character: char) -> bool {
    app.handle_event(&Event::Key(KeyEvent::new(
        KeyCode::Char(character),
        KeyModifiers::CONTROL,
    )))
}

fn type_text(app: &mut TuiApp<TestBackend>, text: &str) {
    for character in text.chars() {
        press(app, KeyCode::Char(character));
    }
}

fn screen(app: &mut TuiApp<TestBackend>) -> String {
    app.render().unwrap();
    let buffer = app.backend().buffer();
    let width = usize::from(buffer.area.width);
    buffer
        .content()
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn enter_key(app: &mut TuiApp<TestBackend>, key: &str) {
    app.set_focused_pane(FocusedPane::ApiKey);
    type_text(app, key);
    press(app, KeyCode::Enter);
}

/// Uploads `text` as a text document and waits for indexing.
async fn upload_text(app: &mut TuiApp<TestBackend>, temp: &TempDir, text: &str) {
    let path = temp.path().join("colors.txt");
    fs::write(&path, text).unwrap();

    app.set_focused_pane(FocusedPane::FileType);
    press(app, KeyCode::Right);
    press(app, KeyCode::Right);
    assert_eq!(app.state().file_format, DocumentFormat::Text);

    press(app, KeyCode::Tab);
    type_text(app, &path.display().to_string());
    press(app, KeyCode::Enter);
    assert_eq!(app.state().phase, Phase::Ingesting);

    app.wait_for_job().await;
}

async fn ask(app: &mut TuiApp<TestBackend>, question: &str) {
    app.set_focused_pane(FocusedPane::Question);
    type_text(app, question);
    press(app, KeyCode::Enter);
    assert_eq!(app.state().phase, Phase::Answering);
    app.wait_for_job().await;
}

#[tokio::test]
async fn test_full_flow_from_key_to_answer() {
    let temp = TempDir::new().unwrap();
    let provider = MockProvider::new().with_response("What color is the sky?", "The sky is blue.");
    let mut app = app(&provider);

    assert_eq!(app.state().phase, Phase::NoApiKey);
    assert_eq!(app.focused_pane(), FocusedPane::ApiKey);
    assert!(screen(&mut app).contains("Please enter your OpenAI API key"));

    enter_key(&mut app, "sk-test");
    assert_eq!(app.state().phase, Phase::Idle);
    assert_eq!(app.focused_pane(), FocusedPane::FileType);

    upload_text(&mut app, &temp, "The sky is blue. Grass is green.").await;
    assert_eq!(app.state().phase, Phase::Ready);
    assert!(screen(&mut app).contains("Document(s) processed successfully!"));

    ask(&mut app, "What color is the sky?").await;
    assert_eq!(app.state().phase, Phase::Ready);
    let history = app.state().session.chat_history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].question, "What color is the sky?");
    assert!(app.input().text(Field::Question).is_empty());

    let calls = provider.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].context.passages_to_string().contains("The sky is blue. Grass is green."));

    let rendered = screen(&mut app);
    assert!(rendered.contains("Q1: What color is the sky?..."));
    assert!(rendered.contains("Sources: colors.txt"));
}

#[tokio::test]
async fn test_controls_are_inert_without_key() {
    let provider = MockProvider::new();
    let mut app = app(&provider);

    app.set_focused_pane(FocusedPane::Files);
    type_text(&mut app, "report.pdf");
    press(&mut app, KeyCode::Enter);
    app.set_focused_pane(FocusedPane::Question);
    type_text(&mut app, "Anything?");
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.state().phase, Phase::NoApiKey);
    assert!(app.state().session.chat_history().is_empty());
    assert_eq!(provider.call_count(), 0);

    enter_key(&mut app, "   ");
    assert_eq!(app.state().phase, Phase::NoApiKey);
}

#[tokio::test]
async fn test_question_before_upload_gets_placeholder() {
    let provider = MockProvider::new();
    let mut app = app(&provider);
    enter_key(&mut app, "sk-test");

    app.set_focused_pane(FocusedPane::Question);
    type_text(&mut app, "Is anything indexed?");
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.state().phase, Phase::Idle);
    assert_eq!(app.state().session.chat_history().len(), 1);
    assert_eq!(provider.call_count(), 0);
    assert!(screen(&mut app).contains(docqa_context::NO_INDEX_PLACEHOLDER));
}

#[tokio::test]
async fn test_clear_history_keeps_index() {
    let temp = TempDir::new().unwrap();
    let provider = MockProvider::new().with_default_response("Green.");
    let mut app = app(&provider);
    enter_key(&mut app, "sk-test");
    upload_text(&mut app, &temp, "Grass is green.").await;
    ask(&mut app, "What color is the grass?").await;
    assert_eq!(app.state().session.chat_history().len(), 1);

    press_ctrl(&mut app, 'l');
    assert!(app.state().session.chat_history().is_empty());
    assert_eq!(app.state().phase, Phase::Ready);
    assert!(app.state().index.is_some());
}

#[tokio::test]
async fn test_reset_session_locks_controls_again() {
    let temp = TempDir::new().unwrap();
    let provider = MockProvider::new().with_default_response("Green.");
    let mut app = app(&provider);
    enter_key(&mut app, "sk-test");
    upload_text(&mut app, &temp, "Grass is green.").await;
    ask(&mut app, "What color is the grass?").await;

    press_ctrl(&mut app, 'r');
    assert_eq!(app.state().phase, Phase::NoApiKey);
    assert!(!app.state().session.has_api_key());
    assert!(app.state().session.chat_history().is_empty());
    assert!(app.state().index.is_none());
    assert_eq!(app.focused_pane(), FocusedPane::ApiKey);
    assert!(screen(&mut app).contains("Please enter your OpenAI API key"));
    assert_eq!(app.state().notice.as_ref().unwrap().text, API_KEY_WARNING);
}

#[tokio::test]
async fn test_failed_upload_returns_to_idle() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("notes.txt");
    fs::write(&path, "plain text").unwrap();

    let provider = MockProvider::new();
    let mut app = app(&provider);
    enter_key(&mut app, "sk-test");

    app.set_focused_pane(FocusedPane::Files);
    type_text(&mut app, &path.display().to_string());
    press(&mut app, KeyCode::Enter);
    app.wait_for_job().await;

    assert_eq!(app.state().phase, Phase::Idle);
    assert!(app.state().index.is_none());
    assert!(screen(&mut app).contains("Processing failed: notes.txt is not a valid PDF file"));
}

#[tokio::test]
async fn test_history_selection_expands_entry() {
    let provider = MockProvider::new();
    let mut app = app(&provider);
    enter_key(&mut app, "sk-test");

    let long_question = "Which chapter of the annual report covers the revenue split?";
    app.set_focused_pane(FocusedPane::Question);
    type_text(&mut app, long_question);
    press(&mut app, KeyCode::Enter);
    type_text(&mut app, "second question");
    press(&mut app, KeyCode::Enter);

    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Down);
    assert_eq!(app.state().selected_turn().unwrap().question, long_question);

    let rendered = screen(&mut app);
    assert!(rendered.contains("▶ Q2: second question..."));
    assert!(rendered.contains("▼ Q1: Which chapter of the annual report covers the reve..."));
    assert!(rendered.contains(&format!("Question: {long_question}")));
    assert!(rendered.contains(&format!("Answer: {}", docqa_context::NO_INDEX_PLACEHOLDER)));
}

#[tokio::test]
async fn test_api_key_is_never_rendered() {
    let provider = MockProvider::new();
    let mut app = app(&provider);
    app.set_focused_pane(FocusedPane::ApiKey);
    type_text(&mut app, "sk-secret");

    let rendered = screen(&mut app);
    assert!(!rendered.contains("sk-secret"));
    assert!(rendered.contains("•••••••••"));
}

#[tokio::test]
async fn test_quit_keys() {
    let provider = MockProvider::new();
    let mut app = app(&provider);
    assert!(!press(&mut app, KeyCode::Char('x')));
    assert!(press(&mut app, KeyCode::Esc));
    assert!(press_ctrl(&mut app, 'q'));
    assert!(press_ctrl(&mut app, 'c'));
}

#[tokio::test]
async fn test_theme_cycle_is_saved() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("config.toml");
    let provider = MockProvider::new();
    let mut app = app_with(
        &provider,
        AppOptions {
            config_path: Some(config_path.clone()),
            ..AppOptions::default()
        },
    );

    let before = app.theme();
    press_ctrl(&mut app, 't');
    assert_eq!(app.theme(), before.next());

    let saved = AppConfig::load_from_file(&config_path).unwrap();
    assert_eq!(saved.ui.theme, before.next().name());
}

#[tokio::test]
async fn test_cli_options_prefill_fields() {
    let provider = MockProvider::new();
    let mut session = Session::new();
    session.set_api_key("sk-env");
    let app = app_with(
        &provider,
        AppOptions {
            session,
            file_format: DocumentFormat::Docx,
            files: "a.docx; b.docx".to_owned(),
            ..AppOptions::default()
        },
    );

    assert_eq!(app.state().phase, Phase::Idle);
    assert_eq!(app.state().file_format, DocumentFormat::Docx);
    assert_eq!(app.input().text(Field::Files), "a.docx; b.docx");
    assert_eq!(app.focused_pane(), FocusedPane::Files);
}

#[tokio::test]
async fn test_event_loop_stops_on_quit() {
    let provider = MockProvider::new();
    let services: Arc<dyn ServiceFactory> = Arc::new(TestServices {
        provider: provider.clone(),
    });
    let source = ScriptedEventSource::new()
        .text("sk-test")
        .enter()
        .key(KeyCode::Char('q'), KeyModifiers::CONTROL)
        .text("ignored");
    let mut app = TuiApp::with_backend(
        TestBackend::new(110, 40),
        Box::new(source),
        services,
        AppOptions::default(),
    )
    .unwrap();

    app.run_event_loop().await.unwrap();
    assert_eq!(app.state().phase, Phase::Idle);
    assert!(screen(&mut app).contains("API key set."));
}
