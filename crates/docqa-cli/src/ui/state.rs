//! Session-level UI state and its phase transitions.
//!
//! The event loop owns a single [`UiState`]. Every user action goes through
//! one of the `submit_*`/`begin_*` methods, and every finished background job
//! is applied with a `finish_*` method, so the phase rules live in one place.

use std::path::PathBuf;
use std::sync::Arc;

use docqa_context::{Answer, DocumentFormat, IngestReport, KnowledgeIndex};
use docqa_core::{ChatTurn, Result, Session};

/// Warning shown while no credential has been entered.
pub const API_KEY_WARNING: &str = "Please enter your OpenAI API key in the sidebar to proceed..";
/// Notice shown after a successful upload.
pub const PROCESSED_MESSAGE: &str = "Document(s) processed successfully!";
/// Status text while documents are processed.
pub const PROCESSING_STATUS: &str = "Processing document(s)...";
/// Status text while an answer is generated.
pub const ANSWERING_STATUS: &str = "Generating answer...";
/// Notice shown when an action arrives while a job is running.
pub const BUSY_MESSAGE: &str = "Please wait for the current operation to finish.";

/// Number of question characters shown in a history label.
const HISTORY_LABEL_CHARS: usize = 50;

/// Interaction phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No credential yet; every document and question control is inert
    NoApiKey,
    /// Credential present, no index
    Idle,
    /// Documents are being processed
    Ingesting,
    /// An index is available for questions
    Ready,
    /// An answer is being generated
    Answering,
}

impl Phase {
    /// Whether a background job is running.
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Ingesting | Self::Answering)
    }
}

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Neutral information
    Info,
    /// Completed action
    Success,
    /// Action needed from the user
    Warning,
    /// Failed action
    Error,
}

/// One-line message shown under the main pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity
    pub kind: NoticeKind,
    /// Message text
    pub text: String,
}

impl Notice {
    fn new(kind: NoticeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// The answer currently displayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerView {
    /// Question that produced the answer
    pub question: String,
    /// Answer text
    pub text: String,
    /// Chunk locations used to ground the answer
    pub sources: Vec<String>,
}

/// Work the event loop must hand to a background job.
#[derive(Debug)]
pub enum JobRequest {
    /// Process the listed files
    Ingest {
        /// Paths to read
        paths: Vec<PathBuf>,
        /// Declared document type
        format: DocumentFormat,
    },
    /// Answer a question against the current index
    Answer {
        /// Question as submitted
        question: String,
        /// Index to search
        index: Arc<KnowledgeIndex>,
        /// Transcript at submission time
        history: Vec<ChatTurn>,
    },
}

/// Main UI state
#[derive(Debug)]
pub struct UiState {
    /// Credential and transcript
    pub session: Session,
    /// Current phase
    pub phase: Phase,
    /// Index built from the last successful upload
    pub index: Option<Arc<KnowledgeIndex>>,
    /// Counts from the last successful upload
    pub last_report: Option<IngestReport>,
    /// Selected document type
    pub file_format: DocumentFormat,
    /// Answer being displayed
    pub answer: Option<AnswerView>,
    /// Latest notice
    pub notice: Option<Notice>,
    /// Selected history entry, counted from the newest
    pub selected_history: Option<usize>,
    /// Vertical scroll offset for the answer pane
    pub answer_scroll: u16,
    /// Spinner frame counter while busy
    pub spinner_tick: usize,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new(Session::new())
    }
}

impl UiState {
    /// Creates state for `session`, in `Idle` if it already holds a credential.
    pub fn new(session: Session) -> Self {
        let phase = if session.has_api_key() {
            Phase::Idle
        } else {
            Phase::NoApiKey
        };
        let notice = (phase == Phase::NoApiKey).then(|| Notice::new(NoticeKind::Warning, API_KEY_WARNING));

        Self {
            session,
            phase,
            index: None,
            last_report: None,
            file_format: DocumentFormat::default(),
            answer: None,
            notice,
            selected_history: None,
            answer_scroll: 0,
            spinner_tick: 0,
        }
    }

    /// Status line text for the current phase.
    pub fn status_text(&self) -> Option<&'static str> {
        match self.phase {
            Phase::Ingesting => Some(PROCESSING_STATUS),
            Phase::Answering => Some(ANSWERING_STATUS),
            Phase::NoApiKey | Phase::Idle | Phase::Ready => None,
        }
    }

    /// Applies a credential submission.
    ///
    /// A non-empty key is stored and unlocks the session; an empty one keeps
    /// the previous credential, if any.
    pub fn submit_api_key(&mut self, input: &str) {
        if self.session.set_api_key(input) {
            if self.phase == Phase::NoApiKey {
                self.phase = Phase::Idle;
            }
            self.notice = Some(Notice::new(NoticeKind::Success, "API key set."));
        } else if !self.session.has_api_key() {
            self.notice = Some(Notice::new(NoticeKind::Warning, API_KEY_WARNING));
        }
    }

    /// Selects the document type for the next upload.
    pub fn set_file_format(&mut self, format: DocumentFormat) {
        if self.phase == Phase::NoApiKey {
            self.notice = Some(Notice::new(NoticeKind::Warning, API_KEY_WARNING));
            return;
        }
        self.file_format = format;
    }

    /// Starts processing `paths`, discarding the current index.
    ///
    /// Returns the job to run, or `None` if the action was rejected.
    pub fn begin_ingest(&mut self, paths: Vec<PathBuf>) -> Option<JobRequest> {
        if !self.admit() {
            return None;
        }
        if paths.is_empty() {
            self.notice = Some(Notice::new(
                NoticeKind::Warning,
                "Enter one or more file paths separated by ';'.",
            ));
            return None;
        }

        self.index = None;
        self.last_report = None;
        self.phase = Phase::Ingesting;
        self.notice = Some(Notice::new(NoticeKind::Info, PROCESSING_STATUS));
        Some(JobRequest::Ingest {
            paths,
            format: self.file_format,
        })
    }

    /// Applies the result of an ingestion job.
    pub fn finish_ingest(&mut self, result: Result<(KnowledgeIndex, IngestReport)>) {
        match result {
            Ok((index, report)) => {
                tracing::info!(chunks = report.chunks, sources = ?index.sources(), "Index ready");
                self.index = Some(Arc::new(index));
                self.last_report = Some(report);
                self.phase = Phase::Ready;
                self.notice = Some(Notice::new(NoticeKind::Success, PROCESSED_MESSAGE));
            }
            Err(err) => {
                tracing::warn!(retryable = err.is_retryable(), "Processing failed: {err}");
                self.index = None;
                self.phase = Phase::Idle;
                self.notice = Some(Notice::new(NoticeKind::Error, format!("Processing failed: {err}")));
            }
        }
    }

    /// Starts answering `question`.
    ///
    /// Without an index the placeholder answer is recorded immediately and
    /// `None` is returned; otherwise the answering job is returned.
    pub fn begin_question(&mut self, question: &str) -> Option<JobRequest> {
        let question = question.trim();
        if question.is_empty() || !self.admit() {
            return None;
        }

        let Some(index) = self.index.as_ref().map(Arc::clone) else {
            let answer = Answer::Placeholder(docqa_context::NO_INDEX_PLACEHOLDER.to_owned());
            self.record_answer(question, answer);
            return None;
        };

        self.phase = Phase::Answering;
        self.notice = None;
        Some(JobRequest::Answer {
            question: question.to_owned(),
            index,
            history: self.session.chat_history().to_vec(),
        })
    }

    /// Applies the result of an answering job for `question`.
    pub fn finish_answer(&mut self, question: &str, result: Result<Answer>) {
        self.phase = if self.index.is_some() {
            Phase::Ready
        } else {
            Phase::Idle
        };

        match result {
            Ok(answer) => self.record_answer(question, answer),
            Err(err) => {
                tracing::warn!(retryable = err.is_retryable(), "Answering failed: {err}");
                self.notice = Some(Notice::new(NoticeKind::Error, format!("Answering failed: {err}")));
            }
        }
    }

    /// Clears the transcript. The index is kept.
    pub fn clear_history(&mut self) {
        if self.phase.is_busy() {
            self.notice = Some(Notice::new(NoticeKind::Warning, BUSY_MESSAGE));
            return;
        }
        self.session.clear_history();
        self.selected_history = None;
        self.notice = Some(Notice::new(NoticeKind::Info, "Chat history cleared."));
    }

    /// Drops the credential, transcript and index, returning to `NoApiKey`.
    pub fn reset_session(&mut self) {
        if self.phase.is_busy() {
            self.notice = Some(Notice::new(NoticeKind::Warning, BUSY_MESSAGE));
            return;
        }
        self.session.reset();
        self.index = None;
        self.last_report = None;
        self.answer = None;
        self.selected_history = None;
        self.answer_scroll = 0;
        self.phase = Phase::NoApiKey;
        self.notice = Some(Notice::new(NoticeKind::Warning, API_KEY_WARNING));
    }

    /// Moves the history selection towards older entries.
    pub fn select_older(&mut self) {
        let len = self.session.chat_history().len();
        if len == 0 {
            return;
        }
        self.selected_history = Some(
            self.selected_history
                .map_or(0, |selected| (selected + 1).min(len - 1)),
        );
    }

    /// Moves the history selection towards newer entries, deselecting past the newest.
    pub fn select_newer(&mut self) {
        self.selected_history = match self.selected_history {
            Some(0) | None => None,
            Some(selected) => Some(selected - 1),
        };
    }

    /// Selected transcript entry.
    pub fn selected_turn(&self) -> Option<&ChatTurn> {
        let history = self.session.chat_history();
        let selected = self.selected_history?;
        let position = history.len().checked_sub(selected + 1)?;
        history.get(position)
    }

    /// History labels, newest first.
    pub fn history_labels(&self) -> Vec<String> {
        self.session
            .chat_history()
            .iter()
            .enumerate()
            .rev()
            .map(|(position, turn)| history_label(position + 1, &turn.question))
            .collect()
    }

    /// Advances the spinner while busy.
    pub fn tick(&mut self) {
        if self.phase.is_busy() {
            self.spinner_tick = self.spinner_tick.wrapping_add(1);
        }
    }

    fn record_answer(&mut self, question: &str, answer: Answer) {
        let sources = match &answer {
            Answer::Generated { sources, .. } => sources.clone(),
            Answer::Placeholder(_) => Vec::new(),
        };
        self.answer = Some(AnswerView {
            question: question.to_owned(),
            text: answer.text().to_owned(),
            sources,
        });
        self.answer_scroll = 0;
        self.selected_history = None;
        self.session.record_turn(answer.into_turn(question));
    }

    /// Gate shared by every document and question action.
    fn admit(&mut self) -> bool {
        match self.phase {
            Phase::NoApiKey => {
                self.notice = Some(Notice::new(NoticeKind::Warning, API_KEY_WARNING));
                false
            }
            Phase::Ingesting | Phase::Answering => {
                self.notice = Some(Notice::new(NoticeKind::Warning, BUSY_MESSAGE));
                false
            }
            Phase::Idle | Phase::Ready => true,
        }
    }
}

/// Formats a history label: `Q{n}: {first 50 chars}...`.
pub fn history_label(number: usize, question: &str) -> String {
    let prefix: String = question.chars().take(HISTORY_LABEL_CHARS).collect();
    format!("Q{number}: {prefix}...")
}

/// Splits the file field on `;` into trimmed, non-empty paths.
pub fn parse_file_field(field: &str) -> Vec<PathBuf> {
    field
        .split(';')
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
        .collect()
}
