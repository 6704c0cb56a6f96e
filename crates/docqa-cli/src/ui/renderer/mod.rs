//! UI rendering module
//!
//! Draws the sidebar (header, credential field, key help) and the main pane
//! (file type, file paths, question, status, answer, history).

mod helpers;
mod history;

use docqa_context::DocumentFormat;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::input::{Field, InputManager};
use super::layout;
use super::state::UiState;
use super::theme::Theme;

/// Heading shown at the top of the sidebar
pub const SIDEBAR_HEADER: &str = "NOVELTY TECHNOLOGY";
/// Main pane title
pub const APP_TITLE: &str = "Talk to your data";

const FIELD_HEIGHT: u16 = 3;
const MIN_ANSWER_HEIGHT: u16 = 5;

/// Handles rendering of the TUI
pub struct Renderer {
    theme: Theme,
}

/// Rendering context with all necessary references
pub struct RenderCtx<'ctx> {
    /// UI state reference
    pub state: &'ctx UiState,
    /// Input manager reference
    pub input: &'ctx InputManager,
    /// Currently focused pane
    pub focused: FocusedPane,
    /// Layout cache to populate with actual rendered dimensions
    pub layout_cache: &'ctx mut layout::LayoutCache,
}

impl Renderer {
    /// Creates a new Renderer with the specified theme
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// Gets the current theme
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Sets the theme
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Renders the entire UI
    pub fn render(&self, frame: &mut Frame, ctx: &mut RenderCtx<'_>) {
        let area = frame.area();
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(layout::sidebar_width(area.width)),
                Constraint::Min(20),
            ])
            .split(area);

        self.render_sidebar(frame, columns[0], ctx);
        self.render_main(frame, columns[1], ctx);
    }

    fn render_sidebar(&self, frame: &mut Frame, area: Rect, ctx: &RenderCtx<'_>) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(FIELD_HEIGHT),
                Constraint::Length(FIELD_HEIGHT),
                Constraint::Min(0),
            ])
            .split(area);

        let header = Paragraph::new(SIDEBAR_HEADER)
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(self.theme.highlight())
                    .add_modifier(Modifier::BOLD),
            )
            .block(Block::default().borders(Borders::BOTTOM).border_style(
                Style::default().fg(self.theme.unfocused_border()),
            ));
        frame.render_widget(header, rows[0]);

        self.render_field(frame, rows[1], ctx, Field::ApiKey, "OpenAI API key", FocusedPane::ApiKey);

        let mut lines = Vec::new();
        if let Some(report) = ctx.state.last_report {
            lines.push(Line::from(Span::styled(
                format!("Indexed {} chunk(s) from {} file(s)", report.chunks, report.files),
                Style::default().fg(self.theme.text()),
            )));
            lines.push(Line::default());
        }
        let hint_style = Style::default().fg(self.theme.unfocused_border());
        for hint in [
            "Tab/Shift+Tab  move focus",
            "Enter          submit field",
            "←/→/Space      file type",
            "↑/↓            history",
            "PgUp/PgDn      scroll answer",
            "Ctrl+L         clear history",
            "Ctrl+R         reset session",
            "Ctrl+T         cycle theme",
            "Esc/Ctrl+Q     quit",
        ] {
            lines.push(Line::from(Span::styled(hint, hint_style)));
        }
        let help = Paragraph::new(lines)
            .block(helpers::pane_block("Keys", false, self.theme))
            .wrap(Wrap { trim: false });
        frame.render_widget(help, rows[2]);
    }

    fn render_main(&self, frame: &mut Frame, area: Rect, ctx: &mut RenderCtx<'_>) {
        let history_view = history::build_history(ctx.state, self.theme);
        let history_height = u16::try_from(history_view.lines.len())
            .unwrap_or(u16::MAX)
            .saturating_add(2)
            .clamp(FIELD_HEIGHT, (area.height / 3).max(FIELD_HEIGHT));

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(FIELD_HEIGHT),
                Constraint::Length(FIELD_HEIGHT),
                Constraint::Length(FIELD_HEIGHT),
                Constraint::Length(1),
                Constraint::Min(MIN_ANSWER_HEIGHT),
                Constraint::Length(history_height),
            ])
            .split(area);

        let title = Paragraph::new(APP_TITLE).alignment(Alignment::Center).style(
            Style::default()
                .fg(self.theme.text())
                .add_modifier(Modifier::BOLD),
        );
        frame.render_widget(title, rows[0]);

        self.render_file_type(frame, rows[1], ctx);
        self.render_field(frame, rows[2], ctx, Field::Files, "Files (separate with ;)", FocusedPane::Files);
        self.render_field(frame, rows[3], ctx, Field::Question, "Question", FocusedPane::Question);
        self.render_status(frame, rows[4], ctx.state);

        ctx.layout_cache.set_answer_area(rows[5].width, rows[5].height);
        self.render_answer(frame, rows[5], ctx);

        self.render_history(frame, rows[6], ctx.focused, history_view);
    }

    fn render_history(
        &self,
        frame: &mut Frame,
        area: Rect,
        focused: FocusedPane,
        view: history::HistoryView,
    ) {
        let width = area.width.saturating_sub(4);
        let scroll = view.selected.as_ref().map_or(0, |selected| {
            let rows: Vec<u16> = view
                .lines
                .iter()
                .map(|line| layout::wrapped_line_count(&line.to_string(), width).max(1))
                .collect();
            layout::scroll_to_selection(&rows, selected, area.height.saturating_sub(2))
        });

        let history = Paragraph::new(view.lines)
            .block(helpers::pane_block(
                "Chat History",
                focused == FocusedPane::History,
                self.theme,
            ))
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0));
        frame.render_widget(history, area);
    }

    fn render_field(
        &self,
        frame: &mut Frame,
        area: Rect,
        ctx: &RenderCtx<'_>,
        field: Field,
        title: &str,
        pane: FocusedPane,
    ) {
        let focused = ctx.focused == pane;
        let mut text_area = ctx.input.area(field).clone();
        text_area.set_block(helpers::pane_block(title, focused, self.theme));
        text_area.set_style(Style::default().fg(self.theme.text()));
        text_area.set_cursor_style(if focused {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        });

        frame.render_widget(&text_area, area);
    }

    fn render_file_type(&self, frame: &mut Frame, area: Rect, ctx: &RenderCtx<'_>) {
        let focused = ctx.focused == FocusedPane::FileType;
        let mut spans = Vec::with_capacity(DocumentFormat::ALL.len() * 2);
        for format in DocumentFormat::ALL {
            let is_selected = format == ctx.state.file_format;
            let marker = if is_selected { "(•) " } else { "( ) " };
            spans.push(Span::styled(
                format!("{marker}{}", format.label()),
                helpers::selection_style(is_selected, self.theme),
            ));
            spans.push(Span::raw("   "));
        }

        let selector = Paragraph::new(Line::from(spans))
            .block(helpers::pane_block("Select the file type", focused, self.theme));
        frame.render_widget(selector, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, state: &UiState) {
        let line = if let Some(status) = state.status_text() {
            Line::from(Span::styled(
                format!(" {} {status}", helpers::spinner_frame(state.spinner_tick)),
                Style::default().fg(self.theme.highlight()),
            ))
        } else if let Some(notice) = &state.notice {
            Line::from(Span::styled(
                format!(" {}", notice.text),
                Style::default().fg(self.theme.notice(notice.kind)),
            ))
        } else {
            Line::default()
        };

        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_answer(&self, frame: &mut Frame, area: Rect, ctx: &RenderCtx<'_>) {
        let text = answer_text(ctx.state);
        let scroll = ctx
            .state
            .answer_scroll
            .min(layout::max_answer_scroll(ctx.layout_cache, &text));

        let answer = Paragraph::new(text)
            .style(Style::default().fg(self.theme.text()))
            .block(helpers::pane_block("Answer", false, self.theme))
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0));
        frame.render_widget(answer, area);
    }
}

/// Text shown in the answer pane
pub fn answer_text(state: &UiState) -> String {
    let Some(answer) = &state.answer else {
        return "Process your documents, then ask a question about them.".to_owned();
    };

    let mut text = format!("Q: {}\n\n{}", answer.question, answer.text);
    if !answer.sources.is_empty() {
        text.push_str("\n\nSources: ");
        text.push_str(&answer.sources.join(", "));
    }
    text
}

/// Focused pane identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusedPane {
    /// Credential field in the sidebar
    ApiKey,
    /// Document type selector
    FileType,
    /// File path field
    Files,
    /// Question field
    #[default]
    Question,
    /// Chat history list
    History,
}

impl FocusedPane {
    /// Pane after this one in Tab order
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::ApiKey => Self::FileType,
            Self::FileType => Self::Files,
            Self::Files => Self::Question,
            Self::Question => Self::History,
            Self::History => Self::ApiKey,
        }
    }

    /// Pane before this one in Tab order
    #[must_use]
    pub fn previous(self) -> Self {
        match self {
            Self::ApiKey => Self::History,
            Self::FileType => Self::ApiKey,
            Self::Files => Self::FileType,
            Self::Question => Self::Files,
            Self::History => Self::Question,
        }
    }

    /// Text field edited while this pane has focus
    pub fn field(self) -> Option<Field> {
        match self {
            Self::ApiKey => Some(Field::ApiKey),
            Self::Files => Some(Field::Files),
            Self::Question => Some(Field::Question),
            Self::FileType | Self::History => None,
        }
    }
}
