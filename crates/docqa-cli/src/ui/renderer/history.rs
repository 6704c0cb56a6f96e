//! Chat history list, newest entry first

use core::ops::Range;

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use super::super::state::UiState;
use super::super::theme::Theme;
use super::helpers::{expansion_indicator, selection_style};

/// Indentation of an expanded entry's body
const BODY_INDENT: &str = "    ";

/// History pane content
pub struct HistoryView {
    /// Lines to draw, newest entry first
    pub lines: Vec<Line<'static>>,
    /// Lines taken by the selected label and its expansion
    pub selected: Option<Range<usize>>,
}

/// Builds the history lines, expanding the selected entry below its label
pub fn build_history(state: &UiState, theme: Theme) -> HistoryView {
    let labels = state.history_labels();
    if labels.is_empty() {
        return HistoryView {
            lines: vec![Line::from(Span::styled(
                "No questions asked yet",
                Style::default()
                    .fg(theme.unfocused_border())
                    .add_modifier(Modifier::ITALIC),
            ))],
            selected: None,
        };
    }

    let selected_turn = state.selected_turn();
    let mut lines = Vec::with_capacity(labels.len());
    let mut selected = None;

    for (offset, label) in labels.into_iter().enumerate() {
        let is_selected = state.selected_history == Some(offset);
        let start = lines.len();
        lines.push(Line::from(vec![
            Span::raw(expansion_indicator(is_selected)),
            Span::styled(label, selection_style(is_selected, theme)),
        ]));

        if is_selected && let Some(turn) = selected_turn {
            lines.push(body_line("Question: ", &turn.question, theme));
            let mut answer_lines = turn.answer.lines();
            lines.push(body_line("Answer: ", answer_lines.next().unwrap_or_default(), theme));
            for answer_line in answer_lines {
                lines.push(Line::from(Span::styled(
                    format!("{BODY_INDENT}{answer_line}"),
                    Style::default().fg(theme.text()),
                )));
            }
            selected = Some(start..lines.len());
        }
    }

    HistoryView { lines, selected }
}

fn body_line(label: &'static str, text: &str, theme: Theme) -> Line<'static> {
    let style = Style::default().fg(theme.text());
    Line::from(vec![
        Span::raw(BODY_INDENT),
        Span::styled(label, style.add_modifier(Modifier::BOLD)),
        Span::styled(text.to_owned(), style),
    ])
}
