//! Helper utilities for rendering UI components

use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Padding};

use super::super::theme::Theme;

/// Spinner frames shown in the status line while a job runs
const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Spinner frame for tick `tick`
pub fn spinner_frame(tick: usize) -> &'static str {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

/// Border style for a pane
pub fn border_style(focused: bool, theme: Theme) -> Style {
    let color = if focused {
        theme.focused_border()
    } else {
        theme.unfocused_border()
    };
    Style::default().fg(color)
}

/// Bordered, titled block used by every pane
pub fn pane_block(title: &str, focused: bool, theme: Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(format!("─── {title} "))
        .border_style(border_style(focused, theme))
        .padding(Padding::horizontal(1))
}

/// Calculates the text style based on selection state
pub fn selection_style(is_selected: bool, theme: Theme) -> Style {
    if is_selected {
        Style::default()
            .fg(theme.highlight())
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text())
    }
}

/// Expansion marker for a history entry
pub fn expansion_indicator(is_expanded: bool) -> &'static str {
    if is_expanded { "▼ " } else { "▶ " }
}
