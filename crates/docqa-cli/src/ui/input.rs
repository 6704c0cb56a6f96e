use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::{Modifier, Style};
use tui_textarea::TextArea;

/// Character shown in place of each credential character
const MASK_CHAR: char = '\u{2022}';

/// Single-line text fields of the interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Masked credential field in the sidebar
    ApiKey,
    /// `;`-separated document paths
    Files,
    /// Question to ask
    Question,
}

/// Manages the text fields and their editing state
pub struct InputManager {
    api_key: TextArea<'static>,
    files: TextArea<'static>,
    question: TextArea<'static>,
}

fn single_line(placeholder: &str) -> TextArea<'static> {
    let mut area = TextArea::default();
    area.set_cursor_line_style(Style::default());
    area.set_cursor_style(Style::default().add_modifier(Modifier::REVERSED));
    area.set_placeholder_text(placeholder.to_owned());
    area
}

impl InputManager {
    /// Gets a reference to a field's text area
    pub fn area(&self, field: Field) -> &TextArea<'static> {
        match field {
            Field::ApiKey => &self.api_key,
            Field::Files => &self.files,
            Field::Question => &self.question,
        }
    }

    fn area_mut(&mut self, field: Field) -> &mut TextArea<'static> {
        match field {
            Field::ApiKey => &mut self.api_key,
            Field::Files => &mut self.files,
            Field::Question => &mut self.question,
        }
    }

    /// Current text of a field
    pub fn text(&self, field: Field) -> String {
        self.area(field).lines().join("")
    }

    /// Replaces the text of a field
    pub fn set_text(&mut self, field: Field, text: &str) {
        self.clear(field);
        self.area_mut(field).insert_str(text);
    }

    /// Clears a field
    pub fn clear(&mut self, field: Field) {
        let area = self.area_mut(field);
        area.select_all();
        area.cut();
    }

    /// Forwards a key to a field's editor.
    ///
    /// Enter is never forwarded, so fields stay single-line.
    pub fn handle_key(&mut self, field: Field, key: &KeyEvent) {
        if key.code == KeyCode::Enter
            || (key.code == KeyCode::Char('m') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            return;
        }
        self.area_mut(field).input(Event::Key(*key));
    }
}

impl Default for InputManager {
    fn default() -> Self {
        let mut api_key = single_line("sk-...");
        api_key.set_mask_char(MASK_CHAR);

        Self {
            api_key,
            files: single_line("report.pdf; notes.pdf"),
            question: single_line("Ask a question about your documents"),
        }
    }
}
