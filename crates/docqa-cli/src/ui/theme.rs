use ratatui::style::Color;

use super::state::NoticeKind;

/// UI colour palette
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    /// Nord color palette
    Nord,
    /// Dracula color palette
    Dracula,
    /// Gruvbox color palette
    Gruvbox,
    /// Tokyo Night color palette
    #[default]
    TokyoNight,
    /// Catppuccin color palette
    Catppuccin,
    /// Monochrome color palette
    Monochrome,
}

impl Theme {
    /// Every theme, in cycling order
    pub const ALL: [Self; 6] = [
        Self::Nord,
        Self::Dracula,
        Self::Gruvbox,
        Self::TokyoNight,
        Self::Catppuccin,
        Self::Monochrome,
    ];

    /// Gets the next theme in sequence
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Nord => Self::Dracula,
            Self::Dracula => Self::Gruvbox,
            Self::Gruvbox => Self::TokyoNight,
            Self::TokyoNight => Self::Catppuccin,
            Self::Catppuccin => Self::Monochrome,
            Self::Monochrome => Self::Nord,
        }
    }

    /// Name stored in the `[ui]` config section
    pub fn name(self) -> &'static str {
        match self {
            Self::Nord => "Nord",
            Self::Dracula => "Dracula",
            Self::Gruvbox => "Gruvbox",
            Self::TokyoNight => "TokyoNight",
            Self::Catppuccin => "Catppuccin",
            Self::Monochrome => "Monochrome",
        }
    }

    /// Looks a theme up by config name, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|theme| theme.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Gets the focused border color
    pub fn focused_border(self) -> Color {
        match self {
            Self::Nord => Color::Rgb(136, 192, 208),
            Self::Dracula => Color::Rgb(189, 147, 249),
            Self::Gruvbox => Color::Rgb(251, 184, 108),
            Self::TokyoNight => Color::Rgb(122, 162, 247),
            Self::Catppuccin => Color::Rgb(137, 180, 250),
            Self::Monochrome => Color::Rgb(100, 200, 255),
        }
    }

    /// Gets the unfocused border color
    pub fn unfocused_border(self) -> Color {
        match self {
            Self::Nord => Color::Rgb(216, 222, 233),
            Self::Dracula => Color::Rgb(98, 114, 164),
            Self::Gruvbox => Color::Rgb(168, 153, 132),
            Self::TokyoNight => Color::Rgb(86, 95, 137),
            Self::Catppuccin => Color::Rgb(108, 112, 134),
            Self::Monochrome => Color::Rgb(128, 128, 128),
        }
    }

    /// Gets the text color
    pub fn text(self) -> Color {
        match self {
            Self::Nord => Color::Rgb(236, 239, 244),
            Self::Dracula => Color::Rgb(248, 248, 242),
            Self::Gruvbox => Color::Rgb(235, 219, 178),
            Self::TokyoNight => Color::Rgb(192, 202, 245),
            Self::Catppuccin => Color::Rgb(205, 214, 244),
            Self::Monochrome => Color::Rgb(255, 255, 255),
        }
    }

    /// Gets the highlight color
    pub fn highlight(self) -> Color {
        self.focused_border()
    }

    /// Colour for a notice of the given severity
    pub fn notice(self, kind: NoticeKind) -> Color {
        match (self, kind) {
            (_, NoticeKind::Info) => self.text(),
            (Self::Monochrome, _) => Color::Rgb(255, 255, 255),
            (_, NoticeKind::Success) => Color::Rgb(158, 206, 106),
            (_, NoticeKind::Warning) => Color::Rgb(224, 175, 104),
            (_, NoticeKind::Error) => Color::Rgb(247, 118, 142),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_visits_every_theme() {
        let mut theme = Theme::default();
        for _ in 0..Theme::ALL.len() {
            theme = theme.next();
        }
        assert_eq!(theme, Theme::default());
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Theme::from_name("tokyonight"), Some(Theme::TokyoNight));
        assert_eq!(Theme::from_name(Theme::Gruvbox.name()), Some(Theme::Gruvbox));
        assert_eq!(Theme::from_name("solarized"), None);
    }
}
