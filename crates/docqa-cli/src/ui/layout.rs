//! Layout calculation utilities for UI components
//!
//! Rendered areas are cached so scroll calculations made by the event loop use
//! the same dimensions the renderer drew with.

use core::ops::Range;

use unicode_width::UnicodeWidthStr as _;

/// Minimum sidebar width in columns
const MIN_SIDEBAR_WIDTH: u16 = 24;
/// Maximum sidebar width in columns
const MAX_SIDEBAR_WIDTH: u16 = 36;
/// Sidebar share of the terminal width
const SIDEBAR_WIDTH_PERCENT: u16 = 25;

/// Cache of actual rendered layout dimensions
#[derive(Debug, Clone, Default)]
pub struct LayoutCache {
    /// Answer pane rectangle (content + borders), as `(width, height)`
    pub answer_area: Option<(u16, u16)>,
}

impl LayoutCache {
    /// Creates a new empty layout cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the rendered answer pane size
    pub fn set_answer_area(&mut self, width: u16, height: u16) {
        self.answer_area = Some((width, height));
    }

    /// Answer viewport height excluding borders
    pub fn answer_viewport_height(&self) -> u16 {
        self.answer_area
            .map_or(0, |(_, height)| height.saturating_sub(2))
    }

    /// Answer viewport width excluding borders and horizontal padding
    pub fn answer_viewport_width(&self) -> u16 {
        self.answer_area
            .map_or(0, |(width, _)| width.saturating_sub(4))
    }
}

/// Sidebar width for a terminal `total_width` columns wide
pub fn sidebar_width(total_width: u16) -> u16 {
    (total_width * SIDEBAR_WIDTH_PERCENT / 100).clamp(MIN_SIDEBAR_WIDTH, MAX_SIDEBAR_WIDTH)
}

/// Number of rows `text` occupies when wrapped at `width` columns
pub fn wrapped_line_count(text: &str, width: u16) -> u16 {
    if width == 0 {
        return 0;
    }
    let width = usize::from(width);
    let rows: usize = text
        .lines()
        .map(|line| line.width().div_ceil(width).max(1))
        .sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

/// Largest useful scroll offset for `text` in the cached answer pane
pub fn max_answer_scroll(cache: &LayoutCache, text: &str) -> u16 {
    wrapped_line_count(text, cache.answer_viewport_width())
        .saturating_sub(cache.answer_viewport_height())
}

/// Scroll offset that brings the `selected` lines into a `viewport`-row pane
///
/// `rows` holds the wrapped height of each line. A selection taller than the
/// viewport is scrolled to its first row.
pub fn scroll_to_selection(rows: &[u16], selected: &Range<usize>, viewport: u16) -> u16 {
    let rows_before = |count: usize| {
        rows.iter()
            .take(count)
            .fold(0u16, |total, height| total.saturating_add(*height))
    };
    let start = rows_before(selected.start);
    let end = rows_before(selected.end);
    end.saturating_sub(viewport).min(start)
}
