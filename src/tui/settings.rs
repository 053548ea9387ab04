//! Centralized, hardcoded UI settings for the terminal interface.
//!
//! This is the single place to tweak titles, glyphs, colors, indentation,
//! and key-poll timing.

use crossterm::style::Color;

// ---------------------------------------------------------------------------
// Layout / indentation
// ---------------------------------------------------------------------------

pub const INDENT_1: &str = "  ";
pub const INDENT_2: &str = "    ";
pub const SWATCH: &str = "   ";
pub const GRID_COLUMNS: usize = 6;
pub const FALLBACK_COLUMNS: usize = 80;

// ---------------------------------------------------------------------------
// Titles / help lines
// ---------------------------------------------------------------------------

pub const TITLE_APP: &str = "zakaranda";
pub const TITLE_THEMES: &str = "Choose a theme";
pub const TITLE_TARGETS: &str = "Apply to";
pub const TITLE_REPORT: &str = "Results";

pub const HELP_LIST: &str = "↑/k ↓/j move • enter select • esc back • q quit";
pub const HELP_PREVIEW: &str = "enter choose targets • esc back • q quit";
pub const HELP_TARGETS: &str = "space toggle • enter apply • esc back • q quit";
pub const HELP_COMPLETE: &str = "enter/esc exit";

pub const LABEL_NOT_INSTALLED: &str = "not installed";
pub const LABEL_NOTHING_SELECTED: &str = "No targets selected; nothing was changed.";

// ---------------------------------------------------------------------------
// Glyphs
// ---------------------------------------------------------------------------

pub const GLYPH_SECTION_BULLET: &str = "•";
pub const GLYPH_CURSOR: &str = "▶";
pub const GLYPH_CURSOR_PLAIN: &str = ">";
pub const GLYPH_CHECKED: &str = "[x]";
pub const GLYPH_UNCHECKED: &str = "[ ]";

pub const GLYPH_APPLIED: &str = "✅";
pub const GLYPH_SKIPPED: &str = "⚠️";
pub const GLYPH_FAILED: &str = "❌";
pub const GLYPH_FOLLOW_UP: &str = "📝";

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

pub const EVENT_POLL_MS: u64 = 80;

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

pub const COLOR_SECTION_BULLET: Color = Color::DarkGrey;
pub const COLOR_SECTION_TITLE: Color = Color::Cyan;
pub const COLOR_HELP: Color = Color::DarkGrey;
pub const COLOR_CURSOR: Color = Color::DarkYellow;
pub const COLOR_SELECTED: Color = Color::Yellow;
pub const COLOR_UNSELECTED: Color = Color::White;
pub const COLOR_DETAIL: Color = Color::DarkGrey;
pub const COLOR_CHECKED: Color = Color::Green;

pub const COLOR_APPLIED: Color = Color::Green;
pub const COLOR_SKIPPED: Color = Color::Yellow;
pub const COLOR_FAILED: Color = Color::Red;
pub const COLOR_FOLLOW_UP: Color = Color::Cyan;

// ---------------------------------------------------------------------------
// Small helpers
// ---------------------------------------------------------------------------

pub fn cursor_marker(is_selected: bool, color: bool) -> &'static str {
    match (is_selected, color) {
        (true, true) => GLYPH_CURSOR,
        (true, false) => GLYPH_CURSOR_PLAIN,
        (false, _) => " ",
    }
}

pub fn checkbox(checked: bool) -> &'static str {
    if checked {
        GLYPH_CHECKED
    } else {
        GLYPH_UNCHECKED
    }
}
