//! Theme and palette model.
//!
//! A [`Theme`] is an immutable value: a name, a description, and an 18-slot
//! [`Palette`]. Colors are parsed into [`HexColor`] at construction so an
//! adapter can never observe a malformed slot.

pub mod catalog;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ThemeError;

pub use catalog::{BaseTheme, Catalog, ThemeVariant};

// ---------------------------------------------------------------------------
// HexColor
// ---------------------------------------------------------------------------

/// An sRGB color parsed from `#rrggbb` (or shorthand `#rgb`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb` form.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channels scaled to `0.0..=1.0`.
    pub fn components(self) -> [f64; 3] {
        [self.r, self.g, self.b].map(|c| f64::from(c) / 255.0)
    }
}

impl FromStr for HexColor {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let digits = raw
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| format!("missing `#` prefix in {raw:?}"))?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("non-hex digit in {raw:?}"));
        }
        let expanded = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect::<String>(),
            6 => digits.to_string(),
            n => return Err(format!("expected 3 or 6 hex digits, found {n}")),
        };
        let channel = |i: usize| {
            u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|e| format!("{raw:?}: {e}"))
        };
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for HexColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_hex()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// Luminance
// ---------------------------------------------------------------------------

/// Gamma-corrected relative luminance (WCAG 2.x), in `0.0..=1.0`.
pub fn relative_luminance(color: HexColor) -> f64 {
    let [r, g, b] = color.components().map(|c| {
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    });
    0.2126 * r + 0.7152 * g + 0.0722 * b
}

/// Binary light/dark hint derived from a background color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Dark background; UI details should render darker.
    Darker,
    Lighter,
}

impl Tone {
    pub fn of(background: HexColor) -> Self {
        if relative_luminance(background) < 0.5 {
            Self::Darker
        } else {
            Self::Lighter
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Darker => "darker",
            Self::Lighter => "lighter",
        }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Darker
    }
}

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// One of the 18 palette slots, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Background,
    Foreground,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl Slot {
    pub const ALL: [Slot; 18] = [
        Slot::Background,
        Slot::Foreground,
        Slot::Black,
        Slot::Red,
        Slot::Green,
        Slot::Yellow,
        Slot::Blue,
        Slot::Magenta,
        Slot::Cyan,
        Slot::White,
        Slot::BrightBlack,
        Slot::BrightRed,
        Slot::BrightGreen,
        Slot::BrightYellow,
        Slot::BrightBlue,
        Slot::BrightMagenta,
        Slot::BrightCyan,
        Slot::BrightWhite,
    ];

    /// The eight normal ANSI slots, black through white.
    pub const NORMAL: [Slot; 8] = [
        Slot::Black,
        Slot::Red,
        Slot::Green,
        Slot::Yellow,
        Slot::Blue,
        Slot::Magenta,
        Slot::Cyan,
        Slot::White,
    ];

    pub const BRIGHT: [Slot; 8] = [
        Slot::BrightBlack,
        Slot::BrightRed,
        Slot::BrightGreen,
        Slot::BrightYellow,
        Slot::BrightBlue,
        Slot::BrightMagenta,
        Slot::BrightCyan,
        Slot::BrightWhite,
    ];

    /// Field name used in theme documents.
    pub fn key(self) -> &'static str {
        match self {
            Slot::Background => "background",
            Slot::Foreground => "foreground",
            Slot::Black => "black",
            Slot::Red => "red",
            Slot::Green => "green",
            Slot::Yellow => "yellow",
            Slot::Blue => "blue",
            Slot::Magenta => "magenta",
            Slot::Cyan => "cyan",
            Slot::White => "white",
            Slot::BrightBlack => "bright_black",
            Slot::BrightRed => "bright_red",
            Slot::BrightGreen => "bright_green",
            Slot::BrightYellow => "bright_yellow",
            Slot::BrightBlue => "bright_blue",
            Slot::BrightMagenta => "bright_magenta",
            Slot::BrightCyan => "bright_cyan",
            Slot::BrightWhite => "bright_white",
        }
    }

    /// Short grid label.
    pub fn label(self) -> &'static str {
        match self {
            Slot::Background => "Bg",
            Slot::Foreground => "Fg",
            Slot::Black => "Blk",
            Slot::Red => "Red",
            Slot::Green => "Grn",
            Slot::Yellow => "Ylw",
            Slot::Blue => "Blu",
            Slot::Magenta => "Mag",
            Slot::Cyan => "Cyn",
            Slot::White => "Wht",
            Slot::BrightBlack => "BBlk",
            Slot::BrightRed => "BRed",
            Slot::BrightGreen => "BGrn",
            Slot::BrightYellow => "BYlw",
            Slot::BrightBlue => "BBlu",
            Slot::BrightMagenta => "BMag",
            Slot::BrightCyan => "BCyn",
            Slot::BrightWhite => "BWht",
        }
    }

    /// Lower-case ANSI color name without the bright prefix.
    pub fn ansi_name(self) -> &'static str {
        match self {
            Slot::Black | Slot::BrightBlack => "black",
            Slot::Red | Slot::BrightRed => "red",
            Slot::Green | Slot::BrightGreen => "green",
            Slot::Yellow | Slot::BrightYellow => "yellow",
            Slot::Blue | Slot::BrightBlue => "blue",
            Slot::Magenta | Slot::BrightMagenta => "magenta",
            Slot::Cyan | Slot::BrightCyan => "cyan",
            Slot::White | Slot::BrightWhite => "white",
            Slot::Background => "background",
            Slot::Foreground => "foreground",
        }
    }
}

/// The 18-slot terminal palette.
///
/// Also accepts `BrightBlack`-style and `brightblack`-style keys, as found in
/// theme files written by earlier releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    #[serde(alias = "Background")]
    pub background: HexColor,
    #[serde(alias = "Foreground")]
    pub foreground: HexColor,
    #[serde(alias = "Black")]
    pub black: HexColor,
    #[serde(alias = "Red")]
    pub red: HexColor,
    #[serde(alias = "Green")]
    pub green: HexColor,
    #[serde(alias = "Yellow")]
    pub yellow: HexColor,
    #[serde(alias = "Blue")]
    pub blue: HexColor,
    #[serde(alias = "Magenta")]
    pub magenta: HexColor,
    #[serde(alias = "Cyan")]
    pub cyan: HexColor,
    #[serde(alias = "White")]
    pub white: HexColor,
    #[serde(alias = "BrightBlack", alias = "brightblack")]
    pub bright_black: HexColor,
    #[serde(alias = "BrightRed", alias = "brightred")]
    pub bright_red: HexColor,
    #[serde(alias = "BrightGreen", alias = "brightgreen")]
    pub bright_green: HexColor,
    #[serde(alias = "BrightYellow", alias = "brightyellow")]
    pub bright_yellow: HexColor,
    #[serde(alias = "BrightBlue", alias = "brightblue")]
    pub bright_blue: HexColor,
    #[serde(alias = "BrightMagenta", alias = "brightmagenta")]
    pub bright_magenta: HexColor,
    #[serde(alias = "BrightCyan", alias = "brightcyan")]
    pub bright_cyan: HexColor,
    #[serde(alias = "BrightWhite", alias = "brightwhite")]
    pub bright_white: HexColor,
}

impl Palette {
    /// Build a palette from 18 hex strings in [`Slot::ALL`] order.
    pub fn from_hex(values: [&str; 18]) -> Result<Self, ThemeError> {
        let mut parsed = [HexColor::rgb(0, 0, 0); 18];
        for ((slot, raw), out) in Slot::ALL.iter().zip(values).zip(parsed.iter_mut()) {
            *out = raw.parse().map_err(|_| ThemeError::InvalidColor {
                slot: slot.key().to_string(),
                value: raw.to_string(),
            })?;
        }
        let [
            background,
            foreground,
            black,
            red,
            green,
            yellow,
            blue,
            magenta,
            cyan,
            white,
            bright_black,
            bright_red,
            bright_green,
            bright_yellow,
            bright_blue,
            bright_magenta,
            bright_cyan,
            bright_white,
        ] = parsed;
        Ok(Self {
            background,
            foreground,
            black,
            red,
            green,
            yellow,
            blue,
            magenta,
            cyan,
            white,
            bright_black,
            bright_red,
            bright_green,
            bright_yellow,
            bright_blue,
            bright_magenta,
            bright_cyan,
            bright_white,
        })
    }

    pub fn get(&self, slot: Slot) -> HexColor {
        match slot {
            Slot::Background => self.background,
            Slot::Foreground => self.foreground,
            Slot::Black => self.black,
            Slot::Red => self.red,
            Slot::Green => self.green,
            Slot::Yellow => self.yellow,
            Slot::Blue => self.blue,
            Slot::Magenta => self.magenta,
            Slot::Cyan => self.cyan,
            Slot::White => self.white,
            Slot::BrightBlack => self.bright_black,
            Slot::BrightRed => self.bright_red,
            Slot::BrightGreen => self.bright_green,
            Slot::BrightYellow => self.bright_yellow,
            Slot::BrightBlue => self.bright_blue,
            Slot::BrightMagenta => self.bright_magenta,
            Slot::BrightCyan => self.bright_cyan,
            Slot::BrightWhite => self.bright_white,
        }
    }

    /// Hex string for a slot.
    pub fn hex(&self, slot: Slot) -> String {
        self.get(slot).to_hex()
    }

    pub fn tone(&self) -> Tone {
        Tone::of(self.background)
    }
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

/// A named palette applied uniformly across targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(alias = "Name")]
    name: String,
    #[serde(default, alias = "Description")]
    description: String,
    #[serde(alias = "Colors")]
    colors: Palette,
}

impl Theme {
    pub fn new(name: impl Into<String>, description: impl Into<String>, colors: Palette) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            colors,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn palette(&self) -> &Palette {
        &self.colors
    }

    /// File-name-safe stem derived from the display name, `theme` when
    /// nothing survives sanitizing.
    pub fn file_stem(&self) -> String {
        let stem = sanitize_file_name(&self.name);
        if stem.is_empty() {
            "theme".to_string()
        } else {
            stem
        }
    }
}

/// Keep `[A-Za-z0-9_-]`, turn whitespace into `_`, drop everything else.
///
/// Non-ASCII letters are dropped rather than transliterated, so `"Rosé Pine"`
/// becomes `"Ros_Pine"`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .filter_map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '-' => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
pub(crate) fn sample_theme() -> Theme {
    Catalog::builtin()
        .find_theme("Catppuccin Mocha")
        .expect("builtin catalog has Catppuccin Mocha")
}
