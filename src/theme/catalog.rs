//! Built-in theme families and the catalog value handed to the controller.
//!
//! The catalog is constructed once at startup and passed down; nothing here
//! is global.

use super::{HexColor, Palette, Theme};

/// A theme family (e.g. Catppuccin) grouping its light/dark variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseTheme {
    pub name: String,
    pub description: String,
    pub variants: Vec<ThemeVariant>,
}

/// One variant of a family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeVariant {
    /// Short name within the family, e.g. `Mocha`.
    pub name: String,
    /// Label shown in the variant picker, e.g. `Mocha (Dark)`.
    pub display_name: String,
    /// Theme name once flattened, e.g. `Catppuccin Mocha`.
    pub full_name: String,
    pub palette: Palette,
}

impl BaseTheme {
    /// Flatten one variant into a [`Theme`].
    pub fn theme(&self, variant: usize) -> Option<Theme> {
        let v = self.variants.get(variant)?;
        Some(Theme::new(&v.full_name, &self.description, v.palette))
    }

    /// A family holding a single custom theme.
    pub fn single(theme: &Theme) -> Self {
        Self {
            name: theme.name().to_string(),
            description: theme.description().to_string(),
            variants: vec![ThemeVariant {
                name: theme.name().to_string(),
                display_name: theme.name().to_string(),
                full_name: theme.name().to_string(),
                palette: *theme.palette(),
            }],
        }
    }
}

/// Ordered list of theme families.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    families: Vec<BaseTheme>,
}

impl Catalog {
    pub fn new(families: Vec<BaseTheme>) -> Self {
        Self { families }
    }

    /// Nord, Catppuccin and Rose Pine.
    pub fn builtin() -> Self {
        Self::new(builtin_families())
    }

    /// Append custom themes as single-variant families, skipping any whose
    /// name is already taken.
    pub fn extend_custom(&mut self, themes: impl IntoIterator<Item = Theme>) {
        for theme in themes {
            if self.find_theme(theme.name()).is_some() {
                tracing::warn!(theme = theme.name(), "custom theme shadows an existing theme; skipped");
                continue;
            }
            self.families.push(BaseTheme::single(&theme));
        }
    }

    pub fn families(&self) -> &[BaseTheme] {
        &self.families
    }

    pub fn family(&self, index: usize) -> Option<&BaseTheme> {
        self.families.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.families.iter().all(|f| f.variants.is_empty())
    }

    /// Every variant flattened into a theme, in catalog order.
    pub fn themes(&self) -> Vec<Theme> {
        self.families
            .iter()
            .flat_map(|family| (0..family.variants.len()).filter_map(|i| family.theme(i)))
            .collect()
    }

    pub fn find_theme(&self, name: &str) -> Option<Theme> {
        let (family, variant) = self.position_of(name)?;
        self.families[family].theme(variant)
    }

    /// `(family, variant)` indices of the theme with this full name.
    pub fn position_of(&self, name: &str) -> Option<(usize, usize)> {
        self.families.iter().enumerate().find_map(|(fi, family)| {
            family
                .variants
                .iter()
                .position(|v| v.full_name == name)
                .map(|vi| (fi, vi))
        })
    }
}

const fn hex(value: u32) -> HexColor {
    HexColor::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
}

/// Palette whose bright row repeats the normal row except for the listed
/// bright black, cyan and white.
const fn palette(
    background: u32,
    foreground: u32,
    normal: [u32; 8],
    bright_black: u32,
    bright_cyan: u32,
    bright_white: u32,
) -> Palette {
    Palette {
        background: hex(background),
        foreground: hex(foreground),
        black: hex(normal[0]),
        red: hex(normal[1]),
        green: hex(normal[2]),
        yellow: hex(normal[3]),
        blue: hex(normal[4]),
        magenta: hex(normal[5]),
        cyan: hex(normal[6]),
        white: hex(normal[7]),
        bright_black: hex(bright_black),
        bright_red: hex(normal[1]),
        bright_green: hex(normal[2]),
        bright_yellow: hex(normal[3]),
        bright_blue: hex(normal[4]),
        bright_magenta: hex(normal[5]),
        bright_cyan: hex(bright_cyan),
        bright_white: hex(bright_white),
    }
}

const NORD: Palette = palette(
    0x2e3440,
    0xd8dee9,
    [0x3b4252, 0xbf616a, 0xa3be8c, 0xebcb8b, 0x81a1c1, 0xb48ead, 0x88c0d0, 0xe5e9f0],
    0x4c566a,
    0x8fbcbb,
    0xeceff4,
);

const CATPPUCCIN_LATTE: Palette = palette(
    0xeff1f5,
    0x4c4f69,
    [0x5c5f77, 0xd20f39, 0x40a02b, 0xdf8e1d, 0x1e66f5, 0xea76cb, 0x179299, 0x4c4f69],
    0x6c6f85,
    0x179299,
    0x4c4f69,
);

const CATPPUCCIN_FRAPPE: Palette = palette(
    0x303446,
    0xc6d0f5,
    [0x51576d, 0xe78284, 0xa6d189, 0xe5c890, 0x8caaee, 0xf4b8e4, 0x81c8be, 0xb5bfe2],
    0x626880,
    0x81c8be,
    0xa5adce,
);

const CATPPUCCIN_MACCHIATO: Palette = palette(
    0x24273a,
    0xcad3f5,
    [0x494d64, 0xed8796, 0xa6da95, 0xeed49f, 0x8aadf4, 0xf5bde6, 0x8bd5ca, 0xb8c0e0],
    0x5b6078,
    0x8bd5ca,
    0xa5adcb,
);

const CATPPUCCIN_MOCHA: Palette = palette(
    0x1e1e2e,
    0xcdd6f4,
    [0x45475a, 0xf38ba8, 0xa6e3a1, 0xf9e2af, 0x89b4fa, 0xf5c2e7, 0x94e2d5, 0xbac2de],
    0x585b70,
    0x94e2d5,
    0xa6adc8,
);

const ROSE_PINE: Palette = palette(
    0x191724,
    0xe0def4,
    [0x26233a, 0xeb6f92, 0x9ccfd8, 0xf6c177, 0x31748f, 0xc4a7e7, 0xebbcba, 0xe0def4],
    0x6e6a86,
    0xebbcba,
    0xe0def4,
);

const ROSE_PINE_MOON: Palette = palette(
    0x232136,
    0xe0def4,
    [0x393552, 0xeb6f92, 0x9ccfd8, 0xf6c177, 0x3e8fb0, 0xc4a7e7, 0xea9a97, 0xe0def4],
    0x6e6a86,
    0xea9a97,
    0xe0def4,
);

const ROSE_PINE_DAWN: Palette = palette(
    0xfaf4ed,
    0x575279,
    [0xf2e9e1, 0xb4637a, 0x56949f, 0xea9d34, 0x286983, 0x907aa9, 0xd7827e, 0x575279],
    0x9893a5,
    0xd7827e,
    0x575279,
);

fn variant(name: &str, display_name: &str, full_name: &str, palette: Palette) -> ThemeVariant {
    ThemeVariant {
        name: name.to_string(),
        display_name: display_name.to_string(),
        full_name: full_name.to_string(),
        palette,
    }
}

fn builtin_families() -> Vec<BaseTheme> {
    vec![
        BaseTheme {
            name: "Nord".into(),
            description: "An arctic, north-bluish color palette".into(),
            variants: vec![variant("Nord", "Nord", "Nord", NORD)],
        },
        BaseTheme {
            name: "Catppuccin".into(),
            description: "Soothing pastel theme for the high-spirited!".into(),
            variants: vec![
                variant("Latte", "Latte (Light)", "Catppuccin Latte", CATPPUCCIN_LATTE),
                variant("Frappe", "Frappé (Dark)", "Catppuccin Frappe", CATPPUCCIN_FRAPPE),
                variant(
                    "Macchiato",
                    "Macchiato (Dark)",
                    "Catppuccin Macchiato",
                    CATPPUCCIN_MACCHIATO,
                ),
                variant("Mocha", "Mocha (Dark)", "Catppuccin Mocha", CATPPUCCIN_MOCHA),
            ],
        },
        BaseTheme {
            name: "Rose Pine".into(),
            description: "All natural pine, faux fur and a bit of soho vibes".into(),
            variants: vec![
                variant("Main", "Main (Dark)", "Rose Pine", ROSE_PINE),
                variant("Moon", "Moon (Dark)", "Rose Pine Moon", ROSE_PINE_MOON),
                variant("Dawn", "Dawn (Light)", "Rose Pine Dawn", ROSE_PINE_DAWN),
            ],
        },
    ]
}
