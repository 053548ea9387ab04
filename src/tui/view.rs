//! Screen composition and drawing.
//!
//! Each controller screen is first composed into plain [`Line`]s of styled
//! [`Span`]s (pure, testable) and then drawn onto the alternate screen.

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, PrintStyledContent, Stylize};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use std::io::{self, Write};

use crate::build_info;
use crate::controller::{Controller, Screen};
use crate::integrations::{ApplyReport, Outcome};
use crate::theme::{HexColor, Palette, Slot, Theme};
use crate::tui::settings;
use crate::tui::text::{pad_to_width, wrap_for_block};

/// A run of text with one style.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    pub fn bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

pub type Line = Vec<Span>;

/// Concatenated text of `lines`, one line per row.
pub fn plain_text(lines: &[Line]) -> String {
    lines
        .iter()
        .map(|line| line.iter().map(|s| s.text.as_str()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn terminal_columns() -> usize {
    terminal::size()
        .map(|(cols, _)| usize::from(cols))
        .unwrap_or(settings::FALLBACK_COLUMNS)
}

fn rgb(color: HexColor) -> Color {
    Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

/// Compose the current controller screen.
pub fn screen_lines(controller: &Controller, columns: usize) -> Vec<Line> {
    let mut lines = vec![app_header(), Vec::new()];
    let help = match controller.screen() {
        Screen::SelectingTheme => {
            theme_list(controller, &mut lines);
            settings::HELP_LIST
        }
        Screen::SelectingVariant => {
            variant_list(controller, &mut lines);
            settings::HELP_LIST
        }
        Screen::PreviewingTheme => {
            if let Some(theme) = controller.theme() {
                preview(theme, &mut lines);
            }
            settings::HELP_PREVIEW
        }
        Screen::SelectingTargets => {
            target_list(controller, &mut lines);
            settings::HELP_TARGETS
        }
        Screen::SelectingTargetVariant => {
            target_variant_list(controller, &mut lines);
            settings::HELP_LIST
        }
        Screen::Complete => {
            let title = match controller.theme() {
                Some(theme) => format!("{} for {}", settings::TITLE_REPORT, theme.name()),
                None => settings::TITLE_REPORT.to_string(),
            };
            lines.push(header(&title));
            if let Some(report) = controller.report() {
                lines.extend(report_lines(report, columns));
            }
            settings::HELP_COMPLETE
        }
    };
    lines.push(Vec::new());
    lines.push(vec![Span::plain(help).fg(settings::COLOR_HELP)]);
    lines
}

/// Screen shown while the apply batch runs.
pub fn applying_lines(controller: &Controller) -> Vec<Line> {
    let theme = controller.theme().map(Theme::name).unwrap_or_default();
    let mut lines = vec![
        app_header(),
        Vec::new(),
        header(&format!("Applying {theme}...")),
    ];
    for name in controller.chosen_target_names() {
        lines.push(vec![
            Span::plain(settings::INDENT_1),
            Span::plain(name).fg(settings::COLOR_DETAIL),
        ]);
    }
    lines
}

/// One entry per attempted target: glyph, name and status, then the
/// indented reason or follow-up notes.
pub fn report_lines(report: &ApplyReport, columns: usize) -> Vec<Line> {
    if report.is_empty() {
        return vec![vec![
            Span::plain(settings::INDENT_1),
            Span::plain(settings::LABEL_NOTHING_SELECTED).fg(settings::COLOR_DETAIL),
        ]];
    }

    let detail_width = columns
        .saturating_sub(settings::INDENT_2.len())
        .max(20);
    let mut lines = Vec::new();
    for entry in &report.entries {
        let (glyph, status, color, details): (_, _, _, &[String]) = match &entry.outcome {
            Outcome::Applied { notes } if notes.is_empty() => {
                (settings::GLYPH_APPLIED, "applied", settings::COLOR_APPLIED, &[])
            }
            Outcome::Applied { notes } => (
                settings::GLYPH_FOLLOW_UP,
                "applied, follow-up needed",
                settings::COLOR_FOLLOW_UP,
                notes.as_slice(),
            ),
            Outcome::SkippedNotInstalled => (
                settings::GLYPH_SKIPPED,
                "skipped (not installed)",
                settings::COLOR_SKIPPED,
                &[],
            ),
            Outcome::Failed { reason } => (
                settings::GLYPH_FAILED,
                "failed",
                settings::COLOR_FAILED,
                std::slice::from_ref(reason),
            ),
        };
        lines.push(vec![
            Span::plain(settings::INDENT_1),
            Span::plain(format!("{glyph} ")),
            Span::plain(entry.target.clone()).fg(color).bold(),
            Span::plain(format!(": {status}")).fg(color),
        ]);
        for detail in details {
            for row in detail.lines().flat_map(|l| wrap_for_block(l, detail_width)) {
                lines.push(vec![
                    Span::plain(settings::INDENT_2),
                    Span::plain(row).fg(settings::COLOR_DETAIL),
                ]);
            }
        }
    }
    lines
}

fn app_header() -> Line {
    let mut line = header(settings::TITLE_APP);
    line.push(Span::plain(format!(" {}", build_info::header_metadata_line())).fg(settings::COLOR_DETAIL));
    line
}

fn header(title: &str) -> Line {
    vec![
        Span::plain(settings::GLYPH_SECTION_BULLET).fg(settings::COLOR_SECTION_BULLET),
        Span::plain(" "),
        Span::plain(title).fg(settings::COLOR_SECTION_TITLE).bold(),
    ]
}

fn label_color(selected: bool) -> Color {
    if selected {
        settings::COLOR_SELECTED
    } else {
        settings::COLOR_UNSELECTED
    }
}

fn list_prefix(selected: bool) -> Line {
    vec![
        Span::plain(settings::INDENT_1),
        Span::plain(settings::cursor_marker(selected, true)).fg(settings::COLOR_CURSOR),
        Span::plain(" "),
    ]
}

fn list_item(selected: bool, label: &str) -> Line {
    let mut line = list_prefix(selected);
    line.push(Span::plain(label).fg(label_color(selected)));
    line
}

/// Background, foreground and the six chromatic colors as tiny blocks.
fn mini_swatch(palette: &Palette) -> Vec<Span> {
    let mut spans = vec![Span::plain("  ")];
    let slots = [Slot::Background, Slot::Foreground]
        .into_iter()
        .chain(Slot::NORMAL[1..7].iter().copied());
    for slot in slots {
        spans.push(Span::plain(" ").bg(rgb(palette.get(slot))));
    }
    spans
}

fn theme_list(controller: &Controller, lines: &mut Vec<Line>) {
    lines.push(header(settings::TITLE_THEMES));
    let name_width = controller
        .catalog()
        .families()
        .iter()
        .map(|f| f.name.chars().count())
        .max()
        .unwrap_or(0);
    for (index, family) in controller.catalog().families().iter().enumerate() {
        let selected = index == controller.family_cursor();
        let mut line = list_item(selected, &pad_to_width(&family.name, name_width));
        if let Some(first) = family.variants.first() {
            line.extend(mini_swatch(&first.palette));
        }
        line.push(Span::plain(format!("  {}", family.description)).fg(settings::COLOR_DETAIL));
        lines.push(line);
    }
}

fn variant_list(controller: &Controller, lines: &mut Vec<Line>) {
    let Some(family) = controller.current_family() else {
        return;
    };
    lines.push(header(&family.name));
    let width = family
        .variants
        .iter()
        .map(|v| v.display_name.chars().count())
        .max()
        .unwrap_or(0);
    for (index, variant) in family.variants.iter().enumerate() {
        let selected = index == controller.variant_cursor();
        let mut line = list_item(selected, &pad_to_width(&variant.display_name, width));
        line.extend(mini_swatch(&variant.palette));
        lines.push(line);
    }
}

fn preview(theme: &Theme, lines: &mut Vec<Line>) {
    let palette = theme.palette();
    let mut title = header(theme.name());
    let tone = if palette.tone().is_dark() { "dark" } else { "light" };
    title.push(Span::plain(format!(" ({tone})")).fg(settings::COLOR_DETAIL));
    lines.push(title);
    if !theme.description().is_empty() {
        lines.push(vec![
            Span::plain(settings::INDENT_1),
            Span::plain(theme.description()).fg(settings::COLOR_DETAIL),
        ]);
    }
    lines.push(Vec::new());

    for row in Slot::ALL.chunks(settings::GRID_COLUMNS) {
        let mut line = vec![Span::plain(settings::INDENT_1)];
        for &slot in row {
            line.push(Span::plain(pad_to_width(slot.label(), 5)));
            line.push(Span::plain(settings::SWATCH).bg(rgb(palette.get(slot))));
            line.push(Span::plain(format!(" {}  ", palette.hex(slot))).fg(settings::COLOR_DETAIL));
        }
        lines.push(line);
    }
    lines.push(Vec::new());

    let mut swatch_row = vec![Span::plain(settings::INDENT_1)];
    for slot in Slot::NORMAL.iter().chain(Slot::BRIGHT.iter()) {
        swatch_row.push(Span::plain("  ").bg(rgb(palette.get(*slot))));
    }
    lines.push(swatch_row);
    lines.push(Vec::new());

    lines.extend(sample_block(palette, &code_sample(palette)));
    lines.push(Vec::new());
    lines.extend(sample_block(palette, &terminal_sample(palette)));
}

/// Text fragments paired with their palette color.
type SampleLine = Vec<(&'static str, HexColor)>;

const SAMPLE_WIDTH: usize = 46;

/// Draw sample lines as a block on the theme's background.
fn sample_block(palette: &Palette, sample: &[SampleLine]) -> Vec<Line> {
    let background = rgb(palette.background);
    sample
        .iter()
        .map(|fragments| {
            let mut line = vec![Span::plain(settings::INDENT_1)];
            let mut used = 1;
            line.push(Span::plain(" ").bg(background));
            for (text, color) in fragments {
                used += text.chars().count();
                line.push(Span::plain(*text).fg(rgb(*color)).bg(background));
            }
            let pad = SAMPLE_WIDTH.saturating_sub(used);
            line.push(Span::plain(" ".repeat(pad)).bg(background));
            line
        })
        .collect()
}

fn code_sample(p: &Palette) -> Vec<SampleLine> {
    vec![
        vec![("// greet everyone once", p.bright_black)],
        vec![
            ("fn ", p.magenta),
            ("greet", p.blue),
            ("(names: &[", p.foreground),
            ("String", p.yellow),
            ("]) {", p.foreground),
        ],
        vec![
            ("    for ", p.magenta),
            ("name ", p.foreground),
            ("in ", p.magenta),
            ("names.iter().", p.foreground),
            ("take", p.blue),
            ("(", p.foreground),
            ("3", p.yellow),
            (") {", p.foreground),
        ],
        vec![
            ("        println!", p.cyan),
            ("(", p.foreground),
            ("\"hello, {name}\"", p.green),
            (");", p.foreground),
        ],
        vec![("    }", p.foreground)],
        vec![("}", p.foreground)],
    ]
}

fn terminal_sample(p: &Palette) -> Vec<SampleLine> {
    vec![
        vec![("$ ", p.green), ("git status --short", p.foreground)],
        vec![(" M ", p.red), ("src/main.rs", p.foreground)],
        vec![("A  ", p.green), ("src/theme.rs", p.foreground)],
        vec![("?? ", p.bright_black), ("notes.txt", p.foreground)],
        vec![("$ ", p.green), ("ls", p.foreground)],
        vec![
            ("assets/  ", p.blue),
            ("build.sh  ", p.bright_green),
            ("README.md  ", p.foreground),
            ("link@", p.cyan),
        ],
        vec![("warning: ", p.yellow), ("unused import", p.foreground)],
        vec![("error: ", p.bright_red), ("build failed", p.foreground)],
    ]
}

fn target_list(controller: &Controller, lines: &mut Vec<Line>) {
    let theme = controller.theme().map(Theme::name).unwrap_or_default();
    lines.push(header(&format!("{} {theme}", settings::TITLE_TARGETS)));
    let registry = controller.registry();
    let width = registry
        .iter()
        .map(|i| i.name().chars().count())
        .max()
        .unwrap_or(0);
    for (index, integration) in registry.iter().enumerate() {
        let selected = index == controller.target_cursor();
        let checked = controller.is_toggled(index);
        let detail = if !integration.is_installed() {
            settings::LABEL_NOT_INSTALLED.to_string()
        } else {
            integration.config_location()
        };
        let mut line = list_prefix(selected);
        let check_color = if checked {
            settings::COLOR_CHECKED
        } else {
            settings::COLOR_DETAIL
        };
        line.push(Span::plain(settings::checkbox(checked)).fg(check_color));
        line.push(Span::plain(" "));
        line.push(Span::plain(pad_to_width(integration.name(), width)).fg(label_color(selected)));
        if !detail.is_empty() {
            line.push(Span::plain(format!("  {detail}")).fg(settings::COLOR_DETAIL));
        }
        lines.push(line);
    }
}

fn target_variant_list(controller: &Controller, lines: &mut Vec<Line>) {
    let Some((integration, variants)) = controller.pending_target() else {
        return;
    };
    lines.push(header(&format!("Which {}?", integration.name())));
    for (index, variant) in variants.iter().enumerate() {
        let selected = index == controller.target_variant_cursor();
        let mut line = list_item(selected, &variant.name);
        if !variant.location.is_empty() {
            line.push(Span::plain(format!("  {}", variant.location)).fg(settings::COLOR_DETAIL));
        }
        lines.push(line);
    }
}

/// Clear the screen and draw `lines` from the top-left corner.
pub fn draw<W: Write>(out: &mut W, lines: &[Line], color: bool) -> io::Result<()> {
    out.queue(MoveTo(0, 0))?;
    out.queue(Clear(ClearType::All))?;
    for line in lines {
        for span in line {
            if !color {
                out.queue(Print(&span.text))?;
                continue;
            }
            let mut styled = span.text.as_str().stylize();
            if let Some(fg) = span.fg {
                styled = styled.with(fg);
            }
            if let Some(bg) = span.bg {
                styled = styled.on(bg);
            }
            if span.bold {
                styled = styled.bold();
            }
            out.queue(PrintStyledContent(styled))?;
        }
        out.queue(Print("\r\n"))?;
    }
    out.flush()
}
