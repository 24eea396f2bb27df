//! Color themes and glyphs for the Primer TUI.
//!
//! Dark mode uses the Kanagawa Wave palette, light mode a warm paper palette.
//! Either can be swapped for a high-contrast variant.

use ratatui::style::{Color, Modifier, Style};

use primer_types::{AlertVariant, ColorScheme, Difficulty, UiOptions};

/// Kanagawa Wave color palette constants.
mod wave {
    use super::Color;

    // === Backgrounds (Sumi Ink) ===
    pub const BG_DARK: Color = Color::Rgb(22, 22, 29); // sumiInk0
    pub const BG_PANEL: Color = Color::Rgb(31, 31, 40); // sumiInk3
    pub const BG_HIGHLIGHT: Color = Color::Rgb(42, 42, 55); // sumiInk4
    pub const BG_BORDER: Color = Color::Rgb(84, 84, 109); // sumiInk6

    // === Foregrounds (Fuji) ===
    pub const TEXT_PRIMARY: Color = Color::Rgb(220, 215, 186); // fujiWhite
    pub const TEXT_SECONDARY: Color = Color::Rgb(200, 192, 147); // oldWhite
    pub const TEXT_MUTED: Color = Color::Rgb(114, 113, 105); // fujiGray

    // === Accents ===
    pub const PRIMARY: Color = Color::Rgb(149, 127, 184); // oniViolet
    pub const BLUE: Color = Color::Rgb(126, 156, 216); // crystalBlue
    pub const CYAN: Color = Color::Rgb(127, 180, 202); // springBlue
    pub const GREEN: Color = Color::Rgb(152, 187, 108); // springGreen
    pub const YELLOW: Color = Color::Rgb(230, 195, 132); // carpYellow
    pub const ORANGE: Color = Color::Rgb(255, 160, 102); // surimiOrange
    pub const RED: Color = Color::Rgb(255, 93, 98); // peachRed
}

/// Light paper palette constants.
mod paper {
    use super::Color;

    pub const BG: Color = Color::Rgb(242, 236, 188);
    pub const BG_PANEL: Color = Color::Rgb(231, 225, 180);
    pub const BG_HIGHLIGHT: Color = Color::Rgb(220, 213, 172);
    pub const BG_BORDER: Color = Color::Rgb(160, 154, 190);

    pub const TEXT_PRIMARY: Color = Color::Rgb(84, 84, 100);
    pub const TEXT_SECONDARY: Color = Color::Rgb(67, 67, 108);
    pub const TEXT_MUTED: Color = Color::Rgb(138, 137, 128);

    pub const PRIMARY: Color = Color::Rgb(98, 76, 131);
    pub const BLUE: Color = Color::Rgb(77, 105, 155);
    pub const GREEN: Color = Color::Rgb(111, 137, 78);
    pub const YELLOW: Color = Color::Rgb(150, 110, 20);
    pub const ORANGE: Color = Color::Rgb(204, 109, 0);
    pub const RED: Color = Color::Rgb(200, 64, 83);
}

/// Resolved theme palette used by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub bg_panel: Color,
    pub bg_highlight: Color,
    pub border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub primary: Color,
    pub accent: Color,
    pub info: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub peach: Color,
}

impl Palette {
    #[must_use]
    pub fn dark() -> Self {
        Self {
            bg: wave::BG_DARK,
            bg_panel: wave::BG_PANEL,
            bg_highlight: wave::BG_HIGHLIGHT,
            border: wave::BG_BORDER,
            text_primary: wave::TEXT_PRIMARY,
            text_secondary: wave::TEXT_SECONDARY,
            text_muted: wave::TEXT_MUTED,
            primary: wave::PRIMARY,
            accent: wave::CYAN,
            info: wave::BLUE,
            success: wave::GREEN,
            warning: wave::YELLOW,
            error: wave::RED,
            peach: wave::ORANGE,
        }
    }

    #[must_use]
    pub fn light() -> Self {
        Self {
            bg: paper::BG,
            bg_panel: paper::BG_PANEL,
            bg_highlight: paper::BG_HIGHLIGHT,
            border: paper::BG_BORDER,
            text_primary: paper::TEXT_PRIMARY,
            text_secondary: paper::TEXT_SECONDARY,
            text_muted: paper::TEXT_MUTED,
            primary: paper::PRIMARY,
            accent: paper::BLUE,
            info: paper::BLUE,
            success: paper::GREEN,
            warning: paper::YELLOW,
            error: paper::RED,
            peach: paper::ORANGE,
        }
    }

    #[must_use]
    pub fn high_contrast_dark() -> Self {
        Self {
            bg: Color::Black,
            bg_panel: Color::Black,
            bg_highlight: Color::DarkGray,
            border: Color::Gray,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            text_muted: Color::DarkGray,
            primary: Color::White,
            accent: Color::Cyan,
            info: Color::Cyan,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            peach: Color::Yellow,
        }
    }

    #[must_use]
    pub fn high_contrast_light() -> Self {
        Self {
            bg: Color::White,
            bg_panel: Color::White,
            bg_highlight: Color::Gray,
            border: Color::Black,
            text_primary: Color::Black,
            text_secondary: Color::Black,
            text_muted: Color::DarkGray,
            primary: Color::Black,
            accent: Color::Blue,
            info: Color::Blue,
            success: Color::Green,
            warning: Color::Magenta,
            error: Color::Red,
            peach: Color::Magenta,
        }
    }

    /// Accent color for an alert variant.
    #[must_use]
    pub fn alert(&self, variant: AlertVariant) -> Color {
        match variant {
            AlertVariant::Info => self.info,
            AlertVariant::Warning => self.warning,
            AlertVariant::Danger => self.error,
        }
    }

    #[must_use]
    pub fn difficulty(&self, difficulty: Difficulty) -> Color {
        match difficulty {
            Difficulty::Beginner => self.success,
            Difficulty::Intermediate => self.warning,
            Difficulty::Advanced => self.error,
        }
    }
}

#[must_use]
pub fn palette(scheme: ColorScheme, options: UiOptions) -> Palette {
    match (scheme, options.high_contrast) {
        (ColorScheme::Dark, false) => Palette::dark(),
        (ColorScheme::Light, false) => Palette::light(),
        (ColorScheme::Dark, true) => Palette::high_contrast_dark(),
        (ColorScheme::Light, true) => Palette::high_contrast_light(),
    }
}

/// ASCII/Unicode glyphs for icons and spinners.
#[derive(Debug, Clone, Copy)]
pub struct Glyphs {
    pub logo: &'static str,
    pub lock: &'static str,
    pub mask: &'static str,
    pub bullet: &'static str,
    pub selected: &'static str,
    pub separator: &'static str,
    pub rule: &'static str,
    pub gutter: &'static str,
    pub alert_bar: &'static str,
    pub info: &'static str,
    pub warning: &'static str,
    pub danger: &'static str,
    pub copy: &'static str,
    pub copied: &'static str,
    pub focus: &'static str,
    pub track: &'static str,
    pub thumb: &'static str,
    pub table: TableGlyphs,
    pub spinner_frames: &'static [&'static str],
}

/// Box-drawing characters for table borders.
#[derive(Debug, Clone, Copy)]
pub struct TableGlyphs {
    pub top: [char; 3],
    pub mid: [char; 3],
    pub bottom: [char; 3],
    pub horizontal: char,
    pub vertical: &'static str,
}

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const SPINNER_FRAMES_ASCII: &[&str] = &["|", "/", "-", "\\"];

#[must_use]
pub fn glyphs(options: UiOptions) -> Glyphs {
    if options.ascii_only {
        Glyphs {
            logo: "*",
            lock: "#",
            mask: "*",
            bullet: "*",
            selected: ">",
            separator: "|",
            rule: "=",
            gutter: "|",
            alert_bar: "|",
            info: "i",
            warning: "!",
            danger: "x",
            copy: "[c] copy",
            copied: "copied!",
            focus: ">",
            track: "|",
            thumb: "#",
            table: TableGlyphs {
                top: ['+', '+', '+'],
                mid: ['+', '+', '+'],
                bottom: ['+', '+', '+'],
                horizontal: '-',
                vertical: "|",
            },
            spinner_frames: SPINNER_FRAMES_ASCII,
        }
    } else {
        Glyphs {
            logo: "◆",
            lock: "🔒",
            mask: "•",
            bullet: "•",
            selected: "▸",
            separator: "•",
            rule: "━",
            gutter: "│",
            alert_bar: "▌",
            info: "ℹ",
            warning: "⚠",
            danger: "✖",
            copy: "⧉ copy [c]",
            copied: "✓ copied!",
            focus: "▶",
            track: "│",
            thumb: "█",
            table: TableGlyphs {
                top: ['┌', '┬', '┐'],
                mid: ['├', '┼', '┤'],
                bottom: ['└', '┴', '┘'],
                horizontal: '─',
                vertical: "│",
            },
            spinner_frames: SPINNER_FRAMES,
        }
    }
}

impl Glyphs {
    #[must_use]
    pub fn alert_icon(&self, variant: AlertVariant) -> &'static str {
        match variant {
            AlertVariant::Info => self.info,
            AlertVariant::Warning => self.warning,
            AlertVariant::Danger => self.danger,
        }
    }
}

/// When `reduced_motion` is enabled, returns a static glyph instead of cycling.
#[must_use]
pub fn spinner_frame(tick: usize, options: UiOptions) -> &'static str {
    let frames = glyphs(options).spinner_frames;
    if options.reduced_motion {
        frames[0]
    } else {
        frames[tick % frames.len()]
    }
}

/// Pre-defined styles for common UI elements.
pub mod styles {
    use super::{Modifier, Palette, Style};

    #[must_use]
    pub fn title(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.primary)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn body(palette: &Palette) -> Style {
        Style::default().fg(palette.text_primary)
    }

    #[must_use]
    pub fn muted(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    #[must_use]
    pub fn selected_row(palette: &Palette) -> Style {
        Style::default()
            .bg(palette.bg_highlight)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_hint(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    #[must_use]
    pub fn key_highlight(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.peach)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn error(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.error)
            .add_modifier(Modifier::BOLD)
    }
}
