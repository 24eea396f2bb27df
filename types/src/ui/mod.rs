//! UI option types shared by the core and the TUI layer.
//!
//! Pure data types with no IO, no ratatui dependency.

/// UI configuration options derived from config/environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiOptions {
    /// Use ASCII-only glyphs for icons and spinners.
    pub ascii_only: bool,
    /// Use the high-contrast variant of the active palette.
    pub high_contrast: bool,
    /// Freeze spinners and other motion.
    pub reduced_motion: bool,
}

/// The two presentation schemes a theme can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorScheme {
    Dark,
    Light,
}

impl ColorScheme {
    #[must_use]
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    #[must_use]
    pub const fn from_dark(dark: bool) -> Self {
        if dark { Self::Dark } else { Self::Light }
    }

    /// Parse `dark` / `light` (case-insensitive, surrounding whitespace ignored).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }
}
