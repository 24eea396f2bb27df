//! Dark/light theme state.
//!
//! Seeded from the host's preferred color scheme, then owned by the user: once
//! the user toggles, host preference changes no longer apply.

use std::env;

use primer_types::ColorScheme;

/// Where the host's color-scheme preference comes from.
pub trait ColorSchemeSource {
    fn preferred(&self) -> Option<ColorScheme>;
}

/// Reads `PRIMER_THEME`, then the `COLORFGBG` convention (`fg;bg`, set by many
/// terminal emulators).
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvColorScheme;

impl ColorSchemeSource for EnvColorScheme {
    fn preferred(&self) -> Option<ColorScheme> {
        if let Ok(raw) = env::var("PRIMER_THEME")
            && let Some(scheme) = ColorScheme::parse(&raw)
        {
            return Some(scheme);
        }
        env::var("COLORFGBG")
            .ok()
            .and_then(|raw| scheme_from_colorfgbg(&raw))
    }
}

/// Interpret the background index of a `COLORFGBG` value.
///
/// Indices 0-6 and 8 are the dark ANSI colors; everything else reads as light.
#[must_use]
pub fn scheme_from_colorfgbg(raw: &str) -> Option<ColorScheme> {
    let bg: u8 = raw.rsplit(';').next()?.trim().parse().ok()?;
    Some(ColorScheme::from_dark(matches!(bg, 0..=6 | 8)))
}

/// A fixed answer, for pinned configuration and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedColorScheme(pub Option<ColorScheme>);

impl ColorSchemeSource for FixedColorScheme {
    fn preferred(&self) -> Option<ColorScheme> {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeState {
    dark_mode: bool,
    user_overridden: bool,
}

impl Default for ThemeState {
    fn default() -> Self {
        Self {
            dark_mode: true,
            user_overridden: false,
        }
    }
}

impl ThemeState {
    /// Seed from the host preference; dark when the host has none.
    #[must_use]
    pub fn from_source(source: &dyn ColorSchemeSource) -> Self {
        let scheme = source.preferred().unwrap_or(ColorScheme::Dark);
        Self {
            dark_mode: scheme.is_dark(),
            user_overridden: false,
        }
    }

    #[must_use]
    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    #[must_use]
    pub fn scheme(&self) -> ColorScheme {
        ColorScheme::from_dark(self.dark_mode)
    }

    pub fn toggle(&mut self) {
        self.dark_mode = !self.dark_mode;
        self.user_overridden = true;
        tracing::debug!(dark_mode = self.dark_mode, "Theme toggled");
    }

    /// Host preference changed. Ignored once the user has toggled.
    pub fn on_preference_changed(&mut self, scheme: ColorScheme) {
        if self.user_overridden {
            return;
        }
        self.dark_mode = scheme.is_dark();
    }
}
