//! Light/dark display preference.
//!
//! The preference is resolved once at startup (stored value, then the terminal's
//! background hint, then light) and persisted to `theme.conf` on every toggle.
//! Code that renders or toggles goes through [`ThemeContext`], which degrades to a
//! light, no-op theme when no [`ThemeStore`] has been provided.

use std::path::{Path, PathBuf};
use std::sync::Once;

use ratatui::style::Color;

use crate::config::conf_pairs;

/// Key under which the mode is stored in `theme.conf`.
pub const THEME_KEY: &str = "theme";

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            _ => None,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

/// Color palette applied to every widget for the active mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub accent: Color,
    pub error: Color,
}

impl Palette {
    pub fn light() -> Self {
        Self {
            background: Color::Rgb(0xff, 0xff, 0xff),
            text: Color::Rgb(0x17, 0x17, 0x17),
            muted: Color::Rgb(0x6b, 0x72, 0x80),   // gray-500
            title: Color::Rgb(0x1f, 0x29, 0x37),   // gray-800
            border: Color::Rgb(0xd1, 0xd5, 0xdb),  // gray-300
            header_bg: Color::Rgb(0xf3, 0xf4, 0xf6),
            header_fg: Color::Rgb(0x1f, 0x29, 0x37),
            status_bg: Color::Rgb(0xe5, 0xe7, 0xeb),
            status_fg: Color::Rgb(0x37, 0x41, 0x51),
            highlight_fg: Color::Rgb(0xff, 0xff, 0xff),
            highlight_bg: Color::Rgb(0x25, 0x63, 0xeb), // blue-600
            accent: Color::Rgb(0x25, 0x63, 0xeb),
            error: Color::Rgb(0xdc, 0x26, 0x26),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color::Rgb(0x0a, 0x0a, 0x0a),
            text: Color::Rgb(0xed, 0xed, 0xed),
            muted: Color::Rgb(0x9c, 0xa3, 0xaf),
            title: Color::Rgb(0xe5, 0xe7, 0xeb),
            border: Color::Rgb(0x37, 0x41, 0x51),
            header_bg: Color::Rgb(0x11, 0x18, 0x27),
            header_fg: Color::Rgb(0x93, 0xc5, 0xfd),
            status_bg: Color::Rgb(0x1f, 0x29, 0x37),
            status_fg: Color::Rgb(0xd1, 0xd5, 0xdb),
            highlight_fg: Color::Rgb(0x0a, 0x0a, 0x0a),
            highlight_bg: Color::Rgb(0x60, 0xa5, 0xfa), // blue-400
            accent: Color::Rgb(0x60, 0xa5, 0xfa),
            error: Color::Rgb(0xf8, 0x71, 0x71),
        }
    }

    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
        }
    }
}

/// Stored > OS preference > light.
pub fn resolve_mode(stored: Option<ThemeMode>, os_prefers_dark: Option<bool>) -> ThemeMode {
    stored.unwrap_or(match os_prefers_dark {
        Some(true) => ThemeMode::Dark,
        Some(false) | None => ThemeMode::Light,
    })
}

/// Interpret a `COLORFGBG` value (`"fg;bg"` or `"fg;default;bg"`).
/// Background indices 0-6 and 8 are dark, 7 and 15 are light.
pub fn parse_colorfgbg(value: &str) -> Option<bool> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    match bg {
        0..=6 | 8 => Some(true),
        7 | 15 => Some(false),
        _ => None,
    }
}

/// Whether the terminal advertises a dark background.
pub fn os_prefers_dark() -> Option<bool> {
    std::env::var("COLORFGBG").ok().as_deref().and_then(parse_colorfgbg)
}

/// Read the stored mode from a key=value file. Unknown keys and comments are skipped.
pub fn read_stored(path: &Path) -> Option<ThemeMode> {
    let contents = std::fs::read_to_string(path).ok()?;
    conf_pairs(&contents)
        .filter(|(key, _)| *key == THEME_KEY)
        .filter_map(|(_, value)| ThemeMode::parse(value))
        .last()
}

pub fn write_stored(path: &Path, mode: ThemeMode) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let buf = format!(
        "# user-dashboard display preference\n# light | dark\n{} = {}\n",
        THEME_KEY,
        mode.as_str()
    );
    std::fs::write(path, buf)
}

/// Owner of the active mode and its palette.
#[derive(Clone, Debug)]
pub struct ThemeStore {
    mode: ThemeMode,
    palette: Palette,
    path: Option<PathBuf>,
}

impl ThemeStore {
    /// Resolve the initial mode from `path` and the OS hint. Nothing is written until the
    /// first toggle.
    pub fn load(path: impl Into<PathBuf>, os_prefers_dark: Option<bool>) -> Self {
        let path = path.into();
        let stored = read_stored(&path);
        let mode = resolve_mode(stored, os_prefers_dark);
        tracing::info!(?stored, ?os_prefers_dark, mode = mode.as_str(), "theme resolved");
        Self {
            mode,
            palette: Palette::for_mode(mode),
            path: Some(path),
        }
    }

    /// A store that never touches the filesystem.
    pub fn in_memory(mode: ThemeMode) -> Self {
        Self {
            mode,
            palette: Palette::for_mode(mode),
            path: None,
        }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    /// Flip the mode, apply its palette and persist it.
    pub fn toggle(&mut self) -> ThemeMode {
        self.mode = self.mode.flipped();
        self.palette = Palette::for_mode(self.mode);
        if let Some(path) = &self.path {
            if let Err(e) = write_stored(path, self.mode) {
                tracing::warn!(path = %path.display(), error = %e, "could not persist theme");
            }
        }
        tracing::debug!(mode = self.mode.as_str(), "theme toggled");
        self.mode
    }
}

static DETACHED_WARNING: Once = Once::new();

/// Access to the theme from rendering and key handling code.
pub struct ThemeContext<'a> {
    store: Option<&'a mut ThemeStore>,
}

impl<'a> ThemeContext<'a> {
    /// Wrap the provided store. Without one, the context reads as light and toggling
    /// does nothing.
    pub fn scope(store: Option<&'a mut ThemeStore>) -> Self {
        if store.is_none() {
            DETACHED_WARNING.call_once(|| {
                tracing::warn!("theme accessed without a theme store; using default light theme");
            });
        }
        Self { store }
    }

    pub fn is_detached(&self) -> bool {
        self.store.is_none()
    }

    pub fn theme(&self) -> ThemeMode {
        self.store.as_ref().map(|s| s.mode()).unwrap_or_default()
    }

    pub fn palette(&self) -> Palette {
        self.store
            .as_ref()
            .map(|s| s.palette())
            .unwrap_or_else(Palette::light)
    }

    pub fn toggle(&mut self) -> ThemeMode {
        match self.store.as_deref_mut() {
            Some(store) => store.toggle(),
            None => ThemeMode::Light,
        }
    }
}
