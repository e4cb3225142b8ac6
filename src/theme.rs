use crate::toast::{Notifier, ToastKind};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const THEME_TOAST_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct PersistedTheme {
    dark_mode: bool,
}

/// Durable home of the dark-mode flag (`theme.toml` in the config dir).
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: Option<PathBuf>,
}

impl Default for ThemeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeStore {
    /// Store in the per-user config directory. Persistence is disabled when
    /// that directory cannot be determined.
    pub fn new() -> Self {
        match ProjectDirs::from("org", "course-catalog", "course-catalog") {
            Some(dirs) => Self {
                path: Some(dirs.config_dir().join("theme.toml")),
            },
            None => {
                tracing::warn!("Could not determine config directory; theme will not persist");
                Self { path: None }
            }
        }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Persisted flag, or `None` when nothing usable has been saved yet.
    pub fn load(&self) -> Result<Option<bool>> {
        let Some(path) = &self.path else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read theme file {}", path.display()))?;

        match toml::from_str::<PersistedTheme>(&content) {
            Ok(theme) => Ok(Some(theme.dark_mode)),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable theme file");
                Ok(None)
            }
        }
    }

    pub fn save(&self, dark_mode: bool) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content =
            toml::to_string(&PersistedTheme { dark_mode }).context("Failed to serialize theme")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write theme file {}", path.display()))
    }
}

/// Reads the terminal's `COLORFGBG` hint ("fg;bg"). Background indexes 0-6
/// and 8 are dark colours in the standard 16-colour table.
pub fn system_prefers_dark() -> bool {
    std::env::var("COLORFGBG")
        .ok()
        .and_then(|value| background_is_dark(&value))
        .unwrap_or(false)
}

fn background_is_dark(colorfgbg: &str) -> Option<bool> {
    let bg: u8 = colorfgbg.rsplit(';').next()?.trim().parse().ok()?;
    Some(matches!(bg, 0..=6 | 8))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub accent: Color,
    pub muted: Color,
    pub highlight: Color,
    pub success: Color,
    pub error: Color,
    pub warning: Color,
    pub info: Color,
}

impl Palette {
    pub const LIGHT: Palette = Palette {
        background: Color::White,
        foreground: Color::Black,
        accent: Color::Blue,
        muted: Color::DarkGray,
        highlight: Color::Magenta,
        success: Color::Green,
        error: Color::Red,
        warning: Color::Yellow,
        info: Color::Blue,
    };

    pub const DARK: Palette = Palette {
        background: Color::Black,
        foreground: Color::White,
        accent: Color::Cyan,
        muted: Color::Gray,
        highlight: Color::Yellow,
        success: Color::LightGreen,
        error: Color::LightRed,
        warning: Color::LightYellow,
        info: Color::LightBlue,
    };

    pub fn toast_color(&self, kind: ToastKind) -> Color {
        match kind {
            ToastKind::Success => self.success,
            ToastKind::Error => self.error,
            ToastKind::Warning => self.warning,
            ToastKind::Info => self.info,
        }
    }
}

/// The process-wide dark-mode flag and the palette it selects.
#[derive(Debug)]
pub struct Theme {
    dark: bool,
    palette: Palette,
    store: ThemeStore,
}

impl Theme {
    /// Seeds the flag from the store, falling back to `system_dark`, then
    /// applies and persists it.
    pub fn initialize(store: ThemeStore, system_dark: bool) -> Self {
        let persisted = store.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load theme preference");
            None
        });
        let dark = persisted.unwrap_or(system_dark);
        tracing::info!(dark, from_store = persisted.is_some(), "Theme initialized");

        let theme = Self {
            dark,
            palette: palette_for(dark),
            store,
        };
        if let Err(e) = theme.store.save(dark) {
            tracing::warn!(error = %e, "Failed to persist theme preference");
        }
        theme
    }

    pub fn is_dark(&self) -> bool {
        self.dark
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn badge(&self) -> &'static str {
        if self.dark {
            "Dark mode"
        } else {
            "Light mode"
        }
    }

    pub fn toggle(&mut self, notifier: &mut dyn Notifier) {
        self.dark = !self.dark;
        self.palette = palette_for(self.dark);

        if let Err(e) = self.store.save(self.dark) {
            tracing::warn!(error = %e, "Failed to persist theme preference");
            notifier.warning("Theme preference could not be saved");
        }

        let message = if self.dark {
            "Dark mode enabled"
        } else {
            "Light mode enabled"
        };
        notifier.notify(message.to_string(), ToastKind::Info, THEME_TOAST_DURATION);
    }
}

fn palette_for(dark: bool) -> Palette {
    if dark {
        Palette::DARK
    } else {
        Palette::LIGHT
    }
}
