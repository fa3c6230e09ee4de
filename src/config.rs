use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub gesture: GestureConfig,
    pub timing: TimingConfig,
    pub keymap: KeymapConfig,
    pub log: LogConfig,
}

/// Logical-pixel thresholds. Terminal cells are converted with
/// `cell_width_px` x `cell_height_px` so every threshold shares the pointer
/// coordinate space.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    pub narrow_threshold_px: f32,
    pub drawer_width_px: f32,
    pub drawer_margin_px: f32,
    pub cell_width_px: f32,
    pub cell_height_px: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            narrow_threshold_px: 640.0,
            drawer_width_px: 256.0,
            drawer_margin_px: 32.0,
            cell_width_px: 10.0,
            cell_height_px: 20.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct GestureConfig {
    pub navigate_swipe_px: f32,
    pub dismiss_swipe_px: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            navigate_swipe_px: 50.0,
            dismiss_swipe_px: 60.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimingConfig {
    pub open_ms: u64,
    pub close_ms: u64,
    pub open_fallback_ms: u64,
    pub close_fallback_ms: u64,
    pub shudder_ms: u64,
    pub slide_ms: u64,
    pub exit_lead_ms: u64,
    pub exit_fallback_ms: u64,
    pub enter_fallback_ms: u64,
    pub redraw_interval_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            open_ms: 320,
            close_ms: 320,
            open_fallback_ms: 1100,
            close_fallback_ms: 1100,
            shudder_ms: 600,
            slide_ms: 450,
            exit_lead_ms: 80,
            exit_fallback_ms: 600,
            enter_fallback_ms: 900,
            redraw_interval_ms: 16,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeymapConfig {
    pub preset: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            preset: "default".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    pub path: Option<PathBuf>,
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: None,
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> AppResult<Self> {
        let Some(path) = default_config_path() else {
            return Ok(Self::default());
        };
        Self::load_from_path(path)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        if !path.is_file() {
            return Err(AppError::invalid_argument(format!(
                "config path is not a regular file: {}",
                path.display()
            )));
        }

        let raw = fs::read_to_string(path).map_err(|source| {
            AppError::io_with_context(source, format!("failed to read config: {}", path.display()))
        })?;
        let parsed = toml::from_str::<Self>(&raw).map_err(|source| {
            AppError::invalid_argument(format!(
                "failed to parse config {}: {source}",
                path.display()
            ))
        })?;
        Ok(parsed.sanitized())
    }

    fn sanitized(mut self) -> Self {
        let defaults = LayoutConfig::default();
        let layout = &mut self.layout;
        layout.narrow_threshold_px =
            positive_or(layout.narrow_threshold_px, defaults.narrow_threshold_px);
        layout.drawer_width_px = positive_or(layout.drawer_width_px, defaults.drawer_width_px);
        layout.cell_width_px = positive_or(layout.cell_width_px, defaults.cell_width_px);
        layout.cell_height_px = positive_or(layout.cell_height_px, defaults.cell_height_px);
        if !layout.drawer_margin_px.is_finite() || layout.drawer_margin_px < 0.0 {
            layout.drawer_margin_px = defaults.drawer_margin_px;
        }

        let gestures = GestureConfig::default();
        self.gesture.navigate_swipe_px =
            positive_or(self.gesture.navigate_swipe_px, gestures.navigate_swipe_px);
        self.gesture.dismiss_swipe_px =
            positive_or(self.gesture.dismiss_swipe_px, gestures.dismiss_swipe_px);

        let timing = &mut self.timing;
        timing.open_ms = timing.open_ms.max(1);
        timing.close_ms = timing.close_ms.max(1);
        timing.open_fallback_ms = timing.open_fallback_ms.max(1);
        timing.close_fallback_ms = timing.close_fallback_ms.max(1);
        timing.shudder_ms = timing.shudder_ms.max(1);
        timing.slide_ms = timing.slide_ms.max(1);
        timing.exit_lead_ms = timing.exit_lead_ms.max(1);
        timing.exit_fallback_ms = timing.exit_fallback_ms.max(1);
        timing.enter_fallback_ms = timing.enter_fallback_ms.max(1);
        timing.redraw_interval_ms = timing.redraw_interval_ms.max(1);

        if self.log.level.trim().is_empty() {
            self.log.level = LogConfig::default().level;
        }
        self
    }
}

fn positive_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os("TAO_CONFIG_PATH")
        && !explicit.is_empty()
    {
        return Some(PathBuf::from(explicit));
    }

    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME")
        && !xdg.is_empty()
    {
        return Some(PathBuf::from(xdg).join("tao").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME")
        && !home.is_empty()
    {
        return Some(
            PathBuf::from(home)
                .join(".config")
                .join("tao")
                .join("config.toml"),
        );
    }
    if let Some(appdata) = std::env::var_os("APPDATA")
        && !appdata.is_empty()
    {
        return Some(PathBuf::from(appdata).join("tao").join("config.toml"));
    }
    None
}
