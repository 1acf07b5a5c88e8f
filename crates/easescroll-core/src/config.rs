use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::animation::DEFAULT_DURATION_SECS;
use crate::curve::TimingCurve;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level (overridden by RUST_LOG)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory for the log file written while the pager is open
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            data_dir: default_data_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Duration used when none is given, in seconds
    #[serde(default = "default_duration_secs")]
    pub default_duration_secs: f64,
    /// Timing curve used by the pager and the headless commands
    #[serde(default)]
    pub curve: TimingCurve,
    /// Frames per second while an animation is running
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            default_duration_secs: default_duration_secs(),
            curve: TimingCurve::default(),
            frame_rate: default_frame_rate(),
        }
    }
}

impl AnimationConfig {
    /// Interval between frames at the configured frame rate
    pub fn frame_interval(&self) -> Duration {
        if self.frame_rate == 0 {
            Duration::from_millis(16) // ~60fps fallback
        } else {
            Duration::from_secs_f64(1.0 / self.frame_rate as f64)
        }
    }

    fn validate(&self) -> crate::Result<()> {
        if !self.default_duration_secs.is_finite() || self.default_duration_secs <= 0.0 {
            return Err(crate::Error::Config(format!(
                "animation.default_duration_secs must be a positive number, got {}",
                self.default_duration_secs
            )));
        }
        if self.frame_rate == 0 {
            return Err(crate::Error::Config(
                "animation.frame_rate must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Input poll interval while idle, in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Theme name: "gruvbox-dark" or "gruvbox-light"
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Show the curve plot next to the document
    #[serde(default = "default_true")]
    pub show_curve: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            theme: default_theme(),
            show_curve: default_true(),
        }
    }
}

/// Keymap configuration using Vim-style notation
/// Format: "j", "k", "<C-j>" (Ctrl+j), "<S-g>" (Shift+g), "<CR>" (Enter), "<Esc>", "<Tab>", "<Space>"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeymapConfig {
    /// Quit the pager
    #[serde(default = "default_key_quit")]
    pub quit: String,

    // Line scrolling
    #[serde(default = "default_key_scroll_down")]
    pub scroll_down: String,
    #[serde(default = "default_key_scroll_up")]
    pub scroll_up: String,
    #[serde(default = "default_key_scroll_left")]
    pub scroll_left: String,
    #[serde(default = "default_key_scroll_right")]
    pub scroll_right: String,

    // Page scrolling
    #[serde(default = "default_key_scroll_half_down")]
    pub scroll_half_down: String,
    #[serde(default = "default_key_scroll_half_up")]
    pub scroll_half_up: String,
    #[serde(default = "default_key_scroll_page_down")]
    pub scroll_page_down: String,
    #[serde(default = "default_key_scroll_page_up")]
    pub scroll_page_up: String,

    // Jump to top/bottom
    #[serde(default = "default_key_jump_to_top")]
    pub jump_to_top: String,
    #[serde(default = "default_key_jump_to_bottom")]
    pub jump_to_bottom: String,

    // Animation controls
    /// Switch to the next timing curve
    #[serde(default = "default_key_next_curve")]
    pub next_curve: String,
    /// Switch to the previous timing curve
    #[serde(default = "default_key_prev_curve")]
    pub prev_curve: String,
    /// Shorten the animation duration
    #[serde(default = "default_key_faster")]
    pub faster: String,
    /// Lengthen the animation duration
    #[serde(default = "default_key_slower")]
    pub slower: String,
    /// Stop the running animation where it is
    #[serde(default = "default_key_cancel")]
    pub cancel: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            quit: default_key_quit(),
            scroll_down: default_key_scroll_down(),
            scroll_up: default_key_scroll_up(),
            scroll_left: default_key_scroll_left(),
            scroll_right: default_key_scroll_right(),
            scroll_half_down: default_key_scroll_half_down(),
            scroll_half_up: default_key_scroll_half_up(),
            scroll_page_down: default_key_scroll_page_down(),
            scroll_page_up: default_key_scroll_page_up(),
            jump_to_top: default_key_jump_to_top(),
            jump_to_bottom: default_key_jump_to_bottom(),
            next_curve: default_key_next_curve(),
            prev_curve: default_key_prev_curve(),
            faster: default_key_faster(),
            slower: default_key_slower(),
            cancel: default_key_cancel(),
        }
    }
}

// Default keymap values (Vim-style notation)
fn default_key_quit() -> String { "q".to_string() }
fn default_key_scroll_down() -> String { "j".to_string() }
fn default_key_scroll_up() -> String { "k".to_string() }
fn default_key_scroll_left() -> String { "h".to_string() }
fn default_key_scroll_right() -> String { "l".to_string() }
fn default_key_scroll_half_down() -> String { "<C-d>".to_string() }
fn default_key_scroll_half_up() -> String { "<C-u>".to_string() }
fn default_key_scroll_page_down() -> String { "<C-f>".to_string() }
fn default_key_scroll_page_up() -> String { "<C-b>".to_string() }
fn default_key_jump_to_top() -> String { "gg".to_string() }
fn default_key_jump_to_bottom() -> String { "G".to_string() }
fn default_key_next_curve() -> String { "]".to_string() }
fn default_key_prev_curve() -> String { "[".to_string() }
fn default_key_faster() -> String { "-".to_string() }
fn default_key_slower() -> String { "+".to_string() }
fn default_key_cancel() -> String { "<Esc>".to_string() }

fn default_log_level() -> String {
    "info".to_string()
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("easescroll")
}

fn default_duration_secs() -> f64 {
    DEFAULT_DURATION_SECS
}

fn default_frame_rate() -> u32 {
    60
}

fn default_tick_rate() -> u64 {
    100
}

fn default_theme() -> String {
    "gruvbox-dark".to_string()
}

fn default_true() -> bool {
    true
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file, or defaults if it does not exist
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate a TOML document
    pub fn parse(content: &str) -> crate::Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        config.animation.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &std::path::Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/easescroll/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("easescroll")
            .join("config.toml")
    }

    /// Get the log file path used by the pager
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("easescroll.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.animation.default_duration_secs, 0.25);
        assert_eq!(config.animation.curve, TimingCurve::EASE);
        assert_eq!(config.animation.frame_rate, 60);
        assert_eq!(config.ui.tick_rate_ms, 100);
        assert_eq!(config.keymap.jump_to_top, "gg");
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config.animation.default_duration_secs, 0.25);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_parse_animation_section() {
        let config = AppConfig::parse(
            r#"
            [animation]
            default_duration_secs = 0.4
            curve = "cubic-bezier(0.2, 0.8, 0.2, 1)"
            frame_rate = 120

            [keymap]
            quit = "<C-q>"
            "#,
        )
        .unwrap();

        assert_eq!(config.animation.default_duration_secs, 0.4);
        assert_eq!(config.animation.curve, TimingCurve::new(0.2, 0.8, 0.2, 1.0));
        assert_eq!(config.animation.frame_rate, 120);
        assert_eq!(config.keymap.quit, "<C-q>");
        assert_eq!(config.keymap.scroll_down, "j");
    }

    #[test]
    fn test_rejects_non_positive_duration() {
        let err = AppConfig::parse("[animation]\ndefault_duration_secs = -1.0\n").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
        assert!(AppConfig::parse("[animation]\nframe_rate = 0\n").is_err());
    }

    #[test]
    fn test_rejects_bad_curve() {
        assert!(AppConfig::parse("[animation]\ncurve = \"wobbly\"\n").is_err());
    }

    #[test]
    fn test_frame_interval() {
        let config = AnimationConfig {
            frame_rate: 50,
            ..Default::default()
        };
        assert_eq!(config.frame_interval(), Duration::from_millis(20));
    }

    #[test]
    fn test_serialized_config_parses_back() {
        let mut config = AppConfig::default();
        config.animation.curve = TimingCurve::new(0.34, 1.56, 0.64, 1.0);
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed = AppConfig::parse(&text).unwrap();
        assert_eq!(parsed.animation.curve, config.animation.curve);
    }
}
