use ratatui::style::Color;
use tracing::warn;

/// Runtime theme colors
#[derive(Debug, Clone)]
pub struct Theme {
    // Background colors
    pub bg0: Color,
    pub bg1: Color,
    pub bg2: Color,

    // Foreground colors
    pub fg0: Color,
    pub fg1: Color,
    pub grey1: Color,
    pub grey2: Color,

    // Palette colors
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub blue: Color,

    // Semantic colors
    pub accent: Color,
    pub border: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::gruvbox_dark()
    }
}

impl Theme {
    pub fn gruvbox_dark() -> Self {
        Self {
            bg0: Color::Rgb(0x28, 0x28, 0x28),
            bg1: Color::Rgb(0x32, 0x30, 0x2f),
            bg2: Color::Rgb(0x45, 0x40, 0x3d),
            fg0: Color::Rgb(0xd4, 0xbe, 0x98),
            fg1: Color::Rgb(0xdd, 0xc7, 0xa1),
            grey1: Color::Rgb(0x92, 0x83, 0x74),
            grey2: Color::Rgb(0xa8, 0x99, 0x84),
            red: Color::Rgb(0xea, 0x69, 0x62),
            yellow: Color::Rgb(0xd8, 0xa6, 0x57),
            green: Color::Rgb(0xa9, 0xb6, 0x65),
            blue: Color::Rgb(0x7d, 0xae, 0xa3),
            accent: Color::Rgb(0x89, 0xb4, 0x82),
            border: Color::Rgb(0x50, 0x49, 0x45),
        }
    }

    pub fn gruvbox_light() -> Self {
        Self {
            bg0: Color::Rgb(0xfb, 0xf1, 0xc7),
            bg1: Color::Rgb(0xf4, 0xe8, 0xbe),
            bg2: Color::Rgb(0xeb, 0xdb, 0xb2),
            fg0: Color::Rgb(0x65, 0x47, 0x35),
            fg1: Color::Rgb(0x4f, 0x38, 0x29),
            grey1: Color::Rgb(0x92, 0x83, 0x74),
            grey2: Color::Rgb(0x7c, 0x6f, 0x64),
            red: Color::Rgb(0xc1, 0x4a, 0x4a),
            yellow: Color::Rgb(0xb4, 0x71, 0x09),
            green: Color::Rgb(0x6c, 0x78, 0x2e),
            blue: Color::Rgb(0x45, 0x70, 0x7a),
            accent: Color::Rgb(0x4c, 0x7a, 0x5d),
            border: Color::Rgb(0xd5, 0xc4, 0xa1),
        }
    }
}

/// Load a theme by name, falling back to gruvbox-dark
pub fn load_theme(name: &str) -> Theme {
    match name.to_lowercase().as_str() {
        "gruvbox-dark" | "gruvbox" => Theme::gruvbox_dark(),
        "gruvbox-light" => Theme::gruvbox_light(),
        other => {
            warn!("Unknown theme '{}', using gruvbox-dark", other);
            Theme::gruvbox_dark()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_known_themes() {
        assert_eq!(load_theme("gruvbox-light").bg0, Theme::gruvbox_light().bg0);
        assert_eq!(load_theme("Gruvbox-Dark").bg0, Theme::gruvbox_dark().bg0);
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        assert_eq!(load_theme("neon").bg0, Theme::gruvbox_dark().bg0);
    }
}
