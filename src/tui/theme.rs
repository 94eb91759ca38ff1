use ratatui::style::Color;

use crate::model::UiConfig;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    /// Paper color of the note card and popups
    pub paper: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub done: Color,
    pub red: Color,
    pub rule: Color,
    pub selection_bg: Color,
    pub drag_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x1E, 0x1A, 0x00),
            paper: Color::Rgb(0x2B, 0x26, 0x05),
            text: Color::Rgb(0xF2, 0xE6, 0xA0),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFA, 0xDF, 0x44),
            dim: Color::Rgb(0x8C, 0x83, 0x4A),
            done: Color::Rgb(0x7C, 0xC4, 0x6A),
            red: Color::Rgb(0xFF, 0x5C, 0x5C),
            rule: Color::Rgb(0x4A, 0x43, 0x12),
            selection_bg: Color::Rgb(0x45, 0x3D, 0x0A),
            drag_bg: Color::Rgb(0x5E, 0x4A, 0x00),
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Build a theme from `[ui.colors]`, ignoring unknown keys and bad values.
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();
        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                continue;
            };
            let slot = match key.as_str() {
                "background" => &mut theme.background,
                "paper" => &mut theme.paper,
                "text" => &mut theme.text,
                "text_bright" => &mut theme.text_bright,
                "highlight" => &mut theme.highlight,
                "dim" => &mut theme.dim,
                "done" => &mut theme.done,
                "red" => &mut theme.red,
                "rule" => &mut theme.rule,
                "selection_bg" => &mut theme.selection_bg,
                "drag_bg" => &mut theme.drag_bg,
                _ => continue,
            };
            *slot = color;
        }
        theme
    }
}
