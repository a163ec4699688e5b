use ratatui::style::Color;
use tracing::warn;

/// Semantic colors used by the view.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeColors {
    pub primary: Color,
    pub accent: Color,
    pub warning: Color,
    pub error: Color,
    pub text: Color,
    pub text_muted: Color,
    pub text_dim: Color,
    pub surface: Color,
}

/// Hex palette in the same token order as `ThemeColors`.
type Palette = [&'static str; 8];

const BUILTIN: &[(&str, Palette)] = &[
    (
        "slate",
        ["#38bdf8", "#4ade80", "#facc15", "#f87171", "#f1f5f9", "#94a3b8", "#475569", "#1e293b"],
    ),
    (
        "catppuccin",
        ["#89b4fa", "#a6e3a1", "#f9e2af", "#f38ba8", "#cdd6f4", "#6c7086", "#45475a", "#1e1e2e"],
    ),
    (
        "nord",
        ["#88c0d0", "#a3be8c", "#ebcb8b", "#bf616a", "#eceff4", "#7b88a1", "#434c5e", "#2e3440"],
    ),
    (
        "gruvbox",
        ["#83a598", "#b8bb26", "#fabd2f", "#fb4934", "#ebdbb2", "#928374", "#504945", "#282828"],
    ),
];

pub const DEFAULT_THEME: &str = "slate";

/// Parse a hex color string like "#38bdf8" into a ratatui Color.
pub fn hex_to_color(hex: &str) -> Color {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return Color::White;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).unwrap_or(255);
    Color::Rgb(channel(0..2), channel(2..4), channel(4..6))
}

impl ThemeColors {
    fn from_palette(p: &Palette) -> Self {
        Self {
            primary: hex_to_color(p[0]),
            accent: hex_to_color(p[1]),
            warning: hex_to_color(p[2]),
            error: hex_to_color(p[3]),
            text: hex_to_color(p[4]),
            text_muted: hex_to_color(p[5]),
            text_dim: hex_to_color(p[6]),
            surface: hex_to_color(p[7]),
        }
    }

    pub fn get(name: &str) -> Option<Self> {
        BUILTIN
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, p)| Self::from_palette(p))
    }

    /// Load a theme by name, falling back to the default palette.
    pub fn by_name(name: &str) -> Self {
        Self::get(name).unwrap_or_else(|| Self::from_palette(&BUILTIN[0].1))
    }

    /// Resolve the theme: IMAGEGEN_THEME env > config value > default.
    pub fn resolve(configured: Option<&str>) -> (String, Self) {
        let name = pick_name(std::env::var("IMAGEGEN_THEME").ok(), configured);
        if Self::get(&name).is_none() {
            warn!(theme = %name, available = ?list_themes().collect::<Vec<_>>(), "unknown theme, using default");
        }
        let theme = Self::by_name(&name);
        (name, theme)
    }
}

fn pick_name(from_env: Option<String>, configured: Option<&str>) -> String {
    from_env
        .or_else(|| configured.map(str::to_string))
        .unwrap_or_else(|| DEFAULT_THEME.into())
}

pub fn list_themes() -> impl Iterator<Item = &'static str> {
    BUILTIN.iter().map(|(n, _)| *n)
}
