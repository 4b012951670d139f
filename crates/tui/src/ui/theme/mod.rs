//! Theme styling module for the TUI UI layer.
//!
//! Defines the Dracula palette, an ANSI 256-color fallback, semantic theme
//! roles, and helper builders for Ratatui widgets. Prefer these helpers over
//! hard-coding colors.

use std::env;

use tracing::debug;

pub mod ansi256;
pub mod dracula;
pub mod roles;
pub mod theme_helpers;

pub use ansi256::Ansi256Theme;
pub use dracula::DraculaTheme;
pub use roles::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorCapability {
    Truecolor,
    Ansi256,
}

/// Selects a theme based on terminal color capabilities.
///
/// `TUI_COLOR_MODE` (`truecolor` / `ansi256`) overrides detection.
pub fn load() -> Box<dyn Theme> {
    match detect_color_capability() {
        ColorCapability::Truecolor => Box::new(DraculaTheme::new()),
        ColorCapability::Ansi256 => {
            debug!("ANSI-only terminal detected; using fallback palette");
            Box::new(Ansi256Theme::new())
        }
    }
}

fn detect_color_capability() -> ColorCapability {
    if let Some(mode) = env::var("TUI_COLOR_MODE").ok().and_then(|value| parse_color_mode(value.trim())) {
        return mode;
    }

    let color_term = env::var("COLORTERM").unwrap_or_default().to_ascii_lowercase();
    if color_term.contains("truecolor") || color_term.contains("24bit") {
        return ColorCapability::Truecolor;
    }

    ColorCapability::Ansi256
}

fn parse_color_mode(value: &str) -> Option<ColorCapability> {
    match value.to_ascii_lowercase().as_str() {
        "truecolor" | "24bit" => Some(ColorCapability::Truecolor),
        "ansi256" | "256" | "8bit" => Some(ColorCapability::Ansi256),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_mode_aliases_are_recognized() {
        assert_eq!(parse_color_mode("24bit"), Some(ColorCapability::Truecolor));
        assert_eq!(parse_color_mode("ANSI256"), Some(ColorCapability::Ansi256));
        assert_eq!(parse_color_mode("mono"), None);
    }
}
