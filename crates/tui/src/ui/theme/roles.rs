use std::fmt::Debug;

use ratatui::style::{Color, Modifier, Style};

/// Colors the admin screen draws with, by purpose rather than by hue.
#[derive(Debug, Clone, Copy)]
pub struct ThemeRoles {
    /// Behind everything, including the hint bar
    pub background: Color,
    /// Panels, inputs and buttons
    pub surface: Color,
    pub border: Color,

    pub text: Color,
    /// Field labels, panel titles, table headers
    pub text_secondary: Color,
    /// Hints and disabled controls
    pub text_muted: Color,

    /// Key names in the hint bar
    pub accent_primary: Color,
    /// Button labels
    pub accent_secondary: Color,

    pub info: Color,
    pub success: Color,
    pub error: Color,

    /// Selected table row and pressed buttons
    pub selection_bg: Color,
    pub selection_fg: Color,
    /// Border of the focused panel or input
    pub focus: Color,
}

/// Access to the active roles plus the styles built from them.
pub trait Theme: Send + Sync + Debug {
    fn roles(&self) -> &ThemeRoles;

    fn text_primary_style(&self) -> Style {
        Style::default().fg(self.roles().text)
    }
    fn text_secondary_style(&self) -> Style {
        Style::default().fg(self.roles().text_secondary)
    }
    fn text_muted_style(&self) -> Style {
        Style::default().fg(self.roles().text_muted)
    }

    fn border_style(&self, focused: bool) -> Style {
        let color = if focused { self.roles().focus } else { self.roles().border };
        Style::default().fg(color)
    }

    fn selection_style(&self) -> Style {
        Style::default().fg(self.roles().selection_fg).bg(self.roles().selection_bg)
    }

    // Toast levels and field errors
    fn status_info(&self) -> Style {
        Style::default().fg(self.roles().info)
    }
    fn status_success(&self) -> Style {
        Style::default().fg(self.roles().success)
    }
    fn status_error(&self) -> Style {
        Style::default().fg(self.roles().error)
    }

    fn accent_emphasis_style(&self) -> Style {
        Style::default().fg(self.roles().accent_primary).add_modifier(Modifier::BOLD)
    }
}
