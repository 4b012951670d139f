use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders, Padding, Paragraph},
};

use super::roles::{Theme, ThemeRoles};

/// Build a standard Block with theme surfaces and borders.
pub fn block<'a, T: Theme + ?Sized>(theme: &'a T, title: Option<&'a str>, focused: bool) -> Block<'a> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(theme.border_style(focused))
        .style(panel_style(theme));
    if let Some(t) = title {
        block = block.title(Span::styled(t, theme.text_secondary_style().add_modifier(Modifier::BOLD)));
    }
    block
}

/// Style for panel-like containers.
pub fn panel_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let ThemeRoles { surface, text, .. } = *theme.roles();
    Style::default().bg(surface).fg(text)
}

/// Style for table headers.
pub fn table_header_style<T: Theme + ?Sized>(theme: &T) -> Style {
    theme.text_secondary_style().add_modifier(Modifier::BOLD)
}

/// Style for a selected row.
pub fn table_selected_style<T: Theme + ?Sized>(theme: &T) -> Style {
    theme.selection_style().add_modifier(Modifier::BOLD)
}

/// Style for input fields; caller sets the block border based on focus.
pub fn input_style<T: Theme + ?Sized>(theme: &T, valid: bool, focused: bool, disabled: bool) -> Style {
    let ThemeRoles {
        surface,
        text,
        text_muted,
        error,
        ..
    } = *theme.roles();
    if disabled {
        return Style::default().bg(surface).fg(text_muted);
    }
    let mut style = Style::default().bg(surface).fg(text);
    if !valid {
        style = style.fg(error);
    }
    if focused {
        style = style.add_modifier(Modifier::BOLD);
    }
    style
}

/// Secondary button style (outline-like, rely on border color in Block).
pub fn button_secondary_style<T: Theme + ?Sized>(theme: &T, enabled: bool, selected: bool) -> Style {
    if !enabled {
        return theme.text_muted_style();
    }
    let ThemeRoles {
        accent_secondary,
        selection_bg,
        ..
    } = *theme.roles();
    let style = Style::default().fg(accent_secondary);
    if selected { style.bg(selection_bg) } else { style }
}

/// Builds hint spans from `(key, description)` pairs.
pub fn build_hint_spans<'a, T: Theme + ?Sized>(theme: &T, hints: &[(&'a str, &'a str)]) -> Vec<Span<'a>> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, description) in hints {
        spans.push(Span::styled(*key, theme.accent_emphasis_style()));
        spans.push(Span::styled(*description, theme.text_muted_style()));
    }
    spans
}

/// Options controlling how a button is rendered.
#[derive(Debug, Clone, Copy)]
pub struct ButtonRenderOptions {
    pub is_enabled: bool,
    pub is_focused: bool,
    pub is_selected: bool,
    pub borders: Borders,
}

impl ButtonRenderOptions {
    pub fn new(is_enabled: bool, is_focused: bool, is_selected: bool, borders: Borders) -> Self {
        Self {
            is_enabled,
            is_focused,
            is_selected,
            borders,
        }
    }
}

/// Renders a standard button.
pub fn render_button<T: Theme + ?Sized>(frame: &mut Frame, area: Rect, label: &str, theme: &T, options: ButtonRenderOptions) {
    let border_style = if options.is_enabled {
        theme.border_style(options.is_focused)
    } else {
        theme.text_muted_style()
    };
    let button_style = button_secondary_style(theme, options.is_enabled, options.is_selected);

    let padding = if options.borders.is_empty() {
        // Keep borderless buttons the same height as bordered ones
        Padding::vertical(1)
    } else {
        Padding::ZERO
    };

    frame.render_widget(
        Paragraph::new(label)
            .block(
                Block::bordered()
                    .borders(options.borders)
                    .border_style(border_style)
                    .padding(padding),
            )
            .style(button_style),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::DraculaTheme;

    #[test]
    fn input_style_reflects_field_state() {
        let theme = DraculaTheme::new();
        let roles = *theme.roles();

        assert_eq!(input_style(&theme, true, false, true).fg, Some(roles.text_muted));
        assert_eq!(input_style(&theme, false, false, false).fg, Some(roles.error));
        assert!(input_style(&theme, true, true, false).add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn hint_spans_pair_keys_with_descriptions() {
        let theme = DraculaTheme::new();
        let spans = build_hint_spans(&theme, &[(" Ctrl+S", " Save "), (" Esc", " Clear")]);
        let text: Vec<_> = spans.iter().map(|span| span.content.as_ref()).collect();
        assert_eq!(text, vec![" Ctrl+S", " Save ", " Esc", " Clear"]);
    }
}
