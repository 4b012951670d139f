use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};

use super::{ToastLevel, ToastState};
use crate::{
    app::App,
    ui::{
        components::Component,
        theme::{Theme, theme_helpers as th},
    },
};

const TOAST_MAX_WIDTH: u16 = 48;

/// Overlay that stacks toasts in the top-right corner of the screen.
#[derive(Debug, Default)]
pub struct ToastsComponent;

impl ToastsComponent {
    fn level_style(theme: &dyn Theme, level: ToastLevel) -> Style {
        match level {
            ToastLevel::Info => theme.status_info(),
            ToastLevel::Success => theme.status_success(),
            ToastLevel::Error => theme.status_error(),
        }
    }

    /// Wraps every line of the message (notifications may carry `\n`).
    fn wrap_message(message: &str, width: usize) -> Vec<String> {
        message
            .lines()
            .flat_map(|line| textwrap::wrap(line, width.max(1)).into_iter().map(|part| part.into_owned()))
            .collect()
    }

    fn render_toasts(frame: &mut Frame, area: Rect, toasts: &ToastState, theme: &dyn Theme) {
        let width = TOAST_MAX_WIDTH.min(area.width.saturating_sub(2));
        if width < 8 {
            return;
        }
        let x = area.right().saturating_sub(width + 1);
        let mut y = area.y + 1;

        for toast in toasts.visible() {
            let lines = Self::wrap_message(&toast.message, usize::from(width - 2));
            let height = lines.len() as u16 + 2;
            if y + height > area.bottom() {
                break;
            }
            let rect = Rect::new(x, y, width, height);
            let title = format!("{} · {}", toast.level.title(), toast.shown_at.format("%H:%M:%S"));
            let block = th::block(theme, None, false)
                .title(Span::styled(title, Self::level_style(theme, toast.level)))
                .border_style(Self::level_style(theme, toast.level));
            let text: Vec<Line> = lines.into_iter().map(|line| Line::styled(line, theme.text_primary_style())).collect();

            frame.render_widget(Clear, rect);
            frame.render_widget(Paragraph::new(text).style(th::panel_style(theme)).block(block), rect);
            y += height;
        }
    }
}

impl Component for ToastsComponent {
    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        if app.toasts.is_empty() {
            return;
        }
        Self::render_toasts(frame, area, &app.toasts, &*app.ctx.theme);
    }
}
