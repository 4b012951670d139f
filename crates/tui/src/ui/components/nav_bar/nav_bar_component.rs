use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::Span,
    widgets::Borders,
};
use rentals_types::Effect;

use crate::{
    app::App,
    ui::{
        components::{Component, component::find_target_index_by_mouse_position},
        theme::theme_helpers::{self as th, ButtonRenderOptions, render_button},
    },
};

/// Renders the navigation panel as a column of buttons.
///
/// Activating an entry emits [`Effect::SwitchTo`]; the active highlight only
/// moves once the router reports the navigation back.
#[derive(Debug, Default)]
pub struct VerticalNavBarComponent;

impl VerticalNavBarComponent {
    pub fn new() -> Self {
        Self
    }
}

impl Component for VerticalNavBarComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let needs_init = app.nav_bar.container_focus.get() && app.nav_bar.get_focused_list_item().is_none();
        if needs_init && let Some(flag) = app.nav_bar.active_or_first_flag() {
            app.focus.focus(&flag);
        }

        let mut effects = Vec::new();
        match key.code {
            KeyCode::Tab => {
                app.focus.next();
            }
            KeyCode::BackTab => {
                app.focus.prev();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(flag) = app.nav_bar.cycle_focus(true) {
                    app.focus.focus(&flag);
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(flag) = app.nav_bar.cycle_focus(false) {
                    app.focus.focus(&flag);
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some((entry, _)) = app.nav_bar.get_focused_list_item() {
                    effects.push(Effect::SwitchTo(entry.route));
                }
            }
            _ => {}
        }
        effects
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Vec::new();
        }
        let nav = &app.nav_bar;
        let Some(index) = find_target_index_by_mouse_position(&nav.last_area, &nav.per_item_areas, mouse.column, mouse.row) else {
            return Vec::new();
        };

        let mut effects = Vec::new();
        if let Some(entry) = nav.entries.get(index) {
            effects.push(Effect::SwitchTo(entry.route));
        }
        if let Some(flag) = nav.item_focus_flags.get(index) {
            app.focus.focus(flag);
        }
        effects
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        let nav = &app.nav_bar;
        let any_focused = nav.item_focus_flags.iter().any(|flag| flag.get());
        let expanded = nav.is_expanded();

        let title = if expanded { Some("Rentals") } else { None };
        frame.render_widget(th::block(theme, title, any_focused).borders(Borders::ALL), area);

        let rows = self.get_preferred_layout(app, area);
        let nav = &app.nav_bar;
        for (index, entry) in nav.entries.iter().enumerate() {
            let Some(row) = rows.get(index).copied() else {
                break;
            };
            let focused = nav.item_focus_flags.get(index).is_some_and(|flag| flag.get());
            let label = if expanded {
                format!("{} {}", entry.icon, entry.label)
            } else {
                entry.icon.to_string()
            };
            let borders = if focused { Borders::ALL } else { Borders::NONE };
            render_button(
                frame,
                row,
                &label,
                theme,
                ButtonRenderOptions::new(true, focused, nav.is_active(entry), borders),
            );
        }

        app.nav_bar.last_area = area;
        app.nav_bar.per_item_areas = rows;
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        th::build_hint_spans(
            &*app.ctx.theme,
            &[(" Enter", " Open "), (" ↑/↓", " Navigate "), (" Ctrl+B", " Toggle sidebar")],
        )
    }

    fn get_preferred_layout(&self, app: &App, area: Rect) -> Vec<Rect> {
        let count = app.nav_bar.entries.len();
        let mut constraints = vec![Constraint::Length(3); count];
        constraints.push(Constraint::Min(0));
        let mut rows = Layout::vertical(constraints).margin(1).split(area).to_vec();
        rows.truncate(count);
        rows
    }
}
