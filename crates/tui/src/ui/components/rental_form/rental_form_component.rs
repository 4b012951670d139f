use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    text::{Line, Span},
    widgets::{Borders, Paragraph},
};
use rentals_types::{Effect, RentalCommand, RentalField, RentalId, RentalPayload};

use super::{FormControl, RentalsService, SubmitOutcome};
use crate::{
    app::App,
    ui::{
        components::Component,
        theme::{
            Theme,
            theme_helpers::{self as th, ButtonRenderOptions, render_button},
        },
    },
};

/// Height of one field: bordered input plus an error line.
const FIELD_HEIGHT: u16 = 4;
const SUBMIT_HEIGHT: u16 = 3;

/// Submitted commands become effects for the command layer to execute.
impl RentalsService for Vec<Effect> {
    fn create_rental(&mut self, payload: RentalPayload) {
        self.push(Effect::SaveRental(RentalCommand::Create(payload)));
    }

    fn update_rental(&mut self, id: RentalId, payload: RentalPayload) {
        self.push(Effect::SaveRental(RentalCommand::Update { id, payload }));
    }
}

/// Create/edit form for a single rental.
#[derive(Debug, Default)]
pub struct RentalFormComponent;

impl RentalFormComponent {
    fn submit(app: &mut App) -> Vec<Effect> {
        let mut effects = Vec::new();
        if let SubmitOutcome::Submitted(_) = app.rental_form.submit(&mut effects, &mut app.toasts) {
            app.focus.focus(app.rental_form.name_focus());
        }
        effects
    }

    fn cycle(app: &mut App, forward: bool) {
        if let Some(flag) = app.rental_form.cycle_focus(forward) {
            app.focus.focus(&flag);
        }
    }

    fn edit_focused(app: &mut App, key: KeyEvent) {
        let Some(field) = app.rental_form.focused_field() else {
            return;
        };
        let Some(control) = app.rental_form.base_control_mut(field) else {
            return;
        };
        match key.code {
            KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                control.edit(|input| input.insert_char(c));
            }
            KeyCode::Backspace => {
                control.edit(|input| input.backspace());
            }
            KeyCode::Delete => {
                control.edit(|input| input.delete());
            }
            KeyCode::Left => {
                control.move_cursor(|input| input.move_left());
            }
            KeyCode::Right => {
                control.move_cursor(|input| input.move_right());
            }
            KeyCode::Home => {
                control.move_cursor(|input| input.move_home());
            }
            KeyCode::End => {
                control.move_cursor(|input| input.move_end());
            }
            _ => {}
        }
    }

    fn title(app: &App) -> String {
        match app.rental_form.mode().rental_id() {
            Some(id) if !id.value().is_empty() => format!("Edit rental #{}", id.value()),
            Some(_) => "Edit rental".to_string(),
            None => "New rental".to_string(),
        }
    }

    fn render_control(frame: &mut Frame, area: Rect, control: &FormControl, theme: &dyn Theme) {
        let [input_area, error_area] = Layout::vertical([Constraint::Length(3), Constraint::Length(1)]).areas(area);
        let focused = control.focus.get();
        let errors = control.errors();
        let show_errors = control.is_touched() && errors.is_some();

        let mut label = control.field().label().to_string();
        if control.is_required() {
            label.push_str(" *");
        }
        let block = th::block(theme, None, focused)
            .borders(Borders::ALL)
            .title(Span::styled(label, theme.text_secondary_style()));
        let style = th::input_style(theme, !show_errors, focused, control.is_disabled());
        frame.render_widget(Paragraph::new(control.value()).style(style).block(block), input_area);

        if let Some(errors) = errors.filter(|_| show_errors) {
            let message = errors.iter().map(|error| error.to_string()).collect::<Vec<_>>().join(", ");
            frame.render_widget(Paragraph::new(Line::styled(message, theme.status_error())), error_area);
        }

        if focused && !control.is_disabled() {
            let column = u16::try_from(control.input().cursor_column()).unwrap_or(u16::MAX);
            let x = input_area.x.saturating_add(1).saturating_add(column).min(input_area.right().saturating_sub(2));
            frame.set_cursor_position(Position::new(x, input_area.y + 1));
        }
    }
}

impl Component for RentalFormComponent {
    fn on_route_enter(&mut self, app: &mut App) -> Vec<Effect> {
        app.focus.focus(app.rental_form.name_focus());
        Vec::new()
    }

    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            return Self::submit(app);
        }
        match key.code {
            KeyCode::Tab => {
                app.focus.next();
            }
            KeyCode::BackTab => {
                app.focus.prev();
            }
            KeyCode::Down => Self::cycle(app, true),
            KeyCode::Up => Self::cycle(app, false),
            KeyCode::Esc => {
                if app.rental_form.rental_entity().is_some() {
                    app.rental_form.set_rental_entity(None);
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') if app.rental_form.f_submit.get() => {
                return Self::submit(app);
            }
            KeyCode::Enter => Self::cycle(app, true),
            _ => Self::edit_focused(app, key),
        }
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Vec::new();
        }
        let position = Position::new(mouse.column, mouse.row);
        if app.rental_form.submit_area.contains(position) {
            app.focus.focus(&app.rental_form.f_submit);
            return Self::submit(app);
        }
        let hit = app
            .rental_form
            .field_areas
            .iter()
            .find(|(_, area)| area.contains(position))
            .map(|(field, _)| *field);
        if let Some(field) = hit
            && let Some(control) = app.rental_form.control(field)
            && !control.is_disabled()
        {
            app.focus.focus(&control.focus);
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        let title = Self::title(app);
        let focused = app.rental_form.container_focus.get();
        let block = th::block(theme, Some(&title), focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rects = self.get_preferred_layout(app, inner);
        let form = &app.rental_form;
        let mut field_areas = Vec::new();
        for (control, rect) in form.controls().zip(rects.iter().copied()) {
            Self::render_control(frame, rect, control, theme);
            field_areas.push((control.field(), rect));
        }

        let control_count = field_areas.len();
        let submit_area = rects.get(control_count).copied().unwrap_or_default();
        let submit_focused = form.f_submit.get();
        let borders = Borders::ALL;
        let label = if form.mode().is_edit() { "Update" } else { "Create" };
        render_button(
            frame,
            submit_area,
            label,
            theme,
            ButtonRenderOptions::new(true, submit_focused, submit_focused, borders),
        );

        app.rental_form.last_area = area;
        app.rental_form.field_areas = field_areas;
        app.rental_form.submit_area = submit_area;
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let mut hints = vec![(" Tab/↑↓", " Move "), (" Ctrl+S", " Save ")];
        if app.rental_form.rental_entity().is_some() {
            hints.push((" Esc", " Cancel edit "));
        }
        if app.rental_form.focused_field() == Some(RentalField::Email) {
            hints.push((" ", "name@example.com"));
        }
        th::build_hint_spans(&*app.ctx.theme, &hints)
    }

    /// One rect per control in display order, then the submit button.
    fn get_preferred_layout(&self, app: &App, area: Rect) -> Vec<Rect> {
        let control_count = app.rental_form.controls().count();
        let mut constraints = vec![Constraint::Length(FIELD_HEIGHT); control_count];
        constraints.push(Constraint::Length(SUBMIT_HEIGHT));
        constraints.push(Constraint::Min(0));
        let mut rects = Layout::vertical(constraints).horizontal_margin(1).split(area).to_vec();
        rects.truncate(control_count + 1);
        rects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::test_support::NoopApi;
    use rentals_util::AppConfig;

    fn press(component: &mut RentalFormComponent, app: &mut App, code: KeyCode) -> Vec<Effect> {
        component.handle_key_events(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn cursor_keys_do_not_touch_an_empty_field() {
        let mut app = App::new(AppConfig::default(), Arc::new(NoopApi));
        let mut component = RentalFormComponent;
        component.on_route_enter(&mut app);

        for code in [KeyCode::Left, KeyCode::Right, KeyCode::Home, KeyCode::End] {
            press(&mut component, &mut app, code);
        }

        let name = app.rental_form.control(RentalField::Name).map(FormControl::is_touched);
        assert_eq!(name, Some(false));
    }

    #[test]
    fn typing_touches_the_focused_field() {
        let mut app = App::new(AppConfig::default(), Arc::new(NoopApi));
        let mut component = RentalFormComponent;
        component.on_route_enter(&mut app);

        press(&mut component, &mut app, KeyCode::Char('A'));

        assert_eq!(app.rental_form.value(RentalField::Name), Some("A"));
        assert_eq!(app.rental_form.control(RentalField::Name).map(FormControl::is_touched), Some(true));
    }
}
