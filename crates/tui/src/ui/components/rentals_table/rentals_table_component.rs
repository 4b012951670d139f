use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Position, Rect},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
};
use rentals_types::{Effect, RentalField};

use crate::{
    app::App,
    ui::{
        components::Component,
        theme::{Theme, theme_helpers as th},
    },
};

const COLUMNS: [RentalField; 4] = [RentalField::RentalId, RentalField::Name, RentalField::Email, RentalField::Owner];

/// Lists rentals; Enter opens the selected one in the form.
#[derive(Debug, Default)]
pub struct RentalsTableComponent;

impl RentalsTableComponent {
    fn edit_selected(app: &App) -> Vec<Effect> {
        app.rentals_table
            .selected()
            .map(|rental| vec![Effect::EditRental(rental.clone())])
            .unwrap_or_default()
    }

    fn title(app: &App) -> String {
        let table = &app.rentals_table;
        if table.is_loading() {
            format!("Rentals {}", app.throbber())
        } else {
            format!("Rentals ({})", table.rentals().len())
        }
    }

    fn render_placeholder(frame: &mut Frame, area: Rect, message: &str, theme: &dyn Theme) {
        let line = Line::styled(message.to_string(), theme.text_muted_style());
        frame.render_widget(Paragraph::new(line).centered(), area);
    }
}

impl Component for RentalsTableComponent {
    fn on_route_enter(&mut self, app: &mut App) -> Vec<Effect> {
        app.focus.focus(&app.rentals_table.focus);
        vec![Effect::LoadRentals]
    }

    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Tab => {
                app.focus.next();
            }
            KeyCode::BackTab => {
                app.focus.prev();
            }
            KeyCode::Down | KeyCode::Char('j') => app.rentals_table.select_next(),
            KeyCode::Up | KeyCode::Char('k') => app.rentals_table.select_previous(),
            KeyCode::Char('r') => return vec![Effect::LoadRentals],
            KeyCode::Enter => return Self::edit_selected(app),
            _ => {}
        }
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let area = app.rentals_table.last_area;
        if !area.contains(Position::new(mouse.column, mouse.row)) {
            return Vec::new();
        }
        match mouse.kind {
            MouseEventKind::ScrollDown => app.rentals_table.select_next(),
            MouseEventKind::ScrollUp => app.rentals_table.select_previous(),
            MouseEventKind::Down(MouseButton::Left) => {
                app.focus.focus(&app.rentals_table.focus);
                // Border plus header row precede the first data row.
                let first_row = area.y + 2;
                if mouse.row >= first_row {
                    let index = usize::from(mouse.row - first_row) + app.rentals_table.table_state.offset();
                    app.rentals_table.select_index(index);
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let title = Self::title(app);
        let theme = &*app.ctx.theme;
        let table_state = &app.rentals_table;
        let block = th::block(theme, Some(&title), table_state.focus.get());
        let inner = block.inner(area);

        let placeholder = match (table_state.last_error(), table_state.rentals().is_empty()) {
            (Some(error), true) => Some(format!("Could not load rentals: {error}")),
            (None, true) if !table_state.is_loading() => Some("No rentals yet. Press r to refresh.".to_string()),
            _ => None,
        };
        if let Some(message) = placeholder {
            frame.render_widget(block, area);
            Self::render_placeholder(frame, inner, &message, theme);
            app.rentals_table.last_area = area;
            return;
        }

        let header = Row::new(
            COLUMNS
                .iter()
                .map(|field| Cell::from(field.label()).style(th::table_header_style(theme))),
        );
        let rows = table_state.rentals().iter().map(|rental| {
            Row::new(
                COLUMNS
                    .iter()
                    .map(|field| Cell::from(rental.field_value(*field).to_string()).style(theme.text_primary_style())),
            )
        });
        let widths = [
            Constraint::Length(10),
            Constraint::Percentage(30),
            Constraint::Percentage(40),
            Constraint::Percentage(30),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .column_spacing(1)
            .row_highlight_style(th::table_selected_style(theme));

        frame.render_stateful_widget(table, area, &mut app.rentals_table.table_state);
        app.rentals_table.last_area = area;
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        th::build_hint_spans(
            &*app.ctx.theme,
            &[(" ↑/↓", " Select "), (" Enter", " Edit "), (" r", " Refresh")],
        )
    }
}
