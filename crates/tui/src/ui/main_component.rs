use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use rat_focus::FocusBuilder;
use ratatui::{
    prelude::*,
    widgets::Paragraph,
};
use rentals_types::{Effect, Msg, Route};

use super::components::{
    Component, nav_bar::VerticalNavBarComponent, rental_form::RentalFormComponent, rentals_table::RentalsTableComponent,
    toasts::ToastsComponent,
};
use super::theme::theme_helpers as th;
use crate::app::App;

/// Page shell: nav panel, active content view, hint bar, and toast overlay.
#[derive(Debug)]
pub struct MainView {
    /// Component for the current route
    pub content_view: Box<dyn Component>,
    pub nav_bar_view: VerticalNavBarComponent,
    pub toasts_view: ToastsComponent,
}

impl Default for MainView {
    fn default() -> Self {
        Self::new(Route::default())
    }
}

impl MainView {
    pub fn new(route: Route) -> Self {
        Self {
            content_view: Self::view_for(route),
            nav_bar_view: VerticalNavBarComponent::new(),
            toasts_view: ToastsComponent,
        }
    }

    fn view_for(route: Route) -> Box<dyn Component> {
        match route {
            Route::Home => Box::new(RentalFormComponent),
            Route::Table => Box::new(RentalsTableComponent),
        }
    }

    /// Navigates through the router, swaps the content view and returns the
    /// new view's route-enter effects.
    ///
    /// Prefer emitting `Effect::SwitchTo` over calling this directly.
    pub fn set_current_route(&mut self, app: &mut App, route: Route) -> Vec<Effect> {
        app.router.navigate(route);
        app.nav_bar.sync_route_events();
        self.content_view = Self::view_for(route);

        app.focus = FocusBuilder::build_for(app);
        self.content_view.on_route_enter(app)
    }

    /// Focuses the first widget when the focus tree lost its focused widget.
    pub fn restore_focus(&mut self, app: &mut App) {
        if app.focus.focused().is_none() {
            app.focus.first();
        }
    }
}

impl Component for MainView {
    fn on_route_enter(&mut self, app: &mut App) -> Vec<Effect> {
        self.content_view.on_route_enter(app)
    }

    fn handle_message(&mut self, app: &mut App, msg: Msg) -> Vec<Effect> {
        let mut effects = app.update(&msg);
        effects.extend(self.content_view.handle_message(app, msg));
        effects
    }

    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if key.code == KeyCode::Char('b') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return vec![Effect::ToggleSidebar];
        }

        if app.nav_bar.container_focus.get() {
            return self.nav_bar_view.handle_key_events(app, key);
        }

        self.content_view.handle_key_events(app, key)
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let mut effects = self.nav_bar_view.handle_mouse_events(app, mouse);
        effects.extend(self.content_view.handle_mouse_events(app, mouse));
        effects
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let background = Paragraph::new("").style(Style::default().bg(app.ctx.theme.roles().background));
        frame.render_widget(background, area);

        let layout = self.get_preferred_layout(app, area);
        self.nav_bar_view.render(frame, layout[0], app);
        self.content_view.render(frame, layout[1], app);

        let hints = Paragraph::new(Line::from(self.get_hint_spans(app))).style(app.ctx.theme.text_muted_style());
        frame.render_widget(hints, layout[2]);

        self.toasts_view.render(frame, area, app);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let mut hint_spans: Vec<Span> = vec![Span::styled("Hints: ", app.ctx.theme.text_muted_style())];

        if app.nav_bar.container_focus.get() {
            hint_spans.extend(self.nav_bar_view.get_hint_spans(app));
            return hint_spans;
        }

        hint_spans.extend(self.content_view.get_hint_spans(app));
        hint_spans.extend(th::build_hint_spans(
            &*app.ctx.theme,
            &[(" Ctrl+B", " Sidebar "), (" Ctrl+Q", " Quit")],
        ));
        hint_spans
    }

    /// `[nav panel, content, hint bar]`
    fn get_preferred_layout(&self, app: &App, area: Rect) -> Vec<Rect> {
        let [nav_area, wrapper] =
            Layout::horizontal([Constraint::Length(app.nav_bar.preferred_width()), Constraint::Min(1)]).areas(area);
        let [content_area, hints_area] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(wrapper);
        vec![nav_area, content_area, hints_area]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::test_support::NoopApi;
    use rentals_types::{RentalCommand, RentalPayload};
    use rentals_util::AppConfig;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn switching_routes_updates_router_nav_and_view() {
        let mut app = App::new(AppConfig::default(), Arc::new(NoopApi));
        let mut view = MainView::new(Route::Home);

        let effects = view.set_current_route(&mut app, Route::Table);

        assert_eq!(effects, vec![Effect::LoadRentals]);
        assert_eq!(app.current_route(), Route::Table);
        assert_eq!(app.nav_bar.active_entry().map(|entry| entry.id), Some(2));
    }

    #[test]
    fn ctrl_b_requests_a_sidebar_toggle() {
        let mut app = App::new(AppConfig::default(), Arc::new(NoopApi));
        let mut view = MainView::new(Route::Home);

        let effects = view.handle_key_events(&mut app, key(KeyCode::Char('b'), KeyModifiers::CONTROL));
        assert_eq!(effects, vec![Effect::ToggleSidebar]);
    }

    #[test]
    fn ctrl_s_on_an_empty_form_only_notifies() {
        let mut app = App::new(AppConfig::default(), Arc::new(NoopApi));
        let mut view = MainView::new(Route::Home);
        view.set_current_route(&mut app, Route::Home);

        let effects = view.handle_key_events(&mut app, key(KeyCode::Char('s'), KeyModifiers::CONTROL));

        assert!(effects.is_empty());
        assert_eq!(app.toasts.visible().count(), 3);
    }

    #[test]
    fn typing_into_the_form_and_saving_emits_a_create() {
        let mut app = App::new(AppConfig::default(), Arc::new(NoopApi));
        let mut view = MainView::new(Route::Home);
        view.set_current_route(&mut app, Route::Home);

        for (index, text) in ["Alice", "a@b.com", "Bob"].into_iter().enumerate() {
            if index > 0 {
                view.handle_key_events(&mut app, key(KeyCode::Down, KeyModifiers::NONE));
            }
            for c in text.chars() {
                view.handle_key_events(&mut app, key(KeyCode::Char(c), KeyModifiers::NONE));
            }
        }
        let effects = view.handle_key_events(&mut app, key(KeyCode::Char('s'), KeyModifiers::CONTROL));

        assert_eq!(
            effects,
            vec![Effect::SaveRental(RentalCommand::Create(RentalPayload {
                email: "a@b.com".into(),
                name: "Alice".into(),
                owner: "Bob".into(),
            }))]
        );
        assert!(app.toasts.is_empty());
    }
}
