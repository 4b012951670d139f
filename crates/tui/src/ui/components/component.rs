//! Component system for the rentals TUI.
//!
//! Components are self-contained UI elements that handle their own events
//! and render themselves, while their state lives on [`App`] so that other
//! parts of the application (the runtime, the command layer) can reach it.

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{
    Frame,
    layout::{Position, Rect},
    text::Span,
};
use rentals_types::{Effect, Msg};

use crate::app::App;

/// A UI component with its own behavior and rendering.
///
/// Components handle localized events, update the state they own on `App`,
/// and render themselves into a provided `Rect`, reporting any side effects
/// back to the runtime as [`Effect`]s.
///
/// # Component Lifecycle
///
/// 1. **Route enter**: `on_route_enter()` runs when the component becomes the
///    active content view
/// 2. **Event handling**: `handle_key_events()`, `handle_mouse_events()` and
///    `handle_message()`
/// 3. **Rendering**: `render()` draws the component into the frame area
pub(crate) trait Component: std::fmt::Debug {
    /// Called when the component becomes the active content view.
    fn on_route_enter(&mut self, _app: &mut App) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle an application message (ticks, completed requests).
    fn handle_message(&mut self, _app: &mut App, _msg: Msg) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle key events when this component has focus.
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle mouse events.
    fn handle_mouse_events(&mut self, _app: &mut App, _mouse: MouseEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Render the component into the given area.
    ///
    /// Implementations should only draw and record hit-test areas; state
    /// changes belong in the event handlers.
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App);

    /// Key hints shown in the hint bar while the component is focused.
    fn get_hint_spans(&self, _app: &App) -> Vec<Span<'_>> {
        Vec::new()
    }

    /// Sub-areas the component lays itself out into.
    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        vec![area]
    }
}

/// Returns the index of the area under `(x, y)`, if the point is inside `container`.
pub(crate) fn find_target_index_by_mouse_position(container: &Rect, areas: &[Rect], x: u16, y: u16) -> Option<usize> {
    let position = Position::new(x, y);
    if !container.contains(position) {
        return None;
    }
    areas.iter().position(|area| area.contains(position))
}
