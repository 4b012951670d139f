//! Runtime: event loop and input routing for the TUI.
//!
//! - Owns the terminal lifecycle (raw mode, alternate screen, mouse capture).
//! - A dedicated input thread blocks on `crossterm::event::read()` and
//!   forwards events over a Tokio channel.
//! - Ticks quickly while requests are in flight or toasts are showing, and
//!   slowly when idle.
//! - Routes input to the main view and executes the returned `Effect`s:
//!   navigation and layout effects in place, transport effects through the
//!   command layer.

use std::{collections::VecDeque, io::Stdout, sync::Arc, thread, time::Duration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::{StreamExt, stream::FuturesUnordered};
use rat_focus::FocusBuilder;
use ratatui::{Terminal, prelude::*};
use rentals_api::RentalsApi;
use rentals_types::{Effect, ExecOutcome, Msg, Route};
use rentals_util::AppConfig;
use tokio::{
    signal,
    sync::mpsc,
    task::{JoinError, JoinHandle},
    time::{self, MissedTickBehavior},
};
use tracing::{debug, warn};

use crate::{app::App, cmd, ui::components::Component, ui::main_component::MainView};

type Term = Terminal<CrosstermBackend<Stdout>>;

const FAST_TICK: Duration = Duration::from_millis(100);
const IDLE_TICK: Duration = Duration::from_millis(5000);

/// Spawns the blocking input reader and returns its event channel.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(event) => {
                    if sender.blocking_send(event).is_err() {
                        break;
                    }
                }
                Err(error) => {
                    warn!(%error, "failed to read terminal event");
                    break;
                }
            }
        }
    });
    receiver
}

fn setup_terminal() -> Result<Term> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture).context("enter alternate screen")?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn cleanup_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(terminal: &mut Term, app: &mut App, main_view: &mut MainView) -> Result<()> {
    // Rebuild focus just before rendering so structure changes are reflected
    let old_focus = std::mem::take(&mut app.focus);
    app.focus = FocusBuilder::rebuild_for(app, Some(old_focus));
    main_view.restore_focus(app);
    terminal.draw(|frame| main_view.render(frame, frame.area(), app))?;
    Ok(())
}

fn is_quit(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
}

fn handle_input_event(app: &mut App, main_view: &mut MainView, input_event: Event) -> Vec<Effect> {
    match input_event {
        Event::Key(key_event) => main_view.handle_key_events(app, key_event),
        Event::Mouse(mouse_event) => main_view.handle_mouse_events(app, mouse_event),
        Event::Resize(width, height) => main_view.handle_message(app, Msg::Resize(width, height)),
        Event::FocusGained | Event::FocusLost | Event::Paste(_) => Vec::new(),
    }
}

/// Applies effects until none remain.
///
/// Navigation, form hand-off and sidebar effects run in place; the rest are
/// spawned by the command layer and tracked in `pending_execs`.
fn process_effects(
    app: &mut App,
    main_view: &mut MainView,
    effects: Vec<Effect>,
    pending_execs: &mut FuturesUnordered<JoinHandle<ExecOutcome>>,
) {
    let mut queue: VecDeque<Effect> = effects.into();
    let mut transport = Vec::new();
    while let Some(effect) = queue.pop_front() {
        match effect {
            Effect::SwitchTo(route) => {
                debug!(route = %route, "switching route");
                queue.extend(main_view.set_current_route(app, route));
            }
            Effect::EditRental(rental) => {
                app.rental_form.set_rental_entity(Some(rental));
                queue.push_back(Effect::SwitchTo(Route::Home));
            }
            Effect::ToggleSidebar => app.layout.toggle_sidebar(),
            other => transport.push(other),
        }
    }

    let spawned = cmd::run_from_effects(app, transport);
    if !spawned.is_empty() {
        if !app.executing {
            app.throbber_idx = 0;
        }
        app.executing = true;
        pending_execs.extend(spawned);
    }
}

/// Feeds a finished task's outcome back through the main view. A task that
/// panicked or was cancelled is reported like a failed request.
fn complete_exec(
    app: &mut App,
    main_view: &mut MainView,
    joined: Result<ExecOutcome, JoinError>,
    still_pending: bool,
) -> Vec<Effect> {
    let outcome = joined.unwrap_or_else(|error| ExecOutcome::failed("Background task", error.to_string()));
    let effects = main_view.handle_message(app, Msg::ExecCompleted(Box::new(outcome)));
    app.executing = still_pending;
    if !still_pending {
        app.throbber_idx = 0;
    }
    effects
}

/// Sets up the terminal, runs the event loop, and restores the terminal.
pub async fn run_app(config: AppConfig, api: Arc<dyn RentalsApi>) -> Result<()> {
    let mut app = App::new(config, api);
    let mut main_view = MainView::new(Route::Home);
    let mut terminal = setup_terminal()?;

    let result = event_loop(&mut terminal, &mut app, &mut main_view).await;
    cleanup_terminal(&mut terminal)?;
    result
}

async fn event_loop(terminal: &mut Term, app: &mut App, main_view: &mut MainView) -> Result<()> {
    let mut input_receiver = spawn_input_thread();
    let mut pending_execs: FuturesUnordered<JoinHandle<ExecOutcome>> = FuturesUnordered::new();

    // Publish the initial route so the nav panel highlights it.
    let initial_route = app.current_route();
    let mut effects = vec![Effect::SwitchTo(initial_route)];
    process_effects(app, main_view, std::mem::take(&mut effects), &mut pending_execs);

    let mut current_interval = IDLE_TICK;
    let mut ticker = time::interval(current_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    render(terminal, app, main_view)?;

    loop {
        let needs_ticks = app.executing || !app.toasts.is_empty();
        let target_interval = if needs_ticks { FAST_TICK } else { IDLE_TICK };
        if target_interval != current_interval {
            current_interval = target_interval;
            ticker = time::interval(current_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }

        let mut needs_render = tokio::select! {
            maybe_event = input_receiver.recv() => {
                let Some(event) = maybe_event else {
                    break;
                };
                if let Event::Key(key_event) = &event && is_quit(key_event) {
                    break;
                }
                effects.extend(handle_input_event(app, main_view, event));
                true
            }

            _ = ticker.tick() => {
                let had_toasts = !app.toasts.is_empty();
                effects.extend(main_view.handle_message(app, Msg::Tick));
                needs_ticks || had_toasts
            }

            Some(joined) = pending_execs.next(), if !pending_execs.is_empty() => {
                effects.extend(complete_exec(app, main_view, joined, !pending_execs.is_empty()));
                true
            }

            _ = signal::ctrl_c() => { break; }
        };

        if !effects.is_empty() {
            process_effects(app, main_view, std::mem::take(&mut effects), &mut pending_execs);
            needs_render = true;
        }
        if app.nav_bar.sync_route_events() {
            needs_render = true;
        }

        if needs_render {
            render(terminal, app, main_view)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::NoopApi;
    use rentals_types::RentalEntity;

    #[test]
    fn quit_keys_require_control() {
        assert!(is_quit(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL)));
        assert!(is_quit(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!is_quit(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
    }

    #[tokio::test]
    async fn editing_a_rental_fills_the_form_and_returns_home() {
        let mut app = App::new(AppConfig::default(), Arc::new(NoopApi));
        let mut main_view = MainView::new(Route::Home);
        let mut pending = FuturesUnordered::new();
        process_effects(&mut app, &mut main_view, vec![Effect::SwitchTo(Route::Table)], &mut pending);
        assert_eq!(pending.len(), 1);
        assert!(app.rentals_table.is_loading());

        let rental = RentalEntity::new("Alice", "a@b.com", "Bob").with_id("42");
        process_effects(&mut app, &mut main_view, vec![Effect::EditRental(rental)], &mut pending);

        assert_eq!(app.current_route(), Route::Home);
        assert!(app.rental_form.mode().is_edit());
        assert_eq!(app.nav_bar.active_entry().map(|entry| entry.id), Some(1));
    }

    #[tokio::test]
    async fn aborted_task_surfaces_as_an_error_toast() {
        let mut app = App::new(AppConfig::default(), Arc::new(NoopApi));
        let mut main_view = MainView::new(Route::Home);
        app.executing = true;
        app.throbber_idx = 3;

        let handle = tokio::spawn(std::future::pending::<ExecOutcome>());
        handle.abort();
        let joined = handle.await;
        let effects = complete_exec(&mut app, &mut main_view, joined, false);

        assert!(effects.is_empty());
        assert!(!app.executing);
        assert_eq!(app.throbber_idx, 0);
        let message = app.toasts.visible().next().map(|toast| toast.message.clone());
        assert!(message.is_some_and(|message| message.starts_with("Background task failed\n")));
    }

    #[tokio::test]
    async fn toggling_the_sidebar_collapses_the_nav_panel() {
        let mut app = App::new(AppConfig::default(), Arc::new(NoopApi));
        let mut main_view = MainView::new(Route::Home);
        let mut pending = FuturesUnordered::new();

        process_effects(&mut app, &mut main_view, vec![Effect::ToggleSidebar], &mut pending);

        assert!(!app.nav_bar.is_expanded());
        assert!(pending.is_empty());
    }
}
