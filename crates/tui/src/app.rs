//! Application state for the rentals TUI.
//!
//! `App` is the central state container: the router and layout service, each
//! component's state, the toast queue, and the rat-focus tree. Components
//! read and mutate it; `update` applies messages that do not belong to a
//! single component.

use std::{fmt, sync::Arc, time::Instant};

use rat_focus::{Focus, FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use rentals_api::RentalsApi;
use rentals_types::{Effect, ExecOutcome, Msg, Route};
use rentals_util::{AppConfig, FieldErrorFormatter};
use tracing::{info, warn};

use crate::{
    layout_service::LayoutService,
    router::Router,
    ui::{
        components::{
            nav_bar::VerticalNavBarState,
            rental_form::RentalFormState,
            rentals_table::RentalsTableState,
            toasts::{NotificationService, ToastState},
        },
        theme::{self, Theme},
    },
};

const THROBBER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Cross-cutting shared context owned by the App.
pub struct SharedCtx {
    pub theme: Box<dyn Theme>,
    pub config: AppConfig,
    /// Transport used by the command layer.
    pub api: Arc<dyn RentalsApi>,
}

impl SharedCtx {
    pub fn new(config: AppConfig, api: Arc<dyn RentalsApi>) -> Self {
        Self {
            theme: theme::load(),
            config,
            api,
        }
    }
}

impl fmt::Debug for SharedCtx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedCtx")
            .field("theme", &self.theme)
            .field("api_base_url", &self.config.api_base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct App {
    pub ctx: SharedCtx,
    pub router: Router,
    pub layout: LayoutService,
    pub nav_bar: VerticalNavBarState,
    pub rental_form: RentalFormState,
    pub rentals_table: RentalsTableState,
    pub toasts: ToastState,
    /// Focus tree, rebuilt before every render.
    pub focus: Focus,
    root_focus: FocusFlag,
    /// Whether a request is in flight
    pub executing: bool,
    /// Animation frame for the request throbber
    pub throbber_idx: usize,
}

impl App {
    pub fn new(config: AppConfig, api: Arc<dyn RentalsApi>) -> Self {
        let router = Router::new(Route::default());
        let layout = LayoutService::new(config.sidebar_open);
        let nav_bar = VerticalNavBarState::with_default_entries(&router, layout.sidebar_open());
        let toasts = ToastState::new(config.toast_ttl());

        let mut app = Self {
            ctx: SharedCtx::new(config, api),
            router,
            layout,
            nav_bar,
            rental_form: RentalFormState::new(Arc::new(FieldErrorFormatter)),
            rentals_table: RentalsTableState::default(),
            toasts,
            focus: Focus::default(),
            root_focus: FocusFlag::new().with_name("root"),
            executing: false,
            throbber_idx: 0,
        };
        app.focus = FocusBuilder::build_for(&app);
        app
    }

    pub fn current_route(&self) -> Route {
        self.router.current_route()
    }

    pub fn throbber(&self) -> &'static str {
        THROBBER_FRAMES[self.throbber_idx % THROBBER_FRAMES.len()]
    }

    /// Applies a message to shared state, returning follow-up effects.
    pub fn update(&mut self, msg: &Msg) -> Vec<Effect> {
        let mut effects = Vec::new();
        match msg {
            Msg::Tick => {
                if self.executing {
                    self.throbber_idx = (self.throbber_idx + 1) % THROBBER_FRAMES.len();
                }
                self.toasts.expire(Instant::now());
            }
            Msg::Resize(..) => {}
            Msg::ExecCompleted(outcome) => self.apply_outcome(outcome, &mut effects),
        }
        effects
    }

    fn apply_outcome(&mut self, outcome: &ExecOutcome, effects: &mut Vec<Effect>) {
        match outcome {
            ExecOutcome::RentalsLoaded(rentals) => {
                info!(count = rentals.len(), "rentals loaded");
                self.rentals_table.set_rentals(rentals.clone());
            }
            ExecOutcome::RentalSaved { kind, rental_id } => {
                let message = match rental_id {
                    Some(id) => format!("Rental #{id} {}", kind.past_tense()),
                    None => format!("Rental {}", kind.past_tense()),
                };
                self.toasts.success(&message);
                effects.push(Effect::LoadRentals);
            }
            ExecOutcome::RentalsLoadFailed(message) => {
                warn!(%message, "loading rentals failed");
                self.rentals_table.fail(message.clone());
                self.toasts.error(&format!("Loading rentals failed\n{message}"));
            }
            ExecOutcome::Failed { context, message } => {
                warn!(%context, %message, "request failed");
                self.toasts.error(&format!("{context} failed\n{message}"));
            }
        }
    }
}

impl HasFocus for App {
    /// The nav panel, then the content of the current route.
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        builder.widget(&self.nav_bar);
        match self.current_route() {
            Route::Home => builder.widget(&self.rental_form),
            Route::Table => builder.widget(&self.rentals_table),
        };
        builder.end(tag);
    }

    fn focus(&self) -> FocusFlag {
        self.root_focus.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::NoopApi;
    use rentals_types::{RentalCommandKind, RentalEntity, RentalId};

    fn app() -> App {
        App::new(AppConfig::default(), Arc::new(NoopApi))
    }

    #[test]
    fn saved_rental_toasts_and_refreshes() {
        let mut app = app();
        let effects = app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::RentalSaved {
            kind: RentalCommandKind::Update,
            rental_id: Some(RentalId::new("42")),
        })));

        assert_eq!(effects, vec![Effect::LoadRentals]);
        assert_eq!(app.toasts.visible().next().map(|toast| toast.message.as_str()), Some("Rental #42 updated"));
    }

    #[test]
    fn failures_surface_as_error_toasts() {
        let mut app = app();
        app.rentals_table.begin_loading();
        app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::RentalsLoadFailed("connection refused".into()))));

        assert!(!app.rentals_table.is_loading());
        assert_eq!(app.rentals_table.last_error(), Some("connection refused"));
        assert_eq!(
            app.toasts.visible().next().map(|toast| toast.message.as_str()),
            Some("Loading rentals failed\nconnection refused")
        );
    }

    #[test]
    fn save_failure_leaves_a_pending_list_load_alone() {
        let mut app = app();
        app.rentals_table.begin_loading();
        app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::failed("Saving rental", "409 conflict"))));

        assert!(app.rentals_table.is_loading());
        assert_eq!(app.rentals_table.last_error(), None);
        assert_eq!(
            app.toasts.visible().next().map(|toast| toast.message.as_str()),
            Some("Saving rental failed\n409 conflict")
        );
    }

    #[test]
    fn loaded_rentals_fill_the_table() {
        let mut app = app();
        let rentals = vec![RentalEntity::new("Alice", "a@b.com", "Bob").with_id("1")];
        app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::RentalsLoaded(rentals))));
        assert_eq!(app.rentals_table.rentals().len(), 1);
    }

    #[test]
    fn app_starts_on_home_with_sidebar_from_config() {
        let config = AppConfig {
            sidebar_open: false,
            ..AppConfig::default()
        };
        let app = App::new(config, Arc::new(NoopApi));
        assert_eq!(app.current_route(), Route::Home);
        assert!(!app.nav_bar.is_expanded());
        assert_eq!(app.router.subscriber_count(), 1);
    }
}
