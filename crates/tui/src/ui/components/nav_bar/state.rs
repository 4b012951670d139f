use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use rentals_types::Route;
use tokio::sync::watch;
use tracing::debug;

use crate::router::{Router, RouterEvent, RouteSubscription};

/// Width of the panel while the sidebar is expanded.
const EXPANDED_WIDTH: u16 = 18;
/// Width of the panel while the sidebar is collapsed (icons only).
const COLLAPSED_WIDTH: u16 = 7;

/// A single navigation entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEntry {
    pub id: u8,
    /// Short symbol shown in both collapsed and expanded layouts.
    pub icon: &'static str,
    pub label: &'static str,
    pub route: Route,
}

impl NavigationEntry {
    pub const fn new(id: u8, icon: &'static str, label: &'static str, route: Route) -> Self {
        Self { id, icon, label, route }
    }
}

/// The entries of the admin sidebar.
pub const NAVIGATION_ENTRIES: [NavigationEntry; 2] = [
    NavigationEntry::new(1, "⌂", "Home", Route::Home),
    NavigationEntry::new(2, "≣", "Table", Route::Table),
];

/// State for the navigation panel.
///
/// Tracks the active parent URL from router events and observes the layout
/// service's sidebar signal. The route subscription lives exactly as long as
/// this state.
#[derive(Debug)]
pub struct VerticalNavBarState {
    pub entries: Vec<NavigationEntry>,
    /// Last `NavigationEnd` URL with a single leading separator removed.
    active_parent_url: Option<String>,
    route_events: RouteSubscription,
    sidebar_open: watch::Receiver<bool>,
    /// Focus flag for the container in the global focus tree.
    pub container_focus: FocusFlag,
    /// Focus flags for each entry; kept in sync with `entries` length.
    pub item_focus_flags: Vec<FocusFlag>,
    /// Last rendered area of the panel; used for mouse focus and hit testing.
    pub last_area: Rect,
    /// Last computed per-entry row areas for hit testing.
    pub per_item_areas: Vec<Rect>,
}

impl VerticalNavBarState {
    pub fn new(entries: Vec<NavigationEntry>, router: &Router, sidebar_open: watch::Receiver<bool>) -> Self {
        let item_focus_flags = entries
            .iter()
            .map(|entry| FocusFlag::new().with_name(&format!("nav.entry.{}", entry.id)))
            .collect();
        Self {
            entries,
            active_parent_url: None,
            route_events: router.subscribe(),
            sidebar_open,
            container_focus: FocusFlag::new().with_name("nav"),
            item_focus_flags,
            last_area: Rect::default(),
            per_item_areas: Vec::new(),
        }
    }

    /// Panel with the Home and Table entries.
    pub fn with_default_entries(router: &Router, sidebar_open: watch::Receiver<bool>) -> Self {
        Self::new(NAVIGATION_ENTRIES.to_vec(), router, sidebar_open)
    }

    /// Applies router events received since the last call.
    ///
    /// Returns `true` when the active parent URL changed.
    pub fn sync_route_events(&mut self) -> bool {
        let mut changed = false;
        for event in self.route_events.drain() {
            if let RouterEvent::NavigationEnd { url, .. } = event {
                let parent = strip_leading_separator(&url).to_string();
                if self.active_parent_url.as_deref() != Some(parent.as_str()) {
                    self.active_parent_url = Some(parent);
                    debug!(entry = ?self.active_entry().map(|entry| entry.label), "active navigation entry");
                    changed = true;
                }
            }
        }
        changed
    }

    /// An entry is active when its path equals the active parent URL.
    pub fn is_active(&self, entry: &NavigationEntry) -> bool {
        self.active_parent_url.as_deref() == Some(entry.route.path())
    }

    pub fn active_entry(&self) -> Option<&NavigationEntry> {
        self.entries.iter().find(|entry| self.is_active(entry))
    }

    /// Current value of the sidebar signal.
    pub fn is_expanded(&self) -> bool {
        *self.sidebar_open.borrow()
    }

    pub fn preferred_width(&self) -> u16 {
        if self.is_expanded() {
            EXPANDED_WIDTH
        } else {
            COLLAPSED_WIDTH
        }
    }

    pub fn get_focused_list_item(&self) -> Option<(NavigationEntry, usize)> {
        let index = self.item_focus_flags.iter().position(|flag| flag.get())?;
        self.entries.get(index).map(|entry| (entry.clone(), index))
    }

    /// Focus flag of the entry after (or before) the focused one, wrapping around.
    pub fn cycle_focus(&self, forward: bool) -> Option<FocusFlag> {
        let len = self.item_focus_flags.len();
        let index = self.item_focus_flags.iter().position(|flag| flag.get())?;
        let next = if forward { (index + 1) % len } else { (index + len - 1) % len };
        self.item_focus_flags.get(next).cloned()
    }

    /// Focus flag of the active entry, falling back to the first entry.
    pub fn active_or_first_flag(&self) -> Option<FocusFlag> {
        let index = self.entries.iter().position(|entry| self.is_active(entry)).unwrap_or(0);
        self.item_focus_flags.get(index).cloned()
    }
}

fn strip_leading_separator(url: &str) -> &str {
    url.strip_prefix('/').unwrap_or(url)
}

impl HasFocus for VerticalNavBarState {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        for flag in &self.item_focus_flags {
            builder.leaf_widget(flag);
        }
        builder.end(tag);
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        self.last_area
    }
}
