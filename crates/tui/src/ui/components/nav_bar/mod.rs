//! Sidebar navigation panel.
//!
//! Lists the admin entries (Home, Table), highlights the one matching the
//! router's latest `NavigationEnd` URL, and collapses to icons when the
//! layout service's sidebar signal is off.

mod nav_bar_component;
mod state;

pub use nav_bar_component::VerticalNavBarComponent;
pub use state::VerticalNavBarState;
