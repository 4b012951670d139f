//! Transient notifications drawn over the main view.

mod state;
mod toasts_component;

use state::ToastLevel;
pub use state::{NotificationService, ToastState};
pub use toasts_component::ToastsComponent;
