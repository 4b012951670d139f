//! Shared type definitions for the rentals admin workspace.
//!
//! Holds the rental resource model, the route enumeration, and the
//! message/effect vocabulary exchanged between the TUI components, the
//! runtime loop, and the command layer.

mod rental;
mod route;

pub use rental::{RentalCommand, RentalCommandKind, RentalEntity, RentalField, RentalId, RentalPayload};
pub use route::{ParseRouteError, Route};

/// Messages that can be sent to update the application state.
///
/// Messages are produced by the runtime (ticks, resizes) or by completed
/// background work and are routed through the main view to the active
/// component.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Periodic UI tick (toast expiry, throbbers)
    Tick,
    /// Terminal resized
    Resize(u16, u16),
    /// Background execution completed with outcome
    ExecCompleted(Box<ExecOutcome>),
}

/// Side effects requested by components.
///
/// Effects describe "what should happen"; the runtime and the command layer
/// decide how (navigation, HTTP requests, state hand-offs).
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Navigate to a top-level route through the router
    SwitchTo(Route),
    /// Supply a rental to the editor form and show it
    EditRental(RentalEntity),
    /// Hand a create or update command to the rentals service
    SaveRental(RentalCommand),
    /// Fetch the rentals list from the service
    LoadRentals,
    /// Flip the sidebar expanded/collapsed signal
    ToggleSidebar,
}

/// Result of an asynchronous rentals service call.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecOutcome {
    /// The rentals list was fetched
    RentalsLoaded(Vec<RentalEntity>),
    /// A create or update command was accepted by the service
    RentalSaved {
        kind: RentalCommandKind,
        rental_id: Option<RentalId>,
    },
    /// Fetching the rentals list failed
    RentalsLoadFailed(String),
    /// Any other request failed; `context` names the operation
    Failed { context: String, message: String },
}

impl ExecOutcome {
    pub fn failed(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            context: context.into(),
            message: message.into(),
        }
    }
}
