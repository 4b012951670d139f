//! Command layer: turns effects into rentals service calls.
//!
//! Each [`Cmd`] runs on its own Tokio task against the configured
//! [`RentalsApi`]; the task resolves to an [`ExecOutcome`] that re-enters the
//! event loop as `Msg::ExecCompleted`. Failures never escape as errors here.

use std::sync::Arc;

use rentals_api::RentalsApi;
use rentals_types::{Effect, ExecOutcome, RentalCommand};
use tokio::task::{JoinHandle, spawn};
use tracing::debug;

use crate::app::App;

/// Side-effectful calls executed outside of state updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// `GET /rentals`
    LoadRentals,
    /// `POST /rentals` or `PUT /rentals/{id}`
    SaveRental(RentalCommand),
}

/// Maps transport effects to commands; UI-only effects map to nothing.
pub fn from_effects(effects: Vec<Effect>) -> Vec<Cmd> {
    effects
        .into_iter()
        .filter_map(|effect| match effect {
            Effect::LoadRentals => Some(Cmd::LoadRentals),
            Effect::SaveRental(command) => Some(Cmd::SaveRental(command)),
            Effect::SwitchTo(_) | Effect::EditRental(_) | Effect::ToggleSidebar => None,
        })
        .collect()
}

/// Spawns one task per command and returns their handles.
pub fn run_from_effects(app: &mut App, effects: Vec<Effect>) -> Vec<JoinHandle<ExecOutcome>> {
    let commands = from_effects(effects);
    if commands.iter().any(|command| matches!(command, Cmd::LoadRentals)) {
        app.rentals_table.begin_loading();
    }
    commands
        .into_iter()
        .map(|command| {
            let api = Arc::clone(&app.ctx.api);
            spawn(execute(api, command))
        })
        .collect()
}

/// Runs a single command to completion.
pub async fn execute(api: Arc<dyn RentalsApi>, command: Cmd) -> ExecOutcome {
    debug!(?command, "executing command");
    match command {
        Cmd::LoadRentals => match api.list_rentals().await {
            Ok(rentals) => ExecOutcome::RentalsLoaded(rentals),
            Err(error) => ExecOutcome::RentalsLoadFailed(format!("{error:#}")),
        },
        Cmd::SaveRental(command) => {
            let kind = command.kind();
            let result = match &command {
                RentalCommand::Create(payload) => api.create_rental(payload).await,
                RentalCommand::Update { id, payload } => api.update_rental(id, payload).await,
            };
            match result {
                Ok(saved) => {
                    let rental_id = saved.and_then(|rental| rental.rental_id).or_else(|| match command {
                        RentalCommand::Update { id, .. } => Some(id),
                        RentalCommand::Create(_) => None,
                    });
                    ExecOutcome::RentalSaved { kind, rental_id }
                }
                Err(error) => ExecOutcome::failed("Saving rental", format!("{error:#}")),
            }
        }
    }
}
