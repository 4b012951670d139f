//! # Rentals Admin TUI
//!
//! Terminal admin screen for a rentals service: a collapsible sidebar
//! navigation panel, a rental create/edit form, and a rentals table.
//!
//! ## Architecture
//!
//! Components implement [`ui::components::Component`] and keep their state
//! on [`app::App`]. They return `Effect`s; the runtime applies navigation and
//! layout effects directly and hands transport effects to the command layer,
//! whose Tokio tasks report back as `Msg::ExecCompleted`.

mod app;
mod cmd;
mod layout_service;
mod router;
mod ui;

use std::sync::Arc;

use anyhow::Result;
use rentals_api::RentalsApi;
use rentals_util::AppConfig;

pub use layout_service::LayoutService;
pub use router::{RouteSubscription, Router, RouterEvent};

/// Runs the TUI until the user quits.
///
/// Takes over the terminal for the duration of the call and restores it on
/// exit, including when the event loop fails.
pub async fn run(config: AppConfig, api: Arc<dyn RentalsApi>) -> Result<()> {
    ui::runtime::run_app(config, api).await
}

#[cfg(test)]
pub(crate) mod test_support {
    use anyhow::Result;
    use async_trait::async_trait;
    use rentals_api::RentalsApi;
    use rentals_types::{RentalEntity, RentalId, RentalPayload};

    /// Rentals API that accepts everything and returns nothing.
    pub struct NoopApi;

    #[async_trait]
    impl RentalsApi for NoopApi {
        async fn list_rentals(&self) -> Result<Vec<RentalEntity>> {
            Ok(Vec::new())
        }

        async fn create_rental(&self, _payload: &RentalPayload) -> Result<Option<RentalEntity>> {
            Ok(None)
        }

        async fn update_rental(&self, _id: &RentalId, _payload: &RentalPayload) -> Result<Option<RentalEntity>> {
            Ok(None)
        }
    }
}
