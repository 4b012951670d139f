//! Table of rentals fetched from the rentals service.

mod rentals_table_component;
mod state;

pub use rentals_table_component::RentalsTableComponent;
pub use state::RentalsTableState;
