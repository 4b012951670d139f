//! Rental create/edit form.
//!
//! The form switches between create and edit mode whenever a rental is
//! supplied or cleared, gates submission on field validation, and hands a
//! single create or update command to its [`RentalsService`].

mod form_control;
mod rental_form_component;
mod state;

use form_control::FormControl;
pub use rental_form_component::RentalFormComponent;
pub use state::RentalFormState;
use state::{RentalsService, SubmitOutcome};
