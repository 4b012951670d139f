//! UI components: navigation panel, rental form, rentals table, toasts.

pub mod common;
pub mod component;
pub mod nav_bar;
pub mod rental_form;
pub mod rentals_table;
pub mod toasts;

pub(crate) use component::Component;
