//! UI layer: components, the page shell, the runtime loop and theming.

pub mod components;
pub mod main_component;
pub mod runtime;
pub mod theme;
