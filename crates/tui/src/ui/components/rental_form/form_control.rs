use rat_focus::FocusFlag;
use rentals_types::RentalField;
use rentals_util::{ValidationErrors, Validator, field_validators, validate_value};

use crate::ui::components::common::TextInputState;

/// One form field: its text buffer, validators, and interaction flags.
///
/// A disabled control keeps its value for display but never reports errors
/// and ignores edits.
#[derive(Debug, Clone)]
pub struct FormControl {
    field: RentalField,
    input: TextInputState,
    validators: &'static [Validator],
    disabled: bool,
    touched: bool,
    pub focus: FocusFlag,
}

impl FormControl {
    /// An empty control carrying the rules of `field`.
    pub fn new(field: RentalField) -> Self {
        Self {
            field,
            input: TextInputState::new(),
            validators: field_validators(field),
            disabled: false,
            touched: false,
            focus: FocusFlag::new().with_name(&format!("rental_form.{}", field.key())),
        }
    }

    /// A disabled control holding `value`.
    pub fn disabled_with_value(field: RentalField, value: &str) -> Self {
        let mut control = Self::new(field);
        control.set_value(value);
        control.disabled = true;
        control
    }

    pub fn field(&self) -> RentalField {
        self.field
    }

    pub fn value(&self) -> &str {
        self.input.input()
    }

    pub fn input(&self) -> &TextInputState {
        &self.input
    }

    /// Programmatic update; does not count as user interaction.
    pub fn set_value(&mut self, value: &str) {
        self.input.set_input(value);
    }

    /// Moves the cursor without counting as an edit.
    pub fn move_cursor(&mut self, apply: impl FnOnce(&mut TextInputState)) {
        apply(&mut self.input);
    }

    /// Applies a user edit unless the control is disabled.
    pub fn edit(&mut self, apply: impl FnOnce(&mut TextInputState)) -> bool {
        if self.disabled {
            return false;
        }
        apply(&mut self.input);
        self.touched = true;
        true
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_required(&self) -> bool {
        self.validators.contains(&Validator::Required)
    }

    pub fn is_touched(&self) -> bool {
        self.touched
    }

    pub fn mark_touched(&mut self) {
        self.touched = true;
    }

    /// Clears the value and interaction state.
    pub fn reset(&mut self) {
        self.input.clear();
        self.touched = false;
    }

    /// Current validation errors, or `None` when valid or disabled.
    pub fn errors(&self) -> Option<ValidationErrors> {
        if self.disabled {
            return None;
        }
        let errors = validate_value(self.value(), self.validators);
        (!errors.is_empty()).then_some(errors)
    }
}
