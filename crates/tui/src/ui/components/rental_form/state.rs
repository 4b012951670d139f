use std::{mem, sync::Arc};

use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use rentals_types::{RentalCommandKind, RentalEntity, RentalField, RentalId, RentalPayload};
use rentals_util::{ErrorMessageFormatter, FieldErrorFormatter, ValidationErrors};
use tracing::{debug, info};

use super::form_control::FormControl;
use crate::ui::components::toasts::NotificationService;

/// Heading line of every rejected-submission notification.
const SAVE_ERROR_PREFIX: &str = "Error saving rental";

/// Write side of the rentals resource, as seen by the form.
///
/// Calls are fire-and-forget; outcomes are reported elsewhere.
pub trait RentalsService {
    fn create_rental(&mut self, payload: RentalPayload);
    fn update_rental(&mut self, id: RentalId, payload: RentalPayload);
}

/// Create vs edit. The identifier control exists only while editing.
#[derive(Debug, Clone, Default)]
pub enum FormMode {
    #[default]
    Create,
    Edit {
        rental_id: FormControl,
    },
}

impl FormMode {
    /// Mode after the supplied entity changes to `entity`.
    ///
    /// Applying the same entity twice yields the same mode.
    pub fn transition(self, entity: Option<&RentalEntity>) -> FormMode {
        let Some(entity) = entity else {
            return FormMode::Create;
        };
        let value = entity.field_value(RentalField::RentalId);
        let rental_id = match self {
            FormMode::Edit { mut rental_id } => {
                rental_id.set_value(value);
                rental_id
            }
            FormMode::Create => FormControl::disabled_with_value(RentalField::RentalId, value),
        };
        FormMode::Edit { rental_id }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self, FormMode::Edit { .. })
    }

    pub fn rental_id(&self) -> Option<&FormControl> {
        match self {
            FormMode::Create => None,
            FormMode::Edit { rental_id } => Some(rental_id),
        }
    }
}

/// Result of a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted(RentalCommandKind),
    Rejected { invalid_fields: Vec<RentalField> },
}

/// State of the rental create/edit form.
#[derive(Debug)]
pub struct RentalFormState {
    rental_entity: Option<RentalEntity>,
    name: FormControl,
    email: FormControl,
    owner: FormControl,
    mode: FormMode,
    formatter: Arc<dyn ErrorMessageFormatter>,
    pub container_focus: FocusFlag,
    pub f_submit: FocusFlag,
    pub last_area: Rect,
    /// Input boxes from the last render, for mouse hit testing.
    pub field_areas: Vec<(RentalField, Rect)>,
    pub submit_area: Rect,
}

impl Default for RentalFormState {
    fn default() -> Self {
        Self::new(Arc::new(FieldErrorFormatter))
    }
}

impl RentalFormState {
    pub fn new(formatter: Arc<dyn ErrorMessageFormatter>) -> Self {
        Self {
            rental_entity: None,
            name: FormControl::new(RentalField::Name),
            email: FormControl::new(RentalField::Email),
            owner: FormControl::new(RentalField::Owner),
            mode: FormMode::Create,
            formatter,
            container_focus: FocusFlag::new().with_name("rental_form"),
            f_submit: FocusFlag::new().with_name("rental_form.submit"),
            last_area: Rect::default(),
            field_areas: Vec::new(),
            submit_area: Rect::default(),
        }
    }

    pub fn rental_entity(&self) -> Option<&RentalEntity> {
        self.rental_entity.as_ref()
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    /// Supplies (or clears) the entity being edited and resynchronizes the form.
    pub fn set_rental_entity(&mut self, entity: Option<RentalEntity>) {
        debug!(
            rental_id = entity.as_ref().and_then(|e| e.rental_id.as_ref()).map(RentalId::as_str),
            "rental entity supplied"
        );
        self.rental_entity = entity;
        self.apply_rental_entity();
    }

    fn apply_rental_entity(&mut self) {
        let Self {
            rental_entity,
            name,
            email,
            owner,
            mode,
            ..
        } = self;
        *mode = mem::take(mode).transition(rental_entity.as_ref());
        if let Some(entity) = rental_entity {
            for (field, control) in [(RentalField::Name, name), (RentalField::Email, email), (RentalField::Owner, owner)] {
                control.set_value(entity.field_value(field));
            }
        }
    }

    /// Controls in display order: name, email, owner, then rentalId when editing.
    pub fn controls(&self) -> impl Iterator<Item = &FormControl> {
        [&self.name, &self.email, &self.owner].into_iter().chain(self.mode.rental_id())
    }

    pub fn control(&self, field: RentalField) -> Option<&FormControl> {
        self.controls().find(|control| control.field() == field)
    }

    /// Mutable access to an editable control; the identifier is never editable.
    pub fn base_control_mut(&mut self, field: RentalField) -> Option<&mut FormControl> {
        match field {
            RentalField::Name => Some(&mut self.name),
            RentalField::Email => Some(&mut self.email),
            RentalField::Owner => Some(&mut self.owner),
            RentalField::RentalId => None,
        }
    }

    pub fn value(&self, field: RentalField) -> Option<&str> {
        self.control(field).map(FormControl::value)
    }

    /// Fields currently in error, in display order.
    pub fn invalid_fields(&self) -> Vec<(RentalField, ValidationErrors)> {
        self.controls()
            .filter_map(|control| control.errors().map(|errors| (control.field(), errors)))
            .collect()
    }

    /// Message for a field's errors, via the injected formatter.
    pub fn error_message(&self, field: RentalField, errors: &ValidationErrors) -> String {
        self.formatter.format(field.key(), errors)
    }

    /// Validates and, if everything passes, hands a create or update command
    /// to `rentals` and resets the form.
    ///
    /// A rejected submission notifies once per invalid field and leaves the
    /// values in place with every field marked touched.
    pub fn submit(
        &mut self,
        rentals: &mut impl RentalsService,
        notifications: &mut impl NotificationService,
    ) -> SubmitOutcome {
        let invalid = self.invalid_fields();
        if !invalid.is_empty() {
            for (field, errors) in &invalid {
                let message = format!("{SAVE_ERROR_PREFIX}\n{}", self.error_message(*field, errors));
                notifications.error(&message);
            }
            for field in RentalField::BASE {
                if let Some(control) = self.base_control_mut(field) {
                    control.mark_touched();
                }
            }
            let invalid_fields: Vec<_> = invalid.into_iter().map(|(field, _)| field).collect();
            debug!(?invalid_fields, "rental submission rejected");
            return SubmitOutcome::Rejected { invalid_fields };
        }

        let payload = RentalPayload {
            email: self.email.value().to_string(),
            name: self.name.value().to_string(),
            owner: self.owner.value().to_string(),
        };
        let kind = match self.mode.rental_id() {
            Some(rental_id) => {
                let id = RentalId::new(rental_id.value());
                info!(rental_id = %id, "submitting rental update");
                rentals.update_rental(id, payload);
                RentalCommandKind::Update
            }
            None => {
                info!("submitting rental creation");
                rentals.create_rental(payload);
                RentalCommandKind::Create
            }
        };
        self.reset();
        SubmitOutcome::Submitted(kind)
    }

    /// Clears the supplied entity and every value; back to the create shape.
    pub fn reset(&mut self) {
        self.rental_entity = None;
        self.mode = FormMode::Create;
        self.name.reset();
        self.email.reset();
        self.owner.reset();
    }

    /// Focus flags of the navigable widgets, in tab order.
    pub fn focus_order(&self) -> [&FocusFlag; 4] {
        [&self.name.focus, &self.email.focus, &self.owner.focus, &self.f_submit]
    }

    pub fn name_focus(&self) -> &FocusFlag {
        &self.name.focus
    }

    pub fn focused_field(&self) -> Option<RentalField> {
        [&self.name, &self.email, &self.owner]
            .into_iter()
            .find(|control| control.focus.get())
            .map(FormControl::field)
    }

    /// Flag of the widget after (or before) the focused one, wrapping around.
    pub fn cycle_focus(&self, forward: bool) -> Option<FocusFlag> {
        let order = self.focus_order();
        let len = order.len();
        let next = match order.iter().position(|flag| flag.get()) {
            Some(index) if forward => (index + 1) % len,
            Some(index) => (index + len - 1) % len,
            None => 0,
        };
        order.get(next).map(|flag| (*flag).clone())
    }
}

impl HasFocus for RentalFormState {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        for flag in self.focus_order() {
            builder.leaf_widget(flag);
        }
        builder.end(tag);
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        self.last_area
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct RecordingRentals {
        created: Vec<RentalPayload>,
        updated: Vec<(RentalId, RentalPayload)>,
    }

    impl RecordingRentals {
        fn command_count(&self) -> usize {
            self.created.len() + self.updated.len()
        }
    }

    impl RentalsService for RecordingRentals {
        fn create_rental(&mut self, payload: RentalPayload) {
            self.created.push(payload);
        }

        fn update_rental(&mut self, id: RentalId, payload: RentalPayload) {
            self.updated.push((id, payload));
        }
    }

    #[derive(Debug, Default)]
    struct RecordingNotifications {
        errors: Vec<String>,
    }

    impl NotificationService for RecordingNotifications {
        fn error(&mut self, message: &str) {
            self.errors.push(message.to_string());
        }

        fn success(&mut self, _message: &str) {}

        fn info(&mut self, _message: &str) {}
    }

    fn fill(form: &mut RentalFormState, email: &str, name: &str, owner: &str) {
        for (field, value) in [(RentalField::Email, email), (RentalField::Name, name), (RentalField::Owner, owner)] {
            if let Some(control) = form.base_control_mut(field) {
                control.edit(|input| input.set_input(value));
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct FieldSnapshot {
        field: RentalField,
        value: String,
        disabled: bool,
    }

    fn snapshot(form: &RentalFormState) -> Vec<FieldSnapshot> {
        form.controls()
            .map(|control| FieldSnapshot {
                field: control.field(),
                value: control.value().to_string(),
                disabled: control.is_disabled(),
            })
            .collect()
    }

    fn fields(form: &RentalFormState) -> Vec<RentalField> {
        form.controls().map(FormControl::field).collect()
    }

    fn alice() -> RentalEntity {
        RentalEntity::new("Alice", "a@b.com", "Bob").with_id("42")
    }

    #[test]
    fn starts_in_create_mode_with_base_fields() {
        let form = RentalFormState::default();
        assert!(!form.mode().is_edit());
        assert_eq!(fields(&form), RentalField::BASE.to_vec());
    }

    #[test]
    fn supplied_entity_adds_disabled_identifier_and_patches_values() {
        let mut form = RentalFormState::default();
        form.set_rental_entity(Some(alice()));

        assert_eq!(
            snapshot(&form),
            vec![
                FieldSnapshot {
                    field: RentalField::Name,
                    value: "Alice".into(),
                    disabled: false
                },
                FieldSnapshot {
                    field: RentalField::Email,
                    value: "a@b.com".into(),
                    disabled: false
                },
                FieldSnapshot {
                    field: RentalField::Owner,
                    value: "Bob".into(),
                    disabled: false
                },
                FieldSnapshot {
                    field: RentalField::RentalId,
                    value: "42".into(),
                    disabled: true
                },
            ]
        );
    }

    #[test]
    fn entity_without_identifier_still_enters_edit_mode() {
        let mut form = RentalFormState::default();
        form.set_rental_entity(Some(RentalEntity::new("Alice", "a@b.com", "Bob")));

        assert!(form.mode().is_edit());
        assert_eq!(form.value(RentalField::RentalId), Some(""));
    }

    #[test]
    fn clearing_the_entity_removes_identifier_and_keeps_values() {
        let mut form = RentalFormState::default();
        form.set_rental_entity(Some(alice()));
        form.set_rental_entity(None);

        assert_eq!(fields(&form), RentalField::BASE.to_vec());
        assert_eq!(form.value(RentalField::Name), Some("Alice"));
    }

    #[test]
    fn transition_is_idempotent() {
        let entity = alice();
        let once = FormMode::Create.transition(Some(&entity));
        let twice = once.clone().transition(Some(&entity));
        assert_eq!(
            once.rental_id().map(|control| (control.value().to_string(), control.is_disabled())),
            twice.rental_id().map(|control| (control.value().to_string(), control.is_disabled())),
        );

        let cleared = twice.transition(None).transition(None);
        assert!(!cleared.is_edit());

        let mut form = RentalFormState::default();
        form.set_rental_entity(Some(alice()));
        let first = snapshot(&form);
        form.set_rental_entity(Some(alice()));
        assert_eq!(snapshot(&form), first);
    }

    #[test]
    fn resupplying_reuses_the_identifier_control() {
        let mut form = RentalFormState::default();
        form.set_rental_entity(Some(alice()));
        let flag = form.control(RentalField::RentalId).map(|control| control.focus.widget_id());

        form.set_rental_entity(Some(RentalEntity::new("Carol", "c@d.com", "Dan").with_id("7")));

        assert_eq!(form.control(RentalField::RentalId).map(|control| control.focus.widget_id()), flag);
        assert_eq!(form.value(RentalField::RentalId), Some("7"));
        assert_eq!(form.value(RentalField::Name), Some("Carol"));
    }

    #[test]
    fn empty_required_field_blocks_submission() {
        let mut form = RentalFormState::default();
        fill(&mut form, "a@b.com", "", "Bob");
        let mut rentals = RecordingRentals::default();
        let mut notifications = RecordingNotifications::default();

        let outcome = form.submit(&mut rentals, &mut notifications);

        assert_eq!(
            outcome,
            SubmitOutcome::Rejected {
                invalid_fields: vec![RentalField::Name]
            }
        );
        assert_eq!(rentals.command_count(), 0);
        assert!(!notifications.errors.is_empty());
        assert_eq!(form.value(RentalField::Email), Some("a@b.com"));
    }

    #[test]
    fn invalid_email_yields_exactly_one_notification() {
        let mut form = RentalFormState::default();
        fill(&mut form, "not-an-email", "Alice", "Bob");
        let mut rentals = RecordingRentals::default();
        let mut notifications = RecordingNotifications::default();

        form.submit(&mut rentals, &mut notifications);

        assert_eq!(rentals.command_count(), 0);
        assert_eq!(
            notifications.errors,
            vec!["Error saving rental\nemail: must be a valid email address".to_string()]
        );
    }

    #[test]
    fn every_invalid_field_is_reported() {
        let mut form = RentalFormState::default();
        let mut rentals = RecordingRentals::default();
        let mut notifications = RecordingNotifications::default();

        let outcome = form.submit(&mut rentals, &mut notifications);

        assert_eq!(
            outcome,
            SubmitOutcome::Rejected {
                invalid_fields: RentalField::BASE.to_vec()
            }
        );
        assert_eq!(notifications.errors.len(), 3);
        assert!(notifications.errors[0].ends_with("name: is required"));
        assert!(form.controls().all(FormControl::is_touched));
    }

    #[test]
    fn valid_create_emits_one_command_and_resets() {
        let mut form = RentalFormState::default();
        fill(&mut form, "a@b.com", "Alice", "Bob");
        let mut rentals = RecordingRentals::default();
        let mut notifications = RecordingNotifications::default();

        let outcome = form.submit(&mut rentals, &mut notifications);

        assert_eq!(outcome, SubmitOutcome::Submitted(RentalCommandKind::Create));
        assert_eq!(
            rentals.created,
            vec![RentalPayload {
                email: "a@b.com".into(),
                name: "Alice".into(),
                owner: "Bob".into(),
            }]
        );
        assert!(rentals.updated.is_empty());
        assert!(notifications.errors.is_empty());
        assert!(form.rental_entity().is_none());
        assert!(form.controls().all(|control| control.value().is_empty() && !control.is_touched()));
    }

    #[test]
    fn valid_edit_emits_update_and_returns_to_create_shape() {
        let mut form = RentalFormState::default();
        form.set_rental_entity(Some(alice()));
        let mut rentals = RecordingRentals::default();
        let mut notifications = RecordingNotifications::default();

        let outcome = form.submit(&mut rentals, &mut notifications);

        assert_eq!(outcome, SubmitOutcome::Submitted(RentalCommandKind::Update));
        assert_eq!(
            rentals.updated,
            vec![(
                RentalId::new("42"),
                RentalPayload {
                    email: "a@b.com".into(),
                    name: "Alice".into(),
                    owner: "Bob".into(),
                }
            )]
        );
        assert!(rentals.created.is_empty());
        assert_eq!(fields(&form), RentalField::BASE.to_vec());
        assert!(form.rental_entity().is_none());
    }

    #[test]
    fn custom_formatter_is_used_for_notifications() {
        #[derive(Debug)]
        struct Terse;
        impl ErrorMessageFormatter for Terse {
            fn format(&self, field: &str, errors: &ValidationErrors) -> String {
                format!("{field}({})", errors.len())
            }
        }

        let mut form = RentalFormState::new(Arc::new(Terse));
        fill(&mut form, "", "Alice", "Bob");
        let mut notifications = RecordingNotifications::default();
        form.submit(&mut RecordingRentals::default(), &mut notifications);

        assert_eq!(notifications.errors, vec!["Error saving rental\nemail(1)".to_string()]);
    }

    #[test]
    fn focus_cycles_through_fields_and_submit() {
        let form = RentalFormState::default();
        let first = form.cycle_focus(true).map(|flag| flag.widget_id());
        assert_eq!(first, Some(form.name_focus().widget_id()));

        form.f_submit.set(true);
        let wrapped = form.cycle_focus(true).map(|flag| flag.widget_id());
        assert_eq!(wrapped, Some(form.name_focus().widget_id()));
    }
}
