//! Field validators used by the rental editor form.
//!
//! Validators run against the raw text of a field and report every active
//! failure, in declaration order, so callers can derive one message per
//! failure.

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;
use rentals_types::RentalField;
use thiserror::Error;

/// Maximum total length of an email address.
const EMAIL_MAX_LENGTH: usize = 254;
/// Maximum length of the part before `@`.
const EMAIL_LOCAL_MAX_LENGTH: usize = 64;

static EMAIL_LOCAL_PART: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*$").expect("valid email local-part regex")
});

static EMAIL_DOMAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$")
        .expect("valid email domain regex")
});

/// A single active validation failure on a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ValidationError {
    #[error("is required")]
    Required,
    #[error("must be a valid email address")]
    Email,
}

impl ValidationError {
    /// Stable key of the failure (`required`, `email`).
    pub fn key(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Email => "email",
        }
    }
}

/// Declarative rule attached to a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    /// Fails on the empty string. Whitespace counts as a value.
    Required,
    /// Fails on non-empty text that is not an email address.
    Email,
}

impl Validator {
    pub fn validate(self, value: &str) -> Option<ValidationError> {
        match self {
            Self::Required if value.is_empty() => Some(ValidationError::Required),
            // Empty input is left to `Required`.
            Self::Email if !value.is_empty() && !is_valid_email(value) => Some(ValidationError::Email),
            _ => None,
        }
    }
}

/// Rules every rental write must satisfy, per field. The identifier is
/// never validated.
pub fn field_validators(field: RentalField) -> &'static [Validator] {
    match field {
        RentalField::Name | RentalField::Owner => &[Validator::Required],
        RentalField::Email => &[Validator::Required, Validator::Email],
        RentalField::RentalId => &[],
    }
}

/// Ordered set of the failures currently active on a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(IndexSet<ValidationError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, error: ValidationError) -> bool {
        self.0.contains(&error)
    }

    pub fn iter(&self) -> impl Iterator<Item = ValidationError> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<ValidationError> for ValidationErrors {
    fn from_iter<T: IntoIterator<Item = ValidationError>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Runs every validator against `value`, collecting the failures.
pub fn validate_value(value: &str, validators: &[Validator]) -> ValidationErrors {
    validators.iter().filter_map(|validator| validator.validate(value)).collect()
}

/// Returns `true` when `value` is a syntactically valid email address.
///
/// Accepts dot-separated atoms before the `@` and dot-separated host labels
/// after it. Single-label domains (`user@localhost`) are accepted.
pub fn is_valid_email(value: &str) -> bool {
    if value.len() > EMAIL_MAX_LENGTH {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    local.len() <= EMAIL_LOCAL_MAX_LENGTH && EMAIL_LOCAL_PART.is_match(local) && EMAIL_DOMAIN.is_match(domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_only_empty_text() {
        assert_eq!(Validator::Required.validate(""), Some(ValidationError::Required));
        assert_eq!(Validator::Required.validate(" "), None);
        assert_eq!(Validator::Required.validate("Alice"), None);
    }

    #[test]
    fn email_accepts_common_addresses() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
        assert!(is_valid_email("user@localhost"));
    }

    #[test]
    fn email_rejects_malformed_addresses() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@@b.com"));
        assert!(!is_valid_email(".a@b.com"));
        assert!(!is_valid_email("a@-b.com"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email(&format!("{}@b.com", "a".repeat(65))));
    }

    #[test]
    fn empty_email_only_reports_required() {
        let errors = validate_value("", &[Validator::Required, Validator::Email]);
        assert_eq!(errors.iter().collect::<Vec<_>>(), vec![ValidationError::Required]);
    }

    #[test]
    fn malformed_email_reports_email_failure() {
        let errors = validate_value("not-an-email", &[Validator::Required, Validator::Email]);
        assert_eq!(errors.len(), 1);
        assert!(errors.contains(ValidationError::Email));
    }

    #[test]
    fn field_rules_match_the_rental_model() {
        assert_eq!(field_validators(RentalField::Name), &[Validator::Required]);
        assert_eq!(field_validators(RentalField::Email), &[Validator::Required, Validator::Email]);
        assert_eq!(field_validators(RentalField::Owner), &[Validator::Required]);
        assert!(field_validators(RentalField::RentalId).is_empty());
    }
}
