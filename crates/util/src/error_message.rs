//! Human-readable messages for field validation failures.

use std::fmt::Debug;

use crate::validation::ValidationErrors;

/// Turns a field's active failures into a single user-facing string.
pub trait ErrorMessageFormatter: Debug + Send + Sync {
    fn format(&self, field: &str, errors: &ValidationErrors) -> String;
}

/// Formats failures as `<field>: <message>, <message>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FieldErrorFormatter;

impl ErrorMessageFormatter for FieldErrorFormatter {
    fn format(&self, field: &str, errors: &ValidationErrors) -> String {
        generate_error_message(field, errors)
    }
}

/// Builds one message per failure and joins them behind the field name.
pub fn generate_error_message(field: &str, errors: &ValidationErrors) -> String {
    let messages: Vec<String> = errors.iter().map(|error| error.to_string()).collect();
    if messages.is_empty() {
        return format!("{field}: is invalid");
    }
    format!("{field}: {}", messages.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationError;

    #[test]
    fn joins_each_failure_behind_the_field_name() {
        let errors: ValidationErrors = [ValidationError::Required, ValidationError::Email].into_iter().collect();
        assert_eq!(
            generate_error_message("email", &errors),
            "email: is required, must be a valid email address"
        );
    }

    #[test]
    fn formatter_delegates_to_generator() {
        let errors: ValidationErrors = [ValidationError::Required].into_iter().collect();
        assert_eq!(FieldErrorFormatter.format("owner", &errors), "owner: is required");
    }
}
