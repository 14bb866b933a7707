//! Form validation backed by the `validator` derive rules on the forms.

use validator::{Validate, ValidationErrors};

use quill_core::forms::FormErrors;
use quill_core::ports::FormValidator;

/// Runs each form's `#[validate(..)]` rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFormValidator;

impl StandardFormValidator {
    pub fn new() -> Self {
        Self
    }
}

fn to_form_errors(errors: ValidationErrors) -> FormErrors {
    let mut form_errors = FormErrors::new();
    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let message = match &error.message {
                Some(message) => message.to_string(),
                None => format!("Invalid value ({})", error.code),
            };
            form_errors.add(field.to_string(), message);
        }
    }
    form_errors
}

impl<F> FormValidator<F> for StandardFormValidator
where
    F: Validate + Send + Sync,
{
    fn validate(&self, form: &F) -> Result<(), FormErrors> {
        form.validate().map_err(to_form_errors)
    }
}
