//! Form validation port.

use crate::forms::FormErrors;

/// Validates a submitted form, reporting problems per field.
pub trait FormValidator<F>: Send + Sync {
    fn validate(&self, form: &F) -> Result<(), FormErrors>;
}
