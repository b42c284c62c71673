use std::fmt;

use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid user id: {0}")]
    InvalidFormat(String),
}

/// Error for Name validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("can't be blank")]
    Blank,
}

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("can't be blank")]
    Blank,
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("can't be blank")]
    Blank,

    #[error("is invalid")]
    InvalidFormat,
}

/// Error for password policy violations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("can't be blank")]
    Blank,

    #[error("is too short (minimum is {min} characters)")]
    TooShort { min: usize },

    #[error("must contain at least one letter and one digit")]
    MissingLetterOrDigit,
}

/// Error for password confirmation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordConfirmationError {
    #[error("can't be blank")]
    Blank,

    #[error("doesn't match Password")]
    Mismatch,
}

/// A single attribute that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl ToString) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }

    /// Message prefixed with the humanized attribute name,
    /// e.g. "Password confirmation doesn't match Password".
    pub fn full_message(&self) -> String {
        let humanized = self.field.replace('_', " ");
        let mut chars = humanized.chars();
        match chars.next() {
            Some(first) => format!(
                "{}{} {}",
                first.to_uppercase(),
                chars.as_str(),
                self.message
            ),
            None => self.message.clone(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_message())
    }
}

/// Top-level error for all user-related operations
#[derive(Debug, Clone, Error)]
pub enum UserError {
    #[error("Validation failed: {}", join_messages(.0))]
    Validation(Vec<FieldError>),

    #[error("Couldn't find User with 'id'={0}")]
    NotFound(String),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Password hashing failed: {0}")]
    PasswordHashing(String),

    #[error("Stored user record is invalid: {0}")]
    InvalidRecord(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(FieldError::full_message)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_message_humanizes_field() {
        let error = FieldError::new("password_confirmation", PasswordConfirmationError::Mismatch);
        assert_eq!(
            error.full_message(),
            "Password confirmation doesn't match Password"
        );
    }

    #[test]
    fn test_validation_error_lists_every_field() {
        let error = UserError::Validation(vec![
            FieldError::new("name", NameError::Blank),
            FieldError::new("email", EmailError::InvalidFormat),
        ]);

        assert_eq!(
            error.to_string(),
            "Validation failed: Name can't be blank, Email is invalid"
        );
    }

    #[test]
    fn test_not_found_reports_id() {
        let error = UserError::NotFound("42".to_string());
        assert_eq!(error.to_string(), "Couldn't find User with 'id'=42");
    }
}
