//! Attribute validation for user commands.
//!
//! Every invariant is checked and all failures are collected, so a client
//! sees each problem with its submission at once.

use std::fmt::Display;

use crate::user::errors::FieldError;
use crate::user::errors::PasswordConfirmationError;
use crate::user::models::CreateUserCommand;
use crate::user::models::EmailAddress;
use crate::user::models::Name;
use crate::user::models::Password;
use crate::user::models::UpdateUserCommand;
use crate::user::models::Username;

/// Raw, unvalidated user attributes as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDraft {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

#[derive(Default)]
struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    fn check<T, E: Display>(&mut self, field: &'static str, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.0.push(FieldError::new(field, err));
                None
            }
        }
    }
}

fn confirm(password: &str, confirmation: Option<&str>) -> Result<(), PasswordConfirmationError> {
    match confirmation {
        None | Some("") => Err(PasswordConfirmationError::Blank),
        Some(confirmation) if confirmation != password => Err(PasswordConfirmationError::Mismatch),
        Some(_) => Ok(()),
    }
}

/// Validate a registration. Absent attributes count as blank.
///
/// # Errors
/// One `FieldError` per violated invariant.
pub fn validate_new_user(draft: UserDraft) -> Result<CreateUserCommand, Vec<FieldError>> {
    let mut errors = FieldErrors::default();

    let name = errors.check("name", Name::new(draft.name.unwrap_or_default()));
    let username = errors.check(
        "username",
        Username::new(draft.username.unwrap_or_default()),
    );
    let email = errors.check("email", EmailAddress::new(draft.email.unwrap_or_default()));

    let raw_password = draft.password.unwrap_or_default();
    let confirmed = errors.check(
        "password_confirmation",
        confirm(&raw_password, draft.password_confirmation.as_deref()),
    );
    let password = errors.check("password", Password::new(raw_password));

    match (name, username, email, password, confirmed) {
        (Some(name), Some(username), Some(email), Some(password), Some(())) => {
            Ok(CreateUserCommand {
                name,
                username,
                email,
                password,
            })
        }
        _ => Err(errors.0),
    }
}

/// Validate a partial update. Only supplied attributes are checked; a new
/// password must come with a matching confirmation.
///
/// # Errors
/// One `FieldError` per violated invariant.
pub fn validate_user_changes(draft: UserDraft) -> Result<UpdateUserCommand, Vec<FieldError>> {
    let mut errors = FieldErrors::default();

    let name = draft.name.and_then(|n| errors.check("name", Name::new(n)));
    let username = draft
        .username
        .and_then(|u| errors.check("username", Username::new(u)));
    let email = draft
        .email
        .and_then(|e| errors.check("email", EmailAddress::new(e)));

    let password = draft.password.and_then(|raw| {
        let confirmed = errors.check(
            "password_confirmation",
            confirm(&raw, draft.password_confirmation.as_deref()),
        );
        let password = errors.check("password", Password::new(raw));
        confirmed.and(password)
    });

    if errors.0.is_empty() {
        Ok(UpdateUserCommand {
            name,
            username,
            email,
            password,
        })
    } else {
        Err(errors.0)
    }
}
