//! # Form validation rules
//!
//! The checks the sign-in, registration, profile and task forms run before
//! calling into the services. Minimum lengths come from
//! [`store::ValidationConfig`]; all length checks count characters of the
//! trimmed input.
//!
//! | Entry point | Checks |
//! |-------------|--------|
//! | [`Validator::validate_sign_in`] | email shape, password length |
//! | [`Validator::validate_registration`] | name length, email shape, password length, confirmation match |
//! | [`Validator::validate_profile_name`] | name length |
//! | [`Validator::validate_task_title`] | title length |

use store::ValidationConfig;
use thiserror::Error;

/// A rejected form field.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name must be at least {min} characters.")]
    NameTooShort { min: usize },
    #[error("Enter a valid email address.")]
    InvalidEmail,
    #[error("Password must be at least {min} characters.")]
    PasswordTooShort { min: usize },
    #[error("Passwords do not match.")]
    PasswordMismatch,
    #[error("Title must be at least {min} characters.")]
    TitleTooShort { min: usize },
}

/// True when the trimmed value has at least `min` characters.
pub fn has_min_length(value: &str, min: usize) -> bool {
    value.trim().chars().count() >= min
}

/// Accepts `local@domain.tld` shaped addresses: no whitespace, a single `@`,
/// and a dot inside the domain with text on both sides.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Form validator parameterised by the configured minimum lengths.
#[derive(Clone, Debug, Default)]
pub struct Validator {
    limits: ValidationConfig,
}

impl Validator {
    pub fn new(limits: ValidationConfig) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &ValidationConfig {
        &self.limits
    }

    pub fn validate_sign_in(&self, email: &str, password: &str) -> Result<(), ValidationError> {
        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail);
        }
        self.check_password(password)
    }

    pub fn validate_registration(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<(), ValidationError> {
        self.validate_profile_name(name)?;
        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail);
        }
        self.check_password(password)?;
        if password != confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(())
    }

    pub fn validate_profile_name(&self, name: &str) -> Result<(), ValidationError> {
        let min = self.limits.min_name_length;
        if has_min_length(name, min) {
            Ok(())
        } else {
            Err(ValidationError::NameTooShort { min })
        }
    }

    pub fn validate_task_title(&self, title: &str) -> Result<(), ValidationError> {
        let min = self.limits.min_title_length;
        if has_min_length(title, min) {
            Ok(())
        } else {
            Err(ValidationError::TitleTooShort { min })
        }
    }

    fn check_password(&self, password: &str) -> Result<(), ValidationError> {
        let min = self.limits.min_password_length;
        if has_min_length(password, min) {
            Ok(())
        } else {
            Err(ValidationError::PasswordTooShort { min })
        }
    }
}
