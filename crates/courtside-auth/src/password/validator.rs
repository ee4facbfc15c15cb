//! Credential policy for registration.

use validator::ValidateEmail;

use courtside_core::config::AuthConfig;
use courtside_core::error::AppError;

/// Validates new passwords and email addresses.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length in characters.
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Rejects passwords shorter than the configured minimum.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }
        if password.trim().is_empty() {
            return Err(AppError::validation("Password must not be blank"));
        }
        Ok(())
    }

    /// Normalizes an email to lowercase and rejects malformed ones.
    pub fn normalize_email(&self, email: &str) -> Result<String, AppError> {
        let email = email.trim().to_lowercase();
        if !email.validate_email() {
            return Err(AppError::validation(format!("Invalid email address: '{email}'")));
        }
        Ok(email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enforces_minimum_length() {
        let v = PasswordValidator::new(&AuthConfig::default());
        assert!(v.validate("short").is_err());
        assert!(v.validate("long-enough").is_ok());
        assert!(v.validate("        ").is_err());
    }

    #[test]
    fn normalizes_email() {
        let v = PasswordValidator::new(&AuthConfig::default());
        assert_eq!(v.normalize_email(" Ana@Example.COM ").unwrap(), "ana@example.com");
        assert!(v.normalize_email("not-an-email").is_err());
    }
}
