pub mod code;
pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// Re-export necessary items
pub use code::generate_code;
pub use extractors::CurrentUser;
pub use middleware::AuthMiddleware;
pub use password::{ensure_password, hash_password, verify_password};
pub use token::{generate_token, verify_token, Claims};

lazy_static! {
    // One-time codes are six ASCII digits.
    static ref CODE_REGEX: regex::Regex = regex::Regex::new(r"^[0-9]{6}$").unwrap();
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Payload for `POST /auth/create-account`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAccountRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    #[validate(email(message = "Email is not valid"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password is too short, minimum 8 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub password_confirmation: String,
}

impl CreateAccountRequest {
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.email = normalize_email(&self.email);
        self
    }
}

/// Payload carrying a one-time code, used by `confirm-account` and `validate-token`.
#[derive(Debug, Deserialize, Validate)]
pub struct TokenRequest {
    #[validate(length(min = 1, message = "Token must not be empty"))]
    pub token: String,
}

impl TokenRequest {
    pub fn normalized(mut self) -> Self {
        self.token = self.token.trim().to_string();
        self
    }
}

/// Represents the payload for a user login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// User's email address.
    #[validate(email(message = "Email is not valid"))]
    pub email: String,
    /// User's password. Only presence is checked here; the hash comparison
    /// happens in the handler.
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

impl LoginRequest {
    pub fn normalized(mut self) -> Self {
        self.email = normalize_email(&self.email);
        self
    }
}

/// Payload for the routes that only take an email address
/// (`request-code`, `forgot-password`, `team/find`).
#[derive(Debug, Deserialize, Validate)]
pub struct EmailRequest {
    #[validate(email(message = "Email is not valid"))]
    pub email: String,
}

impl EmailRequest {
    pub fn normalized(mut self) -> Self {
        self.email = normalize_email(&self.email);
        self
    }
}

/// Path segment of `POST /auth/update-password/{token}`.
#[derive(Debug, Deserialize, Validate)]
pub struct TokenPath {
    #[validate(regex(path = "CODE_REGEX", message = "Invalid token"))]
    pub token: String,
}

/// New password chosen through the reset flow.
#[derive(Debug, Deserialize, Validate)]
pub struct NewPasswordRequest {
    #[validate(length(min = 8, message = "Password is too short, minimum 8 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub password_confirmation: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    #[validate(email(message = "Email is not valid"))]
    pub email: String,
}

impl UpdateProfileRequest {
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.email = normalize_email(&self.email);
        self
    }
}

/// Password change for a signed-in user.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCurrentPasswordRequest {
    #[validate(length(min = 1, message = "Current password must not be empty"))]
    pub current_password: String,
    #[validate(length(min = 8, message = "Password is too short, minimum 8 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub password_confirmation: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CheckPasswordRequest {
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

/// Response structure after a successful login.
/// Contains the JWT access token and the ID of the authenticated user.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The JWT (JSON Web Token) for session authentication.
    pub token: String,
    /// The unique identifier of the authenticated user.
    pub user_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn create_account(name: &str, email: &str, password: &str, confirmation: &str) -> CreateAccountRequest {
        CreateAccountRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            password_confirmation: confirmation.to_string(),
        }
    }

    #[test]
    fn test_create_account_validation() {
        assert!(create_account("Ana", "ana@example.com", "password123", "password123")
            .validate()
            .is_ok());

        // Empty name
        assert!(create_account("", "ana@example.com", "password123", "password123")
            .validate()
            .is_err());

        // Short password
        assert!(create_account("Ana", "ana@example.com", "short", "short")
            .validate()
            .is_err());

        // Mismatched confirmation
        assert!(create_account("Ana", "ana@example.com", "password123", "password124")
            .validate()
            .is_err());

        // Invalid email
        assert!(create_account("Ana", "ana.example.com", "password123", "password123")
            .validate()
            .is_err());
    }

    #[test]
    fn test_whitespace_name_fails_after_normalization() {
        let request = create_account("   ", " Ana@Example.COM ", "password123", "password123").normalized();
        assert_eq!(request.email, "ana@example.com");
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_login_request_validation() {
        let valid_login = LoginRequest {
            email: "test@example.com".to_string(),
            password: "x".to_string(),
        };
        assert!(valid_login.validate().is_ok());

        let invalid_email_login = LoginRequest {
            email: "testexample.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(invalid_email_login.validate().is_err());

        let empty_password_login = LoginRequest {
            email: "test@example.com".to_string(),
            password: "".to_string(),
        };
        assert!(empty_password_login.validate().is_err());
    }

    #[test]
    fn test_token_path_must_be_six_digits() {
        for ok in ["123456", "000001"] {
            assert!(TokenPath { token: ok.to_string() }.validate().is_ok(), "{}", ok);
        }
        for bad in ["12345", "1234567", "12a456", ""] {
            assert!(TokenPath { token: bad.to_string() }.validate().is_err(), "{}", bad);
        }
    }

    #[test]
    fn test_update_current_password_validation() {
        let request = UpdateCurrentPasswordRequest {
            current_password: "".to_string(),
            password: "newpassword".to_string(),
            password_confirmation: "newpassword".to_string(),
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("current_password"));

        let request = UpdateCurrentPasswordRequest {
            current_password: "oldpassword".to_string(),
            password: "newpassword".to_string(),
            password_confirmation: "newpassword".to_string(),
        };
        assert!(request.validate().is_ok());
    }
}
