use crate::error::AppError;
use crate::models::User;

/// bcrypt work factor for stored hashes.
pub const HASH_COST: u32 = 10;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    Ok(bcrypt::hash(password, HASH_COST)?)
}

/// A malformed stored hash counts as a mismatch rather than a server error.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match bcrypt::verify(password, password_hash) {
        Ok(matches) => matches,
        Err(err) => {
            log::error!("stored password hash could not be checked: {}", err);
            false
        }
    }
}

/// Fails with `401` and `mismatch` unless `candidate` is the user's password.
pub fn ensure_password(user: &User, candidate: &str, mismatch: &str) -> Result<(), AppError> {
    if verify_password(candidate, &user.password_hash) {
        Ok(())
    } else {
        log::warn!("password mismatch for user {}", user.id);
        Err(AppError::Unauthorized(mismatch.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn user_with(password: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Ana".into(),
            email: "ana@example.com".into(),
            password_hash: hash_password(password).unwrap(),
            confirmed: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_hash_uses_configured_cost() {
        let hashed = hash_password("secret_pass1").unwrap();
        assert!(hashed.starts_with("$2b$10$"), "{}", hashed);
        assert!(verify_password("secret_pass1", &hashed));
        assert!(!verify_password("secret_pass2", &hashed));
    }

    #[test]
    fn test_malformed_hash_is_a_mismatch() {
        assert!(!verify_password("secret_pass1", "invalidhashformat"));
    }

    #[test]
    fn test_ensure_password() {
        let user = user_with("secret_pass1");
        assert!(ensure_password(&user, "secret_pass1", "Incorrect password").is_ok());
        match ensure_password(&user, "nope", "Current password is incorrect") {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Current password is incorrect"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
