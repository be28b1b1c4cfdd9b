//! bcrypt helpers shared by registration, employee management and login.

use super::errors::AuthError;

pub const MIN_PASSWORD_LEN: usize = 8;

pub fn validate_password(plain: &str) -> Result<(), AuthError> {
    if plain.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation(format!(
            "password too short (>={MIN_PASSWORD_LEN})"
        )));
    }
    Ok(())
}

/// Validate and hash a plaintext password at the given bcrypt cost.
pub fn hash_password(plain: &str, cost: u32) -> Result<String, AuthError> {
    validate_password(plain)?;
    bcrypt::hash(plain, cost).map_err(|e| AuthError::HashError(e.to_string()))
}

pub fn verify_password(plain: &str, hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(plain, hash).map_err(|e| AuthError::HashError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("correct horse", 4).unwrap();
        assert!(hash.starts_with("$2"));
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("wrong horse", &hash).unwrap());
    }

    #[test]
    fn short_password_rejected() {
        assert!(matches!(hash_password("short", 4), Err(AuthError::Validation(_))));
    }

    #[test]
    fn garbage_hash_is_an_error() {
        assert!(verify_password("whatever1", "not-a-hash").is_err());
    }
}
