use bcrypt::{hash, verify, DEFAULT_COST};

pub struct PasswordService;

impl PasswordService {
    pub const MIN_LENGTH: usize = 8;

    pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
        hash(password, DEFAULT_COST)
    }

    /// A malformed stored hash counts as a mismatch.
    pub fn verify_password(password: &str, hash: &str) -> bool {
        verify(password, hash).unwrap_or(false)
    }

    pub fn validate_password_strength(password: &str) -> Result<(), String> {
        if password.chars().count() < Self::MIN_LENGTH {
            return Err(format!(
                "Password must be at least {} characters long",
                Self::MIN_LENGTH
            ));
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err("Password must contain at least one digit".to_string());
        }
        if !password.chars().any(|c| c.is_alphabetic()) {
            return Err("Password must contain at least one letter".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hashed = bcrypt::hash("hunter2hunter2", 4).unwrap();
        assert!(PasswordService::verify_password("hunter2hunter2", &hashed));
        assert!(!PasswordService::verify_password("hunter3hunter3", &hashed));
    }

    #[test]
    fn garbage_hash_does_not_verify() {
        assert!(!PasswordService::verify_password("anything", "not-a-hash"));
    }

    #[test]
    fn strength_rules() {
        assert!(PasswordService::validate_password_strength("short1").is_err());
        assert!(PasswordService::validate_password_strength("longenough").is_err());
        assert!(PasswordService::validate_password_strength("12345678").is_err());
        assert!(PasswordService::validate_password_strength("goal2024").is_ok());
    }
}
