use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Signup password policy; returns the user-facing reason on failure.
pub fn check_password_policy(plain: &str) -> Result<(), &'static str> {
    if plain.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password too short");
    }
    if plain.trim().is_empty() {
        return Err("Password must not be blank");
    }
    Ok(())
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_rejects_short_and_blank() {
        assert_eq!(check_password_policy("short"), Err("Password too short"));
        assert_eq!(check_password_policy("          "), Err("Password must not be blank"));
        assert!(check_password_policy("long enough").is_ok());
    }

    #[test]
    fn hash_verifies_only_the_original_password() {
        let hash = hash_password("deadlift-day-42").expect("hashing should succeed");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("deadlift-day-42", &hash).expect("verify"));
        assert!(!verify_password("leg-day-42", &hash).expect("verify"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        assert!(verify_password("anything", "not-a-valid-hash").is_err());
    }
}
