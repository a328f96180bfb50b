//! Cook credentials.

use ::entity::cook;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use sea_orm::*;
use tracing::debug;

use crate::{error::ServiceError, Query};

/// Hashes `password` into a PHC string with a fresh salt.
pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::Credential(e.to_string()))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

pub struct Auth;

impl Auth {
    /// The cook owning `username` when `password` matches, `None` otherwise.
    pub async fn authenticate(
        db: &DbConn,
        username: &str,
        password: &str,
    ) -> Result<Option<cook::Model>, DbErr> {
        let cook = Query::find_cook_by_username(db, username.trim()).await?;

        Ok(cook.filter(|cook| {
            let verified = verify_password(password, &cook.password);
            if !verified {
                debug!(cook_id = cook.id, "password mismatch");
            }
            verified
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_verify_only_their_own_password() {
        let hash = hash_password("tiramisu").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("tiramisu", &hash));
        assert!(!verify_password("panna cotta", &hash));
        assert!(!verify_password("tiramisu", "not a phc string"));
    }
}
