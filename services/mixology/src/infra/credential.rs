use anyhow::anyhow;
use argon2::{
    Argon2, Params,
    password_hash::{
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use crate::domain::repository::CredentialStore;
use crate::error::MixologyError;

/// Argon2id password hashing with PHC-string output.
#[derive(Clone, Default)]
pub struct Argon2CredentialStore {
    params: Params,
}

impl Argon2CredentialStore {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::V0x13,
            self.params.clone(),
        )
    }
}

impl CredentialStore for Argon2CredentialStore {
    fn hash(&self, raw_password: &str) -> Result<String, MixologyError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(raw_password.as_bytes(), &salt)
            .map_err(|e| anyhow!("hash password: {e}"))?;
        Ok(hash.to_string())
    }

    fn verify(&self, raw_password: &str, password_hash: &str) -> Result<bool, MixologyError> {
        let parsed =
            PasswordHash::new(password_hash).map_err(|e| anyhow!("parse password hash: {e}"))?;
        // Cost parameters come from the stored hash, not from `self.params`.
        Ok(self
            .argon2()
            .verify_password(raw_password.as_bytes(), &parsed)
            .is_ok())
    }
}
