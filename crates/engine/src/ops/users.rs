use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use sea_orm::{QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, User, UserRole, users};

use super::{Engine, normalize_required_name};

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

fn normalize_email(email: &str) -> ResultEngine<String> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(EngineError::InvalidName("invalid email".to_string()));
    }
    Ok(email)
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> ResultEngine<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| EngineError::PasswordHash)
}

/// Verify a password against a stored PHC hash.
fn verify_password(password: &str, hash: &str) -> ResultEngine<()> {
    let parsed = PasswordHash::new(hash).map_err(|_| EngineError::InvalidCredentials)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| EngineError::InvalidCredentials)
}

impl Engine {
    /// Create a user with a hashed password.
    ///
    /// Emails are compared case-insensitively; registering an existing one
    /// fails with `ExistingKey`.
    pub async fn register_user(
        &self,
        email: &str,
        name: &str,
        password: &str,
        role: UserRole,
    ) -> ResultEngine<User> {
        let email = normalize_email(email)?;
        let name = normalize_required_name(name, "user")?;
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(EngineError::InvalidName(format!(
                "password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(email.clone()))
            .one(&self.database)
            .await?;
        if existing.is_some() {
            return Err(EngineError::ExistingKey(email));
        }

        let password_hash = hash_password(password)?;
        let model = users::ActiveModel::new_user(email, name, password_hash, role, Utc::now())
            .insert(&self.database)
            .await?;
        User::try_from(model)
    }

    /// Check credentials and return the matching user.
    pub async fn authenticate(&self, email: &str, password: &str) -> ResultEngine<User> {
        let email = normalize_email(email).map_err(|_| EngineError::InvalidCredentials)?;
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.database)
            .await?
            .ok_or(EngineError::InvalidCredentials)?;
        verify_password(password, &model.password_hash)?;
        User::try_from(model)
    }

    /// Return a user by id.
    pub async fn user(&self, user_id: Uuid) -> ResultEngine<User> {
        let model = users::Entity::find_by_id(user_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;
        User::try_from(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_verifies_only_the_original() {
        let hash = hash_password("hunter22").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("hunter22", &hash).is_ok());
        assert_eq!(
            verify_password("hunter23", &hash),
            Err(EngineError::InvalidCredentials)
        );
    }

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(
            normalize_email("  Farmer@Example.COM ").unwrap(),
            "farmer@example.com"
        );
        assert!(normalize_email("farmer").is_err());
    }
}
