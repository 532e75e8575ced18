use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{RegisterRequest, User, UserResponse};
use crate::repository::UserRepository;

/// Argon2id hash that matches no password. Unknown e-mails are checked
/// against it so login takes the same time whether or not the user exists.
const DUMMY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$ZXZlbnRodWItZHVtbXkhIQ$lijksSQw7V9JA82QHoBht1Gq5NExyclY/ZDBPdfZsWQ";

/// Service layer for registration and credential checks
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Register a new user. Input is expected to be validated already.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterRequest) -> UserResult<UserResponse> {
        let email = input.email.to_lowercase();

        if self.repository.email_exists(&email).await? {
            return Err(UserError::DuplicateEmail(email));
        }

        let password_hash = hash_password(&input.password)?;
        let user = User::new(input.name, email, password_hash);

        let created = self.repository.create(user).await?;
        tracing::info!(user_id = %created.id, "User registered");
        Ok(created.into())
    }

    /// Check an e-mail/password pair.
    ///
    /// Unknown e-mail and wrong password both yield `InvalidCredentials`.
    #[instrument(skip(self, password))]
    pub async fn verify_credentials(&self, email: &str, password: &str) -> UserResult<UserResponse> {
        let Some(user) = self.repository.get_by_email(&email.to_lowercase()).await? else {
            verify_password(password, DUMMY_PASSWORD_HASH)?;
            return Err(UserError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(UserError::InvalidCredentials);
        }

        Ok(user.into())
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: Uuid) -> UserResult<UserResponse> {
        let user = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        Ok(user.into())
    }
}

fn hash_password(password: &str) -> UserResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::PasswordHash(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> UserResult<bool> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryUserRepository, mock::MockUserRepository};

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Ada Lovelace".to_string(),
            email: email.to_string(),
            password: "Secret123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password_and_lowercases_email() {
        let repo = InMemoryUserRepository::new();
        let service = UserService::new(repo.clone());

        let user = service
            .register(register_request("Ada@Example.com"))
            .await
            .unwrap();
        assert_eq!(user.email, "ada@example.com");

        let stored = repo.get_by_id(user.id).await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "Secret123");
        assert!(stored.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let service = UserService::new(InMemoryUserRepository::new());
        service.register(register_request("ada@example.com")).await.unwrap();

        let result = service.register(register_request("ADA@example.com")).await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_verify_credentials() {
        let service = UserService::new(InMemoryUserRepository::new());
        let registered = service
            .register(register_request("ada@example.com"))
            .await
            .unwrap();

        let user = service
            .verify_credentials("ADA@example.com", "Secret123")
            .await
            .unwrap();
        assert_eq!(user.id, registered.id);

        let wrong = service.verify_credentials("ada@example.com", "Secret124").await;
        assert!(matches!(wrong, Err(UserError::InvalidCredentials)));

        let unknown = service.verify_credentials("bob@example.com", "Secret123").await;
        assert!(matches!(unknown, Err(UserError::InvalidCredentials)));
    }

    #[test]
    fn test_dummy_hash_is_valid_and_matches_nothing() {
        assert!(!verify_password("Secret123", DUMMY_PASSWORD_HASH).unwrap());
        assert!(!verify_password("", DUMMY_PASSWORD_HASH).unwrap());
    }

    #[tokio::test]
    async fn test_unknown_email_still_verifies_a_hash() {
        let mut mock = MockUserRepository::new();
        mock.expect_get_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let service = UserService::new(mock);
        let result = service
            .verify_credentials("Ghost@Example.com", "Secret123")
            .await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut mock = MockUserRepository::new();
        mock.expect_get_by_id().returning(|_| Ok(None));

        let service = UserService::new(mock);
        let result = service.get_user(Uuid::now_v7()).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_register_propagates_database_error() {
        let mut mock = MockUserRepository::new();
        mock.expect_email_exists()
            .returning(|_| Err(UserError::Database("server selection timeout".into())));
        mock.expect_create().never();

        let service = UserService::new(mock);
        let result = service.register(register_request("ada@example.com")).await;
        assert!(matches!(result, Err(UserError::Database(_))));
    }
}
