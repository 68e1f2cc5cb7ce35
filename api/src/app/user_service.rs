//! User service
//!
//! Handles user registration and API key authentication.

use std::sync::Arc;

use rand::Rng;
use sha2::{Digest, Sha256};

use crate::app::validation::{validate_email, validate_username};
use crate::domain::entities::{NewUser, Role, User, UserId};
use crate::domain::ports::UserRepository;
use crate::error::{AppError, DomainError};

/// Service for managing users
pub struct UserService<UR>
where
    UR: UserRepository,
{
    users: Arc<UR>,
    staff_registration_secret: Option<String>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    pub fn new(users: Arc<UR>, staff_registration_secret: Option<String>) -> Self {
        Self {
            users,
            staff_registration_secret,
        }
    }

    /// Register a new user
    ///
    /// Patients (`USER`) can always register. Staff roles need the configured
    /// registration secret.
    ///
    /// Returns (user, api_key) - the key is only shown once
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        role: Role,
        registration_secret: Option<&str>,
    ) -> Result<(User, String), AppError> {
        validate_username(username)?;
        validate_email(email)?;

        if role.is_staff() {
            match (&self.staff_registration_secret, registration_secret) {
                (Some(expected), Some(given)) if expected == given => {}
                (None, _) => {
                    return Err(AppError::Forbidden(
                        "Staff registration is disabled".to_string(),
                    ))
                }
                _ => {
                    return Err(AppError::Forbidden(format!(
                        "A valid registration secret is required to register as {}",
                        role
                    )))
                }
            }
        }

        if self.users.find_by_username(username).await?.is_some() {
            return Err(AppError::Domain(DomainError::AlreadyExists(format!(
                "User with username '{}' already exists",
                username
            ))));
        }

        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::Domain(DomainError::AlreadyExists(format!(
                "User with email '{}' already exists",
                email
            ))));
        }

        let api_key = generate_api_key();
        let new_user = NewUser {
            username: username.to_string(),
            email: email.to_string(),
            role,
            api_key_hash: hash_api_key(&api_key),
        };

        let user = self.users.create(&new_user).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "Registered user");

        Ok((user, api_key))
    }

    /// Find a user by their API key hash
    pub async fn find_by_api_key(&self, api_key_hash: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.find_by_api_key_hash(api_key_hash).await?)
    }

    /// Update user's last seen timestamp
    pub async fn touch(&self, id: &UserId) -> Result<(), AppError> {
        self.users.update_last_seen(id).await?;
        Ok(())
    }
}

/// Generate a random API key
fn generate_api_key() -> String {
    let mut rng = rand::thread_rng();
    let bytes: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
    format!("sk-{}", hex::encode(bytes))
}

/// Hash an API key for storage
pub fn hash_api_key(api_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(api_key.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{test_user, InMemoryUserRepository};

    fn create_service(repo: InMemoryUserRepository) -> UserService<InMemoryUserRepository> {
        UserService::new(Arc::new(repo), Some("staff-secret".to_string()))
    }

    #[test]
    fn test_api_key_generation() {
        let key = generate_api_key();
        assert!(key.starts_with("sk-"));
        assert_eq!(key.len(), 3 + 64); // "sk-" + 32 bytes hex
    }

    #[test]
    fn test_api_key_hashing() {
        let key = "sk-test123";
        let hash1 = hash_api_key(key);
        let hash2 = hash_api_key(key);
        assert_eq!(hash1, hash2);
        assert_ne!(hash1, key);
    }

    #[tokio::test]
    async fn register_patient_without_secret() {
        let service = create_service(InMemoryUserRepository::new());

        let (user, api_key) = service
            .register("jane", "jane@example.com", Role::User, None)
            .await
            .unwrap();

        assert_eq!(user.username, "jane");
        assert_eq!(user.role, Role::User);
        assert_eq!(user.api_key_hash, hash_api_key(&api_key));
    }

    #[tokio::test]
    async fn register_staff_with_secret() {
        let service = create_service(InMemoryUserRepository::new());

        let (user, _) = service
            .register("doctor", "doctor@upstac.test", Role::Doctor, Some("staff-secret"))
            .await
            .unwrap();

        assert_eq!(user.role, Role::Doctor);
    }

    #[tokio::test]
    async fn register_staff_with_wrong_secret_is_forbidden() {
        let service = create_service(InMemoryUserRepository::new());

        let result = service
            .register("tester", "tester@upstac.test", Role::Tester, Some("guess"))
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn register_staff_when_disabled_is_forbidden() {
        let service = UserService::new(Arc::new(InMemoryUserRepository::new()), None);

        let result = service
            .register("tester", "tester@upstac.test", Role::Tester, Some("anything"))
            .await;

        let err = result.unwrap_err().to_string();
        assert!(err.contains("disabled"));
    }

    #[tokio::test]
    async fn register_fails_with_duplicate_username() {
        let existing = test_user(Role::User);
        let service = create_service(InMemoryUserRepository::new().with_user(existing.clone()));

        let result = service
            .register(&existing.username, "other@example.com", Role::User, None)
            .await;

        let err = result.unwrap_err().to_string();
        assert!(err.contains("already exists"));
    }

    #[tokio::test]
    async fn register_fails_with_invalid_email() {
        let service = create_service(InMemoryUserRepository::new());

        let result = service
            .register("jane", "not-an-email", Role::User, None)
            .await;

        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::Validation(_)))
        ));
    }

    #[tokio::test]
    async fn find_by_api_key_returns_registered_user() {
        let service = create_service(InMemoryUserRepository::new());
        let (user, api_key) = service
            .register("jane", "jane@example.com", Role::User, None)
            .await
            .unwrap();

        let found = service
            .find_by_api_key(&hash_api_key(&api_key))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.id, user.id);
    }

    #[tokio::test]
    async fn touch_updates_last_seen() {
        let user = test_user(Role::Doctor);
        let repo = Arc::new(InMemoryUserRepository::new().with_user(user.clone()));
        let service = UserService::new(repo.clone(), None);

        service.touch(&user.id).await.unwrap();

        let found = repo.find_by_id(&user.id).await.unwrap().unwrap();
        assert!(found.last_seen_at.is_some());
    }
}
