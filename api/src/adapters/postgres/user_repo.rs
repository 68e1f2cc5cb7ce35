//! PostgreSQL adapter for UserRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::db_err;
use crate::domain::entities::{NewUser, User, UserId};
use crate::domain::ports::UserRepository;
use crate::entity::users;
use crate::error::DomainError;

/// PostgreSQL implementation of UserRepository
pub struct PostgresUserRepository {
    db: DatabaseConnection,
}

impl PostgresUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_one_by(
        &self,
        column: users::Column,
        value: &str,
    ) -> Result<Option<User>, DomainError> {
        let result = users::Entity::find()
            .filter(column.eq(value))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        result.map(User::try_from).transpose()
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let result = users::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        result.map(User::try_from).transpose()
    }

    async fn find_by_api_key_hash(&self, hash: &str) -> Result<Option<User>, DomainError> {
        self.find_one_by(users::Column::ApiKeyHash, hash).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.find_one_by(users::Column::Username, username).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.find_one_by(users::Column::Email, email).await
    }

    async fn create(&self, user: &NewUser) -> Result<User, DomainError> {
        let model = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            role: Set(user.role.to_string()),
            api_key_hash: Set(user.api_key_hash.clone()),
            created_at: Set(Utc::now().fixed_offset()),
            last_seen_at: Set(None),
        };

        let result = model.insert(&self.db).await.map_err(db_err)?;

        User::try_from(result)
    }

    async fn update_last_seen(&self, id: &UserId) -> Result<(), DomainError> {
        users::ActiveModel {
            id: Set(id.0),
            last_seen_at: Set(Some(Utc::now().fixed_offset())),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(db_err)?;

        Ok(())
    }
}

/// Convert SeaORM model to domain entity
impl TryFrom<users::Model> for User {
    type Error = DomainError;

    fn try_from(model: users::Model) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(model.id),
            role: model.role.parse().map_err(DomainError::Internal)?,
            username: model.username,
            email: model.email,
            api_key_hash: model.api_key_hash,
            created_at: model.created_at.with_timezone(&Utc),
            last_seen_at: model.last_seen_at.map(|dt| dt.with_timezone(&Utc)),
        })
    }
}
