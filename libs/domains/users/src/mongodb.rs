//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{self, doc},
    options::IndexOptions,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult, is_duplicate_key};
use crate::models::User;
use crate::repository::UserRepository;

pub const USERS_COLLECTION: &str = "users";

#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<User>(USERS_COLLECTION),
        }
    }

    /// Unique index on `email`
    pub async fn create_indexes(&self) -> UserResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("email_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(index).await?;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create(&self, user: User) -> UserResult<User> {
        match self.collection.insert_one(&user).await {
            Ok(_) => {
                tracing::info!(email = %user.email, "Created user");
                Ok(user)
            }
            Err(e) if is_duplicate_key(&e) => Err(UserError::DuplicateEmail(user.email)),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let filter = doc! { "_id": bson::Uuid::from(id) };
        Ok(self.collection.find_one(filter).await?)
    }

    #[instrument(skip(self))]
    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let filter = doc! { "email": email.to_lowercase() };
        Ok(self.collection.find_one(filter).await?)
    }

    #[instrument(skip(self))]
    async fn email_exists(&self, email: &str) -> UserResult<bool> {
        let filter = doc! { "email": email.to_lowercase() };
        let count = self.collection.count_documents(filter).limit(1).await?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::Client;

    async fn repository() -> MongoUserRepository {
        let client = Client::with_uri_str("mongodb://localhost:27017")
            .await
            .unwrap();
        let db = client.database(&format!("users_test_{}", Uuid::now_v7().simple()));
        let repo = MongoUserRepository::new(&db);
        repo.create_indexes().await.unwrap();
        repo
    }

    #[tokio::test]
    #[ignore] // Requires actual MongoDB
    async fn test_round_trip_and_unique_email() {
        let repo = repository().await;
        let user = User::new("Ada".into(), "ada@example.com".into(), "hash".into());

        repo.create(user.clone()).await.unwrap();
        let fetched = repo.get_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(fetched.email, "ada@example.com");
        assert!(repo.email_exists("ADA@example.com").await.unwrap());

        let dup = User::new("Ada 2".into(), "ada@example.com".into(), "hash".into());
        assert!(matches!(
            repo.create(dup).await,
            Err(UserError::DuplicateEmail(_))
        ));
    }
}
