use std::time::Duration;

use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use mongodb::{Collection, Database};

use crate::auth::repo_types::{NewUser, User};
use crate::db::{with_deadline, StoreError, USER_COLLECTION};

/// Credential store keyed by email. Lookups are exact and case-sensitive.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError>;
    /// Persists the user; the store assigns the id.
    async fn insert(&self, user: NewUser) -> Result<ObjectId, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}

#[derive(Clone)]
pub struct MongoUserStore {
    users: Collection<User>,
    deadline: Duration,
}

impl MongoUserStore {
    pub fn new(db: &Database, deadline: Duration) -> Self {
        Self {
            users: db.collection(USER_COLLECTION),
            deadline,
        }
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError> {
        let count =
            with_deadline(self.deadline, self.users.count_documents(doc! { "email": email }))
                .await?;
        Ok(count > 0)
    }

    async fn insert(&self, user: NewUser) -> Result<ObjectId, StoreError> {
        let pending = self.users.clone_with_type::<NewUser>();
        let res = with_deadline(self.deadline, pending.insert_one(user)).await?;
        res.inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::Database("inserted id is not an ObjectId".into()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        with_deadline(self.deadline, self.users.find_one(doc! { "email": email })).await
    }
}
