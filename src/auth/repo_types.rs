use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use super::claims::Role;

/// User document in the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub tel: String,
    pub email: String,
    pub role: Role,
    #[serde(rename = "password")]
    pub password_hash: String,        // Argon2 PHC string, never plaintext
    pub created_at: DateTime,
}

/// User document before the store assigns its id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub tel: String,
    pub email: String,
    pub role: Role,
    #[serde(rename = "password")]
    pub password_hash: String,
    pub created_at: DateTime,
}

impl NewUser {
    pub fn with_id(self, id: ObjectId) -> User {
        User {
            id,
            name: self.name,
            tel: self.tel,
            email: self.email,
            role: self.role,
            password_hash: self.password_hash,
            created_at: self.created_at,
        }
    }
}
