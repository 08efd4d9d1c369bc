use std::{future::IntoFuture, time::Duration};

use anyhow::Context;
use bson::{doc, oid::ObjectId};
use mongodb::{
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
    Client, Database, IndexModel,
};
use thiserror::Error;
use tracing::info;

#[cfg(test)]
pub mod memory;

pub const USER_COLLECTION: &str = "users";
pub const HOTEL_COLLECTION: &str = "hotels";
pub const APPOINTMENT_COLLECTION: &str = "appointments";

const DUPLICATE_KEY: i32 = 11000;

/// Failure of a single store call.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store call exceeded {0:?}")]
    Timeout(Duration),
    #[error("duplicate key")]
    Duplicate,
    #[error("database error: {0}")]
    Database(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(e: mongodb::error::Error) -> Self {
        match e.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == DUPLICATE_KEY => {
                StoreError::Duplicate
            }
            _ => StoreError::Database(e.to_string()),
        }
    }
}

/// Runs one driver call under `deadline`. Dropping the returned future
/// abandons the in-flight call.
pub async fn with_deadline<T, F>(deadline: Duration, fut: F) -> Result<T, StoreError>
where
    F: IntoFuture<Output = mongodb::error::Result<T>>,
{
    match tokio::time::timeout(deadline, fut.into_future()).await {
        Ok(res) => res.map_err(StoreError::from),
        Err(_) => Err(StoreError::Timeout(deadline)),
    }
}

/// Parses a 24-char hex id from a path segment.
pub fn parse_object_id(raw: &str) -> Option<ObjectId> {
    ObjectId::parse_str(raw).ok()
}

pub async fn connect(uri: &str, db_name: &str) -> anyhow::Result<Database> {
    let client = Client::with_uri_str(uri)
        .await
        .context("connect to mongodb")?;
    let db = client.database(db_name);
    db.run_command(doc! { "ping": 1 })
        .await
        .context("ping mongodb")?;
    info!(db = %db_name, "connected to mongodb");
    Ok(db)
}

/// Enforces email uniqueness at the storage layer so concurrent registrations
/// cannot both insert.
pub async fn ensure_indexes(db: &Database) -> anyhow::Result<()> {
    let email_unique = IndexModel::builder()
        .keys(doc! { "email": 1 })
        .options(
            IndexOptions::builder()
                .unique(true)
                .name("email_unique".to_string())
                .build(),
        )
        .build();
    db.collection::<bson::Document>(USER_COLLECTION)
        .create_index(email_unique)
        .await
        .context("create users.email index")?;

    let by_hotel = IndexModel::builder()
        .keys(doc! { "hotel": 1 })
        .options(
            IndexOptions::builder()
                .name("hotel_index".to_string())
                .build(),
        )
        .build();
    db.collection::<bson::Document>(APPOINTMENT_COLLECTION)
        .create_index(by_hotel)
        .await
        .context("create appointments.hotel index")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_object_id_accepts_hex_only() {
        let id = ObjectId::new();
        assert_eq!(parse_object_id(&id.to_hex()), Some(id));
        assert_eq!(parse_object_id("not-an-id"), None);
        assert_eq!(parse_object_id(""), None);
    }

    #[tokio::test]
    async fn with_deadline_reports_timeout() {
        let slow = async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok::<_, mongodb::error::Error>(1)
        };
        let err = with_deadline(Duration::from_millis(10), slow)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Timeout(_)));
    }

    #[tokio::test]
    async fn with_deadline_passes_value_through() {
        let fast = async { Ok::<_, mongodb::error::Error>(7) };
        let v = with_deadline(Duration::from_secs(1), fast).await.unwrap();
        assert_eq!(v, 7);
    }
}
