use std::time::Duration;

use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures_util::TryStreamExt;
use mongodb::{options::ReturnDocument, Collection, Database};

use crate::db::{with_deadline, StoreError, HOTEL_COLLECTION};
use crate::hotels::repo_types::{Hotel, HotelChanges, NewHotel};

#[async_trait]
pub trait HotelStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Hotel>, StoreError>;
    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Hotel>, StoreError>;
    async fn insert(&self, hotel: NewHotel) -> Result<ObjectId, StoreError>;
    /// Returns the updated hotel, or `None` if no hotel has `id`.
    async fn update(&self, id: ObjectId, changes: HotelChanges)
        -> Result<Option<Hotel>, StoreError>;
    /// True if a hotel was removed.
    async fn delete(&self, id: ObjectId) -> Result<bool, StoreError>;
}

#[derive(Clone)]
pub struct MongoHotelStore {
    hotels: Collection<Hotel>,
    deadline: Duration,
}

impl MongoHotelStore {
    pub fn new(db: &Database, deadline: Duration) -> Self {
        Self {
            hotels: db.collection(HOTEL_COLLECTION),
            deadline,
        }
    }
}

#[async_trait]
impl HotelStore for MongoHotelStore {
    async fn list(&self) -> Result<Vec<Hotel>, StoreError> {
        with_deadline(self.deadline, async {
            self.hotels.find(doc! {}).await?.try_collect().await
        })
        .await
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Hotel>, StoreError> {
        with_deadline(self.deadline, self.hotels.find_one(doc! { "_id": id })).await
    }

    async fn insert(&self, hotel: NewHotel) -> Result<ObjectId, StoreError> {
        let pending = self.hotels.clone_with_type::<NewHotel>();
        let res = with_deadline(self.deadline, pending.insert_one(hotel)).await?;
        res.inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::Database("inserted id is not an ObjectId".into()))
    }

    async fn update(
        &self,
        id: ObjectId,
        changes: HotelChanges,
    ) -> Result<Option<Hotel>, StoreError> {
        if changes.is_empty() {
            return self.find_by_id(id).await;
        }
        let update = doc! { "$set": changes.to_set_document() };
        with_deadline(
            self.deadline,
            self.hotels
                .find_one_and_update(doc! { "_id": id }, update)
                .return_document(ReturnDocument::After),
        )
        .await
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, StoreError> {
        let res = with_deadline(self.deadline, self.hotels.delete_one(doc! { "_id": id })).await?;
        Ok(res.deleted_count > 0)
    }
}
