//! Typed view over a document collection.
//!
//! Entities serialize to their JSON document on the way in and
//! deserialize on the way out; a stored document that no longer matches
//! its type surfaces as `Error::InvalidDocument`.

use crate::{
    db::{collections::Collection, query::DocumentQuery, store::DocumentStore},
    Error, Result,
};
use serde::{de::DeserializeOwned, Serialize};
use std::{marker::PhantomData, sync::Arc};
use uuid::Uuid;

pub struct TypedCollection<T> {
    store: Arc<dyn DocumentStore>,
    collection: Collection,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for TypedCollection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            collection: self.collection,
            _entity: PhantomData,
        }
    }
}

impl<T> TypedCollection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(store: Arc<dyn DocumentStore>, collection: Collection) -> Self {
        Self {
            store,
            collection,
            _entity: PhantomData,
        }
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    pub async fn insert(&self, id: Uuid, entity: &T) -> Result<()> {
        let body = serde_json::to_value(entity)?;
        self.store.insert(self.collection, id, body).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<T>> {
        match self.store.fetch(self.collection, id).await? {
            Some(body) => Ok(Some(serde_json::from_value(body)?)),
            None => Ok(None),
        }
    }

    /// Like [`get`](Self::get) but turns a miss into a not-found error.
    pub async fn require(&self, id: Uuid) -> Result<T> {
        self.get(id)
            .await?
            .ok_or_else(|| Error::not_found(self.collection.entity_name(), id))
    }

    pub async fn put(&self, id: Uuid, entity: &T) -> Result<bool> {
        let body = serde_json::to_value(entity)?;
        self.store.replace(self.collection, id, body).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        self.store.remove(self.collection, id).await
    }

    pub async fn find(&self, query: &DocumentQuery) -> Result<Vec<T>> {
        let bodies = self.store.find(self.collection, query).await?;
        bodies
            .into_iter()
            .map(|body| serde_json::from_value(body).map_err(Error::from))
            .collect()
    }
}
