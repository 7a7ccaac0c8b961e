// src/store/faulty.rs

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use super::{
    datastore::{Collection, Datastore, Document, Query},
    memory::MemoryDatastore,
};
use crate::common::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Insert,
    Set,
    Query,
}

/// Datastore de teste: uma operação numa coleção sempre falha, o resto vai
/// para o `MemoryDatastore` de dentro.
pub struct FaultyDatastore {
    inner: MemoryDatastore,
    collection: Collection,
    op: FailOn,
}

impl FaultyDatastore {
    pub fn new(inner: MemoryDatastore, collection: Collection, op: FailOn) -> Self {
        Self { inner, collection, op }
    }

    fn check(&self, collection: Collection, op: FailOn) -> Result<(), AppError> {
        if collection == self.collection && op == self.op {
            return Err(AppError::InternalServerError(anyhow::anyhow!("backend fora do ar")));
        }
        Ok(())
    }
}

#[async_trait]
impl Datastore for FaultyDatastore {
    async fn get(&self, c: Collection, id: Uuid) -> Result<Option<Document>, AppError> {
        self.inner.get(c, id).await
    }

    async fn insert(&self, c: Collection, id: Uuid, data: Value) -> Result<(), AppError> {
        self.check(c, FailOn::Insert)?;
        self.inner.insert(c, id, data).await
    }

    async fn set(&self, c: Collection, id: Uuid, data: Value) -> Result<(), AppError> {
        self.check(c, FailOn::Set)?;
        self.inner.set(c, id, data).await
    }

    async fn delete(&self, c: Collection, id: Uuid) -> Result<bool, AppError> {
        self.inner.delete(c, id).await
    }

    async fn query(&self, c: Collection, q: &Query) -> Result<Vec<Document>, AppError> {
        self.check(c, FailOn::Query)?;
        self.inner.query(c, q).await
    }
}
