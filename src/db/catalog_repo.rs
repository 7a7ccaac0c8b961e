// src/db/catalog_repo.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::catalog::ServiceCatalogItem,
    store::{from_document, to_document, Collection, Datastore, Direction, Query},
};

#[derive(Clone)]
pub struct CatalogRepository {
    store: Arc<dyn Datastore>,
}

impl CatalogRepository {
    pub fn new(store: Arc<dyn Datastore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, item: &ServiceCatalogItem) -> Result<(), AppError> {
        self.store
            .insert(Collection::ServiceCatalog, item.id, to_document(item)?)
            .await
    }

    pub async fn save(&self, item: &ServiceCatalogItem) -> Result<(), AppError> {
        self.store
            .set(Collection::ServiceCatalog, item.id, to_document(item)?)
            .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ServiceCatalogItem>, AppError> {
        match self.store.get(Collection::ServiceCatalog, id).await? {
            Some(doc) => Ok(Some(from_document(doc)?)),
            None => Ok(None),
        }
    }

    /// Catálogo completo, em ordem alfabética.
    pub async fn list_all(&self) -> Result<Vec<ServiceCatalogItem>, AppError> {
        let query = Query::new().order_by("name", Direction::Asc);
        let docs = self.store.query(Collection::ServiceCatalog, &query).await?;
        docs.into_iter().map(from_document).collect()
    }

    /// Só os ativos (a lista de opções dos formulários).
    pub async fn list_active(&self) -> Result<Vec<ServiceCatalogItem>, AppError> {
        let query = Query::new()
            .eq("isActive", true)
            .order_by("name", Direction::Asc);
        let docs = self.store.query(Collection::ServiceCatalog, &query).await?;
        docs.into_iter().map(from_document).collect()
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        self.store.delete(Collection::ServiceCatalog, id).await
    }
}
