// src/db/maintenance_repo.rs

use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::maintenance::{MaintenanceItem, MaintenanceStatus},
    store::{from_document, to_document, Collection, Datastore, Query},
};

#[derive(Clone)]
pub struct MaintenanceRepository {
    store: Arc<dyn Datastore>,
}

impl MaintenanceRepository {
    pub fn new(store: Arc<dyn Datastore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, item: &MaintenanceItem) -> Result<(), AppError> {
        self.store
            .insert(Collection::MaintenanceItems, item.id, to_document(item)?)
            .await
    }

    pub async fn save(&self, item: &MaintenanceItem) -> Result<(), AppError> {
        self.store
            .set(Collection::MaintenanceItems, item.id, to_document(item)?)
            .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<MaintenanceItem>, AppError> {
        match self.store.get(Collection::MaintenanceItems, id).await? {
            Some(doc) => Ok(Some(from_document(doc)?)),
            None => Ok(None),
        }
    }

    pub async fn list_all(&self) -> Result<Vec<MaintenanceItem>, AppError> {
        let docs = self
            .store
            .query(Collection::MaintenanceItems, &Query::new())
            .await?;
        docs.into_iter().map(from_document).collect()
    }

    pub async fn list_by_client(&self, client_id: Uuid) -> Result<Vec<MaintenanceItem>, AppError> {
        let query = Query::new().eq("clientId", client_id.to_string());
        let docs = self.store.query(Collection::MaintenanceItems, &query).await?;
        docs.into_iter().map(from_document).collect()
    }

    pub async fn list_by_vehicle(&self, vehicle_id: Uuid) -> Result<Vec<MaintenanceItem>, AppError> {
        let query = Query::new().eq("vehicleId", vehicle_id.to_string());
        let docs = self.store.query(Collection::MaintenanceItems, &query).await?;
        docs.into_iter().map(from_document).collect()
    }

    /// Itens ainda em aberto (`upcoming` ou `due`).
    pub async fn list_open(&self) -> Result<Vec<MaintenanceItem>, AppError> {
        let open = vec![
            Value::from(MaintenanceStatus::Upcoming.as_str()),
            Value::from(MaintenanceStatus::Due.as_str()),
        ];
        let query = Query::new().is_in("status", open);
        let docs = self.store.query(Collection::MaintenanceItems, &query).await?;
        docs.into_iter().map(from_document).collect()
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        self.store.delete(Collection::MaintenanceItems, id).await
    }
}
