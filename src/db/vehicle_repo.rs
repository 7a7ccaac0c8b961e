// src/db/vehicle_repo.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::vehicle::Vehicle,
    store::{fetch_by_ids, from_document, to_document, Collection, Datastore, Query},
};

#[derive(Clone)]
pub struct VehicleRepository {
    store: Arc<dyn Datastore>,
}

impl VehicleRepository {
    pub fn new(store: Arc<dyn Datastore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, vehicle: &Vehicle) -> Result<(), AppError> {
        self.store
            .insert(Collection::Vehicles, vehicle.id, to_document(vehicle)?)
            .await
    }

    pub async fn save(&self, vehicle: &Vehicle) -> Result<(), AppError> {
        self.store
            .set(Collection::Vehicles, vehicle.id, to_document(vehicle)?)
            .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        match self.store.get(Collection::Vehicles, id).await? {
            Some(doc) => Ok(Some(from_document(doc)?)),
            None => Ok(None),
        }
    }

    pub async fn list_all(&self) -> Result<Vec<Vehicle>, AppError> {
        let docs = self.store.query(Collection::Vehicles, &Query::new()).await?;
        docs.into_iter().map(from_document).collect()
    }

    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Vehicle>, AppError> {
        let query = Query::new().eq("ownerId", owner_id.to_string());
        let docs = self.store.query(Collection::Vehicles, &query).await?;
        docs.into_iter().map(from_document).collect()
    }

    /// `vin` já deve vir normalizado (maiúsculas, sem espaços nas pontas).
    pub async fn find_by_vin(&self, vin: &str) -> Result<Option<Vehicle>, AppError> {
        let query = Query::new().eq("vin", vin).limit(1);
        let mut docs = self.store.query(Collection::Vehicles, &query).await?;
        match docs.pop() {
            Some(doc) => Ok(Some(from_document(doc)?)),
            None => Ok(None),
        }
    }

    pub async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Vehicle>, AppError> {
        let docs = fetch_by_ids(self.store.as_ref(), Collection::Vehicles, ids).await?;
        docs.into_iter().map(from_document).collect()
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        self.store.delete(Collection::Vehicles, id).await
    }
}
