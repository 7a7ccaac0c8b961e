// src/db/invoice_repo.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::invoice::Invoice,
    store::{from_document, to_document, Collection, Datastore, Query},
};

#[derive(Clone)]
pub struct InvoiceRepository {
    store: Arc<dyn Datastore>,
}

impl InvoiceRepository {
    pub fn new(store: Arc<dyn Datastore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, invoice: &Invoice) -> Result<(), AppError> {
        self.store
            .insert(Collection::Invoices, invoice.id, to_document(invoice)?)
            .await
    }

    pub async fn save(&self, invoice: &Invoice) -> Result<(), AppError> {
        self.store
            .set(Collection::Invoices, invoice.id, to_document(invoice)?)
            .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, AppError> {
        match self.store.get(Collection::Invoices, id).await? {
            Some(doc) => Ok(Some(from_document(doc)?)),
            None => Ok(None),
        }
    }

    pub async fn list_all(&self) -> Result<Vec<Invoice>, AppError> {
        let docs = self.store.query(Collection::Invoices, &Query::new()).await?;
        docs.into_iter().map(from_document).collect()
    }

    pub async fn list_by_client(&self, client_id: Uuid) -> Result<Vec<Invoice>, AppError> {
        let query = Query::new().eq("clientId", client_id.to_string());
        let docs = self.store.query(Collection::Invoices, &query).await?;
        docs.into_iter().map(from_document).collect()
    }

    pub async fn list_by_vehicle(&self, vehicle_id: Uuid) -> Result<Vec<Invoice>, AppError> {
        let query = Query::new().eq("vehicleId", vehicle_id.to_string());
        let docs = self.store.query(Collection::Invoices, &query).await?;
        docs.into_iter().map(from_document).collect()
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        self.store.delete(Collection::Invoices, id).await
    }
}
