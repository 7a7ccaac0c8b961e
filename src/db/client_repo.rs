// src/db/client_repo.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::client::{normalize_email, Client},
    store::{fetch_by_ids, from_document, to_document, Collection, Datastore, Query},
};

#[derive(Clone)]
pub struct ClientRepository {
    store: Arc<dyn Datastore>,
}

impl ClientRepository {
    pub fn new(store: Arc<dyn Datastore>) -> Self {
        Self { store }
    }

    /// Grava um cliente novo. Falha com `Conflict` se o id já existir.
    pub async fn create(&self, client: &Client) -> Result<(), AppError> {
        self.store
            .insert(Collection::Clients, client.id, to_document(client)?)
            .await
    }

    /// Substitui o documento inteiro (campos opcionais vazios viram `null`).
    pub async fn save(&self, client: &Client) -> Result<(), AppError> {
        self.store
            .set(Collection::Clients, client.id, to_document(client)?)
            .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, AppError> {
        match self.store.get(Collection::Clients, id).await? {
            Some(doc) => Ok(Some(from_document(doc)?)),
            None => Ok(None),
        }
    }

    /// O e-mail é gravado sempre em minúsculas.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Client>, AppError> {
        let query = Query::new().eq("email", normalize_email(email)).limit(1);
        let mut docs = self.store.query(Collection::Clients, &query).await?;
        match docs.pop() {
            Some(doc) => Ok(Some(from_document(doc)?)),
            None => Ok(None),
        }
    }

    pub async fn list_all(&self) -> Result<Vec<Client>, AppError> {
        let docs = self.store.query(Collection::Clients, &Query::new()).await?;
        docs.into_iter().map(from_document).collect()
    }

    pub async fn list_active(&self) -> Result<Vec<Client>, AppError> {
        let query = Query::new().eq("isActive", true);
        let docs = self.store.query(Collection::Clients, &query).await?;
        docs.into_iter().map(from_document).collect()
    }

    /// Busca em lote (blocos de 30 ids).
    pub async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Client>, AppError> {
        let docs = fetch_by_ids(self.store.as_ref(), Collection::Clients, ids).await?;
        docs.into_iter().map(from_document).collect()
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        self.store.delete(Collection::Clients, id).await
    }
}
