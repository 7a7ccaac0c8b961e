// src/db/identity_repo.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{auth::Identity, client::normalize_email},
    store::{from_document, to_document, Collection, Datastore, Query},
};

#[derive(Clone)]
pub struct IdentityRepository {
    store: Arc<dyn Datastore>,
}

impl IdentityRepository {
    pub fn new(store: Arc<dyn Datastore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, identity: &Identity) -> Result<(), AppError> {
        // Id repetido = e-mail já vinculado a outra conta
        self.store
            .insert(Collection::Identities, identity.id, to_document(identity)?)
            .await
            .map_err(|e| match e {
                AppError::Conflict(_) => AppError::EmailAlreadyExists,
                other => other,
            })
    }

    pub async fn save(&self, identity: &Identity) -> Result<(), AppError> {
        self.store
            .set(Collection::Identities, identity.id, to_document(identity)?)
            .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, AppError> {
        match self.store.get(Collection::Identities, id).await? {
            Some(doc) => Ok(Some(from_document(doc)?)),
            None => Ok(None),
        }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, AppError> {
        let query = Query::new().eq("email", normalize_email(email)).limit(1);
        let mut docs = self.store.query(Collection::Identities, &query).await?;
        match docs.pop() {
            Some(doc) => Ok(Some(from_document(doc)?)),
            None => Ok(None),
        }
    }
}
