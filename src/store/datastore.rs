// src/store/datastore.rs

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::common::error::AppError;

/// Tamanho máximo de uma lista em filtros `In`/`IdIn` aceito pelo backend.
pub const IN_QUERY_LIMIT: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Clients,
    Vehicles,
    Invoices,
    MaintenanceItems,
    ServiceCatalog,
    Identities,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Clients => "clients",
            Collection::Vehicles => "vehicles",
            Collection::Invoices => "invoices",
            Collection::MaintenanceItems => "maintenanceItems",
            Collection::ServiceCatalog => "serviceCatalog",
            Collection::Identities => "identities",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: Uuid,
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(String, Value),
    In(String, Vec<Value>),
    IdIn(Vec<Uuid>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq(field.to_string(), value.into()));
        self
    }

    pub fn is_in(mut self, field: &str, values: Vec<Value>) -> Self {
        self.filters.push(Filter::In(field.to_string(), values));
        self
    }

    pub fn id_in(mut self, ids: Vec<Uuid>) -> Self {
        self.filters.push(Filter::IdIn(ids));
        self
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by = Some(OrderBy { field: field.to_string(), direction });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Recusa listas maiores que [`IN_QUERY_LIMIT`], como o backend gerenciado.
    pub fn check_in_limits(&self) -> Result<(), AppError> {
        for filter in &self.filters {
            let requested = match filter {
                Filter::In(_, values) => values.len(),
                Filter::IdIn(ids) => ids.len(),
                Filter::Eq(..) => continue,
            };
            if requested > IN_QUERY_LIMIT {
                return Err(AppError::QueryTooLarge { limit: IN_QUERY_LIMIT, requested });
            }
        }
        Ok(())
    }
}

/// Acesso CRUD genérico a coleções de documentos JSON.
#[async_trait]
pub trait Datastore: Send + Sync {
    async fn get(&self, collection: Collection, id: Uuid) -> Result<Option<Document>, AppError>;

    /// Cria o documento; falha com `Conflict` se o id já existir.
    async fn insert(&self, collection: Collection, id: Uuid, data: Value) -> Result<(), AppError>;

    /// Cria ou substitui o documento inteiro.
    async fn set(&self, collection: Collection, id: Uuid, data: Value) -> Result<(), AppError>;

    /// Retorna `true` se algo foi removido.
    async fn delete(&self, collection: Collection, id: Uuid) -> Result<bool, AppError>;

    async fn query(&self, collection: Collection, query: &Query) -> Result<Vec<Document>, AppError>;
}

/// Busca por lista de ids respeitando o limite do backend: divide a lista em
/// blocos de [`IN_QUERY_LIMIT`] e junta os resultados. Ids repetidos são
/// consultados uma única vez.
pub async fn fetch_by_ids(
    store: &dyn Datastore,
    collection: Collection,
    ids: &[Uuid],
) -> Result<Vec<Document>, AppError> {
    let mut unique: Vec<Uuid> = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(id) {
            unique.push(*id);
        }
    }

    let mut documents = Vec::with_capacity(unique.len());
    for chunk in unique.chunks(IN_QUERY_LIMIT) {
        let query = Query::new().id_in(chunk.to_vec());
        documents.extend(store.query(collection, &query).await?);
    }

    tracing::debug!(
        "fetch_by_ids {}: {} ids, {} encontrados",
        collection.as_str(),
        unique.len(),
        documents.len()
    );
    Ok(documents)
}

/// Converte um registro tipado em documento. Campos opcionais ausentes são
/// gravados como `null` explícito e o `id` sai do corpo (ele é a chave).
pub fn to_document<T: Serialize>(record: &T) -> Result<Value, AppError> {
    let mut value = serde_json::to_value(record)?;
    match value.as_object_mut() {
        Some(map) => {
            map.remove("id");
        }
        None => {
            return Err(AppError::InternalServerError(anyhow::anyhow!(
                "registro não serializa como objeto JSON"
            )))
        }
    }
    Ok(value)
}

/// Caminho inverso: injeta o id de volta antes de desserializar.
pub fn from_document<T: serde::de::DeserializeOwned>(doc: Document) -> Result<T, AppError> {
    let Document { id, mut data } = doc;
    if let Some(map) = data.as_object_mut() {
        map.insert("id".to_string(), Value::String(id.to_string()));
    }
    Ok(serde_json::from_value(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryDatastore;
    use serde_json::json;

    #[tokio::test]
    async fn sixty_five_ids_take_three_queries() {
        let store = MemoryDatastore::new();
        let mut ids = Vec::new();
        for n in 0..65 {
            let id = Uuid::new_v4();
            store.insert(Collection::Vehicles, id, json!({ "n": n })).await.unwrap();
            ids.push(id);
        }

        let docs = fetch_by_ids(&store, Collection::Vehicles, &ids).await.unwrap();

        assert_eq!(store.query_count(), 3);
        assert_eq!(docs.len(), 65);
        for id in &ids {
            assert!(docs.iter().any(|d| d.id == *id));
        }
    }

    #[tokio::test]
    async fn duplicates_and_unknown_ids_are_harmless() {
        let store = MemoryDatastore::new();
        let known = Uuid::new_v4();
        store.insert(Collection::Clients, known, json!({})).await.unwrap();

        let ids = vec![known, Uuid::new_v4(), known];
        let docs = fetch_by_ids(&store, Collection::Clients, &ids).await.unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(store.query_count(), 1);
    }

    #[tokio::test]
    async fn chunk_boundaries_do_not_change_the_result() {
        let store = MemoryDatastore::new();
        let mut ids = Vec::new();
        for _ in 0..60 {
            let id = Uuid::new_v4();
            store.insert(Collection::Invoices, id, json!({})).await.unwrap();
            ids.push(id);
        }

        let mut reversed = ids.clone();
        reversed.reverse();

        let mut a: Vec<Uuid> = fetch_by_ids(&store, Collection::Invoices, &ids)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        let mut b: Vec<Uuid> = fetch_by_ids(&store, Collection::Invoices, &reversed)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        a.sort();
        b.sort();
        assert_eq!(a, b);
        assert_eq!(a.len(), 60);
    }

    #[test]
    fn oversized_in_lists_are_rejected() {
        let ids: Vec<Uuid> = (0..31).map(|_| Uuid::new_v4()).collect();
        let err = Query::new().id_in(ids).check_in_limits().unwrap_err();
        assert!(matches!(err, AppError::QueryTooLarge { limit: 30, requested: 31 }));
    }

    #[test]
    fn absent_optionals_become_explicit_nulls() {
        #[derive(Serialize)]
        struct Rec {
            id: Uuid,
            notes: Option<String>,
        }
        let doc = to_document(&Rec { id: Uuid::new_v4(), notes: None }).unwrap();
        assert_eq!(doc, json!({ "notes": null }));
    }
}
