// src/store/memory.rs

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::datastore::{Collection, Datastore, Direction, Document, Filter, Query};
use crate::common::error::AppError;

/// Datastore em memória, usado em desenvolvimento e nos testes.
///
/// Segue as mesmas regras do backend real: limite de listas `In`, campo
/// ausente igual a `null`. Conta as consultas para os testes de lote.
#[derive(Clone, Default)]
pub struct MemoryDatastore {
    collections: Arc<RwLock<HashMap<Collection, BTreeMap<Uuid, Value>>>>,
    queries: Arc<AtomicUsize>,
}

impl MemoryDatastore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quantas chamadas a `query` foram feitas até agora.
    pub fn query_count(&self) -> usize {
        self.queries.load(AtomicOrdering::SeqCst)
    }
}

fn field<'a>(data: &'a Value, name: &str) -> &'a Value {
    data.get(name).unwrap_or(&Value::Null)
}

fn matches(id: &Uuid, data: &Value, filter: &Filter) -> bool {
    match filter {
        Filter::Eq(name, expected) => field(data, name) == expected,
        Filter::In(name, values) => values.contains(field(data, name)),
        Filter::IdIn(ids) => ids.contains(id),
    }
}

// Ordem entre valores JSON: null < bool < número < texto; o resto empata.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

#[async_trait]
impl Datastore for MemoryDatastore {
    async fn get(&self, collection: Collection, id: Uuid) -> Result<Option<Document>, AppError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.get(&id))
            .map(|data| Document { id, data: data.clone() }))
    }

    async fn insert(&self, collection: Collection, id: Uuid, data: Value) -> Result<(), AppError> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();
        if docs.contains_key(&id) {
            return Err(AppError::Conflict(format!(
                "documento {} já existe em {}",
                id,
                collection.as_str()
            )));
        }
        docs.insert(id, data);
        Ok(())
    }

    async fn set(&self, collection: Collection, id: Uuid, data: Value) -> Result<(), AppError> {
        let mut collections = self.collections.write().await;
        collections.entry(collection).or_default().insert(id, data);
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> Result<bool, AppError> {
        let mut collections = self.collections.write().await;
        Ok(collections
            .get_mut(&collection)
            .map(|docs| docs.remove(&id).is_some())
            .unwrap_or(false))
    }

    async fn query(&self, collection: Collection, query: &Query) -> Result<Vec<Document>, AppError> {
        self.queries.fetch_add(1, AtomicOrdering::SeqCst);
        query.check_in_limits()?;

        let collections = self.collections.read().await;
        let Some(docs) = collections.get(&collection) else {
            return Ok(Vec::new());
        };

        let mut found: Vec<Document> = docs
            .iter()
            .filter(|(id, data)| query.filters.iter().all(|f| matches(id, data, f)))
            .map(|(id, data)| Document { id: *id, data: data.clone() })
            .collect();

        if let Some(order) = &query.order_by {
            found.sort_by(|a, b| {
                let ord = compare_values(field(&a.data, &order.field), field(&b.data, &order.field));
                match order.direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            });
        }

        if let Some(limit) = query.limit {
            found.truncate(limit);
        }

        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn insert_refuses_existing_ids_but_set_replaces() {
        let store = MemoryDatastore::new();
        let id = Uuid::new_v4();

        store.insert(Collection::Clients, id, json!({ "firstName": "Ana" })).await.unwrap();
        let err = store.insert(Collection::Clients, id, json!({})).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        store.set(Collection::Clients, id, json!({ "firstName": "Bia" })).await.unwrap();
        let doc = store.get(Collection::Clients, id).await.unwrap().unwrap();
        assert_eq!(doc.data["firstName"], "Bia");
    }

    #[tokio::test]
    async fn filters_order_and_limit() {
        let store = MemoryDatastore::new();
        for (name, price, active) in [("Óleo", 40, true), ("Freios", 120, true), ("Velas", 30, false)] {
            store
                .insert(
                    Collection::ServiceCatalog,
                    Uuid::new_v4(),
                    json!({ "name": name, "defaultUnitPrice": price, "isActive": active }),
                )
                .await
                .unwrap();
        }

        let query = Query::new()
            .eq("isActive", true)
            .order_by("defaultUnitPrice", Direction::Desc)
            .limit(5);
        let docs = store.query(Collection::ServiceCatalog, &query).await.unwrap();
        let names: Vec<&str> = docs.iter().map(|d| d.data["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["Freios", "Óleo"]);
    }

    #[tokio::test]
    async fn missing_fields_match_null() {
        let store = MemoryDatastore::new();
        store.insert(Collection::Vehicles, Uuid::new_v4(), json!({ "make": "Seat" })).await.unwrap();

        let docs = store
            .query(Collection::Vehicles, &Query::new().eq("imagePath", Value::Null))
            .await
            .unwrap();
        assert_eq!(docs.len(), 1);
    }

    #[tokio::test]
    async fn delete_reports_whether_something_was_removed() {
        let store = MemoryDatastore::new();
        let id = Uuid::new_v4();
        store.insert(Collection::Invoices, id, json!({})).await.unwrap();

        assert!(store.delete(Collection::Invoices, id).await.unwrap());
        assert!(!store.delete(Collection::Invoices, id).await.unwrap());
    }
}
