// src/store/postgres.rs

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{types::Json, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::datastore::{Collection, Datastore, Direction, Document, Filter, Query};
use crate::common::error::AppError;

// Todas as coleções vivem numa única tabela:
//   documents (collection TEXT, id UUID, data JSONB, PRIMARY KEY (collection, id))
// Ver migrations/.
#[derive(Clone)]
pub struct PgDatastore {
    pool: PgPool,
}

impl PgDatastore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Campo ausente no JSONB conta como `null`, igual ao backend em memória.
fn push_field(builder: &mut QueryBuilder<'_, Postgres>, field: &str) {
    builder.push("COALESCE(data -> ");
    builder.push_bind(field.to_string());
    builder.push(", 'null'::jsonb)");
}

#[async_trait]
impl Datastore for PgDatastore {
    async fn get(&self, collection: Collection, id: Uuid) -> Result<Option<Document>, AppError> {
        let row = sqlx::query_as::<_, (Uuid, Json<Value>)>(
            "SELECT id, data FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, Json(data))| Document { id, data }))
    }

    async fn insert(&self, collection: Collection, id: Uuid, data: Value) -> Result<(), AppError> {
        sqlx::query("INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)")
            .bind(collection.as_str())
            .bind(id)
            .bind(Json(data))
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_unique_violation() {
                        return AppError::Conflict(format!(
                            "documento {} já existe em {}",
                            id,
                            collection.as_str()
                        ));
                    }
                }
                AppError::DatabaseError(e)
            })?;
        Ok(())
    }

    async fn set(&self, collection: Collection, id: Uuid, data: Value) -> Result<(), AppError> {
        // UPSERT (Insert or Update)
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id)
            DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()
            "#,
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(Json(data))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn query(&self, collection: Collection, query: &Query) -> Result<Vec<Document>, AppError> {
        query.check_in_limits()?;

        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT id, data FROM documents WHERE collection = ");
        builder.push_bind(collection.as_str());

        for filter in &query.filters {
            builder.push(" AND ");
            match filter {
                Filter::Eq(field, value) => {
                    push_field(&mut builder, field);
                    builder.push(" = ");
                    builder.push_bind(Json(value.clone()));
                }
                // Lista vazia não casa com nada.
                Filter::In(_, values) if values.is_empty() => {
                    builder.push("FALSE");
                }
                Filter::In(field, values) => {
                    push_field(&mut builder, field);
                    builder.push(" IN (");
                    let mut separated = builder.separated(", ");
                    for value in values {
                        separated.push_bind(Json(value.clone()));
                    }
                    separated.push_unseparated(")");
                }
                Filter::IdIn(ids) if ids.is_empty() => {
                    builder.push("FALSE");
                }
                Filter::IdIn(ids) => {
                    builder.push("id IN (");
                    let mut separated = builder.separated(", ");
                    for id in ids {
                        separated.push_bind(*id);
                    }
                    separated.push_unseparated(")");
                }
            }
        }

        if let Some(order) = &query.order_by {
            builder.push(" ORDER BY ");
            push_field(&mut builder, &order.field);
            builder.push(match order.direction {
                Direction::Asc => " ASC",
                Direction::Desc => " DESC",
            });
        }

        if let Some(limit) = query.limit {
            builder.push(" LIMIT ");
            builder.push_bind(limit as i64);
        }

        let rows = builder
            .build_query_as::<(Uuid, Json<Value>)>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, Json(data))| Document { id, data })
            .collect())
    }
}
