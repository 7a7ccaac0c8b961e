// src/services/catalog_service.rs

use uuid::Uuid;

use crate::{
    common::{error::AppError, timestamp::Timestamp},
    db::CatalogRepository,
    models::catalog::{CreateCatalogItemPayload, ServiceCatalogItem, UpdateCatalogItemPayload},
};

#[derive(Clone)]
pub struct CatalogService {
    repo: CatalogRepository,
}

impl CatalogService {
    pub fn new(repo: CatalogRepository) -> Self {
        Self { repo }
    }

    pub async fn create_item(
        &self,
        payload: CreateCatalogItemPayload,
    ) -> Result<ServiceCatalogItem, AppError> {
        let now = Timestamp::now();
        let item = ServiceCatalogItem {
            id: Uuid::new_v4(),
            name: payload.name.trim().to_string(),
            description: payload.description,
            default_unit_price: payload.default_unit_price,
            category: payload.category.trim().to_string(),
            is_active: payload.is_active.unwrap_or(true),
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };
        self.repo.create(&item).await?;
        Ok(item)
    }

    pub async fn get_item(&self, id: Uuid) -> Result<ServiceCatalogItem, AppError> {
        self.repo.find_by_id(id).await?.ok_or(AppError::NotFound("Serviço"))
    }

    pub async fn update_item(
        &self,
        id: Uuid,
        payload: UpdateCatalogItemPayload,
    ) -> Result<ServiceCatalogItem, AppError> {
        let mut item = self.get_item(id).await?;

        if let Some(name) = payload.name {
            item.name = name.trim().to_string();
        }
        payload.description.apply(&mut item.description);
        if let Some(price) = payload.default_unit_price {
            item.default_unit_price = price;
        }
        if let Some(category) = payload.category {
            item.category = category.trim().to_string();
        }
        if let Some(is_active) = payload.is_active {
            item.is_active = is_active;
        }

        item.updated_at = Some(Timestamp::now());
        self.repo.save(&item).await?;
        Ok(item)
    }

    pub async fn delete_item(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound("Serviço"));
        }
        Ok(())
    }

    pub async fn list_all(&self) -> Result<Vec<ServiceCatalogItem>, AppError> {
        self.repo.list_all().await
    }

    /// Opções para os formulários de fatura e manutenção.
    pub async fn list_active(&self) -> Result<Vec<ServiceCatalogItem>, AppError> {
        self.repo.list_active().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use std::sync::Arc;

    use rust_decimal::Decimal;

    use crate::store::{Datastore, MemoryDatastore};

    fn payload(name: &str, active: bool) -> CreateCatalogItemPayload {
        CreateCatalogItemPayload {
            name: name.to_string(),
            description: None,
            default_unit_price: Decimal::from_str("45.00").unwrap(),
            category: "Motor".to_string(),
            is_active: Some(active),
        }
    }

    #[tokio::test]
    async fn active_list_is_filtered_and_sorted_by_name() {
        let store: Arc<dyn Datastore> = Arc::new(MemoryDatastore::new());
        let service = CatalogService::new(CatalogRepository::new(store));

        service.create_item(payload("Troca de óleo", true)).await.unwrap();
        service.create_item(payload("Alinhamento", true)).await.unwrap();
        service.create_item(payload("Lavagem", false)).await.unwrap();

        let names: Vec<String> = service
            .list_active()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Alinhamento".to_string(), "Troca de óleo".to_string()]);
        assert_eq!(service.list_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn delete_unknown_item_is_not_found() {
        let store: Arc<dyn Datastore> = Arc::new(MemoryDatastore::new());
        let service = CatalogService::new(CatalogRepository::new(store));
        assert!(matches!(
            service.delete_item(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }
}
