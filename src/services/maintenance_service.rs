// src/services/maintenance_service.rs

use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        timestamp::{sort_key, Timestamp},
    },
    db::{ClientRepository, MaintenanceRepository, VehicleRepository},
    models::{
        enriched::EnrichedMaintenance,
        maintenance::{
            CreateMaintenancePayload, MaintenanceItem, MaintenanceStatus,
            UpdateMaintenancePayload,
        },
    },
    services::enrichment::{enrich_maintenance, load_clients_by_id, load_vehicles_by_id},
};

#[derive(Clone)]
pub struct MaintenanceService {
    repo: MaintenanceRepository,
    vehicle_repo: VehicleRepository,
    client_repo: ClientRepository,
}

fn clean_tasks(tasks: Vec<String>) -> Vec<String> {
    tasks
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

impl MaintenanceService {
    pub fn new(
        repo: MaintenanceRepository,
        vehicle_repo: VehicleRepository,
        client_repo: ClientRepository,
    ) -> Self {
        Self { repo, vehicle_repo, client_repo }
    }

    pub async fn create_item(
        &self,
        payload: CreateMaintenancePayload,
    ) -> Result<MaintenanceItem, AppError> {
        let vehicle = self
            .vehicle_repo
            .find_by_id(payload.vehicle_id)
            .await?
            .ok_or_else(|| AppError::field("vehicleId", "not_found", "Veículo não encontrado."))?;

        let now = Timestamp::now();
        let item = MaintenanceItem {
            id: Uuid::new_v4(),
            vehicle_id: vehicle.id,
            client_id: vehicle.owner_id,
            description: payload.description.trim().to_string(),
            tasks: clean_tasks(payload.tasks),
            due_date: payload.due_date,
            due_mileage: payload.due_mileage,
            status: payload.status.unwrap_or(MaintenanceStatus::Upcoming),
            notes: payload.notes,
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };

        self.repo.create(&item).await?;
        Ok(item)
    }

    pub async fn get_item(&self, id: Uuid) -> Result<MaintenanceItem, AppError> {
        self.repo.find_by_id(id).await?.ok_or(AppError::NotFound("Manutenção"))
    }

    pub async fn update_item(
        &self,
        id: Uuid,
        payload: UpdateMaintenancePayload,
    ) -> Result<MaintenanceItem, AppError> {
        let mut item = self.get_item(id).await?;

        if let Some(description) = payload.description {
            item.description = description.trim().to_string();
        }
        if let Some(tasks) = payload.tasks {
            item.tasks = clean_tasks(tasks);
        }
        payload.due_date.apply(&mut item.due_date);
        payload.due_mileage.apply(&mut item.due_mileage);
        if let Some(status) = payload.status {
            item.status = status;
        }
        payload.notes.apply(&mut item.notes);

        item.updated_at = Some(Timestamp::now());
        self.repo.save(&item).await?;
        Ok(item)
    }

    pub async fn set_status(
        &self,
        id: Uuid,
        status: MaintenanceStatus,
    ) -> Result<MaintenanceItem, AppError> {
        let mut item = self.get_item(id).await?;
        item.status = status;
        item.updated_at = Some(Timestamp::now());
        self.repo.save(&item).await?;
        Ok(item)
    }

    pub async fn delete_item(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound("Manutenção"));
        }
        Ok(())
    }

    // --- Listagens ---

    pub async fn list_enriched(&self) -> Result<Vec<EnrichedMaintenance>, AppError> {
        let items = self.repo.list_all().await?;
        self.enrich(items).await
    }

    pub async fn list_for_client(&self, client_id: Uuid) -> Result<Vec<EnrichedMaintenance>, AppError> {
        let items = self.repo.list_by_client(client_id).await?;
        self.enrich(items).await
    }

    // Vencimento mais próximo primeiro; sem data no fim
    async fn enrich(&self, mut items: Vec<MaintenanceItem>) -> Result<Vec<EnrichedMaintenance>, AppError> {
        items.sort_by_key(|m| (m.due_date.is_none(), sort_key(m.due_date.as_ref())));
        let clients =
            load_clients_by_id(&self.client_repo, items.iter().map(|m| m.client_id)).await?;
        let vehicles =
            load_vehicles_by_id(&self.vehicle_repo, items.iter().map(|m| m.vehicle_id)).await?;
        Ok(enrich_maintenance(items, &clients, &vehicles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::{
        common::patch::Patch,
        store::{Datastore, MemoryDatastore},
    };

    #[tokio::test]
    async fn unknown_vehicle_is_a_validation_error() {
        let store: Arc<dyn Datastore> = Arc::new(MemoryDatastore::new());
        let service = MaintenanceService::new(
            MaintenanceRepository::new(store.clone()),
            VehicleRepository::new(store.clone()),
            ClientRepository::new(store),
        );
        let err = service
            .create_item(CreateMaintenancePayload {
                vehicle_id: Uuid::new_v4(),
                description: "Revisão".to_string(),
                tasks: vec![],
                due_date: None,
                due_mileage: None,
                status: None,
                notes: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn orphan_items_enrich_as_not_available_and_patch_clears() {
        let store: Arc<dyn Datastore> = Arc::new(MemoryDatastore::new());
        let repo = MaintenanceRepository::new(store.clone());
        let service = MaintenanceService::new(
            repo.clone(),
            VehicleRepository::new(store.clone()),
            ClientRepository::new(store),
        );

        let item = MaintenanceItem {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            description: "Correia".to_string(),
            tasks: vec!["Trocar correia".to_string()],
            due_date: Some(Timestamp::now()),
            due_mileage: Some(120_000),
            status: MaintenanceStatus::Due,
            notes: None,
            created_at: None,
            updated_at: None,
        };
        repo.create(&item).await.unwrap();

        let rows = service.list_enriched().await.unwrap();
        assert_eq!(rows[0].client_name, "N/A");
        assert_eq!(rows[0].vehicle_label, "N/A");

        let updated = service
            .update_item(
                item.id,
                UpdateMaintenancePayload {
                    due_mileage: Patch::Clear,
                    tasks: Some(vec!["  ".to_string(), "Bomba de água".to_string()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.due_mileage, None);
        assert!(updated.due_date.is_some());
        assert_eq!(updated.tasks, vec!["Bomba de água".to_string()]);
    }
}
