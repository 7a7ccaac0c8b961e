// src/services/vehicle_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        timestamp::{sort_key, Timestamp},
    },
    db::{ClientRepository, InvoiceRepository, MaintenanceRepository, VehicleRepository},
    models::{
        client::Client,
        enriched::EnrichedVehicle,
        vehicle::{CreateVehiclePayload, UpdateVehiclePayload, Vehicle, VehicleDetail},
    },
    services::enrichment::{enrich_vehicles, load_clients_by_id, NOT_AVAILABLE},
    storage::{discard_blob, paths::vehicle_image_path, BlobStore},
};

#[derive(Clone)]
pub struct VehicleService {
    repo: VehicleRepository,
    client_repo: ClientRepository,
    invoice_repo: InvoiceRepository,
    maintenance_repo: MaintenanceRepository,
    blobs: Arc<dyn BlobStore>,
}

impl VehicleService {
    pub fn new(
        repo: VehicleRepository,
        client_repo: ClientRepository,
        invoice_repo: InvoiceRepository,
        maintenance_repo: MaintenanceRepository,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self { repo, client_repo, invoice_repo, maintenance_repo, blobs }
    }

    async fn ensure_owner_exists(&self, owner_id: Uuid) -> Result<(), AppError> {
        if self.client_repo.find_by_id(owner_id).await?.is_none() {
            return Err(AppError::field("ownerId", "not_found", "Proprietário não encontrado."));
        }
        Ok(())
    }

    // O VIN compõe o caminho da imagem; dois veículos com o mesmo VIN dividiriam o arquivo.
    async fn ensure_vin_free(&self, vin: &str, current: Option<Uuid>) -> Result<(), AppError> {
        if vin.is_empty() {
            return Ok(());
        }
        match self.repo.find_by_vin(vin).await? {
            Some(other) if Some(other.id) != current => Err(AppError::Conflict(format!(
                "Já existe um veículo com o VIN {}.",
                vin
            ))),
            _ => Ok(()),
        }
    }

    pub async fn create_vehicle(&self, payload: CreateVehiclePayload) -> Result<Vehicle, AppError> {
        self.ensure_owner_exists(payload.owner_id).await?;
        let vin = payload.vin.trim().to_uppercase();
        self.ensure_vin_free(&vin, None).await?;

        let now = Timestamp::now();
        let vehicle = Vehicle {
            id: Uuid::new_v4(),
            owner_id: payload.owner_id,
            make: payload.make.trim().to_string(),
            model: payload.model.trim().to_string(),
            year: payload.year,
            license_plate: payload.license_plate.trim().to_uppercase(),
            vin,
            engine_code: payload.engine_code,
            mileage: payload.mileage,
            last_service_date: payload.last_service_date,
            image_path: None,
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };

        self.repo.create(&vehicle).await?;
        tracing::info!("Veículo {} cadastrado para o cliente {}", vehicle.id, vehicle.owner_id);
        Ok(vehicle)
    }

    pub async fn get_vehicle(&self, id: Uuid) -> Result<Vehicle, AppError> {
        self.repo.find_by_id(id).await?.ok_or(AppError::NotFound("Veículo"))
    }

    /// Como `get_vehicle`, mas um cliente só enxerga os próprios veículos.
    /// Veículo de outro dono responde igual a inexistente.
    pub async fn get_for_viewer(&self, id: Uuid, viewer: &Client) -> Result<Vehicle, AppError> {
        let vehicle = self.get_vehicle(id).await?;
        if !viewer.is_manager() && vehicle.owner_id != viewer.id {
            tracing::debug!("Cliente {} pediu o veículo {} de outro dono", viewer.id, id);
            return Err(AppError::NotFound("Veículo"));
        }
        Ok(vehicle)
    }

    pub async fn update_vehicle(
        &self,
        id: Uuid,
        payload: UpdateVehiclePayload,
    ) -> Result<Vehicle, AppError> {
        let mut vehicle = self.get_vehicle(id).await?;

        if let Some(owner_id) = payload.owner_id {
            if owner_id != vehicle.owner_id {
                self.ensure_owner_exists(owner_id).await?;
                vehicle.owner_id = owner_id;
            }
        }
        if let Some(make) = payload.make {
            vehicle.make = make.trim().to_string();
        }
        if let Some(model) = payload.model {
            vehicle.model = model.trim().to_string();
        }
        if let Some(year) = payload.year {
            vehicle.year = year;
        }
        if let Some(plate) = payload.license_plate {
            vehicle.license_plate = plate.trim().to_uppercase();
        }
        if let Some(vin) = payload.vin {
            let vin = vin.trim().to_uppercase();
            self.ensure_vin_free(&vin, Some(vehicle.id)).await?;
            vehicle.vin = vin;
        }
        payload.engine_code.apply(&mut vehicle.engine_code);
        payload.mileage.apply(&mut vehicle.mileage);
        payload.last_service_date.apply(&mut vehicle.last_service_date);

        vehicle.updated_at = Some(Timestamp::now());
        self.repo.save(&vehicle).await?;
        Ok(vehicle)
    }

    /// Primeiro o registro, depois a imagem.
    pub async fn delete_vehicle(&self, id: Uuid) -> Result<(), AppError> {
        let vehicle = self.get_vehicle(id).await?;
        self.repo.delete(id).await?;
        if let Some(path) = &vehicle.image_path {
            discard_blob(self.blobs.as_ref(), path).await;
        }
        tracing::info!("Veículo {} excluído", id);
        Ok(())
    }

    // --- Listagens (com o nome do dono) ---

    pub async fn list_enriched(&self) -> Result<Vec<EnrichedVehicle>, AppError> {
        let vehicles = self.repo.list_all().await?;
        self.enrich(vehicles).await
    }

    pub async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<EnrichedVehicle>, AppError> {
        let vehicles = self.repo.list_by_owner(owner_id).await?;
        self.enrich(vehicles).await
    }

    async fn enrich(&self, mut vehicles: Vec<Vehicle>) -> Result<Vec<EnrichedVehicle>, AppError> {
        vehicles.sort_by_key(|v| std::cmp::Reverse(sort_key(v.created_at.as_ref())));
        let clients =
            load_clients_by_id(&self.client_repo, vehicles.iter().map(|v| v.owner_id)).await?;
        Ok(enrich_vehicles(vehicles, &clients))
    }

    // --- Detalhe ---

    /// Veículo primeiro (falha = erro); dono, faturas e manutenções são
    /// carregados um a um e cada falha vira só um aviso.
    pub async fn vehicle_detail(&self, id: Uuid, viewer: &Client) -> Result<VehicleDetail, AppError> {
        let vehicle = self.get_for_viewer(id, viewer).await?;
        let mut warnings = Vec::new();

        let owner_name = match self.client_repo.find_by_id(vehicle.owner_id).await {
            Ok(Some(owner)) => owner.full_name(),
            Ok(None) => NOT_AVAILABLE.to_string(),
            Err(e) => {
                tracing::warn!("Detalhe do veículo {}: falha ao carregar o dono: {:?}", id, e);
                warnings.push("Não foi possível carregar o proprietário.".to_string());
                NOT_AVAILABLE.to_string()
            }
        };

        let invoices = match self.invoice_repo.list_by_vehicle(id).await {
            Ok(mut invoices) => {
                invoices.sort_by_key(|i| std::cmp::Reverse(sort_key(i.date.as_ref())));
                invoices
            }
            Err(e) => {
                tracing::warn!("Detalhe do veículo {}: falha ao carregar faturas: {:?}", id, e);
                warnings.push("Não foi possível carregar as faturas.".to_string());
                Vec::new()
            }
        };

        let maintenance = match self.maintenance_repo.list_by_vehicle(id).await {
            Ok(mut items) => {
                items.sort_by_key(|m| (m.due_date.is_none(), sort_key(m.due_date.as_ref())));
                items
            }
            Err(e) => {
                tracing::warn!("Detalhe do veículo {}: falha ao carregar manutenções: {:?}", id, e);
                warnings.push("Não foi possível carregar as manutenções.".to_string());
                Vec::new()
            }
        };

        Ok(VehicleDetail { vehicle, owner_name, invoices, maintenance, warnings })
    }

    // --- Imagem ---

    pub async fn upload_image(
        &self,
        id: Uuid,
        filename: &str,
        data: Vec<u8>,
    ) -> Result<Vehicle, AppError> {
        let mut vehicle = self.get_vehicle(id).await?;

        let path = vehicle_image_path(&vehicle.vin, vehicle.id, filename);
        self.blobs.upload(&path, data).await?;

        let previous = vehicle.image_path.replace(path.clone());
        vehicle.updated_at = Some(Timestamp::now());

        if let Err(e) = self.repo.save(&vehicle).await {
            // Mesmo caminho = o upload sobrescreveu o arquivo antigo; não há o que desfazer
            if previous.as_deref() != Some(path.as_str()) {
                discard_blob(self.blobs.as_ref(), &path).await;
            }
            return Err(e);
        }

        if let Some(old) = previous.filter(|old| *old != path) {
            discard_blob(self.blobs.as_ref(), &old).await;
        }
        Ok(vehicle)
    }

    pub async fn download_image(&self, vehicle: &Vehicle) -> Result<(String, Vec<u8>), AppError> {
        let path = vehicle.image_path.clone().ok_or(AppError::NotFound("Imagem"))?;
        let data = self.blobs.download(&path).await?;
        Ok((path, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{
        models::client::Role,
        storage::MemoryBlobStore,
        store::{
            faulty::{FailOn, FaultyDatastore},
            Collection, Datastore, MemoryDatastore,
        },
    };

    fn service_over(store: Arc<dyn Datastore>, blobs: MemoryBlobStore) -> VehicleService {
        VehicleService::new(
            VehicleRepository::new(store.clone()),
            ClientRepository::new(store.clone()),
            InvoiceRepository::new(store.clone()),
            MaintenanceRepository::new(store),
            Arc::new(blobs),
        )
    }

    fn owner(role: Role) -> Client {
        Client {
            id: Uuid::new_v4(),
            first_name: "Lucía".to_string(),
            last_name: "Martínez".to_string(),
            email: format!("{}@example.com", Uuid::new_v4()),
            phone: None,
            mobile: None,
            document: None,
            fiscal_address: None,
            postal_address: None,
            role,
            is_active: true,
            profile_image_path: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn payload(owner_id: Uuid) -> CreateVehiclePayload {
        CreateVehiclePayload {
            owner_id,
            make: "Seat".to_string(),
            model: "León".to_string(),
            year: 2018,
            license_plate: "1234 klm".to_string(),
            vin: "vsszzz5fzjr000001".to_string(),
            engine_code: None,
            mileage: Some(120_000),
            last_service_date: None,
        }
    }

    #[tokio::test]
    async fn create_requires_existing_owner() {
        let store: Arc<dyn Datastore> = Arc::new(MemoryDatastore::new());
        let service = service_over(store, MemoryBlobStore::new());
        let err = service.create_vehicle(payload(Uuid::new_v4())).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn other_owners_vehicle_looks_missing() {
        let store: Arc<dyn Datastore> = Arc::new(MemoryDatastore::new());
        let clients = ClientRepository::new(store.clone());
        let service = service_over(store, MemoryBlobStore::new());

        let lucia = owner(Role::Client);
        let pere = owner(Role::Client);
        let manager = owner(Role::Manager);
        clients.create(&lucia).await.unwrap();
        clients.create(&pere).await.unwrap();

        let car = service.create_vehicle(payload(lucia.id)).await.unwrap();
        assert_eq!(car.license_plate, "1234 KLM");

        assert!(service.get_for_viewer(car.id, &lucia).await.is_ok());
        assert!(service.get_for_viewer(car.id, &manager).await.is_ok());
        assert!(matches!(
            service.get_for_viewer(car.id, &pere).await,
            Err(AppError::NotFound("Veículo"))
        ));
    }

    #[tokio::test]
    async fn detail_degrades_per_section() {
        let memory = MemoryDatastore::new();
        let lucia = owner(Role::Client);
        ClientRepository::new(Arc::new(memory.clone())).create(&lucia).await.unwrap();

        let broken: Arc<dyn Datastore> = Arc::new(FaultyDatastore::new(
            memory.clone(),
            Collection::Invoices,
            FailOn::Query,
        ));
        let service = service_over(broken, MemoryBlobStore::new());
        let car = service.create_vehicle(payload(lucia.id)).await.unwrap();

        let detail = service.vehicle_detail(car.id, &lucia).await.unwrap();
        assert_eq!(detail.owner_name, "Lucía Martínez");
        assert!(detail.invoices.is_empty());
        assert!(detail.maintenance.is_empty());
        assert_eq!(detail.warnings.len(), 1);
    }

    #[tokio::test]
    async fn reupload_with_same_name_keeps_the_blob() {
        let store: Arc<dyn Datastore> = Arc::new(MemoryDatastore::new());
        let clients = ClientRepository::new(store.clone());
        let blobs = MemoryBlobStore::new();
        let service = service_over(store, blobs.clone());

        let lucia = owner(Role::Client);
        clients.create(&lucia).await.unwrap();
        let car = service.create_vehicle(payload(lucia.id)).await.unwrap();

        let first = service.upload_image(car.id, "frente.jpg", vec![1]).await.unwrap();
        let second = service.upload_image(car.id, "frente.jpg", vec![2]).await.unwrap();
        assert_eq!(first.image_path, second.image_path);

        let path = second.image_path.unwrap();
        assert_eq!(path, "vehicle_images/VSSZZZ5FZJR000001-frente.jpg");
        assert_eq!(blobs.download(&path).await.unwrap(), vec![2]);
    }

    #[tokio::test]
    async fn delete_removes_record_and_image() {
        let store: Arc<dyn Datastore> = Arc::new(MemoryDatastore::new());
        let clients = ClientRepository::new(store.clone());
        let blobs = MemoryBlobStore::new();
        let service = service_over(store, blobs.clone());

        let lucia = owner(Role::Client);
        clients.create(&lucia).await.unwrap();
        let car = service.create_vehicle(payload(lucia.id)).await.unwrap();
        service.upload_image(car.id, "frente.jpg", vec![1]).await.unwrap();

        service.delete_vehicle(car.id).await.unwrap();
        assert!(matches!(service.get_vehicle(car.id).await, Err(AppError::NotFound(_))));
        assert_eq!(blobs.len().await, 0);
    }

    #[tokio::test]
    async fn failed_save_discards_new_image_and_keeps_old() {
        let memory = MemoryDatastore::new();
        let blobs = MemoryBlobStore::new();
        let lucia = owner(Role::Client);
        ClientRepository::new(Arc::new(memory.clone())).create(&lucia).await.unwrap();

        let healthy = service_over(Arc::new(memory.clone()), blobs.clone());
        let car = healthy.create_vehicle(payload(lucia.id)).await.unwrap();
        let old_path = healthy
            .upload_image(car.id, "frente.jpg", vec![1])
            .await
            .unwrap()
            .image_path
            .unwrap();

        let broken = service_over(
            Arc::new(FaultyDatastore::new(memory, Collection::Vehicles, FailOn::Set)),
            blobs.clone(),
        );
        assert!(broken.upload_image(car.id, "traseira.jpg", vec![2]).await.is_err());

        assert!(blobs.contains(&old_path).await);
        assert!(!blobs.contains("vehicle_images/VSSZZZ5FZJR000001-traseira.jpg").await);
        assert_eq!(blobs.len().await, 1);
        let stored = healthy.get_vehicle(car.id).await.unwrap();
        assert_eq!(stored.image_path, Some(old_path));
    }

    #[tokio::test]
    async fn vin_belongs_to_a_single_vehicle() {
        let store: Arc<dyn Datastore> = Arc::new(MemoryDatastore::new());
        let clients = ClientRepository::new(store.clone());
        let service = service_over(store, MemoryBlobStore::new());

        let lucia = owner(Role::Client);
        clients.create(&lucia).await.unwrap();
        let first = service.create_vehicle(payload(lucia.id)).await.unwrap();

        // Mesmo VIN com outra caixa e espaços
        let mut twin = payload(lucia.id);
        twin.vin = "  VSSZZZ5FZJR000001 ".to_string();
        let err = service.create_vehicle(twin).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let mut other = payload(lucia.id);
        other.vin = "WVWZZZ1JZXW000002".to_string();
        let second = service.create_vehicle(other).await.unwrap();

        let steal = UpdateVehiclePayload {
            vin: Some(first.vin.clone()),
            ..Default::default()
        };
        let err = service.update_vehicle(second.id, steal).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // Reenviar o próprio VIN não conflita
        let same = UpdateVehiclePayload {
            vin: Some(first.vin.to_lowercase()),
            ..Default::default()
        };
        assert!(service.update_vehicle(first.id, same).await.is_ok());
    }
}
