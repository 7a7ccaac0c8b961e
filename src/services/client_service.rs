// src/services/client_service.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::{error::AppError, timestamp::Timestamp},
    db::{ClientRepository, VehicleRepository},
    models::client::{
        normalize_email, Client, CreateClientPayload, Role, UpdateClientPayload,
        UpdateProfilePayload,
    },
    storage::{discard_blob, paths::profile_image_path, BlobStore},
};

#[derive(Clone)]
pub struct ClientService {
    repo: ClientRepository,
    vehicle_repo: VehicleRepository,
    blobs: Arc<dyn BlobStore>,
}

impl ClientService {
    pub fn new(
        repo: ClientRepository,
        vehicle_repo: VehicleRepository,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self { repo, vehicle_repo, blobs }
    }

    // =========================================================================
    //  CADASTRO (portal do gerente)
    // =========================================================================

    pub async fn create_client(&self, payload: CreateClientPayload) -> Result<Client, AppError> {
        let email = normalize_email(&payload.email);
        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::EmailAlreadyExists);
        }

        let now = Timestamp::now();
        let client = Client {
            id: Uuid::new_v4(),
            first_name: payload.first_name.trim().to_string(),
            last_name: payload.last_name.trim().to_string(),
            email,
            phone: payload.phone,
            mobile: payload.mobile,
            document: payload.document,
            fiscal_address: payload.fiscal_address,
            postal_address: payload.postal_address,
            role: payload.role.unwrap_or(Role::Client),
            is_active: true,
            profile_image_path: None,
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };

        self.repo.create(&client).await?;
        tracing::info!("Cliente {} cadastrado", client.id);
        Ok(client)
    }

    pub async fn get_client(&self, id: Uuid) -> Result<Client, AppError> {
        self.repo.find_by_id(id).await?.ok_or(AppError::NotFound("Cliente"))
    }

    /// Todos os clientes, por sobrenome e nome.
    pub async fn list_clients(&self) -> Result<Vec<Client>, AppError> {
        let mut clients = self.repo.list_all().await?;
        clients.sort_by(|a, b| {
            a.last_name
                .to_lowercase()
                .cmp(&b.last_name.to_lowercase())
                .then_with(|| a.first_name.to_lowercase().cmp(&b.first_name.to_lowercase()))
        });
        Ok(clients)
    }

    pub async fn update_client(
        &self,
        id: Uuid,
        payload: UpdateClientPayload,
    ) -> Result<Client, AppError> {
        let mut client = self.get_client(id).await?;

        if let Some(email) = payload.email {
            let email = normalize_email(&email);
            if email != client.email {
                if self.repo.find_by_email(&email).await?.is_some() {
                    return Err(AppError::EmailAlreadyExists);
                }
                client.email = email;
            }
        }
        if let Some(first_name) = payload.first_name {
            client.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = payload.last_name {
            client.last_name = last_name.trim().to_string();
        }
        payload.phone.apply(&mut client.phone);
        payload.mobile.apply(&mut client.mobile);
        payload.document.apply(&mut client.document);
        payload.fiscal_address.apply(&mut client.fiscal_address);
        payload.postal_address.apply(&mut client.postal_address);
        if let Some(role) = payload.role {
            client.role = role;
        }
        if let Some(is_active) = payload.is_active {
            client.is_active = is_active;
        }

        client.updated_at = Some(Timestamp::now());
        self.repo.save(&client).await?;
        Ok(client)
    }

    /// O próprio cliente editando o perfil.
    pub async fn update_profile(
        &self,
        id: Uuid,
        payload: UpdateProfilePayload,
    ) -> Result<Client, AppError> {
        self.update_client(id, payload.into()).await
    }

    /// Desativação/reativação (exclusão lógica). Veículos, faturas e
    /// manutenções do cliente não são tocados.
    pub async fn set_active(&self, id: Uuid, is_active: bool) -> Result<Client, AppError> {
        let mut client = self.get_client(id).await?;
        if client.is_active == is_active {
            return Ok(client);
        }
        client.is_active = is_active;
        client.updated_at = Some(Timestamp::now());
        self.repo.save(&client).await?;

        tracing::info!(
            "Cliente {} {}",
            client.id,
            if is_active { "reativado" } else { "desativado" }
        );
        Ok(client)
    }

    /// Exclusão definitiva: primeiro o registro, depois a foto.
    /// Clientes com veículos devem ser desativados, não excluídos.
    pub async fn delete_client(&self, id: Uuid) -> Result<(), AppError> {
        let client = self.get_client(id).await?;

        if !self.vehicle_repo.list_by_owner(id).await?.is_empty() {
            return Err(AppError::Conflict(
                "Cliente possui veículos cadastrados; desative-o em vez de excluir.".to_string(),
            ));
        }

        self.repo.delete(id).await?;
        if let Some(path) = &client.profile_image_path {
            discard_blob(self.blobs.as_ref(), path).await;
        }
        Ok(())
    }

    // =========================================================================
    //  FOTO DE PERFIL
    // =========================================================================

    /// Sobe a nova foto, grava o registro e só então apaga a anterior.
    pub async fn upload_profile_image(
        &self,
        id: Uuid,
        filename: &str,
        data: Vec<u8>,
    ) -> Result<Client, AppError> {
        let mut client = self.get_client(id).await?;

        let path = profile_image_path(client.id, Utc::now().timestamp_millis(), filename);
        self.blobs.upload(&path, data).await?;

        let previous = client.profile_image_path.replace(path.clone());
        client.updated_at = Some(Timestamp::now());

        if let Err(e) = self.repo.save(&client).await {
            if previous.as_deref() != Some(path.as_str()) {
                discard_blob(self.blobs.as_ref(), &path).await;
            }
            return Err(e);
        }

        if let Some(old) = previous.filter(|old| *old != path) {
            discard_blob(self.blobs.as_ref(), &old).await;
        }
        Ok(client)
    }

    pub async fn download_profile_image(&self, client: &Client) -> Result<(String, Vec<u8>), AppError> {
        let path = client
            .profile_image_path
            .clone()
            .ok_or(AppError::NotFound("Foto de perfil"))?;
        let data = self.blobs.download(&path).await?;
        Ok((path, data))
    }
}
