// src/models/vehicle.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::{
    patch::Patch,
    timestamp::{validate_input_date, validate_input_date_patch, Timestamp},
};
use crate::models::{invoice::Invoice, maintenance::MaintenanceItem};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Uuid,
    pub owner_id: Uuid,
    #[schema(example = "Seat")]
    pub make: String,
    #[schema(example = "León")]
    pub model: String,
    #[schema(example = 2018)]
    pub year: i32,
    #[schema(example = "1234 KLM")]
    pub license_plate: String,
    #[schema(example = "VSSZZZ5FZJR000001")]
    pub vin: String,
    pub engine_code: Option<String>,
    #[schema(example = 120000)]
    pub mileage: Option<u32>,
    #[schema(value_type = Option<String>)]
    pub last_service_date: Option<Timestamp>,
    pub image_path: Option<String>,
    #[schema(value_type = Option<String>)]
    pub created_at: Option<Timestamp>,
    #[schema(value_type = Option<String>)]
    pub updated_at: Option<Timestamp>,
}

impl Vehicle {
    /// Ex: "Seat León (1234 KLM)"
    pub fn descriptor(&self) -> String {
        format!("{} {} ({})", self.make.trim(), self.model.trim(), self.license_plate.trim())
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehiclePayload {
    pub owner_id: Uuid,
    #[validate(length(min = 1, message = "A marca é obrigatória."))]
    pub make: String,
    #[validate(length(min = 1, message = "O modelo é obrigatório."))]
    pub model: String,
    #[validate(range(min = 1900, max = 2100, message = "Ano inválido."))]
    pub year: i32,
    #[validate(length(min = 1, message = "A matrícula é obrigatória."))]
    pub license_plate: String,
    #[validate(length(min = 1, max = 17, message = "O VIN deve ter até 17 caracteres."))]
    pub vin: String,
    pub engine_code: Option<String>,
    pub mileage: Option<u32>,
    #[validate(custom(function = "validate_input_date"))]
    #[schema(value_type = Option<String>)]
    pub last_service_date: Option<Timestamp>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehiclePayload {
    pub owner_id: Option<Uuid>,
    #[validate(length(min = 1, message = "A marca não pode ficar vazia."))]
    pub make: Option<String>,
    #[validate(length(min = 1, message = "O modelo não pode ficar vazio."))]
    pub model: Option<String>,
    #[validate(range(min = 1900, max = 2100, message = "Ano inválido."))]
    pub year: Option<i32>,
    #[validate(length(min = 1, message = "A matrícula não pode ficar vazia."))]
    pub license_plate: Option<String>,
    #[validate(length(min = 1, max = 17, message = "O VIN deve ter até 17 caracteres."))]
    pub vin: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub engine_code: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<u32>)]
    pub mileage: Patch<u32>,
    #[serde(default)]
    #[validate(custom(function = "validate_input_date_patch"))]
    #[schema(value_type = Option<String>)]
    pub last_service_date: Patch<Timestamp>,
}

/// Visão de detalhe do veículo (portal do cliente e do gerente).
///
/// Cada seção além do veículo é carregada de forma independente; se uma
/// falhar, ela fica vazia e um aviso entra em `warnings`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDetail {
    pub vehicle: Vehicle,
    #[schema(example = "Lucía Martínez")]
    pub owner_name: String,
    pub invoices: Vec<Invoice>,
    pub maintenance: Vec<MaintenanceItem>,
    pub warnings: Vec<String>,
}
