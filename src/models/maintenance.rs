// src/models/maintenance.rs

use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::{
    patch::Patch,
    timestamp::{validate_input_date, validate_input_date_patch, Timestamp},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MaintenanceStatus {
    Upcoming,
    Due,
    Completed,
}

impl MaintenanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceStatus::Upcoming => "upcoming",
            MaintenanceStatus::Due => "due",
            MaintenanceStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceItem {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub client_id: Uuid,
    #[schema(example = "Revisão dos 120.000 km")]
    pub description: String,
    #[schema(example = json!(["Trocar correia de distribuição", "Trocar bomba de água"]))]
    pub tasks: Vec<String>,
    #[schema(value_type = Option<String>)]
    pub due_date: Option<Timestamp>,
    pub due_mileage: Option<u32>,
    pub status: MaintenanceStatus,
    pub notes: Option<String>,
    #[schema(value_type = Option<String>)]
    pub created_at: Option<Timestamp>,
    #[schema(value_type = Option<String>)]
    pub updated_at: Option<Timestamp>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaintenancePayload {
    pub vehicle_id: Uuid,
    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: String,
    #[serde(default)]
    pub tasks: Vec<String>,
    #[validate(custom(function = "validate_input_date"))]
    #[schema(value_type = Option<String>)]
    pub due_date: Option<Timestamp>,
    pub due_mileage: Option<u32>,
    pub status: Option<MaintenanceStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMaintenancePayload {
    #[validate(length(min = 1, message = "A descrição não pode ficar vazia."))]
    pub description: Option<String>,
    pub tasks: Option<Vec<String>>,
    #[serde(default)]
    #[validate(custom(function = "validate_input_date_patch"))]
    #[schema(value_type = Option<String>)]
    pub due_date: Patch<Timestamp>,
    #[serde(default)]
    #[schema(value_type = Option<u32>)]
    pub due_mileage: Patch<u32>,
    pub status: Option<MaintenanceStatus>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub notes: Patch<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMaintenanceStatusPayload {
    pub status: MaintenanceStatus,
}
