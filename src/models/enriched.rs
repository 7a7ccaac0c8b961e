// src/models/enriched.rs

// Registros "decorados" para exibição em tabela: o registro original
// achatado + nomes legíveis resolvidos por chave.

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{invoice::Invoice, maintenance::MaintenanceItem, vehicle::Vehicle};

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedInvoice {
    #[serde(flatten)]
    pub invoice: Invoice,
    #[schema(example = "Lucía Martínez")]
    pub client_name: String,
    #[schema(example = "Seat León (1234 KLM)")]
    pub vehicle_label: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedVehicle {
    #[serde(flatten)]
    pub vehicle: Vehicle,
    pub owner_name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedMaintenance {
    #[serde(flatten)]
    pub item: MaintenanceItem,
    pub client_name: String,
    pub vehicle_label: String,
}
