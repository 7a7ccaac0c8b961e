// src/models/invoice.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::{
    patch::Patch,
    timestamp::{validate_input_date, Timestamp},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
    Overdue,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceServiceItem {
    // Referência opcional ao catálogo de serviços
    pub service_id: Option<Uuid>,
    #[schema(example = "Troca de óleo e filtro")]
    pub description: String,
    #[schema(value_type = f64, example = 1)]
    pub quantity: Decimal,
    #[schema(value_type = f64, example = 45.5)]
    pub unit_price: Decimal,
    #[schema(value_type = f64, example = 45.5)]
    pub line_total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    // Desnormalizado a partir do dono do veículo no momento da emissão
    pub client_id: Uuid,
    #[schema(example = "F-2024-0001")]
    pub invoice_number: String,
    #[schema(value_type = Option<String>)]
    pub date: Option<Timestamp>,
    pub items: Vec<InvoiceServiceItem>,
    #[schema(value_type = f64)]
    pub subtotal: Decimal,
    #[schema(value_type = f64)]
    pub vat: Decimal,
    #[schema(value_type = f64)]
    pub total: Decimal,
    pub status: InvoiceStatus,
    pub notes: Option<String>,
    pub pdf_path: Option<String>,
    #[schema(value_type = Option<String>)]
    pub created_at: Option<Timestamp>,
    #[schema(value_type = Option<String>)]
    pub updated_at: Option<Timestamp>,
}

// --- Payloads ---

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineItemPayload {
    pub service_id: Option<Uuid>,
    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: String,
    #[schema(value_type = f64, example = 2)]
    pub quantity: Decimal,
    #[schema(value_type = f64, example = 25.555)]
    pub unit_price: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoicePayload {
    pub vehicle_id: Uuid,
    #[validate(length(min = 1, message = "O número da fatura é obrigatório."))]
    pub invoice_number: String,
    #[validate(custom(function = "validate_input_date"))]
    #[schema(value_type = Option<String>)]
    pub date: Option<Timestamp>,
    #[validate(length(min = 1, message = "A fatura precisa de pelo menos um item."), nested)]
    pub items: Vec<LineItemPayload>,
    pub status: Option<InvoiceStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvoicePayload {
    #[validate(length(min = 1, message = "O número da fatura não pode ficar vazio."))]
    pub invoice_number: Option<String>,
    #[validate(custom(function = "validate_input_date"))]
    #[schema(value_type = Option<String>)]
    pub date: Option<Timestamp>,
    #[validate(length(min = 1, message = "A fatura precisa de pelo menos um item."), nested)]
    pub items: Option<Vec<LineItemPayload>>,
    pub status: Option<InvoiceStatus>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub notes: Patch<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvoiceStatusPayload {
    pub status: InvoiceStatus,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WhatsappLinkResponse {
    #[schema(example = "https://wa.me/34600123456?text=Ol%C3%A1")]
    pub url: String,
}
