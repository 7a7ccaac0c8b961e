// src/models/catalog.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::{patch::Patch, timestamp::Timestamp};

// Serviço reutilizável: fonte de opções para itens de fatura e manutenção.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCatalogItem {
    pub id: Uuid,
    #[schema(example = "Troca de óleo")]
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = f64, example = 45.0)]
    pub default_unit_price: Decimal,
    #[schema(example = "Motor")]
    pub category: String,
    pub is_active: bool,
    #[schema(value_type = Option<String>)]
    pub created_at: Option<Timestamp>,
    #[schema(value_type = Option<String>)]
    pub updated_at: Option<Timestamp>,
}

fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() && !val.is_zero() {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCatalogItemPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub description: Option<String>,
    #[validate(custom(function = "validate_not_negative"))]
    #[schema(value_type = f64)]
    pub default_unit_price: Decimal,
    #[validate(length(min = 1, message = "A categoria é obrigatória."))]
    pub category: String,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCatalogItemPayload {
    #[validate(length(min = 1, message = "O nome não pode ficar vazio."))]
    pub name: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub description: Patch<String>,
    #[validate(custom(function = "validate_not_negative"))]
    #[schema(value_type = Option<f64>)]
    pub default_unit_price: Option<Decimal>,
    #[validate(length(min = 1, message = "A categoria não pode ficar vazia."))]
    pub category: Option<String>,
    pub is_active: Option<bool>,
}
