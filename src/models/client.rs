// src/models/client.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::{patch::Patch, timestamp::Timestamp};

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Manager,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentType {
    Dni,
    Nie,
    Passport,
    Cif,
    Other,
}

// --- Structs auxiliares ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdentityDocument {
    pub doc_type: DocumentType,
    #[validate(length(min = 1, message = "O número do documento é obrigatório."))]
    #[schema(example = "12345678Z")]
    pub number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[validate(length(min = 1, message = "A rua é obrigatória."))]
    #[schema(example = "Calle Mayor, 12")]
    pub street: String,
    #[schema(example = "Valencia")]
    pub city: String,
    #[schema(example = "46001")]
    pub postal_code: String,
    pub province: Option<String>,
    pub country: Option<String>,
}

// --- Cliente (o registro) ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    #[schema(example = "Lucía")]
    pub first_name: String,
    #[schema(example = "Martínez")]
    pub last_name: String,
    #[schema(example = "lucia@example.com")]
    pub email: String,
    pub phone: Option<String>,
    #[schema(example = "+34 600 123 456")]
    pub mobile: Option<String>,
    pub document: Option<IdentityDocument>,
    pub fiscal_address: Option<Address>,
    pub postal_address: Option<Address>,
    pub role: Role,
    pub is_active: bool,
    pub profile_image_path: Option<String>,
    #[schema(value_type = Option<String>)]
    pub created_at: Option<Timestamp>,
    #[schema(value_type = Option<String>)]
    pub updated_at: Option<Timestamp>,
}

impl Client {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    pub fn is_manager(&self) -> bool {
        self.role == Role::Manager
    }

    /// Número usado para contato por WhatsApp: celular primeiro, depois fixo.
    pub fn contact_number(&self) -> Option<&str> {
        self.mobile
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .or_else(|| self.phone.as_deref().filter(|p| !p.trim().is_empty()))
    }
}

/// E-mails são comparados e gravados sem espaços e em minúsculas.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// --- Payloads ---

// Cadastro feito pela oficina (portal do gerente)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub first_name: String,
    #[validate(length(min = 1, message = "O sobrenome é obrigatório."))]
    pub last_name: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    #[validate(nested)]
    pub document: Option<IdentityDocument>,
    #[validate(nested)]
    pub fiscal_address: Option<Address>,
    #[validate(nested)]
    pub postal_address: Option<Address>,
    pub role: Option<Role>,
}

// Atualização parcial feita pelo gerente.
// Campos opcionais do registro usam Patch: ausente = mantém, null = limpa.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClientPayload {
    #[validate(length(min = 1, message = "O nome não pode ficar vazio."))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "O sobrenome não pode ficar vazio."))]
    pub last_name: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub phone: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub mobile: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<IdentityDocument>)]
    pub document: Patch<IdentityDocument>,
    #[serde(default)]
    #[schema(value_type = Option<Address>)]
    pub fiscal_address: Patch<Address>,
    #[serde(default)]
    #[schema(value_type = Option<Address>)]
    pub postal_address: Patch<Address>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

impl UpdateClientPayload {
    /// Verdadeiro quando a alteração tira do gerente o acesso à área de gestão.
    pub fn revokes_manager_access(&self) -> bool {
        self.is_active == Some(false) || self.role.is_some_and(|role| role != Role::Manager)
    }
}

// O próprio cliente editando o perfil: sem papel, sem e-mail, sem ativação.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfilePayload {
    #[validate(length(min = 1, message = "O nome não pode ficar vazio."))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "O sobrenome não pode ficar vazio."))]
    pub last_name: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub phone: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub mobile: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<IdentityDocument>)]
    pub document: Patch<IdentityDocument>,
    #[serde(default)]
    #[schema(value_type = Option<Address>)]
    pub fiscal_address: Patch<Address>,
    #[serde(default)]
    #[schema(value_type = Option<Address>)]
    pub postal_address: Patch<Address>,
}

impl From<UpdateProfilePayload> for UpdateClientPayload {
    fn from(p: UpdateProfilePayload) -> Self {
        UpdateClientPayload {
            first_name: p.first_name,
            last_name: p.last_name,
            phone: p.phone,
            mobile: p.mobile,
            document: p.document,
            fiscal_address: p.fiscal_address,
            postal_address: p.postal_address,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_updates_that_lock_out_a_manager() {
        assert!(!UpdateClientPayload::default().revokes_manager_access());
        let rename = UpdateClientPayload { first_name: Some("Ana".into()), ..Default::default() };
        assert!(!rename.revokes_manager_access());
        let keep = UpdateClientPayload { role: Some(Role::Manager), is_active: Some(true), ..Default::default() };
        assert!(!keep.revokes_manager_access());

        let demote = UpdateClientPayload { role: Some(Role::Client), ..Default::default() };
        assert!(demote.revokes_manager_access());
        let disable = UpdateClientPayload { is_active: Some(false), ..Default::default() };
        assert!(disable.revokes_manager_access());
    }
}
