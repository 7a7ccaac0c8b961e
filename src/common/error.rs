// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Validação (antes de qualquer chamada ao backend) ---
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Item {index} da fatura inválido: {message}")]
    InvalidLineItem {
        index: usize,
        field: &'static str,
        message: String,
    },

    // --- Autenticação / Autorização ---
    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Conta pendente ou desativada")]
    AccountPending,

    #[error("Acesso negado")]
    Forbidden,

    // Também usado quando o registro existe mas não pertence a quem pede
    #[error("{0} não encontrado")]
    NotFound(&'static str),

    #[error("Conflito: {0}")]
    Conflict(String),

    // --- Backend ---
    #[error("Consulta excede o limite de {limit} ids (recebido {requested})")]
    QueryTooLarge { limit: usize, requested: usize },

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro de armazenamento: {0}")]
    StorageError(#[from] std::io::Error),

    #[error("Erro de serialização: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Upload inválido: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Erro ao gerar PDF: {0}")]
    PdfError(String),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    /// Atalho para erros de validação de um único campo.
    pub fn field(field: &'static str, code: &'static str, message: &str) -> Self {
        let mut errors = validator::ValidationErrors::new();
        let mut err = validator::ValidationError::new(code);
        err.message = Some(message.to_string().into());
        errors.add(field, err);
        AppError::ValidationError(errors)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidLineItem { index, field, message } => {
                let mut details = serde_json::Map::new();
                details.insert(format!("items[{index}].{field}"), json!([message]));
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::Multipart(ref e) => {
                let body = Json(json!({ "error": format!("Upload inválido: {}", e) }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::NotFound(entity) => {
                let body = Json(json!({ "error": format!("{} não encontrado.", entity) }));
                return (StatusCode::NOT_FOUND, body).into_response();
            }
            AppError::Conflict(ref msg) => {
                let body = Json(json!({ "error": msg }));
                return (StatusCode::CONFLICT, body).into_response();
            }
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "Este e-mail já está em uso."),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos."),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "Token de autenticação inválido ou ausente."),
            AppError::AccountPending => (
                StatusCode::FORBIDDEN,
                "A conta não está ativa. Entre em contato com a oficina.",
            ),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Você não tem acesso a este recurso."),

            // Todos os outros erros viram 500. O `tracing` loga a mensagem detalhada.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
