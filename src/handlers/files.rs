// src/handlers/files.rs

// Upload (multipart) e download de arquivos, comum às rotas de imagem e PDF.

use axum::{
    extract::Multipart,
    http::header,
    response::{IntoResponse, Response},
};
use utoipa::ToSchema;

use crate::{common::error::AppError, storage::paths::content_type_for};

/// Tamanho máximo aceito nas rotas de upload.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Pdf,
}

impl FileKind {
    fn accepts(&self, content_type: &str) -> bool {
        match self {
            FileKind::Image => content_type.starts_with("image/"),
            FileKind::Pdf => content_type == "application/pdf",
        }
    }
}

// Só para a documentação: o corpo multipart com o campo `file`.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

pub struct Upload {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Lê o campo `file` do formulário. O tipo é decidido pela extensão.
pub async fn read_upload(mut multipart: Multipart, kind: FileKind) -> Result<Upload, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("arquivo").to_string();
        if !kind.accepts(content_type_for(&filename)) {
            return Err(AppError::field("file", "invalid_type", "Tipo de arquivo não suportado."));
        }

        let data = field.bytes().await?.to_vec();
        if data.is_empty() {
            return Err(AppError::field("file", "empty", "O arquivo está vazio."));
        }
        return Ok(Upload { filename, data });
    }

    Err(AppError::field("file", "required", "Envie o arquivo no campo 'file'."))
}

pub fn file_response(path: &str, data: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, content_type_for(path))], data).into_response()
}
