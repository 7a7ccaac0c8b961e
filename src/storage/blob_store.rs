// src/storage/blob_store.rs

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::RwLock;

use crate::common::error::AppError;

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn upload(&self, path: &str, data: Vec<u8>) -> Result<(), AppError>;
    async fn download(&self, path: &str) -> Result<Vec<u8>, AppError>;
    /// Apagar um blob inexistente não é erro.
    async fn delete(&self, path: &str) -> Result<(), AppError>;
}

// Rejeita caminhos absolutos e `..` antes de tocar no disco.
fn relative_path(path: &str) -> Result<PathBuf, AppError> {
    let candidate = Path::new(path);
    let safe = !path.is_empty()
        && candidate
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    if !safe {
        return Err(AppError::field("path", "invalid_path", "Caminho de arquivo inválido."));
    }
    Ok(candidate.to_path_buf())
}

pub struct LocalBlobStore {
    base_path: PathBuf,
}

impl LocalBlobStore {
    pub async fn new(base_path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path).await?;
        }
        Ok(Self { base_path })
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn upload(&self, path: &str, data: Vec<u8>) -> Result<(), AppError> {
        let full = self.base_path.join(relative_path(path)?);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(full, data).await?;
        Ok(())
    }

    async fn download(&self, path: &str) -> Result<Vec<u8>, AppError> {
        let full = self.base_path.join(relative_path(path)?);
        match fs::read(full).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AppError::NotFound("Arquivo")),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, path: &str) -> Result<(), AppError> {
        let full = self.base_path.join(relative_path(path)?);
        match fs::remove_file(full).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Armazenamento em memória para testes.
#[derive(Clone, Default)]
pub struct MemoryBlobStore {
    blobs: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, path: &str) -> bool {
        self.blobs.read().await.contains_key(path)
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(&self, path: &str, data: Vec<u8>) -> Result<(), AppError> {
        relative_path(path)?;
        self.blobs.write().await.insert(path.to_string(), data);
        Ok(())
    }

    async fn download(&self, path: &str) -> Result<Vec<u8>, AppError> {
        self.blobs
            .read()
            .await
            .get(path)
            .cloned()
            .ok_or(AppError::NotFound("Arquivo"))
    }

    async fn delete(&self, path: &str) -> Result<(), AppError> {
        self.blobs.write().await.remove(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traversal_is_rejected() {
        assert!(relative_path("../etc/passwd").is_err());
        assert!(relative_path("/etc/passwd").is_err());
        assert!(relative_path("").is_err());
        assert!(relative_path("vehicle_images/abc-foto.jpg").is_ok());
    }

    #[tokio::test]
    async fn local_store_round_trip_and_idempotent_delete() {
        let dir = std::env::temp_dir().join(format!("oficina-blobs-{}", uuid::Uuid::new_v4()));
        let store = LocalBlobStore::new(&dir).await.unwrap();

        store.upload("invoice_pdfs/v1/F-1-fatura.pdf", b"%PDF".to_vec()).await.unwrap();
        let data = store.download("invoice_pdfs/v1/F-1-fatura.pdf").await.unwrap();
        assert_eq!(data, b"%PDF");

        store.delete("invoice_pdfs/v1/F-1-fatura.pdf").await.unwrap();
        store.delete("invoice_pdfs/v1/F-1-fatura.pdf").await.unwrap();
        assert!(matches!(
            store.download("invoice_pdfs/v1/F-1-fatura.pdf").await,
            Err(AppError::NotFound(_))
        ));

        let _ = std::fs::remove_dir_all(dir);
    }
}
