pub mod blob_store;
pub mod paths;

pub use blob_store::{BlobStore, LocalBlobStore, MemoryBlobStore};

/// Remoção de melhor esforço: falhas ficam só no log (blob órfão).
pub async fn discard_blob(blobs: &dyn BlobStore, path: &str) {
    if let Err(e) = blobs.delete(path).await {
        tracing::warn!("Blob órfão em '{}': {:?}", path, e);
    }
}
