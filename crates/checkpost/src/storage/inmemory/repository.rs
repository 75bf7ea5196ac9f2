//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use checkpost_core::storage::{
    Document, DocumentData, DocumentId, DocumentList, DocumentRepository, Filters,
    RepositoryError, Result,
};

/// In-memory document storage for testing and development.
///
/// Collections are created on first write and keep insertion order. Data is
/// not persisted and is lost when the last clone is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    collections: Arc<RwLock<HashMap<String, Vec<Document>>>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts documents as-is, replacing any with the same id.
    pub async fn seed(&self, collection: &str, documents: impl IntoIterator<Item = Document>) {
        let mut collections = self.collections.write().await;
        let stored = collections.entry(collection.to_string()).or_default();
        for document in documents {
            match stored.iter_mut().find(|d| d.id == document.id) {
                Some(existing) => *existing = document,
                None => stored.push(document),
            }
        }
    }

    /// Number of documents in `collection`.
    pub async fn count(&self, collection: &str) -> usize {
        let collections = self.collections.read().await;
        collections.get(collection).map_or(0, Vec::len)
    }
}

#[async_trait]
impl DocumentRepository for InMemoryRepository {
    async fn list_documents(&self, collection: &str, filters: &Filters) -> Result<DocumentList> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|documents| filters.apply_page(documents.iter().cloned()))
            .unwrap_or_default())
    }

    async fn get_document(&self, collection: &str, id: &str) -> Result<Document> {
        let collections = self.collections.read().await;
        collections
            .get(collection)
            .and_then(|documents| documents.iter().find(|d| d.id == id))
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(collection, id))
    }

    async fn create_document(
        &self,
        collection: &str,
        id: DocumentId,
        data: DocumentData,
    ) -> Result<Document> {
        let id = match id {
            DocumentId::Auto => Uuid::new_v4().simple().to_string(),
            DocumentId::Custom(id) => id,
        };

        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_string()).or_default();
        if documents.iter().any(|d| d.id == id) {
            return Err(RepositoryError::already_exists(collection, id));
        }

        let mut document = Document::new(id, DocumentData::new());
        document.merge(data);
        documents.push(document.clone());
        Ok(document)
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        patch: DocumentData,
    ) -> Result<Document> {
        let mut collections = self.collections.write().await;
        let document = collections
            .get_mut(collection)
            .and_then(|documents| documents.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| RepositoryError::not_found(collection, id))?;
        document.merge(patch);
        Ok(document.clone())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        let documents = collections
            .get_mut(collection)
            .ok_or_else(|| RepositoryError::not_found(collection, id))?;
        let before = documents.len();
        documents.retain(|d| d.id != id);
        if documents.len() == before {
            return Err(RepositoryError::not_found(collection, id));
        }
        Ok(())
    }
}
