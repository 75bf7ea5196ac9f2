use async_trait::async_trait;

use super::{Document, DocumentData, DocumentId, DocumentList, Filters, Result};

/// Document storage addressed by collection name.
///
/// Implementations are expected to be remote: every call may be slow or fail.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Lists the documents in `collection` matching `filters`.
    async fn list_documents(&self, collection: &str, filters: &Filters) -> Result<DocumentList>;

    /// Gets a document by its ID, failing with `NotFound` when absent.
    async fn get_document(&self, collection: &str, id: &str) -> Result<Document>;

    /// Creates a document and returns it as stored.
    async fn create_document(
        &self,
        collection: &str,
        id: DocumentId,
        data: DocumentData,
    ) -> Result<Document>;

    /// Merges `patch` into an existing document and returns the result.
    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        patch: DocumentData,
    ) -> Result<Document>;

    /// Deletes a document by its ID.
    async fn delete_document(&self, collection: &str, id: &str) -> Result<()>;
}
