//! [`DocumentRepository`] over the documents API.

use async_trait::async_trait;

use checkpost_core::storage::{
    Document, DocumentData, DocumentId, DocumentList, DocumentRepository, Filters, Result,
};

use super::AppwriteClient;

#[async_trait]
impl DocumentRepository for AppwriteClient {
    async fn list_documents(&self, collection: &str, filters: &Filters) -> Result<DocumentList> {
        self.list(collection, filters)
            .await
            .map_err(|err| err.into_repository_error(collection, ""))
    }

    async fn get_document(&self, collection: &str, id: &str) -> Result<Document> {
        self.get(collection, id)
            .await
            .map_err(|err| err.into_repository_error(collection, id))
    }

    async fn create_document(
        &self,
        collection: &str,
        id: DocumentId,
        data: DocumentData,
    ) -> Result<Document> {
        let label = match &id {
            DocumentId::Auto => "",
            DocumentId::Custom(id) => id.as_str(),
        };
        let document = self
            .create(collection, &id, &data)
            .await
            .map_err(|err| err.into_repository_error(collection, label))?;
        tracing::debug!(collection, id = %document.id, "Created document");
        Ok(document)
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        patch: DocumentData,
    ) -> Result<Document> {
        self.update(collection, id, &patch)
            .await
            .map_err(|err| err.into_repository_error(collection, id))
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<()> {
        self.delete(collection, id)
            .await
            .map_err(|err| err.into_repository_error(collection, id))
    }
}
