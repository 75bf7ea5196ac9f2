//! Document API operations.

use serde::Serialize;

use checkpost_core::storage::{Document, DocumentData, DocumentId, DocumentList, Filters};

use super::AppwriteClient;
use crate::error::Result;
use crate::queries::{encode_filters, QUERY_PARAM};

/// Id placeholder that asks the backend to generate one.
const UNIQUE_ID: &str = "unique()";

/// Request for creating a document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateDocumentRequest<'a> {
    document_id: &'a str,
    data: &'a DocumentData,
}

/// Request for patching a document.
#[derive(Debug, Serialize)]
struct UpdateDocumentRequest<'a> {
    data: &'a DocumentData,
}

impl AppwriteClient {
    /// List documents matching `filters`.
    pub(super) async fn list(&self, collection: &str, filters: &Filters) -> Result<DocumentList> {
        let queries: Vec<(&str, String)> = encode_filters(filters)
            .into_iter()
            .map(|query| (QUERY_PARAM, query))
            .collect();
        tracing::debug!(collection, queries = queries.len(), "Listing documents");

        let response = self
            .client
            .get(self.documents_url(collection, None)?)
            .query(&queries)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Get document by ID.
    pub(super) async fn get(&self, collection: &str, id: &str) -> Result<Document> {
        let response = self
            .client
            .get(self.documents_url(collection, Some(id))?)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Create a new document.
    pub(super) async fn create(
        &self,
        collection: &str,
        id: &DocumentId,
        data: &DocumentData,
    ) -> Result<Document> {
        let document_id = match id {
            DocumentId::Auto => UNIQUE_ID,
            DocumentId::Custom(id) => id.as_str(),
        };
        let response = self
            .client
            .post(self.documents_url(collection, None)?)
            .json(&CreateDocumentRequest { document_id, data })
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Update a document. Only the attributes in `patch` change.
    pub(super) async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: &DocumentData,
    ) -> Result<Document> {
        let response = self
            .client
            .patch(self.documents_url(collection, Some(id))?)
            .json(&UpdateDocumentRequest { data: patch })
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Delete document by ID.
    pub(super) async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.documents_url(collection, Some(id))?)
            .send()
            .await?;
        self.handle_delete_response(response).await
    }
}
