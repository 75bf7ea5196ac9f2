//! Reading every match of a query one page at a time.

use super::{Document, DocumentRepository, Filters, Result};

/// Lists every document in `collection` matching `filters`, requesting
/// `page_size` documents per call.
///
/// Any `offset` or `limit` already on `filters` is replaced. Paging stops at
/// the first short page or once the backend's reported total is reached.
/// Callers should order `filters` so pages do not shift between calls.
pub async fn list_all_documents<R>(
    repository: &R,
    collection: &str,
    filters: &Filters,
    page_size: usize,
) -> Result<Vec<Document>>
where
    R: DocumentRepository + ?Sized,
{
    let page_size = page_size.max(1);
    let mut documents = Vec::new();
    loop {
        let page = filters
            .clone()
            .offset(documents.len())
            .limit(page_size);
        let list = repository.list_documents(collection, &page).await?;
        let fetched = list.documents.len();
        documents.extend(list.documents);

        if fetched < page_size || documents.len() as u64 >= list.total {
            break;
        }
        tracing::trace!(collection, fetched = documents.len(), total = list.total, "Fetching next page");
    }
    Ok(documents)
}
