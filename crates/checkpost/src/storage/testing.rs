//! Counting, fault-injecting repository for store and service tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use checkpost_core::storage::{
    Document, DocumentData, DocumentId, DocumentList, DocumentRepository, Filters,
    RepositoryError, Result,
};

use super::inmemory::InMemoryRepository;

/// Wraps [`InMemoryRepository`], counting calls and injecting failures and
/// latency into list requests. Also records the peak number of list requests
/// in flight at once.
#[derive(Debug, Default)]
pub struct FakeRepository {
    inner: InMemoryRepository,
    list_calls: Mutex<HashMap<String, usize>>,
    create_calls: Mutex<HashMap<String, usize>>,
    failing_collections: Mutex<Vec<String>>,
    failing_equals: Mutex<Vec<(String, Value)>>,
    list_delay: Mutex<Duration>,
    range_delays: Mutex<HashMap<String, Duration>>,
    missed_gets: Mutex<usize>,
    get_calls: Mutex<usize>,
    in_flight: Mutex<usize>,
    max_in_flight: Mutex<usize>,
}

impl FakeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner(&self) -> &InMemoryRepository {
        &self.inner
    }

    /// Makes every list request on `collection` fail.
    pub fn fail_collection(&self, collection: &str) {
        self.failing_collections
            .lock()
            .unwrap()
            .push(collection.to_string());
    }

    /// Stops failing list requests on `collection`.
    pub fn heal_collection(&self, collection: &str) {
        self.failing_collections
            .lock()
            .unwrap()
            .retain(|c| c != collection);
    }

    /// Makes list requests constrained by `field == value` fail.
    pub fn fail_when_equal(&self, field: &str, value: impl Into<Value>) {
        self.failing_equals
            .lock()
            .unwrap()
            .push((field.to_string(), value.into()));
    }

    /// Delays every list request.
    pub fn set_list_delay(&self, delay: Duration) {
        *self.list_delay.lock().unwrap() = delay;
    }

    /// Delays list requests whose range starts at `start_iso`.
    pub fn delay_range(&self, start_iso: &str, delay: Duration) {
        self.range_delays
            .lock()
            .unwrap()
            .insert(start_iso.to_string(), delay);
    }

    /// Makes the next `count` get requests report the document as missing.
    pub fn miss_next_gets(&self, count: usize) {
        *self.missed_gets.lock().unwrap() = count;
    }

    pub fn get_calls(&self) -> usize {
        *self.get_calls.lock().unwrap()
    }

    pub fn list_calls(&self, collection: &str) -> usize {
        self.list_calls
            .lock()
            .unwrap()
            .get(collection)
            .copied()
            .unwrap_or(0)
    }

    /// Peak number of concurrent list requests so far.
    pub fn max_in_flight(&self) -> usize {
        *self.max_in_flight.lock().unwrap()
    }

    pub fn create_calls(&self, collection: &str) -> usize {
        self.create_calls
            .lock()
            .unwrap()
            .get(collection)
            .copied()
            .unwrap_or(0)
    }

    fn should_fail(&self, collection: &str, filters: &Filters) -> bool {
        let failing_collection = self
            .failing_collections
            .lock()
            .unwrap()
            .iter()
            .any(|c| c == collection);
        let failing_equal = self
            .failing_equals
            .lock()
            .unwrap()
            .iter()
            .any(|condition| filters.equals.contains(condition));
        failing_collection || failing_equal
    }

    async fn list_after_delay(&self, collection: &str, filters: &Filters) -> Result<DocumentList> {
        let delay = self.delay_for(filters);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if self.should_fail(collection, filters) {
            return Err(RepositoryError::ConnectionFailed(format!(
                "injected failure listing {collection}"
            )));
        }
        self.inner.list_documents(collection, filters).await
    }

    fn delay_for(&self, filters: &Filters) -> Duration {
        let base = *self.list_delay.lock().unwrap();
        let extra = filters
            .range
            .as_ref()
            .and_then(|range| self.range_delays.lock().unwrap().get(&range.start).copied())
            .unwrap_or_default();
        base + extra
    }
}

#[async_trait]
impl DocumentRepository for FakeRepository {
    async fn list_documents(&self, collection: &str, filters: &Filters) -> Result<DocumentList> {
        *self
            .list_calls
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default() += 1;

        {
            let mut in_flight = self.in_flight.lock().unwrap();
            *in_flight += 1;
            let mut max = self.max_in_flight.lock().unwrap();
            *max = (*max).max(*in_flight);
        }
        let result = self.list_after_delay(collection, filters).await;
        *self.in_flight.lock().unwrap() -= 1;
        result
    }

    async fn get_document(&self, collection: &str, id: &str) -> Result<Document> {
        *self.get_calls.lock().unwrap() += 1;
        {
            let mut missed = self.missed_gets.lock().unwrap();
            if *missed > 0 {
                *missed -= 1;
                return Err(RepositoryError::not_found(collection, id));
            }
        }
        self.inner.get_document(collection, id).await
    }

    async fn create_document(
        &self,
        collection: &str,
        id: DocumentId,
        data: DocumentData,
    ) -> Result<Document> {
        *self
            .create_calls
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default() += 1;
        self.inner.create_document(collection, id, data).await
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        patch: DocumentData,
    ) -> Result<Document> {
        self.inner.update_document(collection, id, patch).await
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<()> {
        self.inner.delete_document(collection, id).await
    }
}
