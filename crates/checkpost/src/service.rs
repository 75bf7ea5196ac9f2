//! Typed access to checkposts, daily logs, cases and the seized-item catalog.
//!
//! The service is the write path of the application. Unlike the store, it
//! returns every failure to the caller.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use checkpost_core::calendar::{to_reference_day_range, IsoRange, DATE_KEY_FORMAT};
use checkpost_core::checkpost::{
    fields, missing_default_items, validate_new_checkpost, validate_seized_item, Case, CheckpostError,
    Checkpost, DailyLog, DailyLogCounts, NewCase, NewCheckpost, NewDailyLog, NewSeizedItem,
    SeizedItem,
};
use checkpost_core::storage::{
    encode_data, list_all_documents, retry_with_delay, Document, DocumentData, DocumentId,
    DocumentRepository, Filters, RepositoryError, RetryPolicy,
};

use crate::config::Config;
use crate::error::{ConfigError, Result, ServiceError};

/// Checkpost operations over a [`DocumentRepository`].
#[derive(Clone)]
pub struct CheckpostService {
    repository: Arc<dyn DocumentRepository>,
    config: Arc<Config>,
    retry: RetryPolicy,
}

impl CheckpostService {
    pub fn new(repository: Arc<dyn DocumentRepository>, config: Config) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            repository,
            config: Arc::new(config),
            retry: RetryPolicy::default(),
        })
    }

    /// Sets the policy used when reading back freshly created documents.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    // ==================== Checkposts ====================

    pub async fn list_checkposts(&self, limit: usize) -> Result<Vec<Checkpost>> {
        let filters = Filters::new().limit(limit);
        self.list(&self.config.collections.checkposts, &filters).await
    }

    pub async fn get_checkpost(&self, id: &str) -> Result<Checkpost> {
        self.get(&self.config.collections.checkposts, id).await
    }

    /// Creates a checkpost and reads it back, retrying while the backend
    /// does not return it yet.
    pub async fn create_checkpost(&self, checkpost: NewCheckpost) -> Result<Checkpost> {
        validate_new_checkpost(&checkpost)?;
        let collection = &self.config.collections.checkposts;
        let created = self
            .repository
            .create_document(collection, DocumentId::Auto, encode_data(&checkpost)?)
            .await?;
        tracing::info!(checkpost_id = %created.id, name = %checkpost.name, "Created checkpost");

        let document = retry_with_delay(self.retry, RepositoryError::is_transient, |attempt| {
            if attempt > 1 {
                tracing::debug!(checkpost_id = %created.id, attempt, "Checkpost not readable yet, retrying");
            }
            self.repository.get_document(collection, &created.id)
        })
        .await?;
        Ok(document.decode()?)
    }

    // ==================== Daily Logs ====================

    /// Every daily log of a checkpost, newest first.
    pub async fn daily_logs_for(&self, checkpost_id: &str) -> Result<Vec<DailyLog>> {
        let filters = Filters::new()
            .equal(fields::CHECKPOST_ID, checkpost_id)
            .order_desc(fields::LOG_DATE);
        self.list_all(&self.config.collections.daily_logs, &filters).await
    }

    /// Daily logs of a checkpost within `range`, newest first.
    pub async fn daily_logs_in_range(
        &self,
        checkpost_id: &str,
        range: &IsoRange,
    ) -> Result<Vec<DailyLog>> {
        let filters = Filters::new()
            .equal(fields::CHECKPOST_ID, checkpost_id)
            .between(fields::LOG_DATE, range)
            .order_desc(fields::LOG_DATE);
        self.list_all(&self.config.collections.daily_logs, &filters).await
    }

    pub async fn get_daily_log(&self, id: &str) -> Result<DailyLog> {
        self.get(&self.config.collections.daily_logs, id).await
    }

    /// Creates a daily log unless one already exists for the same checkpost
    /// and reference-zone day.
    ///
    /// The check runs before the write and is not atomic with it: two
    /// concurrent writers can both pass it.
    pub async fn create_daily_log(&self, log: NewDailyLog) -> Result<DailyLog> {
        if log.checkpost_id.trim().is_empty() {
            return Err(CheckpostError::MissingCheckpostId.into());
        }

        let day = to_reference_day_range(log.date);
        let existing = self
            .daily_logs_in_range(&log.checkpost_id, &day)
            .await?;
        if !existing.is_empty() {
            let date = log.date.format(DATE_KEY_FORMAT).to_string();
            tracing::warn!(checkpost_id = %log.checkpost_id, %date, "Rejected duplicate daily log");
            return Err(ServiceError::DuplicateDailyLog {
                checkpost_id: log.checkpost_id,
                date,
            });
        }

        let document = self
            .repository
            .create_document(
                &self.config.collections.daily_logs,
                DocumentId::Auto,
                encode_data(&log)?,
            )
            .await?;
        tracing::info!(log_id = %document.id, checkpost_id = %log.checkpost_id, "Created daily log");
        Ok(document.decode()?)
    }

    pub async fn update_daily_log_counts(&self, id: &str, counts: DailyLogCounts) -> Result<DailyLog> {
        let document = self
            .repository
            .update_document(&self.config.collections.daily_logs, id, encode_data(&counts)?)
            .await?;
        Ok(document.decode()?)
    }

    // ==================== Cases ====================

    pub async fn cases_for_log(&self, log_id: &str) -> Result<Vec<Case>> {
        let filters = Filters::new()
            .equal(fields::LOG_ID, log_id)
            .limit(self.config.log_limit);
        self.list(&self.config.collections.cases, &filters).await
    }

    /// Registers a case under a daily log and bumps the log's case counter.
    pub async fn register_case(&self, log_id: &str, case: NewCase) -> Result<Case> {
        let record = case.into_record(log_id)?;
        let log = self.get_daily_log(log_id).await?;

        let document = self
            .repository
            .create_document(
                &self.config.collections.cases,
                DocumentId::Auto,
                encode_data(&record)?,
            )
            .await?;

        let mut patch = DocumentData::new();
        patch.insert(
            fields::CASES_REGISTERED_COUNT.to_string(),
            (log.cases_registered_count + 1).into(),
        );
        self.repository
            .update_document(&self.config.collections.daily_logs, log_id, patch)
            .await?;

        tracing::info!(case_id = %document.id, log_id, "Registered case");
        Ok(document.decode()?)
    }

    /// Rewrites a case. The parent log's counter is left alone.
    pub async fn update_case(&self, case_id: &str, case: NewCase) -> Result<Case> {
        let existing: Case = self.get(&self.config.collections.cases, case_id).await?;
        let record = case.into_record(existing.log_id)?;
        let document = self
            .repository
            .update_document(&self.config.collections.cases, case_id, encode_data(&record)?)
            .await?;
        Ok(document.decode()?)
    }

    // ==================== Seized Item Catalog ====================

    pub async fn list_seized_items(&self, limit: usize) -> Result<Vec<SeizedItem>> {
        let filters = Filters::new().order_asc(fields::NAME).limit(limit);
        self.list(&self.config.collections.seized_items, &filters).await
    }

    pub async fn create_seized_item(&self, item: NewSeizedItem) -> Result<SeizedItem> {
        let item = item.normalized();
        validate_seized_item(&item)?;
        let document = self
            .repository
            .create_document(
                &self.config.collections.seized_items,
                DocumentId::Auto,
                encode_data(&item)?,
            )
            .await?;
        Ok(document.decode()?)
    }

    pub async fn update_seized_item(&self, id: &str, item: NewSeizedItem) -> Result<SeizedItem> {
        let item = item.normalized();
        validate_seized_item(&item)?;
        let document = self
            .repository
            .update_document(&self.config.collections.seized_items, id, encode_data(&item)?)
            .await?;
        Ok(document.decode()?)
    }

    pub async fn delete_seized_item(&self, id: &str) -> Result<()> {
        self.repository
            .delete_document(&self.config.collections.seized_items, id)
            .await?;
        Ok(())
    }

    /// Creates the default catalog entries that are missing, matching names
    /// case-insensitively. Returns the entries it created.
    pub async fn ensure_default_seized_items(&self) -> Result<Vec<SeizedItem>> {
        let existing = self.list_seized_items(self.config.list_limit).await?;
        let missing = missing_default_items(&existing);
        if missing.is_empty() {
            tracing::debug!("Seized item catalog already has the defaults");
        }

        let mut created = Vec::with_capacity(missing.len());
        for item in missing {
            tracing::info!(name = %item.name, "Creating default seized item");
            created.push(self.create_seized_item(item).await?);
        }
        Ok(created)
    }

    // ==================== Helpers ====================

    async fn list<T: DeserializeOwned>(&self, collection: &str, filters: &Filters) -> Result<Vec<T>> {
        let list = self.repository.list_documents(collection, filters).await?;
        Ok(list.decode_all()?)
    }

    /// Like `list`, but pages through every match `log_limit` at a time.
    async fn list_all<T: DeserializeOwned>(&self, collection: &str, filters: &Filters) -> Result<Vec<T>> {
        let documents =
            list_all_documents(self.repository.as_ref(), collection, filters, self.config.log_limit)
                .await?;
        documents
            .iter()
            .map(|document| document.decode().map_err(ServiceError::from))
            .collect()
    }

    async fn get<T: DeserializeOwned>(&self, collection: &str, id: &str) -> Result<T> {
        let document: Document = self.repository.get_document(collection, id).await?;
        Ok(document.decode()?)
    }
}
