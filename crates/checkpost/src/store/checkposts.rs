//! The checkpost list store.
//!
//! Owns the cached checkpost set, the totals projection for the selected
//! calendar range, and the list of days that have daily logs. All state lives
//! in one [`StoreSnapshot`] published through a `watch` channel; every change
//! is a single swap, so readers never observe a half-applied update.
//!
//! Repository failures never escape this module. They are logged and replaced
//! by an empty cache or zero totals.

use std::sync::Arc;

use futures_util::future::FutureExt;
use futures_util::stream::{self, StreamExt};
use serde::de::DeserializeOwned;
use tokio::sync::watch;

use checkpost_core::access::{CallerRole, CircleGroup};
use checkpost_core::calendar::{DateValue, IsoRange, TotalsRange};
use checkpost_core::checkpost::{
    collect_date_keys, fields, sum_daily_logs, Checkpost, CheckpostTotals, DailyLog, TotalsMap,
};
use checkpost_core::storage::{list_all_documents, Document, DocumentRepository, Filters};

use crate::config::Config;
use crate::error::ConfigError;

use super::single_flight::SingleFlight;
use super::snapshot::{LoadState, StoreSnapshot};

/// Per-session store of checkposts and their aggregated daily counters.
///
/// Cloning is cheap and every clone shares the same state.
#[derive(Clone)]
pub struct CheckpostListStore {
    repository: Arc<dyn DocumentRepository>,
    config: Arc<Config>,
    state: Arc<watch::Sender<StoreSnapshot>>,
    checkpost_load: SingleFlight,
    dates_load: SingleFlight,
}

impl CheckpostListStore {
    /// Creates an empty store for `caller`.
    pub fn new(
        repository: Arc<dyn DocumentRepository>,
        caller: CallerRole,
        config: Config,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            repository,
            config: Arc::new(config),
            state: Arc::new(watch::Sender::new(StoreSnapshot::new(caller))),
            checkpost_load: SingleFlight::default(),
            dates_load: SingleFlight::default(),
        })
    }

    // ========================================================================
    // Read views
    // ========================================================================

    /// A copy of the current state.
    pub fn snapshot(&self) -> StoreSnapshot {
        self.state.borrow().clone()
    }

    /// A receiver notified after every state swap.
    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.state.subscribe()
    }

    pub fn caller(&self) -> CallerRole {
        self.state.borrow().caller.clone()
    }

    pub fn accessible_checkposts(&self) -> Vec<Checkpost> {
        self.state
            .borrow()
            .accessible_checkposts()
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn circles(&self) -> Vec<CircleGroup> {
        self.state.borrow().circles()
    }

    pub fn total_checkposts(&self) -> usize {
        self.state.borrow().total_checkposts()
    }

    pub fn totals(&self) -> TotalsMap {
        self.state.borrow().totals.clone()
    }

    pub fn summary(&self) -> CheckpostTotals {
        self.state.borrow().summary()
    }

    pub fn selected_range(&self) -> Option<TotalsRange> {
        self.state.borrow().selected_range
    }

    pub fn range_label(&self) -> String {
        self.state.borrow().range_label()
    }

    pub fn available_dates(&self) -> Vec<String> {
        self.state.borrow().available_dates.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    pub fn has_loaded(&self) -> bool {
        self.state.borrow().has_loaded()
    }

    // ========================================================================
    // Checkpost cache
    // ========================================================================

    /// Loads the checkpost set unless it is already loaded.
    ///
    /// Concurrent calls share a single repository request. On failure the
    /// cache returns to empty so a later call retries.
    pub async fn load_checkposts(&self) {
        if self.has_loaded() {
            tracing::trace!("Checkposts already loaded");
            return;
        }

        let store = self.clone();
        self.checkpost_load
            .run(move || async move { store.fetch_checkposts().await }.boxed())
            .await;
    }

    /// Drops the cached checkposts and available dates, then loads again.
    pub async fn reload(&self) {
        self.state.send_modify(|state| {
            if state.load_state == LoadState::Loaded {
                state.load_state = LoadState::Empty;
                state.checkposts.clear();
            }
            state.available_dates.clear();
            state.dates_loaded = false;
            state.dates_generation += 1;
        });
        self.load_checkposts().await;
    }

    async fn fetch_checkposts(&self) {
        self.state
            .send_modify(|state| state.load_state = LoadState::Loading);

        let collection = &self.config.collections.checkposts;
        let filters = Filters::new().limit(self.config.list_limit);
        match self.repository.list_documents(collection, &filters).await {
            Ok(list) => {
                let checkposts: Vec<Checkpost> = decode_each(collection, &list.documents);
                tracing::debug!(count = checkposts.len(), "Loaded checkposts");
                self.state.send_modify(|state| {
                    state.checkposts = checkposts;
                    state.load_state = LoadState::Loaded;
                });
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to load checkposts");
                self.state
                    .send_modify(|state| state.load_state = LoadState::Empty);
            }
        }
    }

    // ========================================================================
    // Totals
    // ========================================================================

    /// Loads totals for a single reference-zone day.
    ///
    /// Unparsable input clears the totals and the selected range.
    pub async fn load_totals_for_date<'a>(&self, value: impl Into<DateValue<'a>>) {
        match TotalsRange::day(value) {
            Some(range) => self.load_totals(range).await,
            None => self.clear_totals(),
        }
    }

    /// Loads totals for today in the reference zone.
    pub async fn load_totals_for_today(&self) {
        self.load_totals(TotalsRange::today()).await;
    }

    /// Loads totals for a calendar month. An invalid month, year 0, or a year
    /// past the calendar clears the totals and the selected range.
    pub async fn load_totals_for_month(&self, year: i32, month: u32) {
        match TotalsRange::month(year, month) {
            Some(range) => self.load_totals(range).await,
            None => self.clear_totals(),
        }
    }

    /// Loads totals for a calendar year. Year 0 or a year past the calendar
    /// clears the totals and the selected range.
    pub async fn load_totals_for_year(&self, year: i32) {
        match TotalsRange::year(year) {
            Some(range) => self.load_totals(range).await,
            None => self.clear_totals(),
        }
    }

    /// Selects `range` and rebuilds its totals projection.
    ///
    /// One paged daily-log read runs per accessible checkpost, with at most
    /// `fetch_concurrency` in flight. A failed query counts as zero for its
    /// checkpost. The result is published only if `range` is still selected
    /// when every query has finished.
    pub async fn load_totals(&self, range: TotalsRange) {
        self.state.send_modify(|state| {
            state.selected_range = Some(range);
            state.totals.clear();
            state.totals_loading = true;
        });

        self.load_checkposts().await;

        let checkposts = self.accessible_checkposts();
        let bounds = range.bounds();
        let totals: TotalsMap = stream::iter(checkposts)
            .map(|checkpost| {
                let bounds = &bounds;
                async move {
                    let totals = self.totals_for(&checkpost.id, range, bounds).await;
                    (checkpost.id, totals)
                }
            })
            .buffer_unordered(self.config.fetch_concurrency)
            .collect()
            .await;

        let count = totals.len();
        let published = self.state.send_if_modified(|state| {
            if state.selected_range != Some(range) {
                return false;
            }
            state.totals = totals;
            state.totals_loading = false;
            true
        });

        if published {
            tracing::debug!(range = %range, checkposts = count, "Published totals");
        } else {
            tracing::debug!(range = %range, "Discarded totals for a range that is no longer selected");
        }
    }

    async fn totals_for(
        &self,
        checkpost_id: &str,
        range: TotalsRange,
        bounds: &IsoRange,
    ) -> CheckpostTotals {
        let collection = &self.config.collections.daily_logs;
        let filters = Filters::new()
            .equal(fields::CHECKPOST_ID, checkpost_id)
            .between(fields::LOG_DATE, bounds)
            .order_asc(fields::LOG_DATE);

        match self.read_all(collection, &filters).await {
            Ok(documents) => {
                let logs: Vec<DailyLog> = decode_each(collection, &documents);
                sum_daily_logs(&logs)
            }
            Err(err) => {
                tracing::warn!(
                    checkpost_id,
                    range = %range,
                    error = %err,
                    "Failed to load daily logs, counting zero"
                );
                CheckpostTotals::default()
            }
        }
    }

    fn clear_totals(&self) {
        self.state.send_modify(|state| {
            state.selected_range = None;
            state.totals.clear();
            state.totals_loading = false;
        });
    }

    // ========================================================================
    // Available dates
    // ========================================================================

    /// Loads the distinct days that have daily logs for any accessible
    /// checkpost, unless already loaded.
    ///
    /// Concurrent calls share a single run. The list only counts as loaded
    /// when the checkpost set was loaded.
    pub async fn ensure_log_dates_loaded(&self) {
        if self.state.borrow().dates_loaded {
            tracing::trace!("Log dates already loaded");
            return;
        }

        let store = self.clone();
        self.dates_load
            .run(move || async move { store.fetch_log_dates().await }.boxed())
            .await;
    }

    /// Forgets the available dates so the next
    /// [`ensure_log_dates_loaded`](Self::ensure_log_dates_loaded) refetches them.
    ///
    /// A fetch already in flight is not published.
    pub fn invalidate_log_dates(&self) {
        self.state.send_modify(|state| {
            state.available_dates.clear();
            state.dates_loaded = false;
            state.dates_generation += 1;
        });
    }

    async fn fetch_log_dates(&self) {
        let generation = self.state.borrow().dates_generation;
        self.load_checkposts().await;

        self.state.send_modify(|state| state.dates_loading = true);
        let loaded = self.has_loaded();
        let checkposts = self.accessible_checkposts();

        let logs: Vec<Vec<DailyLog>> = stream::iter(checkposts)
            .map(|checkpost| async move { self.logs_for(&checkpost.id).await })
            .buffer_unordered(self.config.fetch_concurrency)
            .collect()
            .await;
        let dates = collect_date_keys(logs.iter().flatten());
        let count = dates.len();

        let mut published = false;
        self.state.send_modify(|state| {
            state.dates_loading = false;
            if state.dates_generation == generation {
                state.available_dates = dates;
                state.dates_loaded = loaded;
                published = true;
            }
        });

        if published {
            tracing::debug!(count, "Loaded log dates");
        } else {
            tracing::debug!("Discarded log dates invalidated during the fetch");
        }
    }

    async fn logs_for(&self, checkpost_id: &str) -> Vec<DailyLog> {
        let collection = &self.config.collections.daily_logs;
        let filters = Filters::new()
            .equal(fields::CHECKPOST_ID, checkpost_id)
            .order_desc(fields::LOG_DATE);

        match self.read_all(collection, &filters).await {
            Ok(documents) => decode_each(collection, &documents),
            Err(err) => {
                tracing::warn!(checkpost_id, error = %err, "Failed to load log dates");
                Vec::new()
            }
        }
    }

    /// Reads every matching document, `log_limit` per request.
    async fn read_all(
        &self,
        collection: &str,
        filters: &Filters,
    ) -> checkpost_core::storage::Result<Vec<Document>> {
        list_all_documents(self.repository.as_ref(), collection, filters, self.config.log_limit)
            .await
    }
}

/// Decodes documents, skipping malformed ones.
fn decode_each<T: DeserializeOwned>(collection: &str, documents: &[Document]) -> Vec<T> {
    documents
        .iter()
        .filter_map(|document| match document.decode() {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(collection, document_id = %document.id, error = %err, "Skipping malformed document");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use checkpost_core::storage::DocumentData;
    use serde_json::{json, Value};

    use crate::storage::testing::FakeRepository;

    fn doc(id: &str, value: Value) -> Document {
        let data: DocumentData = match value {
            Value::Object(map) => map,
            _ => panic!("test documents must be objects"),
        };
        Document::new(id, data)
    }

    fn log(id: &str, checkpost_id: &str, log_date: &str, checked: u64, passed: u64, cases: u64) -> Document {
        doc(
            id,
            json!({
                "checkpostId": checkpost_id,
                "logDate": log_date,
                "vehiclesCheckedCount": checked,
                "vehiclesPassedCount": passed,
                "casesRegisteredCount": cases,
            }),
        )
    }

    /// Checkposts A (North) and B (South); A logged 10/8/1 on 2024-03-01.
    async fn seeded() -> Arc<FakeRepository> {
        let repo = Arc::new(FakeRepository::new());
        repo.inner()
            .seed(
                "checkposts",
                [
                    doc("a", json!({"name": "A", "circle": "North"})),
                    doc("b", json!({"name": "B", "circle": "South"})),
                ],
            )
            .await;
        repo.inner()
            .seed(
                "daily_logs",
                [log("log-a1", "a", "2024-02-29T18:30:00.000Z", 10, 8, 1)],
            )
            .await;
        repo
    }

    fn store(repo: &Arc<FakeRepository>, caller: CallerRole) -> CheckpostListStore {
        CheckpostListStore::new(repo.clone(), caller, Config::default()).unwrap()
    }

    fn day_start(key: &str) -> String {
        TotalsRange::day(key).unwrap().bounds().start_iso
    }

    /// One 1/1/0 log per day for `count` consecutive days from `first`.
    fn consecutive_logs(checkpost_id: &str, first: &str, count: u64) -> Vec<Document> {
        let first = chrono::NaiveDate::parse_from_str(first, "%Y-%m-%d").unwrap();
        (0..count)
            .map(|n| {
                let day = TotalsRange::Day(first + chrono::Days::new(n));
                log(
                    &format!("log-{checkpost_id}-{n}"),
                    checkpost_id,
                    &day.bounds().start_iso,
                    1,
                    1,
                    0,
                )
            })
            .collect()
    }

    /// `count` checkposts named cp-0, cp-1, ... in the North circle.
    async fn many_checkposts(count: usize) -> Arc<FakeRepository> {
        let repo = Arc::new(FakeRepository::new());
        repo.inner()
            .seed(
                "checkposts",
                (0..count).map(|n| doc(&format!("cp-{n}"), json!({"name": format!("CP {n}"), "circle": "North"}))),
            )
            .await;
        repo
    }

    fn store_with(repo: &Arc<FakeRepository>, config: Config) -> CheckpostListStore {
        CheckpostListStore::new(repo.clone(), CallerRole::admin(), config).unwrap()
    }

    // ==================== Construction Tests ====================

    #[test]
    fn test_new_rejects_invalid_config() {
        let repo = Arc::new(FakeRepository::new());
        let config = Config {
            fetch_concurrency: 0,
            ..Config::default()
        };
        let result = CheckpostListStore::new(repo, CallerRole::admin(), config);
        assert!(matches!(result, Err(ConfigError::Zero { .. })));
    }

    #[tokio::test]
    async fn test_new_store_is_empty() {
        let repo = seeded().await;
        let store = store(&repo, CallerRole::admin());

        assert!(!store.has_loaded());
        assert!(!store.is_loading());
        assert_eq!(store.snapshot().load_state, LoadState::Empty);
        assert_eq!(store.total_checkposts(), 0);
        assert_eq!(store.range_label(), "");
        assert_eq!(repo.list_calls("checkposts"), 0);
    }

    // ==================== Checkpost Load Tests ====================

    #[tokio::test]
    async fn test_concurrent_loads_issue_one_request() {
        let repo = seeded().await;
        repo.set_list_delay(Duration::from_millis(30));
        let store = store(&repo, CallerRole::admin());

        tokio::join!(store.load_checkposts(), store.load_checkposts());

        assert_eq!(repo.list_calls("checkposts"), 1);
        assert!(store.has_loaded());
        assert_eq!(store.total_checkposts(), 2);
    }

    #[tokio::test]
    async fn test_clones_share_the_in_flight_load() {
        let repo = seeded().await;
        repo.set_list_delay(Duration::from_millis(30));
        let store = store(&repo, CallerRole::admin());
        let other = store.clone();

        tokio::join!(store.load_checkposts(), other.load_checkposts());

        assert_eq!(repo.list_calls("checkposts"), 1);
        assert!(other.has_loaded());
    }

    #[tokio::test]
    async fn test_loaded_cache_is_not_refetched() {
        let repo = seeded().await;
        let store = store(&repo, CallerRole::admin());

        store.load_checkposts().await;
        store.load_checkposts().await;

        assert_eq!(repo.list_calls("checkposts"), 1);
    }

    #[tokio::test]
    async fn test_failed_load_returns_to_empty_and_retries() {
        let repo = seeded().await;
        repo.fail_collection("checkposts");
        let store = store(&repo, CallerRole::admin());

        store.load_checkposts().await;
        assert_eq!(store.snapshot().load_state, LoadState::Empty);
        assert!(!store.is_loading());
        assert_eq!(store.total_checkposts(), 0);

        repo.heal_collection("checkposts");
        store.load_checkposts().await;
        assert!(store.has_loaded());
        assert_eq!(repo.list_calls("checkposts"), 2);
    }

    #[tokio::test]
    async fn test_load_skips_malformed_documents() {
        let repo = seeded().await;
        repo.inner()
            .seed("checkposts", [doc("bad", json!({"name": 42}))])
            .await;
        let store = store(&repo, CallerRole::admin());

        store.load_checkposts().await;

        assert!(store.has_loaded());
        assert_eq!(store.total_checkposts(), 2);
    }

    #[tokio::test]
    async fn test_reload_fetches_again() {
        let repo = seeded().await;
        let store = store(&repo, CallerRole::admin());
        store.load_checkposts().await;

        repo.inner()
            .seed("checkposts", [doc("c", json!({"name": "C", "circle": ""}))])
            .await;
        store.reload().await;

        assert_eq!(repo.list_calls("checkposts"), 2);
        assert_eq!(store.total_checkposts(), 3);
        let names: Vec<String> = store.circles().into_iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["North", "South", "Unassigned"]);
    }

    #[tokio::test]
    async fn test_restricted_caller_views() {
        let repo = seeded().await;
        let store = store(&repo, CallerRole::from_labels(["North"]));

        store.load_checkposts().await;

        let ids: Vec<String> = store
            .accessible_checkposts()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec!["a"]);
        assert_eq!(store.snapshot().checkposts.len(), 2);
    }

    #[tokio::test]
    async fn test_subscribers_see_each_swap() {
        let repo = seeded().await;
        let store = store(&repo, CallerRole::admin());
        let mut rx = store.subscribe();

        store.load_checkposts().await;

        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().has_loaded());
    }

    // ==================== Totals Tests ====================

    #[tokio::test]
    async fn test_totals_for_date() {
        let repo = seeded().await;
        let store = store(&repo, CallerRole::admin());

        store.load_totals_for_date("2024-03-01").await;

        let totals = store.totals();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals["a"], CheckpostTotals::new(10, 1, 8));
        assert_eq!(totals["b"], CheckpostTotals::default());
        assert_eq!(store.summary(), CheckpostTotals::new(10, 1, 8));
        assert_eq!(store.range_label(), "01 Mar 2024");
        assert!(!store.snapshot().totals_loading);
        assert_eq!(repo.list_calls("daily_logs"), 2);
    }

    #[tokio::test]
    async fn test_totals_load_checkposts_first() {
        let repo = seeded().await;
        let store = store(&repo, CallerRole::admin());

        store.load_totals_for_date("2024-03-01").await;

        assert!(store.has_loaded());
        assert_eq!(repo.list_calls("checkposts"), 1);
    }

    #[tokio::test]
    async fn test_totals_respect_reference_day_boundaries() {
        let repo = seeded().await;
        repo.inner()
            .seed(
                "daily_logs",
                [
                    // 00:00 IST on 2024-03-02: the next day.
                    log("log-a2", "a", "2024-03-01T18:30:00.000Z", 5, 5, 0),
                    // 23:59 IST on 2024-03-01: same day.
                    log("log-a3", "a", "2024-03-01T18:29:00.000Z", 1, 1, 0),
                ],
            )
            .await;
        let store = store(&repo, CallerRole::admin());

        store.load_totals_for_date("2024-03-01").await;

        assert_eq!(store.totals()["a"], CheckpostTotals::new(11, 1, 9));
    }

    #[tokio::test]
    async fn test_failed_checkpost_counts_zero() {
        let repo = seeded().await;
        repo.inner()
            .seed(
                "daily_logs",
                [log("log-b1", "b", "2024-02-29T18:30:00.000Z", 3, 3, 0)],
            )
            .await;
        repo.fail_when_equal("checkpostId", "a");
        let store = store(&repo, CallerRole::admin());

        store.load_totals_for_date("2024-03-01").await;

        let totals = store.totals();
        assert_eq!(totals["a"], CheckpostTotals::default());
        assert_eq!(totals["b"], CheckpostTotals::new(3, 0, 3));
    }

    #[tokio::test]
    async fn test_totals_only_cover_accessible_checkposts() {
        let repo = seeded().await;
        let store = store(&repo, CallerRole::restricted(["south"]));

        store.load_totals_for_date("2024-03-01").await;

        let totals = store.totals();
        assert_eq!(totals.len(), 1);
        assert!(totals.contains_key("b"));
        assert_eq!(repo.list_calls("daily_logs"), 1);
    }

    #[tokio::test]
    async fn test_totals_for_month_and_year() {
        let repo = seeded().await;
        repo.inner()
            .seed(
                "daily_logs",
                [
                    log("log-a2", "a", "2024-03-30T18:30:00.000Z", 2, 2, 0),
                    log("log-a3", "a", "2024-03-31T18:30:00.000Z", 7, 7, 0),
                    log("log-a4", "a", "2023-12-31T18:29:00.000Z", 9, 9, 0),
                ],
            )
            .await;
        let store = store(&repo, CallerRole::admin());

        store.load_totals_for_month(2024, 3).await;
        assert_eq!(store.totals()["a"], CheckpostTotals::new(12, 1, 10));
        assert_eq!(store.range_label(), "March 2024");

        store.load_totals_for_year(2024).await;
        assert_eq!(store.totals()["a"], CheckpostTotals::new(19, 1, 17));
        assert_eq!(store.range_label(), "2024");
    }

    #[tokio::test]
    async fn test_invalid_range_clears_totals() {
        let repo = seeded().await;
        let store = store(&repo, CallerRole::admin());
        store.load_totals_for_date("2024-03-01").await;
        let calls = repo.list_calls("daily_logs");

        store.load_totals_for_date("not a date").await;
        assert!(store.totals().is_empty());
        assert_eq!(store.selected_range(), None);

        store.load_totals_for_date("2024-03-01").await;
        store.load_totals_for_month(2024, 13).await;
        assert!(store.totals().is_empty());
        assert_eq!(store.range_label(), "");

        store.load_totals_for_year(0).await;
        assert_eq!(store.selected_range(), None);
        assert_eq!(repo.list_calls("daily_logs"), calls + 2);
    }

    #[tokio::test]
    async fn test_year_past_the_calendar_clears_totals() {
        let repo = seeded().await;
        let store = store(&repo, CallerRole::admin());
        store.load_totals_for_date("2024-03-01").await;
        let calls = repo.list_calls("daily_logs");

        store.load_totals_for_year(i32::MAX).await;
        assert_eq!(store.selected_range(), None);
        assert!(store.totals().is_empty());

        store.load_totals_for_month(i32::MAX, 12).await;
        assert_eq!(store.selected_range(), None);
        assert_eq!(repo.list_calls("daily_logs"), calls);
    }

    #[tokio::test]
    async fn test_totals_sum_every_page() {
        let repo = seeded().await;
        repo.inner()
            .seed("daily_logs", consecutive_logs("a", "2024-03-02", 10))
            .await;
        let store = store_with(
            &repo,
            Config {
                log_limit: 4,
                ..Config::default()
            },
        );

        store.load_totals_for_month(2024, 3).await;

        assert_eq!(store.totals()["a"], CheckpostTotals::new(20, 1, 18));
        // a: 11 logs in pages of 4; b: one empty page.
        assert_eq!(repo.list_calls("daily_logs"), 4);
    }

    #[tokio::test]
    async fn test_totals_fan_out_respects_concurrency_limit() {
        let repo = many_checkposts(6).await;
        repo.set_list_delay(Duration::from_millis(20));
        let store = store_with(
            &repo,
            Config {
                fetch_concurrency: 2,
                ..Config::default()
            },
        );

        store.load_totals_for_date("2024-03-01").await;

        assert_eq!(store.totals().len(), 6);
        assert_eq!(repo.list_calls("daily_logs"), 6);
        assert_eq!(repo.max_in_flight(), 2);
    }

    #[tokio::test]
    async fn test_totals_fan_out_below_limit_runs_all_at_once() {
        let repo = many_checkposts(3).await;
        repo.set_list_delay(Duration::from_millis(20));
        let store = store(&repo, CallerRole::admin());

        store.load_totals_for_date("2024-03-01").await;

        assert_eq!(store.totals().len(), 3);
        assert_eq!(repo.max_in_flight(), 3);
    }

    #[tokio::test]
    async fn test_stale_totals_are_discarded() {
        let repo = seeded().await;
        repo.inner()
            .seed(
                "daily_logs",
                [log("log-a2", "a", "2024-03-01T18:30:00.000Z", 4, 4, 0)],
            )
            .await;
        repo.delay_range(&day_start("2024-03-01"), Duration::from_millis(150));
        let store = store(&repo, CallerRole::admin());
        store.load_checkposts().await;

        let slow = {
            let store = store.clone();
            tokio::spawn(async move { store.load_totals_for_date("2024-03-01").await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        store.load_totals_for_date("2024-03-02").await;
        slow.await.unwrap();

        assert_eq!(store.range_label(), "02 Mar 2024");
        assert_eq!(store.totals()["a"], CheckpostTotals::new(4, 0, 4));
    }

    #[tokio::test]
    async fn test_empty_checkpost_set_publishes_empty_totals() {
        let repo = Arc::new(FakeRepository::new());
        let store = store(&repo, CallerRole::admin());

        store.load_totals_for_date("2024-03-01").await;

        assert!(store.totals().is_empty());
        assert_eq!(store.range_label(), "01 Mar 2024");
        assert!(!store.snapshot().totals_loading);
        assert_eq!(repo.list_calls("daily_logs"), 0);
    }

    // ==================== Available Dates Tests ====================

    #[tokio::test]
    async fn test_log_dates_are_distinct_and_descending() {
        let repo = seeded().await;
        repo.inner()
            .seed(
                "daily_logs",
                [
                    log("log-a2", "a", "2024-03-01T18:30:00.000Z", 1, 1, 0),
                    log("log-b1", "b", "2024-02-29T18:30:00.000Z", 1, 1, 0),
                    log("log-b2", "b", "2024-02-27T18:30:00.000Z", 1, 1, 0),
                ],
            )
            .await;
        let store = store(&repo, CallerRole::admin());

        store.ensure_log_dates_loaded().await;

        assert_eq!(
            store.available_dates(),
            vec!["2024-03-02", "2024-03-01", "2024-02-28"]
        );
        assert!(store.snapshot().dates_loaded);
    }

    #[tokio::test]
    async fn test_log_dates_load_once() {
        let repo = seeded().await;
        repo.set_list_delay(Duration::from_millis(30));
        let store = store(&repo, CallerRole::admin());

        tokio::join!(
            store.ensure_log_dates_loaded(),
            store.ensure_log_dates_loaded()
        );
        store.ensure_log_dates_loaded().await;

        assert_eq!(repo.list_calls("checkposts"), 1);
        assert_eq!(repo.list_calls("daily_logs"), 2);
    }

    #[tokio::test]
    async fn test_invalidate_log_dates_refetches() {
        let repo = seeded().await;
        let store = store(&repo, CallerRole::admin());
        store.ensure_log_dates_loaded().await;

        repo.inner()
            .seed(
                "daily_logs",
                [log("log-a2", "a", "2024-03-04T18:30:00.000Z", 1, 1, 0)],
            )
            .await;
        store.invalidate_log_dates();
        assert!(store.available_dates().is_empty());

        store.ensure_log_dates_loaded().await;
        assert_eq!(store.available_dates(), vec!["2024-03-05", "2024-03-01"]);
        assert_eq!(repo.list_calls("daily_logs"), 4);
    }

    #[tokio::test]
    async fn test_log_dates_not_loaded_without_checkposts() {
        let repo = seeded().await;
        repo.fail_collection("checkposts");
        let store = store(&repo, CallerRole::admin());

        store.ensure_log_dates_loaded().await;

        assert!(store.available_dates().is_empty());
        assert!(!store.snapshot().dates_loaded);

        repo.heal_collection("checkposts");
        store.ensure_log_dates_loaded().await;
        assert_eq!(store.available_dates(), vec!["2024-03-01"]);
    }

    #[tokio::test]
    async fn test_failed_checkpost_contributes_no_dates() {
        let repo = seeded().await;
        repo.inner()
            .seed(
                "daily_logs",
                [log("log-b1", "b", "2024-03-02T18:30:00.000Z", 1, 1, 0)],
            )
            .await;
        repo.fail_when_equal("checkpostId", "a");
        let store = store(&repo, CallerRole::admin());

        store.ensure_log_dates_loaded().await;

        assert_eq!(store.available_dates(), vec!["2024-03-03"]);
        assert!(store.snapshot().dates_loaded);
    }

    #[tokio::test]
    async fn test_log_dates_read_every_page() {
        let repo = seeded().await;
        repo.inner()
            .seed("daily_logs", consecutive_logs("a", "2020-01-01", 120))
            .await;
        let store = store_with(
            &repo,
            Config {
                log_limit: 50,
                ..Config::default()
            },
        );

        store.ensure_log_dates_loaded().await;

        let dates = store.available_dates();
        assert_eq!(dates.len(), 121);
        assert_eq!(dates.first().map(String::as_str), Some("2024-03-01"));
        assert_eq!(dates.last().map(String::as_str), Some("2020-01-01"));
        // a: 121 logs in pages of 50; b: one empty page.
        assert_eq!(repo.list_calls("daily_logs"), 4);
    }

    #[tokio::test]
    async fn test_log_dates_fan_out_respects_concurrency_limit() {
        let repo = many_checkposts(5).await;
        repo.set_list_delay(Duration::from_millis(20));
        let store = store_with(
            &repo,
            Config {
                fetch_concurrency: 2,
                ..Config::default()
            },
        );

        store.ensure_log_dates_loaded().await;

        assert!(store.snapshot().dates_loaded);
        assert_eq!(repo.list_calls("daily_logs"), 5);
        assert_eq!(repo.max_in_flight(), 2);
    }

    #[tokio::test]
    async fn test_invalidation_during_fetch_is_not_overwritten() {
        let repo = seeded().await;
        repo.set_list_delay(Duration::from_millis(50));
        let store = store(&repo, CallerRole::admin());

        let slow = {
            let store = store.clone();
            tokio::spawn(async move { store.ensure_log_dates_loaded().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        repo.inner()
            .seed(
                "daily_logs",
                [log("log-a2", "a", "2024-03-04T18:30:00.000Z", 1, 1, 0)],
            )
            .await;
        store.invalidate_log_dates();
        slow.await.unwrap();

        let snapshot = store.snapshot();
        assert!(!snapshot.dates_loaded);
        assert!(!snapshot.dates_loading);
        assert!(snapshot.available_dates.is_empty());

        store.ensure_log_dates_loaded().await;
        assert_eq!(store.available_dates(), vec!["2024-03-05", "2024-03-01"]);
        assert!(store.snapshot().dates_loaded);
    }

    #[tokio::test]
    async fn test_reload_during_fetch_is_not_overwritten() {
        let repo = seeded().await;
        let store = store(&repo, CallerRole::admin());
        store.load_checkposts().await;
        repo.set_list_delay(Duration::from_millis(50));

        let slow = {
            let store = store.clone();
            tokio::spawn(async move { store.ensure_log_dates_loaded().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        store.reload().await;
        slow.await.unwrap();

        assert!(store.has_loaded());
        assert!(!store.snapshot().dates_loaded);
        assert!(store.available_dates().is_empty());
    }
}
