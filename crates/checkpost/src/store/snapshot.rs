//! Immutable store state and the views derived from it.

use checkpost_core::access::{filter_accessible, group_by_circle, CallerRole, CircleGroup};
use checkpost_core::calendar::TotalsRange;
use checkpost_core::checkpost::{summarize_totals, Checkpost, CheckpostTotals, TotalsMap};

/// Lifecycle of the cached checkpost set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Empty,
    Loading,
    Loaded,
}

/// Everything the store publishes, swapped as a whole on every change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreSnapshot {
    pub caller: CallerRole,
    pub checkposts: Vec<Checkpost>,
    pub load_state: LoadState,
    /// Range the published totals belong to, if any.
    pub selected_range: Option<TotalsRange>,
    pub totals: TotalsMap,
    pub totals_loading: bool,
    /// Reference-zone day keys with at least one daily log, newest first.
    pub available_dates: Vec<String>,
    pub dates_loaded: bool,
    pub dates_loading: bool,
    /// Bumped on every invalidation of `available_dates`.
    pub dates_generation: u64,
}

impl StoreSnapshot {
    pub fn new(caller: CallerRole) -> Self {
        Self {
            caller,
            ..Default::default()
        }
    }

    /// Checkposts the caller may see, in load order.
    pub fn accessible_checkposts(&self) -> Vec<&Checkpost> {
        filter_accessible(&self.caller, &self.checkposts)
    }

    /// Accessible checkposts grouped by circle.
    pub fn circles(&self) -> Vec<CircleGroup> {
        group_by_circle(self.accessible_checkposts())
    }

    pub fn total_checkposts(&self) -> usize {
        self.accessible_checkposts().len()
    }

    /// Totals for one checkpost, zero if none are published.
    pub fn totals_for(&self, checkpost_id: &str) -> CheckpostTotals {
        self.totals.get(checkpost_id).copied().unwrap_or_default()
    }

    /// Sum of the published totals across accessible checkposts.
    pub fn summary(&self) -> CheckpostTotals {
        summarize_totals(self.accessible_checkposts(), &self.totals)
    }

    /// Label of the selected range, empty if none is selected.
    pub fn range_label(&self) -> String {
        self.selected_range
            .map(|range| range.label())
            .unwrap_or_default()
    }

    /// True while the checkpost set is being fetched.
    pub fn is_loading(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    pub fn has_loaded(&self) -> bool {
        self.load_state == LoadState::Loaded
    }
}
