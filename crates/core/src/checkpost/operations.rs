use std::collections::{BTreeSet, HashSet};

use super::error::CheckpostError;
use super::requests::{NewCheckpost, NewSeizedItem};
use super::types::{Checkpost, CheckpostTotals, DailyLog, SeizedItem, TotalsMap};

/// Sums the counters of a set of daily logs.
pub fn sum_daily_logs<'a>(logs: impl IntoIterator<Item = &'a DailyLog>) -> CheckpostTotals {
    logs.into_iter().map(DailyLog::totals).sum()
}

/// Sums the totals of the given checkposts. Checkposts missing from the
/// projection contribute nothing.
pub fn summarize_totals<'a>(
    checkposts: impl IntoIterator<Item = &'a Checkpost>,
    totals: &TotalsMap,
) -> CheckpostTotals {
    checkposts
        .into_iter()
        .filter_map(|checkpost| totals.get(&checkpost.id).copied())
        .sum()
}

/// Collects the distinct reference-zone day keys of the given logs, newest
/// first. Logs with an unparsable date are ignored.
pub fn collect_date_keys<'a>(logs: impl IntoIterator<Item = &'a DailyLog>) -> Vec<String> {
    let keys: BTreeSet<String> = logs
        .into_iter()
        .map(DailyLog::date_key)
        .filter(|key| !key.is_empty())
        .collect();
    keys.into_iter().rev().collect()
}

/// Validates a checkpost before creation.
pub fn validate_new_checkpost(checkpost: &NewCheckpost) -> Result<(), CheckpostError> {
    if checkpost.name.trim().is_empty() {
        return Err(CheckpostError::EmptyName);
    }
    if let Some(latitude) = checkpost.latitude {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CheckpostError::InvalidLatitude(latitude));
        }
    }
    if let Some(longitude) = checkpost.longitude {
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CheckpostError::InvalidLongitude(longitude));
        }
    }
    Ok(())
}

/// Validates a seized-item catalog entry.
pub fn validate_seized_item(item: &NewSeizedItem) -> Result<(), CheckpostError> {
    if item.name.trim().is_empty() {
        return Err(CheckpostError::EmptySeizedItemName);
    }
    Ok(())
}

const DEFAULT_SEIZED_ITEMS: [(&str, &str); 5] = [
    (
        "Currency / Cash",
        "Cash, coins, and negotiable instruments seized during inspections.",
    ),
    (
        "Forest Produce / Timber",
        "Wood, timber, medicinal herbs, resin, and related forestry products.",
    ),
    (
        "Wildlife Products",
        "Ivory, skins, trophies, and other wildlife artefacts subject to regulation.",
    ),
    (
        "Vehicles / Machinery",
        "Vehicles, trailers, or heavy equipment impounded during enforcement actions.",
    ),
    (
        "Electronic Equipment",
        "Radios, phones, GPS units, and other electronic goods seized during checks.",
    ),
];

/// The default seized-item catalog.
pub fn default_seized_items() -> Vec<NewSeizedItem> {
    DEFAULT_SEIZED_ITEMS
        .iter()
        .map(|(name, description)| NewSeizedItem::new(*name).with_description(*description))
        .collect()
}

/// Default catalog entries whose names are not present yet, compared
/// case-insensitively after trimming.
pub fn missing_default_items(existing: &[SeizedItem]) -> Vec<NewSeizedItem> {
    let present: HashSet<String> = existing
        .iter()
        .map(|item| item.name.trim().to_lowercase())
        .collect();
    default_seized_items()
        .into_iter()
        .filter(|item| !present.contains(&item.name.trim().to_lowercase()))
        .collect()
}
