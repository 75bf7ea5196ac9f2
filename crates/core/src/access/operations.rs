use std::collections::BTreeMap;

use crate::checkpost::Checkpost;

use super::types::{CallerRole, CircleGroup, UNASSIGNED_CIRCLE};

/// Returns the checkposts visible to `caller`, preserving order.
///
/// Admins see everything. A restricted caller sees a checkpost only if its
/// trimmed, lower-cased circle is non-empty and among the allowed labels.
pub fn filter_accessible<'a>(caller: &CallerRole, checkposts: &'a [Checkpost]) -> Vec<&'a Checkpost> {
    checkposts
        .iter()
        .filter(|checkpost| caller.can_see(&checkpost.circle))
        .collect()
}

/// Groups checkposts by trimmed circle, sorted by group name.
///
/// Blank circles fall into the `Unassigned` group. Casing is preserved, so
/// `North` and `north` form separate groups.
pub fn group_by_circle<'a>(checkposts: impl IntoIterator<Item = &'a Checkpost>) -> Vec<CircleGroup> {
    let mut groups: BTreeMap<String, Vec<Checkpost>> = BTreeMap::new();
    for checkpost in checkposts {
        let circle = checkpost.circle.trim();
        let name = if circle.is_empty() {
            UNASSIGNED_CIRCLE
        } else {
            circle
        };
        groups
            .entry(name.to_string())
            .or_default()
            .push(checkpost.clone());
    }
    groups
        .into_iter()
        .map(|(name, checkposts)| CircleGroup { name, checkposts })
        .collect()
}
