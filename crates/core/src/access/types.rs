use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::checkpost::Checkpost;

/// Account label that grants unrestricted visibility.
pub const ADMIN_LABEL: &str = "admin";

/// Group name used for checkposts with an empty circle.
pub const UNASSIGNED_CIRCLE: &str = "Unassigned";

/// What a caller is allowed to see.
///
/// `allowed_labels` are trimmed, lower-cased and never contain the admin
/// marker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerRole {
    pub is_admin: bool,
    pub allowed_labels: BTreeSet<String>,
}

impl CallerRole {
    /// An unrestricted caller.
    pub fn admin() -> Self {
        Self {
            is_admin: true,
            allowed_labels: BTreeSet::new(),
        }
    }

    /// A caller restricted to the given circle labels.
    pub fn restricted<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            is_admin: false,
            allowed_labels: normalize_labels(labels)
                .filter(|label| label != ADMIN_LABEL)
                .collect(),
        }
    }

    /// Builds a role from raw account labels. The admin marker, matched
    /// case-insensitively, makes the caller unrestricted.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut allowed_labels: BTreeSet<String> = normalize_labels(labels).collect();
        let is_admin = allowed_labels.remove(ADMIN_LABEL);
        Self {
            is_admin,
            allowed_labels,
        }
    }

    /// True if the caller may see a checkpost in `circle`.
    pub fn can_see(&self, circle: &str) -> bool {
        if self.is_admin {
            return true;
        }
        let label = circle.trim().to_lowercase();
        !label.is_empty() && self.allowed_labels.contains(&label)
    }
}

fn normalize_labels<I, S>(labels: I) -> impl Iterator<Item = String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    labels
        .into_iter()
        .map(|label| label.as_ref().trim().to_lowercase())
        .filter(|label| !label.is_empty())
}

/// Checkposts sharing a circle, in their original order.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleGroup {
    pub name: String,
    pub checkposts: Vec<Checkpost>,
}

impl CircleGroup {
    pub fn len(&self) -> usize {
        self.checkposts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkposts.is_empty()
    }
}
