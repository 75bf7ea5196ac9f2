use std::collections::HashMap;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use crate::calendar::to_reference_date_key;
use crate::serde::{
    deserialize_count, deserialize_nullable_string, deserialize_optional_string,
    deserialize_seized_items,
};

/// A monitored site. `circle` is the group label used for access scoping
/// and report grouping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpost {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub circle: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub division: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub range: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub address: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub phone_number: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub others_details: String,
}

impl Checkpost {
    /// Creates a checkpost with the given identity, name and circle.
    pub fn new(id: impl Into<String>, name: impl Into<String>, circle: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            circle: circle.into(),
            division: String::new(),
            range: String::new(),
            address: String::new(),
            phone_number: String::new(),
            latitude: None,
            longitude: None,
            others_details: String::new(),
        }
    }

    /// Sets the division and forest range.
    pub fn with_division(mut self, division: impl Into<String>, range: impl Into<String>) -> Self {
        self.division = division.into();
        self.range = range.into();
        self
    }

    /// Sets the coordinates.
    pub fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }
}

/// One calendar day of activity counters for a checkpost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLog {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub checkpost_id: String,
    /// ISO instant of reference-zone midnight for the logged day.
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub log_date: String,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub vehicles_checked_count: u64,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub vehicles_passed_count: u64,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub cases_registered_count: u64,
}

impl DailyLog {
    /// The reference-zone day this log belongs to, or an empty string if the
    /// stored date cannot be parsed.
    pub fn date_key(&self) -> String {
        to_reference_date_key(self.log_date.as_str())
    }

    /// The counters of this log as totals.
    pub fn totals(&self) -> CheckpostTotals {
        CheckpostTotals {
            vehicles: self.vehicles_checked_count,
            cases: self.cases_registered_count,
            passed: self.vehicles_passed_count,
        }
    }
}

/// One seizure line-item of a case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeizedItemEntry {
    pub item_id: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_string"
    )]
    pub custom_label: Option<String>,
}

impl SeizedItemEntry {
    /// Creates a line-item without weight or custom label.
    pub fn new(item_id: impl Into<String>, quantity: u32, value: f64) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
            value,
            weight: None,
            custom_label: None,
        }
    }

    /// Sets the weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Sets the free-text label used with the `others` catalog item.
    pub fn with_custom_label(mut self, label: impl Into<String>) -> Self {
        self.custom_label = Some(label.into());
        self
    }
}

/// An incident registered against a daily log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub log_id: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub case_number: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub vehicle_reg_number: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub engine_number: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub owner_name: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub owner_number: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub owner_license: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub driver_name: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub driver_number: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub driver_license: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub action_taken_name: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub action_taken_phone: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub action_taken_designation: String,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub accused_person_count: u64,
    #[serde(default, deserialize_with = "deserialize_seized_items")]
    pub seized_items: Vec<SeizedItemEntry>,
    #[serde(default)]
    pub seized_items_weight: f64,
}

impl Case {
    /// True when the owner and driver details are identical.
    pub fn owner_is_driver(&self) -> bool {
        self.owner_name == self.driver_name
            && self.owner_number == self.driver_number
            && self.owner_license == self.driver_license
    }
}

/// A catalog entry of seizable items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeizedItem {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub description: Option<String>,
}

/// Summed counters for one checkpost over a calendar range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CheckpostTotals {
    /// Vehicles checked.
    pub vehicles: u64,
    /// Cases registered.
    pub cases: u64,
    /// Vehicles passed.
    pub passed: u64,
}

impl CheckpostTotals {
    pub fn new(vehicles: u64, cases: u64, passed: u64) -> Self {
        Self {
            vehicles,
            cases,
            passed,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl Add for CheckpostTotals {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            vehicles: self.vehicles + other.vehicles,
            cases: self.cases + other.cases,
            passed: self.passed + other.passed,
        }
    }
}

impl AddAssign for CheckpostTotals {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sum for CheckpostTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Totals projection keyed by checkpost id.
pub type TotalsMap = HashMap<String, CheckpostTotals>;
