//! Write payloads for checkpost records.
//!
//! These are pure data types with no I/O. Each serializes to the attribute
//! map stored in the backing collection.

use chrono::NaiveDate;
use serde::{ser, Deserialize, Serialize, Serializer};

use crate::calendar::{format_iso, reference_midnight};

use super::error::CheckpostError;
use super::types::{Case, SeizedItemEntry};

/// Catalog item id whose line-items carry a free-text label.
pub const OTHERS_ITEM_ID: &str = "others";

/// Payload for creating a checkpost.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCheckpost {
    pub name: String,
    pub circle: String,
    #[serde(default)]
    pub division: String,
    #[serde(default)]
    pub range: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub others_details: String,
}

impl NewCheckpost {
    pub fn new(name: impl Into<String>, circle: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            circle: circle.into(),
            ..Default::default()
        }
    }

    pub fn with_division(mut self, division: impl Into<String>, range: impl Into<String>) -> Self {
        self.division = division.into();
        self.range = range.into();
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = phone_number.into();
        self
    }

    pub fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }
}

/// The three daily counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLogCounts {
    pub vehicles_checked_count: u64,
    pub vehicles_passed_count: u64,
    pub cases_registered_count: u64,
}

impl DailyLogCounts {
    pub fn new(checked: u64, passed: u64, cases: u64) -> Self {
        Self {
            vehicles_checked_count: checked,
            vehicles_passed_count: passed,
            cases_registered_count: cases,
        }
    }
}

/// Payload for creating a daily log.
///
/// `date` is the reference-zone day; it is stored as the UTC instant of that
/// day's reference-zone midnight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDailyLog {
    pub checkpost_id: String,
    #[serde(rename = "logDate", serialize_with = "serialize_reference_midnight")]
    pub date: NaiveDate,
    #[serde(flatten)]
    pub counts: DailyLogCounts,
}

impl NewDailyLog {
    pub fn new(checkpost_id: impl Into<String>, date: NaiveDate, counts: DailyLogCounts) -> Self {
        Self {
            checkpost_id: checkpost_id.into(),
            date,
            counts,
        }
    }
}

fn serialize_reference_midnight<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let instant = reference_midnight(*date)
        .ok_or_else(|| ser::Error::custom(format!("date out of range: {date}")))?;
    serializer.serialize_str(&format_iso(instant))
}

/// Payload for registering or rewriting a case.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCase {
    pub case_number: String,
    #[serde(default)]
    pub vehicle_reg_number: String,
    #[serde(default)]
    pub engine_number: String,
    pub owner_name: String,
    pub owner_number: String,
    pub owner_license: String,
    /// When set, the driver details are copied from the owner.
    #[serde(default)]
    pub owner_is_driver: bool,
    #[serde(default)]
    pub driver_name: String,
    #[serde(default)]
    pub driver_number: String,
    #[serde(default)]
    pub driver_license: String,
    #[serde(default)]
    pub action_taken_name: String,
    #[serde(default)]
    pub action_taken_phone: String,
    #[serde(default)]
    pub action_taken_designation: String,
    #[serde(default)]
    pub accused_person_count: u64,
    #[serde(default)]
    pub seized_items: Vec<SeizedItemEntry>,
}

/// Stored shape of a case: line-items as a JSON string plus their total weight.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseRecord {
    pub log_id: String,
    pub case_number: String,
    pub vehicle_reg_number: String,
    pub engine_number: String,
    pub owner_name: String,
    pub owner_number: String,
    pub owner_license: String,
    pub driver_name: String,
    pub driver_number: String,
    pub driver_license: String,
    pub action_taken_name: String,
    pub action_taken_phone: String,
    pub action_taken_designation: String,
    pub accused_person_count: u64,
    pub seized_items: String,
    pub seized_items_weight: f64,
}

impl NewCase {
    /// Prefills the form payload from a stored case.
    pub fn from_case(case: &Case) -> Self {
        Self {
            case_number: case.case_number.clone(),
            vehicle_reg_number: case.vehicle_reg_number.clone(),
            engine_number: case.engine_number.clone(),
            owner_name: case.owner_name.clone(),
            owner_number: case.owner_number.clone(),
            owner_license: case.owner_license.clone(),
            owner_is_driver: case.owner_is_driver(),
            driver_name: case.driver_name.clone(),
            driver_number: case.driver_number.clone(),
            driver_license: case.driver_license.clone(),
            action_taken_name: case.action_taken_name.clone(),
            action_taken_phone: case.action_taken_phone.clone(),
            action_taken_designation: case.action_taken_designation.clone(),
            accused_person_count: case.accused_person_count,
            seized_items: case.seized_items.clone(),
        }
    }

    /// Line-items as they are stored: entries without an item id are dropped,
    /// and a custom label survives only on the `others` item.
    pub fn normalized_items(&self) -> Vec<SeizedItemEntry> {
        self.seized_items
            .iter()
            .filter(|entry| !entry.item_id.trim().is_empty())
            .map(|entry| {
                let custom_label = if entry.item_id == OTHERS_ITEM_ID {
                    entry
                        .custom_label
                        .as_deref()
                        .map(str::trim)
                        .filter(|label| !label.is_empty())
                        .map(str::to_string)
                } else {
                    None
                };
                SeizedItemEntry {
                    custom_label,
                    ..entry.clone()
                }
            })
            .collect()
    }

    /// Builds the stored record for this case under `log_id`.
    pub fn into_record(self, log_id: impl Into<String>) -> Result<CaseRecord, CheckpostError> {
        let log_id = log_id.into();
        if log_id.trim().is_empty() {
            return Err(CheckpostError::MissingLogId);
        }

        let items = self.normalized_items();
        let seized_items_weight = items.iter().filter_map(|item| item.weight).sum();
        let seized_items = serde_json::to_string(&items)
            .map_err(|err| CheckpostError::Encoding(err.to_string()))?;

        let (driver_name, driver_number, driver_license) = if self.owner_is_driver {
            (
                self.owner_name.clone(),
                self.owner_number.clone(),
                self.owner_license.clone(),
            )
        } else {
            (self.driver_name, self.driver_number, self.driver_license)
        };

        Ok(CaseRecord {
            log_id,
            case_number: self.case_number,
            vehicle_reg_number: self.vehicle_reg_number,
            engine_number: self.engine_number,
            owner_name: self.owner_name,
            owner_number: self.owner_number,
            owner_license: self.owner_license,
            driver_name,
            driver_number,
            driver_license,
            action_taken_name: self.action_taken_name,
            action_taken_phone: self.action_taken_phone,
            action_taken_designation: self.action_taken_designation,
            accused_person_count: self.accused_person_count,
            seized_items,
            seized_items_weight,
        })
    }
}

/// Payload for creating or renaming a seized-item catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSeizedItem {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewSeizedItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Trims both fields and drops a blank description.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: self
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
        }
    }
}
