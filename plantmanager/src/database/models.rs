//! Plant models
//!
//! The persisted plants record and the derived, render-ready rows.
//! All stored models use serde with the field names the record is
//! written with.

use crate::config::MAX_WATERINGS_PER_UNIT;
use crate::error::{AppError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type PlantId = String;

/// Unit a watering frequency repeats over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatUnit {
    #[default]
    Day,
    Week,
}

/// How often a plant is watered: `times` per `repeat_every`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frequency {
    pub times: u32,
    pub repeat_every: RepeatUnit,
}

impl Default for Frequency {
    fn default() -> Self {
        Self {
            times: 1,
            repeat_every: RepeatUnit::Day,
        }
    }
}

impl Frequency {
    /// Time between two waterings
    pub fn interval(&self) -> Result<Duration> {
        if self.times == 0 || self.times > MAX_WATERINGS_PER_UNIT {
            return Err(AppError::InvalidFrequency(format!(
                "times must be between 1 and {}, got {}",
                MAX_WATERINGS_PER_UNIT, self.times
            )));
        }

        let unit = match self.repeat_every {
            RepeatUnit::Day => Duration::days(1),
            RepeatUnit::Week => Duration::weeks(1),
        };

        Ok(unit / self.times as i32)
    }

    /// First watering strictly after `now`, stepping from `from`
    pub fn next_after(&self, from: DateTime<Utc>, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        let interval = self.interval()?;
        if from > now {
            return Ok(from);
        }

        let behind = (now - from).num_seconds();
        let step = interval.num_seconds().max(1);
        let steps = behind / step + 1;
        Ok(from + Duration::seconds(steps * step))
    }
}

/// A plant as persisted under the plants key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPlant {
    #[serde(default)]
    pub name: String,
    /// Care description
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub water_tips: String,
    #[serde(default)]
    pub photo: String,
    #[serde(rename = "dateTimeNotification")]
    pub date_time_notification: DateTime<Utc>,
    /// Handle of the scheduled reminder, needed to cancel it
    #[serde(rename = "notificationId")]
    pub notification_id: String,
    #[serde(default)]
    pub frequency: Frequency,
}

/// Plant fields supplied when saving a new plant
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPlant {
    pub name: String,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub water_tips: String,
    #[serde(default)]
    pub photo: String,
    #[serde(default)]
    pub frequency: Frequency,
}

/// The full plants record, keyed by plant id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlantRecord {
    entries: BTreeMap<PlantId, StoredPlant>,
}

impl PlantRecord {
    /// Parse the stored value. An absent value is an empty record.
    ///
    /// Entries are decoded one by one so a failure names the bad entry.
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        let Some(raw) = raw else {
            return Ok(Self::default());
        };

        let values: BTreeMap<PlantId, serde_json::Value> = serde_json::from_str(raw)?;
        let mut entries = BTreeMap::new();

        for (id, value) in values {
            let plant = serde_json::from_value::<StoredPlant>(value)
                .map_err(|source| AppError::MalformedPlant {
                    id: id.clone(),
                    source,
                })?;
            entries.insert(id, plant);
        }

        Ok(Self { entries })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.entries)?)
    }

    pub fn get(&self, id: &str) -> Option<&StoredPlant> {
        self.entries.get(id)
    }

    pub fn insert(&mut self, id: PlantId, plant: StoredPlant) -> Option<StoredPlant> {
        self.entries.insert(id, plant)
    }

    pub fn remove(&mut self, id: &str) -> Option<StoredPlant> {
        self.entries.remove(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PlantId, &StoredPlant)> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&PlantId, &mut StoredPlant)> {
        self.entries.iter_mut()
    }
}

impl FromIterator<(PlantId, StoredPlant)> for PlantRecord {
    fn from_iter<I: IntoIterator<Item = (PlantId, StoredPlant)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Render-ready plant row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayPlant {
    pub id: PlantId,
    pub name: String,
    pub photo: String,
    pub about: String,
    pub water_tips: String,
    /// Day and month in the user's locale
    pub day: String,
    /// Hour and minute in the user's locale
    pub hour: String,
    pub date_time_notification: DateTime<Utc>,
}

/// Result of loading the plants screen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlantList {
    /// Ascending by watering time; the first entry is the soonest
    pub plants: Vec<DisplayPlant>,
    /// None when there are no plants
    pub next_watered: Option<String>,
}
