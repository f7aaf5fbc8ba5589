//! Plants service
//!
//! Loads the plants record for the "my plants" screen, deletes plants
//! together with their reminders, and saves new plants with a freshly
//! scheduled reminder.

use crate::config::{PLANTS_KEY, USER_KEY};
use crate::database::{DisplayPlant, NewPlant, PlantList, PlantRecord, StoredPlant};
use crate::error::{DeleteError, Result};
use crate::services::formatting::DateFormatter;
use crate::services::scheduler::{NotificationRequest, NotificationScheduler};
use crate::storage::KeyValueStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Service for the plants record and its reminders
#[derive(Clone)]
pub struct PlantsService {
    store: Arc<dyn KeyValueStore>,
    notifications: Arc<dyn NotificationScheduler>,
    formatter: DateFormatter,
}

impl PlantsService {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        notifications: Arc<dyn NotificationScheduler>,
        formatter: DateFormatter,
    ) -> Self {
        Self {
            store,
            notifications,
            formatter,
        }
    }

    pub fn formatter(&self) -> &DateFormatter {
        &self.formatter
    }

    /// User name shown in the header, empty when never set
    pub async fn load_user_name(&self) -> Result<String> {
        let user = self.store.get_item(USER_KEY).await?;
        Ok(user.unwrap_or_default())
    }

    /// Store the trimmed name; a blank name clears it
    pub async fn save_user_name(&self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return self.store.remove_item(USER_KEY).await;
        }
        self.store.set_item(USER_KEY, name).await
    }

    async fn read_record(&self) -> Result<PlantRecord> {
        let raw = self.store.get_item(PLANTS_KEY).await?;
        PlantRecord::parse(raw.as_deref())
    }

    async fn write_record(&self, record: &PlantRecord) -> Result<()> {
        self.store.set_item(PLANTS_KEY, &record.to_json()?).await
    }

    /// Load the sorted plant rows and the spotlight message
    pub async fn load_plants(&self) -> Result<PlantList> {
        self.load_plants_at(Utc::now()).await
    }

    pub async fn load_plants_at(&self, now: DateTime<Utc>) -> Result<PlantList> {
        let record = self.read_record().await?;
        let list = build_plant_list(&record, &self.formatter, now);

        tracing::debug!(
            "Loaded {} plants, next watering: {:?}",
            list.plants.len(),
            list.plants.first().map(|p| p.id.as_str())
        );
        Ok(list)
    }

    /// Delete a plant and cancel its reminder.
    ///
    /// The record is read, the reminder cancelled, then the record written
    /// without the entry. A failed write leaves the entry stored with its
    /// reminder already cancelled; `DeleteError::Write` reports that.
    pub async fn delete_plant(&self, id: &str) -> std::result::Result<StoredPlant, DeleteError> {
        tracing::info!("Deleting plant: {}", id);

        let mut record = self.read_record().await.map_err(DeleteError::Read)?;

        let notification_id = record
            .get(id)
            .map(|plant| plant.notification_id.clone())
            .ok_or_else(|| DeleteError::NotFound(id.to_string()))?;

        self.notifications
            .cancel(&notification_id)
            .await
            .map_err(|source| DeleteError::CancelNotification {
                id: id.to_string(),
                source,
            })?;

        let removed = record
            .remove(id)
            .ok_or_else(|| DeleteError::NotFound(id.to_string()))?;

        if let Err(source) = self.write_record(&record).await {
            tracing::warn!(
                "Reminder {} for plant {} cancelled but record write failed",
                notification_id,
                id
            );
            return Err(DeleteError::Write {
                id: id.to_string(),
                source,
            });
        }

        tracing::info!("Plant deleted successfully: {}", id);
        Ok(removed)
    }

    /// Save a plant and schedule its next reminder
    pub async fn save_plant(&self, id: &str, plant: NewPlant) -> Result<StoredPlant> {
        self.save_plant_at(id, plant, Utc::now()).await
    }

    pub async fn save_plant_at(
        &self,
        id: &str,
        plant: NewPlant,
        now: DateTime<Utc>,
    ) -> Result<StoredPlant> {
        tracing::info!("Saving plant: {} ({})", id, plant.name);

        let interval = plant.frequency.interval()?;
        let next = now + interval;
        let mut record = self.read_record().await?;

        if let Some(previous) = record.get(id) {
            if let Err(e) = self.notifications.cancel(&previous.notification_id).await {
                tracing::warn!("Failed to cancel previous reminder for {}: {}", id, e);
            }
        }

        let notification_id = self
            .notifications
            .schedule(self.reminder_request(id, &plant.name, next))
            .await?;

        let stored = StoredPlant {
            name: plant.name,
            about: plant.about,
            water_tips: plant.water_tips,
            photo: plant.photo,
            date_time_notification: next,
            notification_id,
            frequency: plant.frequency,
        };
        record.insert(id.to_string(), stored.clone());

        if let Err(e) = self.write_record(&record).await {
            if let Err(cancel_err) = self.notifications.cancel(&stored.notification_id).await {
                tracing::error!("Failed to roll back reminder for {}: {}", id, cancel_err);
            }
            return Err(e);
        }

        tracing::info!("Plant saved: {}, next watering at {}", id, next);
        Ok(stored)
    }

    /// Re-schedule every stored reminder, rolling past-due ones forward.
    ///
    /// Returns how many reminders were scheduled.
    pub async fn restore_notifications(&self) -> Result<usize> {
        self.restore_notifications_at(Utc::now()).await
    }

    pub async fn restore_notifications_at(&self, now: DateTime<Utc>) -> Result<usize> {
        let mut record = self.read_record().await?;
        if record.is_empty() {
            return Ok(0);
        }

        let mut restored = 0;
        let mut failure = None;
        for (id, plant) in record.iter_mut() {
            let next = match plant.frequency.next_after(plant.date_time_notification, now) {
                Ok(next) => next,
                Err(e) => {
                    tracing::warn!("Skipping reminder for {}: {}", id, e);
                    continue;
                }
            };

            match self
                .notifications
                .schedule(self.reminder_request(id, &plant.name, next))
                .await
            {
                Ok(handle) => {
                    plant.date_time_notification = next;
                    plant.notification_id = handle;
                    restored += 1;
                }
                Err(e) => {
                    tracing::error!("Failed to restore reminder for {}: {}", id, e);
                    failure = Some(e);
                    break;
                }
            }
        }

        // Handles obtained before a failure are kept
        self.write_record(&record).await?;
        if let Some(e) = failure {
            return Err(e);
        }

        tracing::info!("Restored {} reminders", restored);
        Ok(restored)
    }

    /// Schedule the watering after a fired reminder and store its handle
    pub async fn reschedule_plant(&self, id: &str) -> Result<Option<StoredPlant>> {
        self.reschedule_plant_at(id, Utc::now()).await
    }

    pub async fn reschedule_plant_at(
        &self,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<StoredPlant>> {
        let mut record = self.read_record().await?;
        let Some(plant) = record.get(id).cloned() else {
            tracing::debug!("Fired reminder for removed plant {}", id);
            return Ok(None);
        };

        let next = plant.frequency.next_after(plant.date_time_notification, now)?;
        let notification_id = self
            .notifications
            .schedule(self.reminder_request(id, &plant.name, next))
            .await?;

        let updated = StoredPlant {
            date_time_notification: next,
            notification_id,
            ..plant
        };
        record.insert(id.to_string(), updated.clone());
        self.write_record(&record).await?;

        tracing::info!("Plant {} rescheduled for {}", id, next);
        Ok(Some(updated))
    }

    fn reminder_request(&self, id: &str, name: &str, at: DateTime<Utc>) -> NotificationRequest {
        let locale = self.formatter.locale();
        NotificationRequest {
            plant_id: id.to_string(),
            title: locale.strings().notification_title.to_string(),
            body: locale.notification_body(name),
            at,
        }
    }
}

/// Derive the sorted rows and spotlight message from a record
pub fn build_plant_list(
    record: &PlantRecord,
    formatter: &DateFormatter,
    now: DateTime<Utc>,
) -> PlantList {
    let mut plants: Vec<DisplayPlant> = record
        .iter()
        .map(|(id, plant)| DisplayPlant {
            id: id.clone(),
            name: plant.name.clone(),
            photo: plant.photo.clone(),
            about: plant.about.clone(),
            water_tips: plant.water_tips.clone(),
            day: formatter.day(plant.date_time_notification),
            hour: formatter.hour(plant.date_time_notification),
            date_time_notification: plant.date_time_notification,
        })
        .collect();

    // Second granularity, ties by id
    plants.sort_by(|a, b| {
        a.date_time_notification
            .timestamp()
            .cmp(&b.date_time_notification.timestamp())
            .then_with(|| a.id.cmp(&b.id))
    });

    let next_watered = plants
        .first()
        .map(|first| formatter.next_watering_message(&first.name, first.date_time_notification, now));

    PlantList {
        plants,
        next_watered,
    }
}
