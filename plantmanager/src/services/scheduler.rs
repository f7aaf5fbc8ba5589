//! Notification scheduler
//!
//! Schedules one-shot watering reminders and cancels them by handle.
//! `LocalNotificationScheduler` runs the reminders in-process on a
//! `tokio-cron-scheduler` job scheduler and hands fired reminders to the UI
//! through a channel.

use crate::error::{AppError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio_cron_scheduler::{Job, JobScheduler};
use uuid::Uuid;

/// A reminder to deliver at a given instant
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationRequest {
    pub plant_id: String,
    pub title: String,
    pub body: String,
    pub at: DateTime<Utc>,
}

/// A reminder that has been delivered
#[derive(Debug, Clone, PartialEq)]
pub struct FiredNotification {
    pub handle: String,
    pub plant_id: String,
    pub title: String,
    pub body: String,
}

/// Schedules reminders and cancels them by the handle `schedule` returned
#[async_trait]
pub trait NotificationScheduler: Send + Sync {
    async fn schedule(&self, request: NotificationRequest) -> Result<String>;

    async fn cancel(&self, handle: &str) -> Result<()>;
}

/// In-process scheduler backed by one-shot jobs
pub struct LocalNotificationScheduler {
    scheduler: Arc<RwLock<JobScheduler>>,
    fired_tx: mpsc::UnboundedSender<FiredNotification>,
}

impl LocalNotificationScheduler {
    /// Create the scheduler and the receiver of fired reminders
    pub async fn new() -> Result<(Self, mpsc::UnboundedReceiver<FiredNotification>)> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::Scheduler(format!("Failed to create scheduler: {}", e)))?;
        let (fired_tx, fired_rx) = mpsc::unbounded_channel();

        Ok((
            Self {
                scheduler: Arc::new(RwLock::new(scheduler)),
                fired_tx,
            },
            fired_rx,
        ))
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<()> {
        let scheduler = self.scheduler.read().await;
        scheduler
            .start()
            .await
            .map_err(|e| AppError::Scheduler(format!("Failed to start scheduler: {}", e)))?;
        tracing::info!("Notification scheduler started");
        Ok(())
    }

    /// Shutdown scheduler gracefully
    pub async fn shutdown(&self) -> Result<()> {
        let mut scheduler = self.scheduler.write().await;
        scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::Scheduler(format!("Failed to shutdown scheduler: {}", e)))?;
        tracing::info!("Notification scheduler shutdown");
        Ok(())
    }
}

/// Delay until `at`, at least one second
fn delay_until(at: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (at - now)
        .to_std()
        .unwrap_or(Duration::ZERO)
        .max(Duration::from_secs(1))
}

#[async_trait]
impl NotificationScheduler for LocalNotificationScheduler {
    async fn schedule(&self, request: NotificationRequest) -> Result<String> {
        let delay = delay_until(request.at, Utc::now());
        let fired_tx = self.fired_tx.clone();
        let payload = request.clone();

        let job = Job::new_one_shot_async(delay, move |uuid, _l| {
            let fired_tx = fired_tx.clone();
            let payload = payload.clone();
            Box::pin(async move {
                tracing::info!("Reminder fired for plant {} ({})", payload.plant_id, uuid);
                let fired = FiredNotification {
                    handle: uuid.to_string(),
                    plant_id: payload.plant_id,
                    title: payload.title,
                    body: payload.body,
                };
                if fired_tx.send(fired).is_err() {
                    tracing::warn!("No receiver for fired reminder {}", uuid);
                }
            })
        })
        .map_err(|e| AppError::Scheduler(format!("Failed to create reminder job: {}", e)))?;

        let scheduler = self.scheduler.read().await;
        let job_id = scheduler
            .add(job)
            .await
            .map_err(|e| AppError::Scheduler(format!("Failed to schedule reminder: {}", e)))?;

        tracing::info!(
            "Reminder {} scheduled for plant {} at {} (in {:?})",
            job_id,
            request.plant_id,
            request.at,
            delay
        );
        Ok(job_id.to_string())
    }

    async fn cancel(&self, handle: &str) -> Result<()> {
        let job_id = Uuid::parse_str(handle)
            .map_err(|e| AppError::Scheduler(format!("Invalid reminder handle '{}': {}", handle, e)))?;

        let scheduler = self.scheduler.read().await;
        scheduler
            .remove(&job_id)
            .await
            .map_err(|e| AppError::Scheduler(format!("Failed to remove reminder: {}", e)))?;

        tracing::info!("Reminder {} cancelled", job_id);
        Ok(())
    }
}

/// Scheduler that only records calls; used as a test double
#[derive(Default)]
pub struct RecordingScheduler {
    scheduled: Mutex<Vec<NotificationRequest>>,
    cancelled: Mutex<Vec<String>>,
    fail_cancel: std::sync::atomic::AtomicBool,
    /// Schedules accepted before failing; 0 never fails
    fail_schedule_after: std::sync::atomic::AtomicUsize,
}

impl RecordingScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_cancel(&self, fail: bool) {
        self.fail_cancel
            .store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    /// Reject every `schedule` call after the first `accepted` ones
    pub fn fail_schedule_after(&self, accepted: usize) {
        self.fail_schedule_after
            .store(accepted, std::sync::atomic::Ordering::SeqCst);
    }

    pub async fn scheduled(&self) -> Vec<NotificationRequest> {
        self.scheduled.lock().await.clone()
    }

    pub async fn cancelled(&self) -> Vec<String> {
        self.cancelled.lock().await.clone()
    }
}

#[async_trait]
impl NotificationScheduler for RecordingScheduler {
    async fn schedule(&self, request: NotificationRequest) -> Result<String> {
        let mut scheduled = self.scheduled.lock().await;
        let limit = self
            .fail_schedule_after
            .load(std::sync::atomic::Ordering::SeqCst);
        if limit > 0 && scheduled.len() >= limit {
            return Err(AppError::Scheduler(format!(
                "cannot schedule reminder for {}",
                request.plant_id
            )));
        }
        scheduled.push(request);
        Ok(format!("notification-{}", scheduled.len()))
    }

    async fn cancel(&self, handle: &str) -> Result<()> {
        if self.fail_cancel.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(AppError::Scheduler(format!("cannot cancel {}", handle)));
        }
        self.cancelled.lock().await.push(handle.to_string());
        Ok(())
    }
}
