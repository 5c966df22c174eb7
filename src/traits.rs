use std::error::Error;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::record::RecordId;
use crate::calendar::notify::Permission;
use crate::services::analytics::{DailyMetrics, Timeframe};
use crate::services::booking::{BookingRequest, BookingSlot};

/// Anything that can be kept in a [`Collection`](crate::collection::Collection)
pub trait Record {
    /// Returns the identifier of this record. It must never change during the life of the record.
    fn id(&self) -> &RecordId;
}

/// A key-value blob store, which holds the state that survives between sessions
pub trait Storage {
    /// Returns the value stored under `key`, or `None` if there is nothing there
    fn get(&self, key: &str) -> Result<Option<String>, Box<dyn Error>>;
    /// Overwrite the value stored under `key`
    fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn Error>>;
    /// Forget the value stored under `key` (this is not an error if there was none)
    fn remove(&mut self, key: &str) -> Result<(), Box<dyn Error>>;
}

/// Delivers fired reminders to the user
pub trait Notifier: Send + Sync {
    /// Ask the platform for the right to show system notifications.
    /// This is called once, when a task store is opened.
    fn request_permission(&self) -> Permission;
    /// The current permission status. This is checked every time a reminder fires.
    fn permission(&self) -> Permission;

    /// Show a transient, in-app notice
    fn notice(&self, message: &str);
    /// Show a system notification (only called when the permission has been granted)
    fn system_notification(&self, title: &str, body: &str);
}

#[async_trait]
pub trait EmailSender {
    /// Send a message to a single recipient
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), Box<dyn Error>>;
}

#[async_trait]
pub trait BookingService {
    /// Returns the bookable slots of a given day
    async fn available_slots(&self, date: NaiveDate) -> Result<Vec<BookingSlot>, Box<dyn Error>>;
    /// Book a slot. This may fail, in which case the caller is expected to tell the user.
    async fn book(&self, request: &BookingRequest) -> Result<(), Box<dyn Error>>;
}

#[async_trait]
pub trait AnalyticsFeed {
    /// Returns one entry per day of the timeframe, most recent first
    async fn analytics(&self, timeframe: Timeframe) -> Result<Vec<DailyMetrics>, Box<dyn Error>>;
}
