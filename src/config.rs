//! Support for library configuration options

use std::sync::{Arc, Mutex, PoisonError};
use once_cell::sync::Lazy;

/// How long before a task starts its reminder fires
pub const REMINDER_LEAD_MINUTES: i64 = 15;

/// The storage key the calendar tasks are persisted under
pub const TASKS_STORAGE_KEY: &str = "calendar-events";

/// Title of the system notifications sent when a reminder fires.
/// Feel free to override it when initing this library.
pub static NOTIFICATION_TITLE: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("Task Reminder".to_string())));

/// Author set on newly created wiki pages.
/// Feel free to override it when initing this library.
pub static DEFAULT_AUTHOR: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("John Doe".to_string())));

/// Returns the current value of a text setting
pub fn read_setting(setting: &Mutex<String>) -> String {
    setting.lock().unwrap_or_else(PoisonError::into_inner).clone()
}

/// Overrides a text setting
pub fn write_setting(setting: &Mutex<String>, value: &str) {
    *setting.lock().unwrap_or_else(PoisonError::into_inner) = value.to_string();
}
