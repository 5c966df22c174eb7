//! This crate provides the business logic of a small CRM dashboard.
//!
//! Its core is the calendar: a [`TaskStore`](calendar::store::TaskStore) that persists tasks to a key-value [`Storage`](traits::Storage),
//! and a [`ReminderScheduler`](calendar::reminder::ReminderScheduler) that notifies the user 15 minutes before a task starts. \
//! Displayed lists are computed by the [`projection`] module, that filters and sorts any kind of record.
//!
//! The other entities of the dashboard (leads, communications, goals, kanban board cards, emails, wiki pages) are each kept in a
//! [`Collection`](collection::Collection), and the remote services the dashboard relies on are simulated in the [`services`] module.

pub mod traits;
pub mod config;

pub mod record;
pub use record::RecordId;
pub mod priority;
pub use priority::Priority;
pub mod collection;
pub use collection::Collection;
pub mod storage;
pub mod projection;

pub mod calendar;
pub use calendar::task::{Task, TaskDraft};
pub use calendar::store::TaskStore;
pub use calendar::reminder::ReminderScheduler;

pub mod board;
pub mod leads;
pub mod communications;
pub mod goals;
pub mod mail;
pub mod wiki;

pub mod services;
pub mod utils;
