//! One-shot reminders, fired a while before calendar tasks start
//!
//! Every scheduled reminder is tracked by the ID of its task, so that it can be cancelled or moved when the task changes.

use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::calendar::notify::Permission;
use crate::calendar::task::Task;
use crate::config::{self, REMINDER_LEAD_MINUTES};
use crate::record::RecordId;
use crate::traits::Notifier;


/// Returns when the reminder of a task should fire, if it should fire at all.
///
/// A reminder is due for tasks that are not completed, have their reminder enabled and start in the future.
/// It fires `lead_time` before the start. If that instant has already passed (the task starts too soon), no reminder fires.
pub fn fire_time(task: &Task, now: DateTime<Utc>, lead_time: Duration) -> Option<DateTime<Utc>> {
    if task.reminder() == false || task.completed() {
        return None;
    }
    if task.start() <= now {
        return None;
    }
    let fire_at = task.start() - lead_time;
    if fire_at > now {
        Some(fire_at)
    } else {
        None
    }
}


struct PendingReminder {
    fire_at: DateTime<Utc>,
    title: String,
    handle: JoinHandle<()>,
}

/// Keeps one timer per task that needs a reminder
pub struct ReminderScheduler {
    notifier: Arc<dyn Notifier>,
    runtime: Handle,
    lead_time: Duration,
    pending: HashMap<RecordId, PendingReminder>,
}

impl ReminderScheduler {
    /// Create a scheduler. This must be called from within a tokio runtime, that will run the timers.
    pub fn new(notifier: Arc<dyn Notifier>) -> Result<Self, Box<dyn Error>> {
        let runtime = Handle::try_current()
            .map_err(|err| format!("Reminders need a tokio runtime: {}", err))?;
        Ok(Self {
            notifier,
            runtime,
            lead_time: Duration::minutes(REMINDER_LEAD_MINUTES),
            pending: HashMap::new(),
        })
    }

    /// Fire reminders `lead_time` before tasks start, instead of the default 15 minutes
    pub fn with_lead_time(mut self, lead_time: Duration) -> Self {
        self.lead_time = lead_time;
        self
    }

    pub fn lead_time(&self) -> Duration {
        self.lead_time
    }

    /// Ask the notifier for the right to send system notifications
    pub fn request_permission(&self) -> Permission {
        self.notifier.request_permission()
    }

    /// Re-evaluate every task of a collection.
    ///
    /// Timers of tasks that are not in `tasks` any more are cancelled.
    pub fn reschedule_all<'a, I>(&mut self, tasks: I, now: DateTime<Utc>)
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let mut seen = HashSet::new();
        for task in tasks {
            seen.insert(task.id().clone());
            self.reschedule(task, now);
        }

        let vanished: Vec<RecordId> = self.pending.keys()
            .filter(|id| seen.contains(*id) == false)
            .cloned()
            .collect();
        for id in vanished {
            self.cancel(&id);
        }
    }

    /// Make sure the timer of a task matches its current state.
    ///
    /// A timer that already targets the right instant (and title) is left alone, so that a reminder fires at most once.
    pub fn reschedule(&mut self, task: &Task, now: DateTime<Utc>) {
        let fire_at = match fire_time(task, now, self.lead_time) {
            None => {
                self.cancel(task.id());
                return;
            },
            Some(fire_at) => fire_at,
        };

        if let Some(existing) = self.pending.get(task.id()) {
            if existing.fire_at == fire_at && existing.title == task.title() {
                return;
            }
        }
        self.cancel(task.id());

        let delay = (fire_at - now).to_std().unwrap_or_default();
        let notifier = Arc::clone(&self.notifier);
        let title = task.title().to_string();
        let lead_minutes = self.lead_time.num_minutes();
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            deliver(notifier.as_ref(), &title, lead_minutes);
        });

        log::debug!("Reminder for task {} scheduled at {}", task.id(), fire_at);
        self.pending.insert(task.id().clone(), PendingReminder {
            fire_at,
            title: task.title().to_string(),
            handle,
        });
    }

    /// Cancel the reminder of a task. Returns whether there was a reminder still waiting to fire.
    pub fn cancel(&mut self, id: &RecordId) -> bool {
        match self.pending.remove(id) {
            None => false,
            Some(reminder) => {
                let was_waiting = reminder.handle.is_finished() == false;
                reminder.handle.abort();
                if was_waiting {
                    log::debug!("Reminder for task {} cancelled", id);
                }
                was_waiting
            },
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, reminder) in self.pending.drain() {
            reminder.handle.abort();
        }
    }

    /// Whether a reminder for this task is waiting to fire
    pub fn is_scheduled(&self, id: &RecordId) -> bool {
        self.pending.get(id)
            .map(|reminder| reminder.handle.is_finished() == false)
            .unwrap_or(false)
    }

    /// Returns the reminders that are waiting to fire, soonest first
    pub fn scheduled(&self) -> Vec<(RecordId, DateTime<Utc>)> {
        let mut scheduled: Vec<(RecordId, DateTime<Utc>)> = self.pending.iter()
            .filter(|(_, reminder)| reminder.handle.is_finished() == false)
            .map(|(id, reminder)| (id.clone(), reminder.fire_at))
            .collect();
        scheduled.sort_by(|l, r| l.1.cmp(&r.1));
        scheduled
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

fn deliver(notifier: &dyn Notifier, title: &str, lead_minutes: i64) {
    log::info!("Reminder fired for \"{}\"", title);
    notifier.notice(&format!("Reminder: {} starts in {} minutes", title, lead_minutes));

    // The permission may have changed since the reminder was scheduled
    if notifier.permission() == Permission::Granted {
        let heading = config::read_setting(&config::NOTIFICATION_TITLE);
        notifier.system_notification(&heading, &format!("Your task \"{}\" starts in {} minutes", title, lead_minutes));
    }
}
