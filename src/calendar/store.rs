//! This module provides the store that owns the calendar tasks

use std::error::Error;

use chrono::Utc;

use crate::calendar::reminder::ReminderScheduler;
use crate::calendar::task::{Task, TaskDraft};
use crate::calendar::TaskFilter;
use crate::collection::Collection;
use crate::config::TASKS_STORAGE_KEY;
use crate::projection::{project, SortState};
use crate::record::RecordId;
use crate::storage::{load_records, save_records};
use crate::traits::Storage;


/// The single owner of the calendar tasks.
///
/// Every change is saved to the backing storage, then the reminders of every task are re-evaluated.
pub struct TaskStore<S: Storage> {
    tasks: Collection<Task>,
    storage: S,
    reminders: ReminderScheduler,
}

impl<S: Storage> TaskStore<S> {
    /// Load the tasks from a storage (an absent or invalid value means "no tasks"),
    /// ask for the notification permission, and schedule the reminders.
    pub fn open(storage: S, reminders: ReminderScheduler) -> Self {
        let tasks: Collection<Task> = load_records(&storage, TASKS_STORAGE_KEY);
        log::info!("Loaded {} calendar tasks", tasks.len());

        let permission = reminders.request_permission();
        log::debug!("Notification permission: {:?}", permission);

        let mut store = Self { tasks, storage, reminders };
        store.reminders.reschedule_all(store.tasks.iter(), Utc::now());
        store
    }

    pub fn tasks(&self) -> &Collection<Task> {
        &self.tasks
    }

    pub fn get(&self, id: &RecordId) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn reminders(&self) -> &ReminderScheduler {
        &self.reminders
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Add a new task. Returns its (newly generated) ID.
    pub fn create(&mut self, draft: TaskDraft) -> Result<RecordId, Box<dyn Error>> {
        let task = Task::new(draft)?;
        let id = task.id().clone();
        self.tasks.insert(task)?;
        log::info!("Task {} added", id);
        self.commit();
        Ok(id)
    }

    /// Replace the content of an existing task
    pub fn update(&mut self, id: &RecordId, draft: TaskDraft) -> Result<(), Box<dyn Error>> {
        self.edit(id, |task| task.apply(draft))
    }

    /// Change an existing task. Nothing is changed if `change` fails.
    pub fn edit<F>(&mut self, id: &RecordId, change: F) -> Result<(), Box<dyn Error>>
    where
        F: FnOnce(&mut Task) -> Result<(), Box<dyn Error>>,
    {
        let mut task = self.tasks.get(id)
            .cloned()
            .ok_or_else(|| format!("No task with id {}", id))?;
        change(&mut task)?;
        self.tasks.replace(task)?;
        log::info!("Task {} updated", id);
        self.commit();
        Ok(())
    }

    /// Flip the completion status of a task, and return the new one
    pub fn toggle_complete(&mut self, id: &RecordId) -> Result<bool, Box<dyn Error>> {
        let completed = self.tasks.update_with(id, |task| task.toggle_completed())?;
        log::info!("Task {} marked as {}", id, if completed { "completed" } else { "incomplete" });
        self.commit();
        Ok(completed)
    }

    /// Delete a task, provided `confirm` agrees. Returns whether the task has been deleted.
    pub fn delete<F>(&mut self, id: &RecordId, confirm: F) -> Result<bool, Box<dyn Error>>
    where
        F: FnOnce(&Task) -> bool,
    {
        match self.tasks.remove_confirmed(id, confirm)? {
            None => Ok(false),
            Some(_) => {
                log::info!("Task {} deleted", id);
                self.commit();
                Ok(true)
            },
        }
    }

    /// The tasks to display for a given filter, in collection order unless a sort is given
    pub fn view(&self, filter: &TaskFilter, sort: Option<&SortState>) -> Vec<&Task> {
        project(&self.tasks, &filter.to_filter(), sort)
    }

    /// Save the tasks to the backing storage, and re-evaluate the reminders
    fn commit(&mut self) {
        save_records(&mut self.storage, TASKS_STORAGE_KEY, &self.tasks);
        self.reminders.reschedule_all(self.tasks.iter(), Utc::now());
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use chrono::Duration;

    use crate::calendar::notify::{ChannelNotifier, Permission};
    use crate::calendar::{Category, CompletionFilter};
    use crate::priority::Priority;
    use crate::storage::MemoryStorage;

    fn store() -> TaskStore<MemoryStorage> {
        let (notifier, _receiver) = ChannelNotifier::new(Permission::Denied);
        let scheduler = ReminderScheduler::new(Arc::new(notifier)).unwrap();
        TaskStore::open(MemoryStorage::new(), scheduler)
    }

    fn draft(title: &str, hours_from_now: i64) -> TaskDraft {
        let start = Utc::now() + Duration::hours(hours_from_now);
        TaskDraft::new(title, start, start + Duration::minutes(30))
    }

    #[tokio::test]
    async fn every_change_is_saved() {
        let mut store = store();
        assert!(store.tasks().is_empty());
        assert_eq!(store.storage().get(TASKS_STORAGE_KEY).unwrap(), None);

        let id = store.create(draft("Call Mom", 2)).unwrap();
        let saved = store.storage().get(TASKS_STORAGE_KEY).unwrap().unwrap();
        assert!(saved.contains("Call Mom"));

        assert_eq!(store.toggle_complete(&id).unwrap(), true);
        let saved = store.storage().get(TASKS_STORAGE_KEY).unwrap().unwrap();
        assert!(saved.contains("\"completed\":true"));

        assert_eq!(store.delete(&id, |_| true).unwrap(), true);
        assert_eq!(store.storage().get(TASKS_STORAGE_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn declined_deletion_changes_nothing() {
        let mut store = store();
        let id = store.create(draft("Quarterly review", 24)).unwrap();
        assert_eq!(store.delete(&id, |_| false).unwrap(), false);
        assert!(store.get(&id).is_some());
        assert!(store.delete(&RecordId::from("unknown"), |_| true).is_err());
    }

    #[tokio::test]
    async fn invalid_edits_are_rejected() {
        let mut store = store();
        let id = store.create(draft("Quarterly review", 24)).unwrap();

        let mut invalid = store.get(&id).unwrap().to_draft();
        invalid.end = invalid.start - Duration::hours(1);
        assert!(store.update(&id, invalid).is_err());
        assert_eq!(store.get(&id).unwrap().title(), "Quarterly review");

        let mut backwards = draft("Backwards", 3);
        backwards.end = backwards.start - Duration::minutes(1);
        assert!(store.create(backwards).is_err());
        assert_eq!(store.tasks().len(), 1);
    }

    #[tokio::test]
    async fn view_filters_tasks() {
        let mut store = store();
        store.create(draft("Standup", 1).with_priority(Priority::High)).unwrap();
        let call = store.create(draft("Call supplier", 2).with_category(Category::Call)).unwrap();
        store.create(draft("Write report", 3).with_priority(Priority::High).with_category(Category::Deadline)).unwrap();
        store.toggle_complete(&call).unwrap();

        let high = TaskFilter { priority: Some(Priority::High), ..TaskFilter::default() };
        let titles: Vec<&str> = store.view(&high, None).iter().map(|t| t.title()).collect();
        assert_eq!(titles, vec!["Standup", "Write report"]);

        let done = TaskFilter { completion: CompletionFilter::Completed, ..TaskFilter::default() };
        let titles: Vec<&str> = store.view(&done, None).iter().map(|t| t.title()).collect();
        assert_eq!(titles, vec!["Call supplier"]);

        let sort = SortState::new("start", crate::projection::SortDirection::Descending);
        let titles: Vec<&str> = store.view(&TaskFilter::default(), Some(&sort)).iter().map(|t| t.title()).collect();
        assert_eq!(titles, vec!["Write report", "Call supplier", "Standup"]);
    }
}
