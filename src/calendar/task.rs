//! Calendar tasks

use std::error::Error;

use chrono::{DateTime, Utc};
use csscolorparser::Color;
use serde::{Deserialize, Serialize};

use crate::calendar::Category;
use crate::priority::Priority;
use crate::projection::{FieldValue, Fields};
use crate::record::RecordId;
use crate::traits::Record;


/// What a user fills in when creating or editing a task
#[derive(Clone, Debug, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub reminder: bool,
    pub priority: Priority,
    pub category: Category,
    pub completed: bool,
}

impl TaskDraft {
    /// A draft with default values for everything but its title and time span
    pub fn new(title: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            title: title.to_string(),
            description: String::new(),
            start,
            end,
            reminder: false,
            priority: Priority::default(),
            category: Category::default(),
            completed: false,
        }
    }

    pub fn with_reminder(mut self, reminder: bool) -> Self {
        self.reminder = reminder;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }
}


/// A calendar task
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredTask")]
pub struct Task {
    /// Generated at creation, never changes
    id: RecordId,

    title: String,
    description: String,

    start: DateTime<Utc>,
    end: DateTime<Utc>,

    /// Whether a notification is sent before this task starts
    reminder: bool,
    priority: Priority,
    category: Category,
    completed: bool,

    /// The display color of `priority`. It is recomputed whenever the priority changes.
    color: Color,
}

/// The persisted form of a task. The color is a cache, it is recomputed rather than trusted.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTask {
    id: RecordId,
    title: String,
    #[serde(default)]
    description: String,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    #[serde(default)]
    reminder: bool,
    priority: Priority,
    category: Category,
    #[serde(default)]
    completed: bool,
}

impl From<StoredTask> for Task {
    fn from(stored: StoredTask) -> Self {
        if stored.end < stored.start {
            log::warn!("Stored task {} ends before it starts", stored.id);
        }
        Self {
            color: stored.priority.color(),
            id: stored.id,
            title: stored.title,
            description: stored.description,
            start: stored.start,
            end: stored.end,
            reminder: stored.reminder,
            priority: stored.priority,
            category: stored.category,
            completed: stored.completed,
        }
    }
}

impl Task {
    /// Create a brand new task. This will pick a new (random) task ID.
    pub fn new(draft: TaskDraft) -> Result<Self, Box<dyn Error>> {
        Self::new_with_id(RecordId::random(), draft)
    }

    /// Create a task with a known ID
    pub fn new_with_id(id: RecordId, draft: TaskDraft) -> Result<Self, Box<dyn Error>> {
        check_span(&draft.start, &draft.end)?;
        Ok(Self {
            id,
            title: draft.title,
            description: draft.description,
            start: draft.start,
            end: draft.end,
            reminder: draft.reminder,
            color: draft.priority.color(),
            priority: draft.priority,
            category: draft.category,
            completed: draft.completed,
        })
    }

    pub fn id(&self) -> &RecordId           { &self.id          }
    pub fn title(&self) -> &str             { &self.title       }
    pub fn description(&self) -> &str       { &self.description }
    pub fn start(&self) -> DateTime<Utc>    { self.start        }
    pub fn end(&self) -> DateTime<Utc>      { self.end          }
    pub fn reminder(&self) -> bool          { self.reminder     }
    pub fn priority(&self) -> Priority      { self.priority     }
    pub fn category(&self) -> Category      { self.category     }
    pub fn completed(&self) -> bool         { self.completed    }
    pub fn color(&self) -> &Color           { &self.color       }

    /// Returns a draft pre-filled with the current values of this task, e.g. to populate an edit form
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            start: self.start,
            end: self.end,
            reminder: self.reminder,
            priority: self.priority,
            category: self.category,
            completed: self.completed,
        }
    }

    /// Replace every field but the ID by the content of a draft
    pub fn apply(&mut self, draft: TaskDraft) -> Result<(), Box<dyn Error>> {
        let updated = Self::new_with_id(self.id.clone(), draft)?;
        *self = updated;
        Ok(())
    }

    pub fn set_title(&mut self, new_title: String) {
        self.title = new_title;
    }

    pub fn set_description(&mut self, new_description: String) {
        self.description = new_description;
    }

    /// Change the time span of this task. `end` cannot be before `start`.
    pub fn set_span(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), Box<dyn Error>> {
        check_span(&start, &end)?;
        self.start = start;
        self.end = end;
        Ok(())
    }

    pub fn set_reminder(&mut self, reminder: bool) {
        self.reminder = reminder;
    }

    /// Change the priority. This also updates the display color.
    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
        self.color = priority.color();
    }

    pub fn set_category(&mut self, category: Category) {
        self.category = category;
    }

    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }

    /// Flip the completion status, and return the new one
    pub fn toggle_completed(&mut self) -> bool {
        self.completed = !self.completed;
        self.completed
    }
}

fn check_span(start: &DateTime<Utc>, end: &DateTime<Utc>) -> Result<(), Box<dyn Error>> {
    if end < start {
        return Err(format!("A task cannot end ({}) before it starts ({})", end, start).into());
    }
    Ok(())
}

impl Record for Task {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Fields for Task {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "title" => Some(FieldValue::Text(&self.title)),
            "description" => Some(FieldValue::Text(&self.description)),
            "start" => Some(FieldValue::Time(self.start)),
            "end" => Some(FieldValue::Time(self.end)),
            "reminder" => Some(FieldValue::Flag(self.reminder)),
            "priority" => Some(FieldValue::Text(self.priority.as_str())),
            "category" => Some(FieldValue::Text(self.category.as_str())),
            "completed" => Some(FieldValue::Flag(self.completed)),
            _ => None,
        }
    }
}
