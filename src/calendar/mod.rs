//! The calendar: tasks with a start and an end, and reminders that fire before they start

pub mod task;
pub mod notify;
pub mod reminder;
pub mod store;

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::priority::Priority;
use crate::projection::Filter;

/// The kind of a calendar task
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Meeting,
    Call,
    Deadline,
    #[serde(rename = "Follow-up")]
    FollowUp,
    Personal,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Meeting,
        Category::Call,
        Category::Deadline,
        Category::FollowUp,
        Category::Personal,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Meeting => "Meeting",
            Category::Call => "Call",
            Category::Deadline => "Deadline",
            Category::FollowUp => "Follow-up",
            Category::Personal => "Personal",
            Category::Other => "Other",
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Meeting
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("Unknown category {:?}", s).into())
    }
}


/// Which tasks to show, according to their completion
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompletionFilter {
    All,
    Completed,
    Pending,
}

impl Default for CompletionFilter {
    fn default() -> Self {
        CompletionFilter::All
    }
}

/// The filters of the calendar view. `None` means "all".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskFilter {
    pub priority: Option<Priority>,
    pub category: Option<Category>,
    pub completion: CompletionFilter,
}

impl TaskFilter {
    pub fn to_filter(&self) -> Filter {
        let mut filter = Filter::new();
        if let Some(priority) = self.priority {
            filter = filter.equals("priority", priority.as_str());
        }
        if let Some(category) = self.category {
            filter = filter.equals("category", category.as_str());
        }
        match self.completion {
            CompletionFilter::All => filter,
            CompletionFilter::Completed => filter.flag("completed", true),
            CompletionFilter::Pending => filter.flag("completed", false),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_names() {
        assert_eq!(serde_json::to_string(&Category::FollowUp).unwrap(), "\"Follow-up\"");
        assert_eq!("follow-up".parse::<Category>().unwrap(), Category::FollowUp);
        assert!("Lunch".parse::<Category>().is_err());
    }

    #[test]
    fn default_filter_lets_everything_through() {
        assert!(TaskFilter::default().to_filter().predicates().is_empty());
        let filter = TaskFilter {
            priority: Some(Priority::High),
            category: None,
            completion: CompletionFilter::Pending,
        };
        assert_eq!(filter.to_filter().predicates().len(), 2);
    }
}
