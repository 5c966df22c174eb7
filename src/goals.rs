//! Business goals, and how far along they are

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::projection::{FieldValue, Fields};
use crate::record::RecordId;
use crate::traits::Record;


#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    Revenue,
    Leads,
    Conversion,
    Other,
}

impl GoalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalKind::Revenue => "revenue",
            GoalKind::Leads => "leads",
            GoalKind::Conversion => "conversion",
            GoalKind::Other => "other",
        }
    }
}

/// The status a user sets on a goal. It is not derived from the progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    InProgress,
    Completed,
    AtRisk,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::InProgress => "in_progress",
            GoalStatus::Completed => "completed",
            GoalStatus::AtRisk => "at_risk",
        }
    }
}

/// How a goal is doing, according to its progress
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgressBand {
    /// At least 90% of the target
    OnTrack,
    /// At least 60% of the target
    Behind,
    Critical,
}


#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    id: RecordId,
    pub title: String,
    pub target: f64,
    pub current: f64,
    pub deadline: NaiveDate,
    #[serde(rename = "type")]
    pub kind: GoalKind,
    pub status: GoalStatus,
    pub description: String,
}

impl Goal {
    /// Create a goal, with a new random ID
    pub fn new(title: &str, target: f64, current: f64, deadline: NaiveDate, kind: GoalKind, status: GoalStatus, description: &str) -> Self {
        Self::with_id(RecordId::random(), title, target, current, deadline, kind, status, description)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn with_id(id: RecordId, title: &str, target: f64, current: f64, deadline: NaiveDate, kind: GoalKind, status: GoalStatus, description: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            target,
            current,
            deadline,
            kind,
            status,
            description: description.to_string(),
        }
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// Percentage of the target reached so far (may exceed 100).
    /// A goal with a zero target has no meaningful progress, and reports 0.
    pub fn progress(&self) -> f64 {
        if self.target == 0.0 {
            return 0.0;
        }
        self.current / self.target * 100.0
    }

    pub fn band(&self) -> ProgressBand {
        let progress = self.progress();
        if progress >= 90.0 {
            ProgressBand::OnTrack
        } else if progress >= 60.0 {
            ProgressBand::Behind
        } else {
            ProgressBand::Critical
        }
    }
}

impl Record for Goal {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Fields for Goal {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "title" => Some(FieldValue::Text(&self.title)),
            "target" => Some(FieldValue::Number(self.target)),
            "current" => Some(FieldValue::Number(self.current)),
            "progress" => Some(FieldValue::Number(self.progress())),
            "deadline" => Some(FieldValue::Date(self.deadline)),
            "type" => Some(FieldValue::Text(self.kind.as_str())),
            "status" => Some(FieldValue::Text(self.status.as_str())),
            "description" => Some(FieldValue::Text(&self.description)),
            _ => None,
        }
    }
}

/// The goals a new workspace starts with
pub fn sample_goals() -> Collection<Goal> {
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).expect("invalid sample date");
    vec![
        Goal::with_id(RecordId::from(1), "Q2 Revenue Target", 500000.0, 350000.0, date(2024, 6, 30),
                      GoalKind::Revenue, GoalStatus::InProgress, "Achieve $500K in revenue for Q2 2024"),
        Goal::with_id(RecordId::from(2), "New Lead Generation", 1000.0, 750.0, date(2024, 12, 31),
                      GoalKind::Leads, GoalStatus::InProgress, "Generate 1000 qualified leads by end of year"),
        Goal::with_id(RecordId::from(3), "Conversion Rate Optimization", 25.0, 22.0, date(2024, 9, 30),
                      GoalKind::Conversion, GoalStatus::AtRisk, "Improve conversion rate to 25%"),
    ].into_iter().collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bands() {
        let goals = sample_goals();
        let bands: Vec<ProgressBand> = goals.iter().map(|g| g.band()).collect();
        // 70%, 75%, 88%
        assert_eq!(bands, vec![ProgressBand::Behind, ProgressBand::Behind, ProgressBand::Behind]);

        let deadline = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let mut goal = Goal::new("Calls", 100.0, 90.0, deadline, GoalKind::Other, GoalStatus::InProgress, "");
        assert_eq!(goal.band(), ProgressBand::OnTrack);
        goal.current = 59.9;
        assert_eq!(goal.band(), ProgressBand::Critical);
        goal.current = 60.0;
        assert_eq!(goal.band(), ProgressBand::Behind);

        goal.target = 0.0;
        assert_eq!(goal.progress(), 0.0);
    }

    #[test]
    fn stored_form() {
        let json = serde_json::to_value(sample_goals()).unwrap();
        assert_eq!(json[2]["type"], "conversion");
        assert_eq!(json[2]["status"], "at_risk");
        assert_eq!(json[0]["deadline"], "2024-06-30");
    }
}
