//! The log of calls, emails, meetings and chats with contacts

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::projection::{FieldValue, Fields, Filter, SortDirection, SortState};
use crate::record::RecordId;
use crate::traits::Record;


/// How a contact was reached
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommunicationKind {
    Email,
    Call,
    Meeting,
    Chat,
}

impl CommunicationKind {
    pub const ALL: [CommunicationKind; 4] = [
        CommunicationKind::Email,
        CommunicationKind::Call,
        CommunicationKind::Meeting,
        CommunicationKind::Chat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommunicationKind::Email => "email",
            CommunicationKind::Call => "call",
            CommunicationKind::Meeting => "meeting",
            CommunicationKind::Chat => "chat",
        }
    }
}

impl Display for CommunicationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CommunicationKind {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("Unknown communication type {:?}", s).into())
    }
}


#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommunicationStatus {
    Completed,
    Scheduled,
    Missed,
}

impl CommunicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommunicationStatus::Completed => "completed",
            CommunicationStatus::Scheduled => "scheduled",
            CommunicationStatus::Missed => "missed",
        }
    }

    /// The name of the color of the status badge
    pub fn color_name(&self) -> &'static str {
        match self {
            CommunicationStatus::Completed => "green",
            CommunicationStatus::Scheduled => "blue",
            CommunicationStatus::Missed => "red",
        }
    }
}

impl Display for CommunicationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}


/// An exchange with a contact, past or planned
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Communication {
    id: RecordId,
    #[serde(rename = "type")]
    pub kind: CommunicationKind,
    pub contact: String,
    pub subject: String,
    pub date: NaiveDateTime,
    pub status: CommunicationStatus,
    /// Free text, such as "30 mins"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Communication {
    /// A new entry of the log, with a new random ID
    pub fn new(kind: CommunicationKind, contact: &str, subject: &str, date: NaiveDateTime, status: CommunicationStatus) -> Self {
        Self {
            id: RecordId::random(),
            kind,
            contact: contact.to_string(),
            subject: subject.to_string(),
            date,
            status,
            duration: None,
            notes: None,
        }
    }

    pub fn with_duration(mut self, duration: &str) -> Self {
        self.duration = Some(duration.to_string());
        self
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Record for Communication {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Fields for Communication {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "type" => Some(FieldValue::Text(self.kind.as_str())),
            "contact" => Some(FieldValue::Text(&self.contact)),
            "subject" => Some(FieldValue::Text(&self.subject)),
            "date" => Some(FieldValue::Time(self.date.and_utc())),
            "status" => Some(FieldValue::Text(self.status.as_str())),
            "duration" => self.duration.as_deref().map(FieldValue::Text),
            "notes" => self.notes.as_deref().map(FieldValue::Text),
            _ => None,
        }
    }
}


/// The filters of the communication log. Empty or `None` values let everything through.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommunicationFilter {
    /// Looked up in the contact and the subject
    pub search: String,
    pub kind: Option<CommunicationKind>,
}

impl CommunicationFilter {
    pub fn to_filter(&self) -> Filter {
        let filter = Filter::new()
            .search(&self.search, &["contact", "subject"]);
        match self.kind {
            None => filter,
            Some(kind) => filter.equals("type", kind.as_str()),
        }
    }
}

/// The log is listed most recent first until the user picks another sort
pub fn default_sort() -> SortState {
    SortState::new("date", SortDirection::Descending)
}

/// The communications a new workspace starts with
pub fn sample_communications() -> Collection<Communication> {
    let at = |day: u32, hour: u32, minute: u32| -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .and_then(|date| date.and_hms_opt(hour, minute, 0))
            .expect("invalid sample date")
    };
    let entry = |id: u64, kind, contact: &str, subject: &str, date, status| {
        Communication {
            id: RecordId::from(id),
            ..Communication::new(kind, contact, subject, date, status)
        }
    };

    vec![
        entry(1, CommunicationKind::Call, "John Doe", "Initial Discussion", at(15, 10, 0), CommunicationStatus::Completed)
            .with_duration("30 mins")
            .with_notes("Discussed project requirements"),
        entry(2, CommunicationKind::Email, "Sarah Johnson", "Proposal Follow-up", at(14, 15, 30), CommunicationStatus::Completed)
            .with_notes("Sent revised proposal"),
        entry(3, CommunicationKind::Meeting, "Michael Brown", "Product Demo", at(16, 14, 0), CommunicationStatus::Scheduled)
            .with_duration("1 hour"),
    ].into_iter().collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    use crate::projection::project;

    fn contacts<'a>(entries: &[&'a Communication]) -> Vec<&'a str> {
        entries.iter().map(|entry| entry.contact.as_str()).collect()
    }

    #[test]
    fn kinds() {
        assert_eq!("Meeting".parse::<CommunicationKind>().unwrap(), CommunicationKind::Meeting);
        assert!("fax".parse::<CommunicationKind>().is_err());
        assert_eq!(CommunicationStatus::Missed.color_name(), "red");
    }

    #[test]
    fn search_contact_and_subject() {
        let log = sample_communications();

        let filter = CommunicationFilter { search: "sarah".to_string(), ..CommunicationFilter::default() };
        assert_eq!(contacts(&project(&log, &filter.to_filter(), None)), vec!["Sarah Johnson"]);

        let filter = CommunicationFilter { search: "DEMO".to_string(), ..CommunicationFilter::default() };
        assert_eq!(contacts(&project(&log, &filter.to_filter(), None)), vec!["Michael Brown"]);

        // Notes are not searched
        let filter = CommunicationFilter { search: "requirements".to_string(), ..CommunicationFilter::default() };
        assert!(project(&log, &filter.to_filter(), None).is_empty());
    }

    #[test]
    fn type_filter() {
        let log = sample_communications();

        let filter = CommunicationFilter { kind: Some(CommunicationKind::Call), ..CommunicationFilter::default() };
        assert_eq!(contacts(&project(&log, &filter.to_filter(), None)), vec!["John Doe"]);

        let filter = CommunicationFilter { search: "o".to_string(), kind: Some(CommunicationKind::Chat) };
        assert!(project(&log, &filter.to_filter(), None).is_empty());

        assert_eq!(project(&log, &CommunicationFilter::default().to_filter(), None).len(), 3);
    }

    #[test]
    fn default_order_is_most_recent_first() {
        let log = sample_communications();
        let visible = project(&log, &Filter::new(), Some(&default_sort()));
        assert_eq!(contacts(&visible), vec!["Michael Brown", "John Doe", "Sarah Johnson"]);

        let mut sort = default_sort();
        sort.toggle("date");
        let visible = project(&log, &Filter::new(), Some(&sort));
        assert_eq!(contacts(&visible), vec!["Sarah Johnson", "John Doe", "Michael Brown"]);

        sort.toggle("contact");
        let visible = project(&log, &Filter::new(), Some(&sort));
        assert_eq!(contacts(&visible), vec!["John Doe", "Michael Brown", "Sarah Johnson"]);
    }

    #[test]
    fn new_entries() {
        let date = NaiveDate::from_ymd_opt(2024, 4, 2).unwrap().and_hms_opt(9, 0, 0).unwrap();
        let mut log = sample_communications();
        let entry = Communication::new(CommunicationKind::Chat, "Ada", "Quick question", date, CommunicationStatus::Missed);
        assert_eq!(entry.field("duration"), None);
        log.insert(entry).unwrap();
        assert_eq!(log.len(), 4);
    }

    #[test]
    fn stored_form() {
        let json = serde_json::to_value(sample_communications()).unwrap();
        assert_eq!(json[0]["type"], "call");
        assert_eq!(json[0]["status"], "completed");
        assert_eq!(json[0]["duration"], "30 mins");
        assert!(json[1].get("duration").is_none());
        assert_eq!(json[2]["date"], "2024-03-16T14:00:00");

        let back: Collection<Communication> = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample_communications());
    }
}
