//! A small mailbox: received messages, and the ones sent from it

use std::error::Error;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::projection::{project, FieldValue, Fields, Filter};
use crate::record::RecordId;
use crate::traits::{EmailSender, Record};


#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Email {
    id: RecordId,
    pub subject: String,
    pub to: String,
    pub from: String,
    pub content: String,
    pub date: NaiveDateTime,
    pub read: bool,
    pub starred: bool,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl Email {
    /// A new message, dated now. Messages written by the user are already read.
    pub fn compose(from: &str, to: &str, subject: &str, content: &str) -> Self {
        Self {
            id: RecordId::random(),
            subject: subject.to_string(),
            to: to.to_string(),
            from: from.to_string(),
            content: content.to_string(),
            date: Utc::now().naive_utc(),
            read: true,
            starred: false,
            labels: Vec::new(),
        }
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Record for Email {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Fields for Email {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "subject" => Some(FieldValue::Text(&self.subject)),
            "to" => Some(FieldValue::Text(&self.to)),
            "from" => Some(FieldValue::Text(&self.from)),
            "content" => Some(FieldValue::Text(&self.content)),
            "date" => Some(FieldValue::Time(self.date.and_utc())),
            "read" => Some(FieldValue::Flag(self.read)),
            "starred" => Some(FieldValue::Flag(self.starred)),
            "labels" => Some(FieldValue::List(&self.labels)),
            _ => None,
        }
    }
}


/// Which messages of the mailbox to show
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MailboxView {
    All,
    Starred,
    Unread,
}

impl Default for MailboxView {
    fn default() -> Self {
        MailboxView::All
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MailboxFilter {
    /// Searched in the subject and the content
    pub search: String,
    pub view: MailboxView,
}

impl MailboxFilter {
    pub fn to_filter(&self) -> Filter {
        let filter = Filter::new().search(&self.search, &["subject", "content"]);
        match self.view {
            MailboxView::All => filter,
            MailboxView::Starred => filter.flag("starred", true),
            MailboxView::Unread => filter.flag("read", false),
        }
    }
}


#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Mailbox {
    inbox: Collection<Email>,
    #[serde(default)]
    sent: Collection<Email>,
}

impl Mailbox {
    pub fn new(inbox: Collection<Email>) -> Self {
        Self { inbox, sent: Collection::new() }
    }

    pub fn inbox(&self) -> &Collection<Email> { &self.inbox }
    pub fn sent(&self) -> &Collection<Email>  { &self.sent  }

    /// Star or unstar a message. Returns whether it is now starred.
    pub fn toggle_starred(&mut self, id: &RecordId) -> Result<bool, Box<dyn Error>> {
        self.inbox.update_with(id, |email| {
            email.starred = !email.starred;
            email.starred
        })
    }

    pub fn mark_read(&mut self, id: &RecordId) -> Result<(), Box<dyn Error>> {
        self.inbox.update_with(id, |email| email.read = true)
    }

    /// Delete a received message, provided `confirm` agrees
    pub fn delete<F>(&mut self, id: &RecordId, confirm: F) -> Result<bool, Box<dyn Error>>
    where
        F: FnOnce(&Email) -> bool,
    {
        let removed = self.inbox.remove_confirmed(id, confirm)?.is_some();
        if removed {
            log::info!("Email {} deleted", id);
        }
        Ok(removed)
    }

    pub fn view(&self, filter: &MailboxFilter) -> Vec<&Email> {
        project(&self.inbox, &filter.to_filter(), None)
    }

    /// Send a message through `sender`. It is kept in the sent messages only if it has actually been sent.
    pub async fn send<E>(&mut self, sender: &E, email: Email) -> Result<RecordId, Box<dyn Error>>
    where
        E: EmailSender + ?Sized,
    {
        sender.send(&email.to, &email.subject, &email.content).await
            .map_err(|err| format!("Unable to send email to {}: {}", email.to, err))?;
        let id = email.id().clone();
        self.sent.insert(email)?;
        log::info!("Email {} sent", id);
        Ok(id)
    }
}

/// The messages a new workspace starts with
pub fn sample_inbox() -> Collection<Email> {
    let date = NaiveDate::from_ymd_opt(2024, 3, 20)
        .and_then(|day| day.and_hms_opt(10, 0, 0))
        .expect("invalid sample date");
    vec![
        Email {
            id: RecordId::from(1),
            subject: "Project Update Meeting".to_string(),
            to: "team@company.com".to_string(),
            from: "john@company.com".to_string(),
            content: "Let's discuss the project progress...".to_string(),
            date,
            read: true,
            starred: false,
            labels: vec!["work".to_string(), "important".to_string()],
        },
    ].into_iter().collect()
}
