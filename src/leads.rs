//! Sales leads, and the pipeline stages they go through

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::projection::{FieldValue, Fields, Filter, SortDirection, SortState};
use crate::record::RecordId;
use crate::traits::Record;


/// The stages of the sales pipeline, in order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeadStage {
    #[serde(rename = "New Leads")]
    NewLeads,
    Contacted,
    Qualified,
    Proposal,
    Negotiation,
    Closed,
}

impl LeadStage {
    pub const ALL: [LeadStage; 6] = [
        LeadStage::NewLeads,
        LeadStage::Contacted,
        LeadStage::Qualified,
        LeadStage::Proposal,
        LeadStage::Negotiation,
        LeadStage::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStage::NewLeads => "New Leads",
            LeadStage::Contacted => "Contacted",
            LeadStage::Qualified => "Qualified",
            LeadStage::Proposal => "Proposal",
            LeadStage::Negotiation => "Negotiation",
            LeadStage::Closed => "Closed",
        }
    }

    /// The name of the color this stage is displayed with
    pub fn color_name(&self) -> &'static str {
        match self {
            LeadStage::NewLeads => "blue",
            LeadStage::Contacted => "purple",
            LeadStage::Qualified => "green",
            LeadStage::Proposal => "orange",
            LeadStage::Negotiation => "pink",
            LeadStage::Closed => "gray",
        }
    }
}

impl Default for LeadStage {
    fn default() -> Self {
        LeadStage::NewLeads
    }
}

impl Display for LeadStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LeadStage {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.iter()
            .find(|stage| stage.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("Unknown lead stage {:?}", s).into())
    }
}


/// What a user fills in when adding a lead
#[derive(Clone, Debug, PartialEq)]
pub struct LeadDraft {
    pub name: String,
    pub score: u32,
    pub title: String,
    pub value: f64,
    pub probability: String,
    pub company: String,
    pub date: NaiveDate,
    pub email: String,
    pub phone: String,
    pub last_contact: NaiveDate,
    pub notes: String,
}

/// A potential customer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    id: RecordId,
    pub name: String,
    pub score: u32,
    pub title: String,
    pub value: f64,
    /// Free text, such as "25%"
    pub probability: String,
    pub company: String,
    pub date: NaiveDate,
    pub email: String,
    pub phone: String,
    pub status: LeadStage,
    pub last_contact: NaiveDate,
    pub notes: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Lead {
    /// Create a lead from a draft. New leads always start in the first stage, without tags.
    pub fn new(id: RecordId, draft: LeadDraft) -> Self {
        Self {
            id,
            name: draft.name,
            score: draft.score,
            title: draft.title,
            value: draft.value,
            probability: draft.probability,
            company: draft.company,
            date: draft.date,
            email: draft.email,
            phone: draft.phone,
            status: LeadStage::NewLeads,
            last_contact: draft.last_contact,
            notes: draft.notes,
            tags: Vec::new(),
        }
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Record for Lead {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Fields for Lead {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "name" => Some(FieldValue::Text(&self.name)),
            "score" => Some(FieldValue::Number(self.score as f64)),
            "title" => Some(FieldValue::Text(&self.title)),
            "value" => Some(FieldValue::Number(self.value)),
            "probability" => Some(FieldValue::Text(&self.probability)),
            "company" => Some(FieldValue::Text(&self.company)),
            "date" => Some(FieldValue::Date(self.date)),
            "email" => Some(FieldValue::Text(&self.email)),
            "phone" => Some(FieldValue::Text(&self.phone)),
            "status" => Some(FieldValue::Text(self.status.as_str())),
            "lastContact" => Some(FieldValue::Date(self.last_contact)),
            "notes" => Some(FieldValue::Text(&self.notes)),
            "tags" => Some(FieldValue::List(&self.tags)),
            _ => None,
        }
    }
}


/// Returns the id a new lead gets: one more than the largest numeric id in use
pub fn next_id(leads: &Collection<Lead>) -> RecordId {
    let max = leads.ids()
        .filter_map(|id| id.as_number())
        .max()
        .unwrap_or(0);
    RecordId::from(max + 1)
}

/// Add a new lead to a collection. Returns its id.
pub fn add_lead(leads: &mut Collection<Lead>, draft: LeadDraft) -> Result<RecordId, Box<dyn Error>> {
    let id = next_id(leads);
    leads.insert(Lead::new(id.clone(), draft))?;
    log::info!("Lead {} added", id);
    Ok(id)
}

/// How many leads are in every stage, in pipeline order
pub fn stage_counts(leads: &Collection<Lead>) -> Vec<(LeadStage, usize)> {
    LeadStage::ALL.iter()
        .map(|stage| (*stage, leads.iter().filter(|lead| lead.status == *stage).count()))
        .collect()
}


/// The shortcuts displayed on a lead card
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuickAction {
    Email,
    Call,
    Meeting,
}

impl QuickAction {
    /// The URI to open for this action. Meetings are not linked to anything, they have none.
    pub fn uri(&self, lead: &Lead) -> Option<String> {
        match self {
            QuickAction::Email => Some(format!("mailto:{}", lead.email)),
            QuickAction::Call => Some(format!("tel:{}", lead.phone)),
            QuickAction::Meeting => None,
        }
    }
}


/// The filters of the lead list. Empty or `None` values let everything through.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LeadFilter {
    pub search: String,
    pub status: Option<LeadStage>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub min_score: Option<f64>,
    pub max_score: Option<f64>,
    /// A lead matches if it has any of these tags
    pub tags: Vec<String>,
}

impl LeadFilter {
    pub fn to_filter(&self) -> Filter {
        let mut filter = Filter::new()
            .search(&self.search, &["name", "company", "email"]);
        if let Some(status) = self.status {
            filter = filter.equals("status", status.as_str());
        }
        filter
            .range("value", self.min_value, self.max_value)
            .range("score", self.min_score, self.max_score)
            .any_of("tags", &self.tags)
    }
}

/// Leads are listed newest first until the user picks another sort
pub fn default_sort() -> SortState {
    SortState::new("date", SortDirection::Descending)
}

/// The leads a new workspace starts with
pub fn sample_leads() -> Collection<Lead> {
    let lead = |id: u64, name: &str, score: u32, title: &str, value: f64, probability: &str, company: &str,
                day: u32, email: &str, phone: &str, status: LeadStage, notes: &str, tags: &[&str]| {
        let date = NaiveDate::from_ymd_opt(2024, 3, day).expect("invalid sample date");
        Lead {
            id: RecordId::from(id),
            name: name.to_string(),
            score,
            title: title.to_string(),
            value,
            probability: probability.to_string(),
            company: company.to_string(),
            date,
            email: email.to_string(),
            phone: phone.to_string(),
            status,
            last_contact: date.pred_opt().unwrap_or(date),
            notes: notes.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    };

    vec![
        lead(1, "John Doe", 85, "Tech Lead", 25000.0, "25%", "Software Inc", 15,
             "john@softwareinc.com", "+1 (555) 123-4567", LeadStage::NewLeads,
             "Interested in enterprise solution", &["software", "enterprise"]),
        lead(2, "Sarah Johnson", 92, "Marketing Pro", 15000.0, "40%", "Marketing Hub", 14,
             "sarah@marketinghub.com", "+1 (555) 234-5678", LeadStage::Contacted,
             "Follow up on pricing discussion", &["marketing", "smb"]),
        lead(3, "Michael Brown", 78, "Sales Director", 50000.0, "60%", "Tech Solutions", 13,
             "michael@techsolutions.com", "+1 (555) 345-6789", LeadStage::Qualified,
             "Ready for proposal", &["tech", "enterprise"]),
    ].into_iter().collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    use crate::projection::project;

    fn draft(name: &str) -> LeadDraft {
        let date = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        LeadDraft {
            name: name.to_string(),
            score: 50,
            title: "CTO".to_string(),
            value: 1000.0,
            probability: "10%".to_string(),
            company: "Acme".to_string(),
            date,
            email: "cto@acme.test".to_string(),
            phone: "+1 555 0000".to_string(),
            last_contact: date,
            notes: String::new(),
        }
    }

    fn names<'a>(leads: &[&'a Lead]) -> Vec<&'a str> {
        leads.iter().map(|lead| lead.name.as_str()).collect()
    }

    #[test]
    fn ids_are_sequential() {
        let mut leads = sample_leads();
        let id = add_lead(&mut leads, draft("Ada")).unwrap();
        assert_eq!(id.as_str(), "4");

        let added = leads.get(&id).unwrap();
        assert_eq!(added.status, LeadStage::NewLeads);
        assert!(added.tags.is_empty());

        let mut empty = Collection::new();
        assert_eq!(add_lead(&mut empty, draft("Grace")).unwrap().as_str(), "1");
    }

    #[test]
    fn counts_per_stage() {
        let counts = stage_counts(&sample_leads());
        assert_eq!(counts.len(), 6);
        assert_eq!(counts[0], (LeadStage::NewLeads, 1));
        assert_eq!(counts[2], (LeadStage::Qualified, 1));
        assert_eq!(counts[5], (LeadStage::Closed, 0));
    }

    #[test]
    fn quick_actions() {
        let leads = sample_leads();
        let john = leads.get(&RecordId::from(1)).unwrap();
        assert_eq!(QuickAction::Email.uri(john).unwrap(), "mailto:john@softwareinc.com");
        assert_eq!(QuickAction::Call.uri(john).unwrap(), "tel:+1 (555) 123-4567");
        assert_eq!(QuickAction::Meeting.uri(john), None);
    }

    #[test]
    fn filters_combine() {
        let leads = sample_leads();

        let filter = LeadFilter { search: "TECH".to_string(), ..LeadFilter::default() };
        assert_eq!(names(&project(&leads, &filter.to_filter(), None)), vec!["Michael Brown"]);

        let filter = LeadFilter { tags: vec!["enterprise".to_string()], ..LeadFilter::default() };
        assert_eq!(names(&project(&leads, &filter.to_filter(), None)), vec!["John Doe", "Michael Brown"]);

        let filter = LeadFilter {
            tags: vec!["enterprise".to_string()],
            min_score: Some(80.0),
            ..LeadFilter::default()
        };
        assert_eq!(names(&project(&leads, &filter.to_filter(), None)), vec!["John Doe"]);

        let filter = LeadFilter { max_value: Some(25000.0), status: Some(LeadStage::Contacted), ..LeadFilter::default() };
        assert_eq!(names(&project(&leads, &filter.to_filter(), None)), vec!["Sarah Johnson"]);
    }

    #[test]
    fn default_order_is_newest_first() {
        let leads = sample_leads();
        let visible = project(&leads, &LeadFilter::default().to_filter(), Some(&default_sort()));
        assert_eq!(names(&visible), vec!["John Doe", "Sarah Johnson", "Michael Brown"]);

        let mut sort = default_sort();
        sort.toggle("value");
        let visible = project(&leads, &Filter::new(), Some(&sort));
        assert_eq!(names(&visible), vec!["Sarah Johnson", "John Doe", "Michael Brown"]);
    }

    #[test]
    fn stored_form() {
        let json = serde_json::to_value(sample_leads()).unwrap();
        assert_eq!(json[0]["status"], "New Leads");
        assert_eq!(json[0]["lastContact"], "2024-03-14");
        assert_eq!(json[1]["id"], "2");
    }
}
