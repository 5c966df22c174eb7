//! Wiki pages, grouped in spaces

use std::error::Error;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::config;
use crate::projection::{FieldValue, Fields, Filter};
use crate::record::RecordId;
use crate::traits::Record;


#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WikiPage {
    id: RecordId,
    pub title: String,
    /// Rich text, as HTML
    pub content: String,
    last_modified: NaiveDate,
    author: String,
    pub space: String,
    pub starred: bool,
}

impl WikiPage {
    /// A new page, written today by the default author (see [`config::DEFAULT_AUTHOR`])
    pub fn create(title: &str, content: &str, space: &str) -> Self {
        Self {
            id: RecordId::random(),
            title: title.to_string(),
            content: content.to_string(),
            last_modified: Utc::now().date_naive(),
            author: config::read_setting(&config::DEFAULT_AUTHOR),
            space: space.to_string(),
            starred: false,
        }
    }

    pub fn id(&self) -> &RecordId            { &self.id           }
    pub fn last_modified(&self) -> NaiveDate { self.last_modified }
    pub fn author(&self) -> &str             { &self.author       }

    /// Replace the content of this page, and mark it as modified today
    pub fn edit(&mut self, title: &str, content: &str) {
        self.title = title.to_string();
        self.content = content.to_string();
        self.last_modified = Utc::now().date_naive();
    }
}

impl Record for WikiPage {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Fields for WikiPage {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "title" => Some(FieldValue::Text(&self.title)),
            "content" => Some(FieldValue::Text(&self.content)),
            "lastModified" => Some(FieldValue::Date(self.last_modified)),
            "author" => Some(FieldValue::Text(&self.author)),
            "space" => Some(FieldValue::Text(&self.space)),
            "starred" => Some(FieldValue::Flag(self.starred)),
            _ => None,
        }
    }
}

/// Pages whose title or content contain `search`
pub fn search_filter(search: &str) -> Filter {
    Filter::new().search(search, &["title", "content"])
}

/// Star or unstar a page. Returns whether it is now starred.
pub fn toggle_starred(pages: &mut Collection<WikiPage>, id: &RecordId) -> Result<bool, Box<dyn Error>> {
    pages.update_with(id, |page| {
        page.starred = !page.starred;
        page.starred
    })
}

/// The pages a new workspace starts with
pub fn sample_pages() -> Collection<WikiPage> {
    vec![
        WikiPage {
            id: RecordId::from(1),
            title: "Project Documentation".to_string(),
            content: "<h1>Project Overview</h1><p>This document outlines...</p>".to_string(),
            last_modified: NaiveDate::from_ymd_opt(2024, 3, 20).expect("invalid sample date"),
            author: "John Doe".to_string(),
            space: "Engineering".to_string(),
            starred: false,
        },
    ].into_iter().collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Mutex, PoisonError};

    use crate::projection::project;

    /// Serializes the tests that depend on the default author
    static AUTHOR_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn new_pages() {
        let _guard = AUTHOR_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let page = WikiPage::create("Onboarding", "<p>Welcome</p>", "HR");
        assert_eq!(page.author(), "John Doe");
        assert_eq!(page.last_modified(), Utc::now().date_naive());
        assert_eq!(page.starred, false);

        let mut pages = sample_pages();
        let id = page.id().clone();
        pages.insert(page).unwrap();
        assert_eq!(toggle_starred(&mut pages, &id).unwrap(), true);
        assert!(toggle_starred(&mut pages, &RecordId::from("nope")).is_err());
    }

    #[test]
    fn default_author_can_be_overridden() {
        let _guard = AUTHOR_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = config::read_setting(&config::DEFAULT_AUTHOR);

        config::write_setting(&config::DEFAULT_AUTHOR, "Jane Roe");
        let page = WikiPage::create("Release notes", "<p>v2</p>", "Engineering");
        config::write_setting(&config::DEFAULT_AUTHOR, &previous);

        assert_eq!(page.author(), "Jane Roe");
        assert_eq!(config::read_setting(&config::DEFAULT_AUTHOR), previous);
        assert_eq!(WikiPage::create("Other", "", "HR").author(), previous);
    }

    #[test]
    fn search_title_and_content() {
        let mut pages = sample_pages();
        pages.insert(WikiPage::create("Holidays", "<p>Ask your manager</p>", "HR")).unwrap();

        let titles = |filter: &Filter| -> Vec<String> {
            project(&pages, filter, None).iter().map(|p| p.title.clone()).collect()
        };
        assert_eq!(titles(&search_filter("overview")), vec!["Project Documentation"]);
        assert_eq!(titles(&search_filter("holi")), vec!["Holidays"]);
        assert_eq!(titles(&search_filter("")).len(), 2);
    }

    #[test]
    fn edits_update_the_date() {
        let mut page = sample_pages().at(0).unwrap().clone();
        page.edit("Project Docs", "<p>Updated</p>");
        assert_eq!(page.title, "Project Docs");
        assert_eq!(page.last_modified(), Utc::now().date_naive());
    }
}
