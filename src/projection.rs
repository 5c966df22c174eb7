//! Read-only, filtered and sorted views over record collections
//!
//! A projection never modifies the records it is computed from: it returns references to them, in display order.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};


/// The value of a record field, as seen by filters and sorts
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(f64),
    Flag(bool),
    Date(NaiveDate),
    Time(DateTime<Utc>),
    List(&'a [String]),
}

/// Records that expose their fields by name, so that they can be filtered and sorted
pub trait Fields {
    /// Returns the value of a field, or `None` if this record has no such field
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;
}


/// A single condition a record must fulfill to be part of a projection
#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    /// Case-insensitive substring search over several fields. Matches if any field contains the needle.
    Search { needle: String, fields: Vec<String> },
    /// Exact equality of a text field
    Equals { field: String, value: String },
    /// A boolean field has the expected value
    Flag { field: String, expected: bool },
    /// A numeric field lies within inclusive bounds
    Range { field: String, min: Option<f64>, max: Option<f64> },
    /// The field (or one of its items, for list fields) is one of the given values
    AnyOf { field: String, values: Vec<String> },
}

impl Predicate {
    pub fn matches<T: Fields + ?Sized>(&self, record: &T) -> bool {
        match self {
            Predicate::Search { needle, fields } => {
                if needle.is_empty() {
                    return true;
                }
                let needle = needle.to_lowercase();
                fields.iter().any(|name| match record.field(name) {
                    Some(FieldValue::Text(text)) => text.to_lowercase().contains(&needle),
                    _ => false,
                })
            },
            Predicate::Equals { field, value } => {
                matches!(record.field(field), Some(FieldValue::Text(text)) if text == value)
            },
            Predicate::Flag { field, expected } => {
                matches!(record.field(field), Some(FieldValue::Flag(flag)) if flag == *expected)
            },
            Predicate::Range { field, min, max } => {
                if min.is_none() && max.is_none() {
                    return true;
                }
                match record.field(field) {
                    Some(FieldValue::Number(n)) => {
                        min.map_or(true, |min| n >= min) && max.map_or(true, |max| n <= max)
                    },
                    _ => false,
                }
            },
            Predicate::AnyOf { field, values } => {
                if values.is_empty() {
                    return true;
                }
                match record.field(field) {
                    Some(FieldValue::List(items)) => items.iter().any(|item| values.contains(item)),
                    Some(FieldValue::Text(text)) => values.iter().any(|v| v == text),
                    _ => false,
                }
            },
        }
    }
}


/// A set of predicates, that must all match
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter {
    predicates: Vec<Predicate>,
}

impl Filter {
    /// A filter that lets every record through
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn search(self, needle: &str, fields: &[&str]) -> Self {
        self.with(Predicate::Search {
            needle: needle.to_string(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        })
    }

    pub fn equals(self, field: &str, value: &str) -> Self {
        self.with(Predicate::Equals { field: field.to_string(), value: value.to_string() })
    }

    pub fn flag(self, field: &str, expected: bool) -> Self {
        self.with(Predicate::Flag { field: field.to_string(), expected })
    }

    pub fn range(self, field: &str, min: Option<f64>, max: Option<f64>) -> Self {
        self.with(Predicate::Range { field: field.to_string(), min, max })
    }

    pub fn any_of(self, field: &str, values: &[String]) -> Self {
        self.with(Predicate::AnyOf { field: field.to_string(), values: values.to_vec() })
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn matches<T: Fields + ?Sized>(&self, record: &T) -> bool {
        self.predicates.iter().all(|p| p.matches(record))
    }

    /// Keep the matching records, in their original order
    pub fn apply<'a, T, I>(&self, records: I) -> Vec<&'a T>
    where
        I: IntoIterator<Item = &'a T>,
        T: Fields + 'a,
    {
        records.into_iter().filter(|r| self.matches(*r)).collect()
    }
}


#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Which field a projection is sorted by, and in which direction
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    key: String,
    direction: SortDirection,
}

impl SortState {
    pub fn new(key: &str, direction: SortDirection) -> Self {
        Self { key: key.to_string(), direction }
    }

    pub fn ascending(key: &str) -> Self {
        Self::new(key, SortDirection::Ascending)
    }

    pub fn key(&self) -> &str              { &self.key }
    pub fn direction(&self) -> SortDirection { self.direction }

    /// Select a sort key, like a click on a column header does.
    ///
    /// Selecting the current key again reverses the direction, selecting another key sorts ascending by that key.
    pub fn toggle(&mut self, key: &str) {
        if self.key == key {
            self.direction = self.direction.reversed();
        } else {
            self.key = key.to_string();
            self.direction = SortDirection::Ascending;
        }
    }

    pub fn compare<T: Fields + ?Sized>(&self, left: &T, right: &T) -> Ordering {
        let ordering = compare_values(left.field(&self.key), right.field(&self.key));
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Compare two field values.
///
/// Values that cannot be meaningfully compared (missing fields, different types, flags, lists) are considered equal,
/// so that sorting keeps their relative order.
pub fn compare_values(left: Option<FieldValue<'_>>, right: Option<FieldValue<'_>>) -> Ordering {
    match (left, right) {
        (Some(FieldValue::Text(l)), Some(FieldValue::Text(r))) => locale_cmp(l, r),
        (Some(FieldValue::Number(l)), Some(FieldValue::Number(r))) => l.partial_cmp(&r).unwrap_or(Ordering::Equal),
        (Some(FieldValue::Date(l)), Some(FieldValue::Date(r))) => l.cmp(&r),
        (Some(FieldValue::Time(l)), Some(FieldValue::Time(r))) => l.cmp(&r),
        _ => Ordering::Equal,
    }
}

/// Compare strings the way humans expect in a list: case is ignored first, then lowercase sorts before uppercase.
pub fn locale_cmp(left: &str, right: &str) -> Ordering {
    let primary = Ord::cmp(&left.to_lowercase(), &right.to_lowercase());
    primary.then_with(|| Ord::cmp(right, left))
}

/// Compute the visible records: the ones that match `filter`, sorted according to `sort` (if any).
///
/// The sort is stable, records that compare equal keep their collection order.
pub fn project<'a, T, I>(records: I, filter: &Filter, sort: Option<&SortState>) -> Vec<&'a T>
where
    I: IntoIterator<Item = &'a T>,
    T: Fields + 'a,
{
    let mut visible = filter.apply(records);
    if let Some(sort) = sort {
        visible.sort_by(|l, r| sort.compare(*l, *r));
    }
    visible
}


#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        name: &'static str,
        amount: f64,
        done: bool,
        tags: Vec<String>,
    }

    impl Fields for Row {
        fn field(&self, name: &str) -> Option<FieldValue<'_>> {
            match name {
                "name" => Some(FieldValue::Text(self.name)),
                "amount" => Some(FieldValue::Number(self.amount)),
                "done" => Some(FieldValue::Flag(self.done)),
                "tags" => Some(FieldValue::List(&self.tags)),
                _ => None,
            }
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "banana", amount: 3.0, done: false, tags: vec!["fruit".into()] },
            Row { name: "Apple", amount: 10.0, done: true, tags: vec!["fruit".into(), "red".into()] },
            Row { name: "carrot", amount: 1.5, done: false, tags: vec!["vegetable".into()] },
        ]
    }

    fn names(rows: &[&Row]) -> Vec<&'static str> {
        rows.iter().map(|r| r.name).collect()
    }

    #[test]
    fn text_sort_ignores_case() {
        let rows = rows();
        let sorted = project(&rows, &Filter::new(), Some(&SortState::ascending("name")));
        assert_eq!(names(&sorted), vec!["Apple", "banana", "carrot"]);
    }

    #[test]
    fn numeric_sort_descending() {
        let rows = rows();
        let sort = SortState::new("amount", SortDirection::Descending);
        let sorted = project(&rows, &Filter::new(), Some(&sort));
        assert_eq!(names(&sorted), vec!["Apple", "banana", "carrot"]);
    }

    #[test]
    fn unsupported_keys_keep_the_order() {
        let rows = rows();
        for key in &["done", "tags", "no-such-field"] {
            let sorted = project(&rows, &Filter::new(), Some(&SortState::ascending(key)));
            assert_eq!(names(&sorted), vec!["banana", "Apple", "carrot"]);
        }
    }

    #[test]
    fn toggling() {
        let mut sort = SortState::ascending("name");
        sort.toggle("name");
        assert_eq!(sort.direction(), SortDirection::Descending);
        sort.toggle("amount");
        assert_eq!(sort, SortState::ascending("amount"));
        sort.toggle("amount");
        sort.toggle("amount");
        assert_eq!(sort, SortState::ascending("amount"));
    }

    #[test]
    fn predicates_combine_with_and() {
        let rows = rows();
        let filter = Filter::new()
            .search("A", &["name"])
            .flag("done", false)
            .any_of("tags", &["fruit".to_string()]);
        assert_eq!(names(&filter.apply(&rows)), vec!["banana"]);

        let filter = Filter::new().range("amount", Some(1.5), Some(3.0));
        assert_eq!(names(&filter.apply(&rows)), vec!["banana", "carrot"]);

        let filter = Filter::new().range("name", Some(1.0), None);
        assert!(filter.apply(&rows).is_empty());
    }

    #[test]
    fn empty_predicates_match_everything() {
        let rows = rows();
        let filter = Filter::new()
            .search("", &["name"])
            .range("amount", None, None)
            .any_of("tags", &[]);
        assert_eq!(filter.apply(&rows).len(), 3);
    }

    #[test]
    fn locale_ordering() {
        assert_eq!(locale_cmp("a", "B"), Ordering::Less);
        assert_eq!(locale_cmp("a", "A"), Ordering::Less);
        assert_eq!(locale_cmp("same", "same"), Ordering::Equal);
    }
}
