//! An ordered set of records of one type, keyed by their id
//!
//! Every kind of record of this crate (calendar tasks, leads, communications, goals, board cards, emails, wiki pages)
//! is kept in a [`Collection`], so that they all share the same create/replace/delete semantics.

use std::error::Error;
use std::iter::FromIterator;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::record::RecordId;
use crate::traits::Record;


/// An insertion-ordered collection of records.
///
/// Lookups, replacements and deletions by id do not need to scan the collection.
/// Deletions keep the relative order of the remaining records.
#[derive(Clone, Debug)]
pub struct Collection<T> {
    records: IndexMap<RecordId, T>,
}

/// Two collections are equal when they hold the same records in the same order
impl<T: PartialEq> PartialEq for Collection<T> {
    fn eq(&self, other: &Self) -> bool {
        self.records.len() == other.records.len()
            && self.records.iter().eq(other.records.iter())
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { records: IndexMap::new() }
    }
}

impl<T: Record> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.records.contains_key(id)
    }

    pub fn get(&self, id: &RecordId) -> Option<&T> {
        self.records.get(id)
    }

    /// Returns a mutable reference to a record.
    ///
    /// Records never expose a way to change their id, so this cannot break the keying of the collection.
    pub fn get_mut(&mut self, id: &RecordId) -> Option<&mut T> {
        self.records.get_mut(id)
    }

    /// Returns the record at a given position
    pub fn at(&self, index: usize) -> Option<&T> {
        self.records.get_index(index).map(|(_, record)| record)
    }

    /// Returns the position of a record
    pub fn position(&self, id: &RecordId) -> Option<usize> {
        self.records.get_index_of(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.records.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &RecordId> {
        self.records.keys()
    }

    /// Append a new record
    pub fn insert(&mut self, record: T) -> Result<(), Box<dyn Error>> {
        let index = self.records.len();
        self.insert_at(index, record)
    }

    /// Insert a new record at a given position (clamped to the length of the collection)
    pub fn insert_at(&mut self, index: usize, record: T) -> Result<(), Box<dyn Error>> {
        if self.records.contains_key(record.id()) {
            return Err(format!("A record with id {} already exists", record.id()).into());
        }
        let index = index.min(self.records.len());
        self.records.shift_insert(index, record.id().clone(), record);
        Ok(())
    }

    /// Replace the record that has the same id, keeping its position. Returns the previous version.
    pub fn replace(&mut self, record: T) -> Result<T, Box<dyn Error>> {
        match self.records.get_mut(record.id()) {
            None => Err(format!("No record with id {}", record.id()).into()),
            Some(slot) => Ok(std::mem::replace(slot, record)),
        }
    }

    /// Apply a change to a record in place
    pub fn update_with<F, R>(&mut self, id: &RecordId, change: F) -> Result<R, Box<dyn Error>>
    where
        F: FnOnce(&mut T) -> R,
    {
        match self.records.get_mut(id) {
            None => Err(format!("No record with id {}", id).into()),
            Some(record) => Ok(change(record)),
        }
    }

    pub fn remove(&mut self, id: &RecordId) -> Result<T, Box<dyn Error>> {
        self.records.shift_remove(id)
            .ok_or_else(|| format!("No record with id {}", id).into())
    }

    /// Remove a record, but only if `confirm` agrees to it.
    ///
    /// Returns `None` (and leaves the collection untouched) when the removal has been declined.
    pub fn remove_confirmed<F>(&mut self, id: &RecordId, confirm: F) -> Result<Option<T>, Box<dyn Error>>
    where
        F: FnOnce(&T) -> bool,
    {
        let record = self.records.get(id)
            .ok_or_else(|| format!("No record with id {}", id))?;
        if confirm(record) == false {
            log::debug!("Removal of {} has been declined", id);
            return Ok(None);
        }
        self.remove(id).map(Some)
    }

    /// Remove the record at a given position
    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        self.records.shift_remove_index(index).map(|(_, record)| record)
    }
}

impl<T: Record> FromIterator<T> for Collection<T> {
    /// Build a collection. In case of duplicate ids, the last record wins, and takes the position of the last occurrence.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut records = IndexMap::new();
        for record in iter {
            let id = record.id().clone();
            if records.shift_remove(&id).is_some() {
                log::warn!("Duplicate record id {}, keeping the last one", id);
            }
            records.insert(id, record);
        }
        Self { records }
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = indexmap::map::Values<'a, RecordId, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.values()
    }
}

/// Used to support serde. A collection is stored as a plain list of records.
impl<T: Serialize> Serialize for Collection<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.records.values())
    }
}
/// Used to support serde
impl<'de, T: Record + DeserializeOwned> Deserialize<'de> for Collection<T> {
    fn deserialize<D>(deserializer: D) -> Result<Collection<T>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let records = Vec::<T>::deserialize(deserializer)?;
        Ok(records.into_iter().collect())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: RecordId,
        text: String,
    }
    impl Record for Note {
        fn id(&self) -> &RecordId { &self.id }
    }

    fn note(id: u64, text: &str) -> Note {
        Note { id: RecordId::from(id), text: text.to_string() }
    }

    fn texts(notes: &Collection<Note>) -> Vec<&str> {
        notes.iter().map(|n| n.text.as_str()).collect()
    }

    #[test]
    fn insert_replace_remove() {
        let mut notes = Collection::new();
        notes.insert(note(1, "a")).unwrap();
        notes.insert(note(2, "b")).unwrap();
        notes.insert(note(3, "c")).unwrap();
        assert!(notes.insert(note(2, "duplicate")).is_err());

        let previous = notes.replace(note(2, "B")).unwrap();
        assert_eq!(previous.text, "b");
        assert_eq!(texts(&notes), vec!["a", "B", "c"]);
        assert!(notes.replace(note(9, "unknown")).is_err());

        notes.remove(&RecordId::from(1)).unwrap();
        assert_eq!(texts(&notes), vec!["B", "c"]);
        assert!(notes.remove(&RecordId::from(1)).is_err());
    }

    #[test]
    fn declined_removal_keeps_the_record() {
        let mut notes: Collection<Note> = vec![note(1, "a"), note(2, "b")].into_iter().collect();

        let declined = notes.remove_confirmed(&RecordId::from(1), |_| false).unwrap();
        assert!(declined.is_none());
        assert_eq!(notes.len(), 2);

        let accepted = notes.remove_confirmed(&RecordId::from(1), |n| n.text == "a").unwrap();
        assert_eq!(accepted.map(|n| n.text), Some("a".to_string()));
        assert_eq!(texts(&notes), vec!["b"]);

        assert!(notes.remove_confirmed(&RecordId::from(7), |_| true).is_err());
    }

    #[test]
    fn positional_operations() {
        let mut notes: Collection<Note> = vec![note(1, "a"), note(2, "b")].into_iter().collect();
        notes.insert_at(0, note(3, "c")).unwrap();
        notes.insert_at(99, note(4, "d")).unwrap();
        assert_eq!(texts(&notes), vec!["c", "a", "b", "d"]);
        assert_eq!(notes.position(&RecordId::from(2)), Some(2));

        let removed = notes.remove_at(1).unwrap();
        assert_eq!(removed.text, "a");
        assert!(notes.remove_at(10).is_none());
        assert_eq!(notes.at(1).map(|n| n.text.as_str()), Some("b"));
    }

    #[test]
    fn serde_keeps_order() {
        let notes: Collection<Note> = vec![note(2, "b"), note(1, "a")].into_iter().collect();
        let json = serde_json::to_string(&notes).unwrap();
        assert!(json.starts_with('['));
        let back: Collection<Note> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, notes);
        assert_eq!(texts(&back), vec!["b", "a"]);
    }

    #[test]
    fn equality_depends_on_order() {
        let ab: Collection<Note> = vec![note(1, "a"), note(2, "b")].into_iter().collect();
        let ba: Collection<Note> = vec![note(2, "b"), note(1, "a")].into_iter().collect();
        assert!(ab != ba);
        assert_eq!(ab, ab.clone());

        let mut changed = ab.clone();
        changed.replace(note(2, "B")).unwrap();
        assert!(ab != changed);
    }

    #[test]
    fn duplicates_keep_the_last_occurrence() {
        let notes: Collection<Note> = vec![note(1, "a"), note(2, "b"), note(1, "A")].into_iter().collect();
        assert_eq!(notes.len(), 2);
        assert_eq!(texts(&notes), vec!["b", "A"]);
        assert_eq!(notes.position(&RecordId::from(1)), Some(1));
    }
}
