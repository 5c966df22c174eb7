//! Identifiers shared by every kind of record (calendar tasks, leads, goals...)

use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};


/// An opaque, immutable record identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId {
    content: String,
}

impl RecordId {
    /// Generate a random RecordId.
    pub fn random() -> Self {
        let random = uuid::Uuid::new_v4().to_hyphenated().to_string();
        Self { content: random }
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// Returns the numeric value of this id, for collections that use sequential ids
    pub fn as_number(&self) -> Option<u64> {
        self.content.parse().ok()
    }
}

impl From<String> for RecordId {
    fn from(content: String) -> Self {
        Self { content }
    }
}
impl From<&str> for RecordId {
    fn from(content: &str) -> Self {
        Self { content: content.to_string() }
    }
}
impl From<u64> for RecordId {
    fn from(number: u64) -> Self {
        Self { content: number.to_string() }
    }
}
impl FromStr for RecordId {
    type Err = Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content)
    }
}

/// Used to support serde
impl Serialize for RecordId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.content)
    }
}
/// Used to support serde
impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<RecordId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let content = String::deserialize(deserializer)?;
        Ok(RecordId{ content })
    }
}
