use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of a performer, e.g. `main-12` for seeded acts or a
/// millisecond timestamp for acts added by hand
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PerformerId(String);

impl PerformerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PerformerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PerformerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PerformerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A roster entry. Where the performer plays is not stored here; it is looked
/// up in the assignment mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Performer {
    pub id: PerformerId,
    pub name: String,
    /// Seed grouping the performer came from (`main`, `unplugged`, ...);
    /// `None` for performers added by hand
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl Performer {
    pub fn new(id: impl Into<PerformerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            group: None,
        }
    }

    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}

/// A (stage, time) pair that holds at most one performer
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub stage: String,
    pub time: String,
}

impl Slot {
    pub fn new(stage: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            time: time.into(),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} · {}", self.stage, self.time)
    }
}
