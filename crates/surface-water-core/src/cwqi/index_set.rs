use serde::{Deserialize, Serialize};
use std::fmt;

/// Selects which factors make up the composite index.
///
/// `Legacy21` is the 21-factor set of the 2017 city ranking rules;
/// `Extended22` adds fecal coliform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexSet {
    #[default]
    #[serde(rename = "legacy21")]
    Legacy21,
    #[serde(rename = "extended22")]
    Extended22,
}

impl IndexSet {
    pub const ALL: [IndexSet; 2] = [IndexSet::Legacy21, IndexSet::Extended22];

    /// Key used for this set in a standard document.
    pub fn key(self) -> &'static str {
        match self {
            IndexSet::Legacy21 => "legacy21",
            IndexSet::Extended22 => "extended22",
        }
    }

    pub fn from_key(key: &str) -> Option<IndexSet> {
        IndexSet::ALL
            .into_iter()
            .find(|set| set.key().eq_ignore_ascii_case(key.trim()))
    }
}

impl fmt::Display for IndexSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
