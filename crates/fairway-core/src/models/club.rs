use std::fmt;

use serde::{Deserialize, Serialize};

/// Club names offered when no custom bag is configured, longest first.
pub const DEFAULT_CLUBS: [&str; 17] = [
    "Driver",
    "3-Wood",
    "5-Wood",
    "7-Wood",
    "1-Iron",
    "2-Iron",
    "3-Iron",
    "4-Iron",
    "5-Iron",
    "6-Iron",
    "7-Iron",
    "8-Iron",
    "9-Iron",
    "Pitching Wedge",
    "Gap Wedge",
    "Sand Wedge",
    "Lob Wedge",
];

/// A club identifier. Ordering is by name, which is what grouping and
/// recommendation tie-breaks rely on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Club(String);

impl Club {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Club {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Club {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// The configured bag of clubs a shot may be recorded with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClubSet(Vec<String>);

impl Default for ClubSet {
    fn default() -> Self {
        Self(DEFAULT_CLUBS.iter().map(|c| c.to_string()).collect())
    }
}

impl ClubSet {
    pub fn new(names: Vec<String>) -> Self {
        Self(names)
    }

    /// Resolve user input to a club in the bag.
    /// Accepts a name (ASCII case-insensitive) or a 1-based position in the list.
    pub fn resolve(&self, input: &str) -> Option<Club> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        if let Ok(index) = input.parse::<usize>() {
            return index
                .checked_sub(1)
                .and_then(|i| self.0.get(i))
                .map(|name| Club::new(name.as_str()));
        }

        self.0
            .iter()
            .find(|name| name.eq_ignore_ascii_case(input))
            .map(|name| Club::new(name.as_str()))
    }

    pub fn contains(&self, club: &Club) -> bool {
        self.0.iter().any(|name| name == club.name())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
