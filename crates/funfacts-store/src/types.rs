//! Wire types for fact rows.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned to a fact by the store on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactId(pub i64);

impl fmt::Display for FactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for FactId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl FromStr for FactId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A fact row as returned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    pub id: FactId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub text: String,
    pub source: String,
    pub category: String,
    #[serde(rename = "votesInteresting", default)]
    pub votes_interesting: u64,
    #[serde(rename = "votesMindblowing", default)]
    pub votes_mindblowing: u64,
    #[serde(rename = "votesFalse", default)]
    pub votes_false: u64,
}

impl Fact {
    /// Current value of the given vote counter.
    pub fn votes(&self, counter: VoteCounter) -> u64 {
        match counter {
            VoteCounter::Interesting => self.votes_interesting,
            VoteCounter::Mindblowing => self.votes_mindblowing,
            VoteCounter::False => self.votes_false,
        }
    }
}

/// Body of an insert request. Vote counters are left to the store's defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFact {
    pub text: String,
    pub source: String,
    pub category: String,
}

/// One of the three independent vote counters on a fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteCounter {
    #[serde(rename = "votesInteresting")]
    Interesting,
    #[serde(rename = "votesMindblowing")]
    Mindblowing,
    #[serde(rename = "votesFalse")]
    False,
}

impl VoteCounter {
    /// All counters, in display order.
    pub const ALL: [VoteCounter; 3] = [
        VoteCounter::Interesting,
        VoteCounter::Mindblowing,
        VoteCounter::False,
    ];

    /// Column name of this counter in the fact table.
    pub fn column(self) -> &'static str {
        match self {
            VoteCounter::Interesting => "votesInteresting",
            VoteCounter::Mindblowing => "votesMindblowing",
            VoteCounter::False => "votesFalse",
        }
    }

    /// Short name used on the command line.
    pub fn alias(self) -> &'static str {
        match self {
            VoteCounter::Interesting => "interesting",
            VoteCounter::Mindblowing => "mindblowing",
            VoteCounter::False => "false",
        }
    }
}

impl fmt::Display for VoteCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for VoteCounter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        VoteCounter::ALL
            .into_iter()
            .find(|c| c.column() == s || c.alias().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "unknown vote counter '{}', expected interesting/mindblowing/false",
                    s
                )
            })
    }
}
