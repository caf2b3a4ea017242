//! The feed's category selection.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use funfacts_store::FactQuery;

/// Which facts the feed shows: every category, or exactly one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    pub fn category(&self) -> Option<&str> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Category(name) => Some(name),
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        self.category().is_none_or(|c| c == category)
    }

    /// The store listing for this selection.
    pub fn query(&self) -> FactQuery {
        FactQuery::feed(self.category())
    }
}

impl FromStr for CategoryFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "all" {
            Ok(CategoryFilter::All)
        } else {
            Ok(CategoryFilter::Category(s.to_string()))
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Category(name) => f.write_str(name),
        }
    }
}
