//! The fact-level store contract consumed by the feed.

use async_trait::async_trait;
use tracing::debug;

use crate::records::{CATEGORY_COLUMN, FACT_TABLE, MAX_FACTS};
use crate::{Fact, FactId, NewFact, Query, StoreClient, StoreError, VoteCounter};

/// Parameters of a fact listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactQuery {
    /// Restrict to one category; `None` lists every category.
    pub category: Option<String>,
    pub order_by: VoteCounter,
    pub descending: bool,
    pub limit: u32,
}

impl FactQuery {
    /// The feed listing: optionally scoped to a category, most interesting
    /// first, capped at [`MAX_FACTS`].
    pub fn feed(category: Option<&str>) -> Self {
        Self {
            category: category.map(str::to_string),
            order_by: VoteCounter::Interesting,
            descending: true,
            limit: MAX_FACTS,
        }
    }

    /// Render as a table query.
    pub fn to_query(&self) -> Query {
        let mut query = Query::new();
        if let Some(category) = &self.category {
            query = query.eq(CATEGORY_COLUMN, category.clone());
        }
        query
            .order(self.order_by.column(), self.descending)
            .limit(self.limit)
    }
}

/// Remote persistence for facts.
///
/// Implemented by [`StoreClient`] over HTTP; tests substitute in-memory doubles.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// List facts matching the query, in the store's order.
    async fn list_facts(&self, query: &FactQuery) -> Result<Vec<Fact>, StoreError>;

    /// Insert a fact; the store assigns the id and default vote counts.
    async fn insert_fact(&self, fact: &NewFact) -> Result<Fact, StoreError>;

    /// Set one vote counter of a fact and return the updated record.
    async fn update_fact_field(
        &self,
        id: FactId,
        counter: VoteCounter,
        value: u64,
    ) -> Result<Fact, StoreError>;
}

#[async_trait]
impl RemoteStore for StoreClient {
    async fn list_facts(&self, query: &FactQuery) -> Result<Vec<Fact>, StoreError> {
        let facts: Vec<Fact> = self.select(FACT_TABLE, &query.to_query()).await?;
        debug!(count = facts.len(), category = ?query.category, "listed facts");
        Ok(facts)
    }

    async fn insert_fact(&self, fact: &NewFact) -> Result<Fact, StoreError> {
        self.insert(FACT_TABLE, fact).await
    }

    async fn update_fact_field(
        &self,
        id: FactId,
        counter: VoteCounter,
        value: u64,
    ) -> Result<Fact, StoreError> {
        let mut patch = serde_json::Map::new();
        patch.insert(counter.column().to_string(), serde_json::Value::from(value));
        self.update(FACT_TABLE, id, &patch).await
    }
}
