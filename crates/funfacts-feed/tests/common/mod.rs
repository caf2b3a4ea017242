//! In-memory store double shared by the feed integration tests.

#![allow(dead_code)]

use std::cmp::Reverse;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use funfacts_feed::{Fact, FactId, NewFact, RemoteStore, StoreError, VoteCounter};
use funfacts_store::FactQuery;

/// Behaves like the hosted table: assigns ids, defaults vote counters,
/// filters, orders and caps listings, and writes counters as given.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<Fact>>,
    next_id: Mutex<i64>,
    failing: AtomicBool,
    pub requests: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<Fact>) -> Self {
        let next_id = rows.iter().map(|f| f.id.0).max().unwrap_or(0);
        Self {
            rows: Mutex::new(rows),
            next_id: Mutex::new(next_id),
            ..Self::default()
        }
    }

    /// Make every following call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Change a row behind the feed's back, as another client would.
    pub fn edit_row(&self, id: FactId, edit: impl FnOnce(&mut Fact)) {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|f| f.id == id) {
            edit(row);
        }
    }

    pub fn rows(&self) -> Vec<Fact> {
        self.rows.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn begin(&self) -> Result<(), StoreError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::InvalidResponse("store unavailable".into()))
        } else {
            Ok(())
        }
    }
}

/// Rows matching `query`, in the order the store returns them.
pub fn run_query(rows: &[Fact], query: &FactQuery) -> Vec<Fact> {
    let mut matching: Vec<Fact> = rows
        .iter()
        .filter(|f| query.category.as_deref().is_none_or(|c| f.category == c))
        .cloned()
        .collect();
    if query.descending {
        matching.sort_by_key(|f| Reverse(f.votes(query.order_by)));
    } else {
        matching.sort_by_key(|f| f.votes(query.order_by));
    }
    matching.truncate(query.limit as usize);
    matching
}

pub fn set_votes(fact: &mut Fact, counter: VoteCounter, value: u64) {
    match counter {
        VoteCounter::Interesting => fact.votes_interesting = value,
        VoteCounter::Mindblowing => fact.votes_mindblowing = value,
        VoteCounter::False => fact.votes_false = value,
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn list_facts(&self, query: &FactQuery) -> Result<Vec<Fact>, StoreError> {
        self.begin()?;
        Ok(run_query(&self.rows.lock().unwrap(), query))
    }

    async fn insert_fact(&self, new_fact: &NewFact) -> Result<Fact, StoreError> {
        self.begin()?;
        let id = {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            *next_id
        };
        let fact = Fact {
            id: FactId(id),
            created_at: None,
            text: new_fact.text.clone(),
            source: new_fact.source.clone(),
            category: new_fact.category.clone(),
            votes_interesting: 0,
            votes_mindblowing: 0,
            votes_false: 0,
        };
        self.rows.lock().unwrap().push(fact.clone());
        Ok(fact)
    }

    async fn update_fact_field(
        &self,
        id: FactId,
        counter: VoteCounter,
        value: u64,
    ) -> Result<Fact, StoreError> {
        self.begin()?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| StoreError::InvalidResponse("update returned no representation".into()))?;
        set_votes(row, counter, value);
        Ok(row.clone())
    }
}

pub fn fact(id: i64, category: &str, interesting: u64, mindblowing: u64, falses: u64) -> Fact {
    Fact {
        id: FactId(id),
        created_at: None,
        text: format!("fact number {}", id),
        source: format!("https://example.com/{}", id),
        category: category.to_string(),
        votes_interesting: interesting,
        votes_mindblowing: mindblowing,
        votes_false: falses,
    }
}

/// A handful of rows across several categories with distinct vote counts.
pub fn seed_rows() -> Vec<Fact> {
    vec![
        fact(1, "science", 4, 1, 0),
        fact(2, "history", 12, 0, 2),
        fact(3, "science", 30, 5, 1),
        fact(4, "technology", 0, 0, 0),
        fact(5, "news", 7, 3, 9),
        fact(6, "science", 18, 2, 0),
        fact(7, "health", 2, 3, 0),
    ]
}
