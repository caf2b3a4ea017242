//! The fact feed: an in-memory list of facts kept in step with the store.
//!
//! Three operations mutate the list:
//! 1. `refresh` replaces it with a fresh listing for a filter
//! 2. `submit` prepends a newly inserted fact
//! 3. `vote` replaces one fact with the store's post-update record
//!
//! The feed is a shared handle; operations may run concurrently from
//! independent tasks. Each one touches the list in a single step under the
//! state lock, which is never held across a store call. There is no ordering
//! between operations: whichever response lands last wins.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info, warn};

use funfacts_store::{Fact, FactId, RemoteStore, VoteCounter};

use crate::notify::{LogNotifier, Notifier, REFRESH_FAILED_MESSAGE};
use crate::validation::{Candidate, ValidationError, validate};
use crate::{CategoryFilter, FeedError};

/// Capacity of the update broadcast channel.
const UPDATE_CHANNEL_CAPACITY: usize = 256;

/// Change notifications for views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedUpdate {
    /// A refresh was dispatched; the feed is loading.
    LoadingStarted,
    /// A refresh replaced the list.
    Refreshed { count: usize },
    /// A refresh failed; the list is unchanged.
    RefreshFailed,
    /// A new fact was prepended.
    FactPosted { id: FactId },
    /// A fact was replaced by its post-vote record.
    FactUpdated { id: FactId },
    /// A vote on this fact was dispatched.
    VoteStarted { id: FactId },
    /// A vote on this fact settled, successfully or not.
    VoteSettled { id: FactId },
}

/// Result of a submission that did not fail remotely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The candidate failed validation; nothing was sent.
    Rejected(ValidationError),
    /// The store accepted the fact; it is now first in the feed.
    Posted(Fact),
}

/// A vote that has been counted as in flight but not yet sent.
///
/// Returned by [`FactFeed::try_vote`]. The fact stays marked as voting until
/// the claim is passed to [`FactFeed::cast_vote`] and the request settles.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "the fact stays marked as voting until the claim is cast"]
pub struct PendingVote {
    id: FactId,
    counter: VoteCounter,
    next: u64,
}

impl PendingVote {
    pub fn id(&self) -> FactId {
        self.id
    }

    pub fn counter(&self) -> VoteCounter {
        self.counter
    }

    /// Counter value the store will be asked to write.
    pub fn value(&self) -> u64 {
        self.next
    }
}

/// View-facing copy of the feed state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedSnapshot {
    pub filter: CategoryFilter,
    pub facts: Vec<Fact>,
    pub loading: bool,
    pub voting: HashSet<FactId>,
}

impl FeedSnapshot {
    pub fn is_voting(&self, id: FactId) -> bool {
        self.voting.contains(&id)
    }
}

#[derive(Debug, Default)]
struct FeedState {
    filter: CategoryFilter,
    facts: Vec<Fact>,
    refreshes_in_flight: usize,
    votes_in_flight: HashMap<FactId, usize>,
}

struct Inner<S> {
    store: S,
    state: RwLock<FeedState>,
    notifier: Arc<dyn Notifier>,
    updates: broadcast::Sender<FeedUpdate>,
}

/// Shared handle to the fact feed.
pub struct FactFeed<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for FactFeed<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: RemoteStore> FactFeed<S> {
    /// Create an empty feed that reports refresh failures to the log.
    pub fn new(store: S) -> Self {
        Self::with_notifier(store, Arc::new(LogNotifier))
    }

    /// Create an empty feed with a custom notifier.
    pub fn with_notifier(store: S, notifier: Arc<dyn Notifier>) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                store,
                state: RwLock::new(FeedState::default()),
                notifier,
                updates,
            }),
        }
    }

    pub fn store(&self) -> &S {
        &self.inner.store
    }

    /// Subscribe to change notifications.
    ///
    /// A lagging receiver loses events; `snapshot` is always current.
    pub fn subscribe(&self) -> broadcast::Receiver<FeedUpdate> {
        self.inner.updates.subscribe()
    }

    fn publish(&self, update: FeedUpdate) {
        // No subscribers is fine.
        let _ = self.inner.updates.send(update);
    }

    /// Copy of the current view-facing state.
    pub async fn snapshot(&self) -> FeedSnapshot {
        let state = self.inner.state.read().await;
        FeedSnapshot {
            filter: state.filter.clone(),
            facts: state.facts.clone(),
            loading: state.refreshes_in_flight > 0,
            voting: state.votes_in_flight.keys().copied().collect(),
        }
    }

    pub async fn facts(&self) -> Vec<Fact> {
        self.inner.state.read().await.facts.clone()
    }

    pub async fn filter(&self) -> CategoryFilter {
        self.inner.state.read().await.filter.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.state.read().await.refreshes_in_flight > 0
    }

    pub async fn is_voting(&self, id: FactId) -> bool {
        self.inner.state.read().await.votes_in_flight.contains_key(&id)
    }

    /// Replace the list with the store's listing for `filter`.
    ///
    /// On failure the list is left as it was and the user is notified.
    /// Returns the number of facts loaded.
    #[tracing::instrument(skip_all, fields(filter = %filter))]
    pub async fn refresh(&self, filter: CategoryFilter) -> Result<usize, FeedError> {
        let query = filter.query();
        {
            let mut state = self.inner.state.write().await;
            state.filter = filter;
            state.refreshes_in_flight += 1;
        }
        self.publish(FeedUpdate::LoadingStarted);

        let result = self.inner.store.list_facts(&query).await;

        let mut state = self.inner.state.write().await;
        state.refreshes_in_flight = state.refreshes_in_flight.saturating_sub(1);
        match result {
            Ok(facts) => {
                let count = facts.len();
                state.facts = facts;
                drop(state);

                info!(count, "feed refreshed");
                self.publish(FeedUpdate::Refreshed { count });
                Ok(count)
            }
            Err(e) => {
                drop(state);

                warn!(error = %e, "failed to refresh feed");
                self.inner.notifier.notify(REFRESH_FAILED_MESSAGE);
                self.publish(FeedUpdate::RefreshFailed);
                Err(e.into())
            }
        }
    }

    /// Validate and insert a new fact, prepending the store's record.
    ///
    /// An invalid candidate is rejected without contacting the store. A store
    /// failure leaves the list unchanged and is returned without notifying
    /// the user.
    #[tracing::instrument(skip_all, fields(category = %candidate.category))]
    pub async fn submit(&self, candidate: &Candidate) -> Result<SubmitOutcome, FeedError> {
        if let Err(reason) = validate(candidate) {
            debug!(%reason, "submission rejected");
            return Ok(SubmitOutcome::Rejected(reason));
        }

        let fact = self
            .inner
            .store
            .insert_fact(&candidate.to_new_fact())
            .await
            .inspect_err(|e| warn!(error = %e, "failed to insert fact"))?;

        self.inner.state.write().await.facts.insert(0, fact.clone());

        info!(id = %fact.id, "fact posted");
        self.publish(FeedUpdate::FactPosted { id: fact.id });
        Ok(SubmitOutcome::Posted(fact))
    }

    /// Add one vote to a counter of a fact in the feed.
    ///
    /// The new value is computed from the locally held record, so two
    /// concurrent votes on the same counter can both write the same value.
    /// On success the local record is replaced wholesale by the store's.
    pub async fn vote(&self, id: FactId, counter: VoteCounter) -> Result<Fact, FeedError> {
        let pending = self.claim_vote(id, counter, false).await?;
        self.cast_vote(pending).await
    }

    /// Claim the right to vote on a fact, unless a vote on it is already in
    /// flight.
    ///
    /// The fact is marked as voting before this returns, so a second claim
    /// made right after fails with [`FeedError::AlreadyVoting`] even if the
    /// first vote has not been sent yet. Pass the claim to
    /// [`cast_vote`](Self::cast_vote) to send it.
    pub async fn try_vote(
        &self,
        id: FactId,
        counter: VoteCounter,
    ) -> Result<PendingVote, FeedError> {
        self.claim_vote(id, counter, true).await
    }

    async fn claim_vote(
        &self,
        id: FactId,
        counter: VoteCounter,
        exclusive: bool,
    ) -> Result<PendingVote, FeedError> {
        let next = {
            let mut state = self.inner.state.write().await;
            let current = state
                .facts
                .iter()
                .find(|f| f.id == id)
                .map(|f| f.votes(counter))
                .ok_or(FeedError::UnknownFact(id))?;
            let in_flight = state.votes_in_flight.entry(id).or_default();
            if exclusive && *in_flight > 0 {
                debug!(%id, "vote already in flight");
                return Err(FeedError::AlreadyVoting(id));
            }
            *in_flight += 1;
            current.saturating_add(1)
        };
        self.publish(FeedUpdate::VoteStarted { id });

        Ok(PendingVote { id, counter, next })
    }

    /// Send a claimed vote and apply the store's record.
    #[tracing::instrument(skip_all, fields(id = %pending.id, counter = %pending.counter))]
    pub async fn cast_vote(&self, pending: PendingVote) -> Result<Fact, FeedError> {
        let PendingVote { id, counter, next } = pending;

        let result = self
            .inner
            .store
            .update_fact_field(id, counter, next)
            .await;

        let mut state = self.inner.state.write().await;
        if let Entry::Occupied(mut entry) = state.votes_in_flight.entry(id) {
            *entry.get_mut() -= 1;
            if *entry.get() == 0 {
                entry.remove();
            }
        }

        match result {
            Ok(updated) => {
                // A refresh may have dropped the fact in the meantime.
                let replaced = match state.facts.iter_mut().find(|f| f.id == id) {
                    Some(slot) => {
                        *slot = updated.clone();
                        true
                    }
                    None => false,
                };
                drop(state);

                debug!(value = updated.votes(counter), replaced, "vote recorded");
                self.publish(FeedUpdate::VoteSettled { id });
                if replaced {
                    self.publish(FeedUpdate::FactUpdated { id });
                }
                Ok(updated)
            }
            Err(e) => {
                drop(state);

                warn!(error = %e, "failed to record vote");
                self.publish(FeedUpdate::VoteSettled { id });
                Err(e.into())
            }
        }
    }
}
