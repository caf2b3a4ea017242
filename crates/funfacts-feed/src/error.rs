//! Error types for feed operations.

use funfacts_store::{FactId, StoreError};
use thiserror::Error;

/// Errors returned by feed operations.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The remote store call failed. Network and store-reported failures are
    /// not distinguished.
    #[error("remote operation failed: {0}")]
    Remote(#[from] StoreError),

    /// A vote named a fact that is not in the feed.
    #[error("fact {0} is not in the feed")]
    UnknownFact(FactId),

    /// An exclusive vote was claimed while another vote on the same fact
    /// was still in flight.
    #[error("a vote on fact {0} is already in flight")]
    AlreadyVoting(FactId),
}
