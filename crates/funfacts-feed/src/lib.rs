//! Fact feed state for Fun Facts.
//!
//! Keeps an in-memory, ordered list of facts consistent with the remote
//! store across filtering, submission and voting.
//!
//! ## Features
//!
//! - **Categories**: compiled-in registry of topic tags and their colors
//! - **Validation**: pure checks run before any submission reaches the store
//! - **Feed**: the shared list with `refresh`, `submit` and `vote`
//! - **Form**: submission form state with reset-after-post behavior
//! - **Updates**: broadcast of feed changes for re-rendering

mod category;
mod error;
mod feed;
mod filter;
mod form;
mod notify;
mod validation;

pub use category::{CATEGORIES, Category, color_of, lookup};
pub use error::FeedError;
pub use feed::{FactFeed, FeedSnapshot, FeedUpdate, PendingVote, SubmitOutcome};
pub use filter::CategoryFilter;
pub use form::FactForm;
pub use notify::{LogNotifier, Notifier, REFRESH_FAILED_MESSAGE};
pub use validation::{Candidate, MAX_TEXT_LEN, ValidationError, is_valid, text_len, validate};

pub use funfacts_store::{Fact, FactId, NewFact, RemoteStore, StoreError, VoteCounter};
