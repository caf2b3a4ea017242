//! Client for the hosted table store behind Fun Facts.
//!
//! The store exposes each table through an auto-generated PostgREST API.
//! This crate provides:
//!
//! - **Config**: endpoint and access key injected at process start
//! - **HTTP Client**: list, insert and update calls, one request each
//! - **RemoteStore**: the fact-level contract the feed is written against

mod client;
mod config;
mod error;
mod query;
mod records;
mod store;
mod types;

pub use client::StoreClient;
pub use config::{API_KEY_ENV, REQUEST_TIMEOUT_ENV, STORE_URL_ENV, StoreConfig};
pub use error::StoreError;
pub use query::{Order, Query};
pub use records::*;
pub use store::{FactQuery, RemoteStore};
pub use types::{Fact, FactId, NewFact, VoteCounter};
