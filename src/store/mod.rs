// src/store/mod.rs
//! Data access for polls, options and votes.
//!
//! Handlers only ever talk to a [`PollStore`]. Each method is a single store
//! call: nothing here composes calls or holds state across them, so a poll
//! detail read made of three calls may observe writes that land in between.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{NewVote, Poll, PollOption, Vote};

/// Message for a `poll_by_id` lookup that did not match exactly one row.
pub const SINGLE_ROW_MESSAGE: &str = "JSON object requested, multiple (or no) rows returned";

#[async_trait]
pub trait PollStore: Send + Sync + 'static {
    /// All polls, or only pinned ones, oldest first.
    async fn list_polls(&self, pinned_only: bool) -> Result<Vec<Poll>, StoreError>;

    /// Exactly one poll. Zero matches is [`StoreError::NotFound`], more than
    /// one is [`StoreError::MultipleRows`].
    async fn poll_by_id(&self, id: &str) -> Result<Poll, StoreError>;

    async fn options_for_poll(&self, poll_id: &str) -> Result<Vec<PollOption>, StoreError>;

    async fn votes_for_poll(&self, poll_id: &str) -> Result<Vec<Vote>, StoreError>;

    /// Persists one vote and returns the stored row. When the store tracks
    /// vote counts, the poll's counter moves in the same write.
    async fn insert_vote(&self, vote: NewVote) -> Result<Vote, StoreError>;
}

/// Reduces a filtered result to the single row `poll_by_id` promises.
pub(crate) fn single_row<T>(mut rows: Vec<T>) -> Result<T, StoreError> {
    match rows.len() {
        1 => Ok(rows.remove(0)),
        0 => Err(StoreError::NotFound(SINGLE_ROW_MESSAGE.to_string())),
        _ => Err(StoreError::MultipleRows(SINGLE_ROW_MESSAGE.to_string())),
    }
}
