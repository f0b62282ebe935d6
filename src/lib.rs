// src/lib.rs
//! JSON API for listing polls, reading a poll with its options and votes,
//! and casting a vote.
//!
//! | Method | Path | Response |
//! |---|---|---|
//! | GET | `/api/polls` | `{ polls, pinnedPoll }` |
//! | GET | `/api/poll/{id}` | `{ poll, options, votes }` |
//! | POST | `/api/poll/{id}/vote` | `{ success: true, vote }` |
//!
//! Any failure answers `{ error: message }`, with status 200 unless strict
//! status mapping is configured.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod telemetry;
