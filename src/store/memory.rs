// src/store/memory.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{single_row, PollStore};
use crate::error::StoreError;
use crate::models::{NewVote, Poll, PollOption, Vote};

#[derive(Default)]
struct Tables {
    polls: Vec<Poll>,
    options: Vec<PollOption>,
    votes: Vec<Vote>,
}

/// In-process store with the same row semantics as the `polls`, `options`
/// and `poll_votes` tables, including their NOT NULL and foreign-key checks.
///
/// Rows live in insertion order. Nothing is persisted.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    track_vote_count: bool,
}

impl MemoryStore {
    pub fn new(track_vote_count: bool) -> Self {
        Self {
            tables: RwLock::default(),
            track_vote_count,
        }
    }

    /// Adds a poll row. Duplicate ids are allowed here, which the Postgres
    /// schema would refuse; it lets single-row lookups be exercised.
    pub async fn add_poll(
        &self,
        id: impl Into<String>,
        title: impl Into<String>,
        pinned: bool,
        created_at: DateTime<Utc>,
    ) -> Poll {
        let poll = Poll {
            id: id.into(),
            title: title.into(),
            description: None,
            pinned,
            vote_count: 0,
            created_at,
            extra: Default::default(),
        };

        self.tables.write().await.polls.push(poll.clone());
        poll
    }

    pub async fn add_option(
        &self,
        id: impl Into<String>,
        poll_id: impl Into<String>,
        label: impl Into<String>,
    ) -> Result<PollOption, StoreError> {
        let mut tables = self.tables.write().await;
        let option = PollOption {
            id: id.into(),
            poll_id: poll_id.into(),
            label: label.into(),
            created_at: Utc::now(),
        };

        if !tables.polls.iter().any(|p| p.id == option.poll_id) {
            return Err(fk_violation("options", "poll_id"));
        }

        tables.options.push(option.clone());
        Ok(option)
    }

    /// A small data set for `POLL_STORE=memory` deployments.
    pub async fn with_demo_data(track_vote_count: bool) -> Result<Self, StoreError> {
        let store = Self::new(track_vote_count);
        let now = Utc::now();

        store.add_poll("welcome", "Tabs or spaces?", true, now).await;
        store.add_option("welcome-tabs", "welcome", "Tabs").await?;
        store.add_option("welcome-spaces", "welcome", "Spaces").await?;

        store.add_poll("editor", "Favourite editor?", false, now).await;
        store.add_option("editor-vim", "editor", "Vim").await?;
        store.add_option("editor-emacs", "editor", "Emacs").await?;
        store.add_option("editor-other", "editor", "Something else").await?;

        Ok(store)
    }
}

#[async_trait]
impl PollStore for MemoryStore {
    async fn list_polls(&self, pinned_only: bool) -> Result<Vec<Poll>, StoreError> {
        let tables = self.tables.read().await;
        let mut polls: Vec<Poll> = tables
            .polls
            .iter()
            .filter(|p| !pinned_only || p.pinned)
            .cloned()
            .collect();

        // Stable, so equal timestamps keep insertion order.
        polls.sort_by_key(|p| p.created_at);
        Ok(polls)
    }

    async fn poll_by_id(&self, id: &str) -> Result<Poll, StoreError> {
        let tables = self.tables.read().await;
        let rows = tables.polls.iter().filter(|p| p.id == id).cloned().collect();

        single_row(rows)
    }

    async fn options_for_poll(&self, poll_id: &str) -> Result<Vec<PollOption>, StoreError> {
        let tables = self.tables.read().await;

        Ok(tables
            .options
            .iter()
            .filter(|o| o.poll_id == poll_id)
            .cloned()
            .collect())
    }

    async fn votes_for_poll(&self, poll_id: &str) -> Result<Vec<Vote>, StoreError> {
        let tables = self.tables.read().await;

        Ok(tables
            .votes
            .iter()
            .filter(|v| v.poll_id == poll_id)
            .cloned()
            .collect())
    }

    async fn insert_vote(&self, vote: NewVote) -> Result<Vote, StoreError> {
        let mut tables = self.tables.write().await;

        let option_id = vote.option_id.ok_or_else(|| {
            StoreError::Constraint(
                r#"null value in column "option_id" of relation "poll_votes" violates not-null constraint"#
                    .to_string(),
            )
        })?;

        if !tables.polls.iter().any(|p| p.id == vote.poll_id) {
            return Err(fk_violation("poll_votes", "poll_id"));
        }
        if !tables.options.iter().any(|o| o.id == option_id) {
            return Err(fk_violation("poll_votes", "option_id"));
        }

        let stored = Vote {
            id: Uuid::new_v4().to_string(),
            poll_id: vote.poll_id,
            option_id,
            viewing_platform: vote.viewing_platform,
            created_at: Utc::now(),
        };

        if self.track_vote_count {
            for poll in tables.polls.iter_mut().filter(|p| p.id == stored.poll_id) {
                poll.vote_count += 1;
            }
        }

        tables.votes.push(stored.clone());
        Ok(stored)
    }
}

fn fk_violation(table: &str, column: &str) -> StoreError {
    StoreError::Constraint(format!(
        r#"insert or update on table "{table}" violates foreign key constraint "{table}_{column}_fkey""#
    ))
}
