// src/store/postgres.rs
use async_trait::async_trait;
use sqlx::error::ErrorKind;
use sqlx::PgPool;
use tracing::debug;

use super::{single_row, PollStore};
use crate::error::StoreError;
use crate::models::{NewVote, Poll, PollOption, Vote};

// Columns beyond the known ones are folded into `extra`.
const POLL_COLUMNS: &str = "id, title, description, pinned, vote_count, created_at, \
    to_jsonb(polls) - 'id' - 'title' - 'description' - 'pinned' - 'vote_count' - 'created_at' AS extra";

pub struct PgStore {
    pool: PgPool,
    track_vote_count: bool,
}

impl PgStore {
    pub fn new(pool: PgPool, track_vote_count: bool) -> Self {
        Self {
            pool,
            track_vote_count,
        }
    }
}

#[async_trait]
impl PollStore for PgStore {
    async fn list_polls(&self, pinned_only: bool) -> Result<Vec<Poll>, StoreError> {
        let sql = if pinned_only {
            format!("SELECT {POLL_COLUMNS} FROM polls WHERE pinned = TRUE ORDER BY created_at")
        } else {
            format!("SELECT {POLL_COLUMNS} FROM polls ORDER BY created_at")
        };

        let polls = sqlx::query_as::<_, Poll>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        Ok(polls)
    }

    async fn poll_by_id(&self, id: &str) -> Result<Poll, StoreError> {
        // LIMIT 2 is enough to tell "one" from "more than one".
        let rows = sqlx::query_as::<_, Poll>(&format!(
            "SELECT {POLL_COLUMNS} FROM polls WHERE id = $1 LIMIT 2"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        single_row(rows)
    }

    async fn options_for_poll(&self, poll_id: &str) -> Result<Vec<PollOption>, StoreError> {
        sqlx::query_as::<_, PollOption>(
            "SELECT id, poll_id, label, created_at FROM options WHERE poll_id = $1 ORDER BY created_at, id",
        )
        .bind(poll_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn votes_for_poll(&self, poll_id: &str) -> Result<Vec<Vote>, StoreError> {
        sqlx::query_as::<_, Vote>(
            "SELECT id, poll_id, option_id, viewing_platform, created_at FROM poll_votes WHERE poll_id = $1 ORDER BY created_at, id",
        )
        .bind(poll_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn insert_vote(&self, vote: NewVote) -> Result<Vote, StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        let inserted = sqlx::query_as::<_, Vote>(
            r#"
            INSERT INTO poll_votes (poll_id, option_id, viewing_platform)
            VALUES ($1, $2, $3)
            RETURNING id, poll_id, option_id, viewing_platform, created_at
            "#,
        )
        .bind(&vote.poll_id)
        .bind(&vote.option_id)
        .bind(&vote.viewing_platform)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        if self.track_vote_count {
            // Counter moves inside the insert's transaction, never on its own.
            sqlx::query("UPDATE polls SET vote_count = vote_count + 1 WHERE id = $1")
                .bind(&vote.poll_id)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx)?;
        }

        tx.commit().await.map_err(map_sqlx)?;
        debug!(vote_id = %inserted.id, poll_id = %inserted.poll_id, "vote stored");

        Ok(inserted)
    }
}

/// Constraint violations get their own variant so a strict deployment can
/// answer them with 422; the database's own message is kept as-is.
fn map_sqlx(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        match db.kind() {
            ErrorKind::UniqueViolation
            | ErrorKind::ForeignKeyViolation
            | ErrorKind::NotNullViolation
            | ErrorKind::CheckViolation => return StoreError::Constraint(db.message().to_string()),
            _ => {}
        }
    }

    StoreError::Database(err)
}
