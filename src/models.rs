// src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Poll {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub pinned: bool,
    pub vote_count: i64,
    pub created_at: DateTime<Utc>,
    /// Any other `polls` columns, passed through untouched at the top level
    /// of the poll object.
    #[sqlx(json)]
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One selectable choice of a poll. Stored in the `options` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PollOption {
    pub id: String,
    pub poll_id: String,
    pub label: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Vote {
    pub id: String,
    pub poll_id: String,
    pub option_id: String,
    pub viewing_platform: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/poll/{id}/vote`.
///
/// Both fields are passed through untouched; a missing `option_id` is left
/// for the store to reject.
#[derive(Debug, Default, Deserialize)]
pub struct VoteRequest {
    pub option_id: Option<String>,
    pub viewing_platform: Option<String>,
}

/// A vote row as handed to the store, before it assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewVote {
    pub poll_id: String,
    pub option_id: Option<String>,
    pub viewing_platform: Option<String>,
}

impl NewVote {
    pub fn new(poll_id: impl Into<String>, request: VoteRequest) -> Self {
        Self {
            poll_id: poll_id.into(),
            option_id: request.option_id,
            viewing_platform: request.viewing_platform,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollsResponse {
    pub polls: Vec<Poll>,
    pub pinned_poll: Option<Poll>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PollDetailResponse {
    pub poll: Poll,
    pub options: Vec<PollOption>,
    pub votes: Vec<Vote>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VoteResponse {
    pub success: bool,
    pub vote: Vote,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn extra_poll_columns_sit_beside_known_fields() {
        let mut extra = Map::new();
        extra.insert("cover_image".into(), json!("https://img.example/p1.png"));
        extra.insert("closes_at".into(), Value::Null);

        let poll = Poll {
            id: "p1".into(),
            title: "First".into(),
            description: None,
            pinned: true,
            vote_count: 2,
            created_at: Utc::now(),
            extra,
        };

        let value = serde_json::to_value(&poll).unwrap();
        assert_eq!(value["cover_image"], "https://img.example/p1.png");
        assert!(value.as_object().unwrap().contains_key("closes_at"));
        assert_eq!(value["pinned"], true);

        let back: Poll = serde_json::from_value(value).unwrap();
        assert_eq!(back, poll);
    }
}
