// src/handlers.rs
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::error::ApiError;
use crate::models::{NewVote, PollDetailResponse, PollsResponse, VoteRequest, VoteResponse};
use crate::state::AppState;

/// Turns a handler outcome into either the success body or the uniform
/// error body, reporting failures to the state's error sink on the way.
fn respond<T: Serialize>(state: &AppState, context: &str, result: Result<T, ApiError>) -> Response {
    match result {
        Ok(body) => Json(body).into_response(),
        Err(e) => {
            state.errors.report(context, &e);
            e.into_response_with(state.strict_http_status)
        }
    }
}

/// Fetch every poll plus the oldest pinned one
pub async fn list_polls(State(state): State<AppState>) -> Response {
    let result = async {
        let polls = state.store.list_polls(false).await?;
        let pinned = state.store.list_polls(true).await?;

        Ok::<_, ApiError>(PollsResponse {
            polls,
            pinned_poll: pinned.into_iter().next(),
        })
    }
    .await;

    respond(&state, "Error fetching polls", result)
}

/// Fetch one poll with its options and votes
pub async fn get_poll(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Response {
    let result = async {
        let Path(poll_id) = path?;
        let poll = state.store.poll_by_id(&poll_id).await?;
        let options = state.store.options_for_poll(&poll_id).await?;
        let votes = state.store.votes_for_poll(&poll_id).await?;

        Ok::<_, ApiError>(PollDetailResponse {
            poll,
            options,
            votes,
        })
    }
    .await;

    respond(&state, "Error fetching poll data", result)
}

/// Record a vote for one of a poll's options
pub async fn vote(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<VoteRequest>, JsonRejection>,
) -> Response {
    let result = async {
        let Path(poll_id) = path?;
        let Json(request) = body?;
        let vote = state.store.insert_vote(NewVote::new(poll_id, request)).await?;

        Ok::<_, ApiError>(VoteResponse {
            success: true,
            vote,
        })
    }
    .await;

    respond(&state, "Error submitting vote", result)
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
