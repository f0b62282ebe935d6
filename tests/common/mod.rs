#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::Value;
use tower::ServiceExt;

use poll_api::routes::create_routes;
use poll_api::state::AppState;
use poll_api::error::{ApiError, StoreError};
use poll_api::models::{NewVote, Poll, PollOption, Vote};
use poll_api::store::{MemoryStore, PollStore};
use poll_api::telemetry::ErrorSink;

/// Keeps every reported error as a `(context, message)` pair.
#[derive(Debug, Default)]
pub struct RecordingSink {
    reports: Mutex<Vec<(String, String)>>,
}

impl RecordingSink {
    pub fn reports(&self) -> Vec<(String, String)> {
        self.reports.lock().unwrap().clone()
    }
}

impl ErrorSink for RecordingSink {
    fn report(&self, context: &str, err: &ApiError) {
        self.reports
            .lock()
            .unwrap()
            .push((context.to_string(), err.to_string()));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreCall {
    ListPolls,
    ListPinnedPolls,
    PollById,
    OptionsForPoll,
    VotesForPoll,
    InsertVote,
}

/// Delegates to a `MemoryStore` but fails one kind of call with a
/// connection-level error, counting every call it sees.
pub struct FailingStore {
    inner: MemoryStore,
    fail_on: StoreCall,
    calls: Mutex<Vec<StoreCall>>,
    failures: AtomicUsize,
}

impl FailingStore {
    pub fn new(inner: MemoryStore, fail_on: StoreCall) -> Self {
        Self {
            inner,
            fail_on,
            calls: Mutex::default(),
            failures: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::SeqCst)
    }

    fn enter(&self, call: StoreCall) -> Result<(), StoreError> {
        self.calls.lock().unwrap().push(call);

        if call == self.fail_on {
            self.failures.fetch_add(1, Ordering::SeqCst);
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl PollStore for FailingStore {
    async fn list_polls(&self, pinned_only: bool) -> Result<Vec<Poll>, StoreError> {
        let call = if pinned_only {
            StoreCall::ListPinnedPolls
        } else {
            StoreCall::ListPolls
        };
        self.enter(call)?;
        self.inner.list_polls(pinned_only).await
    }

    async fn poll_by_id(&self, id: &str) -> Result<Poll, StoreError> {
        self.enter(StoreCall::PollById)?;
        self.inner.poll_by_id(id).await
    }

    async fn options_for_poll(&self, poll_id: &str) -> Result<Vec<PollOption>, StoreError> {
        self.enter(StoreCall::OptionsForPoll)?;
        self.inner.options_for_poll(poll_id).await
    }

    async fn votes_for_poll(&self, poll_id: &str) -> Result<Vec<Vote>, StoreError> {
        self.enter(StoreCall::VotesForPoll)?;
        self.inner.votes_for_poll(poll_id).await
    }

    async fn insert_vote(&self, vote: NewVote) -> Result<Vote, StoreError> {
        self.enter(StoreCall::InsertVote)?;
        self.inner.insert_vote(vote).await
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub sink: Arc<RecordingSink>,
}

/// `p1` (options `o1`, `o2`), `p2` pinned, `p3` pinned but older than `p2`,
/// and two rows sharing the id `dup`.
pub async fn seeded_store(track_vote_count: bool) -> MemoryStore {
    let store = MemoryStore::new(track_vote_count);
    let now = Utc::now();

    store.add_poll("p1", "First poll", false, now - Duration::minutes(30)).await;
    store.add_option("o1", "p1", "Yes").await.unwrap();
    store.add_option("o2", "p1", "No").await.unwrap();

    store.add_poll("p2", "Pinned later", true, now - Duration::minutes(10)).await;
    store.add_option("o3", "p2", "Maybe").await.unwrap();

    store.add_poll("p3", "Pinned earlier", true, now - Duration::minutes(20)).await;

    store.add_poll("dup", "Duplicate A", false, now - Duration::minutes(5)).await;
    store.add_poll("dup", "Duplicate B", false, now - Duration::minutes(4)).await;

    store
}

pub fn build_app(store: MemoryStore, strict_http_status: bool) -> TestApp {
    let store = Arc::new(store);
    let (router, sink) = build_router(store.clone(), strict_http_status);

    TestApp {
        router,
        store,
        sink,
    }
}

pub fn build_router(
    store: Arc<dyn PollStore>,
    strict_http_status: bool,
) -> (Router, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let state = AppState::new(store)
        .with_error_sink(sink.clone())
        .with_strict_http_status(strict_http_status);

    (create_routes(state), sink)
}

pub async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(router, request).await
}

pub async fn post_json(router: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(router, request).await
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("Request failed");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    let json = serde_json::from_slice(&bytes).expect("Response body is not valid JSON");

    (status, json)
}
