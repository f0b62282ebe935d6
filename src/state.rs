// src/state.rs
use std::sync::Arc;

use crate::store::PollStore;
use crate::telemetry::{ErrorSink, TracingSink};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PollStore>,
    pub errors: Arc<dyn ErrorSink>,
    pub strict_http_status: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn PollStore>) -> Self {
        Self {
            store,
            errors: Arc::new(TracingSink),
            strict_http_status: false,
        }
    }

    pub fn with_error_sink(mut self, errors: Arc<dyn ErrorSink>) -> Self {
        self.errors = errors;
        self
    }

    pub fn with_strict_http_status(mut self, strict: bool) -> Self {
        self.strict_http_status = strict;
        self
    }
}
