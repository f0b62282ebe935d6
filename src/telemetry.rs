// src/telemetry.rs
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::ApiError;

/// Receives every error a handler turns into an `{ error }` response.
pub trait ErrorSink: Send + Sync + 'static {
    fn report(&self, context: &str, error: &ApiError);
}

/// Default sink: one `error!` event per failed request.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ErrorSink for TracingSink {
    fn report(&self, context: &str, err: &ApiError) {
        error!(context, status = %err.status(), "{context}: {err}");
    }
}

pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).init();
}
