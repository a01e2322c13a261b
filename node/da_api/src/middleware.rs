use axum::http::StatusCode;
use tokio::time::Instant;

use crate::metrics::{CallOutcome, Method, METRICS};

#[derive(Debug)]
pub(crate) struct MetricsMiddleware {
    method: Method,
    started_at: Instant,
}

impl MetricsMiddleware {
    pub fn new(method: Method) -> MetricsMiddleware {
        MetricsMiddleware {
            method,
            started_at: Instant::now(),
        }
    }

    pub fn observe(&self, status: StatusCode) {
        let outcome = if status.is_success() {
            CallOutcome::Success
        } else if status.is_client_error() {
            CallOutcome::ClientError
        } else {
            CallOutcome::Failure
        };
        METRICS.call_latency[&(self.method, outcome)].observe(self.started_at.elapsed());
    }
}
