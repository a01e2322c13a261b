use std::time::Duration;

use vise::{Buckets, Counter, Histogram, Metrics};

#[derive(Debug, Metrics)]
#[metrics(prefix = "server_sunrise_da")]
pub(super) struct SunriseMetrics {
    /// Latency of a single publish round trip to the blob service.
    #[metrics(buckets = Buckets::LATENCIES)]
    pub publish_latency: Histogram<Duration>,
    /// Latency of a single fetch round trip to the blob service.
    #[metrics(buckets = Buckets::LATENCIES)]
    pub fetch_latency: Histogram<Duration>,
    /// Size of successfully published blobs.
    #[metrics(buckets = Buckets::exponential(64.0..=4_194_304.0, 4.0))]
    pub blob_size: Histogram<usize>,
    /// Blobs that were part of a fully successful submission.
    pub submitted_blobs: Counter,
    /// Submissions that failed as a whole.
    pub failed_submissions: Counter,
}

#[vise::register]
pub(super) static METRICS: vise::Global<SunriseMetrics> = vise::Global::new();
