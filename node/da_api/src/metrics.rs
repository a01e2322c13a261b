use std::time::Duration;

use vise::{EncodeLabelSet, EncodeLabelValue, Histogram, LabeledFamily, Metrics};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EncodeLabelSet, EncodeLabelValue)]
#[metrics(label = "outcome", rename_all = "snake_case")]
pub(crate) enum CallOutcome {
    Success,
    ClientError,
    Failure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EncodeLabelSet, EncodeLabelValue)]
#[metrics(label = "method", rename_all = "snake_case")]
pub(crate) enum Method {
    MaxBlobSize,
    Submit,
    Get,
    GetIds,
    GetProofs,
    Commit,
    Validate,
}

#[derive(Debug, Metrics)]
#[metrics(prefix = "sunrise_da_api")]
pub(crate) struct DaApiMetrics {
    #[metrics(labels = ["method", "outcome"], buckets = vise::Buckets::LATENCIES)]
    pub call_latency: LabeledFamily<(Method, CallOutcome), Histogram<Duration>, 2>,
}

#[vise::register]
pub(crate) static METRICS: vise::Global<DaApiMetrics> = vise::Global::new();
