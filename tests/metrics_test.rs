//! Tests for metrics emitted by the completion pipeline.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use std::sync::Arc;

use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use cellgpt::{
    CellGpt, CellGptError, CompletionOptions, HttpRequest, MemoryPropertyStore, PromptValue,
    Transport, telemetry,
};

// ============================================================================
// Mock transports
// ============================================================================

struct FixedTransport(&'static str);

impl Transport for FixedTransport {
    fn execute(&self, _request: &HttpRequest) -> cellgpt::Result<String> {
        Ok(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": self.0}}]
        })
        .to_string())
    }
}

struct FailingTransport;

impl Transport for FailingTransport {
    fn execute(&self, _request: &HttpRequest) -> cellgpt::Result<String> {
        Err(CellGptError::AuthenticationFailed)
    }
}

// ============================================================================
// Snapshot type alias for readability
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

// ============================================================================
// Helpers
// ============================================================================

/// Sum all counter values matching a metric name and, optionally, one label.
fn counter_total(snapshot: &SnapshotVec, name: &str, label: Option<(&str, &str)>) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .filter(|(key, _, _, _)| match label {
            Some((k, v)) => key
                .key()
                .labels()
                .any(|l| l.key() == k && l.value() == v),
            None => true,
        })
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

fn has_histogram(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Histogram && key.key().name() == name)
}

fn gateway(transport: Arc<dyn Transport>) -> CellGpt {
    CellGpt::builder()
        .transport(transport)
        .credentials(Arc::new(MemoryPropertyStore::with_api_key("sk-test")))
        .build()
        .unwrap()
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn cache_miss_then_hit_is_counted() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        let gpt = gateway(Arc::new(FixedTransport("Hi there")));
        let prompt = PromptValue::scalar("Hello");
        gpt.gpt(&prompt, &CompletionOptions::new()).unwrap();
        gpt.gpt(&prompt, &CompletionOptions::new()).unwrap();
    });

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(counter_total(&snapshot, telemetry::CACHE_MISSES_TOTAL, None), 1);
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_HITS_TOTAL, None), 1);
    assert_eq!(
        counter_total(&snapshot, telemetry::REQUESTS_TOTAL, Some(("status", "ok"))),
        1
    );
    assert!(has_histogram(&snapshot, telemetry::REQUEST_DURATION_SECONDS));
}

#[test]
fn failed_request_records_error_status() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let result = metrics::with_local_recorder(&recorder, || {
        gateway(Arc::new(FailingTransport)).gpt(&PromptValue::scalar("x"), &CompletionOptions::new())
    });
    assert!(result.is_err());

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(
        counter_total(&snapshot, telemetry::REQUESTS_TOTAL, Some(("status", "error"))),
        1
    );
    assert_eq!(
        counter_total(&snapshot, telemetry::REQUESTS_TOTAL, Some(("operation", "chat"))),
        1
    );
}

#[test]
fn empty_results_are_labelled_by_reason() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        let gpt = gateway(Arc::new(FixedTransport("")));
        let prompt = PromptValue::grid(vec![vec!["".into(), "question".into()]]).unwrap();
        gpt.gpt(&prompt, &CompletionOptions::new()).unwrap();
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(
        counter_total(&snapshot, telemetry::EMPTY_RESULTS_TOTAL, Some(("reason", "input"))),
        1
    );
    assert_eq!(
        counter_total(&snapshot, telemetry::EMPTY_RESULTS_TOTAL, Some(("reason", "upstream"))),
        1
    );
}

#[test]
fn model_listing_records_operation() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    struct ModelsTransport;
    impl Transport for ModelsTransport {
        fn execute(&self, _request: &HttpRequest) -> cellgpt::Result<String> {
            Ok(r#"{"data": [{"id": "gpt-4o"}]}"#.to_string())
        }
    }

    metrics::with_local_recorder(&recorder, || {
        gateway(Arc::new(ModelsTransport)).models().unwrap();
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(
        counter_total(&snapshot, telemetry::REQUESTS_TOTAL, Some(("operation", "models"))),
        1
    );
}

#[test]
fn metrics_are_noop_without_recorder() {
    // Verify no panics when no recorder is installed.
    let gpt = gateway(Arc::new(FixedTransport("ok")));
    gpt.gpt(&PromptValue::scalar("hello"), &CompletionOptions::new())
        .unwrap();
}
