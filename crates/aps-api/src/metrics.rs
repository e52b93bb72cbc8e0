//! Prometheus metrics for request traffic and planner activity.

use std::sync::LazyLock;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use regex::Regex;

use crate::plan::PlanStatus;

static UUID_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .expect("valid uuid regex")
});
static LESSON_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/lesson\d+").expect("valid lesson regex"));
static NUMBER_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\d+").expect("valid number regex"));

/// Install the Prometheus recorder
///
/// Can only succeed once per process.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let builder = PrometheusBuilder::new().set_buckets_for_metric(
        Matcher::Full("http_request_duration_seconds".to_string()),
        &[
            0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ],
    )?;

    let handle = builder.install_recorder()?;

    Ok(handle)
}

/// Middleware recording request count and latency per route
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = normalize_path(req.uri().path());

    gauge!("http_requests_in_flight", "method" => method.clone(), "path" => path.clone())
        .increment(1.0);

    let response: Response = next.run(req).await;

    gauge!("http_requests_in_flight", "method" => method.clone(), "path" => path.clone())
        .decrement(1.0);

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.clone()
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path,
        "status" => status
    )
    .record(duration);

    response
}

/// Collapse ids in a path so each route is one label value
fn normalize_path(path: &str) -> String {
    let normalized = UUID_SEGMENT.replace_all(path, ":id");
    let normalized = LESSON_SEGMENT.replace_all(&normalized, "/:lesson_id");
    NUMBER_SEGMENT.replace_all(&normalized, "/:id").into_owned()
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (StatusCode::OK, handle.render())
}

/// Record the outcome of a build-or-load call
pub fn record_plan_event(status: PlanStatus, rolled_over: usize) {
    counter!("plan_requests_total", "status" => status.as_str()).increment(1);

    if rolled_over > 0 {
        counter!("plan_lessons_rolled_over_total").increment(rolled_over as u64);
    }
}

/// Record a quiz submission
pub fn record_quiz_submission(completed: bool) {
    let outcome = if completed { "completed" } else { "incomplete" };

    counter!("quiz_submissions_total", "outcome" => outcome).increment(1);
}

/// Record the number of live study sessions
pub fn record_active_sessions(count: usize) {
    gauge!("study_sessions_active").set(count as f64);
}
