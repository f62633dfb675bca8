//! Per-request span, completion log and metrics.
//!
//! Only the method, path and status are logged. Bodies are never read here,
//! so card details posted to `/savepayment` cannot end up in the logs.

mod parent_context;
mod request_ids;
mod spans;

use std::time::{Duration, Instant};

use salvo::{
    Request, handler,
    http::StatusCode,
    prelude::{Depot, FlowCtrl, Response},
};
use tracing::{Instrument as _, Span, error, field::Empty, info, warn};
use tracing_opentelemetry::OpenTelemetrySpanExt as _;

use crate::extensions::*;

use super::{metrics, settings};

const REQUEST_ID_DEPOT_KEY: &str = "request_id";

/// Paths scraped by infrastructure; they get neither spans nor metrics.
const UNTRACKED_PATHS: &[&str] = &["/metrics", "/healthcheck"];

#[handler]
pub(crate) async fn request_logging(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if UNTRACKED_PATHS.contains(&req.uri().path()) {
        ctrl.call_next(req, depot, res).await;

        return;
    }

    let settings = settings::current();
    let started = Instant::now();
    let request_id = request_ids::resolve(req.header::<String>(request_ids::REQUEST_ID_HEADER));

    depot.insert(REQUEST_ID_DEPOT_KEY, request_id.clone());
    request_ids::echo(res, &request_id);

    let log = RequestLog {
        method: req.method().to_string(),
        route: spans::route(req.uri().path()),
        request_id,
    };

    let span = tracing::info_span!(
        parent: None,
        "http.request",
        otel.name = %format!("{} {}", log.method, log.route),
        otel.kind = "server",
        request_id = %log.request_id,
        method = %log.method,
        route = %log.route,
        remote_addr = %req.remote_addr(),
        user_id = Empty,
        status = Empty,
        duration_ms = Empty,
    );

    if settings.propagate_parent
        && let Some(parent) = parent_context::extract(req.headers())
        && let Err(source) = span.set_parent(parent)
    {
        warn!("failed to attach remote parent to request span: {source}");
    }

    let in_flight = metrics::InFlightRequestGuard::track();

    ctrl.call_next(req, depot, res)
        .instrument(span.clone())
        .await;

    drop(in_flight);

    if let Ok(principal) = depot.principal_or_401() {
        span.record("user_id", tracing::field::display(principal.user_uuid));
    }

    log.finish(
        &span,
        res.status_code.unwrap_or(StatusCode::OK),
        started.elapsed(),
        settings.slow_request_threshold,
    );
}

struct RequestLog {
    method: String,
    route: String,
    request_id: String,
}

impl RequestLog {
    fn finish(&self, span: &Span, status: StatusCode, elapsed: Duration, slow: Duration) {
        let code = status.as_u16();
        let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

        metrics::observe_request(&self.method, &self.route, code, elapsed.as_secs_f64());

        span.record("status", code);
        span.record("duration_ms", duration_ms);

        span.in_scope(|| {
            if status.is_server_error() {
                error!(status = code, duration_ms, "request failed");
            } else if status.is_client_error() {
                warn!(status = code, duration_ms, "request rejected");
            } else {
                info!(status = code, duration_ms, "request completed");
            }

            if elapsed > slow {
                warn!(
                    duration_ms,
                    threshold_ms = u64::try_from(slow.as_millis()).unwrap_or(u64::MAX),
                    "slow request"
                );
            }
        });
    }
}
