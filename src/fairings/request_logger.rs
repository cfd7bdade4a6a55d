use crate::config::LogSettings;
use crate::telemetry::SERVICE_NAME;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::Header;
use rocket::request::{FromRequest, Outcome};
use rocket::{Data, Request, Response};
use std::time::Instant;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";
const MAX_REQUEST_ID_LEN: usize = 128;

/// Per-request bookkeeping kept in the request-local cache. `None` means the
/// fairing never saw the request (e.g. a local dispatch without it attached).
struct RequestTrace {
    span: tracing::Span,
    request_id: String,
    received: Instant,
}

type CachedTrace = Option<RequestTrace>;

/// Opens a span per request tagged with the service metadata, logs the
/// request's completion and stamps the response with its id.
pub struct RequestLogger {
    environment: String,
}

impl RequestLogger {
    pub fn new(settings: &LogSettings) -> Self {
        Self {
            environment: settings.environment_label().to_string(),
        }
    }

    fn open_span(&self, req: &Request<'_>, request_id: &str) -> tracing::Span {
        tracing::info_span!(
            "request",
            service = SERVICE_NAME,
            environment = %self.environment,
            method = %req.method(),
            uri = %req.uri(),
            request_id = %request_id,
        )
    }
}

/// Request guard handing the current request span to a handler.
pub struct TracingSpan(pub tracing::Span);

/// Accepts a caller-supplied id if it is short printable ASCII, else mints one.
fn request_id_for(req: &Request<'_>) -> String {
    req.headers()
        .get_one(REQUEST_ID_HEADER)
        .map(str::trim)
        .filter(|id| {
            !id.is_empty()
                && id.len() <= MAX_REQUEST_ID_LEN
                && id.chars().all(|c| c.is_ascii_graphic())
        })
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

fn cached_trace<'r>(req: &'r Request<'_>) -> &'r CachedTrace {
    req.local_cache(|| None::<RequestTrace>)
}

pub(crate) fn request_span_for(req: &Request<'_>) -> tracing::Span {
    cached_trace(req)
        .as_ref()
        .map(|trace| trace.span.clone())
        .unwrap_or_else(tracing::Span::none)
}

fn log_completion(status: u16, duration_ms: f64) {
    match status {
        s if s >= 500 => tracing::error!(status, duration_ms, "request completed"),
        s if s >= 400 => tracing::warn!(status, duration_ms, "request completed"),
        _ => tracing::info!(status, duration_ms, "request completed"),
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for TracingSpan {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        Outcome::Success(TracingSpan(request_span_for(req)))
    }
}

#[rocket::async_trait]
impl Fairing for RequestLogger {
    fn info(&self) -> Info {
        Info {
            name: "Request Logger",
            kind: Kind::Request | Kind::Response,
        }
    }

    async fn on_request(&self, req: &mut Request<'_>, _data: &mut Data<'_>) {
        let request_id = request_id_for(req);
        let span = self.open_span(req, &request_id);
        span.in_scope(|| tracing::debug!("request started"));
        req.local_cache(|| {
            Some(RequestTrace {
                span,
                request_id,
                received: Instant::now(),
            })
        });
    }

    async fn on_response<'r>(&self, req: &'r Request<'_>, res: &mut Response<'r>) {
        let Some(trace) = cached_trace(req) else {
            return;
        };

        let duration_ms = trace.received.elapsed().as_secs_f64() * 1000.0;
        let status = res.status().code;
        trace.span.in_scope(|| log_completion(status, duration_ms));

        res.set_header(Header::new(REQUEST_ID_HEADER, trace.request_id.clone()));
    }
}
