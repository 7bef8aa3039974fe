//! Tracing/logging for HTTP servers

use std::time::Instant;

use actix_web::{
    dev::{ServiceRequest, ServiceResponse},
    HttpMessage,
};
use tracing_actix_web::{DefaultRootSpanBuilder, RootSpanBuilder};

/// The length of time in milliseconds after which a request is considered slow
const SLOW_REQUEST_MS: u128 = 5 * 1000;

/// `DefaultRootSpanBuilder` with request timings, plus the project of
/// documentation requests and the source of webhook requests.
pub struct DocserveRootSpanBuilder;

/// What a request path is for, as far as logs care.
#[derive(Debug, PartialEq, Eq)]
enum RequestKind<'path> {
    /// Documentation of the given project slug.
    Docs(&'path str),
    /// A post-commit hook or build trigger.
    Webhook(&'static str),
}

/// Classify a request by its path.
fn classify(path: &str) -> Option<RequestKind<'_>> {
    if let Some(rest) = path.strip_prefix("/docs/") {
        return rest
            .split('/')
            .next()
            .filter(|slug| !slug.is_empty())
            .map(RequestKind::Docs);
    }
    match path {
        "/github-hook/" => Some(RequestKind::Webhook("github")),
        "/bitbucket-hook/" => Some(RequestKind::Webhook("bitbucket")),
        _ if path.starts_with("/build/") => Some(RequestKind::Webhook("generic")),
        _ => None,
    }
}

/// For measuring the duration of a request
struct RequestStart(Instant);

impl RootSpanBuilder for DocserveRootSpanBuilder {
    fn on_request_start(request: &ServiceRequest) -> tracing::Span {
        // Scoped so the mutable borrow of the extensions ends before `root_span!` borrows `request`.
        {
            let mut request_extensions = request.extensions_mut();
            request_extensions.insert(RequestStart(Instant::now()));
        }

        // Every `tracing::*` call made while handling the request carries this span,
        // including its `request_id`.
        let span = tracing_actix_web::root_span!(
            request,
            duration_ms = tracing::field::Empty,
            duration_ns = tracing::field::Empty,
            project = tracing::field::Empty,
            webhook = tracing::field::Empty,
        );
        match classify(request.path()) {
            Some(RequestKind::Docs(project)) => {
                span.record("project", project);
            }
            Some(RequestKind::Webhook(provider)) => {
                span.record("webhook", provider);
            }
            None => {}
        }
        span
    }

    fn on_request_end<B: actix_web::body::MessageBody>(
        span: tracing::Span,
        outcome: &Result<ServiceResponse<B>, actix_web::Error>,
    ) {
        let () = outcome.as_ref().map_or((), |response| {
            if let Some(req_start) = response.request().extensions().get::<RequestStart>() {
                let elapsed = req_start.0.elapsed();
                let millis = elapsed.as_millis();
                span.record("duration_ms", millis);
                span.record("duration_ns", elapsed.as_nanos());
                if millis > SLOW_REQUEST_MS {
                    tracing::warn!(duration_ms = millis, "Slow HTTP request");
                } else {
                    tracing::trace!("HTTP Request");
                }
            }
        });
        // Captures the standard `RootSpan` fields
        DefaultRootSpanBuilder::on_request_end(span, outcome);
    }
}
