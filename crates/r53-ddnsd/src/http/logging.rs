use axum::http::Request;
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    trace::{DefaultOnRequest, DefaultOnResponse, MakeSpan, TraceLayer},
};
use tracing::{Level, Span, span};
use uuid::Uuid;

#[derive(Clone, Copy)]
pub struct MakeSpanWithId;

impl<B> MakeSpan<B> for MakeSpanWithId {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        // The query carries the hostname and address, log the path only
        span!(
            Level::INFO,
            "request",
            method = %request.method(),
            path = %request.uri().path(),
            version = ?request.version(),
            id = %Uuid::new_v4(),
        )
    }
}

/// Create a request tracing layer
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, MakeSpanWithId> {
    TraceLayer::new_for_http()
        .make_span_with(MakeSpanWithId)
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(DefaultOnResponse::new().level(Level::INFO))
}
