use axum::extract::MatchedPath;
use tower_http::trace::MakeSpan;
use tracing::Span;

/// Span maker for HTTP requests. Records the method, URI and matched route
/// template, never headers or bodies.
#[derive(Clone, Debug, Default)]
pub struct RequestMakeSpan;

impl<B> MakeSpan<B> for RequestMakeSpan {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> Span {
        let matched_path = request
            .extensions()
            .get::<MatchedPath>()
            .map(MatchedPath::as_str);

        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            matched_path,
        )
    }
}
