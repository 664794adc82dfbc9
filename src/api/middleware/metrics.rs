//! Request counters and latency histograms per route

use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{Request, Uri},
    middleware::Next,
    response::Response,
};

use crate::infrastructure::observability::record_http_request;

/// Record one sample per request, labelled by route template
pub async fn metrics_middleware(
    matched: Option<MatchedPath>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let route = route_label(matched.as_ref(), request.uri());
    let method = request.method().as_str().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;
    record_http_request(&method, &route, response.status().as_u16(), started.elapsed());

    response
}

/// Unmatched requests fall back to the raw path, sanitized downstream
fn route_label(matched: Option<&MatchedPath>, uri: &Uri) -> String {
    match matched {
        Some(template) => template.as_str().to_owned(),
        None => uri.path().to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmatched_route_uses_path_without_query() {
        let uri: Uri = "/api/unknown?x=1".parse().unwrap();

        assert_eq!(route_label(None, &uri), "/api/unknown");
    }
}
