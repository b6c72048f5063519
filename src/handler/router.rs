//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method validation, route matching, and dispatching.

use crate::config::AppState;
use crate::handler::media;
use crate::http::{self, HttpBody};
use crate::logger::{self, AccessLogEntry};
use crate::media::{decode_segment, MediaRequest};
use hyper::header::{HeaderMap, CONTENT_LENGTH};
use hyper::http::request::Parts;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub range_header: Option<&'a str>,
    pub if_none_match: Option<&'a str>,
    pub if_range: Option<&'a str>,
}

impl<'a> RequestContext<'a> {
    fn from_parts(path: &'a str, method: &Method, headers: &'a HeaderMap) -> Self {
        Self {
            path,
            is_head: *method == Method::HEAD,
            range_header: header_str(headers, "range"),
            if_none_match: header_str(headers, "if-none-match"),
            if_range: header_str(headers, "if-range"),
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Main entry point for HTTP request handling
///
/// Generic over the request body: media requests never read it, so it is
/// dropped before any file-system work starts.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<HttpBody>, Infallible> {
    let started = Instant::now();
    let (parts, _) = req.into_parts();

    let response = match check_http_method(&parts.method, state.config.media.enable_cors) {
        Some(resp) => resp,
        None => {
            let ctx = RequestContext::from_parts(parts.uri.path(), &parts.method, &parts.headers);
            route_request(&ctx, &state).await
        }
    };

    let response = with_cors(response, state.config.media.enable_cors);

    if state.config.logging.access_log {
        log_access(&parts, &response, peer_addr, started, &state);
    }

    Ok(response)
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<HttpBody>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Route request based on path and configuration
async fn route_request(ctx: &RequestContext<'_>, state: &AppState) -> Response<HttpBody> {
    // Health check endpoints (highest priority, always fast)
    let health = &state.config.health;
    if health.enabled && (ctx.path == health.liveness_path || ctx.path == health.readiness_path) {
        return http::build_health_response("ok");
    }

    let Some(raw_name) = media_segment(ctx.path, &state.config.media.route_prefix) else {
        return http::build_404_response();
    };

    let requested_name = match decode_segment(raw_name) {
        Ok(name) => name,
        Err(_) => {
            logger::log_warning(&format!("Undecodable media name rejected: {raw_name}"));
            return http::build_400_response();
        }
    };

    let media_req = MediaRequest {
        requested_name,
        range_header: ctx.range_header,
        if_none_match: ctx.if_none_match,
        if_range: ctx.if_range,
        is_head: ctx.is_head,
    };
    media::serve_media(&media_req, state).await
}

/// Everything after `<prefix>/`, or `None` when the path is outside the prefix
///
/// The remainder is returned verbatim, separators included, so the name
/// validator sees exactly what the client sent.
fn media_segment<'a>(path: &'a str, route_prefix: &str) -> Option<&'a str> {
    let prefix = route_prefix.trim_end_matches('/');
    path.strip_prefix(prefix)?.strip_prefix('/')
}

fn with_cors(mut response: Response<HttpBody>, enable_cors: bool) -> Response<HttpBody> {
    if enable_cors {
        let headers = response.headers_mut();
        headers.insert(
            "Access-Control-Allow-Origin",
            hyper::header::HeaderValue::from_static("*"),
        );
        headers.insert(
            "Access-Control-Expose-Headers",
            hyper::header::HeaderValue::from_static(
                "Content-Range, Content-Length, Accept-Ranges, ETag",
            ),
        );
    }
    response
}

fn log_access(
    req: &Parts,
    response: &Response<HttpBody>,
    peer_addr: SocketAddr,
    started: Instant,
    state: &AppState,
) {
    let entry = access_entry(req, response, peer_addr, started);
    logger::log_access(&entry, &state.config.logging.access_log_format);
}

fn access_entry(
    req: &Parts,
    response: &Response<HttpBody>,
    peer_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method.to_string(),
        req.uri.path().to_string(),
    );
    entry.query = req.uri.query().map(ToString::to_string);
    entry.http_version = version_label(req.version).to_string();
    entry.status = response.status().as_u16();
    // HEAD announces the entity length but sends no body
    entry.body_bytes = if req.method == Method::HEAD {
        0
    } else {
        header_str(response.headers(), CONTENT_LENGTH.as_str())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    };
    entry.range = header_str(&req.headers, "range").map(ToString::to_string);
    entry.referer = header_str(&req.headers, "referer").map(ToString::to_string);
    entry.user_agent = header_str(&req.headers, "user-agent").map(ToString::to_string);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

fn version_label(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_09 => "0.9",
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        hyper::Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::media::MediaLibrary;
    use http_body_util::BodyExt;
    use hyper::StatusCode;

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    fn state_for(dir: &std::path::Path, enable_cors: bool) -> Arc<AppState> {
        let mut cfg = Config::defaults().unwrap();
        cfg.logging.access_log = false;
        cfg.media.enable_cors = enable_cors;
        Arc::new(AppState::with_library(&cfg, MediaLibrary::new(dir)))
    }

    fn get(uri: &str) -> Request<()> {
        Request::builder().uri(uri).body(()).unwrap()
    }

    #[test]
    fn test_media_segment() {
        assert_eq!(media_segment("/media/clip.mp4", "/media"), Some("clip.mp4"));
        assert_eq!(media_segment("/media/clip.mp4", "/media/"), Some("clip.mp4"));
        assert_eq!(media_segment("/media/a/b.mp4", "/media"), Some("a/b.mp4"));
        assert_eq!(media_segment("/media/", "/media"), Some(""));
        assert_eq!(media_segment("/media", "/media"), None);
        assert_eq!(media_segment("/mediax/clip.mp4", "/media"), None);
        assert_eq!(media_segment("/other/clip.mp4", "/media"), None);
    }

    #[tokio::test]
    async fn test_access_entry_body_bytes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("clip.mp4"), vec![1u8; 1000]).unwrap();
        let state = state_for(dir.path(), false);

        for (method, expected) in [(Method::GET, 1000), (Method::HEAD, 0)] {
            let req = Request::builder()
                .method(method.clone())
                .uri("/media/clip.mp4?t=5")
                .header("range", "bytes=0-")
                .body(())
                .unwrap();
            let (parts, ()) = req.into_parts();
            let ctx = RequestContext::from_parts(parts.uri.path(), &parts.method, &parts.headers);
            let resp = route_request(&ctx, &state).await;

            let entry = access_entry(&parts, &resp, peer(), Instant::now());
            assert_eq!(entry.body_bytes, expected, "{method}");
            assert_eq!(entry.status, 206);
            assert_eq!(entry.query.as_deref(), Some("t=5"));
            assert_eq!(entry.range.as_deref(), Some("bytes=0-"));
        }
    }

    #[tokio::test]
    async fn test_routes_media_request() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("clip.mp4"), vec![1u8; 1000]).unwrap();
        let state = state_for(dir.path(), false);

        let req = Request::builder()
            .uri("/media/clip.mp4")
            .header("Range", "bytes=0-99")
            .body(())
            .unwrap();
        let resp = handle_request(req, state, peer()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(resp.headers()["content-range"], "bytes 0-99/1000");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body.len(), 100);
    }

    #[tokio::test]
    async fn test_path_traversal_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_for(dir.path(), false);
        for uri in [
            "/media/../secret.mp4",
            "/media/sub/clip.mp4",
            "/media/..%2Fsecret.mp4",
            "/media/%5Cclip.mp4",
            "/media/%FF",
            "/media/",
        ] {
            let resp = handle_request(get(uri), Arc::clone(&state), peer())
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_percent_encoded_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("my clip.webm"), b"abc").unwrap();
        let state = state_for(dir.path(), false);
        let resp = handle_request(get("/media/my%20clip.webm"), state, peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], "video/webm");
    }

    #[tokio::test]
    async fn test_unknown_route_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_for(dir.path(), false);
        let resp = handle_request(get("/elsewhere"), Arc::clone(&state), peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let resp = handle_request(get("/media/none.mp4"), state, peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_method_handling() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_for(dir.path(), true);

        let post = Request::builder()
            .method(Method::POST)
            .uri("/media/clip.mp4")
            .body(())
            .unwrap();
        let resp = handle_request(post, Arc::clone(&state), peer()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

        let options = Request::builder()
            .method(Method::OPTIONS)
            .uri("/media/clip.mp4")
            .body(())
            .unwrap();
        let resp = handle_request(options, state, peer()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_for(dir.path(), false);
        for uri in ["/healthz", "/readyz"] {
            let resp = handle_request(get(uri), Arc::clone(&state), peer())
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_cors_headers_on_media() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.mp4"), b"abc").unwrap();
        let state = state_for(dir.path(), true);
        let resp = handle_request(get("/media/a.mp4"), state, peer())
            .await
            .unwrap();
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
        assert!(resp.headers().contains_key("access-control-expose-headers"));
    }

    #[test]
    fn test_version_label() {
        assert_eq!(version_label(hyper::Version::HTTP_11), "1.1");
        assert_eq!(version_label(hyper::Version::HTTP_10), "1.0");
        assert_eq!(version_label(hyper::Version::HTTP_2), "2");
    }
}
