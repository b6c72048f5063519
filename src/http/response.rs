//! HTTP response building module
//!
//! Provides builders for various HTTP status code responses, decoupled from specific business logic.

use super::body::{self, HttpBody};
use super::range::ByteRange;
use hyper::{Response, StatusCode};

/// Entity headers shared by 200, 206 and 304 media responses
#[derive(Debug, Clone)]
pub struct EntityHeaders<'a> {
    pub content_type: &'a str,
    pub etag: &'a str,
    pub last_modified: Option<&'a str>,
    pub cache_control: &'a str,
}

/// Build 200 OK response carrying the whole entity
pub fn build_full_response(
    body: HttpBody,
    total_size: u64,
    entity: &EntityHeaders<'_>,
) -> Response<HttpBody> {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", entity.content_type)
        .header("Content-Length", total_size)
        .header("Accept-Ranges", "bytes")
        .header("ETag", entity.etag)
        .header("Cache-Control", entity.cache_control);
    if let Some(lm) = entity.last_modified {
        builder = builder.header("Last-Modified", lm);
    }

    builder.body(body).unwrap_or_else(|e| {
        log_build_error("200", &e);
        Response::new(body::empty())
    })
}

/// Build 206 Partial Content response
pub fn build_partial_response(
    body: HttpBody,
    range: ByteRange,
    total_size: u64,
    entity: &EntityHeaders<'_>,
) -> Response<HttpBody> {
    let mut builder = Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header("Content-Type", entity.content_type)
        .header("Content-Length", range.len())
        .header("Content-Range", range.content_range(total_size))
        .header("Accept-Ranges", "bytes")
        .header("ETag", entity.etag)
        .header("Cache-Control", entity.cache_control);
    if let Some(lm) = entity.last_modified {
        builder = builder.header("Last-Modified", lm);
    }

    builder.body(body).unwrap_or_else(|e| {
        log_build_error("206", &e);
        Response::new(body::empty())
    })
}

/// Build 304 Not Modified response
pub fn build_304_response(entity: &EntityHeaders<'_>) -> Response<HttpBody> {
    let mut builder = Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header("ETag", entity.etag)
        .header("Cache-Control", entity.cache_control);
    if let Some(lm) = entity.last_modified {
        builder = builder.header("Last-Modified", lm);
    }

    builder.body(body::empty()).unwrap_or_else(|e| {
        log_build_error("304", &e);
        Response::new(body::empty())
    })
}

/// Build a plain-text error response
///
/// The body is a fixed reason phrase, never request-derived data.
pub fn build_error_response(status: StatusCode) -> Response<HttpBody> {
    let message = format!(
        "{} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Error")
    );
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain")
        .header("Content-Length", message.len())
        .body(body::full(message))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(body::empty())
        })
}

/// Build 400 Bad Request response
pub fn build_400_response() -> Response<HttpBody> {
    build_error_response(StatusCode::BAD_REQUEST)
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<HttpBody> {
    build_error_response(StatusCode::NOT_FOUND)
}

/// Build 500 Internal Server Error response
pub fn build_500_response() -> Response<HttpBody> {
    build_error_response(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<HttpBody> {
    let mut resp = build_error_response(StatusCode::METHOD_NOT_ALLOWED);
    resp.headers_mut().insert(
        "Allow",
        hyper::header::HeaderValue::from_static("GET, HEAD, OPTIONS"),
    );
    resp
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(file_size: u64) -> Response<HttpBody> {
    Response::builder()
        .status(StatusCode::RANGE_NOT_SATISFIABLE)
        .header("Content-Type", "text/plain")
        .header("Content-Range", format!("bytes */{file_size}"))
        .header("Accept-Ranges", "bytes")
        .body(body::full("416 Range Not Satisfiable"))
        .unwrap_or_else(|e| {
            log_build_error("416", &e);
            Response::new(body::empty())
        })
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(enable_cors: bool) -> Response<HttpBody> {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Allow", "GET, HEAD, OPTIONS");

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "GET, HEAD, OPTIONS")
            .header("Access-Control-Allow-Headers", "Range, If-Range, If-None-Match")
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(body::empty()).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(body::empty())
    })
}

/// Build health check response with a small JSON status document
pub fn build_health_response(status: &str) -> Response<HttpBody> {
    let payload = serde_json::json!({ "status": status }).to_string();
    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .header("Content-Length", payload.len())
        .header("Cache-Control", "no-cache")
        .body(body::full(payload))
        .unwrap_or_else(|e| {
            log_build_error("health", &e);
            Response::new(body::empty())
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    fn entity() -> EntityHeaders<'static> {
        EntityHeaders {
            content_type: "video/mp4",
            etag: "\"e\"",
            last_modified: Some("Sun, 06 Nov 1994 08:49:37 GMT"),
            cache_control: "public, max-age=31536000",
        }
    }

    fn header<'a>(resp: &'a Response<HttpBody>, name: &str) -> &'a str {
        resp.headers().get(name).unwrap().to_str().unwrap()
    }

    #[test]
    fn test_full_response_headers() {
        let resp = build_full_response(body::empty(), 1000, &entity());
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(header(&resp, "content-length"), "1000");
        assert_eq!(header(&resp, "accept-ranges"), "bytes");
        assert_eq!(header(&resp, "content-type"), "video/mp4");
        assert_eq!(header(&resp, "cache-control"), "public, max-age=31536000");
        assert!(resp.headers().get("content-range").is_none());
    }

    #[test]
    fn test_partial_response_headers() {
        let range = ByteRange { start: 0, end: 99 };
        let resp = build_partial_response(body::empty(), range, 1000, &entity());
        assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(header(&resp, "content-length"), "100");
        assert_eq!(header(&resp, "content-range"), "bytes 0-99/1000");
        assert_eq!(header(&resp, "last-modified"), "Sun, 06 Nov 1994 08:49:37 GMT");
    }

    #[tokio::test]
    async fn test_error_response_body_is_fixed() {
        let resp = build_404_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"404 Not Found");
    }

    #[test]
    fn test_416_response() {
        let resp = build_416_response(1000);
        assert_eq!(resp.status(), StatusCode::RANGE_NOT_SATISFIABLE);
        assert_eq!(header(&resp, "content-range"), "bytes */1000");
    }

    #[test]
    fn test_405_and_options() {
        let resp = build_405_response();
        assert_eq!(header(&resp, "allow"), "GET, HEAD, OPTIONS");

        let resp = build_options_response(true);
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(header(&resp, "access-control-allow-origin"), "*");
        assert!(build_options_response(false)
            .headers()
            .get("access-control-allow-origin")
            .is_none());
    }

    #[tokio::test]
    async fn test_health_response() {
        let resp = build_health_response("ok");
        assert_eq!(header(&resp, "content-type"), "application/json");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }
}
