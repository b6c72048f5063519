//! Byte-range media server
//!
//! Serves files from a media directory over HTTP/1.1 at `GET /media/{name}`,
//! honoring single `Range: bytes=` requests with `206 Partial Content`.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod media;
pub mod server;
