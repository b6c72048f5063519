//! Request handler module
//!
//! Responsible for request routing dispatch and the byte-range media pipeline.

pub mod media;
pub mod router;

// Re-export main entry points
pub use media::serve_media;
pub use router::handle_request;
