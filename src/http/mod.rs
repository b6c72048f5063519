//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the media pipeline.

pub mod body;
pub mod cache;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use body::HttpBody;
pub use range::{parse_range_header, ByteRange, Selection};
pub use response::{
    build_304_response, build_400_response, build_404_response, build_405_response,
    build_416_response, build_500_response, build_health_response, build_options_response,
};
