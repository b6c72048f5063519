//! Response body types
//!
//! Every response uses one boxed body type so that fixed messages and
//! streamed file windows can come out of the same handler.

use futures_util::TryStreamExt;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Empty, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use std::io;
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;

pub type HttpBody = BoxBody<Bytes, io::Error>;

/// Body with no bytes (HEAD, 204, 304)
pub fn empty() -> HttpBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed()
}

/// Body from an in-memory buffer
pub fn full(data: impl Into<Bytes>) -> HttpBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed()
}

/// Body streamed from a reader
///
/// The reader is owned by the body and dropped with it, whether the stream
/// finishes, fails, or the connection goes away mid-transfer.
pub fn stream<R>(reader: R) -> HttpBody
where
    R: AsyncRead + Send + Sync + 'static,
{
    StreamBody::new(ReaderStream::new(reader).map_ok(Frame::data)).boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_full_and_empty() {
        let body = full("hello").collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"hello");

        let body = empty().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_stream_reader() {
        let data: &'static [u8] = b"0123456789";
        let body = stream(data).collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], data);
    }
}
