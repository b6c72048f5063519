//! Media pipeline error taxonomy
//!
//! Every failure of the request pipeline maps to exactly one HTTP status.
//! An unparsable `Range` header is not an error: it degrades to a full
//! response (see [`crate::http::range::RangeParseResult::Unparsable`]).

use hyper::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    /// Name contains a parent segment, a separator, or is otherwise unsafe
    #[error("invalid media name")]
    InvalidName,

    /// No regular file behind the name, or its metadata could not be read
    #[error("media not found")]
    NotFound,

    /// Range starts at or beyond the end of the resource
    #[error("range not satisfiable for a resource of {total_size} bytes")]
    RangeNotSatisfiable { total_size: u64 },

    /// Open/seek/read failure. Never shown to the client verbatim.
    #[error("internal I/O failure: {0}")]
    InternalIo(#[from] std::io::Error),
}

impl MediaError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidName => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::RangeNotSatisfiable { .. } => StatusCode::RANGE_NOT_SATISFIABLE,
            Self::InternalIo(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(MediaError::InvalidName.status(), StatusCode::BAD_REQUEST);
        assert_eq!(MediaError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            MediaError::RangeNotSatisfiable { total_size: 10 }.status(),
            StatusCode::RANGE_NOT_SATISFIABLE
        );
        let io = std::io::Error::other("disk on fire");
        assert_eq!(
            MediaError::from(io).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
