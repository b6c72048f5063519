//! Media pipeline
//!
//! Name validation, resource location and the error taxonomy shared by the
//! byte-range handler.

mod error;
mod locator;
mod validator;

pub use error::MediaError;
pub use locator::{MediaLibrary, ResolvedMedia};
pub use validator::{decode_segment, validate_name, MediaName};

use std::borrow::Cow;

/// One inbound media request, borrowed from the HTTP request it came from
#[derive(Debug, Clone, Default)]
pub struct MediaRequest<'a> {
    /// Percent-decoded, not yet validated
    pub requested_name: Cow<'a, str>,
    pub range_header: Option<&'a str>,
    pub if_none_match: Option<&'a str>,
    pub if_range: Option<&'a str>,
    pub is_head: bool,
}

impl<'a> MediaRequest<'a> {
    pub fn new(requested_name: impl Into<Cow<'a, str>>) -> Self {
        Self {
            requested_name: requested_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_range(mut self, range: &'a str) -> Self {
        self.range_header = Some(range);
        self
    }
}
