//! Media name validation
//!
//! Names are opaque, flat identifiers. Anything that could step outside the
//! media directory is rejected before the file system is touched.

use std::borrow::Cow;

use super::MediaError;

/// A name that passed [`validate_name`]. Only this type can be handed to
/// [`super::MediaLibrary::locate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaName<'a>(&'a str);

impl<'a> MediaName<'a> {
    pub const fn as_str(&self) -> &'a str {
        self.0
    }
}

/// Percent-decode a raw path segment
///
/// Decoding happens before validation so `%2F` and `%2E%2E` are caught too.
pub fn decode_segment(raw: &str) -> Result<Cow<'_, str>, MediaError> {
    urlencoding::decode(raw).map_err(|_| MediaError::InvalidName)
}

/// Reject names containing `..`, `/`, `\`, NUL, or nothing at all
///
/// The name is returned unchanged; no normalization is performed.
pub fn validate_name(name: &str) -> Result<MediaName<'_>, MediaError> {
    if name.is_empty() || name.contains("..") || name.contains(['/', '\\', '\0']) {
        return Err(MediaError::InvalidName);
    }
    Ok(MediaName(name))
}
