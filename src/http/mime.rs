//! MIME type detection module
//!
//! Maps a lowercase file extension to the Content-Type served for it.

use std::path::Path;

/// Static extension to content-type lookup with a fallback entry
#[derive(Debug)]
pub struct MimeTable {
    entries: &'static [(&'static str, &'static str)],
    default: &'static str,
}

/// Table used for the media collection. Unknown extensions are served as MP4,
/// which is what browsers' video elements handle best.
pub static VIDEO_MIME_TABLE: MimeTable = MimeTable::new(
    &[
        ("mp4", "video/mp4"),
        ("m4v", "video/mp4"),
        ("webm", "video/webm"),
        ("ogg", "video/ogg"),
        ("ogv", "video/ogg"),
        ("avi", "video/x-msvideo"),
        ("mov", "video/quicktime"),
    ],
    "video/mp4",
);

impl MimeTable {
    pub const fn new(
        entries: &'static [(&'static str, &'static str)],
        default: &'static str,
    ) -> Self {
        Self { entries, default }
    }

    /// Get content type for an extension (case-insensitive)
    ///
    /// # Examples
    /// ```
    /// use media_range_server::http::mime::VIDEO_MIME_TABLE;
    /// assert_eq!(VIDEO_MIME_TABLE.get_content_type(Some("webm")), "video/webm");
    /// assert_eq!(VIDEO_MIME_TABLE.get_content_type(Some("MOV")), "video/quicktime");
    /// assert_eq!(VIDEO_MIME_TABLE.get_content_type(None), "video/mp4");
    /// ```
    pub fn get_content_type(&self, extension: Option<&str>) -> &'static str {
        let Some(ext) = extension else {
            return self.default;
        };
        let ext = ext.to_ascii_lowercase();
        self.entries
            .iter()
            .find(|(known, _)| *known == ext)
            .map_or(self.default, |&(_, content_type)| content_type)
    }

    /// Content type for a file name, keyed on its extension
    pub fn for_name(&self, name: &str) -> &'static str {
        self.get_content_type(Path::new(name).extension().and_then(|e| e.to_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_types() {
        assert_eq!(VIDEO_MIME_TABLE.get_content_type(Some("mp4")), "video/mp4");
        assert_eq!(VIDEO_MIME_TABLE.get_content_type(Some("webm")), "video/webm");
        assert_eq!(VIDEO_MIME_TABLE.get_content_type(Some("ogg")), "video/ogg");
        assert_eq!(VIDEO_MIME_TABLE.get_content_type(Some("avi")), "video/x-msvideo");
        assert_eq!(VIDEO_MIME_TABLE.get_content_type(Some("mov")), "video/quicktime");
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(VIDEO_MIME_TABLE.get_content_type(Some("mkv")), "video/mp4");
        assert_eq!(VIDEO_MIME_TABLE.get_content_type(None), "video/mp4");
    }

    #[test]
    fn test_for_name() {
        assert_eq!(VIDEO_MIME_TABLE.for_name("clip.WEBM"), "video/webm");
        assert_eq!(VIDEO_MIME_TABLE.for_name("movie.final.mov"), "video/quicktime");
        assert_eq!(VIDEO_MIME_TABLE.for_name("README"), "video/mp4");
    }

    #[test]
    fn test_custom_table() {
        static AUDIO: MimeTable = MimeTable::new(&[("mp3", "audio/mpeg")], "audio/wav");
        assert_eq!(AUDIO.for_name("song.mp3"), "audio/mpeg");
        assert_eq!(AUDIO.for_name("song.xyz"), "audio/wav");
    }
}
