//! HTTP Range request parsing module
//!
//! Single-range `bytes` parsing for seekable playback, following RFC 7233.
//! Multi-range requests (`bytes=0-10,20-30`) are a deliberate omission: they
//! are treated as unparsable and answered with the full entity.

use crate::media::MediaError;

/// Inclusive byte interval within a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    /// First byte offset
    pub start: u64,
    /// Last byte offset (inclusive)
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes covered by the interval
    #[inline]
    pub const fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` header value for this interval
    pub fn content_range(&self, total_size: u64) -> String {
        format!("bytes {}-{}/{total_size}", self.start, self.end)
    }
}

/// Range header parse result
#[derive(Debug, PartialEq, Eq)]
pub enum RangeParseResult {
    /// Valid range, already clamped to the resource
    Valid(ByteRange),
    /// Range starts at or beyond the end of the resource - should return 416
    NotSatisfiable,
    /// Header present but malformed or unsupported (ignore, return full content)
    Unparsable,
    /// No Range header
    None,
}

/// What the response builder should send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Entire entity, status 200
    Full,
    /// Sub-range, status 206
    Partial(ByteRange),
}

impl Selection {
    /// Offset and length of the bytes to read
    pub const fn window(&self, total_size: u64) -> (u64, u64) {
        match self {
            Self::Full => (0, total_size),
            Self::Partial(range) => (range.start, range.len()),
        }
    }
}

/// Parse HTTP Range header (single range only, bytes unit)
///
/// Supported formats:
/// - `bytes=start-end` - Specific range, end clamped to the last byte
/// - `bytes=start-` - From start to end
/// - `bytes=-suffix` - Last suffix bytes
///
/// # Examples
/// ```
/// use media_range_server::http::range::{parse_range_header, ByteRange, RangeParseResult};
///
/// let result = parse_range_header(Some("bytes=0-99"), 1000);
/// assert_eq!(result, RangeParseResult::Valid(ByteRange { start: 0, end: 99 }));
///
/// let result = parse_range_header(None, 1000);
/// assert_eq!(result, RangeParseResult::None);
/// ```
pub fn parse_range_header(range_header: Option<&str>, file_size: u64) -> RangeParseResult {
    let Some(header) = range_header else {
        return RangeParseResult::None;
    };

    let Some(spec) = header.trim().strip_prefix("bytes=") else {
        return RangeParseResult::Unparsable;
    };

    if spec.contains(',') {
        return RangeParseResult::Unparsable;
    }

    let Some((start_str, end_str)) = spec.split_once('-') else {
        return RangeParseResult::Unparsable;
    };
    let (start_str, end_str) = (start_str.trim(), end_str.trim());

    if start_str.is_empty() {
        return parse_suffix_range(end_str, file_size);
    }

    parse_standard_range(start_str, end_str, file_size)
}

/// Parse suffix range (e.g., "-500")
fn parse_suffix_range(suffix_str: &str, file_size: u64) -> RangeParseResult {
    let Some(suffix) = parse_position(suffix_str) else {
        return RangeParseResult::Unparsable;
    };

    if suffix == 0 || file_size == 0 {
        return RangeParseResult::NotSatisfiable;
    }

    // Suffix larger than the file selects the whole file
    RangeParseResult::Valid(ByteRange {
        start: file_size.saturating_sub(suffix),
        end: file_size - 1,
    })
}

/// Parse standard range (e.g., "0-99" or "100-")
fn parse_standard_range(start_str: &str, end_str: &str, file_size: u64) -> RangeParseResult {
    let Some(start) = parse_position(start_str) else {
        return RangeParseResult::Unparsable;
    };

    let end = if end_str.is_empty() {
        None
    } else {
        let Some(e) = parse_position(end_str) else {
            return RangeParseResult::Unparsable;
        };
        if e < start {
            // RFC 7233: last-byte-pos < first-byte-pos makes the spec invalid
            return RangeParseResult::Unparsable;
        }
        Some(e)
    };

    if start >= file_size {
        return RangeParseResult::NotSatisfiable;
    }

    let last = file_size - 1;
    RangeParseResult::Valid(ByteRange {
        start,
        end: end.map_or(last, |e| e.min(last)),
    })
}

/// Byte positions are `1*DIGIT`; `str::parse` alone would also take a sign
fn parse_position(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Turn an optional Range header into what should be sent
///
/// Absent and unparsable headers select the full entity; only a syntactically
/// valid range that misses the resource entirely is an error.
pub fn interpret(range_header: Option<&str>, total_size: u64) -> Result<Selection, MediaError> {
    match parse_range_header(range_header, total_size) {
        RangeParseResult::Valid(range) => Ok(Selection::Partial(range)),
        RangeParseResult::NotSatisfiable => Err(MediaError::RangeNotSatisfiable { total_size }),
        RangeParseResult::Unparsable => {
            crate::logger::log_debug(&format!(
                "Ignoring unparsable Range header: {:?}",
                range_header.unwrap_or_default()
            ));
            Ok(Selection::Full)
        }
        RangeParseResult::None => Ok(Selection::Full),
    }
}
