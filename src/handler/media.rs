//! Byte-range media serving
//!
//! Runs the per-request pipeline: validate the name, locate the file, apply
//! conditional headers, interpret the range, then stream the selected bytes.

use std::io::SeekFrom;
use std::path::Path;

use hyper::Response;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use crate::config::AppState;
use crate::http::body::{self, HttpBody};
use crate::http::response::{build_full_response, build_partial_response, EntityHeaders};
use crate::http::{self, cache, range, Selection};
use crate::logger;
use crate::media::{validate_name, MediaError, MediaRequest};

/// Serve one media request; every failure becomes a status response
pub async fn serve_media(req: &MediaRequest<'_>, state: &AppState) -> Response<HttpBody> {
    match try_serve_media(req, state).await {
        Ok(resp) => resp,
        Err(err) => error_response(&err),
    }
}

async fn try_serve_media(
    req: &MediaRequest<'_>,
    state: &AppState,
) -> Result<Response<HttpBody>, MediaError> {
    let name = validate_name(&req.requested_name)?;
    let media = state.library.locate(name).await?;

    let etag = cache::generate_etag(media.total_size, media.modified);
    let last_modified = media.modified.map(cache::format_http_date);
    let entity = EntityHeaders {
        content_type: media.mime_type,
        etag: &etag,
        last_modified: last_modified.as_deref(),
        cache_control: &state.cache_control,
    };

    if cache::check_etag_match(req.if_none_match, &etag) {
        return Ok(http::build_304_response(&entity));
    }

    let range_header = if cache::if_range_allows(req.if_range, &etag, last_modified.as_deref()) {
        req.range_header
    } else {
        None
    };
    let selection = range::interpret(range_header, media.total_size)?;

    let body = if req.is_head {
        body::empty()
    } else {
        let (offset, len) = selection.window(media.total_size);
        open_window(&media.path, offset, len).await.map_err(|e| {
            logger::log_error(&format!(
                "Failed to open '{}' at offset {offset}: {e}",
                media.path.display()
            ));
            MediaError::InternalIo(e)
        })?
    };

    Ok(match selection {
        Selection::Full => build_full_response(body, media.total_size, &entity),
        Selection::Partial(byte_range) => {
            build_partial_response(body, byte_range, media.total_size, &entity)
        }
    })
}

/// Open `path` and stream exactly `len` bytes starting at `offset`
///
/// The file handle lives inside the returned body and is closed when the
/// body is dropped, on every path.
async fn open_window(path: &Path, offset: u64, len: u64) -> std::io::Result<HttpBody> {
    let mut file = File::open(path).await?;
    if offset > 0 {
        file.seek(SeekFrom::Start(offset)).await?;
    }
    Ok(body::stream(file.take(len)))
}

fn error_response(err: &MediaError) -> Response<HttpBody> {
    match err {
        MediaError::InvalidName => http::build_400_response(),
        MediaError::NotFound => http::build_404_response(),
        MediaError::RangeNotSatisfiable { total_size } => http::build_416_response(*total_size),
        MediaError::InternalIo(_) => http::build_500_response(),
    }
}
