//! Media resource locator
//!
//! Resolves a validated name to a regular file inside the media root and
//! reads its size freshly on every request.

use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;

use super::{MediaError, MediaName};
use crate::http::mime::{MimeTable, VIDEO_MIME_TABLE};
use crate::logger;

/// A media file confirmed to exist at resolution time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMedia {
    pub path: PathBuf,
    pub total_size: u64,
    pub mime_type: &'static str,
    pub modified: Option<SystemTime>,
}

/// The fixed media directory plus the table used to label its files
#[derive(Debug, Clone)]
pub struct MediaLibrary {
    root: PathBuf,
    mime_table: &'static MimeTable,
}

impl MediaLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_mime_table(root, &VIDEO_MIME_TABLE)
    }

    pub fn with_mime_table(root: impl Into<PathBuf>, mime_table: &'static MimeTable) -> Self {
        Self {
            root: root.into(),
            mime_table,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a name to a file and its metadata
    ///
    /// Missing files, unreadable metadata and non-regular files are all
    /// `NotFound`.
    pub async fn locate(&self, name: MediaName<'_>) -> Result<ResolvedMedia, MediaError> {
        let path = self.root.join(name.as_str());

        let metadata = match fs::metadata(&path).await {
            Ok(m) => m,
            Err(e) => {
                // Missing files are common, keep them out of the error log
                logger::log_debug(&format!("Media lookup failed for '{}': {e}", name.as_str()));
                return Err(MediaError::NotFound);
            }
        };

        if !metadata.is_file() {
            return Err(MediaError::NotFound);
        }

        Ok(ResolvedMedia {
            total_size: metadata.len(),
            mime_type: self.mime_table.for_name(name.as_str()),
            modified: metadata.modified().ok(),
            path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::validate_name;

    #[tokio::test]
    async fn test_locate_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("clip.webm"), vec![7u8; 1000]).unwrap();

        let library = MediaLibrary::new(dir.path());
        let media = library
            .locate(validate_name("clip.webm").unwrap())
            .await
            .unwrap();

        assert_eq!(media.total_size, 1000);
        assert_eq!(media.mime_type, "video/webm");
        assert_eq!(media.path, dir.path().join("clip.webm"));
        assert!(media.modified.is_some());
    }

    #[tokio::test]
    async fn test_locate_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let library = MediaLibrary::new(dir.path());
        let result = library.locate(validate_name("nope.mp4").unwrap()).await;
        assert!(matches!(result, Err(MediaError::NotFound)));
    }

    #[tokio::test]
    async fn test_directory_is_not_media() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("folder.mp4")).unwrap();
        let library = MediaLibrary::new(dir.path());
        let result = library.locate(validate_name("folder.mp4").unwrap()).await;
        assert!(matches!(result, Err(MediaError::NotFound)));
    }

    #[tokio::test]
    async fn test_size_is_read_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("grow.mp4");
        std::fs::write(&file, b"abc").unwrap();
        let library = MediaLibrary::new(dir.path());

        let first = library.locate(validate_name("grow.mp4").unwrap()).await.unwrap();
        std::fs::write(&file, b"abcdef").unwrap();
        let second = library.locate(validate_name("grow.mp4").unwrap()).await.unwrap();

        assert_eq!(first.total_size, 3);
        assert_eq!(second.total_size, 6);
    }

    #[tokio::test]
    async fn test_unknown_extension_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("movie.mkv"), b"x").unwrap();
        let library = MediaLibrary::new(dir.path());
        let media = library.locate(validate_name("movie.mkv").unwrap()).await.unwrap();
        assert_eq!(media.mime_type, "video/mp4");
    }
}
