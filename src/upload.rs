//! Image upload helper for the property form.
//!
//! Files over the size ceiling are refused before anything is sent. Accepted
//! batches go out as one multipart request; the returned references are kept
//! in order and can be dropped locally before the form is submitted.

use crate::api::ApiClient;
use crate::config::DEFAULT_MAX_IMAGE_BYTES;
use crate::error::{ClientError, Result};
use crate::session::Session;
use std::path::Path;
use tracing::info;

/// Image read into memory, ready to upload
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), bytes }
    }

    /// Read an image from disk. Files over `limit` are refused from their
    /// metadata, before any bytes are loaded.
    pub async fn read(path: impl AsRef<Path>, limit: u64) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        let size = tokio::fs::metadata(path).await?.len();
        if size > limit {
            return Err(ClientError::FileTooLarge { name, size, limit });
        }

        let bytes = tokio::fs::read(path).await?;
        Ok(Self { name, bytes })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Guessed from the extension; the backend re-encodes anyway
    pub fn content_type(&self) -> &'static str {
        let ext = Path::new(&self.name)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" => "image/png",
            "webp" => "image/webp",
            "gif" => "image/gif",
            _ => "image/jpeg",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageUploader {
    limit: u64,
    retained: Vec<String>,
}

impl Default for ImageUploader {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_IMAGE_BYTES)
    }
}

impl ImageUploader {
    pub fn new(limit: u64) -> Self {
        Self { limit, retained: Vec::new() }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// First file over the ceiling, as an error
    pub fn check(&self, files: &[ImageFile]) -> Result<()> {
        match files.iter().find(|file| file.size() > self.limit) {
            Some(file) => Err(ClientError::FileTooLarge {
                name: file.name.clone(),
                size: file.size(),
                limit: self.limit,
            }),
            None => Ok(()),
        }
    }

    /// Upload `files` as one batch and append the returned references.
    /// Nothing is sent if any file is too large.
    pub async fn upload(&mut self, api: &ApiClient, session: &Session, files: &[ImageFile]) -> Result<&[String]> {
        self.check(files)?;
        if files.is_empty() {
            return Ok(&self.retained);
        }

        let references = api.uploads().images(session, files).await?;
        info!("Uploaded {} image(s)", references.len());
        self.retained.extend(references);
        Ok(&self.retained)
    }

    /// Drop a reference from the form. The remote file is left in place.
    pub fn remove(&mut self, reference: &str) -> bool {
        let before = self.retained.len();
        self.retained.retain(|r| r != reference);
        self.retained.len() != before
    }

    pub fn images(&self) -> &[String] {
        &self.retained
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_file_is_refused() {
        let uploader = ImageUploader::default();
        let files = vec![
            ImageFile::new("small.jpg", vec![0; 1024]),
            ImageFile::new("big.png", vec![0; 6 * 1024 * 1024]),
        ];

        match uploader.check(&files) {
            Err(ClientError::FileTooLarge { name, limit, .. }) => {
                assert_eq!(name, "big.png");
                assert_eq!(limit, 5 * 1024 * 1024);
            }
            other => panic!("expected FileTooLarge, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn oversized_file_on_disk_is_refused_from_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.jpg");
        std::fs::write(&path, vec![0u8; 2048]).unwrap();

        match ImageFile::read(&path, 1024).await {
            Err(ClientError::FileTooLarge { name, size, limit }) => {
                assert_eq!(name, "wide.jpg");
                assert_eq!(size, 2048);
                assert_eq!(limit, 1024);
            }
            other => panic!("expected FileTooLarge, got {other:?}"),
        }

        let image = ImageFile::read(&path, 4096).await.unwrap();
        assert_eq!(image.size(), 2048);
    }

    #[test]
    fn file_at_the_ceiling_is_accepted() {
        let uploader = ImageUploader::new(10);
        assert!(uploader.check(&[ImageFile::new("a.jpg", vec![0; 10])]).is_ok());
    }

    #[test]
    fn content_type_from_extension() {
        assert_eq!(ImageFile::new("x.PNG", vec![]).content_type(), "image/png");
        assert_eq!(ImageFile::new("x.jpeg", vec![]).content_type(), "image/jpeg");
        assert_eq!(ImageFile::new("noext", vec![]).content_type(), "image/jpeg");
    }

    #[test]
    fn remove_only_touches_local_list() {
        let mut uploader = ImageUploader::default();
        uploader.retained = vec!["/uploads/images/a.jpg".into(), "/uploads/images/b.jpg".into()];

        assert!(uploader.remove("/uploads/images/a.jpg"));
        assert!(!uploader.remove("/uploads/images/missing.jpg"));
        assert_eq!(uploader.images(), ["/uploads/images/b.jpg".to_string()]);
    }
}
