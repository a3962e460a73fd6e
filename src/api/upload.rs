use super::ApiClient;
use crate::error::Result;
use crate::session::Session;
use crate::upload::ImageFile;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Deserialize;
use tracing::debug;

pub struct Uploads<'a> {
    pub(super) api: &'a ApiClient,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    files: Vec<UploadedFile>,
}

#[derive(Debug, Deserialize)]
struct UploadedFile {
    url: String,
}

impl Uploads<'_> {
    /// `POST /upload/images` as one multipart batch. References come back in
    /// the order the files were sent.
    pub async fn images(&self, session: &Session, files: &[ImageFile]) -> Result<Vec<String>> {
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes.clone())
                .file_name(file.name.clone())
                .mime_str(file.content_type())?;
            form = form.part("files", part);
        }

        debug!("Uploading {} image(s)", files.len());
        let builder = self.api.request(Method::POST, "/upload/images", session).multipart(form);
        let response: UploadResponse = self.api.fetch(builder).await?;
        Ok(response.files.into_iter().map(|file| file.url).collect())
    }
}
