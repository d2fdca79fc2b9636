use crate::errors::{MediaError, MediaResult};
use crate::media_file::MediaFile;
use async_trait::async_trait;
use reqwest::{multipart, Client};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Media-collection resource path, relative to the endpoint base URL.
pub const MEDIA_COLLECTION_PATH: &str = "/media";

/// A saved media item, normalized from the remote response and decoupled
/// from the endpoint's field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    pub id: u64,
    pub url: String,
    pub link: String,
    pub alt: String,
    pub caption: String,
}

/// Converts one file plus optional metadata into a create request against
/// the remote media library. The orchestrator depends on this seam so tests
/// can substitute a programmable saver.
#[async_trait]
pub trait MediaSaver: Send + Sync {
    async fn save_media(
        &self,
        file: &MediaFile,
        additional_data: &HashMap<String, String>,
    ) -> MediaResult<MediaRecord>;
}

/// HTTP client for the media-library endpoint.
pub struct MediaClient {
    client: Client,
    base_url: String,
}

impl MediaClient {
    pub fn new(base_url: &str) -> MediaResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn collection_url(&self) -> String {
        format!("{}{}", self.base_url, MEDIA_COLLECTION_PATH)
    }

    fn build_form(
        file: &MediaFile,
        additional_data: &HashMap<String, String>,
    ) -> MediaResult<multipart::Form> {
        let part = multipart::Part::bytes(file.contents.clone())
            .file_name(file.upload_filename())
            .mime_str(&file.mime_type)?;

        let mut form = multipart::Form::new().part("file", part);

        for (key, value) in additional_data {
            form = form.text(key.clone(), value.clone());
        }

        Ok(form)
    }
}

#[async_trait]
impl MediaSaver for MediaClient {
    async fn save_media(
        &self,
        file: &MediaFile,
        additional_data: &HashMap<String, String>,
    ) -> MediaResult<MediaRecord> {
        let form = Self::build_form(file, additional_data)?;
        let url = self.collection_url();

        log::debug!(
            "POST {} ({}, {} bytes, {} extra fields)",
            url,
            file.mime_type,
            file.size,
            additional_data.len()
        );

        let response = self.client.post(&url).multipart(form).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            log::warn!(
                "Media endpoint rejected {}: {} {}",
                file.upload_filename(),
                status,
                body
            );
            return Err(MediaError::endpoint(status.as_u16(), body));
        }

        let body = response.text().await?;
        parse_media_response(&body)
    }
}

#[derive(Debug, Deserialize)]
struct RemoteMedia {
    id: u64,
    link: String,
    source_url: String,
    #[serde(default)]
    alt_text: String,
    #[serde(default)]
    caption: RemoteCaption,
}

#[derive(Debug, Default, Deserialize)]
struct RemoteCaption {
    #[serde(default)]
    raw: String,
}

/// Normalize the endpoint's create response into a [`MediaRecord`].
pub fn parse_media_response(body: &str) -> MediaResult<MediaRecord> {
    let remote: RemoteMedia = serde_json::from_str(body)?;
    Ok(MediaRecord {
        id: remote.id,
        url: remote.source_url,
        link: remote.link,
        alt: remote.alt_text,
        caption: remote.caption.raw,
    })
}
