//! Blocking HTTP client for an external model server.
//!
//! The model server hosts the captioning and NSFW models. Both endpoints take
//! a PNG-encoded image as the request body:
//! - `POST /caption` returns `{"caption": "..."}`
//! - `POST /nsfw` returns `[{"label": "...", "score": 0.0}, ...]`

use std::io::Cursor;
use std::time::Duration;

use image::{ImageFormat, RgbImage};
use reqwest::blocking::{Client, Response};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::adapter::{Captioner, LabelScore, NsfwModel};
use crate::error::ClassifierError;

#[derive(Debug, Deserialize)]
struct CaptionResponse {
    caption: String,
}

/// HTTP client for the model server.
///
/// Must be built and called outside of an async context.
pub struct HttpModelClient {
    inner: Client,
    base_url: String,
}

impl HttpModelClient {
    /// Create a new client with the given per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClassifierError> {
        let inner = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            inner,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn post_image<T: DeserializeOwned>(
        &self,
        path: &str,
        image: &RgbImage,
    ) -> Result<T, ClassifierError> {
        let url = format!("{}{}", self.base_url, path);
        let body = encode_png(image)?;
        debug!(url = %url, bytes = body.len(), "POST image to model server");

        let response = self
            .inner
            .post(&url)
            .header(CONTENT_TYPE, "image/png")
            .body(body)
            .send()?;

        check_status(response)?
            .json()
            .map_err(ClassifierError::from)
    }
}

impl Captioner for HttpModelClient {
    fn caption(&self, image: &RgbImage) -> Result<String, ClassifierError> {
        let response: CaptionResponse = self.post_image("/caption", image)?;
        Ok(response.caption)
    }
}

impl NsfwModel for HttpModelClient {
    fn predict(&self, image: &RgbImage) -> Result<Vec<LabelScore>, ClassifierError> {
        self.post_image("/nsfw", image)
    }
}

fn check_status(response: Response) -> Result<Response, ClassifierError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(ClassifierError::Status {
        status: status.as_u16(),
        body,
    })
}

fn encode_png(image: &RgbImage) -> Result<Vec<u8>, ClassifierError> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = HttpModelClient::new("http://models:8500/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://models:8500");
    }

    #[test]
    fn test_encode_png_roundtrips_dimensions() {
        let image = RgbImage::new(3, 5);
        let bytes = encode_png(&image).unwrap();
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (3, 5));
    }

    #[test]
    fn test_unreachable_server_is_a_stage_error() {
        let client = HttpModelClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let err = client.caption(&RgbImage::new(1, 1)).unwrap_err();
        assert!(matches!(err, ClassifierError::Http(_)));
    }

    #[test]
    fn test_label_scores_deserialize() {
        let labels: Vec<LabelScore> =
            serde_json::from_str(r#"[{"label":"nsfw","score":0.7},{"label":"normal","score":0.3}]"#)
                .unwrap();
        assert_eq!(labels[0], LabelScore::new("nsfw", 0.7));
    }
}
