use async_trait::async_trait;
use reqwest::{multipart, Client};
use serde_json::Value;
use url::Url;

use crate::capture::ImageBlob;
use crate::error::{FoodLensError, Result};
use crate::providers::traits::ImageHost;

#[derive(Clone)]
pub struct ImgbbHost {
    api_key: String,
    api_url: Url,
    client: Client,
}

impl ImgbbHost {
    pub fn new(client: Client, api_key: String, api_url: Url) -> Self {
        Self {
            api_key,
            api_url,
            client,
        }
    }
}

#[async_trait]
impl ImageHost for ImgbbHost {
    async fn upload_image(&self, blob: &ImageBlob) -> Result<String> {
        let part = multipart::Part::bytes(blob.bytes.clone())
            .file_name(blob.name.clone())
            .mime_str(blob.media_type.mime())
            .map_err(|e| upload_error(format!("Invalid image part: {}", e)))?;
        let form = multipart::Form::new().part("image", part);

        let response = self
            .client
            .post(self.api_url.clone())
            .query(&[("key", self.api_key.as_str())])
            .multipart(form)
            .send()
            .await
            .map_err(|e| upload_error(format!("ImgBB request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(upload_error(format!("ImgBB API error: {}", status.as_u16())));
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|_| upload_error("Invalid ImgBB response".to_string()))?;

        let success = response_json
            .get("success")
            .and_then(|s| s.as_bool())
            .unwrap_or(false);

        response_json
            .get("data")
            .and_then(|data| data.get("url"))
            .and_then(|url| url.as_str())
            .filter(|url| success && !url.is_empty())
            .map(|url| url.to_string())
            .ok_or_else(|| upload_error("Invalid ImgBB response".to_string()))
    }

    fn name(&self) -> &str {
        "ImgBB"
    }
}

fn upload_error(message: String) -> FoodLensError {
    log::error!("ImgBB upload failed: {}", message);
    FoodLensError::UploadError(message)
}
